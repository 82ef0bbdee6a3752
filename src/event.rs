//! Wire events
//!
//! Every callback that survives filtering becomes one [`Event`]: a fixed
//! header naming the kind, a routing selection, a magic code, and a
//! codec-produced payload. Bodies are value types created per callback and
//! consumed at dispatch.

use crate::object::CheckType;
use serde::{Deserialize, Serialize};

/// Callback kinds the host process can deliver. Each kind owns one bit in
/// the init-time event mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventKind {
    Process = 0,
    ProgramStatus = 1,
    HostStatus = 2,
    ServiceStatus = 3,
    HostCheck = 4,
    ServiceCheck = 5,
    Comment = 6,
    Downtime = 7,
    Flapping = 8,
    Notification = 9,
    ContactNotificationMethod = 10,
    ExternalCommand = 11,
    Control = 12,
}

impl EventKind {
    pub fn bit(self) -> u32 {
        1 << (self as u32)
    }

    pub fn name(self) -> &'static str {
        match self {
            EventKind::Process => "process",
            EventKind::ProgramStatus => "program status",
            EventKind::HostStatus => "host status",
            EventKind::ServiceStatus => "service status",
            EventKind::HostCheck => "host check",
            EventKind::ServiceCheck => "service check",
            EventKind::Comment => "comment",
            EventKind::Downtime => "downtime",
            EventKind::Flapping => "flapping",
            EventKind::Notification => "notification",
            EventKind::ContactNotificationMethod => "contact notification method",
            EventKind::ExternalCommand => "external command",
            EventKind::Control => "control",
        }
    }
}

/// Bitmask over [`EventKind`]s, used both for the daemon's event filter
/// and for gating hook registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallbackMask(pub u32);

impl CallbackMask {
    pub const NONE: CallbackMask = CallbackMask(0);
    pub const ALL: CallbackMask = CallbackMask(u32::MAX);

    pub fn of(kinds: &[EventKind]) -> Self {
        let mut mask = 0;
        for kind in kinds {
            mask |= kind.bit();
        }
        CallbackMask(mask)
    }

    pub fn contains(self, kind: EventKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn without(self, kind: EventKind) -> Self {
        CallbackMask(self.0 & !kind.bit())
    }
}

/// Header magic. `Nonet` inhibits network egress; `CtrlActive` marks the
/// heartbeat control packet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventCode {
    #[default]
    Normal,
    CtrlActive,
    Nonet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventHeader {
    pub kind: EventKind,
    pub code: EventCode,
    pub selection: u16,
    pub length: u32,
}

impl EventHeader {
    /// Fresh header for an outgoing event: no magic, broadcast selection,
    /// length filled in after encoding.
    pub fn new(kind: EventKind) -> Self {
        EventHeader {
            kind,
            code: EventCode::Normal,
            selection: crate::selection::BROADCAST,
            length: 0,
        }
    }
}

/// An encoded event ready for IPC and network emission.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub header: EventHeader,
    pub payload: Vec<u8>,
}

/// Why a notification chain fired. `Custom` also absorbs the legacy
/// out-of-range code some host releases use for custom notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationReason {
    Normal,
    Acknowledgement,
    FlappingStart,
    FlappingStop,
    FlappingDisabled,
    DowntimeStart,
    DowntimeEnd,
    DowntimeCancelled,
    Custom,
}

impl NotificationReason {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => NotificationReason::Normal,
            1 => NotificationReason::Acknowledgement,
            2 => NotificationReason::FlappingStart,
            3 => NotificationReason::FlappingStop,
            4 => NotificationReason::FlappingDisabled,
            5 => NotificationReason::DowntimeStart,
            6 => NotificationReason::DowntimeEnd,
            7 => NotificationReason::DowntimeCancelled,
            _ => NotificationReason::Custom,
        }
    }

    pub fn index(self) -> usize {
        match self {
            NotificationReason::Normal => 0,
            NotificationReason::Acknowledgement => 1,
            NotificationReason::FlappingStart => 2,
            NotificationReason::FlappingStop => 3,
            NotificationReason::FlappingDisabled => 4,
            NotificationReason::DowntimeStart => 5,
            NotificationReason::DowntimeEnd => 6,
            NotificationReason::DowntimeCancelled => 7,
            NotificationReason::Custom => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationType {
    Host,
    Service,
}

impl NotificationType {
    pub fn index(self) -> usize {
        match self {
            NotificationType::Host => 0,
            NotificationType::Service => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentEntryType {
    User,
    Downtime,
    Acknowledgement,
    Flapping,
}

/// Check-result fields repurposed for state propagation. `last_check`
/// carries the check's start time; the receiver reconstructs its own
/// scheduling from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectStateBody {
    pub check_type: CheckType,
    pub checks_enabled: i32,
    pub should_be_scheduled: bool,
    pub latency: f64,
    pub execution_time: f64,
    pub current_state: i32,
    pub plugin_output: String,
    pub last_check: i64,
}

impl ObjectStateBody {
    pub fn from_check_result(cr: &crate::object::CheckResult) -> Self {
        ObjectStateBody {
            check_type: cr.check_type,
            checks_enabled: cr.check_options,
            should_be_scheduled: cr.scheduled_check,
            latency: cr.latency,
            execution_time: 0.0,
            current_state: cr.return_code,
            plugin_output: cr.output.clone(),
            last_check: cr.start_time,
        }
    }
}

/// Host or service status snapshot sent for processed check results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusBody {
    pub host_name: String,
    pub service_description: Option<String>,
    pub nebattr: i32,
    pub state: ObjectStateBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationBody {
    pub notification_type: NotificationType,
    pub reason: NotificationReason,
    pub host_name: String,
    pub service_description: Option<String>,
    pub output: String,
    pub ack_author: String,
    pub ack_data: String,
    pub contacts_notified: u32,
    pub notification_number: u32,
    pub last_notification: i64,
    pub next_notification: i64,
    pub no_more_notifications: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMethodBody {
    pub contact_name: String,
    pub method_name: String,
    pub host_name: String,
    pub service_description: Option<String>,
    pub output: String,
    pub start_time: i64,
    pub end_time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentBody {
    pub entry_type: CommentEntryType,
    pub comment_type: u32,
    pub host_name: String,
    pub service_description: Option<String>,
    pub author_name: String,
    pub comment_data: String,
    pub expires: bool,
    pub expire_time: i64,
    pub persistent: bool,
    pub entry_time: i64,
    pub comment_id: u64,
}

/// Identifying fields of a comment, used by the one-shot echo suppressor
/// to recognize a reaper-re-added comment coming back around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentKey {
    pub entry_type: CommentEntryType,
    pub comment_type: u32,
    pub host_name: String,
    pub service_description: Option<String>,
    pub author_name: String,
    pub comment_data: String,
    pub expires: bool,
    pub persistent: bool,
}

impl CommentKey {
    pub fn of(body: &CommentBody) -> Self {
        CommentKey {
            entry_type: body.entry_type,
            comment_type: body.comment_type,
            host_name: body.host_name.clone(),
            service_description: body.service_description.clone(),
            author_name: body.author_name.clone(),
            comment_data: body.comment_data.clone(),
            expires: body.expires,
            persistent: body.persistent,
        }
    }

    pub fn matches(&self, body: &CommentBody) -> bool {
        *self == CommentKey::of(body)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DowntimeBody {
    pub host_name: String,
    pub service_description: Option<String>,
    pub entry_time: i64,
    pub author_name: String,
    pub comment_data: String,
    pub start_time: i64,
    pub end_time: i64,
    pub fixed: bool,
    pub duration: u64,
    pub triggered_by: u64,
    pub downtime_id: u64,
}

/// External commands the hook classifies. Commands outside the named set
/// carry their raw id and take the global fan-out path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandId {
    AddHostComment,
    AddSvcComment,
    DelHostComment,
    DelSvcComment,
    DelHostDowntime,
    DelSvcDowntime,
    AcknowledgeHostProblem,
    AcknowledgeSvcProblem,
    RemoveHostAcknowledgement,
    RemoveSvcAcknowledgement,
    ScheduleHostDowntime,
    ScheduleSvcDowntime,
    ScheduleAndPropagateHostDowntime,
    ScheduleAndPropagateTriggeredHostDowntime,
    EnableHostCheck,
    DisableHostCheck,
    EnableSvcCheck,
    DisableSvcCheck,
    EnablePassiveHostChecks,
    DisablePassiveHostChecks,
    EnablePassiveSvcChecks,
    DisablePassiveSvcChecks,
    ScheduleHostCheck,
    ScheduleForcedHostCheck,
    ScheduleSvcCheck,
    ScheduleForcedSvcCheck,
    ScheduleHostSvcChecks,
    ScheduleForcedHostSvcChecks,
    DelayHostNotification,
    DelaySvcNotification,
    EnableHostNotifications,
    DisableHostNotifications,
    EnableSvcNotifications,
    DisableSvcNotifications,
    EnableHostSvcChecks,
    DisableHostSvcChecks,
    EnableHostSvcNotifications,
    DisableHostSvcNotifications,
    DelAllHostComments,
    DelAllSvcComments,
    EnableHostFlapDetection,
    DisableHostFlapDetection,
    EnableSvcFlapDetection,
    DisableSvcFlapDetection,
    EnableHostEventHandler,
    DisableHostEventHandler,
    EnableSvcEventHandler,
    DisableSvcEventHandler,
    SetHostNotificationNumber,
    SetSvcNotificationNumber,
    ChangeCustomHostVar,
    ChangeCustomSvcVar,
    ProcessHostCheckResult,
    ProcessServiceCheckResult,
    SendCustomHostNotification,
    SendCustomSvcNotification,
    ScheduleHostgroupHostDowntime,
    ScheduleHostgroupSvcDowntime,
    EnableHostgroupHostChecks,
    DisableHostgroupHostChecks,
    EnableHostgroupSvcChecks,
    DisableHostgroupSvcChecks,
    EnableHostgroupHostNotifications,
    DisableHostgroupHostNotifications,
    EnableHostgroupSvcNotifications,
    DisableHostgroupSvcNotifications,
    ScheduleServicegroupHostDowntime,
    ScheduleServicegroupSvcDowntime,
    EnableServicegroupSvcChecks,
    DisableServicegroupSvcChecks,
    EnableServicegroupSvcNotifications,
    DisableServicegroupSvcNotifications,
    Other(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandBody {
    pub command: CommandId,
    pub args: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlappingBody {
    pub host_name: String,
    pub service_description: Option<String>,
    pub percent_change: f64,
    pub high_threshold: f64,
    pub low_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramStatusBody {
    pub program_start: i64,
    pub pid: u32,
    pub daemon_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessBody {
    pub process_type: u32,
    pub flags: u32,
}

/// Heartbeat payload letting the daemon re-announce us to peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlBody {
    pub peer_id: u32,
    pub active_peers: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventBody {
    Status(StatusBody),
    Notification(NotificationBody),
    ContactMethod(ContactMethodBody),
    Comment(CommentBody),
    Downtime(DowntimeBody),
    Command(CommandBody),
    Flapping(FlappingBody),
    ProgramStatus(ProgramStatusBody),
    Process(ProcessBody),
    Control(ControlBody),
}
