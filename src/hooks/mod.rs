//! Event hooks
//!
//! One handler per callback kind, wired through [`Dispatcher::handle`].
//! Handlers come in two shapes: most return a plain status code, while
//! notification hooks return a rich result so the host can log why a
//! notification was suppressed. The tagged [`CallbackOutcome`] unifies
//! them at the entry point.

mod check;
mod command;
mod comment;
mod downtime;
mod notification;

use crate::dispatch::{DispatchError, Dispatcher};
use crate::event::{
    EventBody, EventCode, EventHeader, EventKind, FlappingBody, ProcessBody, ProgramStatusBody,
};
use crate::selection::PEERS_MASTERS;

pub use check::CheckCallback;
pub use command::CommandCallback;
pub use comment::CommentCallback;
pub use downtime::DowntimeCallback;
pub use notification::NotificationCallback;

/// Return code telling the host to cancel delivery of the event that
/// triggered the callback.
pub const CALLBACK_CANCEL: i32 = -2;

/// What a hook handed back to the host: a bare status code, or a status
/// code with a human-readable reason the host is expected to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Plain(i32),
    Rich { code: i32, reason: String },
}

impl CallbackOutcome {
    pub fn ok() -> Self {
        CallbackOutcome::Plain(0)
    }

    pub fn cancel(reason: impl Into<String>) -> Self {
        CallbackOutcome::Rich { code: CALLBACK_CANCEL, reason: reason.into() }
    }

    pub fn code(&self) -> i32 {
        match self {
            CallbackOutcome::Plain(code) => *code,
            CallbackOutcome::Rich { code, .. } => *code,
        }
    }

    pub fn is_cancel(&self) -> bool {
        self.code() == CALLBACK_CANCEL
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            CallbackOutcome::Plain(_) => None,
            CallbackOutcome::Rich { reason, .. } => Some(reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckPhase {
    AsyncPrecheck,
    SyncPrecheck,
    Processed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactMethodPhase {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPhase {
    Add,
    Load,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DowntimeAttr {
    None,
    StopNormal,
    StopCancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandPhase {
    Start,
    End,
}

#[derive(Debug, Clone)]
pub struct ContactMethodCallback {
    pub phase: ContactMethodPhase,
    pub data: crate::event::ContactMethodBody,
}

/// One host callback, carrying a mutable view of the object it concerns
/// where the hook needs to write back.
pub enum Callback<'a> {
    HostCheck(CheckCallback<'a>),
    ServiceCheck(CheckCallback<'a>),
    Notification(NotificationCallback<'a>),
    ContactNotificationMethod(ContactMethodCallback),
    Comment(CommentCallback),
    Downtime(DowntimeCallback),
    ExternalCommand(CommandCallback),
    Flapping(FlappingBody),
    ProgramStatus(ProgramStatusBody),
    Process(ProcessBody),
    HostStatus,
    ServiceStatus,
}

impl Dispatcher {
    /// The single entry point the host's callback broker invokes.
    pub fn handle(&mut self, callback: Callback<'_>) -> CallbackOutcome {
        self.pulse();
        // Reset so events that don't opt into dupe checking always go out.
        self.dedup.arm(false);

        let outcome = match callback {
            Callback::HostCheck(cb) => {
                CallbackOutcome::Plain(self.hook_check(crate::object::ObjectKind::Host, cb))
            }
            Callback::ServiceCheck(cb) => {
                CallbackOutcome::Plain(self.hook_check(crate::object::ObjectKind::Service, cb))
            }
            Callback::Notification(cb) => self.hook_notification(cb),
            Callback::ContactNotificationMethod(cb) => {
                CallbackOutcome::Plain(self.hook_contact_method(cb))
            }
            Callback::Comment(cb) => CallbackOutcome::Plain(self.hook_comment(cb)),
            Callback::Downtime(cb) => CallbackOutcome::Plain(self.hook_downtime(cb)),
            Callback::ExternalCommand(cb) => {
                CallbackOutcome::Plain(self.hook_external_command(cb))
            }
            Callback::Flapping(data) => {
                // Flapping never crosses the wire: check processing
                // regenerates flapping state on every node.
                CallbackOutcome::Plain(
                    self.local_only(EventKind::Flapping, &EventBody::Flapping(data)),
                )
            }
            Callback::ProgramStatus(data) => CallbackOutcome::Plain(
                self.local_only(EventKind::ProgramStatus, &EventBody::ProgramStatus(data)),
            ),
            Callback::Process(data) => CallbackOutcome::Plain(
                self.local_only(EventKind::Process, &EventBody::Process(data)),
            ),
            // Each node computes its own state from check results; status
            // updates from the host engine are ignored outright.
            Callback::HostStatus | Callback::ServiceStatus => CallbackOutcome::Plain(0),
        };

        self.note_result(outcome.code());
        outcome
    }

    fn local_only(&mut self, kind: EventKind, body: &EventBody) -> i32 {
        let mut header = EventHeader::new(kind);
        header.code = EventCode::Nonet;
        code_of(self.send(header, body))
    }

    fn hook_contact_method(&mut self, cb: ContactMethodCallback) -> i32 {
        if cb.phase != ContactMethodPhase::End {
            return 0;
        }

        // Broadcast for logging, but only to peers and masters.
        let mut header = EventHeader::new(EventKind::ContactNotificationMethod);
        header.selection = PEERS_MASTERS;

        code_of(self.send(header, &EventBody::ContactMethod(cb.data)))
    }
}

pub(crate) fn code_of(result: Result<usize, DispatchError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => -1,
    }
}
