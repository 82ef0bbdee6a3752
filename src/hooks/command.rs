//! External-command hook
//!
//! Commands partition into categories that decide both routing and
//! whether this node may execute the command at all. Per-object commands
//! ride the hostname selection; group commands fan out wider; check-result
//! and custom-notification injections additionally cancel locally when
//! another node owns the object, so exactly one node acts on them.

use super::{CommandPhase, CALLBACK_CANCEL};
use crate::dispatch::Dispatcher;
use crate::event::{CommandBody, CommandId, EventBody, EventCode, EventHeader, EventKind};
use crate::node::NodeHandle;
use crate::selection::PEERS_POLLERS;
use tracing::{debug, info};

/// Payload of an external-command callback. `args` is the raw
/// semicolon-separated argument string after the command name.
#[derive(Debug, Clone)]
pub struct CommandCallback {
    pub phase: CommandPhase,
    pub command: CommandId,
    pub args: String,
}

/// Routing category of an external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommandCategory {
    /// Comment add/delete: the comment events carry the data.
    Comment,
    /// Downtime-by-id deletion: the downtime delete event is transferred
    /// instead.
    DowntimeDelete,
    /// Affects one host or service; routed by the hostname argument.
    PerObject,
    /// Per-host injection that only the owning node may execute.
    OwnedHost,
    /// Per-service injection that only the owning node may execute.
    OwnedService,
    /// Affects a hostgroup; routed by the hostgroup argument.
    Hostgroup,
    /// Affects a servicegroup; peers and pollers only.
    Servicegroup,
    /// Anything else; peers and pollers if any exist.
    Global,
}

impl CommandId {
    pub(crate) fn category(self) -> CommandCategory {
        use CommandId::*;
        match self {
            AddHostComment | AddSvcComment | DelHostComment | DelSvcComment => {
                CommandCategory::Comment
            }

            DelHostDowntime | DelSvcDowntime => CommandCategory::DowntimeDelete,

            AcknowledgeHostProblem
            | AcknowledgeSvcProblem
            | RemoveHostAcknowledgement
            | RemoveSvcAcknowledgement
            | ScheduleHostDowntime
            | ScheduleSvcDowntime
            | ScheduleAndPropagateHostDowntime
            | ScheduleAndPropagateTriggeredHostDowntime
            | EnableHostCheck
            | DisableHostCheck
            | EnableSvcCheck
            | DisableSvcCheck
            | EnablePassiveHostChecks
            | DisablePassiveHostChecks
            | EnablePassiveSvcChecks
            | DisablePassiveSvcChecks
            | ScheduleHostCheck
            | ScheduleForcedHostCheck
            | ScheduleSvcCheck
            | ScheduleForcedSvcCheck
            | ScheduleHostSvcChecks
            | ScheduleForcedHostSvcChecks
            | DelayHostNotification
            | DelaySvcNotification
            | EnableHostNotifications
            | DisableHostNotifications
            | EnableSvcNotifications
            | DisableSvcNotifications
            | EnableHostSvcChecks
            | DisableHostSvcChecks
            | EnableHostSvcNotifications
            | DisableHostSvcNotifications
            | DelAllHostComments
            | DelAllSvcComments
            | EnableHostFlapDetection
            | DisableHostFlapDetection
            | EnableSvcFlapDetection
            | DisableSvcFlapDetection
            | EnableHostEventHandler
            | DisableHostEventHandler
            | EnableSvcEventHandler
            | DisableSvcEventHandler
            | SetHostNotificationNumber
            | SetSvcNotificationNumber
            | ChangeCustomHostVar
            | ChangeCustomSvcVar => CommandCategory::PerObject,

            ProcessHostCheckResult | SendCustomHostNotification => CommandCategory::OwnedHost,

            ProcessServiceCheckResult | SendCustomSvcNotification => CommandCategory::OwnedService,

            ScheduleHostgroupHostDowntime
            | ScheduleHostgroupSvcDowntime
            | EnableHostgroupHostChecks
            | DisableHostgroupHostChecks
            | EnableHostgroupSvcChecks
            | DisableHostgroupSvcChecks
            | EnableHostgroupHostNotifications
            | DisableHostgroupHostNotifications
            | EnableHostgroupSvcNotifications
            | DisableHostgroupSvcNotifications => CommandCategory::Hostgroup,

            ScheduleServicegroupHostDowntime
            | ScheduleServicegroupSvcDowntime
            | EnableServicegroupSvcChecks
            | DisableServicegroupSvcChecks
            | EnableServicegroupSvcNotifications
            | DisableServicegroupSvcNotifications => CommandCategory::Servicegroup,

            Other(_) => CommandCategory::Global,
        }
    }
}

impl Dispatcher {
    pub(crate) fn hook_external_command(&mut self, cb: CommandCallback) -> i32 {
        // Commands raise two events; acting on START lets us block
        // execution of per-object commands where that matters.
        if cb.phase != CommandPhase::Start {
            return 0;
        }

        let inbound = self.recv_sender().is_some();
        let mut header = EventHeader::new(EventKind::ExternalCommand);
        let mut cb_result = 0;

        match cb.command.category() {
            // Dedicated events carry this data across the cluster.
            CommandCategory::Comment | CommandCategory::DowntimeDelete => return 0,

            CommandCategory::PerObject => {
                if !inbound {
                    header.selection = self.selections.command_selection(&cb.args, false);
                }
            }

            CommandCategory::OwnedHost => {
                if !inbound {
                    header.selection = self.selections.command_selection(&cb.args, false);
                }
                // Forward to all, but execute only on the owning node.
                if let Some((host_name, _)) = cb.args.split_once(';') {
                    match self.lookup.host_id(host_name) {
                        None => {
                            // Unknown host: nothing we should handle here.
                            cb_result = CALLBACK_CANCEL;
                        }
                        Some(id) => {
                            if self.pgroup.host_check_node(id) != NodeHandle::SelfNode {
                                cb_result = CALLBACK_CANCEL;
                            }
                        }
                    }
                }
            }

            CommandCategory::OwnedService => {
                if !inbound {
                    header.selection = self.selections.command_selection(&cb.args, false);
                }
                let mut parts = cb.args.splitn(3, ';');
                if let (Some(host_name), Some(description), Some(_rest)) =
                    (parts.next(), parts.next(), parts.next())
                {
                    match self.lookup.service_id(host_name, description) {
                        None => {
                            // Unknown service: nothing we should handle here.
                            cb_result = CALLBACK_CANCEL;
                        }
                        Some(id) => {
                            if self.pgroup.service_check_node(id) != NodeHandle::SelfNode {
                                cb_result = CALLBACK_CANCEL;
                            }
                        }
                    }
                }
            }

            CommandCategory::Hostgroup => {
                if !inbound {
                    header.selection = self.selections.command_selection(&cb.args, true);
                }
            }

            // Masters can't know how much of a servicegroup lives here, so
            // these never go upward.
            CommandCategory::Servicegroup => {
                if self.nodes.num_masters() > 0 {
                    info!("submitting servicegroup commands on pollers isn't necessarily a good idea");
                }
                if !inbound {
                    header.selection = PEERS_POLLERS;
                }
            }

            CommandCategory::Global => {
                if self.nodes.num_peers() + self.nodes.num_pollers() == 0 {
                    debug!("no peers or pollers, not sending command anywhere");
                    return 0;
                }
                if !inbound {
                    header.selection = PEERS_POLLERS;
                }
            }
        }

        if inbound {
            header.code = EventCode::Nonet;
        }

        let body = EventBody::Command(CommandBody { command: cb.command, args: cb.args });
        if self.send(header, &body).is_err() {
            debug!("couldn't relay external command packet");
        }

        cb_result
    }
}
