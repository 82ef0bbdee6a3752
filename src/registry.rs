//! Hook registry
//!
//! The static table of callback kinds the module cares about, each with
//! the destination that justifies it. Init filters the table against the
//! configured event mask and the available destinations and registers the
//! survivors with the host; deinit unconditionally deregisters every row,
//! which the host tolerates for rows that were never registered.

use crate::bridge::HostBroker;
use crate::config::ModuleConfig;
use crate::event::{CallbackMask, EventKind};
use crate::node::NodeDirectory;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookDestination {
    /// Needed for the module's own logic regardless of backends.
    Local,
    /// Only useful with a reporting database behind the daemon.
    Database,
    /// Only useful with at least one other node configured.
    Network,
}

#[derive(Debug, Clone, Copy)]
pub struct CallbackEntry {
    pub dest: HookDestination,
    pub kind: EventKind,
}

pub const CALLBACK_TABLE: &[CallbackEntry] = &[
    CallbackEntry { dest: HookDestination::Local, kind: EventKind::Process },
    CallbackEntry { dest: HookDestination::Network, kind: EventKind::Notification },
    CallbackEntry {
        dest: HookDestination::Local,
        kind: EventKind::ContactNotificationMethod,
    },
    CallbackEntry { dest: HookDestination::Local, kind: EventKind::ServiceCheck },
    CallbackEntry { dest: HookDestination::Local, kind: EventKind::HostCheck },
    CallbackEntry { dest: HookDestination::Local, kind: EventKind::Comment },
    CallbackEntry { dest: HookDestination::Local, kind: EventKind::Downtime },
    CallbackEntry { dest: HookDestination::Local, kind: EventKind::Flapping },
    CallbackEntry { dest: HookDestination::Local, kind: EventKind::ProgramStatus },
    CallbackEntry { dest: HookDestination::Local, kind: EventKind::HostStatus },
    CallbackEntry { dest: HookDestination::Local, kind: EventKind::ServiceStatus },
    CallbackEntry { dest: HookDestination::Network, kind: EventKind::ExternalCommand },
];

/// Register the callback kinds enabled by `mask` with the host. Returns
/// how many kinds were registered.
pub fn init(
    broker: &mut dyn HostBroker,
    config: &ModuleConfig,
    nodes: &NodeDirectory,
    mask: CallbackMask,
) -> usize {
    if !config.use_database && nodes.num_nodes() == 0 {
        debug!("not using a database and no nodes configured, ignoring all events");
        return 0;
    }

    let mut registered = 0;
    for entry in CALLBACK_TABLE {
        if entry.dest == HookDestination::Database && !config.use_database {
            debug!("not using a database, ignoring {} events", entry.kind.name());
            continue;
        }
        if entry.dest == HookDestination::Network && nodes.num_nodes() == 0 {
            debug!("no nodes configured, ignoring {} events", entry.kind.name());
            continue;
        }
        if !mask.contains(entry.kind) {
            debug!("event filter: ignoring {} events", entry.kind.name());
            continue;
        }
        broker.register(entry.kind);
        registered += 1;
    }

    registered
}

/// Deregister every table row. Event masks are ignored on the way out.
pub fn deinit(broker: &mut dyn HostBroker) {
    for entry in CALLBACK_TABLE {
        broker.deregister(entry.kind);
    }
}
