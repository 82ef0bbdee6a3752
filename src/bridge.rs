//! External collaborator seams
//!
//! Everything the core talks to but does not own: the local IPC channel to
//! the cluster daemon, the per-node transport, the peer-group assignment
//! module, the check-expiration timer, the host's object index, and the
//! host's callback broker. All of them are non-blocking by contract; a
//! send that would block must fail fast instead.

use crate::event::{Event, EventKind};
use crate::node::{Node, NodeHandle};
use crate::object::ObjectKind;

/// Local IPC channel to the cluster daemon. A negative return means the
/// channel is backlogged and the event was not delivered.
pub trait IpcChannel {
    fn send(&mut self, event: &Event) -> i32;
}

/// Best-effort, buffered per-node sender.
pub trait PeerTransport {
    fn send_to(&mut self, node: &Node, event: &Event);
}

/// Peer-group assignment: which node executes checks for an object. The
/// assignment algorithm lives outside the core; only the lookups cross
/// this boundary.
pub trait PeerGroup {
    fn host_check_node(&self, object_id: u32) -> NodeHandle;
    fn service_check_node(&self, object_id: u32) -> NodeHandle;
}

/// Schedules the reaping of checks that never come back from their
/// assigned node.
pub trait ExpirationTimer {
    fn schedule(&mut self, kind: ObjectKind, node: NodeHandle, object_id: u32);
    fn cancel(&mut self, kind: ObjectKind, object_id: u32);
}

/// Name-to-id resolution against the host's object tables, needed when an
/// external command references objects by name only.
pub trait ObjectLookup {
    fn host_id(&self, name: &str) -> Option<u32>;
    fn service_id(&self, host_name: &str, description: &str) -> Option<u32>;
}

/// The host process's callback registration API. Deregistering a kind
/// that was never registered is a no-op.
pub trait HostBroker {
    fn register(&mut self, kind: EventKind);
    fn deregister(&mut self, kind: EventKind);
}
