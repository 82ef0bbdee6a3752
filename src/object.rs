//! Host-side object views
//!
//! The host process owns the real host/service objects; the hooks only see
//! a mutable view of the fields the cluster logic reads and writes. The
//! view is handed to us per callback and lives exactly as long as the
//! callback does.

use crate::node::NodeHandle;
use serde::{Deserialize, Serialize};

/// What kind of monitored object a callback refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Host,
    Service,
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Host => "host",
            ObjectKind::Service => "service",
        }
    }
}

/// How a check result was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckType {
    Active,
    Passive,
}

/// Identity of an object across callbacks. Service ids and host ids come
/// from disjoint spaces only when paired with the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    pub kind: ObjectKind,
    pub id: u32,
}

/// Which node last executed a check for an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutingNode {
    pub node: NodeHandle,
    pub passive: bool,
}

/// Mutable view of a host or service object inside the host process.
///
/// `service_description` is `None` for hosts. The notification bookkeeping
/// fields are read when a notification chain ends, so the packet carries
/// the post-notification state to peers and masters.
#[derive(Debug, Clone)]
pub struct ObjectState {
    pub id: u32,
    pub host_name: String,
    pub service_description: Option<String>,
    pub check_type: CheckType,
    pub execution_time: f64,
    pub last_check: i64,
    /// Set when the expiration reaper decided the check went missing.
    pub expired: bool,
    pub executing_node: Option<ExecutingNode>,
    pub current_notification_number: u32,
    pub last_notification: i64,
    pub next_notification: i64,
    pub no_more_notifications: bool,
}

impl ObjectState {
    pub fn key(&self) -> ObjectKey {
        let kind = if self.service_description.is_some() {
            ObjectKind::Service
        } else {
            ObjectKind::Host
        };
        ObjectKey { kind, id: self.id }
    }
}

/// A finished check result as delivered by the host scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub check_type: CheckType,
    pub check_options: i32,
    pub scheduled_check: bool,
    pub latency: f64,
    pub return_code: i32,
    pub output: String,
    pub start_time: i64,
    pub end_time: i64,
}
