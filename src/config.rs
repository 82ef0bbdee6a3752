//! Module configuration

use crate::event::CallbackMask;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Startup configuration for the event-distribution core. The host loads
/// this once; nothing here changes at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Event kinds the local cluster daemon wants over IPC.
    pub daemon_mask: CallbackMask,
    /// Whether a reporting database is configured. Gates registration of
    /// database-destined callback kinds.
    pub use_database: bool,
    /// Rewrite an object's `last_check` to the check's end time so log
    /// timestamps match the propagated report data. Kept as a toggle in
    /// case newer host releases make the fiddle unnecessary.
    pub rewrite_last_check: bool,
    /// Minimum gap between CTRL_ACTIVE heartbeats to the local daemon.
    pub heartbeat_interval: Duration,
    /// Minimum gap between repeated IPC-backlog warnings.
    pub backlog_warn_interval: Duration,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        ModuleConfig {
            daemon_mask: CallbackMask::ALL,
            use_database: true,
            rewrite_last_check: true,
            heartbeat_interval: Duration::from_secs(15),
            backlog_warn_interval: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;

    #[test]
    fn defaults_match_the_cluster_contract() {
        let cfg = ModuleConfig::default();
        assert!(cfg.daemon_mask.contains(EventKind::ServiceCheck));
        assert!(cfg.use_database);
        assert!(cfg.rewrite_last_check);
        assert_eq!(cfg.heartbeat_interval, Duration::from_secs(15));
        assert_eq!(cfg.backlog_warn_interval, Duration::from_secs(30));
    }
}
