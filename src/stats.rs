//! Decision counters
//!
//! Small observability records bumped at routing decision points. Nothing
//! reads them for logic; operators read them to see how check and
//! notification responsibility spreads across the cluster.

use crate::event::{NotificationReason, NotificationType};
use crate::object::CheckType;

/// Who ended up responsible for checks we saw scheduling decisions for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckCounters {
    pub poller: u64,
    pub peer: u64,
    pub self_checks: u64,
    pub orphaned: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CheckStats {
    pub host: CheckCounters,
    pub service: CheckCounters,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyCounters {
    pub sent: u64,
    pub master: u64,
    pub poller: u64,
    pub peer: u64,
}

const NOTIFY_REASONS: usize = 9;

/// One counter bucket per (reason, notification type, check type).
#[derive(Debug, Clone)]
pub struct NotifyStats {
    buckets: [[[NotifyCounters; 2]; 2]; NOTIFY_REASONS],
}

impl Default for NotifyStats {
    fn default() -> Self {
        NotifyStats { buckets: [[[NotifyCounters::default(); 2]; 2]; NOTIFY_REASONS] }
    }
}

impl NotifyStats {
    pub fn new() -> Self {
        NotifyStats::default()
    }

    fn check_index(check_type: CheckType) -> usize {
        match check_type {
            CheckType::Active => 0,
            CheckType::Passive => 1,
        }
    }

    pub fn bucket(
        &self,
        reason: NotificationReason,
        ntype: NotificationType,
        check_type: CheckType,
    ) -> &NotifyCounters {
        &self.buckets[reason.index()][ntype.index()][Self::check_index(check_type)]
    }

    pub fn bucket_mut(
        &mut self,
        reason: NotificationReason,
        ntype: NotificationType,
        check_type: CheckType,
    ) -> &mut NotifyCounters {
        &mut self.buckets[reason.index()][ntype.index()][Self::check_index(check_type)]
    }
}
