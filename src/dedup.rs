//! Duplicate suppression
//!
//! A one-slot cache of the last event handed to the local daemon. Check
//! processing arms it when the same object produced the previous status
//! emit; an armed slot drops byte-identical repeats before they hit IPC
//! or the wire. One slot is enough because the host serializes callbacks
//! and repeats arrive back to back.

use crate::event::{Event, EventKind};
use tracing::debug;

#[derive(Debug, Default)]
pub struct DedupSlot {
    kind: Option<EventKind>,
    bytes: Vec<u8>,
    enabled: bool,
    dupes: u64,
    dupe_bytes: u64,
}

impl DedupSlot {
    pub fn new() -> Self {
        DedupSlot::default()
    }

    /// Arm or disarm duplicate checking for the current callback.
    pub fn arm(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// True when the event repeats the slot content exactly. Counts every
    /// hit and logs a running total every 100th.
    pub fn is_dupe(&mut self, event: &Event) -> bool {
        if !self.enabled {
            return false;
        }
        if self.kind != Some(event.header.kind) {
            return false;
        }
        if self.bytes.len() != event.payload.len() {
            return false;
        }
        if self.bytes != event.payload {
            return false;
        }

        self.dupes += 1;
        self.dupe_bytes += event.payload.len() as u64;
        if self.dupes % 100 == 0 {
            debug!(
                "{} in {} duplicate packets dropped",
                human_bytes(self.dupe_bytes),
                self.dupes
            );
        }
        true
    }

    /// Remember a successfully delivered event for the next comparison.
    pub fn store(&mut self, event: &Event) {
        self.kind = Some(event.header.kind);
        self.bytes.clear();
        self.bytes.extend_from_slice(&event.payload);
    }

    /// Forget the slot content, e.g. after a failed IPC send.
    pub fn clear(&mut self) {
        self.kind = None;
        self.bytes.clear();
    }

    pub fn dupes(&self) -> u64 {
        self.dupes
    }

    pub fn is_filled(&self) -> bool {
        self.kind.is_some()
    }
}

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB"];
    let mut value = n as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{n} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
