//! Comment hook
//!
//! Comments are noisy: every add generates an add event and a load event,
//! downtime and acknowledgement commands generate comments of their own,
//! and the daemon's reaper re-adds comments it pulled from the wire. Most
//! of this hook exists to keep those echoes from ping-ponging around the
//! cluster.

use super::{code_of, CommentPhase};
use crate::dispatch::Dispatcher;
use crate::event::{CommentBody, CommentEntryType, EventBody, EventCode, EventHeader, EventKind};
use tracing::debug;

/// Payload of a comment callback.
#[derive(Debug, Clone)]
pub struct CommentCallback {
    pub phase: CommentPhase,
    pub data: CommentBody,
}

impl Dispatcher {
    pub(crate) fn hook_comment(&mut self, cb: CommentCallback) -> i32 {
        // Adds duplicate the load event that follows; keep the load.
        if cb.phase == CommentPhase::Add {
            return 0;
        }

        // Network-triggered comment events never go back out.
        if self.recv_sender().is_some() {
            return 0;
        }

        let mut header = EventHeader::new(EventKind::Comment);
        let data = &cb.data;

        // Downtime and acknowledgement comments stay local: the commands
        // that created them carry the cross-cluster information.
        if data.entry_type == CommentEntryType::Downtime && cb.phase != CommentPhase::Delete {
            header.code = EventCode::Nonet;
        }
        if data.entry_type == CommentEntryType::Acknowledgement && cb.phase != CommentPhase::Delete
        {
            header.code = EventCode::Nonet;
        }

        // The reaper re-adding a comment we already know about must not go
        // to the daemon again, or user and flapping comments bounce back
        // and forth indefinitely.
        let blocked = header.code != EventCode::Nonet
            && self
                .block_comment
                .as_ref()
                .map(|key| key.matches(data))
                .unwrap_or(false);
        if blocked {
            debug!("comment: marking event with no-net magic");
            header.code = EventCode::Nonet;
            self.block_comment = None;
        } else {
            if self.block_comment.is_some() {
                debug!("comment: block comment set, but it doesn't match");
            }
            header.selection = self.selections.host_selection(&data.host_name);
        }

        code_of(self.send(header, &EventBody::Comment(cb.data)))
    }
}
