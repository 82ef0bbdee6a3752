//! Downtime hook
//!
//! Downtime is scheduled on every node by the command that always gets
//! transferred, so most downtime events stay local. The exception is a
//! user cancelling downtime early: without transferring the cancel, a
//! notifying node would still believe the object is in downtime.

use super::{code_of, DowntimeAttr};
use crate::dispatch::Dispatcher;
use crate::event::{DowntimeBody, EventBody, EventCode, EventHeader, EventKind};

/// Payload of a downtime callback.
#[derive(Debug, Clone)]
pub struct DowntimeCallback {
    pub attr: DowntimeAttr,
    pub data: DowntimeBody,
}

impl Dispatcher {
    pub(crate) fn hook_downtime(&mut self, cb: DowntimeCallback) -> i32 {
        // Network-triggered downtime events never go back out.
        if self.recv_sender().is_some() {
            return 0;
        }

        let mut header = EventHeader::new(EventKind::Downtime);
        if cb.attr == DowntimeAttr::StopCancelled {
            header.selection = self.selections.host_selection(&cb.data.host_name);
        } else {
            header.code = EventCode::Nonet;
        }

        code_of(self.send(header, &EventBody::Downtime(cb.data)))
    }
}
