//! Notification hold slot
//!
//! A notification and its triggering check result arrive on adjacent
//! callbacks. Sent in intake order, the check result would overwrite
//! notification state on the receiver, so the notification is parked here
//! and released right after the check result goes out. One slot suffices:
//! the host serializes callbacks for a single object.

use crate::event::{EventHeader, NotificationBody, NotificationType};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HoldError {
    #[error("a notification packet is already being held")]
    Occupied,
}

#[derive(Debug, Default)]
pub struct HoldSlot {
    held: Option<(EventHeader, NotificationBody)>,
}

impl HoldSlot {
    pub fn new() -> Self {
        HoldSlot::default()
    }

    /// Park a notification until the next check result is dispatched. A
    /// second hold while the slot is occupied is a logic error; the new
    /// packet is refused and the held one kept.
    pub fn hold(&mut self, header: EventHeader, body: NotificationBody) -> Result<(), HoldError> {
        if self.held.is_some() {
            error!(
                "possible bug: couldn't hold a notification packet because \
                 one is already being held"
            );
            return Err(HoldError::Occupied);
        }

        match body.notification_type {
            NotificationType::Host => {
                debug!("holding host notification for {}", body.host_name);
            }
            NotificationType::Service => {
                debug!(
                    "holding service notification for {};{}",
                    body.service_description.as_deref().unwrap_or(""),
                    body.host_name
                );
            }
        }

        self.held = Some((header, body));
        Ok(())
    }

    pub fn take(&mut self) -> Option<(EventHeader, NotificationBody)> {
        self.held.take()
    }

    pub fn is_occupied(&self) -> bool {
        self.held.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventHeader, EventKind, NotificationReason};

    fn body(host: &str) -> NotificationBody {
        NotificationBody {
            notification_type: NotificationType::Host,
            reason: NotificationReason::Normal,
            host_name: host.into(),
            service_description: None,
            output: "down".into(),
            ack_author: String::new(),
            ack_data: String::new(),
            contacts_notified: 1,
            notification_number: 1,
            last_notification: 0,
            next_notification: 0,
            no_more_notifications: false,
        }
    }

    #[test]
    fn hold_then_take_roundtrips() {
        let mut slot = HoldSlot::new();
        let header = EventHeader::new(EventKind::Notification);
        assert!(slot.hold(header, body("web01")).is_ok());
        assert!(slot.is_occupied());
        let (_, held) = slot.take().unwrap();
        assert_eq!(held.host_name, "web01");
        assert!(!slot.is_occupied());
    }

    #[test]
    fn collision_keeps_the_first_packet() {
        let mut slot = HoldSlot::new();
        let header = EventHeader::new(EventKind::Notification);
        slot.hold(header, body("web01")).unwrap();
        assert_eq!(slot.hold(header, body("web02")), Err(HoldError::Occupied));
        let (_, held) = slot.take().unwrap();
        assert_eq!(held.host_name, "web01");
    }
}
