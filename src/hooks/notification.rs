//! Notification hooks
//!
//! A notification chain starting is the one place where a node may have
//! to veto work the host already decided to do: only one node in the
//! cluster should page anybody about a given object. The decision walks a
//! fixed rule ladder; every cancel carries a reason string the host logs.
//! Chain ends are propagated to peers and masters, deferred behind their
//! triggering check result unless they were custom or network-received.

use super::{code_of, CallbackOutcome, NotificationPhase};
use crate::dispatch::Dispatcher;
use crate::event::{
    EventBody, EventHeader, EventKind, NotificationBody, NotificationReason, NotificationType,
};
use crate::node::{NodeFlags, NodeKind};
use crate::object::{CheckType, ObjectState};
use crate::ownership;
use crate::selection::PEERS_MASTERS;
use tracing::debug;

/// Payload of a notification callback.
pub struct NotificationCallback<'a> {
    pub phase: NotificationPhase,
    pub notification_type: NotificationType,
    pub reason: NotificationReason,
    pub obj: &'a mut ObjectState,
    pub output: String,
    pub ack_author: String,
    pub ack_data: String,
    pub contacts_notified: u32,
}

impl Dispatcher {
    pub(crate) fn hook_notification(&mut self, cb: NotificationCallback<'_>) -> CallbackOutcome {
        match cb.phase {
            NotificationPhase::End => CallbackOutcome::Plain(self.notification_end(cb)),
            NotificationPhase::Start => self.notification_start(cb),
        }
    }

    fn notification_end(&mut self, cb: NotificationCallback<'_>) -> i32 {
        // Always propagate results to peers and masters.
        let mut header = EventHeader::new(EventKind::Notification);
        header.selection = PEERS_MASTERS;

        let obj = &*cb.obj;
        let body = NotificationBody {
            notification_type: cb.notification_type,
            reason: cb.reason,
            host_name: obj.host_name.clone(),
            service_description: obj.service_description.clone(),
            output: cb.output,
            ack_author: cb.ack_author,
            ack_data: cb.ack_data,
            contacts_notified: cb.contacts_notified,
            notification_number: obj.current_notification_number,
            last_notification: obj.last_notification,
            next_notification: obj.next_notification,
            no_more_notifications: obj.no_more_notifications,
        };

        // Custom notifications have no pending check result to ride
        // behind, and network-received ones were our own responsibility to
        // send right away. Everything else waits for the check result so
        // the receiver doesn't have it overwritten.
        if cb.reason == NotificationReason::Custom || self.recv_sender().is_some() {
            code_of(self.send(header, &EventBody::Notification(body)))
        } else {
            match self.hold.hold(header, body) {
                Ok(()) => 0,
                Err(_) => -1,
            }
        }
    }

    fn notification_start(&mut self, cb: NotificationCallback<'_>) -> CallbackOutcome {
        let obj = &*cb.obj;
        let id = obj.id;
        let check_type = obj.check_type;
        let reason = cb.reason;
        let ntype = cb.notification_type;

        match ntype {
            NotificationType::Service => debug!(
                "notif: checking service notification for {};{}",
                obj.host_name,
                obj.service_description.as_deref().unwrap_or("")
            ),
            NotificationType::Host => {
                debug!("notif: checking host notification for {}", obj.host_name)
            }
        }

        let notifying_node = ownership::owning_peer(&self.nodes, id);
        let owning_name = self.nodes.owner_name(notifying_node).to_owned();

        // A notifying master outranks us unless we notify ourselves.
        if self.nodes.online_masters() > 0
            && !self.nodes.self_flags().contains(NodeFlags::NOTIFIES)
        {
            debug!("notif: blocking notification in favour of master");
            self.notify_stats.bucket_mut(reason, ntype, check_type).master += 1;
            return CallbackOutcome::cancel("Notification will be handled by master(s)");
        }

        // Network-received events can go one of two ways: a poller that
        // notifies on its own keeps the notification; otherwise we take it
        // if the object is ours, or leave it to the owning peer.
        if let Some(sender_id) = self.recv_sender() {
            if let Some(sender) = self.nodes.node(sender_id) {
                debug!("notif: sender is {} {}", sender.kind.name(), sender.name);

                if sender.kind == NodeKind::Poller && sender.flags.contains(NodeFlags::NOTIFIES) {
                    debug!("notif: poller can notify, cancelling notification");
                    return CallbackOutcome::cancel(format!(
                        "Notification will be handled by a poller ({})",
                        sender.name
                    ));
                }
                if sender.kind == NodeKind::Peer && sender.peer_id == Some(notifying_node) {
                    debug!("notif: peer handles its own notifications, cancelling");
                    return CallbackOutcome::cancel(format!(
                        "Notification will be handled by owning peer ({})",
                        sender.name
                    ));
                }
            }

            if self.nodes.num_peers() == 0 || ownership::should_run_locally(&self.nodes, id) {
                debug!("notif: we're responsible, so notifying");
                self.notify_stats.bucket_mut(reason, ntype, check_type).sent += 1;
                return CallbackOutcome::ok();
            }

            debug!("notif: a peer handles the sender's check, blocking notification");
            self.notify_stats.bucket_mut(reason, ntype, check_type).peer += 1;
            let sender_name = self
                .nodes
                .node(sender_id)
                .map(|n| n.name.clone())
                .unwrap_or_else(|| "<unknown>".into());
            return CallbackOutcome::cancel(format!(
                "Notification originating on {sender_name} will be handled \
                 by another peer ({owning_name})"
            ));
        }

        // Never block normal, local notifications from passive checks.
        if check_type == CheckType::Passive && reason == NotificationReason::Normal {
            debug!("notif: passive check delivered to us, so we notify");
            self.notify_stats.bucket_mut(reason, ntype, check_type).sent += 1;
            return CallbackOutcome::ok();
        }

        if self.nodes.num_peers() == 0 {
            debug!("notif: we have no peers, so won't block notification");
            self.notify_stats.bucket_mut(reason, ntype, check_type).sent += 1;
            return CallbackOutcome::ok();
        }

        // Command-triggered notifications are sent immediately from the
        // node where they originated and blocked everywhere else.
        if matches!(
            reason,
            NotificationReason::Acknowledgement | NotificationReason::Custom
        ) {
            debug!("notif: command-triggered and delivered to us, so allowing");
            self.notify_stats.bucket_mut(reason, ntype, check_type).sent += 1;
            return CallbackOutcome::ok();
        }

        if ownership::should_run_locally(&self.nodes, id) {
            debug!("notif: we're responsible for this notification, so allowing it");
            return CallbackOutcome::ok();
        }

        debug!("notif: blocking notification, a peer is supposed to send it");
        self.notify_stats.bucket_mut(reason, ntype, check_type).peer += 1;
        CallbackOutcome::cancel(format!(
            "A peer ({owning_name}) is supposed to send this notification"
        ))
    }
}
