//! Dispatch engine
//!
//! Shuffles events from the hook side of the module to the local cluster
//! daemon and to remote nodes, applying the routing mask, duplicate
//! suppression, the notification hold slot, and no-net loop prevention.
//! Runs entirely on the host's event loop; the one-slot buffers are safe
//! because nothing re-enters this code concurrently.

use crate::bridge::{ExpirationTimer, IpcChannel, ObjectLookup, PeerGroup, PeerTransport};
use crate::codec::EventCodec;
use crate::config::ModuleConfig;
use crate::dedup::DedupSlot;
use crate::event::{
    CommentKey, ControlBody, Event, EventBody, EventCode, EventHeader, EventKind,
    NotificationType,
};
use crate::hold::HoldSlot;
use crate::node::{NodeDirectory, NodeId};
use crate::object::{ObjectKey, ObjectKind};
use crate::selection::{self, Selection, CTRL_GENERIC, DEST_MASTERS, DEST_PEERS, DEST_POLLERS};
use crate::stats::{CheckCounters, CheckStats, NotifyStats};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("zero-length encode for {kind:?} callback")]
    EncodeFailed { kind: EventKind },
    #[error("no matching selection for id {selection}")]
    UnknownSelection { selection: Selection },
    #[error("local ipc backlogged")]
    IpcBacklog,
}

/// Context of an event re-injected from the network: who sent it and, for
/// check results, which object it was about. Set around the re-injection
/// so the hooks can tell network-received events from local ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveContext {
    pub sender: NodeId,
    pub object: Option<ObjectKey>,
}

/// The event-distribution core. Owns the mutable one-slot state the hook
/// contract makes race-free and every seam to the outside world.
pub struct Dispatcher {
    pub(crate) config: ModuleConfig,
    pub(crate) nodes: NodeDirectory,
    pub(crate) selections: crate::selection::SelectionRegistry,
    pub(crate) codec: Box<dyn EventCodec>,
    pub(crate) ipc: Box<dyn IpcChannel>,
    pub(crate) net: Box<dyn PeerTransport>,
    pub(crate) pgroup: Box<dyn PeerGroup>,
    pub(crate) timer: Box<dyn ExpirationTimer>,
    pub(crate) lookup: Box<dyn ObjectLookup>,
    pub(crate) dedup: DedupSlot,
    pub(crate) hold: HoldSlot,
    pub(crate) block_comment: Option<CommentKey>,
    pub(crate) recv: Option<ReceiveContext>,
    pub(crate) last_status_obj: Option<ObjectKey>,
    last_pulse: Option<Instant>,
    last_backlog_warning: Option<Instant>,
    pub(crate) check_stats: CheckStats,
    pub(crate) notify_stats: NotifyStats,
}

impl Dispatcher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: ModuleConfig,
        nodes: NodeDirectory,
        selections: crate::selection::SelectionRegistry,
        codec: Box<dyn EventCodec>,
        ipc: Box<dyn IpcChannel>,
        net: Box<dyn PeerTransport>,
        pgroup: Box<dyn PeerGroup>,
        timer: Box<dyn ExpirationTimer>,
        lookup: Box<dyn ObjectLookup>,
    ) -> Self {
        Dispatcher {
            config,
            nodes,
            selections,
            codec,
            ipc,
            net,
            pgroup,
            timer,
            lookup,
            dedup: DedupSlot::new(),
            hold: HoldSlot::new(),
            block_comment: None,
            recv: None,
            last_status_obj: None,
            last_pulse: None,
            last_backlog_warning: None,
            check_stats: CheckStats::default(),
            notify_stats: NotifyStats::new(),
        }
    }

    pub fn nodes(&self) -> &NodeDirectory {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut NodeDirectory {
        &mut self.nodes
    }

    pub fn check_stats(&self) -> &CheckStats {
        &self.check_stats
    }

    pub fn notify_stats(&self) -> &NotifyStats {
        &self.notify_stats
    }

    pub fn duplicate_packets(&self) -> u64 {
        self.dedup.dupes()
    }

    pub fn notification_held(&self) -> bool {
        self.hold.is_occupied()
    }

    /// Arm the one-shot comment echo suppressor. The next comment event
    /// matching every identifying field is kept off the network.
    pub fn set_block_comment(&mut self, comment: Option<CommentKey>) {
        self.block_comment = comment;
    }

    /// A check result reaped as expired on its assigned node. Exposed for
    /// the expiration collaborator's accounting.
    pub fn note_orphaned(&mut self, kind: ObjectKind) {
        self.check_counters_mut(kind).orphaned += 1;
    }

    /// Mark the start of a network-received event re-injection.
    pub fn begin_network_event(&mut self, sender: NodeId, object: Option<ObjectKey>) {
        self.recv = Some(ReceiveContext { sender, object });
    }

    pub fn end_network_event(&mut self) {
        self.recv = None;
    }

    pub(crate) fn recv_sender(&self) -> Option<NodeId> {
        self.recv.map(|ctx| ctx.sender)
    }

    pub(crate) fn recv_object(&self) -> Option<ObjectKey> {
        self.recv.and_then(|ctx| ctx.object)
    }

    pub(crate) fn check_counters_mut(&mut self, kind: ObjectKind) -> &mut CheckCounters {
        match kind {
            ObjectKind::Host => &mut self.check_stats.host,
            ObjectKind::Service => &mut self.check_stats.service,
        }
    }

    /// The send pipeline. Each step may short-circuit; the return value is
    /// the number of network recipients.
    pub fn send(
        &mut self,
        mut header: EventHeader,
        body: &EventBody,
    ) -> Result<usize, DispatchError> {
        let kind = header.kind;
        let nonet = header.code == EventCode::Nonet;
        let no_nodes = self.nodes.num_nodes() == 0;
        let daemon_wants = self.config.daemon_mask.contains(kind);

        if (no_nodes || nonet) && !daemon_wants {
            debug!(
                "ipcfilter: not sending {} event: {}, and daemon doesn't want it",
                kind.name(),
                if nonet { "no-net magic" } else { "no nodes" },
            );
            return Ok(0);
        }

        let payload = self.codec.encode(&header, body);
        if payload.is_empty() {
            error!("zero-length encode for {} callback", kind.name());
            return Err(DispatchError::EncodeFailed { kind });
        }
        header.length = payload.len() as u32;
        let event = Event { header, payload };

        if self.dedup.is_dupe(&event) {
            debug!("ipcfilter: not sending {} event: duplicate packet", kind.name());
            return Ok(0);
        }

        let mut backlogged = false;
        if daemon_wants {
            // Preserve the event for dupe checking, but only if the
            // daemon actually took it.
            if self.ipc.send(&event) < 0 {
                self.dedup.clear();
                backlogged = true;
            } else {
                self.dedup.store(&event);
            }
        }

        if no_nodes {
            return if backlogged { Err(DispatchError::IpcBacklog) } else { Ok(0) };
        }

        let recipients = self.fan_out(&event)?;
        if backlogged {
            return Err(DispatchError::IpcBacklog);
        }
        Ok(recipients)
    }

    fn fan_out(&mut self, event: &Event) -> Result<usize, DispatchError> {
        let header = &event.header;

        // Network-received events must not bounce back: a no-net packet
        // has an empty destination set.
        if header.code == EventCode::Nonet {
            return Ok(0);
        }

        let mut sent = 0;

        // Magic destinations skip all other inspection and go to exactly
        // the flagged groups.
        if selection::is_magic(header.selection) {
            if header.selection & DEST_MASTERS == DEST_MASTERS {
                for node in self.nodes.masters() {
                    self.net.send_to(node, event);
                    sent += 1;
                }
            }
            if header.selection & DEST_PEERS == DEST_PEERS {
                for node in self.nodes.peers() {
                    self.net.send_to(node, event);
                    sent += 1;
                }
            }
            if header.selection & DEST_POLLERS == DEST_POLLERS {
                for node in self.nodes.pollers() {
                    self.net.send_to(node, event);
                    sent += 1;
                }
            }
            return Ok(sent);
        }

        // Normal packets go to all peers and masters; general control
        // packets are for everyone.
        let everyone =
            header.selection == CTRL_GENERIC && header.kind == EventKind::Control;
        let stop = if everyone {
            self.nodes.num_nodes()
        } else {
            self.nodes.num_peers() + self.nodes.num_masters()
        };
        for node in &self.nodes.all()[..stop] {
            self.net.send_to(node, event);
            sent += 1;
        }

        if stop == self.nodes.num_nodes() || self.nodes.num_pollers() == 0 {
            return Ok(sent);
        }

        // What's left is a poller-group subset named by the selection.
        let Some(group) = self.selections.nodes_by_selection_id(header.selection) else {
            error!("no matching selection for id {}", header.selection);
            return Err(DispatchError::UnknownSelection { selection: header.selection });
        };
        for id in group {
            if let Some(node) = self.nodes.node(*id) {
                self.net.send_to(node, event);
                sent += 1;
            }
        }

        Ok(sent)
    }

    /// Release a held notification after its triggering check result.
    pub(crate) fn flush_notification(&mut self) {
        let Some((header, body)) = self.hold.take() else {
            return;
        };

        match body.notification_type {
            NotificationType::Host => {
                debug!("flushing host notification for {}", body.host_name);
            }
            NotificationType::Service => {
                debug!(
                    "flushing service notification for {};{}",
                    body.service_description.as_deref().unwrap_or(""),
                    body.host_name
                );
            }
        }

        if let Err(err) = self.send(header, &EventBody::Notification(body)) {
            debug!("couldn't flush held notification: {err}");
        }
    }

    /// Self-heal nodes that missed the fact that we're up: a CTRL_ACTIVE
    /// pulse to the local daemon, rate-limited to the heartbeat interval.
    pub(crate) fn pulse(&mut self) {
        let now = Instant::now();
        let due = self
            .last_pulse
            .map_or(true, |last| now.duration_since(last) >= self.config.heartbeat_interval);
        if !due {
            return;
        }
        self.last_pulse = Some(now);

        let mut header = EventHeader::new(EventKind::Control);
        header.code = EventCode::CtrlActive;
        header.selection = CTRL_GENERIC;
        let body = EventBody::Control(ControlBody {
            peer_id: self.nodes.self_peer_id(),
            active_peers: self.nodes.active_peers(),
        });
        let payload = self.codec.encode(&header, &body);
        if payload.is_empty() {
            error!("zero-length encode for control heartbeat");
            return;
        }
        header.length = payload.len() as u32;
        if self.ipc.send(&Event { header, payload }) < 0 {
            debug!("heartbeat pulse hit a backlogged ipc channel");
        }
    }

    /// Rate-limited warning when a hook surfaced a failure.
    pub(crate) fn note_result(&mut self, code: i32) {
        if code >= 0 {
            return;
        }
        let now = Instant::now();
        let due = self.last_backlog_warning.map_or(true, |last| {
            now.duration_since(last) >= self.config.backlog_warn_interval
        });
        if due {
            self.last_backlog_warning = Some(now);
            warn!("local daemon is flooded and backlogging failed");
        }
    }
}
