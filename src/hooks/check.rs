//! Check-result hooks
//!
//! Host and service checks run through the same two-phase logic. At
//! precheck time the ownership mapping decides whether this node executes
//! the check at all; at processing time the result becomes a status
//! snapshot for the daemon and the cluster, with loop prevention for
//! results that arrived over the network.

use super::{code_of, CheckPhase};
use crate::dispatch::Dispatcher;
use crate::event::{EventBody, EventCode, EventHeader, EventKind, ObjectStateBody, StatusBody};
use crate::node::NodeHandle;
use crate::object::{CheckResult, CheckType, ExecutingNode, ObjectKey, ObjectKind, ObjectState};
use crate::selection::PEERS_MASTERS;
use tracing::{debug, error};

/// Payload of a host or service check callback.
pub struct CheckCallback<'a> {
    pub phase: CheckPhase,
    pub obj: &'a mut ObjectState,
    /// nebattr value carried through to the status snapshot.
    pub attr: i32,
    /// Check type as reported by the callback itself (may differ from the
    /// object's current one for passive results).
    pub check_type: CheckType,
    pub result: Option<&'a CheckResult>,
}

impl Dispatcher {
    pub(crate) fn hook_check(&mut self, kind: ObjectKind, cb: CheckCallback<'_>) -> i32 {
        match cb.phase {
            CheckPhase::AsyncPrecheck | CheckPhase::SyncPrecheck => self.precheck(kind, cb),
            CheckPhase::Processed => self.check_processed(kind, cb),
        }
    }

    fn precheck(&mut self, kind: ObjectKind, cb: CheckCallback<'_>) -> i32 {
        let node = match kind {
            ObjectKind::Host => self.pgroup.host_check_node(cb.obj.id),
            ObjectKind::Service => self.pgroup.service_check_node(cb.obj.id),
        };

        // Reap the check eventually if the assigned node never reports it.
        self.timer.schedule(kind, node, cb.obj.id);

        if let NodeHandle::Remote(id) = node {
            let is_poller = self
                .nodes
                .node(id)
                .map(|n| n.kind == crate::node::NodeKind::Poller)
                .unwrap_or(false);
            let counters = self.check_counters_mut(kind);
            if is_poller {
                counters.poller += 1;
            } else {
                counters.peer += 1;
            }
            // We're not responsible, so block this check here.
            return super::CALLBACK_CANCEL;
        }

        self.check_counters_mut(kind).self_checks += 1;
        0
    }

    fn check_processed(&mut self, kind: ObjectKind, cb: CheckCallback<'_>) -> i32 {
        let obj = cb.obj;

        self.timer.cancel(kind, obj.id);
        obj.expired = false;

        let mut header = EventHeader::new(match kind {
            ObjectKind::Host => EventKind::HostCheck,
            ObjectKind::Service => EventKind::ServiceCheck,
        });

        if let Some(sender) = self.recv_sender() {
            // Network-received events mustn't bounce back.
            header.code = EventCode::Nonet;
            obj.executing_node = Some(ExecutingNode {
                node: NodeHandle::Remote(sender),
                passive: obj.check_type == CheckType::Passive,
            });
        } else {
            // Locally generated results always go to peers and masters.
            header.selection = PEERS_MASTERS;
            obj.executing_node = Some(ExecutingNode {
                node: NodeHandle::SelfNode,
                passive: cb.check_type == CheckType::Passive,
            });
        }

        // A result we're merely re-injecting on behalf of another node is
        // already on the wire.
        let key = ObjectKey { kind, id: obj.id };
        if self.recv_object() == Some(key) {
            return 0;
        }

        let Some(result) = cb.result else {
            error!(
                "processed {} check for {} carried no check result, \
                 skipping check result propagation",
                kind.name(),
                obj.host_name
            );
            return -1;
        };

        // Align the object's last_check with the report data so log
        // timestamps agree with what the cluster propagates.
        if self.config.rewrite_last_check {
            obj.last_check = result.end_time;
        }

        let mut state = ObjectStateBody::from_check_result(result);
        state.execution_time = obj.execution_time;
        let body = StatusBody {
            host_name: obj.host_name.clone(),
            service_description: obj.service_description.clone(),
            nebattr: cb.attr,
            state,
        };

        // Repeats for the same object arrive back to back; only then is
        // the dupe check worth arming.
        self.dedup.arm(self.last_status_obj == Some(key));
        self.last_status_obj = Some(key);

        let ret = code_of(self.send(header, &EventBody::Status(body)));
        if ret != 0 {
            debug!("couldn't propagate {} check result for {}", kind.name(), obj.host_name);
        }

        // A notification triggered by this result was parked; release it
        // now that the check result is out.
        self.flush_notification();

        ret
    }
}
