pub mod bridge;
pub mod codec;
pub mod config;
pub mod dedup;
pub mod dispatch;
pub mod event;
pub mod hold;
pub mod hooks;
pub mod node;
pub mod object;
pub mod ownership;
pub mod registry;
pub mod selection;
pub mod stats;

pub use bridge::{
    ExpirationTimer, HostBroker, IpcChannel, ObjectLookup, PeerGroup, PeerTransport,
};
pub use codec::{decode_body, EventCodec, PostcardCodec};
pub use config::ModuleConfig;
pub use dispatch::{DispatchError, Dispatcher, ReceiveContext};
pub use event::{
    CallbackMask, CommandId, CommentKey, Event, EventBody, EventCode, EventHeader, EventKind,
    NotificationReason, NotificationType,
};
pub use hooks::{
    Callback, CallbackOutcome, CheckCallback, CheckPhase, CommandCallback, CommandPhase,
    CommentCallback, CommentPhase, ContactMethodCallback, ContactMethodPhase, DowntimeAttr,
    DowntimeCallback, NotificationCallback, NotificationPhase, CALLBACK_CANCEL,
};
pub use node::{Node, NodeCfg, NodeDirectory, NodeFlags, NodeHandle, NodeId, NodeKind, SelfInfo};
pub use object::{CheckResult, CheckType, ObjectKey, ObjectKind, ObjectState};
pub use ownership::{owner, owning_peer, should_run_locally};
pub use selection::{
    Selection, SelectionRegistry, BROADCAST, CTRL_GENERIC, DEST_MASTERS, DEST_PEERS,
    DEST_POLLERS, PEERS_MASTERS, PEERS_POLLERS,
};
pub use stats::{CheckCounters, CheckStats, NotifyCounters, NotifyStats};
