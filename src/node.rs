//! Cluster node directory
//!
//! Three ordered node tables (peers, masters, pollers) built once at
//! configuration time and immutable afterwards, plus a lightweight online
//! bitmap that the transport layer flips as connections come and go. The
//! fan-out code relies on the table layout: peers and masters occupy the
//! contiguous prefix `[0, num_peers + num_masters)` of the combined table.

use serde::{Deserialize, Serialize};

/// Index of a node in the combined directory table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Peer,
    Master,
    Poller,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Peer => "peer",
            NodeKind::Master => "master",
            NodeKind::Poller => "poller",
        }
    }
}

/// Per-node capability flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFlags(pub u32);

impl NodeFlags {
    pub const NONE: NodeFlags = NodeFlags(0);
    /// The node sends its own notifications instead of deferring upward.
    pub const NOTIFIES: NodeFlags = NodeFlags(1 << 0);

    pub fn contains(self, other: NodeFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Either the local node or a remote one. The self-node never appears in
/// the directory tables; it is the sentinel meaning "execute here".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeHandle {
    SelfNode,
    Remote(NodeId),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub flags: NodeFlags,
    /// Position in the peer-ownership ring. Only peers carry one.
    pub peer_id: Option<u32>,
}

/// Configuration-time description of a remote node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeCfg {
    pub name: String,
    #[serde(default)]
    pub flags: NodeFlags,
    #[serde(default)]
    pub peer_id: Option<u32>,
}

impl NodeCfg {
    pub fn new(name: impl Into<String>) -> Self {
        NodeCfg { name: name.into(), flags: NodeFlags::NONE, peer_id: None }
    }
}

/// The local node's identity within the cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfInfo {
    pub name: String,
    pub peer_id: u32,
    #[serde(default)]
    pub flags: NodeFlags,
}

/// Static node tables plus runtime online state.
#[derive(Debug, Clone)]
pub struct NodeDirectory {
    nodes: Vec<Node>,
    num_peers: usize,
    num_masters: usize,
    num_pollers: usize,
    online: Vec<bool>,
    self_info: SelfInfo,
}

impl NodeDirectory {
    /// Build the directory. Peers without an explicit `peer_id` get one
    /// assigned by table order; the combined table is laid out as
    /// peers ++ masters ++ pollers.
    pub fn new(
        self_info: SelfInfo,
        peers: Vec<NodeCfg>,
        masters: Vec<NodeCfg>,
        pollers: Vec<NodeCfg>,
    ) -> Self {
        let num_peers = peers.len();
        let num_masters = masters.len();
        let num_pollers = pollers.len();
        let mut nodes = Vec::with_capacity(num_peers + num_masters + num_pollers);

        let mut next_peer_id = 0u32;
        for cfg in peers {
            let peer_id = cfg.peer_id.unwrap_or_else(|| {
                while next_peer_id == self_info.peer_id {
                    next_peer_id += 1;
                }
                let id = next_peer_id;
                next_peer_id += 1;
                id
            });
            nodes.push(Node {
                id: NodeId(nodes.len() as u16),
                name: cfg.name,
                kind: NodeKind::Peer,
                flags: cfg.flags,
                peer_id: Some(peer_id),
            });
        }
        for cfg in masters {
            nodes.push(Node {
                id: NodeId(nodes.len() as u16),
                name: cfg.name,
                kind: NodeKind::Master,
                flags: cfg.flags,
                peer_id: None,
            });
        }
        for cfg in pollers {
            nodes.push(Node {
                id: NodeId(nodes.len() as u16),
                name: cfg.name,
                kind: NodeKind::Poller,
                flags: cfg.flags,
                peer_id: None,
            });
        }

        let online = vec![true; nodes.len()];
        NodeDirectory { nodes, num_peers, num_masters, num_pollers, online, self_info }
    }

    /// Directory for a standalone node.
    pub fn standalone(self_info: SelfInfo) -> Self {
        NodeDirectory::new(self_info, Vec::new(), Vec::new(), Vec::new())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// All nodes, peers and masters first.
    pub fn all(&self) -> &[Node] {
        &self.nodes
    }

    pub fn peers(&self) -> &[Node] {
        &self.nodes[..self.num_peers]
    }

    pub fn masters(&self) -> &[Node] {
        &self.nodes[self.num_peers..self.num_peers + self.num_masters]
    }

    pub fn pollers(&self) -> &[Node] {
        &self.nodes[self.num_peers + self.num_masters..]
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_peers(&self) -> usize {
        self.num_peers
    }

    pub fn num_masters(&self) -> usize {
        self.num_masters
    }

    pub fn num_pollers(&self) -> usize {
        self.num_pollers
    }

    pub fn set_online(&mut self, id: NodeId, online: bool) {
        if let Some(slot) = self.online.get_mut(id.0 as usize) {
            *slot = online;
        }
    }

    pub fn is_online(&self, id: NodeId) -> bool {
        self.online.get(id.0 as usize).copied().unwrap_or(false)
    }

    /// Peers currently reachable. The ownership ring spans these plus self.
    pub fn active_peers(&self) -> u32 {
        self.peers().iter().filter(|n| self.is_online(n.id)).count() as u32
    }

    pub fn online_masters(&self) -> usize {
        self.masters().iter().filter(|n| self.is_online(n.id)).count()
    }

    pub fn self_peer_id(&self) -> u32 {
        self.self_info.peer_id
    }

    pub fn self_flags(&self) -> NodeFlags {
        self.self_info.flags
    }

    pub fn self_name(&self) -> &str {
        &self.self_info.name
    }

    pub fn peer_by_peer_id(&self, peer_id: u32) -> Option<&Node> {
        self.peers().iter().find(|n| n.peer_id == Some(peer_id))
    }

    /// Human name for a notification-owner index: self, a peer, or unknown.
    pub fn owner_name(&self, peer_id: u32) -> &str {
        if peer_id == self.self_info.peer_id {
            self.self_name()
        } else {
            self.peer_by_peer_id(peer_id).map(|n| n.name.as_str()).unwrap_or("<unknown>")
        }
    }
}
