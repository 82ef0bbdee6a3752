//! Routing selections
//!
//! A selection is a 16-bit routing token carried in every event header.
//! Values below [`MAGIC_BIT`] name a poller group registered at config
//! time; values with the magic bit set compose the three destination
//! flags into fixed fan-out groups. [`BROADCAST`] doubles as
//! [`CTRL_GENERIC`], the selection control packets use to reach every
//! configured node.

use crate::node::NodeId;
use std::collections::HashMap;

pub type Selection = u16;

/// High bit separating symbolic destinations from poller-group ids.
pub const MAGIC_BIT: Selection = 0x8000;

pub const DEST_MASTERS: Selection = MAGIC_BIT | 0x0001;
pub const DEST_PEERS: Selection = MAGIC_BIT | 0x0002;
pub const DEST_POLLERS: Selection = MAGIC_BIT | 0x0004;

pub const PEERS_MASTERS: Selection = DEST_PEERS | DEST_MASTERS;
pub const PEERS_POLLERS: Selection = DEST_PEERS | DEST_POLLERS;

pub const BROADCAST: Selection = 0xffff;
pub const CTRL_GENERIC: Selection = 0xffff;

/// A magic destination bypasses the normal peers-and-masters fan-out and
/// goes to exactly the flagged groups. `BROADCAST` is not magic: it is the
/// initial don't-care value every packet starts with.
pub fn is_magic(sel: Selection) -> bool {
    sel != BROADCAST && sel & MAGIC_BIT != 0
}

pub fn is_poller_group(sel: Selection) -> bool {
    sel & MAGIC_BIT == 0
}

/// Object-name and hostgroup-name to poller-group mappings, read-only for
/// the dispatch path. Populated by the configuration loader.
#[derive(Debug, Clone, Default)]
pub struct SelectionRegistry {
    by_hostname: HashMap<String, Selection>,
    by_hostgroup: HashMap<String, Selection>,
    groups: HashMap<Selection, Vec<NodeId>>,
}

impl SelectionRegistry {
    pub fn new() -> Self {
        SelectionRegistry::default()
    }

    pub fn register_hostname(&mut self, name: impl Into<String>, sel: Selection) {
        self.by_hostname.insert(name.into(), sel & !MAGIC_BIT);
    }

    pub fn register_hostgroup(&mut self, name: impl Into<String>, sel: Selection) {
        self.by_hostgroup.insert(name.into(), sel & !MAGIC_BIT);
    }

    pub fn register_group(&mut self, sel: Selection, nodes: Vec<NodeId>) {
        self.groups.insert(sel & !MAGIC_BIT, nodes);
    }

    pub fn selection_by_hostname(&self, name: &str) -> Option<Selection> {
        self.by_hostname.get(name).copied()
    }

    pub fn selection_by_hostgroup(&self, name: &str) -> Option<Selection> {
        self.by_hostgroup.get(name).copied()
    }

    /// Poller nodes belonging to a selection id.
    pub fn nodes_by_selection_id(&self, sel: Selection) -> Option<&[NodeId]> {
        self.groups.get(&sel).map(Vec::as_slice)
    }

    /// Routing for an event about a named host. Hosts nobody registered
    /// stay between peers and masters.
    pub fn host_selection(&self, name: &str) -> Selection {
        self.selection_by_hostname(name).unwrap_or(PEERS_MASTERS)
    }

    /// Routing for a hostgroup-wide event. Unregistered groups fan out to
    /// peers and pollers.
    pub fn hostgroup_selection(&self, name: &str) -> Selection {
        self.selection_by_hostgroup(name).unwrap_or(PEERS_POLLERS)
    }

    /// Selection for an external-command argument string. The object name
    /// is everything up to the first semicolon.
    pub fn command_selection(&self, args: &str, hostgroup: bool) -> Selection {
        let key = args.split(';').next().unwrap_or("");
        if hostgroup {
            self.hostgroup_selection(key)
        } else {
            self.host_selection(key)
        }
    }
}
