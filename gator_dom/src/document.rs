// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, updates, queries, listener records.

use core::cell::RefCell;

use crate::selector::{SelectorError, SelectorList};
use crate::types::{ElementData, NodeId};

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Generational arena of elements.
pub struct Document {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    listeners: RefCell<Vec<ListenerRecord>>,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("listeners", &self.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}

/// A native listener attached to a node.
///
/// The document keeps one record per `add_listener` call and does not
/// collapse duplicates, so a caller that attaches twice is observable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerRecord {
    /// Node the listener is attached to.
    pub node: NodeId,
    /// Event type as passed to `add_listener`.
    pub event_type: String,
    /// Whether the listener runs in the capture phase.
    pub capture: bool,
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: ElementData,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Insert a new element as the last child of `parent` (or as a root if `None`).
    pub fn insert(&mut self, parent: Option<NodeId>, data: ElementData) -> NodeId {
        let node = Node {
            parent: None,
            children: Vec::new(),
            data,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(node);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId indices are 32-bit."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(node));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId indices are 32-bit."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove an element and its subtree, along with their listener records.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.listeners.get_mut().retain(|l| l.node != id);
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move `id` under `new_parent` (or detach it as a root).
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
    }

    /// Returns true if `id` refers to a live element.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(Option::as_ref)
            .is_some()
            && self.generations[id.idx()] == id.generation()
    }

    /// Parent of `id`, if it is live and attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Children of `id` in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Element data of a live node.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.node_opt(id).map(|n| &n.data)
    }

    /// Replace the `id` attribute.
    pub fn set_id(&mut self, id: NodeId, value: Option<&str>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.id = value.map(str::to_owned);
        }
    }

    /// Replace the `class` attribute.
    pub fn set_class_name(&mut self, id: NodeId, value: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.class_name = value.to_owned();
        }
    }

    /// Root→node path (inclusive). Empty if `id` is stale.
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut cur = Some(id);
        while let Some(n) = cur {
            out.push(n);
            cur = self.parent(n);
        }
        out.reverse();
        out
    }

    /// Evaluate `selector` against `id`, like `Element.matches`.
    ///
    /// Unsupported syntax is an error; a stale node never matches.
    pub fn matches(&self, id: NodeId, selector: &str) -> Result<bool, SelectorError> {
        let list = SelectorList::parse(selector)?;
        Ok(list.matches(self, id))
    }

    /// Record a native listener on `node`.
    pub fn add_listener(&self, node: NodeId, event_type: &str, capture: bool) {
        if !self.is_alive(node) {
            return;
        }
        tracing::trace!(?node, event_type, capture, "add listener");
        self.listeners.borrow_mut().push(ListenerRecord {
            node,
            event_type: event_type.to_owned(),
            capture,
        });
    }

    /// Remove one matching listener record. Returns false if none was found.
    pub fn remove_listener(&self, node: NodeId, event_type: &str, capture: bool) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let found = listeners
            .iter()
            .position(|l| l.node == node && l.event_type == event_type && l.capture == capture);
        if let Some(i) = found {
            tracing::trace!(?node, event_type, capture, "remove listener");
            listeners.remove(i);
        }
        found.is_some()
    }

    /// Snapshot of the listener records on `node` for `event_type`, in attach order.
    pub fn listeners_for(&self, node: NodeId, event_type: &str) -> Vec<ListenerRecord> {
        self.listeners
            .borrow()
            .iter()
            .filter(|l| l.node == node && l.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Total number of listener records in the document.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        if !self.is_alive(id) {
            return None;
        }
        self.nodes[id.idx()].as_ref()
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !self.is_alive(id) {
            return None;
        }
        self.nodes[id.idx()].as_mut()
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(n) = self.nodes[parent.idx()].as_mut() {
            n.children.push(id);
        }
        if let Some(n) = self.nodes[id.idx()].as_mut() {
            n.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(n) = self.nodes[parent.idx()].as_mut() {
            n.children.retain(|c| *c != id);
        }
        if let Some(n) = self.nodes[id.idx()].as_mut() {
            n.parent = None;
        }
    }
}
