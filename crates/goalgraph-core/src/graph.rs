//! GoalGraph: the id-keyed node store.
//!
//! [`GoalGraph`] is the single owner of every [`Node`] and, through them, of
//! every [`Edge`]. Edges name their endpoints by id, so removing a node can
//! never leave a dangling reference behind as long as the prune operations
//! strip the edges that target it.
//!
//! Nodes are kept in an [`IndexMap`]: iteration follows creation order, and a
//! pruned id that is created again moves to the end. Persistence and
//! resolution both depend on that order being stable.
//!
//! # Create vs. update
//!
//! [`GoalGraph::ensure_node`] is an idempotent create: on an existing id it
//! returns the node untouched and ignores its `kind`/`data` arguments.
//! [`GoalGraph::update_node`] is the only way to change a node's type tag or
//! metadata.

use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::edge::{Edge, EdgeKind};
use crate::error::CoreError;
use crate::metadata::{keys, Metadata};
use crate::node::Node;

/// The goal graph store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalGraph {
    nodes: IndexMap<String, Node>,
}

impl GoalGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Creates the node if absent and returns it.
    ///
    /// When `id` already exists the stored node is returned unchanged and
    /// `kind`/`data` are ignored. Use [`update_node`](Self::update_node) to
    /// change an existing node.
    pub fn ensure_node(&mut self, id: &str, kind: &str, data: Option<Metadata>) -> &Node {
        self.nodes.entry(id.to_string()).or_insert_with(|| {
            debug!(node = id, kind, "created node");
            Node::new(id.to_string(), kind.to_string(), data.unwrap_or_default())
        })
    }

    /// Appends an outgoing edge `source -> target` on the source node.
    ///
    /// Fails with [`CoreError::EndpointNotFound`] naming the first missing
    /// endpoint (source checked first). Identical calls produce parallel
    /// edges.
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        kind: EdgeKind,
    ) -> Result<(), CoreError> {
        for id in [source, target] {
            if !self.nodes.contains_key(id) {
                return Err(CoreError::EndpointNotFound { id: id.to_string() });
            }
        }
        if let Some(node) = self.nodes.get_mut(source) {
            node.edges.push(Edge::new(source, target, kind));
            debug!(source, target, kind = %kind, "added edge");
        }
        Ok(())
    }

    /// Replaces the type tag and/or merges metadata into an existing node.
    ///
    /// An empty `kind` leaves the current type tag in place.
    ///
    /// `data` is merged key-by-key: new keys are added, existing keys are
    /// overwritten, and keys not mentioned are kept.
    pub fn update_node(
        &mut self,
        id: &str,
        kind: Option<&str>,
        data: Option<Metadata>,
    ) -> Result<(), CoreError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| CoreError::NodeNotFound { id: id.to_string() })?;

        if let Some(kind) = kind.filter(|k| !k.is_empty()) {
            node.kind = kind.to_string();
        }
        if let Some(data) = data {
            node.data.merge(data);
        }
        debug!(node = id, "updated node");
        Ok(())
    }

    /// Removes a node and every edge elsewhere in the graph that targets it.
    ///
    /// Edges owned by the removed node leave with it. Returns the removed
    /// node, or `None` (and changes nothing) if `id` is absent.
    pub fn prune_node(&mut self, id: &str) -> Option<Node> {
        let removed = self.nodes.shift_remove(id)?;

        let mut stripped = 0;
        for node in self.nodes.values_mut() {
            let before = node.edges.len();
            node.edges.retain(|edge| edge.target != id);
            stripped += before - node.edges.len();
        }

        debug!(node = id, stripped, "pruned node");
        Some(removed)
    }

    /// Prunes every node whose `failed` metadata is exactly `true`.
    ///
    /// Returns the pruned ids in graph order.
    pub fn prune_failed_nodes(&mut self) -> Vec<String> {
        let failed: Vec<String> = self
            .nodes
            .values()
            .filter(|node| node.data.flag(keys::FAILED))
            .map(|node| node.id.clone())
            .collect();

        for id in &failed {
            self.prune_node(id);
        }

        if !failed.is_empty() {
            info!(count = failed.len(), "pruned failed nodes");
        }
        failed
    }

    /// Removes every node and edge.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Looks up a node by id.
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of edges across all nodes.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(Node::out_degree).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates nodes in graph order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterates edges in node order, then outgoing insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.nodes.values().flat_map(|node| node.edges.iter())
    }

    /// Finds every edge whose target is `id`, paired with its source node.
    ///
    /// Targets hold no back-references, so this scans every edge in the
    /// graph. Pairs come out in node order, then outgoing insertion order.
    pub fn incoming_edges<'a>(
        &'a self,
        id: &'a str,
    ) -> impl Iterator<Item = (&'a Edge, &'a Node)> + 'a {
        self.nodes.values().flat_map(move |node| {
            node.edges
                .iter()
                .filter(move |edge| edge.target == id)
                .map(move |edge| (edge, node))
        })
    }
}

impl fmt::Display for GoalGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GoalGraph({} nodes)", self.nodes.len())
    }
}
