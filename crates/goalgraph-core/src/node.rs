//! Graph nodes.
//!
//! A [`Node`] carries a free-form type tag (`"event"`, `"tool"`, `"goal"`,
//! ...), a schema-less [`Metadata`] bag, and the outgoing [`Edge`]s it owns.
//! Fields are read-only from outside the crate; all mutation goes through
//! [`GoalGraph`](crate::graph::GoalGraph).

use std::fmt;

use crate::edge::Edge;
use crate::metadata::Metadata;

/// A vertex in the goal graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: String,
    pub(crate) kind: String,
    pub(crate) data: Metadata,
    pub(crate) edges: Vec<Edge>,
}

impl Node {
    pub(crate) fn new(id: String, kind: String, data: Metadata) -> Self {
        Node {
            id,
            kind,
            data,
            edges: Vec::new(),
        }
    }

    /// The unique node id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The free-form type tag (serialized as `type`).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The metadata bag.
    pub fn data(&self) -> &Metadata {
        &self.data
    }

    /// Outgoing edges in insertion order.
    pub fn outgoing(&self) -> &[Edge] {
        &self.edges
    }

    pub fn out_degree(&self) -> usize {
        self.edges.len()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({}, type={})", self.id, self.kind)
    }
}
