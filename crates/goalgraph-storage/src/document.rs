//! Decompose/recompose conversions between GoalGraph and the JSON document.
//!
//! [`decompose`] flattens a [`GoalGraph`] into a [`GraphDocument`]: one
//! record per node in graph order, and one record per edge in node order then
//! outgoing insertion order. [`recompose`] rebuilds a graph from a document,
//! adding every node before any edge so edges may reference nodes listed
//! after their source.
//!
//! Document shape:
//!
//! ```json
//! {
//!   "nodes": [ { "id": "iron", "type": "item", "data": {} } ],
//!   "edges": [ { "source": "iron", "target": "pickaxe", "type": "IMPLIES" } ]
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use goalgraph_core::{EdgeKind, GoalGraph, Metadata};

use crate::error::StorageError;

/// The persisted form of a goal graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

/// One node: id, type tag and metadata bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Missing or `null` in hand-written documents means an empty bag.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Metadata,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Metadata, D::Error> {
    Ok(Option::<Metadata>::deserialize(deserializer)?.unwrap_or_default())
}

/// One edge. The type stays a raw string here so an unknown symbol surfaces
/// as `InvalidEdgeType` from recomposition rather than as a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Flattens a graph into its document form.
pub fn decompose(graph: &GoalGraph) -> GraphDocument {
    let nodes = graph
        .nodes()
        .map(|node| NodeRecord {
            id: node.id().to_string(),
            kind: node.kind().to_string(),
            data: node.data().clone(),
        })
        .collect();

    let edges = graph
        .edges()
        .map(|edge| EdgeRecord {
            source: edge.source.clone(),
            target: edge.target.clone(),
            kind: edge.kind.as_str().to_string(),
        })
        .collect();

    GraphDocument { nodes, edges }
}

/// Rebuilds a graph from its document form.
///
/// Nodes go through the idempotent create, so a repeated id keeps its first
/// record. Each edge's type is parsed before its endpoints are checked.
pub fn recompose(document: GraphDocument) -> Result<GoalGraph, StorageError> {
    let mut graph = GoalGraph::new();

    for record in document.nodes {
        graph.ensure_node(&record.id, &record.kind, Some(record.data));
    }

    for record in &document.edges {
        let kind: EdgeKind = record.kind.parse()?;
        graph.add_edge(&record.source, &record.target, kind)?;
    }

    Ok(graph)
}
