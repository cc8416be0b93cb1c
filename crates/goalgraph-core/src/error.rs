//! Core error types for goalgraph-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of graph mutation and edge-type parsing.

use thiserror::Error;

/// Core errors produced by the goalgraph-core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An update targeted a node id that is not in the graph.
    #[error("node not found: '{id}'")]
    NodeNotFound { id: String },

    /// An edge referenced an endpoint id that is not in the graph.
    #[error("edge endpoint not found: '{id}'")]
    EndpointNotFound { id: String },

    /// An edge-type symbol was not one of AND, OR, IMPLIES, NOT.
    #[error("invalid edge type: '{value}'")]
    InvalidEdgeType { value: String },
}
