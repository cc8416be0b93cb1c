//! Goal graphs: prerequisite relationships between steps and the resolver
//! that turns a goal into an ordered plan.
//!
//! # Modules
//!
//! - [`metadata`]: schema-less node metadata bag
//! - [`edge`]: Edge and the AND/OR/IMPLIES/NOT combinator enum
//! - [`node`]: Node (id, type tag, metadata, outgoing edges)
//! - [`graph`]: GoalGraph store with create/update/prune operations
//! - [`resolve`]: PlanResolver goal resolution
//! - [`error`]: CoreError

pub mod edge;
pub mod error;
pub mod graph;
pub mod metadata;
pub mod node;
pub mod resolve;

// Re-export commonly used types
pub use edge::{Edge, EdgeKind};
pub use error::CoreError;
pub use graph::GoalGraph;
pub use metadata::{keys, MetaValue, Metadata};
pub use node::Node;
pub use resolve::{Plan, PlanResolver};
