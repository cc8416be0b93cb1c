//! JSON persistence for goal graphs.
//!
//! The persisted document is the boundary read by external tools such as
//! graph renderers:
//!
//! ```json
//! {
//!   "nodes": [ { "id": "...", "type": "...", "data": { } } ],
//!   "edges": [ { "source": "...", "target": "...", "type": "AND" } ]
//! }
//! ```
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`document`]: GraphDocument records and decompose/recompose
//! - [`codec`]: JsonCodec file and string save/load

pub mod codec;
pub mod document;
pub mod error;

// Re-export key types for ergonomic use.
pub use codec::{load, load_into, save, CodecOptions, JsonCodec};
pub use document::{decompose, recompose, EdgeRecord, GraphDocument, NodeRecord};
pub use error::StorageError;
