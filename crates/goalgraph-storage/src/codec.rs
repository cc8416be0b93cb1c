//! File and string codec for goal graph documents.
//!
//! [`JsonCodec`] writes and reads the [`GraphDocument`] JSON format. Writes go
//! straight to the target path (no temp-file-and-rename), so a crash while
//! saving can leave a truncated file behind.
//!
//! The free functions [`save`], [`load`] and [`load_into`] use
//! [`CodecOptions::default()`].

use std::fs;
use std::path::Path;

use tracing::debug;

use goalgraph_core::GoalGraph;

use crate::document::{decompose, recompose, GraphDocument};
use crate::error::StorageError;

/// Output settings for the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Indent output with two spaces. When `false`, writes a single line.
    pub pretty: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        CodecOptions { pretty: true }
    }
}

/// JSON codec for [`GoalGraph`].
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    options: CodecOptions,
}

impl JsonCodec {
    pub fn new(options: CodecOptions) -> Self {
        JsonCodec { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Serializes the graph to a JSON string.
    pub fn to_json_string(&self, graph: &GoalGraph) -> Result<String, StorageError> {
        let document = decompose(graph);
        let text = if self.options.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(text)
    }

    /// Parses a JSON string into a new graph.
    pub fn from_json_str(&self, text: &str) -> Result<GoalGraph, StorageError> {
        let document: GraphDocument = serde_json::from_str(text)?;
        recompose(document)
    }

    /// Writes the graph to `path`, creating missing parent directories.
    pub fn save(&self, graph: &GoalGraph, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let text = self.to_json_string(graph)?;
        fs::write(path, text)?;

        debug!(
            path = %path.display(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "saved graph"
        );
        Ok(())
    }

    /// Reads a graph from `path`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<GoalGraph, StorageError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let graph = self.from_json_str(&text)?;

        debug!(
            path = %path.display(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "loaded graph"
        );
        Ok(graph)
    }

    /// Replaces the contents of `graph` with the graph stored at `path`.
    ///
    /// On error `graph` is left as it was.
    pub fn load_into(
        &self,
        graph: &mut GoalGraph,
        path: impl AsRef<Path>,
    ) -> Result<(), StorageError> {
        *graph = self.load(path)?;
        Ok(())
    }
}

/// Writes the graph to `path` with default options.
pub fn save(graph: &GoalGraph, path: impl AsRef<Path>) -> Result<(), StorageError> {
    JsonCodec::default().save(graph, path)
}

/// Reads a graph from `path`.
pub fn load(path: impl AsRef<Path>) -> Result<GoalGraph, StorageError> {
    JsonCodec::default().load(path)
}

/// Replaces the contents of `graph` with the graph stored at `path`.
pub fn load_into(graph: &mut GoalGraph, path: impl AsRef<Path>) -> Result<(), StorageError> {
    JsonCodec::default().load_into(graph, path)
}
