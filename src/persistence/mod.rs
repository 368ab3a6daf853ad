//! Persistence layer for the ATLAS graph
//!
//! Saves a whole graph as one self-describing JSON document and loads it back.
//! See [`document`] for the format.

pub mod document;

pub use document::{GraphDocument, StoredEdge, StoredNode, StoredNodeData, FORMAT_NAME, FORMAT_VERSION};

use crate::config::PersistenceConfig;
use crate::graph::{GraphError, GraphStore, InvariantViolation};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Persistence errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document error: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Cannot persist {field} of {owner}: {reason}")]
    UnsupportedField {
        owner: String,
        field: String,
        reason: String,
    },

    #[error("Unsupported document format '{format}' version {version}")]
    UnsupportedFormat { format: String, version: u32 },

    #[error("Graph has {} invariant violation(s); first: {}", .0.len(), first_violation(.0))]
    Integrity(Vec<InvariantViolation>),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

fn first_violation(violations: &[InvariantViolation]) -> String {
    violations
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Serialize a store to a document string
pub fn to_json(store: &GraphStore, config: &PersistenceConfig) -> PersistenceResult<String> {
    if config.verify_integrity {
        let violations = store.check_invariants();
        if !violations.is_empty() {
            return Err(PersistenceError::Integrity(violations));
        }
    }

    let document = GraphDocument::from_store(store, config)?;
    let json = if config.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    Ok(json)
}

/// Rebuild a store from a document string
pub fn from_json(json: &str) -> PersistenceResult<GraphStore> {
    let document: GraphDocument = serde_json::from_str(json)?;
    debug!(
        "Parsed document with {} nodes and {} edges",
        document.nodes.len(),
        document.edges.len()
    );
    document.into_store()
}

/// Write a store to `path`, replacing any existing file
pub fn save_graph(
    store: &GraphStore,
    path: impl AsRef<Path>,
    config: &PersistenceConfig,
) -> PersistenceResult<()> {
    let path = path.as_ref();
    let json = to_json(store, config)?;
    fs::write(path, json)?;

    info!(
        "Saved {} nodes and {} edges to {}",
        store.node_count(),
        store.edge_count(),
        path.display()
    );
    Ok(())
}

/// Read a store from `path`
pub fn load_graph(path: impl AsRef<Path>) -> PersistenceResult<GraphStore> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let store = from_json(&json)?;

    info!(
        "Loaded {} nodes and {} edges from {}",
        store.node_count(),
        store.edge_count(),
        path.display()
    );
    Ok(store)
}
