//! ATLAS Network
//!
//! A typed knowledge graph: entities, classification patterns, indirect
//! queries (iQueries), attributes and prompt interfaces, linked by typed
//! directed relationships in one graph.
//!
//! # Modules
//!
//! - [`graph`]: node kinds, edges, the in-memory store and its invariant checks
//! - [`query`]: shortest paths, edge attribute lookup and file persistence
//! - [`persistence`]: the JSON document format
//! - [`shell`]: grammar-based command shell over a session
//! - [`config`]: YAML configuration
//!
//! ## Example Usage
//!
//! ```rust
//! use atlas_network::graph::{id_set, property_map, GraphStore, NodeId, NodeKind};
//! use atlas_network::query;
//!
//! let mut store = GraphStore::new();
//! store.add_entity("CoffeeBean", Some(property_map([("type", "Arabica")])), Some(id_set(["BeanPattern"])))?;
//! store.add_entity("Roaster", None, None)?;
//! store.add_pattern("BeanPattern", None, None, None)?;
//! store.add_relationship("CoffeeBean", "BeanPattern", "conforms_to")?;
//! store.add_relationship("CoffeeBean", "Roaster", "processed_by")?;
//!
//! assert_eq!(store.get_nodes_by_type(NodeKind::Pattern), vec![NodeId::new("BeanPattern")]);
//!
//! let path = query::find_shortest_path(&store, &NodeId::new("CoffeeBean"), &NodeId::new("Roaster"))?;
//! assert_eq!(path.len(), 2);
//! # Ok::<(), atlas_network::GraphError>(())
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod coffee;
pub mod config;
pub mod graph;
pub mod persistence;
pub mod query;
pub mod shell;

// Re-export main types for convenience
pub use graph::{
    Edge, EdgeId, EdgeType, FunctionHandle, GraphError, GraphEvent, GraphResult, GraphStore,
    IdSet, InvariantViolation, Node, NodeData, NodeId, NodeKind, PropertyMap, PropertyValue,
    RefId,
};

pub use config::{AtlasConfig, ConfigError, PersistenceConfig, UnsupportedFieldPolicy};

pub use persistence::{PersistenceError, PersistenceResult};

pub use shell::{Command, CommandOutput, Session, ShellError, ShellResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
