//! Core graph implementation
//!
//! This module implements the ATLAS data model:
//! - Five node kinds as one tagged union, validated at construction
//! - Directed edges carrying a relationship type and optional properties
//! - One edge per (source, target, type); different types may share a pair
//! - In-memory storage with hash-based indices
//! - Cross-reference checks and the hierarchy implied by `parent_of` edges

pub mod edge;
pub mod event;
pub mod integrity;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::Edge;
pub use event::{EventSink, GraphEvent, TracingSink};
pub use integrity::{InvariantViolation, PatternHierarchy};
pub use node::{id_set, FieldRef, FunctionHandle, IdSet, Node, NodeData};
pub use property::{property_map, PropertyMap, PropertyValue};
pub use store::{GraphError, GraphResult, GraphStore};
pub use types::{EdgeId, EdgeType, NodeId, NodeKind, RefId, UnknownNodeKind, PARENT_OF};
