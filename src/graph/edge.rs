//! Edge implementation for the ATLAS graph
//!
//! Edges are directed and always carry a relationship type. Extra key/value
//! properties are optional.

use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, EdgeType, NodeId};

/// A directed, typed edge
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Store-assigned handle
    pub id: EdgeId,

    /// Source node (edge goes FROM this node)
    pub source: NodeId,

    /// Target node (edge goes TO this node)
    pub target: NodeId,

    /// Type of relationship (e.g. "conforms_to", "parent_of")
    pub edge_type: EdgeType,

    /// Extra properties beyond the relationship type
    pub properties: PropertyMap,
}

impl Edge {
    /// Create a new directed edge
    pub fn new(
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        edge_type: impl Into<EdgeType>,
    ) -> Self {
        Self::new_with_properties(id, source, target, edge_type, PropertyMap::new())
    }

    /// Create a new edge with properties
    pub fn new_with_properties(
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        edge_type: impl Into<EdgeType>,
        properties: PropertyMap,
    ) -> Self {
        Edge {
            id,
            source,
            target,
            edge_type: edge_type.into(),
            properties,
        }
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Check if this edge goes FROM a specific node
    pub fn starts_from(&self, node: &NodeId) -> bool {
        &self.source == node
    }

    /// Check if this edge goes TO a specific node
    pub fn ends_at(&self, node: &NodeId) -> bool {
        &self.target == node
    }

    /// (source, target, relationship type)
    pub fn as_triple(&self) -> (&NodeId, &NodeId, &EdgeType) {
        (&self.source, &self.target, &self.edge_type)
    }

    /// Attribute map as exposed to callers: `relationship_type` plus extra properties
    pub fn attributes(&self) -> PropertyMap {
        let mut attributes = PropertyMap::with_capacity(self.properties.len() + 1);
        attributes.insert(
            "relationship_type".to_string(),
            self.edge_type.as_str().into(),
        );
        for (key, value) in &self.properties {
            attributes.insert(key.clone(), value.clone());
        }
        attributes
    }
}
