//! Core type definitions for the ATLAS graph

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Caller-chosen, globally unique identifier for a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

/// Relationship type carried by every edge (e.g. "conforms_to", "parent_of")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EdgeType(String);

impl EdgeType {
    pub fn new(edge_type: impl Into<String>) -> Self {
        EdgeType(edge_type.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The relationship type that encodes pattern hierarchy edges
    pub fn parent_of() -> Self {
        EdgeType::new(PARENT_OF)
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EdgeType {
    fn from(s: String) -> Self {
        EdgeType(s)
    }
}

impl From<&str> for EdgeType {
    fn from(s: &str) -> Self {
        EdgeType(s.to_string())
    }
}

/// Relationship type linking a parent pattern to a child pattern
pub const PARENT_OF: &str = "parent_of";

/// Reference identifier joining iQuery and attribute nodes.
///
/// Not a node id: two nodes sharing a `RefId` are related by convention only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RefId(String);

impl RefId {
    pub fn new(ref_id: impl Into<String>) -> Self {
        RefId(ref_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RefId {
    fn from(s: String) -> Self {
        RefId(s)
    }
}

impl From<&str> for RefId {
    fn from(s: &str) -> Self {
        RefId(s.to_string())
    }
}

/// Discriminant of the five node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Entity,
    Pattern,
    #[serde(rename = "iquery")]
    IQuery,
    Attribute,
    PromptInterface,
}

impl NodeKind {
    /// All kinds, in the order they are usually reported
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Entity,
        NodeKind::Pattern,
        NodeKind::IQuery,
        NodeKind::Attribute,
        NodeKind::PromptInterface,
    ];

    /// The `node_type` tag used in field maps and persisted documents
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Entity => "entity",
            NodeKind::Pattern => "pattern",
            NodeKind::IQuery => "iquery",
            NodeKind::Attribute => "attribute",
            NodeKind::PromptInterface => "prompt_interface",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a string names no node kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown node kind: {0}")]
pub struct UnknownNodeKind(pub String);

impl FromStr for NodeKind {
    type Err = UnknownNodeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownNodeKind(s.to_string()))
    }
}

/// Dense handle for an edge inside a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        EdgeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new("CoffeeBean");
        assert_eq!(id.as_str(), "CoffeeBean");
        assert_eq!(format!("{}", id), "CoffeeBean");

        let id2: NodeId = "Roaster".into();
        assert_eq!(id2.as_str(), "Roaster");
        assert!(NodeId::new("").is_empty());
    }

    #[test]
    fn test_edge_type() {
        let edge_type = EdgeType::new("conforms_to");
        assert_eq!(edge_type.as_str(), "conforms_to");
        assert_eq!(EdgeType::parent_of().as_str(), PARENT_OF);
    }

    #[test]
    fn test_node_kind_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.as_str().parse::<NodeKind>(), Ok(kind));
        }
        assert_eq!(
            "widget".parse::<NodeKind>(),
            Err(UnknownNodeKind("widget".to_string()))
        );
    }

    #[test]
    fn test_node_kind_serde_tag() {
        let json = serde_json::to_string(&NodeKind::IQuery).unwrap();
        assert_eq!(json, "\"iquery\"");
        let json = serde_json::to_string(&NodeKind::PromptInterface).unwrap();
        assert_eq!(json, "\"prompt_interface\"");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&RefId::new("BID1")).unwrap();
        assert_eq!(json, "\"BID1\"");
    }
}
