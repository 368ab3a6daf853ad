//! Serialized form of a graph
//!
//! ```json
//! {"format":"atlas-graph","version":1,"directed":true,"nodes":[...],"edges":[...]}
//! ```
//!
//! Each node carries its `node_type` tag next to its kind fields; id sets are
//! written as arrays in insertion order.

use super::{PersistenceError, PersistenceResult};
use crate::config::{PersistenceConfig, UnsupportedFieldPolicy};
use crate::graph::{
    Edge, FunctionHandle, GraphStore, IdSet, Node, NodeData, NodeId, PropertyMap, RefId,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const FORMAT_NAME: &str = "atlas-graph";
pub const FORMAT_VERSION: u32 = 1;

/// Top-level persisted document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    pub format: String,
    pub version: u32,
    pub directed: bool,
    #[serde(default)]
    pub nodes: Vec<StoredNode>,
    #[serde(default)]
    pub edges: Vec<StoredEdge>,
}

/// Serialized node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredNode {
    pub id: NodeId,
    #[serde(flatten)]
    pub data: StoredNodeData,
}

/// Kind fields, tagged by `node_type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node_type", rename_all = "snake_case")]
pub enum StoredNodeData {
    Entity {
        #[serde(default)]
        attributes: PropertyMap,
        #[serde(default)]
        patterns: Vec<NodeId>,
    },
    Pattern {
        #[serde(default)]
        qkit: Vec<NodeId>,
        #[serde(default)]
        parents: Vec<NodeId>,
        #[serde(default)]
        children: Vec<NodeId>,
    },
    #[serde(rename = "iquery")]
    IQuery {
        ref_id: RefId,
        #[serde(default)]
        prompts: Vec<NodeId>,
    },
    Attribute {
        ref_id: RefId,
        #[serde(default)]
        attributes: PropertyMap,
        #[serde(default)]
        patterns: Vec<NodeId>,
    },
    PromptInterface {
        /// Registry name of the function; null when unbound or truncated
        function: Option<String>,
        #[serde(default, skip_serializing_if = "is_false")]
        function_truncated: bool,
    },
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Serialized edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub relationship_type: String,
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub properties: PropertyMap,
}

fn ids(set: &IdSet) -> Vec<NodeId> {
    set.iter().cloned().collect()
}

fn id_set(ids: Vec<NodeId>) -> IdSet {
    ids.into_iter().collect()
}

fn ensure_finite(owner: &str, field: &str, map: &PropertyMap) -> PersistenceResult<()> {
    for (key, value) in map {
        if value.contains_non_finite() {
            return Err(PersistenceError::UnsupportedField {
                owner: owner.to_string(),
                field: format!("{}.{}", field, key),
                reason: "non-finite float".to_string(),
            });
        }
    }
    Ok(())
}

impl StoredNode {
    fn from_node(node: &Node, config: &PersistenceConfig) -> PersistenceResult<Self> {
        let owner = format!("node {}", node.id);
        let data = match &node.data {
            NodeData::Entity { attributes, patterns } => {
                ensure_finite(&owner, "attributes", attributes)?;
                StoredNodeData::Entity {
                    attributes: attributes.clone(),
                    patterns: ids(patterns),
                }
            }
            NodeData::Pattern { qkit, parents, children } => StoredNodeData::Pattern {
                qkit: ids(qkit),
                parents: ids(parents),
                children: ids(children),
            },
            NodeData::IQuery { ref_id, prompts } => StoredNodeData::IQuery {
                ref_id: ref_id.clone(),
                prompts: ids(prompts),
            },
            NodeData::Attribute { ref_id, attributes, patterns } => {
                ensure_finite(&owner, "attributes", attributes)?;
                StoredNodeData::Attribute {
                    ref_id: ref_id.clone(),
                    attributes: attributes.clone(),
                    patterns: ids(patterns),
                }
            }
            NodeData::PromptInterface { function } => match function {
                FunctionHandle::Registered(name) => StoredNodeData::PromptInterface {
                    function: Some(name.clone()),
                    function_truncated: false,
                },
                FunctionHandle::Unbound => StoredNodeData::PromptInterface {
                    function: None,
                    function_truncated: false,
                },
                FunctionHandle::Opaque(_) => match config.unsupported_fields {
                    UnsupportedFieldPolicy::Reject => {
                        return Err(PersistenceError::UnsupportedField {
                            owner,
                            field: "function".to_string(),
                            reason: "opaque function handle has no textual form".to_string(),
                        });
                    }
                    UnsupportedFieldPolicy::Truncate => {
                        warn!("Truncating opaque function of prompt interface {}", node.id);
                        StoredNodeData::PromptInterface {
                            function: None,
                            function_truncated: true,
                        }
                    }
                },
            },
        };

        Ok(StoredNode {
            id: node.id.clone(),
            data,
        })
    }

    fn into_node(self) -> PersistenceResult<Node> {
        let data = match self.data {
            StoredNodeData::Entity { attributes, patterns } => NodeData::Entity {
                attributes,
                patterns: id_set(patterns),
            },
            StoredNodeData::Pattern { qkit, parents, children } => NodeData::Pattern {
                qkit: id_set(qkit),
                parents: id_set(parents),
                children: id_set(children),
            },
            StoredNodeData::IQuery { ref_id, prompts } => NodeData::IQuery {
                ref_id,
                prompts: id_set(prompts),
            },
            StoredNodeData::Attribute { ref_id, attributes, patterns } => NodeData::Attribute {
                ref_id,
                attributes,
                patterns: id_set(patterns),
            },
            StoredNodeData::PromptInterface { function, function_truncated } => {
                if function_truncated {
                    warn!("Prompt interface {} was saved without its function; loading it unbound", self.id);
                }
                NodeData::PromptInterface {
                    function: function.map_or(FunctionHandle::Unbound, FunctionHandle::Registered),
                }
            }
        };

        Ok(Node::new(self.id, data)?)
    }
}

impl StoredEdge {
    fn from_edge(edge: &Edge) -> PersistenceResult<Self> {
        let owner = format!("edge {} -> {} ({})", edge.source, edge.target, edge.edge_type);
        ensure_finite(&owner, "properties", &edge.properties)?;

        Ok(StoredEdge {
            source: edge.source.clone(),
            target: edge.target.clone(),
            relationship_type: edge.edge_type.as_str().to_string(),
            properties: edge.properties.clone(),
        })
    }
}

impl GraphDocument {
    /// Snapshot every node and edge of a store, in insertion order
    pub fn from_store(store: &GraphStore, config: &PersistenceConfig) -> PersistenceResult<Self> {
        let nodes = store
            .all_nodes()
            .map(|node| StoredNode::from_node(node, config))
            .collect::<PersistenceResult<Vec<_>>>()?;
        let edges = store
            .all_edges()
            .map(StoredEdge::from_edge)
            .collect::<PersistenceResult<Vec<_>>>()?;

        Ok(GraphDocument {
            format: FORMAT_NAME.to_string(),
            version: FORMAT_VERSION,
            directed: true,
            nodes,
            edges,
        })
    }

    /// Rebuild a store. Nodes are inserted before edges.
    pub fn into_store(self) -> PersistenceResult<GraphStore> {
        if self.format != FORMAT_NAME || self.version != FORMAT_VERSION || !self.directed {
            return Err(PersistenceError::UnsupportedFormat {
                format: self.format,
                version: self.version,
            });
        }

        let mut store = GraphStore::new();
        for stored in self.nodes {
            store.insert_node(stored.into_node()?);
        }
        for edge in self.edges {
            store.add_relationship_with_properties(
                edge.source,
                edge.target,
                edge.relationship_type,
                edge.properties,
            )?;
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{id_set as ids_of, property_map, GraphError, PropertyValue};

    #[test]
    fn test_node_json_shape() {
        let mut store = GraphStore::new();
        store.add_iquery("BeanQuery", "BID1", ids_of(["BeanPrompt"])).unwrap();

        let doc = GraphDocument::from_store(&store, &PersistenceConfig::default()).unwrap();
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["format"], "atlas-graph");
        assert_eq!(json["version"], 1);
        assert_eq!(json["directed"], true);
        assert_eq!(
            json["nodes"][0],
            serde_json::json!({
                "id": "BeanQuery",
                "node_type": "iquery",
                "ref_id": "BID1",
                "prompts": ["BeanPrompt"]
            })
        );
    }

    #[test]
    fn test_edge_properties_omitted_when_empty() {
        let mut store = GraphStore::new();
        store.add_entity("A", None, None).unwrap();
        store.add_entity("B", None, None).unwrap();
        store.add_relationship("A", "B", "uses").unwrap();

        let doc = GraphDocument::from_store(&store, &PersistenceConfig::default()).unwrap();
        let json = serde_json::to_value(&doc.edges[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"source": "A", "target": "B", "relationship_type": "uses"})
        );
    }

    #[test]
    fn test_opaque_function_policies() {
        let mut store = GraphStore::new();
        store
            .add_prompt_interface("BeanPrompt", FunctionHandle::opaque(|x: i32| x))
            .unwrap();

        let doc = GraphDocument::from_store(&store, &PersistenceConfig::default()).unwrap();
        assert_eq!(
            doc.nodes[0].data,
            StoredNodeData::PromptInterface { function: None, function_truncated: true }
        );

        let result = GraphDocument::from_store(&store, &PersistenceConfig::strict());
        assert!(matches!(result, Err(PersistenceError::UnsupportedField { .. })));
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let mut store = GraphStore::new();
        store
            .add_entity("X", Some(property_map([("score", f64::NAN)])), None)
            .unwrap();

        let result = GraphDocument::from_store(&store, &PersistenceConfig::default());
        match result {
            Err(PersistenceError::UnsupportedField { field, .. }) => {
                assert_eq!(field, "attributes.score")
            }
            other => panic!("expected UnsupportedField, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{
            "format": "atlas-graph", "version": 1, "directed": true,
            "nodes": [{"id": "P", "node_type": "pattern"}, {"id": "F", "node_type": "prompt_interface", "function": "echo"}]
        }"#;
        let doc: GraphDocument = serde_json::from_str(json).unwrap();
        let store = doc.into_store().unwrap();

        assert_eq!(store.node_count(), 2);
        assert_eq!(store.edge_count(), 0);
        let fields = store.get_node_attributes(&NodeId::new("F")).unwrap();
        assert_eq!(fields.get("function"), Some(&PropertyValue::from("echo")));
    }

    #[test]
    fn test_wrong_format_rejected() {
        let doc = GraphDocument {
            format: "graphml".to_string(),
            version: 1,
            directed: true,
            nodes: vec![],
            edges: vec![],
        };
        assert!(matches!(doc.into_store(), Err(PersistenceError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_unknown_version_or_undirected_rejected() {
        for (version, directed) in [(2, true), (FORMAT_VERSION, false)] {
            let doc = GraphDocument {
                format: FORMAT_NAME.to_string(),
                version,
                directed,
                nodes: vec![],
                edges: vec![],
            };
            match doc.into_store() {
                Err(PersistenceError::UnsupportedFormat { version: v, .. }) => assert_eq!(v, version),
                other => panic!("expected UnsupportedFormat, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_dangling_edge_rejected_on_load() {
        let json = r#"{
            "format": "atlas-graph", "version": 1, "directed": true,
            "nodes": [{"id": "A", "node_type": "entity"}],
            "edges": [{"source": "A", "target": "Ghost", "relationship_type": "uses"}]
        }"#;
        let doc: GraphDocument = serde_json::from_str(json).unwrap();
        match doc.into_store() {
            Err(PersistenceError::Graph(GraphError::InvalidEdgeTarget(id))) => {
                assert_eq!(id, NodeId::new("Ghost"))
            }
            other => panic!("expected InvalidEdgeTarget, got {:?}", other),
        }
    }
}
