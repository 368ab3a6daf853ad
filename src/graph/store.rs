//! In-memory graph storage implementation
//!
//! One directed graph holding every node kind. Nodes are keyed by their
//! caller-chosen id and keep first-insertion order; edges live in an arena
//! indexed by [`EdgeId`] and are never removed.

use super::edge::Edge;
use super::event::{EventSink, GraphEvent};
use super::node::{FunctionHandle, IdSet, Node, NodeData};
use super::property::PropertyMap;
use super::types::{EdgeId, EdgeType, NodeId, NodeKind, RefId};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("No edge from {from} to {to}{}", type_suffix(.relationship_type))]
    EdgeNotFound {
        from: NodeId,
        to: NodeId,
        relationship_type: Option<EdgeType>,
    },

    #[error("{count} edges connect {from} to {to}; a relationship type is required")]
    AmbiguousEdge {
        from: NodeId,
        to: NodeId,
        count: usize,
    },

    #[error("No path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("Invalid edge: source node {0} does not exist")]
    InvalidEdgeSource(NodeId),

    #[error("Invalid edge: target node {0} does not exist")]
    InvalidEdgeTarget(NodeId),

    #[error("Invalid {kind} node '{id}': {reason}")]
    Validation {
        id: NodeId,
        kind: NodeKind,
        reason: String,
    },

    #[error("Invalid relationship from {from} to {to}: {reason}")]
    InvalidRelationship {
        from: NodeId,
        to: NodeId,
        reason: String,
    },
}

fn type_suffix(relationship_type: &Option<EdgeType>) -> String {
    match relationship_type {
        Some(t) => format!(" of type {}", t),
        None => String::new(),
    }
}

impl GraphError {
    /// Lookup misses: absent node, absent edge, or no path
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GraphError::NodeNotFound(_) | GraphError::EdgeNotFound { .. } | GraphError::NoPath { .. }
        )
    }

    /// Rejected writes: malformed fields or dangling edge endpoints
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GraphError::Validation { .. }
                | GraphError::InvalidRelationship { .. }
                | GraphError::InvalidEdgeSource(_)
                | GraphError::InvalidEdgeTarget(_)
        )
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

/// In-memory graph storage
///
/// Uses hash maps for O(1) lookup performance:
/// - nodes: NodeId -> Node (insertion ordered)
/// - edges: EdgeId -> Edge (arena)
/// - outgoing / incoming: NodeId -> Vec<EdgeId> (adjacency lists)
/// - edge_pairs: (source, target) -> Vec<EdgeId>, one entry per relationship type
/// - kind_index / ref_index / edge_type_index for filtered scans
pub struct GraphStore {
    nodes: IndexMap<NodeId, Node>,

    edges: Vec<Edge>,

    outgoing: FxHashMap<NodeId, Vec<EdgeId>>,

    incoming: FxHashMap<NodeId, Vec<EdgeId>>,

    edge_pairs: FxHashMap<(NodeId, NodeId), Vec<EdgeId>>,

    kind_index: FxHashMap<NodeKind, FxHashSet<NodeId>>,

    ref_index: FxHashMap<RefId, IndexSet<NodeId>>,

    edge_type_index: FxHashMap<EdgeType, Vec<EdgeId>>,

    sinks: Vec<Box<dyn EventSink>>,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        GraphStore {
            nodes: IndexMap::new(),
            edges: Vec::new(),
            outgoing: FxHashMap::default(),
            incoming: FxHashMap::default(),
            edge_pairs: FxHashMap::default(),
            kind_index: FxHashMap::default(),
            ref_index: FxHashMap::default(),
            edge_type_index: FxHashMap::default(),
            sinks: Vec::new(),
        }
    }

    /// Builder-style variant of [`GraphStore::add_sink`]
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.add_sink(sink);
        self
    }

    /// Subscribe an observer to every subsequent mutation
    pub fn add_sink(&mut self, sink: impl EventSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    fn emit(&self, event: GraphEvent) {
        for sink in &self.sinks {
            sink.on_event(&event);
        }
    }

    /// Insert or overwrite a fully-built node.
    ///
    /// Returns the kind of the node that was replaced, if any. An overwritten
    /// node keeps its position in insertion order and its edges.
    pub fn insert_node(&mut self, node: Node) -> Option<NodeKind> {
        let id = node.id.clone();
        let kind = node.kind();

        if let Some(ref_id) = node.ref_id() {
            self.ref_index
                .entry(ref_id.clone())
                .or_default()
                .insert(id.clone());
        }
        self.kind_index
            .entry(kind)
            .or_default()
            .insert(id.clone());

        let previous = self.nodes.insert(id.clone(), node);
        let replaced = previous.map(|old| {
            let old_kind = old.kind();
            if old_kind != kind {
                if let Some(ids) = self.kind_index.get_mut(&old_kind) {
                    ids.remove(&id);
                }
            }
            if let Some(old_ref) = old.ref_id() {
                let still_same = self.nodes.get(&id).and_then(Node::ref_id) == Some(old_ref);
                if !still_same {
                    if let Some(ids) = self.ref_index.get_mut(old_ref) {
                        ids.shift_remove(&id);
                    }
                }
            }
            old_kind
        });

        self.emit(GraphEvent::NodeAdded {
            id,
            kind,
            replaced,
        });
        replaced
    }

    fn add_node_data(&mut self, id: NodeId, data: NodeData) -> GraphResult<()> {
        let node = Node::new(id, data)?;
        self.insert_node(node);
        Ok(())
    }

    /// Add (or overwrite) an entity node. Missing fields default to empty.
    pub fn add_entity(
        &mut self,
        id: impl Into<NodeId>,
        attributes: Option<PropertyMap>,
        patterns: Option<IdSet>,
    ) -> GraphResult<()> {
        self.add_node_data(
            id.into(),
            NodeData::Entity {
                attributes: attributes.unwrap_or_default(),
                patterns: patterns.unwrap_or_default(),
            },
        )
    }

    /// Add (or overwrite) a pattern node.
    ///
    /// Parent/child lists are stored as given; the referenced patterns are
    /// neither checked nor updated. See [`GraphStore::check_invariants`].
    pub fn add_pattern(
        &mut self,
        id: impl Into<NodeId>,
        qkit: Option<IdSet>,
        parents: Option<IdSet>,
        children: Option<IdSet>,
    ) -> GraphResult<()> {
        self.add_node_data(
            id.into(),
            NodeData::Pattern {
                qkit: qkit.unwrap_or_default(),
                parents: parents.unwrap_or_default(),
                children: children.unwrap_or_default(),
            },
        )
    }

    /// Add (or overwrite) an iQuery node
    pub fn add_iquery(
        &mut self,
        id: impl Into<NodeId>,
        ref_id: impl Into<RefId>,
        prompts: IdSet,
    ) -> GraphResult<()> {
        self.add_node_data(
            id.into(),
            NodeData::IQuery {
                ref_id: ref_id.into(),
                prompts,
            },
        )
    }

    /// Add (or overwrite) an attribute node
    pub fn add_attribute(
        &mut self,
        id: impl Into<NodeId>,
        ref_id: impl Into<RefId>,
        attributes: Option<PropertyMap>,
        patterns: Option<IdSet>,
    ) -> GraphResult<()> {
        self.add_node_data(
            id.into(),
            NodeData::Attribute {
                ref_id: ref_id.into(),
                attributes: attributes.unwrap_or_default(),
                patterns: patterns.unwrap_or_default(),
            },
        )
    }

    /// Add (or overwrite) a prompt interface node
    pub fn add_prompt_interface(
        &mut self,
        id: impl Into<NodeId>,
        function: FunctionHandle,
    ) -> GraphResult<()> {
        self.add_node_data(id.into(), NodeData::PromptInterface { function })
    }

    /// Add a directed relationship between two existing nodes
    pub fn add_relationship(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        relationship_type: impl Into<EdgeType>,
    ) -> GraphResult<EdgeId> {
        self.add_relationship_with_properties(source, target, relationship_type, PropertyMap::new())
    }

    /// Add a directed relationship carrying extra properties.
    ///
    /// Re-adding the same (source, target, type) edge replaces its properties
    /// and keeps its id.
    pub fn add_relationship_with_properties(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        relationship_type: impl Into<EdgeType>,
        properties: PropertyMap,
    ) -> GraphResult<EdgeId> {
        let source = source.into();
        let target = target.into();
        let edge_type = relationship_type.into();

        if !self.has_node(&source) {
            return Err(GraphError::InvalidEdgeSource(source));
        }
        if !self.has_node(&target) {
            return Err(GraphError::InvalidEdgeTarget(target));
        }
        if edge_type.as_str().is_empty() {
            return Err(GraphError::InvalidRelationship {
                from: source,
                to: target,
                reason: "relationship type must not be empty".to_string(),
            });
        }
        if properties.contains_key("relationship_type") {
            return Err(GraphError::InvalidRelationship {
                from: source,
                to: target,
                reason: "'relationship_type' is reserved".to_string(),
            });
        }

        if let Some(existing) = self.find_edge_id(&source, &target, &edge_type) {
            self.edges[existing.as_u64() as usize].properties = properties;
            self.emit(GraphEvent::RelationshipAdded {
                source,
                target,
                relationship_type: edge_type,
                replaced: true,
            });
            return Ok(existing);
        }

        let edge_id = EdgeId::new(self.edges.len() as u64);

        self.outgoing.entry(source.clone()).or_default().push(edge_id);
        self.incoming.entry(target.clone()).or_default().push(edge_id);
        self.edge_pairs
            .entry((source.clone(), target.clone()))
            .or_default()
            .push(edge_id);
        self.edge_type_index
            .entry(edge_type.clone())
            .or_default()
            .push(edge_id);

        self.edges.push(Edge::new_with_properties(
            edge_id,
            source.clone(),
            target.clone(),
            edge_type.clone(),
            properties,
        ));

        self.emit(GraphEvent::RelationshipAdded {
            source,
            target,
            relationship_type: edge_type,
            replaced: false,
        });
        Ok(edge_id)
    }

    fn find_edge_id(&self, source: &NodeId, target: &NodeId, edge_type: &EdgeType) -> Option<EdgeId> {
        self.edge_pairs
            .get(&(source.clone(), target.clone()))?
            .iter()
            .copied()
            .find(|id| &self.edges[id.as_u64() as usize].edge_type == edge_type)
    }

    /// Get a node by id
    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Check if node exists
    pub fn has_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Position of a node in insertion order
    pub fn node_position(&self, id: &NodeId) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    /// Node at a position in insertion order
    pub fn node_at(&self, position: usize) -> Option<&Node> {
        self.nodes.get_index(position).map(|(_, node)| node)
    }

    /// Get an edge by handle
    pub fn edge_by_id(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.as_u64() as usize)
    }

    /// Get the edge of one relationship type between an ordered pair
    pub fn get_edge(&self, source: &NodeId, target: &NodeId, edge_type: &EdgeType) -> Option<&Edge> {
        self.find_edge_id(source, target, edge_type)
            .and_then(|id| self.edge_by_id(id))
    }

    /// All edges from `source` to `target`, one per relationship type
    pub fn edges_between(&self, source: &NodeId, target: &NodeId) -> Vec<&Edge> {
        self.edge_pairs
            .get(&(source.clone(), target.clone()))
            .map(|ids| ids.iter().filter_map(|&id| self.edge_by_id(id)).collect())
            .unwrap_or_default()
    }

    /// Get all outgoing edges from a node, in insertion order
    pub fn get_outgoing_edges(&self, node_id: &NodeId) -> Vec<&Edge> {
        self.outgoing
            .get(node_id)
            .map(|ids| ids.iter().filter_map(|&id| self.edge_by_id(id)).collect())
            .unwrap_or_default()
    }

    /// Get all incoming edges to a node, in insertion order
    pub fn get_incoming_edges(&self, node_id: &NodeId) -> Vec<&Edge> {
        self.incoming
            .get(node_id)
            .map(|ids| ids.iter().filter_map(|&id| self.edge_by_id(id)).collect())
            .unwrap_or_default()
    }

    /// Get all edges of a relationship type
    pub fn get_edges_by_type(&self, edge_type: &EdgeType) -> Vec<&Edge> {
        self.edge_type_index
            .get(edge_type)
            .map(|ids| ids.iter().filter_map(|&id| self.edge_by_id(id)).collect())
            .unwrap_or_default()
    }

    /// Ids of every node of one kind, in store insertion order
    pub fn get_nodes_by_type(&self, kind: NodeKind) -> Vec<NodeId> {
        let Some(ids) = self.kind_index.get(&kind) else {
            return Vec::new();
        };

        let mut positioned: Vec<(usize, &NodeId)> = ids
            .iter()
            .filter_map(|id| self.node_position(id).map(|pos| (pos, id)))
            .collect();
        positioned.sort_unstable_by_key(|(pos, _)| *pos);
        positioned.into_iter().map(|(_, id)| id.clone()).collect()
    }

    /// iQuery and attribute nodes sharing a reference id, in insertion order
    pub fn get_nodes_by_ref_id(&self, ref_id: &RefId) -> Vec<&Node> {
        let Some(ids) = self.ref_index.get(ref_id) else {
            return Vec::new();
        };

        let mut nodes: Vec<&Node> = ids.iter().filter_map(|id| self.get_node(id)).collect();
        nodes.sort_unstable_by_key(|node| self.node_position(&node.id));
        nodes
    }

    /// Full field map of a node, including its `node_type`
    pub fn get_node_attributes(&self, id: &NodeId) -> GraphResult<PropertyMap> {
        self.get_node(id)
            .map(Node::fields)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))
    }

    /// Outgoing relationships of a node, optionally restricted to one type.
    ///
    /// An existing node without edges yields an empty list; an absent node is
    /// an error.
    pub fn get_relationships(
        &self,
        id: &NodeId,
        relationship_type: Option<&EdgeType>,
    ) -> GraphResult<Vec<&Edge>> {
        if !self.has_node(id) {
            return Err(GraphError::NodeNotFound(id.clone()));
        }

        let edges = self.get_outgoing_edges(id);
        Ok(match relationship_type {
            Some(t) => edges.into_iter().filter(|e| &e.edge_type == t).collect(),
            None => edges,
        })
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All nodes, in insertion order
    pub fn all_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges, in insertion order
    pub fn all_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphStore")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
