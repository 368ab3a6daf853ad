//! Read-side operations over a [`GraphStore`]
//!
//! Functions here are stateless. Node and edge lookups that the store already
//! answers are delegated to it unchanged.

use crate::algo::{bfs, build_view, resolve_path, view_id};
use crate::config::PersistenceConfig;
use crate::graph::{
    Edge, EdgeType, GraphError, GraphResult, GraphStore, NodeId, NodeKind, PropertyMap,
};
use crate::persistence::{self, PersistenceResult};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Unweighted shortest path following edge direction.
///
/// Among equally short paths the one through earlier-inserted edges wins.
pub fn find_shortest_path(
    store: &GraphStore,
    source: &NodeId,
    target: &NodeId,
) -> GraphResult<Vec<NodeId>> {
    shortest_path(store, source, target, None)
}

/// Shortest path using only edges of one relationship type
pub fn find_shortest_path_via(
    store: &GraphStore,
    source: &NodeId,
    target: &NodeId,
    relationship_type: &EdgeType,
) -> GraphResult<Vec<NodeId>> {
    shortest_path(store, source, target, Some(relationship_type))
}

fn shortest_path(
    store: &GraphStore,
    source: &NodeId,
    target: &NodeId,
    relationship_type: Option<&EdgeType>,
) -> GraphResult<Vec<NodeId>> {
    let source_id = view_id(store, source).ok_or_else(|| GraphError::NodeNotFound(source.clone()))?;
    let target_id = view_id(store, target).ok_or_else(|| GraphError::NodeNotFound(target.clone()))?;

    if source == target {
        return Ok(vec![source.clone()]);
    }

    let view = build_view(store, relationship_type);
    let result = bfs(&view, source_id, target_id).ok_or_else(|| GraphError::NoPath {
        from: source.clone(),
        to: target.clone(),
    })?;

    let path = resolve_path(store, &result.path);
    debug!("Shortest path {} -> {}: {} hops", source, target, result.cost);
    Ok(path)
}

/// Attribute map of the edge from `source` to `target`.
///
/// Without a relationship type the pair must be joined by exactly one edge.
pub fn get_edge_attributes(
    store: &GraphStore,
    source: &NodeId,
    target: &NodeId,
    relationship_type: Option<&EdgeType>,
) -> GraphResult<PropertyMap> {
    let not_found = || GraphError::EdgeNotFound {
        from: source.clone(),
        to: target.clone(),
        relationship_type: relationship_type.cloned(),
    };

    let edge = match relationship_type {
        Some(t) => store.get_edge(source, target, t).ok_or_else(not_found)?,
        None => {
            let edges = store.edges_between(source, target);
            match edges.as_slice() {
                [] => return Err(not_found()),
                [edge] => *edge,
                _ => {
                    return Err(GraphError::AmbiguousEdge {
                        from: source.clone(),
                        to: target.clone(),
                        count: edges.len(),
                    })
                }
            }
        }
    };

    Ok(edge.attributes())
}

/// See [`GraphStore::get_node_attributes`]
pub fn get_node_attributes(store: &GraphStore, id: &NodeId) -> GraphResult<PropertyMap> {
    store.get_node_attributes(id)
}

/// See [`GraphStore::get_nodes_by_type`]
pub fn get_nodes_by_type(store: &GraphStore, kind: NodeKind) -> Vec<NodeId> {
    store.get_nodes_by_type(kind)
}

/// See [`GraphStore::get_relationships`]
pub fn get_relationships<'a>(
    store: &'a GraphStore,
    id: &NodeId,
    relationship_type: Option<&EdgeType>,
) -> GraphResult<Vec<&'a Edge>> {
    store.get_relationships(id, relationship_type)
}

/// Save with the default persistence settings
pub fn save_to_file(store: &GraphStore, path: impl AsRef<Path>) -> PersistenceResult<()> {
    persistence::save_graph(store, path, &PersistenceConfig::default())
}

pub fn save_to_file_with(
    store: &GraphStore,
    path: impl AsRef<Path>,
    config: &PersistenceConfig,
) -> PersistenceResult<()> {
    persistence::save_graph(store, path, config)
}

pub fn load_from_file(path: impl AsRef<Path>) -> PersistenceResult<GraphStore> {
    persistence::load_graph(path)
}

/// Node counts per kind plus the edge total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub nodes: IndexMap<NodeKind, Vec<NodeId>>,
    pub edge_count: usize,
    pub relationship_types: IndexMap<EdgeType, usize>,
}

impl GraphSummary {
    pub fn node_count(&self) -> usize {
        self.nodes.values().map(Vec::len).sum()
    }
}

/// Group node ids by kind and count edges per relationship type
pub fn summarize(store: &GraphStore) -> GraphSummary {
    let nodes = NodeKind::ALL
        .into_iter()
        .map(|kind| (kind, store.get_nodes_by_type(kind)))
        .collect();

    let mut relationship_types: IndexMap<EdgeType, usize> = IndexMap::new();
    for edge in store.all_edges() {
        *relationship_types.entry(edge.edge_type.clone()).or_default() += 1;
    }

    GraphSummary {
        nodes,
        edge_count: store.edge_count(),
        relationship_types,
    }
}
