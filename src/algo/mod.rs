//! Graph algorithms module
//!
//! Algorithms are implemented in the `atlas-graph-algorithms` crate over dense
//! integer views. This module projects a [`GraphStore`] into such a view and
//! maps results back to node ids.

use crate::graph::{EdgeType, GraphStore, NodeId};
use atlas_graph_algorithms::{GraphView, NodeId as AlgoNodeId};

// Re-export algorithms
pub use atlas_graph_algorithms::{bfs, PathResult};

/// Build a GraphView from the store for algorithm execution.
///
/// Every node is included; its dense id is its insertion position. When
/// `edge_type` is given only edges of that relationship type are kept.
/// Successors keep edge insertion order.
pub fn build_view(store: &GraphStore, edge_type: Option<&EdgeType>) -> GraphView {
    let index_to_node: Vec<AlgoNodeId> = (0..store.node_count() as AlgoNodeId).collect();

    let outgoing: Vec<Vec<usize>> = store
        .all_nodes()
        .map(|node| {
            store
                .get_outgoing_edges(&node.id)
                .into_iter()
                .filter(|edge| edge_type.map_or(true, |t| &edge.edge_type == t))
                .filter_map(|edge| store.node_position(&edge.target))
                .collect()
        })
        .collect();

    GraphView::from_adjacency_list(index_to_node, outgoing)
}

/// Dense view id of a node
pub fn view_id(store: &GraphStore, id: &NodeId) -> Option<AlgoNodeId> {
    store.node_position(id).map(|pos| pos as AlgoNodeId)
}

/// Map a dense view path back to node ids
pub fn resolve_path(store: &GraphStore, path: &[AlgoNodeId]) -> Vec<NodeId> {
    path.iter()
        .filter_map(|&pos| store.node_at(pos as usize))
        .map(|node| node.id.clone())
        .collect()
}
