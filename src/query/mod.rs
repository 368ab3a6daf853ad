//! Query facade
//!
//! Shortest paths, edge attribute lookup, summaries and file persistence over
//! a [`GraphStore`](crate::graph::GraphStore).

pub mod facade;

pub use facade::{
    find_shortest_path, find_shortest_path_via, get_edge_attributes, get_node_attributes,
    get_nodes_by_type, get_relationships, load_from_file, save_to_file, save_to_file_with,
    summarize, GraphSummary,
};
