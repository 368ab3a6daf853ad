//! Pathfinding algorithms
//!
//! Unweighted shortest path by breadth-first search.

use super::common::{GraphView, NodeId};
use std::collections::VecDeque;

/// Result of a pathfinding algorithm
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathResult {
    pub source: NodeId,
    pub target: NodeId,
    pub path: Vec<NodeId>,
    pub cost: f64,
}

/// Breadth-First Search (Unweighted Shortest Path)
///
/// Edges are followed only in their stored direction. Among several shortest
/// paths the one discovered first wins, i.e. successors are expanded in the
/// order they appear in the view.
pub fn bfs(view: &GraphView, source: NodeId, target: NodeId) -> Option<PathResult> {
    let source_idx = *view.node_to_index.get(&source)?;
    let target_idx = *view.node_to_index.get(&target)?;

    let mut queue = VecDeque::new();
    // index -> parent index; usize::MAX marks "unvisited"
    let mut parent = vec![usize::MAX; view.node_count];
    let mut visited = vec![false; view.node_count];

    queue.push_back(source_idx);
    visited[source_idx] = true;

    while let Some(current_idx) = queue.pop_front() {
        if current_idx == target_idx {
            let mut path = Vec::new();
            let mut curr = target_idx;
            loop {
                path.push(view.index_to_node[curr]);
                if curr == source_idx {
                    break;
                }
                curr = parent[curr];
            }
            path.reverse();
            return Some(PathResult {
                source,
                target,
                cost: (path.len() - 1) as f64,
                path,
            });
        }

        for &next_idx in view.successors(current_idx) {
            if !visited[next_idx] {
                visited[next_idx] = true;
                parent[next_idx] = current_idx;
                queue.push_back(next_idx);
            }
        }
    }

    None
}
