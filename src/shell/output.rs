//! Results of executed shell commands

use crate::graph::{Edge, EdgeType, InvariantViolation, NodeId, NodeKind, PropertyMap, PropertyValue};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// An edge as shown to shell users: endpoints plus its attribute map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRecord {
    pub source: NodeId,
    pub target: NodeId,
    pub attributes: PropertyMap,
}

impl From<&Edge> for EdgeRecord {
    fn from(edge: &Edge) -> Self {
        EdgeRecord {
            source: edge.source.clone(),
            target: edge.target.clone(),
            attributes: edge.attributes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "output", rename_all = "snake_case")]
pub enum CommandOutput {
    NodeAdded {
        id: NodeId,
        kind: NodeKind,
        replaced: Option<NodeKind>,
    },
    RelationshipAdded {
        source: NodeId,
        target: NodeId,
        relationship_type: EdgeType,
        replaced: bool,
    },
    NodeIds {
        kind: NodeKind,
        ids: Vec<NodeId>,
    },
    Node {
        id: NodeId,
        fields: PropertyMap,
    },
    Relationships {
        id: NodeId,
        edges: Vec<EdgeRecord>,
    },
    EdgeAttributes {
        source: NodeId,
        target: NodeId,
        attributes: PropertyMap,
    },
    Path {
        nodes: Vec<NodeId>,
    },
    Violations {
        violations: Vec<InvariantViolation>,
    },
    Saved {
        path: PathBuf,
        nodes: usize,
        edges: usize,
    },
    Loaded {
        path: PathBuf,
        nodes: usize,
        edges: usize,
    },
    Help {
        text: String,
    },
    Exit,
}

impl CommandOutput {
    pub fn is_exit(&self) -> bool {
        matches!(self, CommandOutput::Exit)
    }
}

fn join_ids(ids: &[NodeId], separator: &str) -> String {
    ids.iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutput::NodeAdded { id, kind, replaced: None } => write!(f, "Added {} {}", kind, id),
            CommandOutput::NodeAdded { id, kind, replaced: Some(previous) } => {
                write!(f, "Replaced {} {} with {}", previous, id, kind)
            }
            CommandOutput::RelationshipAdded { source, target, relationship_type, replaced } => {
                let verb = if *replaced { "Replaced" } else { "Added" };
                write!(f, "{} {} -[{}]-> {}", verb, source, relationship_type, target)
            }
            CommandOutput::NodeIds { kind, ids } => {
                write!(f, "{} nodes ({}): {}", kind, ids.len(), join_ids(ids, ", "))
            }
            CommandOutput::Node { id, fields } => {
                write!(f, "{}", id)?;
                for (key, value) in fields {
                    write!(f, "\n  {}: {}", key, value)?;
                }
                Ok(())
            }
            CommandOutput::Relationships { id, edges } => {
                write!(f, "{} outgoing edge(s) from {}", edges.len(), id)?;
                for edge in edges {
                    write!(f, "\n  {} -> {} {}", edge.source, edge.target, PropertyValue::Map(edge.attributes.clone()))?;
                }
                Ok(())
            }
            CommandOutput::EdgeAttributes { source, target, attributes } => write!(
                f,
                "{} -> {} {}",
                source,
                target,
                PropertyValue::Map(attributes.clone())
            ),
            CommandOutput::Path { nodes } => write!(f, "{}", join_ids(nodes, " -> ")),
            CommandOutput::Violations { violations } if violations.is_empty() => {
                write!(f, "No invariant violations")
            }
            CommandOutput::Violations { violations } => {
                write!(f, "{} invariant violation(s)", violations.len())?;
                for violation in violations {
                    write!(f, "\n  {}", violation)?;
                }
                Ok(())
            }
            CommandOutput::Saved { path, nodes, edges } => write!(
                f,
                "Saved {} nodes and {} edges to {}",
                nodes,
                edges,
                path.display()
            ),
            CommandOutput::Loaded { path, nodes, edges } => write!(
                f,
                "Loaded {} nodes and {} edges from {}",
                nodes,
                edges,
                path.display()
            ),
            CommandOutput::Help { text } => write!(f, "{}", text.trim_end()),
            CommandOutput::Exit => write!(f, "Bye"),
        }
    }
}
