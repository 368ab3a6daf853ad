//! Graph mutation events
//!
//! The store never logs on its own. Observers subscribe through [`EventSink`]
//! and decide what to do with each change.

use super::types::{EdgeType, NodeId, NodeKind};
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    NodeAdded {
        id: NodeId,
        kind: NodeKind,
        /// Kind of the node this one overwrote, if the id was already present
        replaced: Option<NodeKind>,
    },
    RelationshipAdded {
        source: NodeId,
        target: NodeId,
        relationship_type: EdgeType,
        /// True when the same (source, target, type) edge already existed
        replaced: bool,
    },
}

/// Receiver of graph mutation events
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &GraphEvent);
}

impl<F> EventSink for F
where
    F: Fn(&GraphEvent) + Send + Sync,
{
    fn on_event(&self, event: &GraphEvent) {
        self(event)
    }
}

/// Sink that reports every mutation through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_event(&self, event: &GraphEvent) {
        match event {
            GraphEvent::NodeAdded { id, kind, replaced: None } => {
                info!("Added {}: {}", kind, id);
            }
            GraphEvent::NodeAdded { id, kind, replaced: Some(previous) } => {
                info!("Replaced {} {} with {}", previous, id, kind);
            }
            GraphEvent::RelationshipAdded { source, target, relationship_type, replaced } => {
                if *replaced {
                    info!("Replaced relationship from {} to {} of type {}", source, target, relationship_type);
                } else {
                    info!("Added relationship from {} to {} of type {}", source, target, relationship_type);
                }
            }
        }
    }
}
