//! Node implementation for the ATLAS graph
//!
//! A node is a tagged union: each kind carries exactly its own fields, so a
//! pattern can never hold a `ref_id` and an entity can never hold a `qkit`.

use super::property::{PropertyMap, PropertyValue};
use super::store::{GraphError, GraphResult};
use super::types::{NodeId, NodeKind, RefId};
use indexmap::IndexSet;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Ordered, de-duplicated set of node ids
pub type IdSet = IndexSet<NodeId>;

/// Build an [`IdSet`] from anything convertible to node ids
pub fn id_set<I, T>(ids: I) -> IdSet
where
    I: IntoIterator<Item = T>,
    T: Into<NodeId>,
{
    ids.into_iter().map(Into::into).collect()
}

/// Handle to the transformation behind a prompt interface.
///
/// Invocation belongs to whoever owns the function registry; the graph only
/// records identity.
#[derive(Clone)]
pub enum FunctionHandle {
    /// Name resolved by an external function registry. Persisted.
    Registered(String),
    /// In-process value with no textual form. Never persisted.
    Opaque(Arc<dyn Any + Send + Sync>),
    /// No function bound, e.g. after an opaque handle was truncated on save.
    Unbound,
}

impl FunctionHandle {
    pub fn registered(name: impl Into<String>) -> Self {
        FunctionHandle::Registered(name.into())
    }

    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        FunctionHandle::Opaque(Arc::new(value))
    }

    /// Registry name, if this handle has one
    pub fn name(&self) -> Option<&str> {
        match self {
            FunctionHandle::Registered(name) => Some(name),
            _ => None,
        }
    }

    /// Whether the handle survives a save/load cycle unchanged
    pub fn is_persistable(&self) -> bool {
        !matches!(self, FunctionHandle::Opaque(_))
    }

    /// Borrow the opaque value as a concrete type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            FunctionHandle::Opaque(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for FunctionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionHandle::Registered(name) => f.debug_tuple("Registered").field(name).finish(),
            FunctionHandle::Opaque(_) => f.write_str("Opaque(..)"),
            FunctionHandle::Unbound => f.write_str("Unbound"),
        }
    }
}

impl PartialEq for FunctionHandle {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FunctionHandle::Registered(a), FunctionHandle::Registered(b)) => a == b,
            (FunctionHandle::Opaque(a), FunctionHandle::Opaque(b)) => Arc::ptr_eq(a, b),
            (FunctionHandle::Unbound, FunctionHandle::Unbound) => true,
            _ => false,
        }
    }
}

/// Kind-specific fields of a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Entity {
        attributes: PropertyMap,
        patterns: IdSet,
    },
    Pattern {
        qkit: IdSet,
        parents: IdSet,
        children: IdSet,
    },
    IQuery {
        ref_id: RefId,
        prompts: IdSet,
    },
    Attribute {
        ref_id: RefId,
        attributes: PropertyMap,
        patterns: IdSet,
    },
    PromptInterface {
        function: FunctionHandle,
    },
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Entity { .. } => NodeKind::Entity,
            NodeData::Pattern { .. } => NodeKind::Pattern,
            NodeData::IQuery { .. } => NodeKind::IQuery,
            NodeData::Attribute { .. } => NodeKind::Attribute,
            NodeData::PromptInterface { .. } => NodeKind::PromptInterface,
        }
    }
}

/// Reference from one node field to another node id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef<'a> {
    /// Field holding the reference (e.g. "patterns", "qkit")
    pub field: &'static str,
    /// Kind the referenced node is expected to have
    pub expected: NodeKind,
    pub target: &'a NodeId,
}

/// A node in the ATLAS graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Caller-chosen unique identifier
    pub id: NodeId,

    /// Kind tag and kind-specific fields
    pub data: NodeData,
}

impl Node {
    /// Create a node, validating the fields its kind requires
    pub fn new(id: impl Into<NodeId>, data: NodeData) -> GraphResult<Self> {
        let id = id.into();
        let kind = data.kind();

        if id.is_empty() {
            return Err(GraphError::Validation {
                id,
                kind,
                reason: "node id must not be empty".to_string(),
            });
        }

        if let NodeData::IQuery { ref_id, .. } | NodeData::Attribute { ref_id, .. } = &data {
            if ref_id.is_empty() {
                return Err(GraphError::Validation {
                    id,
                    kind,
                    reason: "ref_id must not be empty".to_string(),
                });
            }
        }

        Ok(Node { id, data })
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// Reference id for iQuery and attribute nodes
    pub fn ref_id(&self) -> Option<&RefId> {
        match &self.data {
            NodeData::IQuery { ref_id, .. } | NodeData::Attribute { ref_id, .. } => Some(ref_id),
            _ => None,
        }
    }

    /// Free-form attributes for entity and attribute nodes
    pub fn attributes(&self) -> Option<&PropertyMap> {
        match &self.data {
            NodeData::Entity { attributes, .. } | NodeData::Attribute { attributes, .. } => {
                Some(attributes)
            }
            _ => None,
        }
    }

    /// Patterns an entity or attribute node conforms to
    pub fn patterns(&self) -> Option<&IdSet> {
        match &self.data {
            NodeData::Entity { patterns, .. } | NodeData::Attribute { patterns, .. } => {
                Some(patterns)
            }
            _ => None,
        }
    }

    /// Every node id mentioned in this node's fields, with the kind it should resolve to
    pub fn references(&self) -> Vec<FieldRef<'_>> {
        fn refs<'a>(field: &'static str, expected: NodeKind, ids: &'a IdSet) -> impl Iterator<Item = FieldRef<'a>> {
            ids.iter().map(move |target| FieldRef { field, expected, target })
        }

        match &self.data {
            NodeData::Entity { patterns, .. } | NodeData::Attribute { patterns, .. } => {
                refs("patterns", NodeKind::Pattern, patterns).collect()
            }
            NodeData::Pattern { qkit, parents, children } => refs("qkit", NodeKind::IQuery, qkit)
                .chain(refs("parents", NodeKind::Pattern, parents))
                .chain(refs("children", NodeKind::Pattern, children))
                .collect(),
            NodeData::IQuery { prompts, .. } => {
                refs("prompts", NodeKind::PromptInterface, prompts).collect()
            }
            NodeData::PromptInterface { .. } => Vec::new(),
        }
    }

    /// Full field map, tagged with `node_type`.
    ///
    /// Sets become arrays of ids. A prompt interface's `function` is its registry
    /// name, or null when the handle is opaque or unbound.
    pub fn fields(&self) -> PropertyMap {
        fn ids(set: &IdSet) -> PropertyValue {
            PropertyValue::Array(set.iter().map(|id| id.as_str().into()).collect())
        }

        let mut fields = PropertyMap::new();
        fields.insert("node_type".to_string(), self.kind().as_str().into());

        match &self.data {
            NodeData::Entity { attributes, patterns } => {
                fields.insert("attributes".to_string(), attributes.clone().into());
                fields.insert("patterns".to_string(), ids(patterns));
            }
            NodeData::Pattern { qkit, parents, children } => {
                fields.insert("qkit".to_string(), ids(qkit));
                fields.insert("parents".to_string(), ids(parents));
                fields.insert("children".to_string(), ids(children));
            }
            NodeData::IQuery { ref_id, prompts } => {
                fields.insert("ref_id".to_string(), ref_id.as_str().into());
                fields.insert("prompts".to_string(), ids(prompts));
            }
            NodeData::Attribute { ref_id, attributes, patterns } => {
                fields.insert("ref_id".to_string(), ref_id.as_str().into());
                fields.insert("attributes".to_string(), attributes.clone().into());
                fields.insert("patterns".to_string(), ids(patterns));
            }
            NodeData::PromptInterface { function } => {
                let value = match function.name() {
                    Some(name) => name.into(),
                    None => PropertyValue::Null,
                };
                fields.insert("function".to_string(), value);
            }
        }

        fields
    }
}
