//! Cross-reference checks over a populated graph
//!
//! Pattern lists, qkits and prompt lists are caller supplied and stored as-is.
//! Nothing here rejects writes; the checks report what does not line up.

use super::node::{IdSet, NodeData};
use super::store::GraphStore;
use super::types::{EdgeType, NodeId, NodeKind, RefId};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// One inconsistency found by [`GraphStore::check_invariants`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum InvariantViolation {
    /// A list field names an id that is absent or of the wrong kind
    DanglingReference {
        node: NodeId,
        field: &'static str,
        target: NodeId,
        expected: NodeKind,
        found: Option<NodeKind>,
    },
    /// One side of a parent/child pair does not list the other
    AsymmetricHierarchy {
        parent: NodeId,
        child: NodeId,
        declared_by: NodeId,
    },
    /// An attribute whose ref id is shared by no iquery
    OrphanRefId { node: NodeId, ref_id: RefId },
    /// A `parent_of` edge between patterns that neither pattern declares
    UndeclaredHierarchyEdge { parent: NodeId, child: NodeId },
    /// A declared parent/child pair with no `parent_of` edge
    MissingHierarchyEdge { parent: NodeId, child: NodeId },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::DanglingReference { node, field, target, expected, found } => {
                match found {
                    Some(kind) => write!(
                        f,
                        "{}.{} references {} which is a {}, expected {}",
                        node, field, target, kind, expected
                    ),
                    None => write!(
                        f,
                        "{}.{} references missing {} {}",
                        node, field, expected, target
                    ),
                }
            }
            InvariantViolation::AsymmetricHierarchy { parent, child, declared_by } => write!(
                f,
                "{} -> {} is declared only by {}",
                parent, child, declared_by
            ),
            InvariantViolation::OrphanRefId { node, ref_id } => {
                write!(f, "attribute {} has ref_id {} shared by no iquery", node, ref_id)
            }
            InvariantViolation::UndeclaredHierarchyEdge { parent, child } => write!(
                f,
                "parent_of edge {} -> {} is not declared in the pattern lists",
                parent, child
            ),
            InvariantViolation::MissingHierarchyEdge { parent, child } => write!(
                f,
                "declared hierarchy {} -> {} has no parent_of edge",
                parent, child
            ),
        }
    }
}

/// Parent/child sets of every pattern, derived from `parent_of` edges only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternHierarchy {
    pub parents: IndexMap<NodeId, IdSet>,
    pub children: IndexMap<NodeId, IdSet>,
}

impl PatternHierarchy {
    pub fn parents_of(&self, pattern: &NodeId) -> Option<&IdSet> {
        self.parents.get(pattern)
    }

    pub fn children_of(&self, pattern: &NodeId) -> Option<&IdSet> {
        self.children.get(pattern)
    }

    pub fn contains(&self, parent: &NodeId, child: &NodeId) -> bool {
        self.children
            .get(parent)
            .map_or(false, |children| children.contains(child))
    }
}

impl GraphStore {
    /// Hierarchy implied by `parent_of` edges between pattern nodes.
    ///
    /// Every pattern gets an entry, possibly empty, in store order.
    pub fn derived_hierarchy(&self) -> PatternHierarchy {
        let mut hierarchy = PatternHierarchy::default();
        for id in self.get_nodes_by_type(NodeKind::Pattern) {
            hierarchy.parents.insert(id.clone(), IdSet::new());
            hierarchy.children.insert(id, IdSet::new());
        }

        for edge in self.get_edges_by_type(&EdgeType::parent_of()) {
            if !(self.is_pattern(&edge.source) && self.is_pattern(&edge.target)) {
                continue;
            }
            if let Some(children) = hierarchy.children.get_mut(&edge.source) {
                children.insert(edge.target.clone());
            }
            if let Some(parents) = hierarchy.parents.get_mut(&edge.target) {
                parents.insert(edge.source.clone());
            }
        }

        hierarchy
    }

    /// Report every cross-reference problem, in node order
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        for node in self.all_nodes() {
            for reference in node.references() {
                let found = self.get_node(reference.target).map(|n| n.kind());
                if found != Some(reference.expected) {
                    violations.push(InvariantViolation::DanglingReference {
                        node: node.id.clone(),
                        field: reference.field,
                        target: reference.target.clone(),
                        expected: reference.expected,
                        found,
                    });
                }
            }

            match &node.data {
                NodeData::Pattern { parents, children, .. } => {
                    for child in children {
                        if let Some(NodeData::Pattern { parents: theirs, .. }) =
                            self.get_node(child).map(|n| &n.data)
                        {
                            if !theirs.contains(&node.id) {
                                violations.push(InvariantViolation::AsymmetricHierarchy {
                                    parent: node.id.clone(),
                                    child: child.clone(),
                                    declared_by: node.id.clone(),
                                });
                            }
                        }
                    }
                    for parent in parents {
                        if let Some(NodeData::Pattern { children: theirs, .. }) =
                            self.get_node(parent).map(|n| &n.data)
                        {
                            if !theirs.contains(&node.id) {
                                violations.push(InvariantViolation::AsymmetricHierarchy {
                                    parent: parent.clone(),
                                    child: node.id.clone(),
                                    declared_by: node.id.clone(),
                                });
                            }
                        }
                    }
                }
                NodeData::Attribute { ref_id, .. } => {
                    let has_query = self
                        .get_nodes_by_ref_id(ref_id)
                        .iter()
                        .any(|n| n.kind() == NodeKind::IQuery);
                    if !has_query {
                        violations.push(InvariantViolation::OrphanRefId {
                            node: node.id.clone(),
                            ref_id: ref_id.clone(),
                        });
                    }
                }
                _ => {}
            }
        }

        self.check_hierarchy_edges(&mut violations);
        violations
    }

    fn check_hierarchy_edges(&self, violations: &mut Vec<InvariantViolation>) {
        let derived = self.derived_hierarchy();

        for (parent, children) in &derived.children {
            for child in children {
                if !self.declares(parent, child) {
                    violations.push(InvariantViolation::UndeclaredHierarchyEdge {
                        parent: parent.clone(),
                        child: child.clone(),
                    });
                }
            }
        }

        let mut reported: Vec<(&NodeId, &NodeId)> = Vec::new();
        for node in self.all_nodes() {
            let NodeData::Pattern { parents, children, .. } = &node.data else {
                continue;
            };
            let pairs = children
                .iter()
                .map(|child| (&node.id, child))
                .chain(parents.iter().map(|parent| (parent, &node.id)));

            for (parent, child) in pairs {
                if !self.is_pattern(parent) || !self.is_pattern(child) {
                    continue;
                }
                if derived.contains(parent, child) || reported.contains(&(parent, child)) {
                    continue;
                }
                reported.push((parent, child));
                violations.push(InvariantViolation::MissingHierarchyEdge {
                    parent: parent.clone(),
                    child: child.clone(),
                });
            }
        }
    }

    /// True when either pattern's lists declare `parent` over `child`
    fn declares(&self, parent: &NodeId, child: &NodeId) -> bool {
        let lists_child = matches!(
            self.get_node(parent).map(|n| &n.data),
            Some(NodeData::Pattern { children, .. }) if children.contains(child)
        );
        let lists_parent = matches!(
            self.get_node(child).map(|n| &n.data),
            Some(NodeData::Pattern { parents, .. }) if parents.contains(parent)
        );
        lists_child || lists_parent
    }

    fn is_pattern(&self, id: &NodeId) -> bool {
        self.get_node(id).map(|n| n.kind()) == Some(NodeKind::Pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::{id_set, FunctionHandle};

    fn id(s: &str) -> NodeId {
        NodeId::new(s)
    }

    fn consistent_store() -> GraphStore {
        let mut store = GraphStore::new();
        store.add_entity("Entity1", None, Some(id_set(["Pattern1"]))).unwrap();
        store
            .add_pattern("Pattern1", Some(id_set(["iQuery1"])), None, Some(id_set(["Pattern2"])))
            .unwrap();
        store
            .add_pattern("Pattern2", Some(id_set(["iQuery2"])), Some(id_set(["Pattern1"])), None)
            .unwrap();
        store.add_iquery("iQuery1", "RID1", id_set(["Prompt1"])).unwrap();
        store.add_iquery("iQuery2", "RID2", id_set(["Prompt2"])).unwrap();
        store.add_attribute("Attribute1", "RID1", None, Some(id_set(["Pattern1"]))).unwrap();
        store.add_prompt_interface("Prompt1", FunctionHandle::registered("identity")).unwrap();
        store.add_prompt_interface("Prompt2", FunctionHandle::registered("identity")).unwrap();
        store.add_relationship("Pattern1", "Pattern2", "parent_of").unwrap();
        store
    }

    #[test]
    fn test_consistent_graph_has_no_violations() {
        let store = consistent_store();
        assert_eq!(store.check_invariants(), vec![]);
    }

    #[test]
    fn test_dangling_and_wrong_kind_references() {
        let mut store = consistent_store();
        store
            .add_entity("Entity2", None, Some(id_set(["Ghost", "iQuery1"])))
            .unwrap();

        let violations = store.check_invariants();
        assert!(violations.contains(&InvariantViolation::DanglingReference {
            node: id("Entity2"),
            field: "patterns",
            target: id("Ghost"),
            expected: NodeKind::Pattern,
            found: None,
        }));
        assert!(violations.contains(&InvariantViolation::DanglingReference {
            node: id("Entity2"),
            field: "patterns",
            target: id("iQuery1"),
            expected: NodeKind::Pattern,
            found: Some(NodeKind::IQuery),
        }));
    }

    #[test]
    fn test_asymmetric_hierarchy_reported() {
        let mut store = consistent_store();
        // Pattern2 forgets its parent; the edge still matches Pattern1's list
        store.add_pattern("Pattern2", Some(id_set(["iQuery2"])), None, None).unwrap();

        let violations = store.check_invariants();
        assert_eq!(
            violations,
            vec![InvariantViolation::AsymmetricHierarchy {
                parent: id("Pattern1"),
                child: id("Pattern2"),
                declared_by: id("Pattern1"),
            }]
        );
    }

    #[test]
    fn test_orphan_ref_id() {
        let mut store = consistent_store();
        store.add_attribute("Attribute9", "RID9", None, None).unwrap();

        let violations = store.check_invariants();
        assert_eq!(
            violations,
            vec![InvariantViolation::OrphanRefId {
                node: id("Attribute9"),
                ref_id: RefId::new("RID9"),
            }]
        );
    }

    #[test]
    fn test_hierarchy_edges_vs_lists() {
        let mut store = GraphStore::new();
        store.add_pattern("A", None, None, Some(id_set(["B"]))).unwrap();
        store.add_pattern("B", None, Some(id_set(["A"])), None).unwrap();
        store.add_pattern("C", None, None, None).unwrap();
        store.add_relationship("B", "C", "parent_of").unwrap();

        let violations = store.check_invariants();
        assert_eq!(
            violations,
            vec![
                InvariantViolation::UndeclaredHierarchyEdge { parent: id("B"), child: id("C") },
                InvariantViolation::MissingHierarchyEdge { parent: id("A"), child: id("B") },
            ]
        );
    }

    #[test]
    fn test_derived_hierarchy_ignores_non_patterns() {
        let mut store = consistent_store();
        store.add_relationship("Entity1", "Pattern1", "parent_of").unwrap();

        let hierarchy = store.derived_hierarchy();
        assert_eq!(hierarchy.parents.len(), 2);
        assert_eq!(hierarchy.children_of(&id("Pattern1")), Some(&id_set(["Pattern2"])));
        assert_eq!(hierarchy.parents_of(&id("Pattern2")), Some(&id_set(["Pattern1"])));
        assert!(hierarchy.parents_of(&id("Pattern1")).unwrap().is_empty());
        assert!(!hierarchy.contains(&id("Entity1"), &id("Pattern1")));
    }

    #[test]
    fn test_mutually_referencing_patterns_can_be_inserted() {
        let mut store = GraphStore::new();
        store.add_pattern("A", None, None, Some(id_set(["B"]))).unwrap();
        store.add_pattern("B", None, Some(id_set(["A"])), None).unwrap();
        store.add_relationship("A", "B", "parent_of").unwrap();

        assert!(store.check_invariants().is_empty());
    }
}
