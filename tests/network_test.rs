use atlas_network::coffee::coffee_network;
use atlas_network::graph::{
    id_set, property_map, FunctionHandle, GraphError, GraphStore, NodeData, PropertyValue,
};
use atlas_network::query;
use atlas_network::{EdgeType, NodeId, NodeKind};

fn ids(names: &[&str]) -> Vec<NodeId> {
    names.iter().map(|n| NodeId::new(*n)).collect()
}

#[test]
fn test_conforming_entity_scenario() {
    let mut store = GraphStore::new();
    store
        .add_entity("CoffeeBean", None, Some(id_set(["BeanPattern"])))
        .unwrap();
    store
        .add_pattern("BeanPattern", Some(id_set(["BeanQuery"])), None, None)
        .unwrap();
    store
        .add_relationship("CoffeeBean", "BeanPattern", "conforms_to")
        .unwrap();

    assert_eq!(query::get_nodes_by_type(&store, NodeKind::Entity), ids(&["CoffeeBean"]));

    let edges = query::get_relationships(&store, &NodeId::new("CoffeeBean"), None).unwrap();
    let triples: Vec<_> = edges.iter().map(|e| e.as_triple()).collect();
    assert_eq!(
        triples,
        vec![(
            &NodeId::new("CoffeeBean"),
            &NodeId::new("BeanPattern"),
            &EdgeType::new("conforms_to")
        )]
    );
}

#[test]
fn test_coffee_network_queries() {
    let store = coffee_network().unwrap();

    assert_eq!(store.node_count(), 15);
    assert_eq!(store.edge_count(), 10);
    assert_eq!(
        query::get_nodes_by_type(&store, NodeKind::Pattern),
        ids(&["BeanPattern", "RoasterPattern", "ShopPattern"])
    );
    assert_eq!(
        query::get_nodes_by_type(&store, NodeKind::PromptInterface),
        ids(&["BeanPrompt", "RoasterPrompt", "ShopPrompt"])
    );

    let path = query::find_shortest_path(&store, &NodeId::new("CoffeeBean"), &NodeId::new("CoffeeShop")).unwrap();
    assert_eq!(path, ids(&["CoffeeBean", "Roaster", "CoffeeShop"]));

    let attrs = query::get_node_attributes(&store, &NodeId::new("BeanAttribute")).unwrap();
    assert_eq!(attrs.get("node_type").and_then(|v| v.as_string()), Some("attribute"));
    assert_eq!(attrs.get("ref_id").and_then(|v| v.as_string()), Some("BID1"));
    assert_eq!(
        attrs.get("attributes").and_then(|v| v.as_map()),
        Some(&property_map([("origin", "Ethiopia")]))
    );
    assert_eq!(
        attrs.get("patterns").and_then(|v| v.as_array()),
        Some(&vec![PropertyValue::from("BeanPattern")])
    );

    let edge = query::get_edge_attributes(&store, &NodeId::new("Roaster"), &NodeId::new("CoffeeShop"), None).unwrap();
    assert_eq!(edge.get("relationship_type").and_then(|v| v.as_string()), Some("supplies"));

    assert!(store.check_invariants().is_empty());

    let hierarchy = store.derived_hierarchy();
    let children = hierarchy.children_of(&NodeId::new("BeanPattern")).unwrap();
    assert!(children.contains(&NodeId::new("RoasterPattern")));
}

#[test]
fn test_ref_id_links_queries_and_attributes() {
    let store = coffee_network().unwrap();

    let linked: Vec<_> = store
        .get_nodes_by_ref_id(&"BID1".into())
        .into_iter()
        .map(|n| n.id.clone())
        .collect();
    assert_eq!(linked, ids(&["BeanQuery", "BeanAttribute"]));
}

#[test]
fn test_overwrite_is_full_replacement() {
    let mut store = GraphStore::new();
    store
        .add_entity("X", Some(property_map([("a", 1i64)])), Some(id_set(["P"])))
        .unwrap();
    store.add_entity("X", Some(property_map::<&str, i64, _>([])), None).unwrap();

    let node = store.get_node(&NodeId::new("X")).unwrap();
    assert!(node.attributes().unwrap().is_empty());
    assert!(node.patterns().unwrap().is_empty());
    assert_eq!(store.node_count(), 1);
}

#[test]
fn test_readding_is_idempotent() {
    let build = |times: usize| {
        let mut store = GraphStore::new();
        for _ in 0..times {
            store
                .add_attribute("A", "R1", Some(property_map([("k", "v")])), Some(id_set(["P"])))
                .unwrap();
            store.add_pattern("P", None, None, None).unwrap();
            store.add_relationship("A", "P", "describes").unwrap();
        }
        store
    };

    let once = build(1);
    let twice = build(2);
    assert_eq!(once.node_count(), twice.node_count());
    assert_eq!(once.edge_count(), twice.edge_count());
    assert_eq!(once.get_node(&NodeId::new("A")), twice.get_node(&NodeId::new("A")));
    assert_eq!(query::summarize(&once), query::summarize(&twice));
}

#[test]
fn test_kind_filter_sees_overwritten_kind() {
    let mut store = GraphStore::new();
    store.add_entity("N", None, None).unwrap();
    store.add_prompt_interface("N", FunctionHandle::Unbound).unwrap();

    assert!(query::get_nodes_by_type(&store, NodeKind::Entity).is_empty());
    assert_eq!(query::get_nodes_by_type(&store, NodeKind::PromptInterface), ids(&["N"]));
    assert!(matches!(
        store.get_node(&NodeId::new("N")).unwrap().data,
        NodeData::PromptInterface { .. }
    ));
}

#[test]
fn test_shortest_path_cases() {
    let mut store = GraphStore::new();
    for id in ["A", "B", "C", "D"] {
        store.add_entity(id, None, None).unwrap();
    }
    store.add_relationship("A", "B", "next").unwrap();
    store.add_relationship("B", "C", "next").unwrap();

    let (a, c, d) = (NodeId::new("A"), NodeId::new("C"), NodeId::new("D"));
    assert_eq!(query::find_shortest_path(&store, &a, &c).unwrap(), ids(&["A", "B", "C"]));

    store.add_relationship("A", "C", "jump").unwrap();
    assert_eq!(query::find_shortest_path(&store, &a, &c).unwrap(), ids(&["A", "C"]));
    assert_eq!(
        query::find_shortest_path_via(&store, &a, &c, &EdgeType::new("next")).unwrap(),
        ids(&["A", "B", "C"])
    );

    // edges are followed only in their stored direction
    assert!(matches!(
        query::find_shortest_path(&store, &c, &a),
        Err(GraphError::NoPath { .. })
    ));
    assert!(matches!(
        query::find_shortest_path(&store, &a, &d),
        Err(GraphError::NoPath { .. })
    ));
    let missing = query::find_shortest_path(&store, &a, &NodeId::new("Z")).unwrap_err();
    assert!(missing.is_not_found());
}

#[test]
fn test_relationship_filter() {
    let store = coffee_network().unwrap();
    let bean = NodeId::new("CoffeeBean");

    let all = query::get_relationships(&store, &bean, None).unwrap();
    assert_eq!(all.len(), 2);

    let processed = query::get_relationships(&store, &bean, Some(&EdgeType::new("processed_by"))).unwrap();
    assert_eq!(processed.len(), 1);
    assert_eq!(processed[0].target, NodeId::new("Roaster"));

    let none = query::get_relationships(&store, &bean, Some(&EdgeType::new("supplies"))).unwrap();
    assert!(none.is_empty());

    assert!(matches!(
        query::get_relationships(&store, &NodeId::new("Ghost"), None),
        Err(GraphError::NodeNotFound(_))
    ));
}

#[test]
fn test_relationship_to_missing_node_rejected() {
    let mut store = coffee_network().unwrap();
    let before = store.edge_count();

    assert!(matches!(
        store.add_relationship("Ghost", "CoffeeBean", "uses"),
        Err(GraphError::InvalidEdgeSource(_))
    ));
    assert!(matches!(
        store.add_relationship("CoffeeBean", "Ghost", "uses"),
        Err(GraphError::InvalidEdgeTarget(_))
    ));
    assert_eq!(store.edge_count(), before);
    assert!(!store.has_node(&NodeId::new("Ghost")));
}
