use anyhow::Context;
use atlas_network::graph::{EdgeType, NodeId, NodeKind, TracingSink};
use atlas_network::{coffee, query, GraphStore};
use tracing::info;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("ATLAS Network v{}", atlas_network::version());
    println!("==========================================");
    println!();

    let store = build_network()?;
    summarize(&store);
    demo_queries(&store)?;
    demo_persistence(&store)?;

    Ok(())
}

fn build_network() -> anyhow::Result<GraphStore> {
    println!("=== Building the coffee network ===");
    let mut store = GraphStore::new().with_sink(TracingSink);
    coffee::populate(&mut store).context("failed to build coffee network")?;
    println!(
        "✓ {} nodes, {} edges",
        store.node_count(),
        store.edge_count()
    );
    Ok(store)
}

fn summarize(store: &GraphStore) {
    info!("Summary of the ATLAS Coffee Network:");
    let summary = query::summarize(store);
    for (kind, ids) in &summary.nodes {
        let ids: Vec<&str> = ids.iter().map(NodeId::as_str).collect();
        println!("  {:<17} {}", format!("{}:", kind), ids.join(", "));
    }
    for edge in store.all_edges() {
        info!("Edge: ({}, {}, {:?})", edge.source, edge.target, edge.attributes());
    }
}

fn demo_queries(store: &GraphStore) -> anyhow::Result<()> {
    println!("\n=== Queries ===");

    let bean = NodeId::new("CoffeeBean");
    let shop = NodeId::new("CoffeeShop");
    let path = query::find_shortest_path(store, &bean, &shop)?;
    let hops: Vec<&str> = path.iter().map(NodeId::as_str).collect();
    println!("Shortest path {} -> {}: {}", bean, shop, hops.join(" -> "));

    let hierarchy = query::find_shortest_path_via(
        store,
        &NodeId::new("BeanPattern"),
        &NodeId::new("ShopPattern"),
        &EdgeType::parent_of(),
    )?;
    println!("Pattern lineage: {} levels", hierarchy.len());

    let fields = query::get_node_attributes(store, &NodeId::new("BeanAttribute"))?;
    println!("BeanAttribute: {:?}", fields);

    let edge = query::get_edge_attributes(store, &bean, &NodeId::new("Roaster"), None)?;
    println!("CoffeeBean -> Roaster: {:?}", edge);

    let conforms = query::get_relationships(store, &bean, Some(&EdgeType::new("conforms_to")))?;
    for edge in conforms {
        println!("CoffeeBean conforms to {}", edge.target);
    }

    for query_id in store.get_nodes_by_type(NodeKind::IQuery) {
        if let Some(ref_id) = store.get_node(&query_id).and_then(|n| n.ref_id()) {
            let joined: Vec<&str> = store
                .get_nodes_by_ref_id(ref_id)
                .iter()
                .map(|n| n.id.as_str())
                .collect();
            println!("ref_id {}: {}", ref_id, joined.join(", "));
        }
    }

    let violations = store.check_invariants();
    println!("Invariant violations: {}", violations.len());
    Ok(())
}

fn demo_persistence(store: &GraphStore) -> anyhow::Result<()> {
    println!("\n=== Persistence ===");
    let path = std::env::temp_dir().join("atlas_coffee_network.json");

    query::save_to_file(store, &path)
        .with_context(|| format!("failed to save {}", path.display()))?;
    let loaded = query::load_from_file(&path)
        .with_context(|| format!("failed to load {}", path.display()))?;

    println!(
        "✓ Round trip through {}: {} nodes, {} edges",
        path.display(),
        loaded.node_count(),
        loaded.edge_count()
    );
    Ok(())
}
