use atlas_network::graph::{id_set, property_map, EdgeType, GraphStore, NodeId, NodeKind};
use atlas_network::shell::Command;
use atlas_network::{persistence, query, PersistenceConfig};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

/// Interleaved entities and patterns, each entity conforming to one pattern
fn mixed_store(size: usize) -> GraphStore {
    let mut store = GraphStore::new();
    for i in 0..size {
        let pattern = format!("Pattern{}", i % 10);
        store
            .add_entity(
                format!("Entity{}", i),
                Some(property_map([("rank", i as i64)])),
                Some(id_set([pattern.as_str()])),
            )
            .unwrap();
        if i < 10 {
            store.add_pattern(pattern, None, None, None).unwrap();
        }
    }
    for i in 0..size {
        store
            .add_relationship(format!("Entity{}", i), format!("Pattern{}", i % 10), "conforms_to")
            .unwrap();
    }
    store
}

/// Benchmark node insertion throughput
fn bench_node_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("node_insertion");

    for size in [100, 1000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut store = GraphStore::new();
                for i in 0..size {
                    store
                        .add_entity(
                            format!("Entity{}", i),
                            Some(property_map([("rank", (i % 100) as i64)])),
                            None,
                        )
                        .unwrap();
                }
                criterion::black_box(store.node_count());
            });
        });
    }
    group.finish();
}

/// Benchmark kind filter performance
fn bench_kind_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("kind_scan");

    for size in [100, 1000, 10_000].iter() {
        let store = mixed_store(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let ids = store.get_nodes_by_type(NodeKind::Entity);
                criterion::black_box(ids.len());
            });
        });
    }
    group.finish();
}

/// Benchmark shortest path over a chain
fn bench_shortest_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest_path");

    // Create a chain: n0 -> n1 -> ... -> n999, plus a typed shortcut every 10 nodes
    let mut store = GraphStore::new();
    for i in 0..1000 {
        store.add_entity(format!("n{}", i), None, None).unwrap();
    }
    for i in 0..999 {
        store
            .add_relationship(format!("n{}", i), format!("n{}", i + 1), "supplies")
            .unwrap();
    }
    for i in (0..990).step_by(10) {
        store
            .add_relationship(format!("n{}", i), format!("n{}", i + 10), "shortcut")
            .unwrap();
    }

    let (source, target) = (NodeId::new("n0"), NodeId::new("n999"));

    group.bench_function("all_edges", |b| {
        b.iter(|| {
            let path = query::find_shortest_path(&store, &source, &target).unwrap();
            criterion::black_box(path.len());
        });
    });

    group.bench_function("single_type", |b| {
        let edge_type = EdgeType::new("supplies");
        b.iter(|| {
            let path = query::find_shortest_path_via(&store, &source, &target, &edge_type).unwrap();
            criterion::black_box(path.len());
        });
    });

    group.finish();
}

/// Benchmark document serialization both ways
fn bench_persistence(c: &mut Criterion) {
    let mut group = c.benchmark_group("persistence");
    let store = mixed_store(1000);
    let config = PersistenceConfig {
        pretty: false,
        ..PersistenceConfig::default()
    };
    let json = persistence::to_json(&store, &config).unwrap();

    group.bench_function("to_json", |b| {
        b.iter(|| criterion::black_box(persistence::to_json(&store, &config).unwrap().len()));
    });

    group.bench_function("from_json", |b| {
        b.iter(|| criterion::black_box(persistence::from_json(&json).unwrap().node_count()));
    });

    group.finish();
}

/// Benchmark shell command parse time
fn bench_command_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("command_parse");

    group.bench_function("bare_words", |b| {
        b.iter(|| criterion::black_box(Command::parse("path CoffeeBean CoffeeShop supplies").unwrap()));
    });

    group.bench_function("call_syntax", |b| {
        b.iter(|| {
            criterion::black_box(
                Command::parse(
                    "add_entity('CoffeeBean', attributes={'type': 'Arabica', 'score': 8.5}, patterns=['BeanPattern'])",
                )
                .unwrap(),
            )
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_node_insertion,
    bench_kind_scan,
    bench_shortest_path,
    bench_persistence,
    bench_command_parse,
);
criterion_main!(benches);
