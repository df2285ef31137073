//! Benchmarks for the route optimization engine.

#[cfg(feature = "bench")]
extern crate criterion;

#[cfg(feature = "bench")]
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use territory_routes::clustering::KMeans;
use territory_routes::config::{EngineConfig, RouteOptimizationConfig};
use territory_routes::geometry::Coordinate;
use territory_routes::territory::{SyntheticSource, TerritoryCatalog, TerritorySource};
use territory_routes::RouteEngine;

const NOW: i64 = 1_700_000_000;

/// Create a benchmark engine over a synthetic catalog of specified size.
fn create_benchmark_engine(size: usize, parallel: bool) -> RouteEngine {
    let depot = Coordinate::new(19.4326, -99.1332);
    let source = SyntheticSource::new(size, depot, 11).with_now(NOW);
    let catalog = TerritoryCatalog::from_source(&source).expect("synthetic ids are unique");
    let config = EngineConfig::new().with_depot(depot).with_parallel(parallel);
    RouteEngine::new(catalog, config).expect("default engine config is valid")
}

#[cfg(feature = "bench")]
fn benchmark_clustering(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustering");

    for size in [50, 200, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let points = SyntheticSource::new(size, Coordinate::new(0.0, 0.0), 3).territories();
            let kmeans = KMeans::new(5, 10, 42);

            b.iter(|| kmeans.cluster(&points));
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_exact_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_search");

    for max in [4i64, 6, 8].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(max), max, |b, &max| {
            let engine = create_benchmark_engine(max as usize, false);
            let config = RouteOptimizationConfig::new()
                .with_max_territories(max)
                .with_avoid_recent_visits(false);

            b.iter(|| engine.optimize_route_at("bench", &config, NOW));
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_optimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize");

    for parallel in [false, true].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(parallel), parallel, |b, &parallel| {
            let engine = create_benchmark_engine(200, parallel);
            let config = RouteOptimizationConfig::new().with_max_territories(12);

            b.iter(|| engine.optimize_route_at("bench", &config, NOW));
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
criterion_group!(
    benches,
    benchmark_clustering,
    benchmark_exact_search,
    benchmark_optimize
);

#[cfg(feature = "bench")]
criterion_main!(benches);
