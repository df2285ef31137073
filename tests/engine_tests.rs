//! Integration tests for the full route optimization engine.

use itertools::Itertools;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use territory_routes::config::{EngineConfig, RouteOptimizationConfig};
use territory_routes::error::{CatalogError, ConfigurationError};
use territory_routes::geometry::{route_distance, Coordinate};
use territory_routes::route::RouteStrategy;
use territory_routes::skills::ConductorSkills;
use territory_routes::synthesis::NO_TERRITORIES_AVAILABLE;
use territory_routes::territory::{
    RoutePoint, SyntheticSource, TerritoryCatalog, TerritorySource, TimeSlot, TimeSlotPreference,
    SECONDS_PER_DAY,
};
use territory_routes::RouteEngine;

const NOW: i64 = 19_000 * SECONDS_PER_DAY;
const DEPOT: Coordinate = Coordinate::new(19.43, -99.13);

/// Creates an engine over a reproducible synthetic catalog.
fn create_synthetic_engine(count: usize) -> RouteEngine {
    let source = SyntheticSource::new(count, DEPOT, 21).with_now(NOW);
    RouteEngine::from_source(&source, EngineConfig::new().with_depot(DEPOT)).unwrap()
}

/// Creates five territories within 2 km of each other next to the depot.
fn create_compact_catalog() -> TerritoryCatalog {
    let offsets = [(0.002, 0.001), (0.006, -0.003), (-0.004, 0.005), (0.001, 0.008), (-0.005, -0.004)];
    let points = offsets
        .iter()
        .enumerate()
        .map(|(i, (dlat, dlng))| {
            RoutePoint::new(
                format!("C{}", i),
                DEPOT.lat + dlat,
                DEPOT.lng + dlng,
                (i + 1) as u8,
                30.0,
                0.5 + 0.05 * i as f64,
                TimeSlot::Morning,
            )
        })
        .collect();
    TerritoryCatalog::new(points).unwrap()
}

#[test]
fn test_invalid_config_fails_fast() {
    let engine = create_synthetic_engine(10);

    let config = RouteOptimizationConfig::new().with_max_territories(0);
    assert_eq!(
        engine.optimize_route_at("c1", &config, NOW).unwrap_err(),
        ConfigurationError::NonPositiveMaxTerritories(0)
    );

    let config = RouteOptimizationConfig::new().with_max_travel_time(-5);
    assert_eq!(
        engine.optimize_route_at("c1", &config, NOW).unwrap_err(),
        ConfigurationError::NonPositiveMaxTravelTime(-5)
    );

    // Nothing was recorded
    assert!(engine.get_history().is_empty());
}

#[test]
fn test_invalid_engine_config_is_rejected() {
    let catalog = create_compact_catalog();
    let result = RouteEngine::new(catalog, EngineConfig::new().with_cluster_count(0));
    assert_eq!(result.unwrap_err(), ConfigurationError::ZeroClusterCount);
}

#[test]
fn test_compact_catalog_gets_shortest_tour() {
    // Default k = 5 gives one cluster per territory here
    let engine = RouteEngine::new(create_compact_catalog(), EngineConfig::new().with_depot(DEPOT)).unwrap();
    let config = RouteOptimizationConfig::new()
        .with_max_territories(5)
        .with_max_travel_time(480);

    let route = engine.optimize_route_at("c1", &config, NOW).unwrap();

    let catalog = engine.catalog();
    let minimum = catalog
        .points()
        .iter()
        .permutations(5)
        .map(|perm| route_distance(DEPOT, perm.iter().map(|p| p.coordinate())))
        .fold(f64::INFINITY, f64::min);

    assert_eq!(route.points.len(), 5);
    assert_eq!(route.expected_calls, 5);
    assert!((route.total_distance - minimum).abs() < 1e-9);
    assert!(route.efficiency_score > 0.0 && route.efficiency_score <= 1.0);
}

#[test]
fn test_routes_fill_max_territories_on_default_engine() {
    let engine = create_synthetic_engine(40);

    for max in [5, 8] {
        // A generous budget so greedy is not cut short by time
        let config = RouteOptimizationConfig::new()
            .with_max_territories(max)
            .with_max_travel_time(10_000)
            .with_avoid_recent_visits(false);
        let route = engine.optimize_route_at("c1", &config, NOW).unwrap();
        assert_eq!(route.points.len(), max as usize, "winner {}", route.strategy);
    }
}

#[test]
fn test_expired_time_limit_still_returns_a_route() {
    let engine = RouteEngine::new(
        create_compact_catalog(),
        EngineConfig::new().with_depot(DEPOT).with_time_limit(Duration::ZERO),
    )
    .unwrap();
    let config = RouteOptimizationConfig::new().with_max_territories(5);

    let route = engine.optimize_route_at("c1", &config, NOW).unwrap();

    assert_eq!(route.strategy, RouteStrategy::NearestNeighbor);
    assert_eq!(route.points.len(), 5);
    assert!(route.alternatives.is_empty());
}

#[test]
fn test_all_recently_visited_yields_empty_route() {
    let points: Vec<RoutePoint> = SyntheticSource::new(30, DEPOT, 4)
        .territories()
        .into_iter()
        .map(|p| p.with_last_visited(NOW - SECONDS_PER_DAY))
        .collect();
    let engine = RouteEngine::new(TerritoryCatalog::new(points).unwrap(), EngineConfig::new()).unwrap();
    let config = RouteOptimizationConfig::new()
        .with_max_territories(6)
        .with_avoid_recent_visits(true);

    let route = engine.optimize_route_at("c1", &config, NOW).unwrap();

    assert!(route.points.is_empty());
    assert_eq!(route.efficiency_score, 0.0);
    assert_eq!(route.total_distance, 0.0);
    assert_eq!(route.recommendations, vec![NO_TERRITORIES_AVAILABLE.to_string()]);
    assert!(route.alternatives.is_empty());
    assert!(engine.get_history().is_empty());
}

#[test]
fn test_morning_preference_returns_only_morning_territories() {
    let points: Vec<RoutePoint> = (0..20)
        .map(|i| {
            let slot = if i % 2 == 0 { TimeSlot::Morning } else { TimeSlot::Afternoon };
            RoutePoint::new(
                format!("M{}", i),
                DEPOT.lat + 0.003 * (i % 5) as f64,
                DEPOT.lng + 0.003 * (i / 5) as f64,
                (i % 5 + 1) as u8,
                25.0,
                0.6,
                slot,
            )
        })
        .collect();
    let engine = RouteEngine::new(
        TerritoryCatalog::new(points).unwrap(),
        EngineConfig::new().with_depot(DEPOT),
    )
    .unwrap();
    let config = RouteOptimizationConfig::new()
        .with_max_territories(6)
        .with_time_slot_preference(TimeSlotPreference::Morning);

    let route = engine.optimize_route_at("c1", &config, NOW).unwrap();

    assert!(!route.points.is_empty());
    assert!(route.points.iter().all(|p| p.optimal_time_slot == TimeSlot::Morning));
    for alternative in &route.alternatives {
        assert!(alternative.points.iter().all(|p| p.optimal_time_slot == TimeSlot::Morning));
    }
}

#[test]
fn test_route_never_exceeds_max_territories() {
    let engine = create_synthetic_engine(40);

    for max in 1..=10 {
        let config = RouteOptimizationConfig::new()
            .with_max_territories(max)
            .with_avoid_recent_visits(false);
        let route = engine.optimize_route_at("c1", &config, NOW).unwrap();

        assert!(route.points.len() <= max as usize);
        assert!(route.total_distance >= 0.0);
        for alternative in &route.alternatives {
            assert!(alternative.points.len() <= max as usize);
        }
    }
}

#[test]
fn test_winner_beats_every_alternative() {
    let engine = create_synthetic_engine(40);

    for max in [3, 6, 9, 12] {
        let config = RouteOptimizationConfig::new()
            .with_max_territories(max)
            .with_avoid_recent_visits(false);
        let route = engine.optimize_route_at("c1", &config, NOW).unwrap();

        assert!(route.alternatives.len() <= 2);
        assert!(route.recommendations.len() <= 5);
        for alternative in &route.alternatives {
            assert!(route.efficiency_score >= alternative.efficiency_score);
            assert_ne!(alternative.points, route.points);
        }
    }
}

#[test]
fn test_skills_raise_expected_success() {
    let engine = RouteEngine::new(create_compact_catalog(), EngineConfig::new().with_depot(DEPOT)).unwrap();
    let base = RouteOptimizationConfig::new().with_max_territories(5);

    let plain = engine.optimize_route_at("c1", &base, NOW).unwrap();

    let mut skills = ConductorSkills::new();
    for point in engine.catalog().points() {
        skills = skills.with_experience(point.territory_id.clone(), 1.0);
    }
    let skilled = engine
        .optimize_route_at("c1", &base.clone().with_conductor_skills(skills), NOW)
        .unwrap();

    // Same five stops, each 0.2 more likely to succeed and 15% quicker
    assert_eq!(skilled.points.len(), 5);
    assert!((skilled.average_success() - plain.average_success() - 0.2).abs() < 1e-9);
    assert!(skilled.estimated_time < plain.estimated_time);
    assert!(skilled.efficiency_score > plain.efficiency_score);

    // The catalog itself is never modified by the adjustment
    assert_eq!(engine.catalog().points(), create_compact_catalog().points());
}

#[test]
fn test_history_and_metrics() {
    let engine = create_synthetic_engine(30);
    let config = RouteOptimizationConfig::new()
        .with_max_territories(5)
        .with_avoid_recent_visits(false);

    let first = engine.optimize_route_at("c1", &config, NOW).unwrap();
    let second = engine.optimize_route_at("c2", &config, NOW).unwrap();

    let history = engine.get_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, first.id);
    assert_eq!(history[1].id, second.id);
    assert_ne!(first.id, second.id);

    let metrics = engine.get_metrics();
    assert_eq!(metrics.total_routes, 2);
    let expected_efficiency = (first.efficiency_score + second.efficiency_score) / 2.0;
    assert!((metrics.average_efficiency - expected_efficiency).abs() < 1e-12);
    let expected_saved = (first.total_distance + second.total_distance) * 0.2;
    assert!((metrics.total_distance_saved - expected_saved).abs() < 1e-9);
    assert_eq!(metrics.model_accuracy, engine.config().model.reported_accuracy());
    assert_eq!(metrics.strategy_wins.values().sum::<usize>(), 2);
}

#[test]
fn test_history_is_bounded() {
    let source = SyntheticSource::new(15, DEPOT, 8).with_now(NOW);
    let engine = RouteEngine::from_source(
        &source,
        EngineConfig::new().with_depot(DEPOT).with_history_capacity(3),
    )
    .unwrap();
    let config = RouteOptimizationConfig::new()
        .with_max_territories(3)
        .with_avoid_recent_visits(false);

    let ids: Vec<String> = (0..5)
        .map(|i| engine.optimize_route_at(&format!("c{}", i), &config, NOW).unwrap().id)
        .collect();

    let history: Vec<String> = engine.get_history().into_iter().map(|r| r.id).collect();
    assert_eq!(history, ids[2..].to_vec());
    assert_eq!(engine.get_metrics().total_routes, 3);
}

#[test]
fn test_clusters_are_cached_until_catalog_changes() {
    let engine = create_synthetic_engine(30);

    let first = engine.get_clusters();
    let second = engine.get_clusters();
    assert_eq!(first, second);
    assert!(!first.is_empty() && first.len() <= 5);

    engine.replace_catalog(create_compact_catalog());
    let replaced = engine.get_clusters();
    let total: usize = replaced.iter().map(|c| c.density).sum();
    assert_eq!(total, 5);
}

#[test]
fn test_mark_visited_excludes_territory() {
    let engine = RouteEngine::new(
        create_compact_catalog(),
        EngineConfig::new().with_depot(DEPOT),
    )
    .unwrap();
    let config = RouteOptimizationConfig::new().with_max_territories(5);

    engine.mark_visited("C2", NOW - 3600).unwrap();
    let route = engine.optimize_route_at("c1", &config, NOW).unwrap();
    assert!(!route.territory_ids().contains(&"C2"));

    assert!(matches!(
        engine.mark_visited("missing", NOW),
        Err(CatalogError::UnknownTerritory(_))
    ));
}

#[test]
fn test_engines_are_independent() {
    let a = create_synthetic_engine(20);
    let b = create_synthetic_engine(20);
    let config = RouteOptimizationConfig::new().with_avoid_recent_visits(false);

    a.optimize_route_at("c1", &config, NOW).unwrap();
    assert_eq!(a.get_history().len(), 1);
    assert!(b.get_history().is_empty());
}

#[test]
fn test_concurrent_callers_share_one_engine() {
    let engine = Arc::new(create_synthetic_engine(40));
    let config = RouteOptimizationConfig::new()
        .with_max_territories(6)
        .with_avoid_recent_visits(false);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let config = config.clone();
            thread::spawn(move || engine.optimize_route_at(&format!("c{}", i), &config, NOW).unwrap())
        })
        .collect();

    let routes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(engine.get_history().len(), 4);
    // Same catalog and config, so every caller gets the same stops
    for route in &routes[1..] {
        assert_eq!(route.territory_ids(), routes[0].territory_ids());
    }
}
