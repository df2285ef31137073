//! Unit tests for route points, catalogs and the conductor skill adjustment.

use territory_routes::error::CatalogError;
use territory_routes::geometry::Coordinate;
use territory_routes::skills::{adjust_for_skills, ConductorSkills};
use territory_routes::territory::{
    RoutePoint, SyntheticSource, TerritoryCatalog, TerritorySource, TimeSlot, TimeSlotPreference,
    SECONDS_PER_DAY,
};

/// Creates a small catalog of three territories.
fn create_test_points() -> Vec<RoutePoint> {
    vec![
        RoutePoint::new("A", 10.0, 10.0, 3, 30.0, 0.5, TimeSlot::Morning),
        RoutePoint::new("B", 10.01, 10.0, 5, 45.0, 0.7, TimeSlot::Afternoon),
        RoutePoint::new("C", 10.0, 10.01, 1, 60.0, 0.9, TimeSlot::Evening),
    ]
}

#[test]
fn test_route_point_clamping() {
    let point = RoutePoint::new("X", 0.0, 0.0, 9, -5.0, 1.7, TimeSlot::Morning);
    assert_eq!(point.priority, 5);
    assert_eq!(point.success_probability, 1.0);
    assert!(point.estimated_duration > 0.0);

    let point = RoutePoint::new("Y", 0.0, 0.0, 0, 20.0, -0.3, TimeSlot::Morning);
    assert_eq!(point.priority, 1);
    assert_eq!(point.success_probability, 0.0);
}

#[test]
fn test_visited_within() {
    let now = 1_000 * SECONDS_PER_DAY;
    let point = RoutePoint::new("A", 0.0, 0.0, 3, 30.0, 0.5, TimeSlot::Morning);
    assert!(!point.visited_within(now, 3));

    let yesterday = point.clone().with_last_visited(now - SECONDS_PER_DAY);
    assert!(yesterday.visited_within(now, 3));

    let last_week = point.with_last_visited(now - 7 * SECONDS_PER_DAY);
    assert!(!last_week.visited_within(now, 3));
}

#[test]
fn test_time_slot_preference() {
    assert!(TimeSlotPreference::Any.matches(TimeSlot::Evening));
    assert!(TimeSlotPreference::Morning.matches(TimeSlot::Morning));
    assert!(!TimeSlotPreference::Morning.matches(TimeSlot::Afternoon));
    assert_eq!("afternoon".parse::<TimeSlotPreference>(), Ok(TimeSlotPreference::Afternoon));
    assert!("noon".parse::<TimeSlotPreference>().is_err());
}

#[test]
fn test_catalog_rejects_duplicate_ids() {
    let mut points = create_test_points();
    points.push(RoutePoint::new("A", 1.0, 1.0, 2, 20.0, 0.4, TimeSlot::Morning));

    match TerritoryCatalog::new(points) {
        Err(CatalogError::DuplicateTerritory(id)) => assert_eq!(id, "A"),
        other => panic!("expected duplicate error, got {:?}", other),
    }
}

#[test]
fn test_catalog_mark_visited() {
    let mut catalog = TerritoryCatalog::new(create_test_points()).unwrap();
    catalog.mark_visited("B", 1234).unwrap();
    assert_eq!(catalog.get("B").unwrap().last_visited, Some(1234));

    assert!(matches!(
        catalog.mark_visited("Z", 1),
        Err(CatalogError::UnknownTerritory(_))
    ));
}

#[test]
fn test_catalog_file_round_trip() {
    let path = std::env::temp_dir().join(format!("territory_catalog_{}.json", std::process::id()));
    let catalog = TerritoryCatalog::new(create_test_points()).unwrap();

    catalog.save(&path).unwrap();
    let loaded = TerritoryCatalog::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.points(), catalog.points());
}

#[test]
fn test_catalog_from_invalid_json() {
    let path = std::env::temp_dir().join(format!("territory_invalid_{}.json", std::process::id()));
    std::fs::write(&path, "{ not json").unwrap();
    let result = TerritoryCatalog::from_file(&path);
    std::fs::remove_file(&path).ok();

    assert!(matches!(result, Err(CatalogError::Json(_))));
}

#[test]
fn test_synthetic_source_is_reproducible() {
    let center = Coordinate::new(19.43, -99.13);
    let first = SyntheticSource::new(25, center, 99).with_now(5_000_000).territories();
    let second = SyntheticSource::new(25, center, 99).with_now(5_000_000).territories();
    let other = SyntheticSource::new(25, center, 100).with_now(5_000_000).territories();

    assert_eq!(first.len(), 25);
    assert_eq!(first, second);
    assert_ne!(first, other);

    for point in &first {
        assert!((1..=5).contains(&point.priority));
        assert!((0.0..=1.0).contains(&point.success_probability));
        assert!(point.estimated_duration > 0.0);
        assert!((point.lat - center.lat).abs() < 0.2);
    }

    // Synthetic ids are unique
    assert!(TerritoryCatalog::new(first).is_ok());
}

#[test]
fn test_skill_adjustment_boosts_and_caps() {
    let points = create_test_points();
    let skills = ConductorSkills::new()
        .with_experience("A", 1.0)
        .with_experience("C", 1.0)
        .with_affinity(TimeSlot::Afternoon, 1.0);

    let adjusted = adjust_for_skills(&points, &skills);

    // A: 0.5 + 0.2 from experience, duration reduced by 15%
    assert!((adjusted[0].success_probability - 0.7).abs() < 1e-12);
    assert!((adjusted[0].estimated_duration - 25.5).abs() < 1e-12);

    // B: 0.7 + 0.1 from affinity, no experience so same duration
    assert!((adjusted[1].success_probability - 0.8).abs() < 1e-12);
    assert_eq!(adjusted[1].estimated_duration, 45.0);

    // C: 0.9 + 0.2 is capped
    assert_eq!(adjusted[2].success_probability, 0.95);

    // The input is untouched
    assert_eq!(points, create_test_points());
}

#[test]
fn test_skill_adjustment_unknown_keys_are_neutral() {
    let points = create_test_points();
    let adjusted = adjust_for_skills(&points, &ConductorSkills::default());
    assert_eq!(adjusted, points);
}

#[test]
fn test_catalog_deserialization_rejects_duplicate_ids() {
    let json = r#"[
        {"territory_id": "X", "lat": 1.0, "lng": 1.0, "priority": 3, "estimated_duration": 30.0,
         "success_probability": 0.5, "optimal_time_slot": "morning"},
        {"territory_id": "X", "lat": 2.0, "lng": 2.0, "priority": 2, "estimated_duration": 20.0,
         "success_probability": 0.4, "optimal_time_slot": "evening"}
    ]"#;

    let result = serde_json::from_str::<TerritoryCatalog>(json);
    let message = result.unwrap_err().to_string();
    assert!(message.contains("duplicate territory id X"), "got {}", message);
}

#[test]
fn test_catalog_deserialization_clamps_fields() {
    let json = r#"[
        {"territory_id": "X", "lat": 1.0, "lng": 1.0, "priority": 9, "estimated_duration": -5.0,
         "success_probability": 3.0, "optimal_time_slot": "afternoon"}
    ]"#;

    let catalog: TerritoryCatalog = serde_json::from_str(json).unwrap();
    let point = catalog.get("X").unwrap();
    assert_eq!(point.priority, 5);
    assert_eq!(point.success_probability, 1.0);
    assert!(point.estimated_duration > 0.0);
}

#[test]
fn test_catalog_serializes_as_point_array() {
    let catalog = TerritoryCatalog::new(create_test_points()).unwrap();

    let json = serde_json::to_string(&catalog).unwrap();
    assert!(json.starts_with('['));

    let restored: TerritoryCatalog = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.points(), catalog.points());
}
