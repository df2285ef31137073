//! Basic example of using the territory route optimizer.

use territory_routes::config::{EngineConfig, RouteOptimizationConfig};
use territory_routes::geometry::Coordinate;
use territory_routes::skills::ConductorSkills;
use territory_routes::territory::{SyntheticSource, TimeSlot, TimeSlotPreference};
use territory_routes::utils::{format_duration, print_route_visualization, save_route};
use territory_routes::RouteEngine;
use std::env;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Get catalog size from command line or use default
    let args: Vec<String> = env::args().collect();
    let count = if args.len() > 1 { args[1].parse()? } else { 40 };

    let depot = Coordinate::new(19.4326, -99.1332);
    let now = 1_700_000_000;

    // Build a reproducible catalog
    println!("Generating {} territories", count);
    let source = SyntheticSource::new(count, depot, 7).with_now(now);
    let engine = RouteEngine::from_source(&source, EngineConfig::new().with_depot(depot))?;

    for cluster in engine.get_clusters() {
        println!(
            "Cluster {}: {} territories, success {:.2}, best on {} {}",
            cluster.id, cluster.density, cluster.average_success_rate, cluster.optimal_day, cluster.optimal_time_slot
        );
    }

    // Configure the call
    let skills = ConductorSkills::new()
        .with_experience("T001", 0.8)
        .with_affinity(TimeSlot::Morning, 0.6);
    let config = RouteOptimizationConfig::new()
        .with_max_territories(6)
        .with_max_travel_time(360)
        .with_time_slot_preference(TimeSlotPreference::Any)
        .with_conductor_skills(skills);

    let start_time = Instant::now();
    let route = engine.optimize_route_at("conductor-1", &config, now)?;
    println!("Optimized in {}", format_duration(start_time.elapsed()));
    println!("{:?}", route);

    for recommendation in &route.recommendations {
        println!("- {}", recommendation);
    }

    // Save route
    let output_path = format!("{}.txt", route.id);
    println!("Saving route to: {}", output_path);
    save_route(&route, &output_path)?;

    print_route_visualization(&route, depot);

    Ok(())
}
