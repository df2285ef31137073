//! Command-line front-end for the territory route optimizer.

use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use territory_routes::config::{EngineConfig, RouteOptimizationConfig};
use territory_routes::geometry::Coordinate;
use territory_routes::model::ModelPreset;
use territory_routes::territory::{SyntheticSource, TerritoryCatalog, TimeSlotPreference};
use territory_routes::utils::{print_route_visualization, save_route, write_route, RouteStatistics};
use territory_routes::RouteEngine;

#[derive(Debug, Parser)]
#[command(name = "territory-routes", version, about = "Optimize a visiting route over a territory catalog")]
struct Args {
    /// Conductor the route is built for
    #[arg(long, default_value = "conductor-1")]
    conductor: String,

    /// JSON catalog (array of route points); a synthetic catalog is used when absent
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Size of the synthetic catalog
    #[arg(long, default_value_t = 40)]
    territories: usize,

    /// Seed for the synthetic catalog and K-means
    #[arg(long, default_value_t = 7)]
    seed: u64,

    #[arg(long, default_value_t = 19.4326, allow_hyphen_values = true)]
    depot_lat: f64,

    #[arg(long, default_value_t = -99.1332, allow_hyphen_values = true)]
    depot_lng: f64,

    #[arg(long, default_value_t = 8)]
    max_territories: i64,

    /// Travel plus service budget in minutes
    #[arg(long, default_value_t = 480)]
    max_travel_time: i64,

    /// Rank by priority only instead of priority times success
    #[arg(long)]
    priority_only: bool,

    /// Keep territories visited in the last days
    #[arg(long)]
    include_recent: bool,

    /// morning, afternoon, evening or any
    #[arg(long, default_value = "any")]
    time_slot: TimeSlotPreference,

    /// distance-optimizer, success-predictor or territory-clusterer
    #[arg(long, default_value = "territory-clusterer")]
    model: ModelPreset,

    #[arg(long, default_value_t = 5)]
    clusters: usize,

    /// Wall-clock limit for the exhaustive search, in milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Print the route as JSON
    #[arg(long)]
    json: bool,

    /// Draw an ASCII map of the route
    #[arg(long)]
    map: bool,

    /// Write a plain-text report to this file
    #[arg(long)]
    export: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs() as i64);
    let depot = Coordinate::new(args.depot_lat, args.depot_lng);

    let catalog = match &args.catalog {
        Some(path) => {
            info!("Loading catalog from: {}", path.display());
            TerritoryCatalog::from_file(path)?
        }
        None => {
            info!("Generating {} synthetic territories (seed {})", args.territories, args.seed);
            let source = SyntheticSource::new(args.territories, depot, args.seed).with_now(now);
            TerritoryCatalog::from_source(&source)?
        }
    };
    let catalog_size = catalog.len();

    let mut engine_config = EngineConfig::new()
        .with_depot(depot)
        .with_cluster_count(args.clusters)
        .with_kmeans_seed(args.seed)
        .with_model(args.model);
    if let Some(ms) = args.time_limit_ms {
        engine_config = engine_config.with_time_limit(Duration::from_millis(ms));
    }

    let engine = RouteEngine::new(catalog, engine_config)?;

    let config = RouteOptimizationConfig::new()
        .with_max_territories(args.max_territories)
        .with_max_travel_time(args.max_travel_time)
        .with_prioritize_success(!args.priority_only)
        .with_avoid_recent_visits(!args.include_recent)
        .with_time_slot_preference(args.time_slot);

    let start_time = Instant::now();
    let route = engine.optimize_route_at(&args.conductor, &config, now)?;
    let runtime = start_time.elapsed();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&route)?);
    } else {
        write_route(&route, &mut std::io::stdout().lock())?;
    }

    if args.map {
        print_route_visualization(&route, depot);
    }

    if let Some(path) = &args.export {
        info!("Saving route to: {}", path.display());
        save_route(&route, path)?;
    }

    let statistics = RouteStatistics {
        runtime,
        catalog_size,
        cluster_count: engine.get_clusters().len(),
        metrics: engine.get_metrics(),
    };
    info!("{}", statistics.format());

    Ok(())
}
