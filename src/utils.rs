//! Utility functions for reporting and exporting routes.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use crate::geometry::Coordinate;
use crate::ledger::RouteMetrics;
use crate::route::OptimizedRoute;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Format a number of minutes as `Hh MMm`.
pub fn format_minutes(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    format!("{}h {:02}m", total / 60, total % 60)
}

/// Save a route as plain text.
pub fn save_route<P: AsRef<Path>>(route: &OptimizedRoute, path: P) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    write_route(route, &mut file)
}

/// Write the plain-text report of a route.
pub fn write_route<W: Write>(route: &OptimizedRoute, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Route {} for conductor {}", route.id, route.conductor_id)?;
    writeln!(out, "Strategy: {}", route.strategy)?;
    writeln!(out, "Total Distance: {:.2} km", route.total_distance)?;
    writeln!(out, "Estimated Time: {}", format_minutes(route.estimated_time))?;
    writeln!(out, "Expected Calls: {}", route.expected_calls)?;
    writeln!(out, "Efficiency: {:.3}", route.efficiency_score)?;
    writeln!(out)?;

    write!(out, "Depot")?;
    for point in &route.points {
        write!(out, " -> {}", point.territory_id)?;
    }
    writeln!(out, " -> Depot")?;
    writeln!(out)?;

    for (i, point) in route.points.iter().enumerate() {
        writeln!(
            out,
            "  {:>2}. {} ({:.5}, {:.5}) priority {} success {:.2} {:.0} min {}",
            i + 1,
            point.territory_id,
            point.lat,
            point.lng,
            point.priority,
            point.success_probability,
            point.estimated_duration,
            point.optimal_time_slot
        )?;
    }

    if !route.recommendations.is_empty() {
        writeln!(out)?;
        writeln!(out, "Recommendations:")?;
        for recommendation in &route.recommendations {
            writeln!(out, "  - {}", recommendation)?;
        }
    }

    for alternative in &route.alternatives {
        writeln!(out)?;
        writeln!(
            out,
            "Alternative {} ({}): {} stops, {:.2} km, efficiency {:.3}",
            alternative.id,
            alternative.strategy,
            alternative.expected_calls,
            alternative.total_distance,
            alternative.efficiency_score
        )?;
        if !alternative.pros.is_empty() {
            writeln!(out, "  pros: {}", alternative.pros.join(", "))?;
        }
        if !alternative.cons.is_empty() {
            writeln!(out, "  cons: {}", alternative.cons.join(", "))?;
        }
    }

    Ok(())
}

/// Summary of an engine run, for the command line.
pub struct RouteStatistics {
    pub runtime: Duration,
    pub catalog_size: usize,
    pub cluster_count: usize,
    pub metrics: RouteMetrics,
}

impl RouteStatistics {
    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Run Statistics:
- Runtime: {}
- Catalog Size: {}
- Clusters: {}
- Routes Produced: {}
- Average Efficiency: {:.3}
- Distance Saved: {:.2} km
- Model Accuracy: {:.2}",
            format_duration(self.runtime),
            self.catalog_size,
            self.cluster_count,
            self.metrics.total_routes,
            self.metrics.average_efficiency,
            self.metrics.total_distance_saved,
            self.metrics.model_accuracy
        )
    }
}

/// Render the depot and stops on a character grid.
///
/// Stops are drawn as their 1-based position in the route (`1`-`9`, then
/// `*`), the depot as `D`.
pub fn render_route_map(route: &OptimizedRoute, depot: Coordinate) -> String {
    let width = 60;
    let height = 20;

    let mut min_lat = depot.lat;
    let mut max_lat = depot.lat;
    let mut min_lng = depot.lng;
    let mut max_lng = depot.lng;

    for point in &route.points {
        min_lat = min_lat.min(point.lat);
        max_lat = max_lat.max(point.lat);
        min_lng = min_lng.min(point.lng);
        max_lng = max_lng.max(point.lng);
    }

    let lat_span = (max_lat - min_lat).max(f64::EPSILON);
    let lng_span = (max_lng - min_lng).max(f64::EPSILON);

    // North is up, so latitude maps to inverted rows.
    let cell = |c: Coordinate| {
        let x = ((c.lng - min_lng) / lng_span * (width as f64 - 1.0)).round() as usize;
        let y = ((max_lat - c.lat) / lat_span * (height as f64 - 1.0)).round() as usize;
        (x.min(width - 1), y.min(height - 1))
    };

    let mut grid = vec![vec!['.'; width]; height];

    for (i, point) in route.points.iter().enumerate() {
        let (x, y) = cell(point.coordinate());
        grid[y][x] = char::from_digit((i + 1) as u32, 10).unwrap_or('*');
    }

    let (x, y) = cell(depot);
    grid[y][x] = 'D';

    let mut map = String::with_capacity((width + 1) * height);
    for row in &grid {
        map.extend(row.iter());
        map.push('\n');
    }
    map
}

/// Print route visualization to console.
pub fn print_route_visualization(route: &OptimizedRoute, depot: Coordinate) {
    println!("Route Visualization for {}", route.id);
    println!("Total Distance: {:.2} km", route.total_distance);
    println!("Stops: {}", route.points.len());
    println!();
    print!("{}", render_route_map(route, depot));
    println!();
    println!("Legend:");
    println!("D - Depot");
    println!("1-9 - Stop order (* beyond 9)");
    println!();
}
