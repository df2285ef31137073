//! Route representation returned to callers.

use crate::geometry::{route_distance, travel_minutes, Coordinate};
use crate::scoring::efficiency_score;
use crate::territory::RoutePoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The constructor that produced a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteStrategy {
    ExactSearch,
    NearestNeighbor,
    Greedy,
    ClusterInformed,
}

impl RouteStrategy {
    pub const ALL: [RouteStrategy; 4] = [
        RouteStrategy::ExactSearch,
        RouteStrategy::NearestNeighbor,
        RouteStrategy::Greedy,
        RouteStrategy::ClusterInformed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RouteStrategy::ExactSearch => "exact-search",
            RouteStrategy::NearestNeighbor => "nearest-neighbor",
            RouteStrategy::Greedy => "greedy",
            RouteStrategy::ClusterInformed => "cluster-informed",
        }
    }
}

impl fmt::Display for RouteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Depot position and speed needed to measure a route.
#[derive(Debug, Clone, Copy)]
pub struct RouteContext {
    pub depot: Coordinate,
    pub speed_kmh: f64,
}

impl RouteContext {
    pub fn new(depot: Coordinate, speed_kmh: f64) -> Self {
        RouteContext { depot, speed_kmh }
    }

    /// Depot-inclusive length of a sequence of points.
    pub fn distance_of(&self, points: &[RoutePoint]) -> f64 {
        route_distance(self.depot, points.iter().map(RoutePoint::coordinate))
    }

    /// Travel plus service minutes of a sequence of points.
    pub fn time_of(&self, points: &[RoutePoint], distance_km: f64) -> f64 {
        let service: f64 = points.iter().map(|p| p.estimated_duration).sum();
        travel_minutes(distance_km, self.speed_kmh) + service
    }
}

/// A route considered but not chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeRoute {
    pub id: String,
    pub strategy: RouteStrategy,
    pub points: Vec<RoutePoint>,
    pub total_distance: f64,
    pub estimated_time: f64,
    pub expected_calls: usize,
    pub efficiency_score: f64,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// An ordered visiting plan for one conductor.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedRoute {
    pub id: String,
    pub conductor_id: String,
    pub strategy: RouteStrategy,
    /// Visiting order, excluding the depot
    pub points: Vec<RoutePoint>,
    /// Depot-inclusive distance in km
    pub total_distance: f64,
    /// Travel plus service minutes
    pub estimated_time: f64,
    pub expected_calls: usize,
    pub efficiency_score: f64,
    pub recommendations: Vec<String>,
    pub alternatives: Vec<AlternativeRoute>,
}

impl OptimizedRoute {
    /// Measure and score an ordered sequence of points.
    pub fn from_points(
        conductor_id: &str,
        strategy: RouteStrategy,
        points: Vec<RoutePoint>,
        context: &RouteContext,
    ) -> Self {
        if points.is_empty() {
            return Self::empty(conductor_id, strategy);
        }

        let total_distance = context.distance_of(&points);
        let estimated_time = context.time_of(&points, total_distance);
        let average_success =
            points.iter().map(|p| p.success_probability).sum::<f64>() / points.len() as f64;

        OptimizedRoute {
            id: String::new(),
            conductor_id: conductor_id.to_string(),
            strategy,
            expected_calls: points.len(),
            efficiency_score: efficiency_score(total_distance, estimated_time, average_success),
            total_distance,
            estimated_time,
            points,
            recommendations: Vec::new(),
            alternatives: Vec::new(),
        }
    }

    /// A route with no stops.
    pub fn empty(conductor_id: &str, strategy: RouteStrategy) -> Self {
        OptimizedRoute {
            id: String::new(),
            conductor_id: conductor_id.to_string(),
            strategy,
            points: Vec::new(),
            total_distance: 0.0,
            estimated_time: 0.0,
            expected_calls: 0,
            efficiency_score: 0.0,
            recommendations: Vec::new(),
            alternatives: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Average success probability of the stops, 0 for an empty route.
    pub fn average_success(&self) -> f64 {
        if self.points.is_empty() {
            0.0
        } else {
            self.points.iter().map(|p| p.success_probability).sum::<f64>() / self.points.len() as f64
        }
    }

    pub fn territory_ids(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.territory_id.as_str()).collect()
    }
}

impl fmt::Debug for OptimizedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OptimizedRoute {}:", self.id)?;
        writeln!(f, "  Conductor: {}", self.conductor_id)?;
        writeln!(f, "  Strategy: {}", self.strategy)?;
        writeln!(f, "  Stops: {:?}", self.territory_ids())?;
        writeln!(f, "  Distance: {:.2} km", self.total_distance)?;
        writeln!(f, "  Time: {:.1} min", self.estimated_time)?;
        writeln!(f, "  Efficiency: {:.3}", self.efficiency_score)?;

        for (i, alternative) in self.alternatives.iter().enumerate() {
            writeln!(
                f,
                "  Alternative {}: {} ({} stops, {:.2} km, efficiency {:.3})",
                i, alternative.strategy, alternative.expected_calls, alternative.total_distance, alternative.efficiency_score
            )?;
        }

        Ok(())
    }
}
