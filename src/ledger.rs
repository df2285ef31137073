//! Bounded history of produced routes and the metrics derived from it.

use crate::model::ModelPreset;
use crate::route::{OptimizedRoute, RouteStrategy};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Aggregates over the routes currently held in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    pub total_routes: usize,
    pub average_efficiency: f64,
    /// Cumulative routed distance times the savings factor
    pub total_distance_saved: f64,
    /// Reported accuracy of the active weight preset
    pub model_accuracy: f64,
    pub average_distance: f64,
    pub average_points: f64,
    /// How often each strategy produced the winning route
    pub strategy_wins: BTreeMap<String, usize>,
}

/// Ring buffer of the most recent routes, oldest evicted first.
#[derive(Debug, Clone)]
pub struct RouteHistory {
    capacity: usize,
    routes: VecDeque<OptimizedRoute>,
}

impl RouteHistory {
    pub fn new(capacity: usize) -> Self {
        RouteHistory {
            capacity,
            routes: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Append a route, dropping the oldest entries beyond capacity.
    pub fn record(&mut self, route: OptimizedRoute) {
        self.routes.push_back(route);
        while self.routes.len() > self.capacity {
            self.routes.pop_front();
        }
    }

    /// Routes from oldest to newest.
    pub fn routes(&self) -> Vec<OptimizedRoute> {
        self.routes.iter().cloned().collect()
    }

    pub fn metrics(&self, savings_factor: f64, model: ModelPreset) -> RouteMetrics {
        let total_routes = self.routes.len();
        let total_distance: f64 = self.routes.iter().map(|r| r.total_distance).sum();

        let mut strategy_wins = BTreeMap::new();
        for strategy in RouteStrategy::ALL {
            strategy_wins.insert(strategy.name().to_string(), 0);
        }
        for route in &self.routes {
            *strategy_wins.entry(route.strategy.name().to_string()).or_insert(0) += 1;
        }

        let mean = |sum: f64| if total_routes == 0 { 0.0 } else { sum / total_routes as f64 };

        RouteMetrics {
            total_routes,
            average_efficiency: mean(self.routes.iter().map(|r| r.efficiency_score).sum()),
            total_distance_saved: total_distance * savings_factor,
            model_accuracy: model.reported_accuracy(),
            average_distance: mean(total_distance),
            average_points: mean(self.routes.iter().map(|r| r.points.len() as f64).sum()),
            strategy_wins,
        }
    }
}
