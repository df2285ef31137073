//! Configuration for route optimization calls and for the engine itself.

use crate::error::ConfigurationError;
use crate::geometry::Coordinate;
use crate::model::ModelPreset;
use crate::skills::ConductorSkills;
use crate::territory::TimeSlotPreference;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Constraints for a single optimization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOptimizationConfig {
    /// Maximum number of territories in the route
    pub max_territories: i64,
    /// Maximum total minutes of travel plus service
    pub max_travel_time: i64,
    /// Rank candidates by priority weighted with success probability
    pub prioritize_success: bool,
    /// Skip territories visited in the recent-visit window
    pub avoid_recent_visits: bool,
    pub time_slot_preference: TimeSlotPreference,
    pub conductor_skills: ConductorSkills,
}

impl Default for RouteOptimizationConfig {
    fn default() -> Self {
        RouteOptimizationConfig {
            max_territories: 8,
            max_travel_time: 480,
            prioritize_success: true,
            avoid_recent_visits: true,
            time_slot_preference: TimeSlotPreference::Any,
            conductor_skills: ConductorSkills::default(),
        }
    }
}

impl RouteOptimizationConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        RouteOptimizationConfig::default()
    }

    /// Set the maximum number of territories.
    pub fn with_max_territories(mut self, max: i64) -> Self {
        self.max_territories = max;
        self
    }

    /// Set the travel-plus-service budget in minutes.
    pub fn with_max_travel_time(mut self, minutes: i64) -> Self {
        self.max_travel_time = minutes;
        self
    }

    pub fn with_prioritize_success(mut self, enabled: bool) -> Self {
        self.prioritize_success = enabled;
        self
    }

    pub fn with_avoid_recent_visits(mut self, enabled: bool) -> Self {
        self.avoid_recent_visits = enabled;
        self
    }

    pub fn with_time_slot_preference(mut self, preference: TimeSlotPreference) -> Self {
        self.time_slot_preference = preference;
        self
    }

    pub fn with_conductor_skills(mut self, skills: ConductorSkills) -> Self {
        self.conductor_skills = skills;
        self
    }

    /// Reject configurations that no constructor could honour.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_territories <= 0 {
            return Err(ConfigurationError::NonPositiveMaxTerritories(self.max_territories));
        }
        if self.max_travel_time <= 0 {
            return Err(ConfigurationError::NonPositiveMaxTravelTime(self.max_travel_time));
        }
        Ok(())
    }

    /// Route length limit as an index bound. Only meaningful after `validate`.
    pub fn territory_limit(&self) -> usize {
        usize::try_from(self.max_territories).unwrap_or(0)
    }

    /// Travel-plus-service budget in minutes.
    pub fn travel_budget(&self) -> f64 {
        self.max_travel_time as f64
    }
}

/// Tunables owned by a [`crate::RouteEngine`] instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Dispatch office every route starts from and returns to
    pub depot: Coordinate,
    /// Average driving speed used to turn km into minutes
    pub speed_kmh: f64,
    /// Number of K-means clusters (k)
    pub cluster_count: usize,
    /// Fixed number of K-means iterations
    pub kmeans_iterations: usize,
    /// Seed for the K-means centroid sampling
    pub kmeans_seed: u64,
    /// Largest candidate count handled by the exhaustive permutation search
    pub exact_search_threshold: usize,
    /// Maximum permutations evaluated by one exhaustive search
    pub permutation_budget: usize,
    /// Days after a visit during which a territory counts as recently visited
    pub recent_visit_days: u32,
    /// Number of routes kept in the history ledger
    pub history_capacity: usize,
    /// Share of routed distance reported as saved
    pub savings_factor: f64,
    /// Weight preset used by the cluster-informed strategy
    pub model: ModelPreset,
    /// Optional wall-clock limit per optimization, measured from the start of
    /// the call. The exhaustive search stops at it with its best permutation
    /// so far, and constructors not yet started are skipped; nearest neighbor
    /// always runs. Clustering is cached per catalog and is not bounded.
    pub time_limit: Option<Duration>,
    /// Run the constructors on the rayon thread pool
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            depot: Coordinate::new(19.4326, -99.1332),
            speed_kmh: 30.0,
            cluster_count: 5,
            kmeans_iterations: 10,
            kmeans_seed: 42,
            exact_search_threshold: 8,
            permutation_budget: 5000,
            recent_visit_days: 3,
            history_capacity: 100,
            savings_factor: 0.2,
            model: ModelPreset::TerritoryClusterer,
            time_limit: None,
            parallel: true,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        EngineConfig::default()
    }

    /// Set the depot coordinate.
    pub fn with_depot(mut self, depot: Coordinate) -> Self {
        self.depot = depot;
        self
    }

    /// Set the average driving speed.
    pub fn with_speed_kmh(mut self, speed_kmh: f64) -> Self {
        self.speed_kmh = speed_kmh;
        self
    }

    /// Set the number of clusters.
    pub fn with_cluster_count(mut self, k: usize) -> Self {
        self.cluster_count = k;
        self
    }

    pub fn with_kmeans_iterations(mut self, iterations: usize) -> Self {
        self.kmeans_iterations = iterations;
        self
    }

    pub fn with_kmeans_seed(mut self, seed: u64) -> Self {
        self.kmeans_seed = seed;
        self
    }

    /// Set the candidate count up to which the exhaustive search runs.
    pub fn with_exact_search_threshold(mut self, threshold: usize) -> Self {
        self.exact_search_threshold = threshold;
        self
    }

    /// Set the permutation budget of the exhaustive search.
    pub fn with_permutation_budget(mut self, budget: usize) -> Self {
        self.permutation_budget = budget;
        self
    }

    pub fn with_recent_visit_days(mut self, days: u32) -> Self {
        self.recent_visit_days = days;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_savings_factor(mut self, factor: f64) -> Self {
        self.savings_factor = factor;
        self
    }

    pub fn with_model(mut self, model: ModelPreset) -> Self {
        self.model = model;
        self
    }

    /// Set the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.cluster_count == 0 {
            return Err(ConfigurationError::ZeroClusterCount);
        }
        if self.permutation_budget == 0 {
            return Err(ConfigurationError::ZeroPermutationBudget);
        }
        if self.history_capacity == 0 {
            return Err(ConfigurationError::ZeroHistoryCapacity);
        }
        if !(self.speed_kmh > 0.0 && self.speed_kmh.is_finite()) {
            return Err(ConfigurationError::NonPositiveSpeed);
        }
        Ok(())
    }
}
