//! Error types for the route optimization engine.

use thiserror::Error;

/// Invalid per-call or per-engine configuration.
///
/// Raised before any candidate selection or route construction takes place.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// `max_territories` was zero or negative.
    #[error("max_territories must be greater than zero, got {0}")]
    NonPositiveMaxTerritories(i64),
    /// `max_travel_time` was zero or negative.
    #[error("max_travel_time must be greater than zero, got {0} minutes")]
    NonPositiveMaxTravelTime(i64),
    /// The engine was asked to build zero clusters.
    #[error("cluster_count must be greater than zero")]
    ZeroClusterCount,
    /// The exact search would not be allowed to evaluate any permutation.
    #[error("permutation_budget must be greater than zero")]
    ZeroPermutationBudget,
    /// The history ledger cannot hold any route.
    #[error("history_capacity must be greater than zero")]
    ZeroHistoryCapacity,
    /// Average travel speed must be a positive, finite number.
    #[error("speed_kmh must be positive and finite")]
    NonPositiveSpeed,
}

/// Errors raised while loading, saving or editing a territory catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Two points share the same territory id.
    #[error("duplicate territory id {0}")]
    DuplicateTerritory(String),
    #[error("unknown territory id {0}")]
    UnknownTerritory(String),
}

/// Errors raised while building a [`crate::RouteEngine`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
