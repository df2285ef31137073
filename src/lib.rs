//! # Territory Routes
//!
//! A route optimization engine for territory assignments.
//!
//! Given a catalog of geographically distributed territories, a conductor's
//! skill profile and a set of per-call constraints, the engine selects
//! eligible territories, builds competing visiting orders (bounded exact
//! search, nearest neighbor, budget-aware greedy and a cluster-informed
//! search over a K-means partition), scores them, and returns the most
//! efficient route together with ranked alternatives and recommendations.

pub mod clustering;
pub mod config;
pub mod construction;
pub mod error;
pub mod geometry;
pub mod ledger;
pub mod model;
pub mod route;
pub mod scoring;
pub mod selection;
pub mod skills;
pub mod synthesis;
pub mod territory;
pub mod utils;

use crate::clustering::{KMeans, TerritoryCluster};
use crate::config::{EngineConfig, RouteOptimizationConfig};
use crate::construction::ConstructionContext;
use crate::error::{CatalogError, ConfigurationError, EngineError};
use crate::ledger::{RouteHistory, RouteMetrics};
use crate::route::{OptimizedRoute, RouteContext, RouteStrategy};
use crate::territory::{TerritoryCatalog, TerritorySource};

use log::info;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Catalog snapshot together with a revision bumped on every edit.
#[derive(Debug)]
struct CatalogState {
    catalog: TerritoryCatalog,
    revision: u64,
}

/// Cluster partition computed for one catalog revision.
#[derive(Debug)]
struct ClusterCache {
    revision: u64,
    clusters: Arc<Vec<TerritoryCluster>>,
}

/// The route optimization engine.
///
/// Owns its catalog snapshot, the cached cluster partition and the bounded
/// route history. Independent instances share nothing. All methods take
/// `&self`, so one engine can serve concurrent callers.
#[derive(Debug)]
pub struct RouteEngine {
    config: EngineConfig,
    catalog: RwLock<CatalogState>,
    clusters: RwLock<Option<ClusterCache>>,
    history: Mutex<RouteHistory>,
    next_route: AtomicU64,
}

impl RouteEngine {
    /// Create an engine over the given catalog.
    pub fn new(catalog: TerritoryCatalog, config: EngineConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;

        Ok(RouteEngine {
            history: Mutex::new(RouteHistory::new(config.history_capacity)),
            config,
            catalog: RwLock::new(CatalogState { catalog, revision: 0 }),
            clusters: RwLock::new(None),
            next_route: AtomicU64::new(1),
        })
    }

    /// Create an engine from any territory provider.
    pub fn from_source<S: TerritorySource + ?Sized>(
        source: &S,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let catalog = TerritoryCatalog::from_source(source)?;
        Ok(Self::new(catalog, config)?)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Copy of the current catalog.
    pub fn catalog(&self) -> TerritoryCatalog {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner).catalog.clone()
    }

    /// Swap in a new catalog and drop the cached clusters.
    pub fn replace_catalog(&self, catalog: TerritoryCatalog) {
        let mut state = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        state.catalog = catalog;
        state.revision += 1;
        *self.clusters.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Record a visit to a territory.
    pub fn mark_visited(&self, territory_id: &str, timestamp: i64) -> Result<(), CatalogError> {
        let mut state = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        state.catalog.mark_visited(territory_id, timestamp)?;
        state.revision += 1;
        *self.clusters.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }

    /// Current cluster partition, recomputed only after catalog changes.
    pub fn get_clusters(&self) -> Vec<TerritoryCluster> {
        let state = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
        (*self.clusters_for(&state)).clone()
    }

    /// Aggregate statistics over the route history.
    pub fn get_metrics(&self) -> RouteMetrics {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .metrics(self.config.savings_factor, self.config.model)
    }

    /// Routes in the history ledger, oldest first.
    pub fn get_history(&self) -> Vec<OptimizedRoute> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).routes()
    }

    /// Optimize a route for `conductor_id` as of the current system time.
    pub fn optimize_route(
        &self,
        conductor_id: &str,
        config: &RouteOptimizationConfig,
    ) -> Result<OptimizedRoute, ConfigurationError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs() as i64);
        self.optimize_route_at(conductor_id, config, now)
    }

    /// Optimize a route for `conductor_id` with `now` (unix seconds) as the
    /// reference time for recent-visit filtering.
    ///
    /// Fails only when `config` is invalid. When no territory is eligible the
    /// result is an empty route with a single explanatory recommendation.
    pub fn optimize_route_at(
        &self,
        conductor_id: &str,
        config: &RouteOptimizationConfig,
        now: i64,
    ) -> Result<OptimizedRoute, ConfigurationError> {
        config.validate()?;
        let start = Instant::now();

        let (candidates, clusters) = {
            let state = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
            let candidates = selection::select_candidates(
                state.catalog.points(),
                config,
                now,
                self.config.recent_visit_days,
            );
            (candidates, self.clusters_for(&state))
        };

        if candidates.is_empty() {
            info!("no eligible territories for conductor {}", conductor_id);
            return Ok(self.empty_route(conductor_id, config));
        }

        let adjusted = skills::adjust_for_skills(&candidates, &config.conductor_skills);

        let context = ConstructionContext {
            conductor_id,
            config,
            route: RouteContext::new(self.config.depot, self.config.speed_kmh),
            clusters: clusters.as_slice(),
            model: self.config.model,
            exact_search_threshold: self.config.exact_search_threshold,
            permutation_budget: self.config.permutation_budget,
            deadline: self.config.time_limit.map(|limit| start + limit),
        };

        let routes = construction::construct_all(&adjusted, &context, self.config.parallel);
        let (mut winner, others) = match scoring::rank_routes(routes) {
            Some((winner, others)) if !winner.is_empty() => (winner, others),
            _ => return Ok(self.empty_route(conductor_id, config)),
        };

        winner.id = self.next_route_id(conductor_id);
        winner.alternatives = synthesis::build_alternatives(&winner, &others);
        winner.recommendations = synthesis::recommendations(&winner, config);

        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(winner.clone());

        info!(
            "route {} for {}: {} stops via {}, {:.2} km, efficiency {:.3} ({} ms)",
            winner.id,
            conductor_id,
            winner.points.len(),
            winner.strategy,
            winner.total_distance,
            winner.efficiency_score,
            start.elapsed().as_millis()
        );

        Ok(winner)
    }

    fn empty_route(&self, conductor_id: &str, config: &RouteOptimizationConfig) -> OptimizedRoute {
        let mut route = OptimizedRoute::empty(conductor_id, RouteStrategy::NearestNeighbor);
        route.id = self.next_route_id(conductor_id);
        route.recommendations = synthesis::recommendations(&route, config);
        route
    }

    fn next_route_id(&self, conductor_id: &str) -> String {
        let n = self.next_route.fetch_add(1, Ordering::Relaxed);
        format!("route-{}-{:06}", conductor_id, n)
    }

    /// Clusters for the catalog revision held by `state`.
    ///
    /// The caller holds the catalog read lock, which keeps the revision stable
    /// while the partition is computed.
    fn clusters_for(&self, state: &CatalogState) -> Arc<Vec<TerritoryCluster>> {
        {
            let cache = self.clusters.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = cache.as_ref().filter(|c| c.revision == state.revision) {
                return Arc::clone(&cached.clusters);
            }
        }

        let mut cache = self.clusters.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = cache.as_ref().filter(|c| c.revision == state.revision) {
            return Arc::clone(&cached.clusters);
        }

        let kmeans = KMeans::new(
            self.config.cluster_count,
            self.config.kmeans_iterations,
            self.config.kmeans_seed,
        );
        let clusters = Arc::new(kmeans.cluster(state.catalog.points()));
        *cache = Some(ClusterCache {
            revision: state.revision,
            clusters: Arc::clone(&clusters),
        });
        clusters
    }
}
