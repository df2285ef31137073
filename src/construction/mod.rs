//! Route constructors.
//!
//! Every constructor receives the same skill-adjusted candidate list and
//! returns a complete [`OptimizedRoute`]. They share no mutable state and can
//! run in any order or in parallel.

pub mod clustered;
pub mod exact;
pub mod greedy;
pub mod nearest_neighbor;

use crate::clustering::TerritoryCluster;
use crate::config::RouteOptimizationConfig;
use crate::model::ModelPreset;
use crate::route::{OptimizedRoute, RouteContext, RouteStrategy};
use crate::territory::RoutePoint;
use log::debug;
use std::time::Instant;

/// Read-only inputs shared by all constructors during one optimization.
#[derive(Debug, Clone, Copy)]
pub struct ConstructionContext<'a> {
    pub conductor_id: &'a str,
    pub config: &'a RouteOptimizationConfig,
    pub route: RouteContext,
    pub clusters: &'a [TerritoryCluster],
    pub model: ModelPreset,
    pub exact_search_threshold: usize,
    pub permutation_budget: usize,
    /// Wall-clock instant after which the exhaustive search stops
    pub deadline: Option<Instant>,
}

impl<'a> ConstructionContext<'a> {
    /// Turn an ordered selection into a scored route.
    pub fn finish(&self, strategy: RouteStrategy, points: Vec<RoutePoint>) -> OptimizedRoute {
        let route = OptimizedRoute::from_points(self.conductor_id, strategy, points, &self.route);
        debug!(
            "{}: {} stops, {:.2} km, {:.1} min, efficiency {:.3}",
            strategy,
            route.points.len(),
            route.total_distance,
            route.estimated_time,
            route.efficiency_score
        );
        route
    }
}

/// Run the constructors, optionally on the rayon pool.
///
/// The output order is fixed: exact search, nearest neighbor, greedy,
/// cluster-informed. Once `context.deadline` has passed, constructors that
/// have not started yet are skipped; nearest neighbor always runs, so the
/// result is never empty.
pub fn construct_all(
    candidates: &[RoutePoint],
    context: &ConstructionContext<'_>,
    parallel: bool,
) -> Vec<OptimizedRoute> {
    let routes = if parallel {
        let ((exact, nearest), (greedy, clustered)) = rayon::join(
            || {
                rayon::join(
                    || before_deadline(context, RouteStrategy::ExactSearch, || exact::construct(candidates, context)),
                    || nearest_neighbor::construct(candidates, context),
                )
            },
            || {
                rayon::join(
                    || before_deadline(context, RouteStrategy::Greedy, || greedy::construct(candidates, context)),
                    || {
                        before_deadline(context, RouteStrategy::ClusterInformed, || {
                            clustered::construct(candidates, context)
                        })
                    },
                )
            },
        );
        [exact, Some(nearest), greedy, clustered]
    } else {
        let exact = before_deadline(context, RouteStrategy::ExactSearch, || exact::construct(candidates, context));
        let nearest = nearest_neighbor::construct(candidates, context);
        let greedy = before_deadline(context, RouteStrategy::Greedy, || greedy::construct(candidates, context));
        let clustered = before_deadline(context, RouteStrategy::ClusterInformed, || {
            clustered::construct(candidates, context)
        });
        [exact, Some(nearest), greedy, clustered]
    };

    routes.into_iter().flatten().collect()
}

/// Run `build` unless the deadline has already passed.
fn before_deadline<F>(context: &ConstructionContext<'_>, strategy: RouteStrategy, build: F) -> Option<OptimizedRoute>
where
    F: FnOnce() -> OptimizedRoute,
{
    match context.deadline {
        Some(deadline) if Instant::now() >= deadline => {
            debug!("{}: skipped, time limit reached", strategy);
            None
        }
        _ => Some(build()),
    }
}
