//! Bounded exhaustive permutation search for small candidate sets.

use super::{nearest_neighbor, ConstructionContext};
use crate::geometry::route_distance;
use crate::route::{OptimizedRoute, RouteStrategy};
use crate::territory::RoutePoint;
use itertools::Itertools;
use log::{debug, warn};
use std::time::Instant;

/// How many permutations are evaluated between two deadline checks.
const DEADLINE_CHECK_INTERVAL: usize = 256;

/// Outcome of a permutation search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Indices into the searched slice, in visiting order
    pub order: Vec<usize>,
    pub distance: f64,
    pub evaluated: usize,
    /// The whole permutation space was enumerated
    pub complete: bool,
}

/// Shortest ordering of the top `min(max_territories, n)` candidates.
///
/// Only runs the permutation search while the candidate count is within the
/// exact-search threshold; larger inputs degrade to the nearest-neighbor
/// order, still tagged as this strategy.
pub fn construct(candidates: &[RoutePoint], context: &ConstructionContext<'_>) -> OptimizedRoute {
    let limit = context.config.territory_limit();

    if candidates.len() > context.exact_search_threshold {
        debug!(
            "exact search skipped for {} candidates (threshold {})",
            candidates.len(),
            context.exact_search_threshold
        );
        let order = nearest_neighbor::nearest_neighbor_order(candidates, limit);
        return context.finish(RouteStrategy::ExactSearch, order);
    }

    let selected = &candidates[..limit.min(candidates.len())];
    let outcome = shortest_permutation(
        selected,
        context,
        context.permutation_budget,
        context.deadline,
    );

    if !outcome.complete {
        warn!(
            "exact search stopped after {} permutations of {} stops; keeping best found",
            outcome.evaluated,
            selected.len()
        );
    }

    let order = outcome.order.iter().map(|&i| selected[i].clone()).collect();
    context.finish(RouteStrategy::ExactSearch, order)
}

/// Enumerate permutations lazily, keeping only the shortest closed tour.
///
/// At most `budget` permutations are generated, and generation also stops
/// once `deadline` has passed.
pub fn shortest_permutation(
    points: &[RoutePoint],
    context: &ConstructionContext<'_>,
    budget: usize,
    deadline: Option<Instant>,
) -> SearchOutcome {
    let n = points.len();
    if n == 0 {
        return SearchOutcome {
            order: Vec::new(),
            distance: 0.0,
            evaluated: 0,
            complete: true,
        };
    }

    let depot = context.route.depot;
    let mut best_order: Vec<usize> = (0..n).collect();
    let mut best_distance = f64::INFINITY;
    let mut evaluated = 0;
    let mut complete = true;

    for permutation in (0..n).permutations(n) {
        if evaluated >= budget {
            complete = false;
            break;
        }
        if evaluated % DEADLINE_CHECK_INTERVAL == 0 {
            if let Some(deadline) = deadline {
                if evaluated > 0 && Instant::now() >= deadline {
                    complete = false;
                    break;
                }
            }
        }

        let length = route_distance(depot, permutation.iter().map(|&i| points[i].coordinate()));
        evaluated += 1;

        if length < best_distance {
            best_distance = length;
            best_order = permutation;
        }
    }

    SearchOutcome {
        order: best_order,
        distance: best_distance,
        evaluated,
        complete,
    }
}
