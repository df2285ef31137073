//! Priority-seeded nearest-neighbor construction.

use super::ConstructionContext;
use crate::geometry::distance;
use crate::route::{OptimizedRoute, RouteStrategy};
use crate::territory::RoutePoint;

/// Keeps the success weighting finite for zero-probability territories.
const SUCCESS_SMOOTHING: f64 = 0.1;

pub fn construct(candidates: &[RoutePoint], context: &ConstructionContext<'_>) -> OptimizedRoute {
    let order = nearest_neighbor_order(candidates, context.config.territory_limit());
    context.finish(RouteStrategy::NearestNeighbor, order)
}

/// Order up to `limit` candidates, starting from the highest priority one and
/// repeatedly moving to the unvisited candidate with the lowest
/// `distance / (success + 0.1)`.
///
/// Priority ties are resolved in favour of the earlier candidate.
pub fn nearest_neighbor_order(candidates: &[RoutePoint], limit: usize) -> Vec<RoutePoint> {
    let limit = limit.min(candidates.len());
    if limit == 0 {
        return Vec::new();
    }

    let mut visited = vec![false; candidates.len()];
    let mut order = Vec::with_capacity(limit);

    let mut current = 0;
    for (i, point) in candidates.iter().enumerate() {
        if point.priority > candidates[current].priority {
            current = i;
        }
    }
    visited[current] = true;
    order.push(candidates[current].clone());

    while order.len() < limit {
        let here = candidates[current].coordinate();
        let mut best: Option<(usize, f64)> = None;

        for (i, point) in candidates.iter().enumerate() {
            if visited[i] {
                continue;
            }
            let cost = distance(here, point.coordinate())
                / (point.success_probability + SUCCESS_SMOOTHING);
            if best.map_or(true, |(_, best_cost)| cost < best_cost) {
                best = Some((i, cost));
            }
        }

        match best {
            Some((next, _)) => {
                visited[next] = true;
                order.push(candidates[next].clone());
                current = next;
            }
            None => break,
        }
    }

    order
}
