//! Budget-aware greedy construction with multi-factor scoring.

use super::ConstructionContext;
use crate::geometry::{distance, travel_minutes};
use crate::route::{OptimizedRoute, RouteStrategy};
use crate::territory::{RoutePoint, TimeSlotPreference};

const DISTANCE_SMOOTHING: f64 = 0.1;
const SUCCESS_FACTOR: f64 = 2.0;
const PRIORITY_FACTOR: f64 = 0.5;
const SLOT_MATCH_BONUS: f64 = 1.0;
const SLOT_MISMATCH_BONUS: f64 = 0.5;

pub fn construct(candidates: &[RoutePoint], context: &ConstructionContext<'_>) -> OptimizedRoute {
    let order = greedy_order(candidates, context);
    context.finish(RouteStrategy::Greedy, order)
}

/// Attractiveness of moving `distance_km` to `point`.
pub fn greedy_score(point: &RoutePoint, distance_km: f64, preference: TimeSlotPreference) -> f64 {
    let slot_bonus = if preference.matches(point.optimal_time_slot) {
        SLOT_MATCH_BONUS
    } else {
        SLOT_MISMATCH_BONUS
    };

    1.0 / (distance_km + DISTANCE_SMOOTHING)
        + SUCCESS_FACTOR * point.success_probability
        + PRIORITY_FACTOR * f64::from(point.priority)
        + slot_bonus
}

/// Grow a route from the depot, always taking the best-scoring candidate that
/// still fits the time budget.
///
/// A candidate fits when travel to it, its service time and the drive back
/// to the depot keep the running total within `max_travel_time`.
pub fn greedy_order(candidates: &[RoutePoint], context: &ConstructionContext<'_>) -> Vec<RoutePoint> {
    let limit = context.config.territory_limit();
    let budget = context.config.travel_budget();
    let preference = context.config.time_slot_preference;
    let depot = context.route.depot;
    let speed = context.route.speed_kmh;

    let mut used = vec![false; candidates.len()];
    let mut order = Vec::new();
    let mut position = depot;
    let mut elapsed = 0.0;

    while order.len() < limit {
        let mut best: Option<(usize, f64, f64)> = None;

        for (i, point) in candidates.iter().enumerate() {
            if used[i] {
                continue;
            }

            let leg = distance(position, point.coordinate());
            let arrival = elapsed + travel_minutes(leg, speed) + point.estimated_duration;
            let return_leg = travel_minutes(distance(point.coordinate(), depot), speed);
            if arrival + return_leg > budget {
                continue;
            }

            let score = greedy_score(point, leg, preference);
            if best.map_or(true, |(_, best_score, _)| score > best_score) {
                best = Some((i, score, arrival));
            }
        }

        let Some((next, _, arrival)) = best else {
            break;
        };

        used[next] = true;
        elapsed = arrival;
        position = candidates[next].coordinate();
        order.push(candidates[next].clone());
    }

    order
}
