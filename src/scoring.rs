//! Efficiency scoring and winner selection.

use crate::route::OptimizedRoute;
use std::cmp::Ordering;

/// Distance at which the distance term reaches zero, in km.
pub const DISTANCE_CAP_KM: f64 = 150.0;
/// Duration at which the time term reaches zero, in minutes.
pub const TIME_CAP_MINUTES: f64 = 600.0;

const DISTANCE_WEIGHT: f64 = 0.3;
const TIME_WEIGHT: f64 = 0.3;
const SUCCESS_WEIGHT: f64 = 0.4;

/// `max(0, 1 - value / cap)`.
pub fn normalize(value: f64, cap: f64) -> f64 {
    (1.0 - value / cap).max(0.0)
}

/// Composite score in [0, 1]: shorter, quicker and more successful is better.
pub fn efficiency_score(distance_km: f64, time_minutes: f64, average_success: f64) -> f64 {
    let score = DISTANCE_WEIGHT * normalize(distance_km, DISTANCE_CAP_KM)
        + TIME_WEIGHT * normalize(time_minutes, TIME_CAP_MINUTES)
        + SUCCESS_WEIGHT * average_success.clamp(0.0, 1.0);
    score.clamp(0.0, 1.0)
}

/// Ordering in which `a` is better than `b` when it compares `Less`:
/// higher efficiency first, then fewer points.
pub fn compare_routes(a: &OptimizedRoute, b: &OptimizedRoute) -> Ordering {
    b.efficiency_score
        .partial_cmp(&a.efficiency_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.points.len().cmp(&b.points.len()))
}

/// Split constructor outputs into the winner and the rest, best first.
///
/// Returns `None` when `routes` is empty. The sort is stable, so equal routes
/// keep the order the constructors were listed in.
pub fn rank_routes(mut routes: Vec<OptimizedRoute>) -> Option<(OptimizedRoute, Vec<OptimizedRoute>)> {
    routes.sort_by(compare_routes);
    let mut ranked = routes.into_iter();
    let winner = ranked.next()?;
    Some((winner, ranked.collect()))
}
