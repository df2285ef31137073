//! Candidate selection: filter the catalog for one call and rank what remains.

use crate::config::RouteOptimizationConfig;
use crate::territory::RoutePoint;
use log::trace;
use std::cmp::Ordering;

/// Candidates handed to the constructors per allowed territory.
pub const CANDIDATE_OVERPROVISION: usize = 2;

/// Pick and rank the territories eligible for a route.
///
/// Recently visited territories (`recent_visit_days` before `now`) are dropped
/// when the config asks for it, and so are territories outside the preferred
/// time slot. The remainder is sorted by descending priority, weighted by
/// success probability when `prioritize_success` is set, and truncated to
/// twice `max_territories`.
pub fn select_candidates(
    catalog: &[RoutePoint],
    config: &RouteOptimizationConfig,
    now: i64,
    recent_visit_days: u32,
) -> Vec<RoutePoint> {
    let mut candidates: Vec<RoutePoint> = catalog
        .iter()
        .filter(|p| !(config.avoid_recent_visits && p.visited_within(now, recent_visit_days)))
        .filter(|p| config.time_slot_preference.matches(p.optimal_time_slot))
        .cloned()
        .collect();

    let filtered_out = catalog.len() - candidates.len();

    candidates.sort_by(|a, b| {
        rank_key(b, config.prioritize_success)
            .partial_cmp(&rank_key(a, config.prioritize_success))
            .unwrap_or(Ordering::Equal)
    });
    candidates.truncate(config.territory_limit().saturating_mul(CANDIDATE_OVERPROVISION));

    trace!(
        "candidate selection: {} in catalog, {} filtered, {} kept",
        catalog.len(),
        filtered_out,
        candidates.len()
    );

    candidates
}

fn rank_key(point: &RoutePoint, prioritize_success: bool) -> f64 {
    if prioritize_success {
        f64::from(point.priority) * point.success_probability
    } else {
        f64::from(point.priority)
    }
}
