//! Alternative routes and operational recommendations.

use crate::config::RouteOptimizationConfig;
use crate::route::{AlternativeRoute, OptimizedRoute};
use crate::territory::TimeSlot;

/// Maximum alternatives attached to a winning route.
pub const MAX_ALTERNATIVES: usize = 2;
/// Maximum recommendations attached to a winning route.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// The only recommendation on an empty route.
pub const NO_TERRITORIES_AVAILABLE: &str = "no territories available";

const LOW_SUCCESS_THRESHOLD: f64 = 0.4;
const SLOT_SKEW_SHARE: f64 = 0.7;

/// Wrap the losing routes as alternatives, best first.
///
/// Routes with no stops, or visiting exactly the same sequence as the winner
/// or an earlier alternative, are skipped.
pub fn build_alternatives(winner: &OptimizedRoute, others: &[OptimizedRoute]) -> Vec<AlternativeRoute> {
    let mut alternatives: Vec<AlternativeRoute> = Vec::new();

    for route in others {
        if alternatives.len() == MAX_ALTERNATIVES {
            break;
        }
        if route.is_empty() {
            continue;
        }
        let ids = route.territory_ids();
        if ids == winner.territory_ids()
            || alternatives
                .iter()
                .any(|a| a.points.iter().map(|p| p.territory_id.as_str()).eq(ids.iter().copied()))
        {
            continue;
        }

        alternatives.push(AlternativeRoute {
            id: format!("{}-alt{}", winner.id, alternatives.len() + 1),
            strategy: route.strategy,
            points: route.points.clone(),
            total_distance: route.total_distance,
            estimated_time: route.estimated_time,
            expected_calls: route.expected_calls,
            efficiency_score: route.efficiency_score,
            pros: pros(route),
            cons: cons(route),
        });
    }

    alternatives
}

pub fn pros(route: &OptimizedRoute) -> Vec<String> {
    let mut pros = Vec::new();
    if route.efficiency_score > 0.7 {
        pros.push("high overall efficiency".to_string());
    }
    if route.total_distance < 50.0 {
        pros.push("short distance".to_string());
    }
    if route.expected_calls > 5 {
        pros.push("high call volume".to_string());
    }
    pros
}

pub fn cons(route: &OptimizedRoute) -> Vec<String> {
    let mut cons = Vec::new();
    if route.efficiency_score < 0.5 {
        cons.push("low overall efficiency".to_string());
    }
    if route.total_distance > 100.0 {
        cons.push("long distance".to_string());
    }
    if route.expected_calls < 3 {
        cons.push("low call volume".to_string());
    }
    cons
}

/// Threshold-based advice for the winning route, at most five entries.
pub fn recommendations(route: &OptimizedRoute, config: &RouteOptimizationConfig) -> Vec<String> {
    if route.is_empty() {
        return vec![NO_TERRITORIES_AVAILABLE.to_string()];
    }

    let mut advice = Vec::new();

    if route.efficiency_score < 0.5 {
        advice.push(
            "low efficiency: consider fewer territories or a closer area".to_string(),
        );
    }

    if route.total_distance > 100.0 {
        advice.push(format!(
            "long distance ({:.0} km): consider splitting the route across two days",
            route.total_distance
        ));
    }

    let low_success = route
        .points
        .iter()
        .filter(|p| p.success_probability < LOW_SUCCESS_THRESHOLD)
        .count();
    if low_success > 0 {
        advice.push(format!(
            "{} low-success territor{}: visit them in the conductor's strongest time slot",
            low_success,
            if low_success == 1 { "y" } else { "ies" }
        ));
    }

    if let Some((slot, share)) = dominant_slot(route) {
        let preferred = config.time_slot_preference.slot();
        if share >= SLOT_SKEW_SHARE && preferred != Some(slot) {
            advice.push(format!(
                "{:.0}% of territories prefer the {}: schedule the route then",
                share * 100.0,
                slot
            ));
        }
    }

    if route.estimated_time > 0.9 * config.travel_budget() || route.estimated_time > 360.0 {
        advice.push(format!(
            "long total duration ({:.0} min): plan breaks between calls",
            route.estimated_time
        ));
    }

    advice.truncate(MAX_RECOMMENDATIONS);
    advice
}

/// The most common time slot on the route and its share of the stops.
fn dominant_slot(route: &OptimizedRoute) -> Option<(TimeSlot, f64)> {
    TimeSlot::ALL
        .into_iter()
        .map(|slot| {
            let count = route.points.iter().filter(|p| p.optimal_time_slot == slot).count();
            (slot, count)
        })
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .filter(|(_, count)| *count > 0)
        .map(|(slot, count)| (slot, count as f64 / route.points.len() as f64))
}
