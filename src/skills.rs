//! Conductor skill profiles and the per-conductor candidate adjustment.

use crate::territory::{RoutePoint, TimeSlot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum boost applied per unit of territory experience.
pub const EXPERIENCE_SUCCESS_BOOST: f64 = 0.2;
/// Maximum boost applied per unit of time-slot affinity.
pub const AFFINITY_SUCCESS_BOOST: f64 = 0.1;
/// Boosted probabilities never exceed this value.
pub const BOOSTED_SUCCESS_CAP: f64 = 0.95;
/// Maximum relative duration reduction for a fully experienced conductor.
pub const EXPERIENCE_DURATION_REDUCTION: f64 = 0.15;

/// What the optimizer knows about the conductor a route is built for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConductorSkills {
    /// Familiarity with each territory, in [0, 1].
    #[serde(default)]
    pub territory_experience: HashMap<String, f64>,
    /// How well the conductor performs in each part of the day, in [0, 1].
    #[serde(default)]
    pub time_slot_affinity: HashMap<TimeSlot, f64>,
    /// Average call length in minutes.
    #[serde(default)]
    pub average_call_duration: f64,
    #[serde(default)]
    pub success_rate: f64,
    #[serde(default)]
    pub adaptability_score: f64,
}

impl ConductorSkills {
    pub fn new() -> Self {
        ConductorSkills::default()
    }

    pub fn with_experience(mut self, territory_id: impl Into<String>, score: f64) -> Self {
        self.territory_experience.insert(territory_id.into(), score);
        self
    }

    pub fn with_affinity(mut self, slot: TimeSlot, score: f64) -> Self {
        self.time_slot_affinity.insert(slot, score);
        self
    }

    /// Experience with a territory, 0 when unknown.
    pub fn experience(&self, territory_id: &str) -> f64 {
        unit(self.territory_experience.get(territory_id).copied())
    }

    /// Affinity for a time slot, 0 when unknown.
    pub fn affinity(&self, slot: TimeSlot) -> f64 {
        unit(self.time_slot_affinity.get(&slot).copied())
    }
}

fn unit(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Reweight candidates for a specific conductor.
///
/// Returns new points; the input slice is left untouched.
pub fn adjust_for_skills(candidates: &[RoutePoint], skills: &ConductorSkills) -> Vec<RoutePoint> {
    candidates
        .iter()
        .map(|point| {
            let experience = skills.experience(&point.territory_id);
            let affinity = skills.affinity(point.optimal_time_slot);

            let boosted = point.success_probability
                + EXPERIENCE_SUCCESS_BOOST * experience
                + AFFINITY_SUCCESS_BOOST * affinity;
            // The cap limits the boost, it never lowers an already high probability.
            let success_probability = boosted.min(BOOSTED_SUCCESS_CAP).max(point.success_probability);

            let estimated_duration =
                point.estimated_duration * (1.0 - EXPERIENCE_DURATION_REDUCTION * experience);

            RoutePoint {
                success_probability,
                estimated_duration,
                ..point.clone()
            }
        })
        .collect()
}
