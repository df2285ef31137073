//! Cluster-informed construction driven by a fixed weight preset.

use super::{nearest_neighbor, ConstructionContext};
use crate::clustering::TerritoryCluster;
use crate::geometry::{distance, Coordinate};
use crate::model::ModelWeights;
use crate::route::{OptimizedRoute, RouteStrategy};
use crate::scoring::{normalize, DISTANCE_CAP_KM};
use crate::skills::ConductorSkills;
use crate::territory::RoutePoint;
use log::debug;
use std::cmp::Ordering;

/// Service time at which the time feature reaches zero, in minutes.
pub const SERVICE_CAP_MINUTES: f64 = 180.0;

/// Build a route around the best-scoring cluster.
///
/// The cluster whose top `max_territories` candidates have the largest summed
/// weighted score anchors the route. When it holds fewer than
/// `min(max_territories, candidates)` of them, the route is filled up from the
/// clusters whose centroids lie closest to the anchor.
pub fn construct(candidates: &[RoutePoint], context: &ConstructionContext<'_>) -> OptimizedRoute {
    let weights = context.model.weights();
    let skills = &context.config.conductor_skills;
    let limit = context.config.territory_limit();

    let scored: Vec<(f64, &RoutePoint)> = candidates
        .iter()
        .map(|p| (weighted_score(p, &weights, context.route.depot, skills), p))
        .collect();

    let mut best: Option<(f64, &TerritoryCluster, Vec<(f64, &RoutePoint)>)> = None;

    for cluster in context.clusters {
        let mut members = cluster_members(&scored, cluster);
        if members.is_empty() {
            continue;
        }
        members.truncate(limit);

        let cluster_score: f64 = members.iter().map(|(score, _)| score).sum();
        debug!(
            "cluster {}: {} candidate(s), weighted score {:.3}",
            cluster.id,
            members.len(),
            cluster_score
        );

        if best.as_ref().map_or(true, |(best_score, _, _)| cluster_score > *best_score) {
            best = Some((cluster_score, cluster, members));
        }
    }

    let order = match best {
        Some((_, anchor, members)) => {
            let mut subset: Vec<RoutePoint> = members.into_iter().map(|(_, p)| p.clone()).collect();
            fill_from_neighbours(&mut subset, &scored, anchor, context.clusters, limit);
            nearest_neighbor::nearest_neighbor_order(&subset, limit)
        }
        None => fallback_order(candidates, context.clusters, limit),
    };

    context.finish(RouteStrategy::ClusterInformed, order)
}

/// Linear score of a territory's normalized features under `weights`.
pub fn weighted_score(
    point: &RoutePoint,
    weights: &ModelWeights,
    depot: Coordinate,
    skills: &ConductorSkills,
) -> f64 {
    let proximity = normalize(distance(depot, point.coordinate()), DISTANCE_CAP_KM);
    let time_fit = normalize(point.estimated_duration, SERVICE_CAP_MINUTES);
    let skill = skills.experience(&point.territory_id);

    weights.distance_weight * proximity
        + weights.success_weight * point.success_probability
        + weights.time_weight * time_fit
        + weights.skill_weight * skill
}

/// Candidates belonging to `cluster`, best score first.
fn cluster_members<'p>(
    scored: &[(f64, &'p RoutePoint)],
    cluster: &TerritoryCluster,
) -> Vec<(f64, &'p RoutePoint)> {
    let mut members: Vec<(f64, &RoutePoint)> = scored
        .iter()
        .filter(|(_, p)| cluster.contains(&p.territory_id))
        .copied()
        .collect();
    members.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    members
}

/// Top up `subset` to `min(limit, candidates)` stops.
///
/// Neighbouring clusters are visited by centroid distance from `anchor`, best
/// scored member first; candidates outside every cluster come last.
fn fill_from_neighbours(
    subset: &mut Vec<RoutePoint>,
    scored: &[(f64, &RoutePoint)],
    anchor: &TerritoryCluster,
    clusters: &[TerritoryCluster],
    limit: usize,
) {
    let target = limit.min(scored.len());
    if subset.len() >= target {
        return;
    }

    let mut neighbours: Vec<&TerritoryCluster> = clusters.iter().filter(|c| c.id != anchor.id).collect();
    neighbours.sort_by(|a, b| {
        distance(anchor.centroid, a.centroid).total_cmp(&distance(anchor.centroid, b.centroid))
    });

    let mut unclustered: Vec<(f64, &RoutePoint)> = scored
        .iter()
        .filter(|(_, p)| !clusters.iter().any(|c| c.contains(&p.territory_id)))
        .copied()
        .collect();
    unclustered.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    let pool = neighbours
        .into_iter()
        .flat_map(|c| cluster_members(scored, c))
        .chain(unclustered);

    for (_, point) in pool {
        if subset.len() >= target {
            break;
        }
        if subset.iter().any(|s| s.territory_id == point.territory_id) {
            continue;
        }
        subset.push(point.clone());
    }

    debug!("cluster {} topped up to {} stop(s)", anchor.id, subset.len());
}

/// Used when no cluster holds a candidate, e.g. the clusters predate a
/// catalog edit. Falls back to a plain nearest-neighbor order.
fn fallback_order(candidates: &[RoutePoint], clusters: &[TerritoryCluster], limit: usize) -> Vec<RoutePoint> {
    if !clusters.is_empty() && !candidates.is_empty() {
        debug!("no cluster contains a candidate, using nearest-neighbor order");
    }
    nearest_neighbor::nearest_neighbor_order(candidates, limit)
}
