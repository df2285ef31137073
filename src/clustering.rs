//! K-means partition of the territory catalog.

use crate::geometry::{centroid, distance, Coordinate};
use crate::territory::{RoutePoint, TimeSlot};
use log::debug;
use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Day on which a cluster with the given average success tends to be worked.
    ///
    /// Strong clusters go to the weekend, when most people are home.
    pub fn for_success_rate(rate: f64) -> Self {
        if rate >= 0.7 {
            Weekday::Saturday
        } else if rate >= 0.5 {
            Weekday::Sunday
        } else {
            Weekday::Wednesday
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        };
        f.write_str(name)
    }
}

/// A spatial group of territories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerritoryCluster {
    pub id: usize,
    pub territory_ids: Vec<String>,
    pub centroid: Coordinate,
    /// Number of member territories.
    pub density: usize,
    pub average_success_rate: f64,
    pub optimal_day: Weekday,
    pub optimal_time_slot: TimeSlot,
}

impl TerritoryCluster {
    pub fn contains(&self, territory_id: &str) -> bool {
        self.territory_ids.iter().any(|id| id == territory_id)
    }
}

/// Iterative K-means over latitude/longitude using haversine distance.
#[derive(Debug, Clone)]
pub struct KMeans {
    pub k: usize,
    pub iterations: usize,
    pub seed: u64,
}

impl KMeans {
    pub fn new(k: usize, iterations: usize, seed: u64) -> Self {
        KMeans { k, iterations, seed }
    }

    /// Partition the points into at most `k` non-empty clusters.
    ///
    /// Runs exactly `iterations` assignment/update rounds. Clusters left empty
    /// keep their previous centroid and are dropped from the output.
    pub fn cluster(&self, points: &[RoutePoint]) -> Vec<TerritoryCluster> {
        if points.is_empty() || self.k == 0 {
            return Vec::new();
        }

        let coordinates: Vec<Coordinate> = points.iter().map(RoutePoint::coordinate).collect();
        let mut centroids = self.initial_centroids(&coordinates);
        let mut assignment = vec![0usize; points.len()];

        for _ in 0..self.iterations {
            for (slot, coordinate) in assignment.iter_mut().zip(&coordinates) {
                *slot = nearest_centroid(*coordinate, &centroids);
            }

            for (cluster, center) in centroids.iter_mut().enumerate() {
                let members = coordinates
                    .iter()
                    .zip(&assignment)
                    .filter(|(_, &a)| a == cluster)
                    .map(|(c, _)| *c);
                if let Some(updated) = centroid(members) {
                    *center = updated;
                }
            }
        }

        // A final assignment pass when no iteration ran
        if self.iterations == 0 {
            for (slot, coordinate) in assignment.iter_mut().zip(&coordinates) {
                *slot = nearest_centroid(*coordinate, &centroids);
            }
        }

        let clusters = build_clusters(points, &assignment, &centroids);
        debug!(
            "k-means: {} points into {} clusters (k = {})",
            points.len(),
            clusters.len(),
            self.k
        );
        clusters
    }

    /// Sample `min(k, n)` distinct catalog points as starting centroids.
    fn initial_centroids(&self, coordinates: &[Coordinate]) -> Vec<Coordinate> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let k = self.k.min(coordinates.len());
        index::sample(&mut rng, coordinates.len(), k)
            .into_iter()
            .map(|i| coordinates[i])
            .collect()
    }
}

fn nearest_centroid(point: Coordinate, centroids: &[Coordinate]) -> usize {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (i, distance(point, *c)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(0, |(i, _)| i)
}

fn build_clusters(
    points: &[RoutePoint],
    assignment: &[usize],
    centroids: &[Coordinate],
) -> Vec<TerritoryCluster> {
    let mut clusters = Vec::new();

    for (cluster, center) in centroids.iter().enumerate() {
        let members: Vec<&RoutePoint> = points
            .iter()
            .zip(assignment)
            .filter(|(_, &a)| a == cluster)
            .map(|(p, _)| p)
            .collect();

        if members.is_empty() {
            continue;
        }

        let average_success_rate =
            members.iter().map(|p| p.success_probability).sum::<f64>() / members.len() as f64;

        clusters.push(TerritoryCluster {
            id: clusters.len(),
            territory_ids: members.iter().map(|p| p.territory_id.clone()).collect(),
            centroid: *center,
            density: members.len(),
            average_success_rate,
            optimal_day: Weekday::for_success_rate(average_success_rate),
            optimal_time_slot: majority_slot(&members),
        });
    }

    clusters
}

/// Most common time slot; ties go to the earlier slot of the day.
fn majority_slot(members: &[&RoutePoint]) -> TimeSlot {
    let mut counts = [0usize; 3];
    for point in members {
        counts[point.optimal_time_slot as usize] += 1;
    }

    let mut best = TimeSlot::Morning;
    let mut best_count = 0;
    for slot in TimeSlot::ALL {
        if counts[slot as usize] > best_count {
            best = slot;
            best_count = counts[slot as usize];
        }
    }
    best
}
