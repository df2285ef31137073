//! Territory catalog: route points, time slots and catalog providers.

use crate::error::CatalogError;
use crate::geometry::Coordinate;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Seconds in one day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Part of the day in which a territory tends to answer calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 3] = [TimeSlot::Morning, TimeSlot::Afternoon, TimeSlot::Evening];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller preference for the time of day, `Any` disables slot filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlotPreference {
    Morning,
    Afternoon,
    Evening,
    #[default]
    Any,
}

impl TimeSlotPreference {
    /// The concrete slot this preference pins, if any.
    pub fn slot(&self) -> Option<TimeSlot> {
        match self {
            TimeSlotPreference::Morning => Some(TimeSlot::Morning),
            TimeSlotPreference::Afternoon => Some(TimeSlot::Afternoon),
            TimeSlotPreference::Evening => Some(TimeSlot::Evening),
            TimeSlotPreference::Any => None,
        }
    }

    /// Whether a territory with `slot` satisfies this preference.
    pub fn matches(&self, slot: TimeSlot) -> bool {
        self.slot().map_or(true, |wanted| wanted == slot)
    }
}

impl From<TimeSlot> for TimeSlotPreference {
    fn from(slot: TimeSlot) -> Self {
        match slot {
            TimeSlot::Morning => TimeSlotPreference::Morning,
            TimeSlot::Afternoon => TimeSlotPreference::Afternoon,
            TimeSlot::Evening => TimeSlotPreference::Evening,
        }
    }
}

impl std::str::FromStr for TimeSlotPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "morning" => Ok(TimeSlotPreference::Morning),
            "afternoon" => Ok(TimeSlotPreference::Afternoon),
            "evening" => Ok(TimeSlotPreference::Evening),
            "any" => Ok(TimeSlotPreference::Any),
            other => Err(format!("unknown time slot preference '{}'", other)),
        }
    }
}

/// A territory as seen by the route optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub territory_id: String,
    pub lat: f64,
    pub lng: f64,
    /// Assignment priority, 1 (lowest) to 5 (highest).
    pub priority: u8,
    /// Expected time on site in minutes.
    pub estimated_duration: f64,
    /// Historical probability that a call in this territory succeeds.
    pub success_probability: f64,
    pub optimal_time_slot: TimeSlot,
    /// Unix timestamp (seconds) of the last visit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visited: Option<i64>,
}

impl RoutePoint {
    /// Create a new route point. Priority, probability and duration are
    /// clamped to their valid ranges.
    pub fn new(
        territory_id: impl Into<String>,
        lat: f64,
        lng: f64,
        priority: u8,
        estimated_duration: f64,
        success_probability: f64,
        optimal_time_slot: TimeSlot,
    ) -> Self {
        RoutePoint {
            territory_id: territory_id.into(),
            lat,
            lng,
            priority,
            estimated_duration,
            success_probability,
            optimal_time_slot,
            last_visited: None,
        }
        .clamped()
    }

    /// Set the last-visited timestamp.
    pub fn with_last_visited(mut self, timestamp: i64) -> Self {
        self.last_visited = Some(timestamp);
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    /// Copy of this point with every field forced into its valid range.
    pub fn clamped(mut self) -> Self {
        self.priority = self.priority.clamp(1, 5);
        self.success_probability = if self.success_probability.is_nan() {
            0.0
        } else {
            self.success_probability.clamp(0.0, 1.0)
        };
        if !(self.estimated_duration > 0.0) {
            self.estimated_duration = 1.0;
        }
        self
    }

    /// Whether the point was visited less than `window_days` before `now`.
    pub fn visited_within(&self, now: i64, window_days: u32) -> bool {
        match self.last_visited {
            Some(visited) => now - visited < i64::from(window_days) * SECONDS_PER_DAY,
            None => false,
        }
    }
}

/// Read-only provider of the territory catalog snapshot.
pub trait TerritorySource {
    fn territories(&self) -> Vec<RoutePoint>;
}

impl TerritorySource for Vec<RoutePoint> {
    fn territories(&self) -> Vec<RoutePoint> {
        self.clone()
    }
}

impl TerritorySource for [RoutePoint] {
    fn territories(&self) -> Vec<RoutePoint> {
        self.to_vec()
    }
}

/// Registry of territories keyed by a unique id.
///
/// Serialized as a plain array of route points. Deserializing goes through
/// [`TerritoryCatalog::new`], so ids stay unique and fields stay clamped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<RoutePoint>", into = "Vec<RoutePoint>")]
pub struct TerritoryCatalog {
    points: Vec<RoutePoint>,
}

impl TryFrom<Vec<RoutePoint>> for TerritoryCatalog {
    type Error = CatalogError;

    fn try_from(points: Vec<RoutePoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<TerritoryCatalog> for Vec<RoutePoint> {
    fn from(catalog: TerritoryCatalog) -> Self {
        catalog.points
    }
}

impl TerritoryCatalog {
    /// Build a catalog, rejecting duplicate territory ids.
    pub fn new(points: Vec<RoutePoint>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(points.len());
        let mut clamped = Vec::with_capacity(points.len());

        for point in points {
            if !seen.insert(point.territory_id.clone()) {
                return Err(CatalogError::DuplicateTerritory(point.territory_id));
            }
            clamped.push(point.clamped());
        }

        Ok(TerritoryCatalog { points: clamped })
    }

    /// Build a catalog from any territory provider.
    pub fn from_source<S: TerritorySource + ?Sized>(source: &S) -> Result<Self, CatalogError> {
        Self::new(source.territories())
    }

    pub fn points(&self) -> &[RoutePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, territory_id: &str) -> Option<&RoutePoint> {
        self.points.iter().find(|p| p.territory_id == territory_id)
    }

    /// Record a visit to a territory.
    pub fn mark_visited(&mut self, territory_id: &str, timestamp: i64) -> Result<(), CatalogError> {
        let point = self
            .points
            .iter_mut()
            .find(|p| p.territory_id == territory_id)
            .ok_or_else(|| CatalogError::UnknownTerritory(territory_id.to_string()))?;
        point.last_visited = Some(timestamp);
        Ok(())
    }

    /// Mean position of all territories.
    pub fn calculate_center(&self) -> Option<Coordinate> {
        crate::geometry::centroid(self.points.iter().map(RoutePoint::coordinate))
    }

    /// Load a catalog from a JSON array of route points.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let reader = BufReader::new(File::open(path)?);
        let points: Vec<RoutePoint> = serde_json::from_reader(reader)?;
        Self::new(points)
    }

    /// Write the catalog as a JSON array of route points.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CatalogError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &self.points)?;
        Ok(())
    }
}

impl TerritorySource for TerritoryCatalog {
    fn territories(&self) -> Vec<RoutePoint> {
        self.points.clone()
    }
}

/// Reproducible, randomly generated catalog for demos, tests and benchmarks.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    pub count: usize,
    pub center: Coordinate,
    /// Maximum offset from `center` along each axis, in kilometers.
    pub spread_km: f64,
    pub seed: u64,
    /// Reference time used to generate last-visited timestamps.
    pub now: i64,
}

impl SyntheticSource {
    pub fn new(count: usize, center: Coordinate, seed: u64) -> Self {
        SyntheticSource {
            count,
            center,
            spread_km: 15.0,
            seed,
            now: 0,
        }
    }

    pub fn with_spread_km(mut self, spread_km: f64) -> Self {
        self.spread_km = spread_km;
        self
    }

    pub fn with_now(mut self, now: i64) -> Self {
        self.now = now;
        self
    }
}

impl TerritorySource for SyntheticSource {
    fn territories(&self) -> Vec<RoutePoint> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let lat_span = self.spread_km / 111.0;
        let lng_span = self.spread_km / (111.0 * self.center.lat.to_radians().cos().abs().max(0.01));

        (0..self.count)
            .map(|i| {
                let lat = self.center.lat + rng.gen_range(-lat_span..=lat_span);
                let lng = self.center.lng + rng.gen_range(-lng_span..=lng_span);
                let slot = TimeSlot::ALL[rng.gen_range(0..TimeSlot::ALL.len())];
                let mut point = RoutePoint::new(
                    format!("T{:03}", i + 1),
                    lat,
                    lng,
                    rng.gen_range(1..=5),
                    rng.gen_range(20.0..90.0),
                    rng.gen_range(0.3..0.9),
                    slot,
                );
                // Roughly a third of the catalog has never been visited.
                if rng.gen_bool(0.66) {
                    let days_ago = rng.gen_range(1..60);
                    point.last_visited = Some(self.now - days_ago * SECONDS_PER_DAY);
                }
                point
            })
            .collect()
    }
}
