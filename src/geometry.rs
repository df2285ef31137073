//! Great-circle geometry on a spherical Earth.

use serde::{Deserialize, Serialize};

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Coordinate { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Coordinate { lat, lng }
    }
}

/// Haversine distance between two coordinates in kilometers.
pub fn distance(from: Coordinate, to: Coordinate) -> f64 {
    if from == to {
        return 0.0;
    }

    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Length of a closed tour: depot to the first stop, every consecutive leg,
/// and the last stop back to the depot.
pub fn route_distance<I>(depot: Coordinate, stops: I) -> f64
where
    I: IntoIterator<Item = Coordinate>,
{
    let mut total = 0.0;
    let mut current = depot;

    for stop in stops {
        total += distance(current, stop);
        current = stop;
    }

    total + distance(current, depot)
}

/// Convert a distance in km to driving minutes at the given average speed.
pub fn travel_minutes(km: f64, speed_kmh: f64) -> f64 {
    km / speed_kmh * 60.0
}

/// Arithmetic mean of a set of coordinates, `None` when empty.
///
/// Adequate for the few-kilometre spreads of a territory catalog; not meant
/// for points straddling the antimeridian.
pub fn centroid<I>(points: I) -> Option<Coordinate>
where
    I: IntoIterator<Item = Coordinate>,
{
    let mut sum_lat = 0.0;
    let mut sum_lng = 0.0;
    let mut count = 0usize;

    for point in points {
        sum_lat += point.lat;
        sum_lng += point.lng;
        count += 1;
    }

    if count == 0 {
        None
    } else {
        Some(Coordinate::new(sum_lat / count as f64, sum_lng / count as f64))
    }
}
