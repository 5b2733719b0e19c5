//! Great-circle distance and the straight-line matrix provider.
//!
//! Less accurate than a road network (ignores roads) but always available,
//! which is what geometric sequencing and offline runs rely on.

use crate::error::{Error, Result};
use crate::matrix::{DistanceMatrix, MatrixAnnotation};
use crate::point::Point;
use crate::traits::{DistanceMatrixProvider, MatrixResponse};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate haversine distance between two (lat, lng) pairs in kilometers.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points. `clamp` keeps NaN.
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Straight-line distance between two points in kilometers.
pub fn distance(a: &Point, b: &Point) -> f64 {
    haversine_km(a.coords(), b.coords())
}

/// Haversine-based distance matrix provider.
///
/// Produces meters for [`MatrixAnnotation::Distance`] and seconds at an assumed
/// speed for [`MatrixAnnotation::Duration`]. Never touches the network.
#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
    pub annotation: MatrixAnnotation,
    /// Reported request ceiling; the computation itself has no limit.
    pub max_points: usize,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            annotation: MatrixAnnotation::Distance,
            max_points: usize::MAX,
        }
    }
}

impl HaversineMatrix {
    pub fn new(speed_kmh: f64) -> Self {
        Self {
            speed_kmh,
            ..Self::default()
        }
    }

    pub fn with_annotation(mut self, annotation: MatrixAnnotation) -> Self {
        self.annotation = annotation;
        self
    }

    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }

    /// Convert distance in km to travel time in seconds.
    fn km_to_seconds(&self, km: f64) -> f64 {
        (km / self.speed_kmh * 3600.0).round()
    }

    fn cost(&self, km: f64) -> f64 {
        match self.annotation {
            MatrixAnnotation::Distance => km * 1000.0,
            MatrixAnnotation::Duration => self.km_to_seconds(km),
        }
    }

    /// Full matrix over `points`; a non-finite coordinate yields `MalformedMatrix`.
    pub fn matrix(&self, points: &[Point]) -> Result<DistanceMatrix> {
        DistanceMatrix::from_fn(points.len(), |i, j| self.cost(distance(&points[i], &points[j])))
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, points: &[Point]) -> Result<MatrixResponse> {
        if points.len() > self.max_points {
            return Err(Error::TooManyPoints {
                requested: points.len(),
                max: self.max_points,
            });
        }

        Ok(MatrixResponse {
            matrix: self.matrix(points)?,
            annotation: self.annotation,
        })
    }

    fn max_points(&self) -> usize {
        self.max_points
    }
}
