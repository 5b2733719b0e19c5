//! Stop and depot locations.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Identifier reserved for the depot/start point.
pub const START_ID: i64 = 0;

/// A named location to route through.
///
/// Equality and hashing consider only `id`; two points with the same id are the
/// same stop even if their labels or coordinates differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Point {
    pub id: i64,
    #[serde(rename = "name")]
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(id: i64, label: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            label: label.into(),
            latitude,
            longitude,
        }
    }

    /// The depot point every tour is anchored on.
    pub fn start(latitude: f64, longitude: f64) -> Self {
        Self::new(START_ID, "Start", latitude, longitude)
    }

    pub fn is_start(&self) -> bool {
        self.id == START_ID
    }

    /// Location coordinates (lat, lng).
    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
