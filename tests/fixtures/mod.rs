//! Test fixtures for tour-sequencer.
//!
//! Provides:
//! - Real Las Vegas / Henderson delivery locations
//! - Matrix providers that count calls, record requests, or fail on demand

#![allow(dead_code, unused_imports)]

pub mod locations;

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio_util::sync::CancellationToken;
use tour_sequencer::error::{ProviderError, Result};
use tour_sequencer::haversine::HaversineMatrix;
use tour_sequencer::matrix::{DistanceMatrix, MatrixAnnotation};
use tour_sequencer::traits::{DistanceMatrixProvider, MatrixResponse};
use tour_sequencer::Point;

pub use locations::*;

/// Wraps a provider, counting calls and recording the ids of every request.
pub struct RecordingProvider<P> {
    inner: P,
    calls: AtomicUsize,
    requests: Mutex<Vec<Vec<i64>>>,
}

impl<P> RecordingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests sorted by their first id, since chunks may run in any order.
    pub fn requests(&self) -> Vec<Vec<i64>> {
        let mut requests = self.requests.lock().unwrap().clone();
        requests.sort_by_key(|ids| ids.first().copied());
        requests
    }
}

impl RecordingProvider<HaversineMatrix> {
    pub fn haversine(max_points: usize) -> Self {
        Self::new(HaversineMatrix::default().with_max_points(max_points))
    }
}

impl<P: DistanceMatrixProvider> DistanceMatrixProvider for RecordingProvider<P> {
    fn matrix_for(&self, points: &[Point]) -> Result<MatrixResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push(points.iter().map(|p| p.id).collect());
        self.inner.matrix_for(points)
    }

    fn max_points(&self) -> usize {
        self.inner.max_points()
    }
}

/// Planar matrix over (latitude, longitude) treated as x/y.
pub struct PlanarProvider {
    pub max_points: usize,
}

impl DistanceMatrixProvider for PlanarProvider {
    fn matrix_for(&self, points: &[Point]) -> Result<MatrixResponse> {
        let rows = points
            .iter()
            .map(|a| {
                points
                    .iter()
                    .map(|b| ((a.latitude - b.latitude).powi(2) + (a.longitude - b.longitude).powi(2)).sqrt())
                    .collect()
            })
            .collect();
        Ok(MatrixResponse {
            matrix: DistanceMatrix::from_rows(rows)?,
            annotation: MatrixAnnotation::Distance,
        })
    }

    fn max_points(&self) -> usize {
        self.max_points
    }
}

/// Fails every request that contains one of `poisoned` ids.
pub struct FailingProvider {
    pub max_points: usize,
    pub poisoned: HashSet<i64>,
}

impl FailingProvider {
    pub fn always(max_points: usize) -> Self {
        Self {
            max_points,
            poisoned: HashSet::new(),
        }
    }

    pub fn on(max_points: usize, id: i64) -> Self {
        Self {
            max_points,
            poisoned: HashSet::from([id]),
        }
    }
}

impl DistanceMatrixProvider for FailingProvider {
    fn matrix_for(&self, points: &[Point]) -> Result<MatrixResponse> {
        if self.poisoned.is_empty() || points.iter().any(|p| self.poisoned.contains(&p.id)) {
            return Err(ProviderError::Status {
                status: 503,
                body: "Service Unavailable".to_string(),
            }
            .into());
        }
        HaversineMatrix::default().matrix_for(points)
    }

    fn max_points(&self) -> usize {
        self.max_points
    }
}

/// Cancels `token` from inside the first matrix request, then answers normally.
pub struct CancellingProvider {
    pub token: CancellationToken,
    pub max_points: usize,
}

impl DistanceMatrixProvider for CancellingProvider {
    fn matrix_for(&self, points: &[Point]) -> Result<MatrixResponse> {
        self.token.cancel();
        HaversineMatrix::default().matrix_for(points)
    }

    fn max_points(&self) -> usize {
        self.max_points
    }
}

pub fn ids(points: &[Point]) -> Vec<i64> {
    points.iter().map(|p| p.id).collect()
}

/// Asserts `ordered` holds exactly the ids of `input`, each once.
pub fn assert_permutation(input: &[Point], ordered: &[Point]) {
    assert_eq!(ordered.len(), input.len(), "output length differs from input");
    let mut expected = ids(input);
    let mut actual = ids(ordered);
    expected.sort_unstable();
    actual.sort_unstable();
    assert_eq!(actual, expected, "output is not a permutation of the input");
}
