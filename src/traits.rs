//! Seams between the sequencer and its cost sources.
//!
//! Kept intentionally small so tests and embedding applications can supply
//! their own providers.

use crate::error::Result;
use crate::matrix::{DistanceMatrix, MatrixAnnotation};
use crate::point::Point;

/// Matrix returned by a provider, aligned to the submitted point order.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixResponse {
    pub matrix: DistanceMatrix,
    pub annotation: MatrixAnnotation,
}

/// Provides a distance/time matrix for a set of points.
///
/// The matrix is indexed by the provided point order. Implementations never
/// split a request; callers must keep `points.len()` within [`max_points`].
///
/// [`max_points`]: DistanceMatrixProvider::max_points
pub trait DistanceMatrixProvider: Send + Sync {
    fn matrix_for(&self, points: &[Point]) -> Result<MatrixResponse>;

    /// Largest number of points a single `matrix_for` call accepts.
    fn max_points(&self) -> usize;
}

impl<P: DistanceMatrixProvider + ?Sized> DistanceMatrixProvider for &P {
    fn matrix_for(&self, points: &[Point]) -> Result<MatrixResponse> {
        (**self).matrix_for(points)
    }

    fn max_points(&self) -> usize {
        (**self).max_points()
    }
}
