//! Validated square cost matrix.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Quantity a matrix holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatrixAnnotation {
    /// Meters.
    #[default]
    Distance,
    /// Seconds.
    Duration,
}

impl MatrixAnnotation {
    /// Value of the provider's `annotations` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            MatrixAnnotation::Distance => "distance",
            MatrixAnnotation::Duration => "duration",
        }
    }
}

/// Dense n×n matrix where `get(i, j)` is the cost of travelling from point i to point j.
///
/// Indexed by the order of the point list it was built for. Every cell is finite
/// and non-negative; the matrix is not assumed to be symmetric.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Zero matrix of the given size.
    pub fn zeros(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Builds a matrix from rows, rejecting ragged rows and negative or non-finite cells.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(Error::malformed_matrix(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    size
                )));
            }
            for (j, value) in row.into_iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(Error::malformed_matrix(format!(
                        "cell [{}][{}] is {}",
                        i, j, value
                    )));
                }
                data.push(value);
            }
        }

        Ok(Self { data, size })
    }

    /// Builds a matrix by evaluating `cost` for every ordered pair with `i != j`,
    /// rejecting negative or non-finite costs.
    pub(crate) fn from_fn(size: usize, cost: impl Fn(usize, usize) -> f64) -> Result<Self> {
        let mut matrix = Self::zeros(size);
        for i in 0..size {
            for j in 0..size {
                if i == j {
                    continue;
                }
                let value = cost(i, j);
                if !value.is_finite() || value < 0.0 {
                    return Err(Error::malformed_matrix(format!(
                        "cell [{}][{}] is {}",
                        i, j, value
                    )));
                }
                matrix.data[i * size + j] = value;
            }
        }
        Ok(matrix)
    }

    /// Cost from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.size.max(1)).take(self.size).map(<[f64]>::to_vec).collect()
    }
}
