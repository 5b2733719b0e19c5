//! HTTP adapter for road-network distance matrices.
//!
//! Speaks the Mapbox Directions Matrix API and the OSRM `table` service, which
//! share a wire format: coordinates go in the path as `lng,lat;lng,lat;...` and
//! the response carries `distances`/`durations` as a square array aligned to
//! the request order.

use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, ProviderError, Result};
use crate::matrix::{DistanceMatrix, MatrixAnnotation};
use crate::point::Point;
use crate::traits::{DistanceMatrixProvider, MatrixResponse};

/// Coordinates per request accepted by the Mapbox driving profile.
pub const MAPBOX_MAX_POINTS: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatrixBackend {
    #[default]
    Mapbox,
    Osrm,
}

impl MatrixBackend {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            MatrixBackend::Mapbox => "https://api.mapbox.com",
            MatrixBackend::Osrm => "http://localhost:5000",
        }
    }

    pub fn default_profile(&self) -> &'static str {
        match self {
            MatrixBackend::Mapbox => "mapbox/driving",
            MatrixBackend::Osrm => "car",
        }
    }

    fn service_path(&self, profile: &str) -> String {
        match self {
            MatrixBackend::Mapbox => format!("directions-matrix/v1/{}", profile),
            MatrixBackend::Osrm => format!("table/v1/{}", profile),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatrixConfig {
    pub backend: MatrixBackend,
    pub base_url: String,
    pub profile: String,
    /// Sent as the `access_token` query parameter when present.
    pub access_token: Option<String>,
    pub annotation: MatrixAnnotation,
    pub timeout_secs: u64,
    /// Ceiling on points per request.
    pub max_points: usize,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self::for_backend(MatrixBackend::Mapbox)
    }
}

impl MatrixConfig {
    pub fn for_backend(backend: MatrixBackend) -> Self {
        Self {
            backend,
            base_url: backend.default_base_url().to_string(),
            profile: backend.default_profile().to_string(),
            access_token: None,
            annotation: MatrixAnnotation::Distance,
            timeout_secs: 10,
            max_points: MAPBOX_MAX_POINTS,
        }
    }

    pub fn mapbox(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            ..Self::for_backend(MatrixBackend::Mapbox)
        }
    }

    pub fn osrm(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::for_backend(MatrixBackend::Osrm)
        }
    }
}

/// Blocking matrix client. Every call is a fresh request; nothing is cached.
#[derive(Debug, Clone)]
pub struct MatrixClient {
    config: MatrixConfig,
    client: reqwest::blocking::Client,
}

impl MatrixClient {
    pub fn new(config: MatrixConfig) -> Result<Self> {
        if config.max_points < 2 {
            return Err(Error::invalid_config(format!(
                "max_points must be at least 2, got {}",
                config.max_points
            )));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    /// Request URL without the query string.
    pub fn request_url(&self, points: &[Point]) -> String {
        let coords = points
            .iter()
            .map(|p| format!("{:.6},{:.6}", p.longitude, p.latitude))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.backend.service_path(&self.config.profile),
            coords
        )
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("annotations", self.config.annotation.as_query().to_string())];
        if let Some(token) = &self.config.access_token {
            query.push(("access_token", token.clone()));
        }
        query
    }

    fn fetch(&self, points: &[Point]) -> std::result::Result<DistanceMatrix, ProviderError> {
        // The URL carries the access token, so it is stripped from transport errors.
        let response = self
            .client
            .get(self.request_url(points))
            .query(&self.query())
            .header(ACCEPT, "application/json")
            .send()
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .json::<TableResponse>()
            .map_err(reqwest::Error::without_url)?;
        parse_table(body, self.config.annotation, points.len())
    }
}

impl DistanceMatrixProvider for MatrixClient {
    fn matrix_for(&self, points: &[Point]) -> Result<MatrixResponse> {
        if points.len() > self.config.max_points {
            return Err(Error::TooManyPoints {
                requested: points.len(),
                max: self.config.max_points,
            });
        }

        let annotation = self.config.annotation;
        if points.len() < 2 {
            // Providers reject single-coordinate requests; the answer is known.
            return Ok(MatrixResponse {
                matrix: DistanceMatrix::zeros(points.len()),
                annotation,
            });
        }

        debug!(
            backend = ?self.config.backend,
            points = points.len(),
            annotation = annotation.as_query(),
            "requesting distance matrix"
        );

        match self.fetch(points) {
            Ok(matrix) => Ok(MatrixResponse { matrix, annotation }),
            Err(err) => {
                warn!(backend = ?self.config.backend, points = points.len(), "matrix request failed: {}", err);
                Err(err.into())
            }
        }
    }

    fn max_points(&self) -> usize {
        self.config.max_points
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TableResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    distances: Option<Vec<Vec<Option<f64>>>>,
    #[serde(default)]
    durations: Option<Vec<Vec<Option<f64>>>>,
}

/// Validates a provider payload into a matrix of `expected` points.
///
/// A `null` cell means the provider found no route between two points; the
/// whole batch fails rather than defaulting the cell.
pub(crate) fn parse_table(
    body: TableResponse,
    annotation: MatrixAnnotation,
    expected: usize,
) -> std::result::Result<DistanceMatrix, ProviderError> {
    if body.code != "Ok" {
        return Err(ProviderError::Rejected {
            message: body.message.unwrap_or_default(),
            code: body.code,
        });
    }

    let rows = match annotation {
        MatrixAnnotation::Distance => body.distances,
        MatrixAnnotation::Duration => body.durations,
    }
    .ok_or_else(|| {
        ProviderError::invalid_payload(format!("response has no {}s", annotation.as_query()))
    })?;

    if rows.len() != expected {
        return Err(ProviderError::invalid_payload(format!(
            "expected {} rows, got {}",
            expected,
            rows.len()
        )));
    }

    let mut values = Vec::with_capacity(expected);
    for (i, row) in rows.into_iter().enumerate() {
        let row = row
            .into_iter()
            .enumerate()
            .map(|(j, cell)| {
                cell.ok_or_else(|| {
                    ProviderError::invalid_payload(format!("no route from point {} to point {}", i, j))
                })
            })
            .collect::<std::result::Result<Vec<f64>, _>>()?;
        values.push(row);
    }

    DistanceMatrix::from_rows(values).map_err(|err| ProviderError::invalid_payload(err.to_string()))
}
