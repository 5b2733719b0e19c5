//! Settings for applications embedding the sequencer.
//!
//! The sequencer itself never reads the environment; this module turns
//! environment variables into an explicit strategy and client configuration.

use std::str::FromStr;

use serde::de::value::StrDeserializer;
use serde::de::{DeserializeOwned, IntoDeserializer};

use crate::error::{Error, Result};
use crate::gateway::{MatrixBackend, MatrixClient, MatrixConfig};
use crate::sequencer::{RouteSequencer, SequencerOptions, SequencingStrategy};

#[derive(Debug, Clone)]
pub struct Settings {
    pub strategy: SequencingStrategy,
    pub matrix: MatrixConfig,
    pub sequencer: SequencerOptions,
}

impl Settings {
    /// Load settings from environment variables (and `.env` when present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`, which returns the value of a variable if set.
    ///
    /// `ROUTING_ENV` of `test` or `development` selects geometric sequencing so
    /// those runs never reach the matrix provider; any other value uses the
    /// road network.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let strategy = match var("ROUTING_ENV").as_deref() {
            Some("test") | Some("development") => SequencingStrategy::Geometric,
            _ => SequencingStrategy::RoadNetwork,
        };

        let backend: MatrixBackend = match var("MATRIX_BACKEND") {
            Some(backend) => parse_enum("MATRIX_BACKEND", &backend)?,
            None => MatrixBackend::default(),
        };

        let mut matrix = MatrixConfig::for_backend(backend);
        if let Some(base_url) = var("MATRIX_BASE_URL") {
            matrix.base_url = base_url;
        }
        if let Some(profile) = var("MATRIX_PROFILE") {
            matrix.profile = profile;
        }
        matrix.access_token = var("MAPBOX_ACCESS_TOKEN");
        if let Some(annotation) = var("MATRIX_ANNOTATION") {
            matrix.annotation = parse_enum("MATRIX_ANNOTATION", &annotation)?;
        }
        if let Some(timeout) = var("MATRIX_TIMEOUT_SECS") {
            matrix.timeout_secs = parse_number("MATRIX_TIMEOUT_SECS", &timeout)?;
        }
        if let Some(max_points) = var("MATRIX_MAX_POINTS") {
            matrix.max_points = parse_number("MATRIX_MAX_POINTS", &max_points)?;
        }

        let mut sequencer = SequencerOptions::default();
        if let Some(chunk_size) = var("SEQUENCER_CHUNK_SIZE") {
            sequencer.chunk_size = parse_number("SEQUENCER_CHUNK_SIZE", &chunk_size)?;
        }
        if let Some(concurrency) = var("SEQUENCER_MAX_CONCURRENT_REQUESTS") {
            sequencer.max_concurrent_requests =
                parse_number("SEQUENCER_MAX_CONCURRENT_REQUESTS", &concurrency)?;
        }

        if strategy == SequencingStrategy::RoadNetwork
            && backend == MatrixBackend::Mapbox
            && matrix.access_token.is_none()
        {
            return Err(Error::invalid_config(
                "MAPBOX_ACCESS_TOKEN must be set for road-network sequencing",
            ));
        }

        Ok(Self {
            strategy,
            matrix,
            sequencer,
        })
    }

    pub fn build_sequencer(&self) -> Result<RouteSequencer<MatrixClient>> {
        let client = MatrixClient::new(self.matrix.clone())?;
        RouteSequencer::new(client, self.strategy, self.sequencer.clone())
    }
}

/// Parses a lowercase variant name through the type's serde representation.
fn parse_enum<T: DeserializeOwned>(key: &str, value: &str) -> Result<T> {
    let deserializer: StrDeserializer<'_, serde::de::value::Error> = value.into_deserializer();
    T::deserialize(deserializer).map_err(|_| Error::invalid_config(format!("unknown {} '{}'", key, value)))
}

fn parse_number<T: FromStr + PartialOrd + Default>(key: &str, value: &str) -> Result<T> {
    let invalid = || Error::invalid_config(format!("{} must be a positive integer, got '{}'", key, value));
    let number: T = value.parse().map_err(|_| invalid())?;
    if number <= T::default() {
        return Err(invalid());
    }
    Ok(number)
}
