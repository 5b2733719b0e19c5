//! tour-sequencer
//!
//! Orders delivery stops into a short driving sequence from a depot, using
//! straight-line distance or road-network matrices fetched in provider-sized
//! chunks.

pub mod config;
pub mod error;
pub mod gateway;
pub mod haversine;
pub mod matrix;
pub mod point;
pub mod sequencer;
pub mod solver;
pub mod traits;

pub use error::{Error, ProviderError, Result};
pub use point::Point;
pub use sequencer::{RouteSequencer, SequencerOptions, SequencingStrategy};
