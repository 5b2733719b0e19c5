//! Route sequencing entry point.
//!
//! Picks a solving strategy per call, fetches matrices in provider-sized
//! chunks and stitches the chunk orderings back into one route.

use std::time::Instant;

use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::haversine::HaversineMatrix;
use crate::point::Point;
use crate::solver::{self, SolveOptions};
use crate::traits::DistanceMatrixProvider;

/// How stop-to-stop costs are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencingStrategy {
    /// Straight-line distance only. The matrix provider is never called.
    #[default]
    Geometric,
    /// Road-network matrices from the provider, chunked to its point ceiling.
    RoadNetwork,
}

#[derive(Debug, Clone)]
pub struct SequencerOptions {
    /// Points per chunk in multi-chunk solves, anchor included.
    pub chunk_size: usize,
    /// Upper bound on matrix requests in flight at once.
    pub max_concurrent_requests: usize,
    pub solve: SolveOptions,
}

impl Default for SequencerOptions {
    fn default() -> Self {
        Self {
            chunk_size: 24,
            max_concurrent_requests: 4,
            solve: SolveOptions::default(),
        }
    }
}

pub struct RouteSequencer<P> {
    provider: P,
    strategy: SequencingStrategy,
    options: SequencerOptions,
    pool: rayon::ThreadPool,
}

impl RouteSequencer<HaversineMatrix> {
    /// Sequencer that only ever orders by straight-line distance.
    pub fn geometric(options: SequencerOptions) -> Result<Self> {
        Self::new(HaversineMatrix::default(), SequencingStrategy::Geometric, options)
    }
}

impl<P: DistanceMatrixProvider> RouteSequencer<P> {
    pub fn new(provider: P, strategy: SequencingStrategy, options: SequencerOptions) -> Result<Self> {
        if options.max_concurrent_requests == 0 {
            return Err(Error::invalid_config("max_concurrent_requests must be at least 1"));
        }
        if options.chunk_size < 2 {
            return Err(Error::invalid_config(format!(
                "chunk_size must be at least 2, got {}",
                options.chunk_size
            )));
        }
        if strategy == SequencingStrategy::RoadNetwork && options.chunk_size > provider.max_points() {
            return Err(Error::invalid_config(format!(
                "chunk_size {} exceeds the provider limit of {} points",
                options.chunk_size,
                provider.max_points()
            )));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.max_concurrent_requests)
            .thread_name(|i| format!("tour-sequencer-{}", i))
            .build()
            .map_err(|err| Error::invalid_config(format!("failed to build worker pool: {}", err)))?;

        Ok(Self {
            provider,
            strategy,
            options,
            pool,
        })
    }

    pub fn strategy(&self) -> SequencingStrategy {
        self.strategy
    }

    pub fn options(&self) -> &SequencerOptions {
        &self.options
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Orders `stops` into a driving sequence starting from `start`.
    ///
    /// The result is a permutation of `stops`; `start` is not part of it.
    /// Any provider failure fails the whole call.
    pub fn solve_with_matrix(&self, start: &Point, stops: &[Point]) -> Result<Vec<Point>> {
        self.solve_with_matrix_cancellable(start, stops, &CancellationToken::new())
    }

    /// Like [`solve_with_matrix`](Self::solve_with_matrix), returning
    /// [`Error::Cancelled`] once `cancel` fires. Results of chunks that already
    /// finished are discarded.
    pub fn solve_with_matrix_cancellable(
        &self,
        start: &Point,
        stops: &[Point],
        cancel: &CancellationToken,
    ) -> Result<Vec<Point>> {
        if stops.len() < 2 {
            return Ok(stops.to_vec());
        }
        ensure_active(cancel)?;

        let started = Instant::now();
        let ordered = match self.strategy {
            SequencingStrategy::Geometric => {
                solver::solve_geometric(start, stops, &self.options.solve)?
            }
            SequencingStrategy::RoadNetwork if stops.len() < self.provider.max_points() => {
                self.solve_simple(start, stops, cancel)?
            }
            SequencingStrategy::RoadNetwork => self.solve_chunked(start, stops, cancel)?,
        };

        info!(
            strategy = ?self.strategy,
            stops = stops.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "route sequenced"
        );
        Ok(ordered)
    }

    /// One matrix over start + stops.
    fn solve_simple(&self, start: &Point, stops: &[Point], cancel: &CancellationToken) -> Result<Vec<Point>> {
        let mut points = Vec::with_capacity(stops.len() + 1);
        points.push(start.clone());
        points.extend_from_slice(stops);

        let response = self.provider.matrix_for(&points)?;
        ensure_active(cancel)?;
        solver::solve_with_matrix(start, stops, &response.matrix, &self.options.solve)
    }

    /// Pre-orders geometrically, cuts the sequence into chunks and solves each
    /// chunk on its own matrix.
    ///
    /// Every chunk is anchored on its first element. Only the first chunk's
    /// anchor is the real start; later chunks start at their first stop in
    /// geometric order, so chunk boundaries are never re-optimized.
    fn solve_chunked(&self, start: &Point, stops: &[Point], cancel: &CancellationToken) -> Result<Vec<Point>> {
        let mut sequence = Vec::with_capacity(stops.len() + 1);
        sequence.push(start.clone());
        sequence.extend(solver::solve_geometric(start, stops, &self.options.solve)?);

        let chunks: Vec<&[Point]> = sequence.chunks(self.options.chunk_size).collect();
        debug!(
            stops = stops.len(),
            chunks = chunks.len(),
            chunk_size = self.options.chunk_size,
            "solving in chunks"
        );

        let solved: Vec<Vec<Point>> = self.pool.install(|| {
            chunks
                .par_iter()
                .enumerate()
                .map(|(index, chunk)| self.solve_chunk(index, chunk, cancel))
                .collect::<Result<Vec<_>>>()
        })?;
        ensure_active(cancel)?;

        Ok(solved.into_iter().flatten().collect())
    }

    fn solve_chunk(&self, index: usize, chunk: &[Point], cancel: &CancellationToken) -> Result<Vec<Point>> {
        ensure_active(cancel)?;

        let (anchor, rest) = chunk
            .split_first()
            .ok_or_else(|| Error::invalid_config("empty chunk"))?;
        let response = self.provider.matrix_for(chunk)?;
        ensure_active(cancel)?;

        let ordered = solver::solve_with_matrix(anchor, rest, &response.matrix, &self.options.solve)?;
        debug!(chunk = index, points = chunk.len(), "chunk solved");

        if index == 0 {
            return Ok(ordered);
        }
        let mut with_anchor = Vec::with_capacity(chunk.len());
        with_anchor.push(anchor.clone());
        with_anchor.extend(ordered);
        Ok(with_anchor)
    }
}

fn ensure_active(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    Ok(())
}
