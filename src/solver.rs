//! Heuristic open-path tour solver.
//!
//! Nearest-neighbor construction from the anchor followed by 2-opt segment
//! reversal. The anchor (index 0) is fixed at the head of the path and the
//! path does not return to it. Costs may be asymmetric: reversing a segment
//! re-costs its internal edges in the opposite direction.

use tracing::debug;

use crate::error::{Error, Result};
use crate::haversine;
use crate::matrix::DistanceMatrix;
use crate::point::Point;

/// Minimum relative gain for a 2-opt move to count as an improvement.
const IMPROVEMENT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    /// Upper bound on 2-opt passes. `None` means `n²` for `n` stops.
    pub max_passes: Option<usize>,
}

impl SolveOptions {
    pub fn with_max_passes(max_passes: usize) -> Self {
        Self {
            max_passes: Some(max_passes),
        }
    }

    /// Effective pass bound for `n` stops; always at least one pass.
    pub fn pass_limit(&self, n: usize) -> usize {
        self.max_passes.unwrap_or_else(|| n.saturating_mul(n)).max(1)
    }
}

/// Orders `stops` by straight-line distance from `start`.
///
/// The start is excluded from the output. Fails with `MalformedMatrix` when a
/// coordinate makes a distance non-finite.
pub fn solve_geometric(start: &Point, stops: &[Point], options: &SolveOptions) -> Result<Vec<Point>> {
    if stops.len() < 2 {
        return Ok(stops.to_vec());
    }

    let points = with_anchor(start, stops);
    let matrix = DistanceMatrix::from_fn(points.len(), |i, j| {
        haversine::distance(&points[i], &points[j])
    })?;
    let order = solve_indices(stops.len(), |i, j| matrix.get(i, j), options);
    Ok(pick(stops, &order))
}

/// Orders `stops` using a precomputed matrix.
///
/// Row/column 0 of `matrix` is `start`; rows `1..=n` are `stops` in the given
/// order. A matrix of any other size is rejected rather than reindexed.
pub fn solve_with_matrix(
    start: &Point,
    stops: &[Point],
    matrix: &DistanceMatrix,
    options: &SolveOptions,
) -> Result<Vec<Point>> {
    if matrix.size() != stops.len() + 1 {
        return Err(Error::malformed_matrix(format!(
            "matrix is {0}x{0} but start + {1} stops need {2}x{2}",
            matrix.size(),
            stops.len(),
            stops.len() + 1
        )));
    }
    debug!(stops = stops.len(), anchor = start.id, "solving with matrix");

    let order = solve_indices(stops.len(), |i, j| matrix.get(i, j), options);
    Ok(pick(stops, &order))
}

/// Orders stop indices `1..=n` into an open path starting from anchor index 0.
///
/// Returns stop indices only (each in `1..=n`, each exactly once).
pub fn solve_indices<F>(n: usize, cost: F, options: &SolveOptions) -> Vec<usize>
where
    F: Fn(usize, usize) -> f64,
{
    match n {
        0 => Vec::new(),
        1 => vec![1],
        2 => {
            if path_cost(&[2, 1], &cost) < path_cost(&[1, 2], &cost) {
                vec![2, 1]
            } else {
                vec![1, 2]
            }
        }
        _ => {
            let mut path = nearest_neighbor(n, &cost);
            let passes = two_opt(&mut path, &cost, options.pass_limit(n));
            debug!(stops = n, passes, cost = path_cost(&path[1..], &cost), "tour improved");
            path.remove(0);
            path
        }
    }
}

/// Cost of the open path anchor → `order[0]` → ... → `order[last]`.
pub fn path_cost<F>(order: &[usize], cost: &F) -> f64
where
    F: Fn(usize, usize) -> f64,
{
    let mut total = 0.0;
    let mut prev = 0;
    for &next in order {
        total += cost(prev, next);
        prev = next;
    }
    total
}

fn with_anchor(start: &Point, stops: &[Point]) -> Vec<Point> {
    let mut points = Vec::with_capacity(stops.len() + 1);
    points.push(start.clone());
    points.extend_from_slice(stops);
    points
}

fn pick(stops: &[Point], order: &[usize]) -> Vec<Point> {
    order.iter().map(|&idx| stops[idx - 1].clone()).collect()
}

/// Greedy construction; ties go to the lowest index. Returns the path with the anchor at 0.
fn nearest_neighbor<F>(n: usize, cost: &F) -> Vec<usize>
where
    F: Fn(usize, usize) -> f64,
{
    let mut visited = vec![false; n + 1];
    visited[0] = true;
    let mut path = Vec::with_capacity(n + 1);
    path.push(0);

    let mut current = 0;
    for _ in 0..n {
        let mut best: Option<(usize, f64)> = None;
        for candidate in 1..=n {
            if visited[candidate] {
                continue;
            }
            let c = cost(current, candidate);
            if best.map_or(true, |(_, best_cost)| c < best_cost) {
                best = Some((candidate, c));
            }
        }
        // Every step leaves at least one unvisited stop.
        let Some((next, _)) = best else { break };
        visited[next] = true;
        path.push(next);
        current = next;
    }

    path
}

/// 2-opt over an open path with a fixed head. Returns the number of passes run.
///
/// Reversing `path[i..=j]` replaces the edges `(p[i-1], p[i])` and `(p[j], p[j+1])`
/// with `(p[i-1], p[j])` and `(p[i], p[j+1])`, and flips the direction of every
/// edge inside the segment. When `j` is the tail there is no outgoing edge.
fn two_opt<F>(path: &mut [usize], cost: &F, pass_limit: usize) -> usize
where
    F: Fn(usize, usize) -> f64,
{
    let last = path.len() - 1;
    let mut forward = vec![0.0; path.len()];
    let mut backward = vec![0.0; path.len()];
    prefix_costs(path, cost, &mut forward, &mut backward);

    let mut passes = 0;
    while passes < pass_limit {
        passes += 1;
        let mut improved = false;

        for i in 1..last {
            for j in (i + 1)..=last {
                let inner_forward = forward[j] - forward[i];
                let inner_backward = backward[j] - backward[i];

                let mut before = cost(path[i - 1], path[i]) + inner_forward;
                let mut after = cost(path[i - 1], path[j]) + inner_backward;
                if j < last {
                    before += cost(path[j], path[j + 1]);
                    after += cost(path[i], path[j + 1]);
                }

                if after < before - IMPROVEMENT_EPSILON * before.max(1.0) {
                    path[i..=j].reverse();
                    prefix_costs(path, cost, &mut forward, &mut backward);
                    improved = true;
                }
            }
        }

        if !improved {
            break;
        }
    }

    passes
}

/// `forward[k]` is the cost of walking `path[0..=k]`; `backward[k]` walks the
/// same edges in the opposite direction.
fn prefix_costs<F>(path: &[usize], cost: &F, forward: &mut [f64], backward: &mut [f64])
where
    F: Fn(usize, usize) -> f64,
{
    forward[0] = 0.0;
    backward[0] = 0.0;
    for k in 1..path.len() {
        forward[k] = forward[k - 1] + cost(path[k - 1], path[k]);
        backward[k] = backward[k - 1] + cost(path[k], path[k - 1]);
    }
}
