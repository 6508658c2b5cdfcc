//! Node centrality measures
//!
//! Definitions follow the networkx 1.x formulations on a directed graph,
//! including their normalisation constants, so scores are comparable with
//! published network descriptions. Eigenvector and Katz centrality weight each
//! edge by its score; degree, closeness, betweenness, load and average
//! neighbour degree count edges and hops.

use super::common::{GraphView, NodeId};
use super::error::{CentralityError, CentralityResult};
use super::pathfinding::{bfs_distances, bfs_predecessors, shortest_path_dag};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Pivot magnitude below which the Katz system is treated as singular
const SINGULAR_EPSILON: f64 = 1e-12;

/// Tunables of the iterative/spectral measures
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CentralityConfig {
    /// Power iteration cap for eigenvector centrality
    pub eigenvector_max_iter: usize,
    /// Convergence threshold per node for eigenvector centrality
    pub eigenvector_tolerance: f64,
    /// Attenuation factor for Katz centrality
    pub katz_alpha: f64,
    /// Baseline score for Katz centrality
    pub katz_beta: f64,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            eigenvector_max_iter: 100,
            eigenvector_tolerance: 1.0e-6,
            katz_alpha: 0.1,
            katz_beta: 1.0,
        }
    }
}

fn degree_scale(n: usize) -> Option<f64> {
    if n <= 1 {
        None
    } else {
        Some(1.0 / (n - 1) as f64)
    }
}

fn scaled_degrees(view: &GraphView, degree: impl Fn(usize) -> usize) -> HashMap<NodeId, f64> {
    let scores = match degree_scale(view.node_count) {
        Some(s) => (0..view.node_count).map(|i| degree(i) as f64 * s).collect(),
        None => vec![1.0; view.node_count],
    };
    view.to_node_map(scores)
}

/// Total degree over `n - 1`
pub fn degree_centrality(view: &GraphView) -> HashMap<NodeId, f64> {
    scaled_degrees(view, |i| view.in_degree(i) + view.out_degree(i))
}

/// In-degree over `n - 1`
pub fn in_degree_centrality(view: &GraphView) -> HashMap<NodeId, f64> {
    scaled_degrees(view, |i| view.in_degree(i))
}

/// Out-degree over `n - 1`
pub fn out_degree_centrality(view: &GraphView) -> HashMap<NodeId, f64> {
    scaled_degrees(view, |i| view.out_degree(i))
}

/// Closeness centrality on outgoing distances.
///
/// For node `u` reaching `r` other nodes at total distance `d`, the score is
/// `(r / d) * (r / (n - 1))` (Wasserman and Faust scaling for disconnected graphs).
pub fn closeness_centrality(view: &GraphView) -> HashMap<NodeId, f64> {
    let n = view.node_count;
    let scores: Vec<f64> = (0..n)
        .into_par_iter()
        .map(|u| {
            let dist = bfs_distances(view, u);
            let (reached, total) = dist
                .iter()
                .flatten()
                .fold((0usize, 0usize), |(r, t), &d| (r + 1, t + d));
            if total == 0 || n <= 1 {
                return 0.0;
            }
            let others = (reached - 1) as f64;
            (others / total as f64) * (others / (n - 1) as f64)
        })
        .collect();
    view.to_node_map(scores)
}

/// Scale applied to path-based measures of a directed graph
fn path_scale(n: usize) -> Option<f64> {
    if n <= 2 {
        None
    } else {
        Some(1.0 / ((n - 1) * (n - 2)) as f64)
    }
}

fn sum_per_source(n: usize, per_source: Vec<Vec<f64>>) -> Vec<f64> {
    // Summed in source order so repeated runs give identical floats.
    let mut totals = vec![0.0; n];
    for contribution in per_source {
        for (total, value) in totals.iter_mut().zip(contribution) {
            *total += value;
        }
    }
    if let Some(scale) = path_scale(n) {
        for total in &mut totals {
            *total *= scale;
        }
    }
    totals
}

/// Brandes betweenness centrality, normalised by `1 / ((n - 1)(n - 2))`
pub fn betweenness_centrality(view: &GraphView) -> HashMap<NodeId, f64> {
    let n = view.node_count;
    let per_source: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|s| {
            let dag = shortest_path_dag(view, s);
            let mut delta = vec![0.0; n];
            let mut contribution = vec![0.0; n];
            for &w in dag.order.iter().rev() {
                let coeff = (1.0 + delta[w]) / dag.sigma[w];
                for &v in &dag.preds[w] {
                    delta[v] += dag.sigma[v] * coeff;
                }
                if w != s {
                    contribution[w] += delta[w];
                }
            }
            contribution
        })
        .collect();

    view.to_node_map(sum_per_source(n, per_source))
}

/// Newman load centrality, normalised like betweenness.
///
/// Each reached node starts with one unit of load which is pushed back towards
/// the source, split evenly among its BFS predecessors.
pub fn load_centrality(view: &GraphView) -> HashMap<NodeId, f64> {
    let n = view.node_count;
    let per_source: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|source| {
            let (preds, level) = bfs_predecessors(view, source);
            let mut between: Vec<f64> = level
                .iter()
                .map(|l| if l.is_some() { 1.0 } else { 0.0 })
                .collect();

            let mut ordered: Vec<(usize, usize)> = level
                .iter()
                .enumerate()
                .filter_map(|(v, l)| l.filter(|&d| d > 0).map(|d| (d, v)))
                .collect();
            ordered.sort_unstable();

            while let Some((_, v)) = ordered.pop() {
                let num_paths = preds[v].len() as f64;
                for &x in &preds[v] {
                    if x == source {
                        break;
                    }
                    between[x] += between[v] / num_paths;
                }
            }

            for (value, l) in between.iter_mut().zip(&level) {
                if l.is_some() {
                    *value -= 1.0;
                }
            }
            between
        })
        .collect();

    view.to_node_map(sum_per_source(n, per_source))
}

/// Eigenvector centrality over weighted in-edges by shifted power iteration.
///
/// Iterates `x <- (W^T + I) x` from the uniform vector, L2-normalising each step,
/// until the summed absolute change drops below `n * tolerance`. The shift leaves
/// the eigenvector unchanged and lets periodic graphs converge.
pub fn eigenvector_centrality(
    view: &GraphView,
    config: &CentralityConfig,
) -> CentralityResult<HashMap<NodeId, f64>> {
    let n = view.node_count;
    if n == 0 {
        return Err(CentralityError::EmptyGraph {
            measure: "eigenvector centrality",
        });
    }

    let mut x = vec![1.0 / n as f64; n];
    for _ in 0..config.eigenvector_max_iter {
        let last = x.clone();
        for v in 0..n {
            for (w, weight) in view.weighted_successors(v) {
                x[w] += last[v] * weight;
            }
        }

        let norm = x.iter().map(|z| z * z).sum::<f64>().sqrt();
        let norm = if norm == 0.0 { 1.0 } else { norm };
        for z in &mut x {
            *z /= norm;
        }

        let change: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if change < n as f64 * config.eigenvector_tolerance {
            return Ok(view.to_node_map(x));
        }
    }

    Err(CentralityError::NotConverged {
        iterations: config.eigenvector_max_iter,
    })
}

/// Katz centrality from a direct solve of `(I - alpha W^T) x = beta`, where `W`
/// holds the edge weights.
///
/// The solution is divided by its L2 norm, signed so the scores sum positive.
pub fn katz_centrality(
    view: &GraphView,
    config: &CentralityConfig,
) -> CentralityResult<HashMap<NodeId, f64>> {
    let n = view.node_count;
    if n == 0 {
        return Ok(HashMap::new());
    }

    let mut system = Array2::<f64>::eye(n);
    for source in 0..n {
        for (target, weight) in view.weighted_successors(source) {
            system[[target, source]] -= config.katz_alpha * weight;
        }
    }
    let rhs = Array1::from_elem(n, config.katz_beta);

    let solution = solve_dense(system, rhs).ok_or(CentralityError::SingularSystem {
        alpha: config.katz_alpha,
    })?;

    let total: f64 = solution.sum();
    let norm = solution.dot(&solution).sqrt();
    let norm = if total < 0.0 { -norm } else { norm };
    let scores: Vec<f64> = if norm == 0.0 {
        solution.to_vec()
    } else {
        solution.iter().map(|v| v / norm).collect()
    };

    Ok(view.to_node_map(scores))
}

/// Gaussian elimination with partial pivoting
fn solve_dense(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Array1<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| {
            a[[i, col]]
                .abs()
                .partial_cmp(&a[[j, col]].abs())
                .unwrap_or(Ordering::Equal)
        })?;
        if a[[pivot, col]].abs() < SINGULAR_EPSILON {
            return None;
        }
        if pivot != col {
            for k in 0..n {
                a.swap([col, k], [pivot, k]);
            }
            b.swap(col, pivot);
        }
        for row in (col + 1)..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let mut acc = b[row];
        for k in (row + 1)..n {
            acc -= a[[row, k]] * x[k];
        }
        x[row] = acc / a[[row, row]];
    }
    Some(x)
}

/// Mean out-degree of each node's successors; 0 for nodes without successors
pub fn average_neighbor_degree(view: &GraphView) -> HashMap<NodeId, f64> {
    let scores = (0..view.node_count)
        .map(|v| {
            let succ = view.successors(v);
            if succ.is_empty() {
                0.0
            } else {
                let total: usize = succ.iter().map(|&w| view.out_degree(w)).sum();
                total as f64 / succ.len() as f64
            }
        })
        .collect();
    view.to_node_map(scores)
}
