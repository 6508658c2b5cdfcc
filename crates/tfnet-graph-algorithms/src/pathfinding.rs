//! Unweighted shortest-path searches
//!
//! Breadth-first traversals shared by the path-based centrality measures.

use super::common::GraphView;
use std::collections::VecDeque;

/// Hop distance along outgoing edges from `source_idx` to every node, `None`
/// when unreachable.
pub fn bfs_distances(view: &GraphView, source_idx: usize) -> Vec<Option<usize>> {
    let mut dist = vec![None; view.node_count];
    let mut queue = VecDeque::new();

    dist[source_idx] = Some(0);
    queue.push_back(source_idx);

    while let Some(current_idx) = queue.pop_front() {
        let next_dist = dist[current_idx].map(|d| d + 1);
        for &next_idx in view.successors(current_idx) {
            if dist[next_idx].is_none() {
                dist[next_idx] = next_dist;
                queue.push_back(next_idx);
            }
        }
    }

    dist
}

/// Single-source shortest-path DAG used by Brandes' accumulation
#[derive(Debug, Clone)]
pub struct ShortestPathDag {
    /// Nodes in non-decreasing distance order (BFS visit order)
    pub order: Vec<usize>,
    /// Number of shortest paths from the source
    pub sigma: Vec<f64>,
    /// Shortest-path predecessors
    pub preds: Vec<Vec<usize>>,
}

/// BFS from `source_idx` counting shortest paths over outgoing edges.
pub fn shortest_path_dag(view: &GraphView, source_idx: usize) -> ShortestPathDag {
    let n = view.node_count;
    let mut order = Vec::with_capacity(n);
    let mut sigma = vec![0.0; n];
    let mut preds = vec![Vec::new(); n];
    let mut dist: Vec<Option<usize>> = vec![None; n];
    let mut queue = VecDeque::new();

    sigma[source_idx] = 1.0;
    dist[source_idx] = Some(0);
    queue.push_back(source_idx);

    while let Some(v) = queue.pop_front() {
        order.push(v);
        let dv = dist[v].unwrap_or(0);
        let sigma_v = sigma[v];
        for &w in view.successors(v) {
            match dist[w] {
                None => {
                    dist[w] = Some(dv + 1);
                    queue.push_back(w);
                    sigma[w] += sigma_v;
                    preds[w].push(v);
                }
                Some(dw) if dw == dv + 1 => {
                    sigma[w] += sigma_v;
                    preds[w].push(v);
                }
                Some(_) => {}
            }
        }
    }

    ShortestPathDag { order, sigma, preds }
}

/// Level-synchronous BFS predecessor lists.
///
/// Returns `(preds, level)`: for every reached node, the predecessors found on the
/// previous level in discovery order, and its level (`None` when unreachable).
pub fn bfs_predecessors(view: &GraphView, source_idx: usize) -> (Vec<Vec<usize>>, Vec<Option<usize>>) {
    let n = view.node_count;
    let mut preds = vec![Vec::new(); n];
    let mut level: Vec<Option<usize>> = vec![None; n];

    level[source_idx] = Some(0);
    let mut depth = 0;
    let mut next_level = vec![source_idx];

    while !next_level.is_empty() {
        depth += 1;
        let this_level = std::mem::take(&mut next_level);
        for v in this_level {
            for &w in view.successors(v) {
                match level[w] {
                    None => {
                        preds[w].push(v);
                        level[w] = Some(depth);
                        next_level.push(w);
                    }
                    Some(l) if l == depth => preds[w].push(v),
                    Some(_) => {}
                }
            }
        }
    }

    (preds, level)
}
