//! Shared graph view for algorithm execution
//!
//! Provides a read-only, dense view of a directed graph's topology.

use std::collections::HashMap;

/// Node Identifier type (u64)
pub type NodeId = u64;

/// A dense, integer-indexed view of the graph topology using Compressed Sparse Row (CSR) format.
///
/// Node indices run over `0..node_count` in the order the caller supplied them, so
/// every result map can be traced back to the caller's node order through
/// `index_to_node`.
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<usize>,

    /// Offsets into `in_sources`. Size = node_count + 1
    pub in_offsets: Vec<usize>,
    /// Contiguous array of source node indices
    pub in_sources: Vec<usize>,

    /// Edge weights: aligned with `out_targets`
    pub weights: Option<Vec<f64>>,
}

impl GraphView {
    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get the in-degree of a node (by index)
    pub fn in_degree(&self, idx: usize) -> usize {
        self.in_offsets[idx + 1] - self.in_offsets[idx]
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: usize) -> &[usize] {
        let start = self.out_offsets[idx];
        let end = self.out_offsets[idx + 1];
        &self.out_targets[start..end]
    }

    /// Get incoming neighbors (predecessors) of a node
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        let start = self.in_offsets[idx];
        let end = self.in_offsets[idx + 1];
        &self.in_sources[start..end]
    }

    /// Get weights for outgoing edges of a node
    pub fn weights(&self, idx: usize) -> Option<&[f64]> {
        self.weights.as_ref().map(|w| {
            let start = self.out_offsets[idx];
            let end = self.out_offsets[idx + 1];
            &w[start..end]
        })
    }

    /// Outgoing neighbours paired with their edge weights (1.0 on unweighted views)
    pub fn weighted_successors(&self, idx: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let weights = self.weights(idx);
        self.successors(idx)
            .iter()
            .enumerate()
            .map(move |(i, &target)| (target, weights.map_or(1.0, |w| w[i])))
    }

    /// Total number of directed edges
    pub fn edge_count(&self) -> usize {
        self.out_targets.len()
    }

    /// Map a per-index score vector back to NodeIds
    pub fn to_node_map(&self, scores: Vec<f64>) -> HashMap<NodeId, f64> {
        let mut result = HashMap::with_capacity(self.node_count);
        for (idx, score) in scores.into_iter().enumerate() {
            result.insert(self.index_to_node[idx], score);
        }
        result
    }

    /// Build a view from an ordered node list and `(source, target, weight)` triples.
    ///
    /// Edges whose endpoints are not in `nodes` are skipped. Neighbour order follows
    /// edge order.
    pub fn from_edges(nodes: &[NodeId], edges: &[(NodeId, NodeId, f64)]) -> Self {
        let node_count = nodes.len();
        let index_to_node = nodes.to_vec();
        let node_to_index: HashMap<NodeId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();

        let mut outgoing = vec![Vec::new(); node_count];
        let mut incoming = vec![Vec::new(); node_count];
        let mut weights = vec![Vec::new(); node_count];

        for &(source, target, weight) in edges {
            let (Some(&u), Some(&v)) = (node_to_index.get(&source), node_to_index.get(&target))
            else {
                continue;
            };
            outgoing[u].push(v);
            weights[u].push(weight);
            incoming[v].push(u);
        }

        Self::from_adjacency_list(
            node_count,
            index_to_node,
            node_to_index,
            outgoing,
            incoming,
            Some(weights),
        )
    }

    /// Helper to create GraphView from adjacency lists
    pub fn from_adjacency_list(
        node_count: usize,
        index_to_node: Vec<NodeId>,
        node_to_index: HashMap<NodeId, usize>,
        outgoing: Vec<Vec<usize>>,
        incoming: Vec<Vec<usize>>,
        weights: Option<Vec<Vec<f64>>>,
    ) -> Self {
        let mut out_offsets = Vec::with_capacity(node_count + 1);
        let mut out_targets = Vec::new();
        let mut in_offsets = Vec::with_capacity(node_count + 1);
        let mut in_sources = Vec::new();
        let mut flat_weights = if weights.is_some() { Some(Vec::new()) } else { None };

        out_offsets.push(0);
        for (i, neighbors) in outgoing.into_iter().enumerate() {
            out_targets.extend(neighbors);
            out_offsets.push(out_targets.len());

            if let Some(ref mut w_flat) = flat_weights {
                if let Some(w_row) = weights.as_ref().map(|w| &w[i]) {
                    w_flat.extend(w_row.iter());
                }
            }
        }

        in_offsets.push(0);
        for sources in incoming {
            in_sources.extend(sources);
            in_offsets.push(in_sources.len());
        }

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            out_offsets,
            out_targets,
            in_offsets,
            in_sources,
            weights: flat_weights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges_builds_csr() {
        // 10 -> 20 -> 30, 10 -> 30
        let view = GraphView::from_edges(
            &[10, 20, 30],
            &[(10, 20, 1.5), (20, 30, 2.0), (10, 30, 0.5)],
        );

        assert_eq!(view.node_count, 3);
        assert_eq!(view.edge_count(), 3);
        assert_eq!(view.successors(0), &[1, 2]);
        assert_eq!(view.predecessors(2), &[1, 0]);
        assert_eq!(view.out_degree(0), 2);
        assert_eq!(view.in_degree(0), 0);
        assert_eq!(view.weights(0), Some(&[1.5, 0.5][..]));
        assert_eq!(
            view.weighted_successors(0).collect::<Vec<_>>(),
            vec![(1, 1.5), (2, 0.5)]
        );
    }

    #[test]
    fn test_unweighted_view_reports_unit_weights() {
        let view = GraphView::from_adjacency_list(
            2,
            vec![1, 2],
            [(1, 0), (2, 1)].into_iter().collect(),
            vec![vec![1], vec![]],
            vec![vec![], vec![0]],
            None,
        );
        assert_eq!(view.weights(0), None);
        assert_eq!(view.weighted_successors(0).collect::<Vec<_>>(), vec![(1, 1.0)]);
    }

    #[test]
    fn test_from_edges_skips_unknown_endpoints() {
        let view = GraphView::from_edges(&[1, 2], &[(1, 2, 1.0), (2, 99, 1.0)]);
        assert_eq!(view.edge_count(), 1);
        assert!(view.successors(1).is_empty());
    }

    #[test]
    fn test_to_node_map() {
        let view = GraphView::from_edges(&[7, 8], &[(7, 8, 1.0)]);
        let map = view.to_node_map(vec![0.25, 0.75]);
        assert_eq!(map[&7], 0.25);
        assert_eq!(map[&8], 0.75);
    }
}
