//! Cross-sample graph intersection
//!
//! The master graph keeps only edges present in every merged sample. Edge
//! weights are summed along the way with a contribution count, and divided by
//! that count once the fold is complete.

use super::graph::{EdgeAttrs, InteractionGraph};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a missing contribution count is read when intersecting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountPolicy {
    /// Missing count reads 1 on the accumulated side and 2 on the incoming side,
    /// so two raw graphs merge to count 3.
    #[default]
    Legacy,
    /// Missing count reads 1 on both sides; count equals contributing graphs.
    Symmetric,
}

impl CountPolicy {
    fn incoming_default(self) -> u32 {
        match self {
            CountPolicy::Legacy => 2,
            CountPolicy::Symmetric => 1,
        }
    }
}

/// Intersect two graphs, summing weights and contribution counts.
///
/// Edges are visited in `g1` order; edges missing from either graph are dropped
/// and only nodes of surviving edges are kept.
pub fn intersect_sum_weights(
    g1: &InteractionGraph,
    g2: &InteractionGraph,
    policy: CountPolicy,
) -> InteractionGraph {
    let mut g3 = InteractionGraph::new();

    for (u, v, first) in g1.edges() {
        let Some(second) = g2.edge(u, v) else {
            continue;
        };
        let weight = first.weight + second.weight;
        let count = first.count.unwrap_or(1) + second.count.unwrap_or(policy.incoming_default());
        g3.add_edge(u, v, EdgeAttrs::counted(weight, count));
    }

    debug!(
        "Intersected {} x {} edges -> {} edges",
        g1.edge_count(),
        g2.edge_count(),
        g3.edge_count()
    );
    g3
}

/// Divide each counted edge's weight by its count.
///
/// Edges without a count are untouched. The graph is flagged as averaged and a
/// second call leaves it unchanged.
pub fn average_weights(mut graph: InteractionGraph) -> InteractionGraph {
    if graph.is_averaged() {
        return graph;
    }
    for attrs in graph.edge_attrs_mut() {
        if let Some(count) = attrs.count {
            attrs.weight /= count as f64;
        }
    }
    graph.set_averaged(true);
    graph
}

/// Sequential fold of per-sample graphs into their intersection
#[derive(Debug, Default)]
pub struct MasterGraph {
    graph: Option<InteractionGraph>,
    policy: CountPolicy,
    merged: usize,
}

impl MasterGraph {
    pub fn new(policy: CountPolicy) -> Self {
        Self {
            graph: None,
            policy,
            merged: 0,
        }
    }

    /// Fold in the next sample graph
    pub fn merge(&mut self, graph: InteractionGraph) {
        self.graph = Some(match self.graph.take() {
            None => graph,
            Some(master) => intersect_sum_weights(&master, &graph, self.policy),
        });
        self.merged += 1;
    }

    /// Number of graphs folded so far
    pub fn merged(&self) -> usize {
        self.merged
    }

    /// Current (un-averaged) intersection
    pub fn current(&self) -> Option<&InteractionGraph> {
        self.graph.as_ref()
    }

    /// Averaged master graph, `None` if nothing was merged
    pub fn finish(self) -> Option<InteractionGraph> {
        self.graph.map(average_weights)
    }
}
