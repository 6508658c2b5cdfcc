//! Directed TF interaction graph
//!
//! Nodes are TF/gene symbols held in insertion order; edges are unique per
//! ordered pair and carry a weight plus, on merged graphs, the number of
//! contributions summed into that weight.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use tfnet_graph_algorithms::GraphView;
use thiserror::Error;

/// Dense node identifier (insertion index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Errors raised while assembling graphs
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Edge endpoint '{0}' is not a node of the graph")]
    UnknownEndpoint(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Edge attributes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeAttrs {
    /// Interaction score, or a sum/mean of scores on merged graphs
    pub weight: f64,
    /// Contributions summed into `weight`; absent on single-sample graphs
    pub count: Option<u32>,
}

impl EdgeAttrs {
    pub fn raw(weight: f64) -> Self {
        EdgeAttrs { weight, count: None }
    }

    pub fn counted(weight: f64, count: u32) -> Self {
        EdgeAttrs {
            weight,
            count: Some(count),
        }
    }
}

/// Directed simple graph of TF -> gene interactions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionGraph {
    nodes: IndexSet<String>,
    edges: IndexMap<(NodeId, NodeId), EdgeAttrs>,
    /// Weights already divided by their counts
    averaged: bool,
}

impl InteractionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node if absent and return its id
    pub fn add_node(&mut self, name: &str) -> NodeId {
        if let Some(idx) = self.nodes.get_index_of(name) {
            return NodeId::new(idx as u64);
        }
        let (idx, _) = self.nodes.insert_full(name.to_string());
        NodeId::new(idx as u64)
    }

    /// Add or replace the edge `source -> target`, creating endpoints as needed.
    ///
    /// Replacing keeps the edge's original position in edge order.
    pub fn add_edge(&mut self, source: &str, target: &str, attrs: EdgeAttrs) -> (NodeId, NodeId) {
        let u = self.add_node(source);
        let v = self.add_node(target);
        self.edges.insert((u, v), attrs);
        (u, v)
    }

    /// Add or replace an edge between existing nodes
    pub fn add_edge_by_id(&mut self, source: NodeId, target: NodeId, attrs: EdgeAttrs) -> GraphResult<()> {
        for id in [source, target] {
            if id.index() >= self.nodes.len() {
                return Err(GraphError::NodeNotFound(id));
            }
        }
        self.edges.insert((source, target), attrs);
        Ok(())
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.nodes.get_index_of(name).map(|idx| NodeId::new(idx as u64))
    }

    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get_index(id.index()).map(String::as_str)
    }

    /// Node names in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    /// `(source, target, attrs)` in edge insertion order
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &EdgeAttrs)> {
        self.edges.iter().map(move |(&(u, v), attrs)| {
            (
                self.nodes[u.index()].as_str(),
                self.nodes[v.index()].as_str(),
                attrs,
            )
        })
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&EdgeAttrs> {
        let key = (self.node_id(source)?, self.node_id(target)?);
        self.edges.get(&key)
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.edge(source, target).is_some()
    }

    pub(crate) fn edge_attrs_mut(&mut self) -> impl Iterator<Item = &mut EdgeAttrs> {
        self.edges.values_mut()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_averaged(&self) -> bool {
        self.averaged
    }

    pub(crate) fn set_averaged(&mut self, averaged: bool) {
        self.averaged = averaged;
    }

    /// CSR projection for the centrality routines; view node ids are `NodeId`s
    pub fn to_view(&self) -> GraphView {
        let nodes: Vec<u64> = (0..self.nodes.len() as u64).collect();
        let edges: Vec<(u64, u64, f64)> = self
            .edges
            .iter()
            .map(|(&(u, v), attrs)| (u.as_u64(), v.as_u64(), attrs.weight))
            .collect();
        GraphView::from_edges(&nodes, &edges)
    }
}
