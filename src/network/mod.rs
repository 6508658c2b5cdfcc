//! Interaction networks
//!
//! Per-sample TF interaction graphs: loading, cross-sample intersection,
//! centrality description and node-link serialization.

pub mod describe;
pub mod graph;
pub mod loader;
pub mod merge;
pub mod node_link;

pub use describe::{
    describe, DescriptionRow, DescriptionTable, GraphDescription, Measure, MeasureSummary,
    MeasureValue, RankedValue, MEASURE_COUNT,
};
pub use graph::{EdgeAttrs, GraphError, GraphResult, InteractionGraph, NodeId};
pub use loader::{load_network, read_network};
pub use merge::{average_weights, intersect_sum_weights, CountPolicy, MasterGraph};
pub use node_link::{from_node_link, read_node_link, to_node_link, write_node_link, NodeLinkGraph};
