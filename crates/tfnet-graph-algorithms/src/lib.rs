//! Graph analytics over a read-only CSR view.
//!
//! The analysis crate projects its interaction graphs into a [`GraphView`] and
//! calls the routines re-exported here. Graphs are directed; the spectral
//! measures (eigenvector, Katz) read edge weights, the path measures count hops.

pub mod centrality;
pub mod common;
pub mod error;
pub mod pathfinding;

pub use centrality::{
    average_neighbor_degree, betweenness_centrality, closeness_centrality, degree_centrality,
    eigenvector_centrality, in_degree_centrality, katz_centrality, load_centrality,
    out_degree_centrality, CentralityConfig,
};
pub use common::{GraphView, NodeId};
pub use error::{CentralityError, CentralityResult};
pub use pathfinding::{bfs_distances, bfs_predecessors, shortest_path_dag, ShortestPathDag};
