//! tfnet
//!
//! Clinical annotation of CLL ATAC-seq samples and cross-sample analysis of
//! their footprint-derived TF interaction networks.
//!
//! # Layout
//!
//! - [`sample`]: sample manifest, name helpers, analysis-subset selection
//! - [`clinical`]: date parsing, the clinical table and per-sample annotation
//! - [`network`]: interaction graphs, intersection, centrality description,
//!   node-link JSON
//! - [`pipeline`]: explicit analysis context and the end-to-end run
//! - [`config`], [`error`], [`logging`]: ambient plumbing
//!
//! ## Example Usage
//!
//! ```rust
//! use tfnet::network::{EdgeAttrs, InteractionGraph, MasterGraph, CountPolicy};
//!
//! let mut g1 = InteractionGraph::new();
//! g1.add_edge("SPI1", "IRF8", EdgeAttrs::raw(1.0));
//! let mut g2 = InteractionGraph::new();
//! g2.add_edge("SPI1", "IRF8", EdgeAttrs::raw(3.0));
//! g2.add_edge("IRF8", "PAX5", EdgeAttrs::raw(2.0));
//!
//! let mut master = MasterGraph::new(CountPolicy::Symmetric);
//! master.merge(g1);
//! master.merge(g2);
//! let master = master.finish().unwrap();
//!
//! assert_eq!(master.edge_count(), 1);
//! assert_eq!(master.edge("SPI1", "IRF8").map(|e| e.weight), Some(2.0));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod clinical;
pub mod config;
pub mod error;
pub mod logging;
pub mod network;
pub mod pipeline;
pub mod sample;

// Re-export main types for convenience
pub use clinical::{
    parse_date, ClinicalAnnotator, ClinicalDate, ClinicalRecord, ClinicalTable, Gender,
    SampleAnnotation, TreatmentTimeline,
};
pub use config::{AnalysisConfig, CohortConfig};
pub use error::{AnalysisError, AnalysisResult};
pub use network::{
    average_weights, describe, intersect_sum_weights, load_network, CountPolicy,
    DescriptionTable, EdgeAttrs, GraphDescription, InteractionGraph, MasterGraph, Measure,
};
pub use pipeline::{run, run_analysis, AnalysisContext, AnalysisOutcome, SampleSummary};
pub use sample::{load_manifest, select_for_analysis, Sample};

pub use tfnet_graph_algorithms::{CentralityConfig, CentralityError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
