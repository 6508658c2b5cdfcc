//! Footprint interaction file reader
//!
//! Tab-separated with a header containing at least `TF`, `gene` and
//! `interaction_score`. Each row becomes a `TF -> gene` edge; a repeated pair
//! keeps the last score.

use super::graph::{EdgeAttrs, InteractionGraph};
use crate::error::{AnalysisError, AnalysisResult};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct InteractionRow {
    #[serde(rename = "TF")]
    tf: String,
    gene: String,
    interaction_score: f64,
}

/// Load a sample's interaction graph; a missing, malformed or empty file is an error
pub fn load_network(path: impl AsRef<Path>) -> AnalysisResult<InteractionGraph> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(AnalysisError::MissingNetwork(path.to_path_buf()));
    }
    let file = std::fs::File::open(path).map_err(|e| AnalysisError::io(path, e))?;
    let graph = read_network(file, path)?;
    debug!(
        "Loaded {} ({} nodes, {} edges)",
        path.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Parse interaction rows from any reader; `source` names the input in errors
pub fn read_network<R: Read>(reader: R, source: &Path) -> AnalysisResult<InteractionGraph> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut graph = InteractionGraph::new();
    for (i, row) in rdr.deserialize::<InteractionRow>().enumerate() {
        // Header is line 1
        let line = i + 2;
        let row = row.map_err(|e| AnalysisError::MalformedNetwork {
            path: source.to_path_buf(),
            row: e.position().map_or(line, |p| p.line() as usize),
            reason: e.to_string(),
        })?;
        if !row.interaction_score.is_finite() {
            return Err(AnalysisError::MalformedNetwork {
                path: source.to_path_buf(),
                row: line,
                reason: format!("non-finite interaction_score {}", row.interaction_score),
            });
        }
        graph.add_edge(&row.tf, &row.gene, EdgeAttrs::raw(row.interaction_score));
    }

    if graph.edge_count() == 0 {
        return Err(AnalysisError::EmptyNetwork(source.to_path_buf()));
    }
    Ok(graph)
}
