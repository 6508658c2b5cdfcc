//! Error types for the analysis library

use std::path::PathBuf;
use tfnet_graph_algorithms::CentralityError;
use thiserror::Error;

/// Errors that abort an analysis step
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Sample name '{0}' does not encode <cell line>_<technique>_<patient>_<sample>")]
    InvalidSampleName(String),

    #[error("No clinical record for sample id '{0}'")]
    ClinicalRecordNotFound(String),

    #[error("Sample id '{0}' appears in more than one clinical record")]
    DuplicateClinicalRecord(String),

    #[error("Network file {0} not found")]
    MissingNetwork(PathBuf),

    #[error("Malformed network row {row} in {path}: {reason}")]
    MalformedNetwork {
        path: PathBuf,
        row: usize,
        reason: String,
    },

    #[error("Network file {0} contains no interactions")]
    EmptyNetwork(PathBuf),

    #[error("Description of sample '{sample}' failed: {source}")]
    Centrality {
        sample: String,
        #[source]
        source: CentralityError,
    },

    #[error("Graph error: {0}")]
    Graph(#[from] crate::network::GraphError),

    #[error("No samples left to analyse after filtering")]
    NoSamples,
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        AnalysisError::Csv {
            path: path.into(),
            source,
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
