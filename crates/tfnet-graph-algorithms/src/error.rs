//! Error types for centrality computations

use thiserror::Error;

/// Failures that make a measure undefined for a graph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CentralityError {
    #[error("{measure} is undefined for a graph without nodes")]
    EmptyGraph { measure: &'static str },

    #[error("eigenvector centrality failed to converge in {iterations} iterations")]
    NotConverged { iterations: usize },

    #[error("katz centrality system is singular (alpha = {alpha})")]
    SingularSystem { alpha: f64 },

    #[error("{measure} produced no score for node {node}")]
    MissingScore { measure: &'static str, node: u64 },
}

pub type CentralityResult<T> = Result<T, CentralityError>;
