//! Analysis configuration
//!
//! Paths, cohort selection, exclusion list and algorithm tunables. Loaded from a
//! YAML file; any key left out falls back to [`AnalysisConfig::default`].

use crate::error::{AnalysisError, AnalysisResult};
use crate::network::CountPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tfnet_graph_algorithms::CentralityConfig;

/// Samples that failed ATAC-seq QC
pub const DEFAULT_EXCLUDED_SAMPLES: &[&str] = &[
    "CLL_ATAC-seq_4851_1-5-45960_ATAC29-6_hg19",
    "CLL_ATAC-seq_5186_1-5-57350_ATAC17-4_hg19",
    "CLL_ATAC-seq_4784_1-5-52817_ATAC17-6_hg19",
    "CLL_ATAC-seq_981_1-5-42480_ATAC16-6_hg19",
    "CLL_ATAC-seq_5277_1-5-57269_ATAC17-8_hg19",
    "CLL_ATAC-seq_4621_1-5-36904_ATAC16-2_hg19",
    "CLL_ATAC-seq_5147_1-5-48105_ATAC17-2_hg19",
];

/// Cell line and assay a sample must match to be annotated and analysed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CohortConfig {
    pub cell_line: String,
    pub technique: String,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            cell_line: "CLL".to_string(),
            technique: "ATAC-seq".to_string(),
        }
    }
}

/// Analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Root of per-sample input data
    pub data_dir: PathBuf,
    /// Root of analysis outputs
    pub results_dir: PathBuf,
    /// Clinical annotation CSV
    pub clinical_annotation: PathBuf,
    /// Sequencing sample sheet CSV
    pub sample_sheet: PathBuf,
    /// Footprint network directory, relative to `data_dir`
    pub footprints_dir: PathBuf,
    /// Appended to the sample name to form the network file name
    pub network_suffix: String,
    /// Node-link JSON of the averaged master graph
    pub master_graph_output: PathBuf,
    /// Optional CSV dump of the per-sample description table
    pub description_output: Option<PathBuf>,
    pub cohort: CohortConfig,
    /// Sample names dropped before any graph work
    pub exclude: Vec<String>,
    pub count_policy: CountPolicy,
    /// Load and describe samples on the rayon pool
    pub parallel_describe: bool,
    pub centrality: CentralityConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            results_dir: PathBuf::from("results"),
            clinical_annotation: PathBuf::from("metadata/clinical_annotation.csv"),
            sample_sheet: PathBuf::from("metadata/sequencing_sample_annotation.csv"),
            footprints_dir: PathBuf::from("footprints"),
            network_suffix: ".piq.TF-TF_interactions.tsv".to_string(),
            master_graph_output: PathBuf::from("results/master_graph.json"),
            description_output: None,
            cohort: CohortConfig::default(),
            exclude: DEFAULT_EXCLUDED_SAMPLES.iter().map(|s| s.to_string()).collect(),
            count_policy: CountPolicy::default(),
            parallel_describe: false,
            centrality: CentralityConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> AnalysisResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        Self::from_yaml_str(&text)
    }

    /// Path of the footprint network for a sample
    pub fn network_path(&self, sample_name: &str) -> PathBuf {
        self.data_dir
            .join(&self.footprints_dir)
            .join(format!("{}{}", sample_name, self.network_suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = AnalysisConfig::default();
        assert_eq!(
            config.network_path("CLL_ATAC-seq_1_2_x"),
            PathBuf::from("data/footprints/CLL_ATAC-seq_1_2_x.piq.TF-TF_interactions.tsv")
        );
        assert_eq!(config.exclude.len(), 7);
        assert_eq!(config.count_policy, CountPolicy::Legacy);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
data_dir: /tmp/in
cohort:
  technique: ChIPmentation
exclude: []
count_policy: symmetric
centrality:
  eigenvector_max_iter: 500
  eigenvector_tolerance: 1.0e-6
  katz_alpha: 0.05
  katz_beta: 1.0
"#;
        let config = AnalysisConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/in"));
        assert_eq!(config.cohort.cell_line, "CLL");
        assert_eq!(config.cohort.technique, "ChIPmentation");
        assert!(config.exclude.is_empty());
        assert_eq!(config.count_policy, CountPolicy::Symmetric);
        assert_eq!(config.centrality.eigenvector_max_iter, 500);
        assert_eq!(config.network_suffix, ".piq.TF-TF_interactions.tsv");
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            AnalysisConfig::from_yaml_str("data_dir: [unclosed"),
            Err(AnalysisError::Config(_))
        ));
    }
}
