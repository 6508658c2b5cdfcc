//! Sequencing samples and the sample manifest
//!
//! Sample names are structured as
//! `<cell line>_<technique>_<patient id>_<sample id>_<cohort tag...>`, e.g.
//! `CLL_ATAC-seq_4851_1-5-45960_ATAC29-6_hg19`.

use crate::clinical::SampleAnnotation;
use crate::config::CohortConfig;
use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// One biological specimen from the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub name: String,
    pub cell_line: String,
    pub technique: String,
    /// Clinical annotation, all-unknown until annotated
    #[serde(default, skip_deserializing)]
    pub annotation: SampleAnnotation,
}

/// Row of the sequencing sample sheet
#[derive(Debug, Deserialize)]
struct ManifestRow {
    #[serde(alias = "sampleName")]
    sample_name: String,
    #[serde(alias = "cellLine", default)]
    cell_line: Option<String>,
    #[serde(default)]
    technique: Option<String>,
}

impl Sample {
    pub fn new(
        name: impl Into<String>,
        cell_line: impl Into<String>,
        technique: impl Into<String>,
    ) -> Self {
        Sample {
            name: name.into(),
            cell_line: cell_line.into(),
            technique: technique.into(),
            annotation: SampleAnnotation::default(),
        }
    }

    fn name_fields(&self) -> AnalysisResult<Vec<&str>> {
        let fields: Vec<&str> = self.name.split('_').collect();
        if fields.len() < 4 {
            return Err(AnalysisError::InvalidSampleName(self.name.clone()));
        }
        Ok(fields)
    }

    /// Patient identifier (third name field)
    pub fn patient_id(&self) -> AnalysisResult<&str> {
        Ok(self.name_fields()?[2])
    }

    /// Sample identifier (fourth name field), the clinical table key
    pub fn sample_id(&self) -> AnalysisResult<&str> {
        Ok(self.name_fields()?[3])
    }

    /// `<cell line>_<patient>_<sample>`
    pub fn repr(&self) -> AnalysisResult<String> {
        let fields = self.name_fields()?;
        Ok(format!("{}_{}_{}", fields[0], fields[2], fields[3]))
    }

    /// Whether the sample belongs to the annotated cohort and assay
    pub fn in_cohort(&self, cohort: &CohortConfig) -> bool {
        self.cell_line == cohort.cell_line && self.technique == cohort.technique
    }
}

/// Load the sequencing sample sheet.
///
/// Requires a `sample_name` (or `sampleName`) column; `cell_line`/`cellLine` and
/// `technique` default to empty strings when absent. Other columns are ignored.
pub fn load_manifest(path: impl AsRef<Path>) -> AnalysisResult<Vec<Sample>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| AnalysisError::csv(path, e))?;

    let samples = reader
        .deserialize::<ManifestRow>()
        .map(|row| {
            let row = row.map_err(|e| AnalysisError::csv(path, e))?;
            Ok(Sample::new(
                row.sample_name,
                row.cell_line.unwrap_or_default(),
                row.technique.unwrap_or_default(),
            ))
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    info!("Loaded {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Keep cohort samples whose names are not excluded, preserving manifest order
pub fn select_for_analysis(
    samples: &[Sample],
    cohort: &CohortConfig,
    exclude: &[String],
) -> Vec<Sample> {
    let excluded: HashSet<&str> = exclude.iter().map(String::as_str).collect();
    samples
        .iter()
        .filter(|s| {
            if !s.in_cohort(cohort) {
                return false;
            }
            if excluded.contains(s.name.as_str()) {
                warn!("Excluding {} (QC exclusion list)", s.name);
                return false;
            }
            true
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const NAME: &str = "CLL_ATAC-seq_4851_1-5-45960_ATAC29-6_hg19";

    #[test]
    fn test_name_helpers() {
        let sample = Sample::new(NAME, "CLL", "ATAC-seq");
        assert_eq!(sample.patient_id().unwrap(), "4851");
        assert_eq!(sample.sample_id().unwrap(), "1-5-45960");
        assert_eq!(sample.repr().unwrap(), "CLL_4851_1-5-45960");
    }

    #[test]
    fn test_short_name_is_rejected() {
        let sample = Sample::new("CLL_ATAC-seq_4851", "CLL", "ATAC-seq");
        assert!(matches!(
            sample.sample_id(),
            Err(AnalysisError::InvalidSampleName(_))
        ));
    }

    #[test]
    fn test_select_for_analysis() {
        let cohort = CohortConfig::default();
        let samples = vec![
            Sample::new("CLL_ATAC-seq_1_a_x", "CLL", "ATAC-seq"),
            Sample::new("CLL_RNA-seq_1_a_x", "CLL", "RNA-seq"),
            Sample::new("GM_ATAC-seq_2_b_x", "GM12878", "ATAC-seq"),
            Sample::new("CLL_ATAC-seq_3_c_x", "CLL", "ATAC-seq"),
        ];
        let exclude = vec!["CLL_ATAC-seq_3_c_x".to_string()];

        let selected = select_for_analysis(&samples, &cohort, &exclude);
        let names: Vec<_> = selected.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["CLL_ATAC-seq_1_a_x"]);
    }

    #[test]
    fn test_load_manifest_accepts_camel_case_headers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sampleName,cellLine,technique,genome").unwrap();
        writeln!(file, "{},CLL,ATAC-seq,hg19", NAME).unwrap();
        writeln!(file, "other_sample_1_2,, ,hg19").unwrap();

        let samples = load_manifest(file.path()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].cell_line, "CLL");
        assert_eq!(samples[0].technique, "ATAC-seq");
        assert_eq!(samples[1].cell_line, "");
        assert_eq!(samples[1].annotation, SampleAnnotation::default());
    }
}
