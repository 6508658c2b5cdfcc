//! Clinical annotation table
//!
//! One row per sequenced sample, keyed by `sample_id`. The table is indexed once
//! on load; a repeated id is rejected so lookups yield exactly zero or one record.

use super::date::{parse_date, ClinicalDate};
use crate::error::{AnalysisError, AnalysisResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Number of treatment timepoints recorded per sample
pub const TIMEPOINT_SLOTS: usize = 4;

/// One row of the clinical sheet. Empty cells deserialize as `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClinicalRecord {
    pub sample_id: String,
    pub diagnosis_date: Option<String>,
    pub diagnosis_disease: Option<String>,
    pub sample_collection_date: Option<String>,
    pub patient_gender: Option<String>,
    pub igvh_mutation_status: Option<String>,
    pub mutations: Option<String>,
    pub treatment_1_date: Option<String>,
    pub treatment_1_regimen: Option<String>,
    pub treatment_1_response: Option<String>,
    pub treatment_2_date: Option<String>,
    pub treatment_2_regimen: Option<String>,
    pub treatment_2_response: Option<String>,
    pub treatment_3_date: Option<String>,
    pub treatment_3_regimen: Option<String>,
    pub treatment_3_response: Option<String>,
    pub treatment_4_date: Option<String>,
    pub treatment_4_regimen: Option<String>,
    pub treatment_4_response: Option<String>,
    pub treatment_end_date: Option<String>,
}

/// A treatment event: slot number (1-based), date, regimen, response code
#[derive(Debug, Clone, PartialEq)]
pub struct TreatmentTimepoint {
    pub slot: usize,
    pub date: ClinicalDate,
    pub regimen: Option<String>,
    pub response: Option<String>,
}

impl TreatmentTimepoint {
    /// `CR` (complete) or `GR` (good) response
    pub fn had_good_response(&self) -> bool {
        matches!(self.response.as_deref(), Some("CR") | Some("GR"))
    }
}

impl ClinicalRecord {
    pub fn collection_date(&self) -> ClinicalDate {
        parse_date(self.sample_collection_date.as_deref())
    }

    pub fn diagnosis_date(&self) -> ClinicalDate {
        parse_date(self.diagnosis_date.as_deref())
    }

    pub fn treatment_end_date(&self) -> ClinicalDate {
        parse_date(self.treatment_end_date.as_deref())
    }

    /// The four timepoints in slot order
    pub fn timepoints(&self) -> [TreatmentTimepoint; TIMEPOINT_SLOTS] {
        let slot = |n: usize, date: &Option<String>, regimen: &Option<String>, response: &Option<String>| {
            TreatmentTimepoint {
                slot: n,
                date: parse_date(date.as_deref()),
                regimen: regimen.clone(),
                response: response.clone(),
            }
        };
        [
            slot(1, &self.treatment_1_date, &self.treatment_1_regimen, &self.treatment_1_response),
            slot(2, &self.treatment_2_date, &self.treatment_2_regimen, &self.treatment_2_response),
            slot(3, &self.treatment_3_date, &self.treatment_3_regimen, &self.treatment_3_response),
            slot(4, &self.treatment_4_date, &self.treatment_4_regimen, &self.treatment_4_response),
        ]
    }

    /// IGVH code as a number, so `1` and `1.0` agree
    pub fn igvh_code(&self) -> Option<f64> {
        self.igvh_mutation_status
            .as_deref()
            .and_then(|s| s.trim().parse::<f64>().ok())
    }
}

/// Clinical records indexed by sample id
#[derive(Debug, Clone, Default)]
pub struct ClinicalTable {
    records: HashMap<String, ClinicalRecord>,
}

impl ClinicalTable {
    /// Index records, failing on the first repeated sample id
    pub fn from_records(records: impl IntoIterator<Item = ClinicalRecord>) -> AnalysisResult<Self> {
        let mut index = HashMap::new();
        for record in records {
            if index.contains_key(&record.sample_id) {
                return Err(AnalysisError::DuplicateClinicalRecord(record.sample_id));
            }
            index.insert(record.sample_id.clone(), record);
        }
        Ok(ClinicalTable { records: index })
    }

    /// Read the clinical CSV
    pub fn load(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| AnalysisError::csv(path, e))?;

        let records = reader
            .deserialize::<ClinicalRecord>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AnalysisError::csv(path, e))?;

        let table = Self::from_records(records)?;
        info!("Loaded {} clinical records from {}", table.len(), path.display());
        Ok(table)
    }

    /// The single record for `sample_id`
    pub fn get(&self, sample_id: &str) -> AnalysisResult<&ClinicalRecord> {
        self.records
            .get(sample_id)
            .ok_or_else(|| AnalysisError::ClinicalRecordNotFound(sample_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
