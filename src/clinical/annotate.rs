//! Clinical annotation of samples
//!
//! Derives IGVH mutation status, gender, mutation list and the treatment
//! timeline for cohort samples. Every field is tri-state: `None` means unknown
//! or not applicable. Each sample starts from a fresh [`SampleAnnotation`].

use super::date::ClinicalDate;
use super::record::{ClinicalRecord, ClinicalTable, TreatmentTimepoint};
use crate::config::CohortConfig;
use crate::error::AnalysisResult;
use crate::sample::Sample;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Collection within this many days of diagnosis counts as "at diagnosis"
pub const DIAGNOSIS_WINDOW_DAYS: i64 = 30;

/// Patient gender as recorded in the clinical sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Female => write!(f, "F"),
            Gender::Male => write!(f, "M"),
        }
    }
}

/// Treatment history of a sample relative to its collection date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreatmentTimeline {
    pub collection_date: ClinicalDate,
    pub diagnosis_date: ClinicalDate,
    pub diagnosis_disease: Option<String>,
    /// Collection minus diagnosis, in days
    pub time_since_diagnosis: Option<i64>,
    /// Collected at diagnosis, before any treatment
    pub diagnosis_collection: Option<bool>,
    pub treatment_active: Option<bool>,
    pub previous_treatment_date: ClinicalDate,
    /// Collection minus the closest earlier treatment, in days
    pub time_since_treatment: Option<i64>,
    pub treatment_type: Option<String>,
    pub treatment_response: Option<String>,
    pub previous_response: Option<String>,
    pub relapse: Option<bool>,
}

/// Everything the clinical sheet contributes to one sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleAnnotation {
    /// IGVH mutated (code 1) / unmutated (code 2)
    pub mutated: Option<bool>,
    pub gender: Option<Gender>,
    pub mutations: Option<String>,
    pub timeline: TreatmentTimeline,
}

/// IGVH code 1 is mutated, 2 unmutated, anything else unknown
pub fn igvh_status(record: &ClinicalRecord) -> Option<bool> {
    match record.igvh_code() {
        Some(code) if code == 1.0 => Some(true),
        Some(code) if code == 2.0 => Some(false),
        _ => None,
    }
}

pub fn gender(record: &ClinicalRecord) -> Option<Gender> {
    match record.patient_gender.as_deref() {
        Some("F") => Some(Gender::Female),
        Some("M") => Some(Gender::Male),
        Some(other) => {
            warn!("Unrecognised gender '{}' for {}", other, record.sample_id);
            None
        }
        None => None,
    }
}

/// Earlier timepoint nearest to the collection date; the first slot wins ties
fn closest_earlier<'a>(
    earlier: &[&'a TreatmentTimepoint],
    collection: &ClinicalDate,
) -> Option<&'a TreatmentTimepoint> {
    let mut best: Option<(&TreatmentTimepoint, i64)> = None;
    for &tp in earlier {
        let Some(gap) = collection.since(&tp.date) else {
            continue;
        };
        let gap = gap.num_days().abs();
        if best.map_or(true, |(_, b)| gap < b) {
            best = Some((tp, gap));
        }
    }
    best.map(|(tp, _)| tp)
}

/// Build the treatment timeline for one clinical record.
///
/// Earlier timepoints are scanned in slot order and each one may overwrite the
/// active flag set by a previous slot; the last assignment stands.
pub fn treatment_timeline(record: &ClinicalRecord) -> TreatmentTimeline {
    let mut timeline = TreatmentTimeline::default();

    let collection = record.collection_date();
    let diagnosis = record.diagnosis_date();
    timeline.collection_date = collection;
    timeline.diagnosis_date = diagnosis;
    timeline.diagnosis_disease = record.diagnosis_disease.clone();
    let since_diagnosis = collection.since(&diagnosis);
    timeline.time_since_diagnosis = since_diagnosis.map(|d| d.num_days());

    let timepoints = record.timepoints();
    let end = record.treatment_end_date();
    let earlier: Vec<&TreatmentTimepoint> = timepoints
        .iter()
        .filter(|tp| tp.date.is_before(&collection))
        .collect();

    let mut active = None;
    let mut diagnosis_collection = None;
    for tp in &earlier {
        diagnosis_collection = Some(false);
        if end.is_missing() {
            active = Some(true);
        } else if tp.date.is_before(&end) && end.is_before(&collection) {
            active = Some(false);
        } else if tp.date.is_before(&collection) && collection.is_before(&end) {
            active = Some(true);
        }
    }

    if active.is_none() {
        active = Some(false);
        if let Some(gap) = since_diagnosis {
            if gap.num_days().abs() < DIAGNOSIS_WINDOW_DAYS {
                diagnosis_collection = Some(true);
            }
        }
    }
    timeline.treatment_active = active;
    timeline.diagnosis_collection = Some(diagnosis_collection.unwrap_or(false));

    let closest = closest_earlier(&earlier, &collection);

    if active == Some(true) {
        if let Some(tp) = closest {
            timeline.previous_treatment_date = tp.date;
            timeline.time_since_treatment = collection.since(&tp.date).map(|d| d.num_days());
            timeline.treatment_type = tp.regimen.clone();
            timeline.treatment_response = tp.response.clone();
        }
    }

    timeline.relapse = Some(match closest {
        Some(tp) => {
            timeline.previous_response = tp.response.clone();
            // A good prior response is coded as no relapse.
            !tp.had_good_response()
        }
        None => false,
    });

    timeline
}

/// Annotates samples from a clinical table
pub struct ClinicalAnnotator<'a> {
    clinical: &'a ClinicalTable,
    cohort: &'a CohortConfig,
}

impl<'a> ClinicalAnnotator<'a> {
    pub fn new(clinical: &'a ClinicalTable, cohort: &'a CohortConfig) -> Self {
        Self { clinical, cohort }
    }

    /// Annotation for one sample.
    ///
    /// Samples outside the cohort get an all-unknown annotation without touching
    /// the clinical table. Cohort samples must have exactly one clinical record.
    pub fn annotation_for(&self, sample: &Sample) -> AnalysisResult<SampleAnnotation> {
        if !sample.in_cohort(self.cohort) {
            return Ok(SampleAnnotation::default());
        }

        let sample_id = sample.sample_id()?;
        let record = self.clinical.get(sample_id)?;
        debug!("Annotating {} from clinical record {}", sample.name, sample_id);

        Ok(SampleAnnotation {
            mutated: igvh_status(record),
            gender: gender(record),
            mutations: record.mutations.clone(),
            timeline: treatment_timeline(record),
        })
    }

    /// Annotate every sample in place; the first failure aborts
    pub fn annotate(&self, samples: &mut [Sample]) -> AnalysisResult<()> {
        let mut annotated = 0;
        for sample in samples.iter_mut() {
            sample.annotation = self.annotation_for(sample)?;
            if sample.in_cohort(self.cohort) {
                annotated += 1;
            }
        }
        info!("Annotated {} of {} samples with clinical data", annotated, samples.len());
        Ok(())
    }
}
