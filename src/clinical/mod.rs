//! Clinical annotation
//!
//! - `date`: heterogeneous clinical date strings
//! - `record`: the clinical sheet, indexed by sample id
//! - `annotate`: IGVH, gender, mutations and treatment timeline per sample

pub mod annotate;
pub mod date;
pub mod record;

pub use annotate::{
    gender, igvh_status, treatment_timeline, ClinicalAnnotator, Gender, SampleAnnotation,
    TreatmentTimeline, DIAGNOSIS_WINDOW_DAYS,
};
pub use date::{parse_date, ClinicalDate};
pub use record::{ClinicalRecord, ClinicalTable, TreatmentTimepoint, TIMEPOINT_SLOTS};
