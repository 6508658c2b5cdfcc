//! Clinical date parsing
//!
//! The clinical sheet mixes full dates, month/year and year-only entries. All of
//! them parse to a day (the first of the month or year for partial dates); any
//! other text is [`ClinicalDate::Missing`], which compares as "not earlier" and
//! subtracts to `None`.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed clinical date or the missing sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClinicalDate {
    Date(NaiveDate),
    #[default]
    Missing,
}

impl ClinicalDate {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ClinicalDate::Date(d) => Some(*d),
            ClinicalDate::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ClinicalDate::Missing)
    }

    /// Strictly earlier; false when either side is missing
    pub fn is_before(&self, other: &ClinicalDate) -> bool {
        match (self.date(), other.date()) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }

    /// `self - earlier`, `None` when either side is missing
    pub fn since(&self, earlier: &ClinicalDate) -> Option<Duration> {
        Some(self.date()? - earlier.date()?)
    }
}

impl From<NaiveDate> for ClinicalDate {
    fn from(d: NaiveDate) -> Self {
        ClinicalDate::Date(d)
    }
}

impl fmt::Display for ClinicalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClinicalDate::Date(d) => write!(f, "{}", d),
            ClinicalDate::Missing => write!(f, "NA"),
        }
    }
}

/// Field of exactly `width` ASCII digits
fn fixed_digits(field: &str, width: usize) -> Option<u32> {
    if field.len() == width && field.bytes().all(|b| b.is_ascii_digit()) {
        field.parse().ok()
    } else {
        None
    }
}

/// Parse `DD/MM/YYYY`, `MM/YYYY` or `YYYY`.
///
/// Every field must be exactly its width in ASCII digits; signs, padding and
/// whitespace make the value missing. Cells are trimmed by the CSV reader.
pub fn parse_date(value: Option<&str>) -> ClinicalDate {
    let Some(text) = value else {
        return ClinicalDate::Missing;
    };

    let fields: Vec<&str> = text.split('/').collect();
    let (day, month, year) = match fields.as_slice() {
        [day, month, year] => (fixed_digits(day, 2), fixed_digits(month, 2), fixed_digits(year, 4)),
        [month, year] => (Some(1), fixed_digits(month, 2), fixed_digits(year, 4)),
        [year] => (Some(1), Some(1), fixed_digits(year, 4)),
        _ => return ClinicalDate::Missing,
    };

    let parsed = match (day, month, year) {
        (Some(d), Some(m), Some(y)) => NaiveDate::from_ymd_opt(y as i32, m, d),
        _ => None,
    };
    parsed.map_or(ClinicalDate::Missing, ClinicalDate::Date)
}
