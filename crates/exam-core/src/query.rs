//! Data Service query parameters and the fetch guard

use crate::{PatientId, Selection};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire format of the `start_date` / `end_date` parameters
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive date range picked by the user; either end may still be unset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Both ends present and ordered
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.bounds().is_some()
    }
}

/// A fully-validated request for a patient's exam records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamQuery {
    pub patient_id: PatientId,
    pub selection: Selection,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ExamQuery {
    /// Guard: returns `None` when any filter is absent or the range is inverted.
    /// No request may be issued in that case.
    pub fn build(patient: Option<&PatientId>, selection: &Selection, range: DateRange) -> Option<Self> {
        let patient_id = patient?.clone();
        if selection.is_empty() {
            return None;
        }
        let (start_date, end_date) = range.bounds()?;

        Some(Self {
            patient_id,
            selection: selection.clone(),
            start_date,
            end_date,
        })
    }

    /// Query string pairs in the order the Data Service documents them
    pub fn params(&self) -> [(&'static str, String); 4] {
        [
            ("patient_id", self.patient_id.to_string()),
            ("field_ids", self.selection.join(",")),
            ("start_date", self.start_date.format(QUERY_DATE_FORMAT).to_string()),
            ("end_date", self.end_date.format(QUERY_DATE_FORMAT).to_string()),
        ]
    }
}
