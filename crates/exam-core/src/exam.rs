//! Raw exam measurements and their wire decoding

use crate::{ChartError, ChartResult, FieldId, PatientId};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One raw measurement, read-only to the charting pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamRecord {
    pub patient_id: PatientId,
    /// Exam date normalized to an instant (UTC)
    pub exam_date: DateTime<Utc>,
    pub field_id: FieldId,
    pub value: f64,
}

impl ExamRecord {
    pub fn new(
        patient_id: impl Into<PatientId>,
        exam_date: DateTime<Utc>,
        field_id: impl Into<FieldId>,
        value: f64,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            exam_date,
            field_id: field_id.into(),
            value,
        }
    }

    /// Convenience constructor from an ISO date string
    pub fn on(
        patient_id: impl Into<PatientId>,
        exam_date: &str,
        field_id: impl Into<FieldId>,
        value: f64,
    ) -> ChartResult<Self> {
        Ok(Self::new(patient_id, parse_exam_date(exam_date)?, field_id, value))
    }
}

/// Normalize an ISO date or date-time string to a UTC instant.
///
/// Accepts RFC 3339 instants, naive date-times (read as UTC) and plain
/// `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_exam_date(raw: &str) -> ChartResult<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ChartError::InvalidExamDate {
            raw: raw.to_string(),
        })
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[derive(Debug, Deserialize)]
struct ExamRowKey {
    exam_date: String,
    #[serde(default)]
    patient_id: Option<PatientId>,
}

#[derive(Debug, Deserialize)]
struct ExamRowField {
    field_id: FieldId,
}

/// `{ id: { exam_date, .. }, field: { field_id, .. }, val }`
#[derive(Debug, Deserialize)]
struct ExamRow {
    id: ExamRowKey,
    field: ExamRowField,
    val: f64,
}

/// A decoded exam response.
///
/// `NoData` (the body was not an array) charts nothing at all, while an
/// empty `Rows` still yields one empty series per selected field.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ExamRows {
    #[default]
    NoData,
    Rows(Vec<ExamRecord>),
}

impl ExamRows {
    pub fn records(&self) -> &[ExamRecord] {
        match self {
            Self::NoData => &[],
            Self::Rows(records) => records,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

impl From<Vec<ExamRecord>> for ExamRows {
    fn from(records: Vec<ExamRecord>) -> Self {
        Self::Rows(records)
    }
}

/// Decode a Data Service response body into exam records.
///
/// Rows without an explicit patient id are attributed to `fallback_patient`.
pub fn decode_exam_rows(body: Value, fallback_patient: &PatientId) -> ChartResult<ExamRows> {
    let Value::Array(rows) = body else {
        tracing::debug!("Exam response is not an array, nothing to chart");
        return Ok(ExamRows::NoData);
    };

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            let row: ExamRow = serde_json::from_value(row).map_err(|e| ChartError::MalformedRecord {
                index,
                reason: e.to_string(),
            })?;

            Ok(ExamRecord {
                patient_id: row.id.patient_id.unwrap_or_else(|| fallback_patient.clone()),
                exam_date: parse_exam_date(&row.id.exam_date)?,
                field_id: row.field.field_id,
                value: row.val,
            })
        })
        .collect::<ChartResult<Vec<_>>>()
        .map(ExamRows::Rows)
}
