//! Error types shared across the charting pipeline

use crate::FieldId;
use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    /// A selected field has no metadata in the catalog
    #[error("field `{field_id}` is selected but missing from the field catalog")]
    UnknownField { field_id: FieldId },

    #[error("index {index} is out of range for a sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid exam date: {raw:?}")]
    InvalidExamDate { raw: String },

    #[error("malformed exam record at position {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    /// The surface container could not be emptied; no new surfaces were created
    #[error("surface teardown failed: {0}")]
    Teardown(String),

    #[error("surface error: {0}")]
    Surface(String),
}
