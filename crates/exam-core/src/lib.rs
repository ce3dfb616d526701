//! # exam-core
//!
//! Core domain types for the clinical exam charts.
//! Raw exam records go in, axis-assigned render-ready datasets come out.
//! Implements Strategy pattern for axis tick formatting.

pub mod dataset;
pub mod error;
pub mod exam;
pub mod field;
pub mod mode;
pub mod order;
pub mod query;
pub mod selection;
pub mod series;

pub use dataset::*;
pub use error::*;
pub use exam::*;
pub use field::*;
pub use mode::*;
pub use order::*;
pub use query::*;
pub use selection::*;
pub use series::*;

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// STRATEGY PATTERN: Tick Formatters
// ============================================================================

/// Strategy trait for y-axis tick labels
pub trait TickFormatter: Send + Sync {
    fn format(&self, value: f64) -> String;
}

/// Fixed-decimals value followed by the field's measurement unit, e.g. `5.0mg/dL`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSuffixFormatter {
    pub unit: String,
    pub decimals: usize,
}

impl UnitSuffixFormatter {
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            decimals: 1,
        }
    }
}

impl TickFormatter for UnitSuffixFormatter {
    fn format(&self, value: f64) -> String {
        format!("{:.prec$}{}", value, self.unit, prec = self.decimals)
    }
}

// ============================================================================
// CORE VALUE TYPES
// ============================================================================

/// Identifiers arrive as JSON strings or numbers depending on the backing table
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// Identifier of a measurable clinical field (e.g. "HGB")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FieldId(pub String);

impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        text_or_number(deserializer).map(Self)
    }
}

impl FieldId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FieldId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Opaque patient identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PatientId(pub String);

impl<'de> Deserialize<'de> for PatientId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        text_or_number(deserializer).map(Self)
    }
}

impl PatientId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PatientId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ============================================================================
// COLOR CONSTANTS
// ============================================================================

pub mod colors {
    /// Series palette. Order is part of the contract: recorded fixtures depend on it.
    pub const PALETTE: [&str; 10] = [
        "#000000", "#FF0000", "#0000FF", "#00FF00", "#FFA500",
        "#800080", "#FFFF00", "#00FFFF", "#FFC0CB", "#A52A2A",
    ];

    pub const BG_PANEL: &str = "#ffffff";
    pub const BORDER: &str = "#d0d0d0";
    pub const GRID: &str = "#eeeeee";
    pub const TEXT_PRIMARY: &str = "#212529";
    pub const TEXT_MUTED: &str = "#6c757d";

    /// Color for the series at `index`; wraps after ten series
    pub fn palette_color(index: usize) -> &'static str {
        PALETTE[index % PALETTE.len()]
    }
}
