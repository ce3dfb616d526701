//! Field metadata and the catalog that owns it

use crate::FieldId;
use serde::{Deserialize, Serialize};

/// Inclusive reference interval for a field's values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptableRange {
    pub min: f64,
    pub max: f64,
}

impl AcceptableRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A measurable clinical attribute, immutable once fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub field_id: FieldId,
    /// Display label
    #[serde(default, alias = "description_gr")]
    pub description: String,
    #[serde(default)]
    pub measurement_unit: String,
    #[serde(default)]
    pub acceptable_range: Option<AcceptableRange>,
}

impl Field {
    pub fn new(field_id: impl Into<FieldId>, description: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            description: description.into(),
            measurement_unit: unit.into(),
            acceptable_range: None,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.acceptable_range = Some(AcceptableRange { min, max });
        self
    }

    /// Label shown in legends and pickers; falls back to the id when the description is blank
    pub fn label(&self) -> &str {
        if self.description.trim().is_empty() {
            self.field_id.as_str()
        } else {
            &self.description
        }
    }
}

/// All known fields, in the user's current display order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldCatalog {
    fields: Vec<Field>,
}

impl FieldCatalog {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field_id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| &f.field_id == field_id)
    }

    pub fn contains(&self, field_id: &FieldId) -> bool {
        self.get(field_id).is_some()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Field ids in catalog order
    pub fn ids(&self) -> Vec<FieldId> {
        self.fields.iter().map(|f| f.field_id.clone()).collect()
    }

    /// Fields in the given id order; ids without metadata are skipped
    pub fn ordered_by(&self, order: &[FieldId]) -> Vec<&Field> {
        order.iter().filter_map(|id| self.get(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Vec<Field>> for FieldCatalog {
    fn from(fields: Vec<Field>) -> Self {
        Self::new(fields)
    }
}
