//! Ordered, duplicate-free field selection

use crate::FieldId;
use serde::{Deserialize, Serialize};

/// Fields chosen for charting. Order defines legend, color and axis order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<FieldId>", into = "Vec<FieldId>")]
pub struct Selection(Vec<FieldId>);

impl Selection {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build from ids, keeping the first occurrence of each
    pub fn from_ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<FieldId>,
    {
        let mut selection = Self::new();
        for id in ids {
            selection.push(id.into());
        }
        selection
    }

    /// Append a field; returns false if it was already selected
    pub fn push(&mut self, field_id: FieldId) -> bool {
        if self.contains(&field_id) {
            return false;
        }
        self.0.push(field_id);
        true
    }

    pub fn remove(&mut self, field_id: &FieldId) -> bool {
        let before = self.0.len();
        self.0.retain(|id| id != field_id);
        before != self.0.len()
    }

    /// Select if absent, deselect if present
    pub fn toggle(&mut self, field_id: FieldId) {
        if !self.remove(&field_id) {
            self.0.push(field_id);
        }
    }

    pub fn contains(&self, field_id: &FieldId) -> bool {
        self.0.contains(field_id)
    }

    pub fn position(&self, field_id: &FieldId) -> Option<usize> {
        self.0.iter().position(|id| id == field_id)
    }

    pub fn as_slice(&self) -> &[FieldId] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-separated ids, as the Data Service expects them
    pub fn join(&self, sep: &str) -> String {
        self.0.iter().map(FieldId::as_str).collect::<Vec<_>>().join(sep)
    }
}

impl From<Vec<FieldId>> for Selection {
    fn from(ids: Vec<FieldId>) -> Self {
        Self::from_ids(ids)
    }
}

impl From<Selection> for Vec<FieldId> {
    fn from(selection: Selection) -> Self {
        selection.0
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a FieldId;
    type IntoIter = std::slice::Iter<'a, FieldId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
