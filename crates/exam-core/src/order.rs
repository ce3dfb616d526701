//! Reordering primitive for field lists

use crate::{ChartError, ChartResult, FieldId, Selection};
use serde::{Deserialize, Serialize};

/// Remove the element at `from` and reinsert it at `to`.
///
/// A negative `to` counts from the end of the sequence *after* removal
/// (`len - 1 + to`). The insert position is clamped into range.
/// This is not an inverse of itself: only a move back to the original
/// index restores the input.
pub fn move_element<T: Clone>(sequence: &[T], from: usize, to: isize) -> ChartResult<Vec<T>> {
    if from >= sequence.len() {
        return Err(ChartError::IndexOutOfRange {
            index: from,
            len: sequence.len(),
        });
    }

    let mut moved = sequence.to_vec();
    let item = moved.remove(from);
    let shortened = moved.len() as isize;
    let target = if to < 0 { shortened + to } else { to };
    moved.insert(target.clamp(0, shortened) as usize, item);

    Ok(moved)
}

/// The catalog ordering and the selection ordering, reordered in lockstep
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldOrder {
    pub catalog: Vec<FieldId>,
    pub selection: Selection,
}

impl FieldOrder {
    pub fn new(catalog: Vec<FieldId>, selection: Selection) -> Self {
        Self { catalog, selection }
    }

    /// Apply the same `(from, to)` move to both sequences.
    ///
    /// Both sequences are checked before either is touched.
    pub fn reorder(&mut self, from: usize, to: isize) -> ChartResult<()> {
        let catalog = move_element(&self.catalog, from, to)?;
        let selection = move_element(self.selection.as_slice(), from, to)?;

        self.catalog = catalog;
        self.selection = Selection::from_ids(selection);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: [char; 5] = ['a', 'b', 'c', 'd', 'e'];

    #[test]
    fn test_move_forward_and_back() {
        let moved = move_element(&P, 0, 3).unwrap();
        assert_eq!(moved, vec!['b', 'c', 'd', 'a', 'e']);

        let restored = move_element(&moved, 3, 0).unwrap();
        assert_eq!(restored, P.to_vec());
    }

    #[test]
    fn test_move_is_not_generally_self_inverse() {
        let moved = move_element(&P, 0, 3).unwrap();
        let other = move_element(&moved, 3, 1).unwrap();
        assert_eq!(other, vec!['b', 'a', 'c', 'd', 'e']);
        assert_ne!(other, P.to_vec());
    }

    #[test]
    fn test_negative_target_counts_from_shortened_end() {
        // after removing 'a': [b, c, d, e], len 4; -1 -> index 3
        assert_eq!(move_element(&P, 0, -1).unwrap(), vec!['b', 'c', 'd', 'a', 'e']);
        assert_eq!(move_element(&P, 4, -4).unwrap(), vec!['e', 'a', 'b', 'c', 'd']);
    }

    #[test]
    fn test_target_is_clamped() {
        assert_eq!(move_element(&P, 1, 99).unwrap(), vec!['a', 'c', 'd', 'e', 'b']);
        assert_eq!(move_element(&P, 3, -99).unwrap(), vec!['d', 'a', 'b', 'c', 'e']);
    }

    #[test]
    fn test_from_out_of_range() {
        assert_eq!(
            move_element(&P, 5, 0),
            Err(ChartError::IndexOutOfRange { index: 5, len: 5 })
        );
        assert!(move_element::<char>(&[], 0, 0).is_err());
    }

    #[test]
    fn test_lockstep_reorder() {
        let mut order = FieldOrder::new(
            ["A", "B", "C", "D"].into_iter().map(FieldId::from).collect(),
            Selection::from_ids(["C", "A", "D"]),
        );

        order.reorder(0, 2).unwrap();
        assert_eq!(order.selection.join(","), "A,D,C");
        let catalog: Vec<_> = order.catalog.iter().map(FieldId::as_str).collect();
        assert_eq!(catalog, vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn test_lockstep_reorder_is_atomic() {
        let mut order = FieldOrder::new(
            ["A", "B", "C", "D"].into_iter().map(FieldId::from).collect(),
            Selection::from_ids(["C", "A"]),
        );
        let before = order.clone();

        assert!(order.reorder(3, 0).is_err());
        assert_eq!(order, before);
    }
}
