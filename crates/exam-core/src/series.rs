//! Per-field time series extraction from raw exam records

use crate::{ChartError, ChartResult, ExamRecord, FieldCatalog, FieldId, Selection};
use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// One measurement on the x (time) / y (value) plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

/// One field's values in first-seen date order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub field_id: FieldId,
    pub label: String,
    pub unit: String,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Min and max value
    pub fn value_range(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }

        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for value in self.values() {
            min = min.min(value);
            max = max.max(value);
        }

        Some((min, max))
    }

    /// Earliest and latest timestamp in milliseconds
    pub fn time_range(&self) -> Option<(i64, i64)> {
        let mut stamps = self.points.iter().map(SeriesPoint::timestamp_millis);
        let first = stamps.next()?;
        Some(stamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }
}

/// Result of one extraction pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// One entry per selected field, in selection order
    pub series: Vec<Series>,
    /// Every distinct exam date across all records, in first-seen order
    pub timeline: Vec<DateTime<Utc>>,
}

impl Extraction {
    /// Earliest and latest timeline date in milliseconds
    pub fn timeline_range(&self) -> Option<(i64, i64)> {
        let mut stamps = self.timeline.iter().map(DateTime::timestamp_millis);
        let first = stamps.next()?;
        Some(stamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }
}

/// Turn raw records into one series per selected field.
///
/// Points keep the order in which each distinct date was first seen; they
/// are not sorted by calendar date. When a field has several records on the
/// same date the last one iterated wins, keeping the first one's position.
/// A selected field missing from `catalog` is a data-integrity error.
pub fn extract_series(
    records: &[ExamRecord],
    selection: &Selection,
    catalog: &FieldCatalog,
) -> ChartResult<Extraction> {
    if selection.is_empty() {
        return Ok(Extraction::default());
    }

    let timeline: IndexSet<DateTime<Utc>> = records.iter().map(|r| r.exam_date).collect();

    let series = selection
        .iter()
        .map(|field_id| {
            let field = catalog.get(field_id).ok_or_else(|| ChartError::UnknownField {
                field_id: field_id.clone(),
            })?;

            let mut by_date: IndexMap<DateTime<Utc>, f64> = IndexMap::new();
            for record in records.iter().filter(|r| &r.field_id == field_id) {
                // IndexMap::insert keeps the original slot for an existing key
                by_date.insert(record.exam_date, record.value);
            }

            Ok(Series {
                field_id: field_id.clone(),
                label: field.label().to_string(),
                unit: field.measurement_unit.clone(),
                points: by_date
                    .into_iter()
                    .map(|(timestamp, value)| SeriesPoint::new(timestamp, value))
                    .collect(),
            })
        })
        .collect::<ChartResult<Vec<_>>>()?;

    tracing::debug!(
        "Extracted {} series from {} records ({} distinct dates)",
        series.len(),
        records.len(),
        timeline.len()
    );

    Ok(Extraction {
        series,
        timeline: timeline.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Field, parse_exam_date};

    fn record(date: &str, field: &str, value: f64) -> ExamRecord {
        ExamRecord::on("p1", date, field, value).unwrap()
    }

    fn catalog() -> FieldCatalog {
        FieldCatalog::new(vec![
            Field::new("A", "Alpha", "mg"),
            Field::new("B", "Beta", "%"),
            Field::new("C", "Gamma", ""),
        ])
    }

    fn pairs(series: &Series) -> Vec<(String, f64)> {
        series
            .points
            .iter()
            .map(|p| (p.timestamp.format("%Y-%m-%d").to_string(), p.value))
            .collect()
    }

    #[test]
    fn test_one_series_per_selected_field_in_selection_order() {
        let records = vec![record("2024-01-01", "A", 1.0)];
        let selection = Selection::from_ids(["C", "A", "B"]);

        let extraction = extract_series(&records, &selection, &catalog()).unwrap();
        let ids: Vec<_> = extraction.series.iter().map(|s| s.field_id.as_str()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
        assert!(extraction.series[0].is_empty());
        assert_eq!(extraction.series[1].len(), 1);
    }

    #[test]
    fn test_last_write_wins_keeps_first_position() {
        let records = vec![
            record("2024-01-01", "A", 1.0),
            record("2024-01-02", "A", 2.0),
            record("2024-01-01", "A", 9.0),
        ];

        let extraction = extract_series(&records, &Selection::from_ids(["A"]), &catalog()).unwrap();
        assert_eq!(
            pairs(&extraction.series[0]),
            vec![("2024-01-01".into(), 9.0), ("2024-01-02".into(), 2.0)]
        );
    }

    #[test]
    fn test_points_follow_first_seen_order_not_calendar_order() {
        let records = vec![
            record("2024-03-01", "A", 3.0),
            record("2024-01-01", "A", 1.0),
            record("2024-02-01", "A", 2.0),
        ];

        let extraction = extract_series(&records, &Selection::from_ids(["A"]), &catalog()).unwrap();
        let values: Vec<_> = extraction.series[0].values().collect();
        assert_eq!(values, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_same_instant_in_different_spellings_collapses() {
        let records = vec![
            ExamRecord::on("p1", "2024-01-01", "A", 1.0).unwrap(),
            ExamRecord::on("p1", "2024-01-01T00:00:00Z", "A", 4.0).unwrap(),
        ];

        let extraction = extract_series(&records, &Selection::from_ids(["A"]), &catalog()).unwrap();
        assert_eq!(extraction.series[0].len(), 1);
        assert_eq!(extraction.series[0].points[0].value, 4.0);
    }

    #[test]
    fn test_timeline_spans_all_records_regardless_of_selection() {
        let records = vec![
            record("2024-01-05", "A", 1.0),
            record("2024-01-01", "C", 1.0),
            record("2024-01-05", "B", 1.0),
        ];

        let extraction = extract_series(&records, &Selection::from_ids(["A"]), &catalog()).unwrap();
        assert_eq!(
            extraction.timeline,
            vec![parse_exam_date("2024-01-05").unwrap(), parse_exam_date("2024-01-01").unwrap()]
        );
        assert_eq!(
            extraction.timeline_range(),
            Some((
                parse_exam_date("2024-01-01").unwrap().timestamp_millis(),
                parse_exam_date("2024-01-05").unwrap().timestamp_millis()
            ))
        );
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let err = extract_series(&[], &Selection::from_ids(["A", "Z"]), &catalog()).unwrap_err();
        assert_eq!(err, ChartError::UnknownField { field_id: FieldId::from("Z") });
    }

    #[test]
    fn test_empty_selection_yields_nothing() {
        let records = vec![record("2024-01-01", "A", 1.0)];
        let extraction = extract_series(&records, &Selection::new(), &catalog()).unwrap();
        assert!(extraction.series.is_empty());
        assert!(extraction.timeline.is_empty());
    }

    #[test]
    fn test_series_ranges() {
        let records = vec![
            record("2024-01-03", "A", 4.0),
            record("2024-01-01", "A", -2.0),
            record("2024-01-02", "A", 7.5),
        ];

        let extraction = extract_series(&records, &Selection::from_ids(["A"]), &catalog()).unwrap();
        let series = &extraction.series[0];
        assert_eq!(series.value_range(), Some((-2.0, 7.5)));

        let (lo, hi) = series.time_range().unwrap();
        assert_eq!(lo, parse_exam_date("2024-01-01").unwrap().timestamp_millis());
        assert_eq!(hi, parse_exam_date("2024-01-03").unwrap().timestamp_millis());
    }
}
