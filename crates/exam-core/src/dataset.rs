//! Deterministic color and y-axis assignment for extracted series

use crate::{ChartMode, Series, TickFormatter, UnitSuffixFormatter, colors};
use serde::{Deserialize, Serialize};

/// Side of the plot a y-axis is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    Left,
    Right,
}

impl AxisPosition {
    /// Even indices go left, odd go right
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 { Self::Left } else { Self::Right }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Identity of a y-axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisId {
    /// Combined mode: one axis per series, `axis-{index}`
    Series(usize),
    /// Separate mode: the single left axis of the series' own surface
    Local,
}

impl std::fmt::Display for AxisId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Series(index) => write!(f, "axis-{}", index),
            Self::Local => write!(f, "y"),
        }
    }
}

/// Axis configuration for one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisAssignment {
    pub id: AxisId,
    pub position: AxisPosition,
    /// Tick label color, same as the series color
    pub color: &'static str,
    pub ticks: UnitSuffixFormatter,
}

impl AxisAssignment {
    pub fn tick_label(&self, value: f64) -> String {
        self.ticks.format(value)
    }
}

/// A series plus everything needed to draw it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub series: Series,
    pub color: &'static str,
    pub axis: AxisAssignment,
}

impl Dataset {
    /// Axis id shared across series, `None` when the axis is local to a surface
    pub fn axis_id(&self) -> Option<String> {
        match self.axis.id {
            AxisId::Series(_) => Some(self.axis.id.to_string()),
            AxisId::Local => None,
        }
    }

    pub fn label(&self) -> &str {
        &self.series.label
    }
}

/// Attach color and axis to each series by its position.
///
/// `series` must already be in selection order; the result keeps it.
pub fn assign_datasets(series: Vec<Series>, mode: ChartMode) -> Vec<Dataset> {
    series
        .into_iter()
        .enumerate()
        .map(|(index, series)| {
            let color = colors::palette_color(index);
            let (id, position) = match mode {
                ChartMode::Combined => (AxisId::Series(index), AxisPosition::for_index(index)),
                ChartMode::Separate => (AxisId::Local, AxisPosition::Left),
            };
            let ticks = UnitSuffixFormatter::new(series.unit.clone());

            Dataset {
                series,
                color,
                axis: AxisAssignment {
                    id,
                    position,
                    color,
                    ticks,
                },
            }
        })
        .collect()
}
