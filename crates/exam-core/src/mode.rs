//! Combined vs. separate rendering mode

use serde::{Deserialize, Serialize};

/// How selected series are laid out on chart surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    /// One surface, one y-axis per series
    #[default]
    Combined,
    /// One surface per series
    Separate,
}

impl ChartMode {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Combined => Self::Separate,
            Self::Separate => Self::Combined,
        }
    }

    /// Height of every surface in this mode, independent of data volume
    pub fn surface_height(&self) -> f64 {
        match self {
            Self::Combined => 600.0,
            Self::Separate => 400.0,
        }
    }

    /// Number of surfaces needed for `series_count` series
    pub fn surface_count(&self, series_count: usize) -> usize {
        match self {
            Self::Combined => 1,
            Self::Separate => series_count,
        }
    }

    /// Caption of the button that switches *away* from this mode
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Self::Combined => "Show Separate Charts",
            Self::Separate => "Show Multi-Axis Chart",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Combined => "chart-mode-combined",
            Self::Separate => "chart-mode-separate",
        }
    }
}

impl std::fmt::Display for ChartMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Combined => write!(f, "combined"),
            Self::Separate => write!(f, "separate"),
        }
    }
}
