//! # exam-charts
//!
//! SVG time-series chart surfaces built with Leptos, and the pool that owns
//! their lifecycle.
//!
//! ## Architecture
//!
//! Uses Strategy pattern for:
//! - Scale computation (linear, time)
//! - Path generation (straight, tension-smoothed)
//! - Surface hosting (`SurfaceHost`: DOM in the browser, in-memory in tests)
//!
//! ## Modules
//!
//! - `chartkit` - Core primitives: scales, paths, formatters
//! - `view_window` - Pan/zoom window math
//! - `surface` - Surface planning and pure projection to view-box geometry
//! - `pool` - `ChartInstancePool`, destroy-before-create lifecycle
//! - `dom` - `SurfaceHost` backed by a DOM container
//! - `line_chart` - The interactive surface component

pub mod chartkit;
pub mod dom;
pub mod line_chart;
pub mod pool;
pub mod surface;
pub mod view_window;

pub use chartkit::*;
pub use dom::*;
pub use line_chart::*;
pub use pool::*;
pub use surface::*;
pub use view_window::*;

// Re-export colors from exam-core for convenience
pub use exam_core::colors;

/// Chart margin configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl ChartMargin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    /// One y-axis on each side plus date labels below
    pub const fn standard() -> Self {
        Self::new(24.0, 70.0, 36.0, 70.0)
    }
}

impl Default for ChartMargin {
    fn default() -> Self {
        Self::standard()
    }
}

/// Chart dimensions with margin handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub margin: ChartMargin,
}

impl ChartDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: ChartMargin::default(),
        }
    }

    pub fn with_margin(mut self, margin: ChartMargin) -> Self {
        self.margin = margin;
        self
    }

    /// Inner width (excluding margins)
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    /// Inner height (excluding margins)
    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// SVG transform for inner chart area
    pub fn inner_transform(&self) -> String {
        format!("translate({}, {})", self.margin.left, self.margin.top)
    }

    /// ViewBox string for SVG
    pub fn viewbox(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }

    /// Fractions of the plot area under a view-box point, `(0, 0)` = bottom left
    pub fn plot_fraction(&self, x: f64, y: f64) -> (f64, f64) {
        let w = self.inner_width().max(f64::EPSILON);
        let h = self.inner_height().max(f64::EPSILON);
        ((x - self.margin.left) / w, 1.0 - (y - self.margin.top) / h)
    }
}
