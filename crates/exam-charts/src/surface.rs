//! Surface planning and projection
//!
//! A render pass turns the assigned datasets into [`SurfaceSpec`]s, one per
//! surface the current mode needs. Each spec can then be projected into
//! view-box coordinates for a given pan/zoom window; the projection is pure
//! so the geometry is testable without a DOM.

use crate::{
    ChartDimensions, ChartMargin,
    chartkit::{
        DAY_MS, LinearScale, PathGenerator, Scale, TensionPath, TimeScale, format_day_tick,
        format_tooltip_date, nearest_index,
    },
    view_window::ViewWindow,
};
use exam_core::{AxisPosition, ChartMode, Dataset};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Surface look and geometry
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Width of the SVG view box; height comes from the mode
    pub viewbox_width: f64,
    /// CSS width of each surface wrapper
    pub css_width: &'static str,
    /// Margins around the plot when a single axis sits on each side
    pub margin: ChartMargin,
    /// Horizontal room taken by every additional stacked y-axis
    pub axis_gutter: f64,
    pub tension: f64,
    pub y_tick_count: usize,
    pub x_tick_count: usize,
    /// Fraction of the value span added above and below each series
    pub domain_padding: f64,
    pub point_radius: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            viewbox_width: 1200.0,
            css_width: "90vw",
            margin: ChartMargin::standard(),
            axis_gutter: 60.0,
            tension: 0.1,
            y_tick_count: 6,
            x_tick_count: 10,
            domain_padding: 0.05,
            point_radius: 3.0,
        }
    }
}

/// Which axes a gesture acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisMask {
    X,
    Y,
    XY,
}

impl AxisMask {
    pub fn x(&self) -> bool {
        matches!(self, Self::X | Self::XY)
    }

    pub fn y(&self) -> bool {
        matches!(self, Self::Y | Self::XY)
    }
}

/// How hover picks the points it reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverMode {
    /// Closest timestamp along x
    NearestX,
}

/// Pointer behaviour bound to every surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionConfig {
    pub hover: HoverMode,
    /// Whether the pointer has to be on a point for hover to trigger
    pub intersect: bool,
    pub pan: AxisMask,
    pub wheel_zoom: bool,
    pub pinch_zoom: bool,
    pub zoom: AxisMask,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            hover: HoverMode::NearestX,
            intersect: false,
            pan: AxisMask::XY,
            wheel_zoom: true,
            pinch_zoom: true,
            zoom: AxisMask::XY,
        }
    }
}

// ============================================================================
// PLANNING
// ============================================================================

/// Everything one surface is built from
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSpec {
    pub index: usize,
    pub mode: ChartMode,
    pub datasets: Vec<Dataset>,
    /// Shared x-domain in milliseconds, falls back to the datasets' own extent
    pub x_domain: Option<(i64, i64)>,
    pub interaction: InteractionConfig,
}

impl SurfaceSpec {
    pub fn id(&self) -> String {
        format!("exam-chart-{}-{}", self.mode, self.index)
    }

    pub fn height(&self) -> f64 {
        self.mode.surface_height()
    }

    /// x-domain actually drawn before any pan/zoom
    pub fn base_x_domain(&self) -> (i64, i64) {
        let extent = self.x_domain.or_else(|| {
            self.datasets
                .iter()
                .filter_map(|d| d.series.time_range())
                .reduce(|(lo, hi), (a, b)| (lo.min(a), hi.max(b)))
        });

        match extent {
            Some((lo, hi)) if lo < hi => (lo, hi),
            Some((t, _)) => (t - DAY_MS / 2, t + DAY_MS / 2),
            None => (0, DAY_MS),
        }
    }

    pub fn dimensions(&self, config: &SurfaceConfig) -> ChartDimensions {
        let lefts = self.count_on(AxisPosition::Left);
        let rights = self.count_on(AxisPosition::Right);
        let extra = |n: usize| n.saturating_sub(1) as f64 * config.axis_gutter;

        let mut margin = config.margin;
        margin.left += extra(lefts);
        margin.right += extra(rights);

        ChartDimensions::new(config.viewbox_width, self.height()).with_margin(margin)
    }

    fn count_on(&self, position: AxisPosition) -> usize {
        self.datasets
            .iter()
            .filter(|d| d.axis.position == position)
            .count()
    }

    /// Hover report for the timestamp closest to `x_ms` across every dataset
    pub fn hover_at(&self, x_ms: i64) -> Option<HoverInfo> {
        let mut stamps: Vec<i64> = self
            .datasets
            .iter()
            .flat_map(|d| d.series.points.iter().map(|p| p.timestamp_millis()))
            .collect();
        stamps.sort_unstable();
        stamps.dedup();

        let timestamp = stamps[nearest_index(&stamps, x_ms)?];

        let items = self
            .datasets
            .iter()
            .filter_map(|dataset| {
                let point = dataset
                    .series
                    .points
                    .iter()
                    .find(|p| p.timestamp_millis() == timestamp)?;
                Some(HoverItem {
                    label: dataset.label().to_string(),
                    color: dataset.color,
                    value: dataset.axis.tick_label(point.value),
                })
            })
            .collect();

        Some(HoverInfo {
            timestamp,
            date: format_tooltip_date(timestamp),
            items,
        })
    }
}

/// Lay out assigned datasets on the surfaces `mode` requires.
///
/// Combined mode binds every dataset to one surface sharing `timeline`;
/// separate mode gives each dataset its own surface and x-extent.
pub fn plan_surfaces(
    datasets: Vec<Dataset>,
    mode: ChartMode,
    timeline: Option<(i64, i64)>,
) -> Vec<SurfaceSpec> {
    let specs: Vec<SurfaceSpec> = match mode {
        ChartMode::Combined => vec![SurfaceSpec {
            index: 0,
            mode,
            datasets,
            x_domain: timeline,
            interaction: InteractionConfig::default(),
        }],
        ChartMode::Separate => datasets
            .into_iter()
            .enumerate()
            .map(|(index, dataset)| SurfaceSpec {
                index,
                mode,
                x_domain: dataset.series.time_range(),
                datasets: vec![dataset],
                interaction: InteractionConfig::default(),
            })
            .collect(),
    };

    tracing::debug!(mode = %mode, surfaces = specs.len(), "Planned chart surfaces");
    specs
}

// ============================================================================
// PROJECTION
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct HoverItem {
    pub label: String,
    pub color: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoverInfo {
    pub timestamp: i64,
    pub date: String,
    pub items: Vec<HoverItem>,
}

/// One y-axis in inner-plot coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct AxisView {
    pub position: AxisPosition,
    /// x of the axis line
    pub offset: f64,
    pub color: &'static str,
    pub title: String,
    /// `(y, label)` pairs
    pub ticks: Vec<(f64, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesView {
    pub label: String,
    pub color: &'static str,
    pub path: String,
    pub points: Vec<(f64, f64)>,
}

/// A surface resolved to view-box geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub dims: ChartDimensions,
    pub x_scale: TimeScale,
    /// `(x, label)` pairs
    pub x_ticks: Vec<(f64, String)>,
    pub axes: Vec<AxisView>,
    pub series: Vec<SeriesView>,
}

/// Project `spec` through the pan/zoom `window`
pub fn project(spec: &SurfaceSpec, config: &SurfaceConfig, window: &ViewWindow) -> Projection {
    let dims = spec.dimensions(config);
    let inner_w = dims.inner_width();
    let inner_h = dims.inner_height();

    let (x_min, x_max) = window.apply_x(spec.base_x_domain());
    let x_scale = TimeScale::new().domain(x_min, x_max).range(0.0, inner_w);
    let x_ticks = x_scale
        .day_ticks(config.x_tick_count)
        .into_iter()
        .map(|t| (x_scale.scale(t), format_day_tick(t)))
        .collect();

    let path_gen = TensionPath {
        tension: config.tension,
    };

    let mut lefts = 0usize;
    let mut rights = 0usize;
    let mut axes = Vec::with_capacity(spec.datasets.len());
    let mut series = Vec::with_capacity(spec.datasets.len());

    for dataset in &spec.datasets {
        let (lo, hi) = dataset.series.value_range().unwrap_or((0.0, 1.0));
        let (y_min, y_max) =
            window.apply_y(LinearScale::padded_domain(lo, hi, config.domain_padding));
        let y_scale = LinearScale::new().domain(y_min, y_max).range(inner_h, 0.0);

        let offset = match dataset.axis.position {
            AxisPosition::Left => {
                lefts += 1;
                -((lefts - 1) as f64) * config.axis_gutter
            }
            AxisPosition::Right => {
                rights += 1;
                inner_w + (rights - 1) as f64 * config.axis_gutter
            }
        };

        let ticks = y_scale
            .nice_ticks(config.y_tick_count)
            .into_iter()
            .map(|v| (y_scale.scale(v), dataset.axis.tick_label(v)))
            .collect();

        axes.push(AxisView {
            position: dataset.axis.position,
            offset,
            color: dataset.axis.color,
            title: dataset.label().to_string(),
            ticks,
        });

        let points: Vec<(f64, f64)> = dataset
            .series
            .points
            .iter()
            .map(|p| (x_scale.scale(p.timestamp_millis()), y_scale.scale(p.value)))
            .collect();

        series.push(SeriesView {
            label: dataset.label().to_string(),
            color: dataset.color,
            path: path_gen.generate(&points),
            points,
        });
    }

    Projection {
        dims,
        x_scale,
        x_ticks,
        axes,
        series,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::{
        ExamRecord, FieldCatalog, Field, PatientId, Selection, assign_datasets, extract_series,
    };

    fn datasets(mode: ChartMode) -> (Vec<Dataset>, Option<(i64, i64)>) {
        let patient = PatientId::from("p1");
        let records = vec![
            ExamRecord::on(patient.clone(), "2024-01-01", "A", 5.0).unwrap(),
            ExamRecord::on(patient.clone(), "2024-01-02", "A", 7.0).unwrap(),
            ExamRecord::on(patient.clone(), "2024-01-01", "B", 2.0).unwrap(),
            ExamRecord::on(patient, "2024-01-04", "C", 1.0).unwrap(),
        ];
        let catalog = FieldCatalog::from(vec![
            Field::new("A", "Alpha", "mg"),
            Field::new("B", "Beta", "%"),
            Field::new("C", "Gamma", ""),
        ]);
        let extraction =
            extract_series(&records, &Selection::from_ids(["A", "B", "C"]), &catalog).unwrap();
        let timeline = extraction.timeline_range();
        (assign_datasets(extraction.series, mode), timeline)
    }

    #[test]
    fn test_combined_plan_is_one_surface() {
        let (sets, timeline) = datasets(ChartMode::Combined);
        let specs = plan_surfaces(sets, ChartMode::Combined, timeline);

        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].datasets.len(), 3);
        assert_eq!(specs[0].height(), 600.0);
        assert_eq!(specs[0].x_domain, timeline);
        assert_eq!(specs[0].id(), "exam-chart-combined-0");
    }

    #[test]
    fn test_separate_plan_is_one_surface_per_dataset() {
        let (sets, timeline) = datasets(ChartMode::Separate);
        let specs = plan_surfaces(sets, ChartMode::Separate, timeline);

        assert_eq!(specs.len(), 3);
        for (i, spec) in specs.iter().enumerate() {
            assert_eq!(spec.index, i);
            assert_eq!(spec.datasets.len(), 1);
            assert_eq!(spec.height(), 400.0);
        }
        // B has a single date, so its own extent is used rather than the timeline
        let b = specs[1].datasets[0].series.points[0].timestamp_millis();
        assert_eq!(specs[1].x_domain, Some((b, b)));
        assert_eq!(specs[1].base_x_domain(), (b - DAY_MS / 2, b + DAY_MS / 2));
    }

    #[test]
    fn test_default_interaction() {
        let interaction = InteractionConfig::default();
        assert_eq!(interaction.hover, HoverMode::NearestX);
        assert!(!interaction.intersect);
        assert!(interaction.pan.x() && interaction.pan.y());
        assert!(interaction.zoom.x() && interaction.zoom.y());
        assert!(interaction.wheel_zoom && interaction.pinch_zoom);
    }

    #[test]
    fn test_stacked_axes_widen_margins() {
        let (sets, timeline) = datasets(ChartMode::Combined);
        let spec = plan_surfaces(sets, ChartMode::Combined, timeline).remove(0);
        let config = SurfaceConfig::default();

        // two left axes (A, C), one right (B)
        let dims = spec.dimensions(&config);
        assert_eq!(dims.margin.left, config.margin.left + config.axis_gutter);
        assert_eq!(dims.margin.right, config.margin.right);

        let projection = project(&spec, &config, &ViewWindow::default());
        let offsets: Vec<_> = projection.axes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0.0, dims.inner_width(), -config.axis_gutter]);
        assert_eq!(projection.axes[1].position, AxisPosition::Right);
    }

    #[test]
    fn test_projection_spans_plot_area() {
        let (sets, timeline) = datasets(ChartMode::Combined);
        let spec = plan_surfaces(sets, ChartMode::Combined, timeline).remove(0);
        let config = SurfaceConfig::default();
        let projection = project(&spec, &config, &ViewWindow::default());

        let a = &projection.series[0];
        assert_eq!(a.points.len(), 2);
        assert_eq!(a.points[0].0, 0.0);
        assert!(a.path.starts_with('M'));

        let c = &projection.series[2];
        assert_eq!(c.points[0].0, projection.dims.inner_width());

        // tick labels carry the series unit
        assert!(projection.axes[0].ticks.iter().all(|(_, l)| l.ends_with("mg")));
        assert_eq!(projection.x_ticks.first().map(|t| t.1.as_str()), Some("Jan 01"));
    }

    #[test]
    fn test_hover_reports_every_dataset_at_nearest_date() {
        let (sets, timeline) = datasets(ChartMode::Combined);
        let spec = plan_surfaces(sets, ChartMode::Combined, timeline).remove(0);

        let first = spec.datasets[0].series.points[0].timestamp_millis();
        let hover = spec.hover_at(first + DAY_MS / 4).unwrap();

        assert_eq!(hover.timestamp, first);
        assert_eq!(hover.date, "01-01-2024");
        let labels: Vec<_> = hover.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Alpha", "Beta"]);
        assert_eq!(hover.items[0].value, "5.0mg");
    }

    #[test]
    fn test_hover_on_empty_surface() {
        let spec = plan_surfaces(Vec::new(), ChartMode::Combined, None).remove(0);
        assert!(spec.hover_at(0).is_none());
        assert_eq!(spec.base_x_domain(), (0, DAY_MS));
    }
}
