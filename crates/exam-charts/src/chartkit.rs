//! # chartkit
//!
//! Core chart primitives: scales, path builders, axis label formatters.
//! Implements Strategy pattern for scale and path generation.

use std::fmt::Write;

use chrono::{TimeZone, Utc};

// ============================================================================
// STRATEGY PATTERN: Scale Trait
// ============================================================================

/// Strategy trait for scales (maps domain values to range values)
pub trait Scale: Send + Sync {
    /// Scale a value from domain to range
    fn scale(&self, value: f64) -> f64;

    /// Inverse scale (range to domain)
    fn invert(&self, value: f64) -> f64;
}

// ============================================================================
// LINEAR SCALE
// ============================================================================

/// Linear scale (D3-style continuous scale)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
        }
    }

    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    /// Domain padded by `ratio` of its span on both ends; a flat domain gets ±1
    pub fn padded_domain(min: f64, max: f64, ratio: f64) -> (f64, f64) {
        let span = max - min;
        let pad = if span > 0.0 { span * ratio } else { 1.0 };
        (min - pad, max + pad)
    }

    /// Generate "nice" tick values (rounded to clean numbers)
    pub fn nice_ticks(&self, count: usize) -> Vec<f64> {
        let (min, max) = self.domain;
        let range = max - min;

        if range <= 0.0 || count == 0 || !range.is_finite() {
            return vec![min];
        }

        let rough_step = range / count as f64;
        let magnitude = 10.0_f64.powf(rough_step.log10().floor());
        let residual = rough_step / magnitude;

        let nice_step = if residual <= 1.0 {
            magnitude
        } else if residual <= 2.0 {
            2.0 * magnitude
        } else if residual <= 5.0 {
            5.0 * magnitude
        } else {
            10.0 * magnitude
        };

        let first = (min / nice_step).ceil() as i64;
        let last = (max / nice_step).floor() as i64;

        (first..=last).map(|k| k as f64 * nice_step).collect()
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new()
    }
}

impl Scale for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (d_max - d_min).abs() < f64::EPSILON {
            return (r_min + r_max) / 2.0;
        }

        let normalized = (value - d_min) / (d_max - d_min);
        r_min + normalized * (r_max - r_min)
    }

    fn invert(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (r_max - r_min).abs() < f64::EPSILON {
            return (d_min + d_max) / 2.0;
        }

        let normalized = (value - r_min) / (r_max - r_min);
        d_min + normalized * (d_max - d_min)
    }
}

// ============================================================================
// TIME SCALE
// ============================================================================

pub const DAY_MS: i64 = 86_400_000;

/// Time scale (maps millisecond timestamps to pixel positions)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: (i64, i64),
    range: (f64, f64),
}

impl TimeScale {
    pub fn new() -> Self {
        Self {
            domain: (0, 1),
            range: (0.0, 1.0),
        }
    }

    pub fn domain(mut self, min: i64, max: i64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    /// Scale timestamp to pixel position
    pub fn scale(&self, timestamp: i64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if d_max == d_min {
            return (r_min + r_max) / 2.0;
        }

        let normalized = (timestamp - d_min) as f64 / (d_max - d_min) as f64;
        r_min + normalized * (r_max - r_min)
    }

    /// Inverse scale (pixel to timestamp)
    pub fn invert(&self, value: f64) -> i64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (r_max - r_min).abs() < f64::EPSILON {
            return (d_min + d_max) / 2;
        }

        let normalized = (value - r_min) / (r_max - r_min);
        (d_min as f64 + normalized * (d_max - d_min) as f64) as i64
    }

    /// Day-aligned ticks, thinned to at most `max_count`
    pub fn day_ticks(&self, max_count: usize) -> Vec<i64> {
        let (min, max) = self.domain;
        if max < min || max_count == 0 {
            return Vec::new();
        }

        let first_day = min.div_euclid(DAY_MS) + i64::from(min.rem_euclid(DAY_MS) != 0);
        let last_day = max.div_euclid(DAY_MS);
        if last_day < first_day {
            return Vec::new();
        }

        let days = (last_day - first_day + 1) as usize;
        let stride = days.div_ceil(max_count).max(1) as i64;

        (first_day..=last_day)
            .step_by(stride as usize)
            .map(|day| day * DAY_MS)
            .collect()
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// STRATEGY PATTERN: Path Generator Trait
// ============================================================================

/// Strategy trait for path generation
pub trait PathGenerator: Send + Sync {
    fn generate(&self, points: &[(f64, f64)]) -> String;
}

/// Straight line segments
#[derive(Debug, Clone, Default)]
pub struct LinePath;

impl PathGenerator for LinePath {
    fn generate(&self, points: &[(f64, f64)]) -> String {
        let Some(&(x, y)) = points.first() else {
            return String::new();
        };

        let mut path = String::with_capacity(points.len() * 20);
        let _ = write!(path, "M{:.2},{:.2}", x, y);

        for &(x, y) in &points[1..] {
            let _ = write!(path, "L{:.2},{:.2}", x, y);
        }

        path
    }
}

/// Lightly smoothed line (cubic Bézier through every point)
#[derive(Debug, Clone)]
pub struct TensionPath {
    /// 0.0 draws straight segments
    pub tension: f64,
}

impl Default for TensionPath {
    fn default() -> Self {
        Self { tension: 0.1 }
    }
}

impl PathGenerator for TensionPath {
    fn generate(&self, points: &[(f64, f64)]) -> String {
        if points.len() < 3 || self.tension <= 0.0 {
            return LinePath.generate(points);
        }

        let mut path = String::with_capacity(points.len() * 48);
        let (x, y) = points[0];
        let _ = write!(path, "M{:.2},{:.2}", x, y);

        for i in 0..points.len() - 1 {
            let p0 = points[i.saturating_sub(1)];
            let p1 = points[i];
            let p2 = points[i + 1];
            let p3 = points[(i + 2).min(points.len() - 1)];

            let c1 = (
                p1.0 + (p2.0 - p0.0) * self.tension,
                p1.1 + (p2.1 - p0.1) * self.tension,
            );
            let c2 = (
                p2.0 - (p3.0 - p1.0) * self.tension,
                p2.1 - (p3.1 - p1.1) * self.tension,
            );

            let _ = write!(
                path,
                "C{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
                c1.0, c1.1, c2.0, c2.1, p2.0, p2.1
            );
        }

        path
    }
}

// ============================================================================
// LOOKUP
// ============================================================================

/// Index of the timestamp closest to `target`; ties go to the earlier entry
pub fn nearest_index(timestamps: &[i64], target: i64) -> Option<usize> {
    timestamps
        .iter()
        .enumerate()
        .min_by_key(|&(i, t)| ((t - target).unsigned_abs(), i))
        .map(|(i, _)| i)
}

// ============================================================================
// FORMATTERS
// ============================================================================

/// x-axis tick label (`Jan 05`)
pub fn format_day_tick(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%b %d").to_string())
        .unwrap_or_default()
}

/// Tooltip date (`05-01-2024`)
pub fn format_tooltip_date(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%d-%m-%Y").to_string())
        .unwrap_or_default()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new().domain(0.0, 100.0).range(0.0, 500.0);

        assert_eq!(scale.scale(0.0), 0.0);
        assert_eq!(scale.scale(50.0), 250.0);
        assert_eq!(scale.scale(100.0), 500.0);
        assert_eq!(scale.invert(250.0), 50.0);
    }

    #[test]
    fn test_inverted_range_for_y_axis() {
        let scale = LinearScale::new().domain(0.0, 10.0).range(400.0, 0.0);
        assert_eq!(scale.scale(0.0), 400.0);
        assert_eq!(scale.scale(10.0), 0.0);
    }

    #[test]
    fn test_nice_ticks_stay_inside_domain() {
        let scale = LinearScale::new().domain(3.2, 17.9);
        let ticks = scale.nice_ticks(5);
        assert_eq!(ticks, vec![5.0, 10.0, 15.0]);
    }

    #[test]
    fn test_padded_domain() {
        assert_eq!(LinearScale::padded_domain(0.0, 100.0, 0.05), (-5.0, 105.0));
        assert_eq!(LinearScale::padded_domain(7.0, 7.0, 0.05), (6.0, 8.0));
    }

    #[test]
    fn test_time_scale() {
        let scale = TimeScale::new().domain(0, 10 * DAY_MS).range(0.0, 1000.0);
        assert_eq!(scale.scale(5 * DAY_MS), 500.0);
        assert_eq!(scale.invert(100.0), DAY_MS);
    }

    #[test]
    fn test_day_ticks_thinned() {
        let scale = TimeScale::new().domain(0, 9 * DAY_MS);
        assert_eq!(scale.day_ticks(20).len(), 10);

        let thinned = scale.day_ticks(4);
        assert_eq!(thinned, vec![0, 3 * DAY_MS, 6 * DAY_MS, 9 * DAY_MS]);
    }

    #[test]
    fn test_day_ticks_skip_partial_first_day() {
        let scale = TimeScale::new().domain(DAY_MS / 2, 2 * DAY_MS);
        assert_eq!(scale.day_ticks(10), vec![DAY_MS, 2 * DAY_MS]);
    }

    #[test]
    fn test_line_path_generator() {
        let path = LinePath.generate(&[(0.0, 0.0), (50.0, 50.0), (100.0, 0.0)]);
        assert_eq!(path, "M0.00,0.00L50.00,50.00L100.00,0.00");
        assert!(LinePath.generate(&[]).is_empty());
    }

    #[test]
    fn test_tension_path_passes_through_points() {
        let path = TensionPath::default().generate(&[(0.0, 0.0), (50.0, 50.0), (100.0, 0.0)]);
        assert!(path.starts_with("M0.00,0.00C"));
        assert!(path.ends_with("100.00,0.00"));
        assert_eq!(path.matches('C').count(), 2);
    }

    #[test]
    fn test_nearest_index() {
        let stamps = [0, 10, 20, 40];
        assert_eq!(nearest_index(&stamps, 12), Some(1));
        assert_eq!(nearest_index(&stamps, 30), Some(2));
        assert_eq!(nearest_index(&stamps, 100), Some(3));
        assert_eq!(nearest_index(&[], 5), None);
    }

    #[test]
    fn test_date_formatters() {
        let ts = 1_704_412_800_000; // 2024-01-05T00:00:00Z
        assert_eq!(format_day_tick(ts), "Jan 05");
        assert_eq!(format_tooltip_date(ts), "05-01-2024");
    }
}
