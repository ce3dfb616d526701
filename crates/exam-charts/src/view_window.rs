//! Pan/zoom state of a surface, in normalized domain coordinates.
//!
//! A window of `(0.0, 1.0)` on an axis shows that axis' full data domain.
//! Zooming shrinks the window around an anchor, panning slides it.

use crate::surface::AxisMask;

/// Smallest visible fraction of a domain
const MIN_SPAN: f64 = 1e-3;
/// Largest visible multiple of a domain
const MAX_SPAN: f64 = 1e3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewWindow {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl Default for ViewWindow {
    fn default() -> Self {
        Self {
            x: (0.0, 1.0),
            y: (0.0, 1.0),
        }
    }
}

impl ViewWindow {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Zoom both axes by `factor` (>1 zooms in) keeping the anchor point fixed.
    /// Anchors are fractions of the visible area, `(0, 0)` = left/bottom.
    pub fn zoom(&mut self, factor: f64, anchor_x: f64, anchor_y: f64) {
        self.zoom_on(AxisMask::XY, factor, anchor_x, anchor_y);
    }

    /// Like [`ViewWindow::zoom`], restricted to the axes in `mask`
    pub fn zoom_on(&mut self, mask: AxisMask, factor: f64, anchor_x: f64, anchor_y: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        if mask.x() {
            self.x = zoom_axis(self.x, factor, anchor_x);
        }
        if mask.y() {
            self.y = zoom_axis(self.y, factor, anchor_y);
        }
    }

    /// Slide by a fraction of the visible area; positive `dx` reveals data to the left
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.pan_on(AxisMask::XY, dx, dy);
    }

    pub fn pan_on(&mut self, mask: AxisMask, dx: f64, dy: f64) {
        if mask.x() {
            let shift = dx * (self.x.1 - self.x.0);
            self.x = (self.x.0 - shift, self.x.1 - shift);
        }
        if mask.y() {
            let shift = dy * (self.y.1 - self.y.0);
            self.y = (self.y.0 - shift, self.y.1 - shift);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Visible part of an x-domain given in milliseconds
    pub fn apply_x(&self, domain: (i64, i64)) -> (i64, i64) {
        let (lo, hi) = apply((domain.0 as f64, domain.1 as f64), self.x);
        (lo.round() as i64, hi.round() as i64)
    }

    /// Visible part of a y-domain
    pub fn apply_y(&self, domain: (f64, f64)) -> (f64, f64) {
        apply(domain, self.y)
    }
}

fn zoom_axis(window: (f64, f64), factor: f64, anchor: f64) -> (f64, f64) {
    let span = window.1 - window.0;
    let new_span = (span / factor).clamp(MIN_SPAN, MAX_SPAN);
    let pivot = window.0 + anchor.clamp(0.0, 1.0) * span;
    let lo = pivot - (pivot - window.0) * new_span / span;
    (lo, lo + new_span)
}

fn apply(domain: (f64, f64), window: (f64, f64)) -> (f64, f64) {
    let span = domain.1 - domain.0;
    (domain.0 + window.0 * span, domain.0 + window.1 * span)
}

/// Distance between two pointers, used for pinch gestures
pub fn pointer_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}
