//! Incremental rendering of curves still being drawn.
//!
//! Each new point is first drawn as a straight line on the overlay, for immediate feedback. Smoothing
//! a span needs the point after it, so the definitive segment lags one point behind: once known, the
//! provisional line is erased from the overlay and the span is redrawn as a curve on the persistent
//! surface. The erase is wider than the line to cover its overshoot.

use super::{draw_segment, draw_start_dot, smoothing, Canvas, Surface};
use crate::{color::Color, config::SmoothingConfig, stroke::Curve};

pub struct LiveRenderer {
    params: SmoothingConfig,
}
impl LiveRenderer {
    #[must_use]
    pub fn new(params: SmoothingConfig) -> Self {
        Self { params }
    }
    #[must_use]
    pub fn params(&self) -> &SmoothingConfig {
        &self.params
    }
    /// A curve was just started, mark its start point.
    pub fn started<S: Surface>(&self, canvas: &mut Canvas<S>, curve: &Curve, color: Color) {
        draw_start_dot(canvas.persistent_mut(), curve, color);
    }
    /// A point was appended to `curve`.
    pub fn point_added<S: Surface>(&self, canvas: &mut Canvas<S>, curve: &Curve, color: Color) {
        let points = curve.points();
        let n = points.len();
        if n < 2 {
            return;
        }
        let (prev, new) = (&points[n - 2], &points[n - 1]);
        canvas
            .overlay_mut()
            .draw_line(prev.position(), new.position(), new.width(), color);

        if n >= 3 {
            // The span ending at the previous point can now be smoothed.
            self.settle(canvas, curve, n - 3, color);
        }
    }
    /// `curve` was completed, settle its trailing span.
    pub fn finished<S: Surface>(&self, canvas: &mut Canvas<S>, curve: &Curve, color: Color) {
        let n = curve.len();
        match n {
            0 | 1 => (),
            2 => {
                let [from, to] = curve.points() else {
                    return;
                };
                self.erase_provisional(canvas, curve, 0);
                canvas
                    .persistent_mut()
                    .draw_line(from.position(), to.position(), to.width(), color);
            }
            _ => self.settle(canvas, curve, n - 2, color),
        }
    }
    /// `curve` was dropped unfinished, erase its trailing provisional line. The rest was settled already.
    pub fn abandoned<S: Surface>(&self, canvas: &mut Canvas<S>, curve: &Curve) {
        if curve.len() >= 2 {
            self.erase_provisional(canvas, curve, curve.len() - 2);
        }
    }
    /// Clear all provisional lines. Call once no curve is in progress anymore.
    pub fn clear_overlay<S: Surface>(&self, canvas: &mut Canvas<S>) {
        canvas.clear_overlay();
    }
    /// Replace the provisional line from `points[idx]` to `points[idx + 1]` with its definitive segment.
    fn settle<S: Surface>(&self, canvas: &mut Canvas<S>, curve: &Curve, idx: usize, color: Color) {
        self.erase_provisional(canvas, curve, idx);
        let draw = smoothing::segment_at(curve.points(), idx, &self.params);
        log::trace!(
            "Settling segment {idx} of curve {}",
            curve.sequence_index()
        );
        draw_segment(canvas.persistent_mut(), &draw, color);
    }
    fn erase_provisional<S: Surface>(&self, canvas: &mut Canvas<S>, curve: &Curve, idx: usize) {
        let points = curve.points();
        let (from, to) = (&points[idx], &points[idx + 1]);
        canvas.overlay_mut().erase_stroke(
            from.position(),
            to.position(),
            to.width() * self.params.erase_width_factor,
        );
    }
}
