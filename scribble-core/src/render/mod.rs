//! # Rendering
//!
//! Curves are drawn onto a [`Canvas`]: a persistent surface holding finished geometry, and a transient
//! overlay receiving low-latency provisional lines while a stroke is in progress (see [`live`]).
//!
//! The surfaces themselves are external, the renderer only issues primitive calls through [`Surface`].

pub mod live;
pub mod recording;
pub mod smoothing;

pub use live::LiveRenderer;
pub use recording::{DrawCall, RecordingSurface};
pub use smoothing::{Segment, SegmentDraw};

use crate::{
    color::{Color, ColorKey},
    config::SmoothingConfig,
    stroke::Curve,
    util::{Rect, Vec2},
};

/// Primitive drawing operations of a render surface.
pub trait Surface {
    /// Stroke a straight line.
    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f64, color: Color);
    /// Stroke a cubic bezier.
    fn draw_curve(&mut self, from: Vec2, ctrl1: Vec2, ctrl2: Vec2, to: Vec2, width: f64, color: Color);
    fn draw_filled_circle(&mut self, center: Vec2, diameter: f64, color: Color);
    /// Remove previously drawn pixels along a line (destination-out), rather than painting over them.
    fn erase_stroke(&mut self, from: Vec2, to: Vec2, width: f64);
    fn clear_region(&mut self, rect: Rect);
}
impl<S> Surface for &mut S
where
    S: Surface + ?Sized,
{
    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f64, color: Color) {
        (**self).draw_line(from, to, width, color);
    }
    fn draw_curve(&mut self, from: Vec2, ctrl1: Vec2, ctrl2: Vec2, to: Vec2, width: f64, color: Color) {
        (**self).draw_curve(from, ctrl1, ctrl2, to, width, color);
    }
    fn draw_filled_circle(&mut self, center: Vec2, diameter: f64, color: Color) {
        (**self).draw_filled_circle(center, diameter, color);
    }
    fn erase_stroke(&mut self, from: Vec2, to: Vec2, width: f64) {
        (**self).erase_stroke(from, to, width);
    }
    fn clear_region(&mut self, rect: Rect) {
        (**self).clear_region(rect);
    }
}

/// The pair of surfaces curves are drawn onto, and their shared extent.
pub struct Canvas<S: Surface> {
    persistent: S,
    overlay: S,
    extent: Rect,
}
impl<S: Surface> Canvas<S> {
    #[must_use]
    pub fn new(persistent: S, overlay: S, extent: Rect) -> Self {
        Self {
            persistent,
            overlay,
            extent,
        }
    }
    #[must_use]
    pub fn extent(&self) -> Rect {
        self.extent
    }
    pub(crate) fn set_extent(&mut self, extent: Rect) {
        self.extent = extent;
    }
    #[must_use]
    pub fn persistent(&self) -> &S {
        &self.persistent
    }
    pub fn persistent_mut(&mut self) -> &mut S {
        &mut self.persistent
    }
    #[must_use]
    pub fn overlay(&self) -> &S {
        &self.overlay
    }
    pub fn overlay_mut(&mut self) -> &mut S {
        &mut self.overlay
    }
    pub fn clear_persistent(&mut self) {
        self.persistent.clear_region(self.extent);
    }
    pub fn clear_overlay(&mut self) {
        self.overlay.clear_region(self.extent);
    }
    /// Take back ownership of the surfaces, `(persistent, overlay)`.
    pub fn into_surfaces(self) -> (S, S) {
        (self.persistent, self.overlay)
    }
}

/// Issue the draw calls for one segment.
pub fn draw_segment(surface: &mut impl Surface, draw: &SegmentDraw, color: Color) {
    if let Some((center, diameter)) = draw.joint {
        surface.draw_filled_circle(center, diameter, color);
    }
    match draw.segment {
        Segment::Straight { from, to, width } => surface.draw_line(from, to, width, color),
        Segment::Cubic {
            from,
            ctrl1,
            ctrl2,
            to,
            width,
        } => surface.draw_curve(from, ctrl1, ctrl2, to, width, color),
    }
}

/// Draw the dot marking where a curve begins.
pub fn draw_start_dot(surface: &mut impl Surface, curve: &Curve, color: Color) {
    if let Some(first) = curve.first() {
        surface.draw_filled_circle(first.position(), first.width(), color);
    }
}

/// Fully draw a finished curve: its start dot, then every segment.
///
/// One point draws only the dot, two points a single straight line.
pub fn render_curve(
    surface: &mut impl Surface,
    curve: &Curve,
    color: Color,
    params: &SmoothingConfig,
) {
    draw_start_dot(surface, curve, color);
    if let [from, to] = curve.points() {
        surface.draw_line(from.position(), to.position(), to.width(), color);
        return;
    }
    for draw in smoothing::segments(curve.points(), params) {
        draw_segment(surface, &draw, color);
    }
}

/// Draw the part of an in-progress curve that has already been settled onto the persistent surface.
/// The trailing segment is still provisional, and lives on the overlay.
pub fn render_settled(
    surface: &mut impl Surface,
    curve: &Curve,
    color: Color,
    params: &SmoothingConfig,
) {
    draw_start_dot(surface, curve, color);
    let points = curve.points();
    if points.len() < 3 {
        return;
    }
    for idx in 0..points.len() - 2 {
        let draw = smoothing::segment_at(points, idx, params);
        draw_segment(surface, &draw, color);
    }
}

/// Clear the persistent surface and replay every given curve from scratch, in order.
///
/// Ongoing curves are replayed last, up to the point they had been settled.
pub fn render_visible<'c, S: Surface>(
    canvas: &mut Canvas<S>,
    committed: impl IntoIterator<Item = &'c Curve>,
    ongoing: impl IntoIterator<Item = &'c Curve>,
    color_of: impl Fn(ColorKey) -> Color,
    params: &SmoothingConfig,
) {
    canvas.clear_persistent();
    let surface = canvas.persistent_mut();
    let mut count = 0usize;
    for curve in committed {
        render_curve(&mut *surface, curve, color_of(curve.color()), params);
        count += 1;
    }
    for curve in ongoing {
        render_settled(&mut *surface, curve, color_of(curve.color()), params);
    }
    log::trace!("Redrew {count} curves");
}
