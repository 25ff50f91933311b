//! A [`Surface`] that builds an SVG document.

use scribble_core::{
    color::Color,
    render::Surface,
    util::{Rect, Vec2},
};
use std::fmt::Write;

/// Markup of one shape, with the bounds it paints within.
struct Element {
    bounds: Rect,
    markup: String,
}

/// Bounds of `points`, grown by `pad` on every side.
fn bounds(points: &[Vec2], pad: f64) -> Rect {
    let (mut min, mut max) = (Vec2::broadcast(f64::INFINITY), Vec2::broadcast(f64::NEG_INFINITY));
    for point in points {
        min = min.min_by_component(*point);
        max = max.max_by_component(*point);
    }
    Rect {
        x: min.x - pad,
        y: min.y - pad,
        width: max.x - min.x + pad * 2.0,
        height: max.y - min.y + pad * 2.0,
    }
}

#[derive(Default)]
pub struct SvgSurface {
    elements: Vec<Element>,
    /// Destination-out strokes, applied as a mask over every element.
    erasures: Vec<Element>,
}
impl SvgSurface {
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
    /// Render the document at `extent`, over a solid `background`.
    #[must_use]
    pub fn to_svg(&self, extent: Rect, background: Color) -> String {
        let Rect {
            x,
            y,
            width,
            height,
        } = extent;
        let mut svg = String::new();
        // Writes to a String are infallible.
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{x} {y} {width} {height}" width="{width}" height="{height}">"#
        );
        let _ = writeln!(
            svg,
            r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{background}"/>"#
        );
        if self.erasures.is_empty() {
            for element in &self.elements {
                let _ = writeln!(svg, "{}", element.markup);
            }
        } else {
            let _ = writeln!(svg, r#"<mask id="erased" maskUnits="userSpaceOnUse">"#);
            let _ = writeln!(
                svg,
                r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="white"/>"#
            );
            for erasure in &self.erasures {
                let _ = writeln!(svg, "{}", erasure.markup);
            }
            let _ = writeln!(svg, r#"</mask><g mask="url(#erased)">"#);
            for element in &self.elements {
                let _ = writeln!(svg, "{}", element.markup);
            }
            let _ = writeln!(svg, "</g>");
        }
        svg.push_str("</svg>\n");
        svg
    }
}
impl Surface for SvgSurface {
    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f64, color: Color) {
        self.elements.push(Element {
            bounds: bounds(&[from, to], width / 2.0),
            markup: format!(
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{color}" stroke-width="{width:.2}" stroke-linecap="round"/>"#,
                from.x, from.y, to.x, to.y
            ),
        });
    }
    fn draw_curve(&mut self, from: Vec2, ctrl1: Vec2, ctrl2: Vec2, to: Vec2, width: f64, color: Color) {
        // A cubic lies within the hull of its control points.
        self.elements.push(Element {
            bounds: bounds(&[from, ctrl1, ctrl2, to], width / 2.0),
            markup: format!(
                r#"<path d="M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}" fill="none" stroke="{color}" stroke-width="{width:.2}" stroke-linecap="round"/>"#,
                from.x, from.y, ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
            ),
        });
    }
    fn draw_filled_circle(&mut self, center: Vec2, diameter: f64, color: Color) {
        self.elements.push(Element {
            bounds: bounds(&[center], diameter / 2.0),
            markup: format!(
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{color}"/>"#,
                center.x,
                center.y,
                diameter / 2.0
            ),
        });
    }
    fn erase_stroke(&mut self, from: Vec2, to: Vec2, width: f64) {
        self.erasures.push(Element {
            bounds: bounds(&[from, to], width / 2.0),
            markup: format!(
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="black" stroke-width="{width:.2}" stroke-linecap="round"/>"#,
                from.x, from.y, to.x, to.y
            ),
        });
    }
    fn clear_region(&mut self, rect: Rect) {
        // Shapes cannot be cut, any shape touching `rect` goes. The viewBox clips what hangs off the edge.
        let before = self.elements.len();
        self.elements
            .retain(|element| !rect.intersects(&element.bounds));
        self.erasures
            .retain(|erasure| !rect.intersects(&erasure.bounds));
        log::trace!("Cleared {} elements", before - self.elements.len());
    }
}
