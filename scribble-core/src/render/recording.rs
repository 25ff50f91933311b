//! A [`Surface`] that records every call instead of drawing, for inspecting what the renderer issues.

use super::Surface;
use crate::{
    color::Color,
    util::{Rect, Vec2},
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DrawCall {
    Line {
        from: Vec2,
        to: Vec2,
        width: f64,
        color: Color,
    },
    Curve {
        from: Vec2,
        ctrl1: Vec2,
        ctrl2: Vec2,
        to: Vec2,
        width: f64,
        color: Color,
    },
    Circle {
        center: Vec2,
        diameter: f64,
        color: Color,
    },
    Erase {
        from: Vec2,
        to: Vec2,
        width: f64,
    },
    Clear(Rect),
}

#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<DrawCall>,
}
impl RecordingSurface {
    #[must_use]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }
    /// Take every call recorded so far, leaving the recording empty.
    pub fn take(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }
    fn count(&self, pred: impl Fn(&DrawCall) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }
    #[must_use]
    pub fn lines(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::Line { .. }))
    }
    #[must_use]
    pub fn curves(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::Curve { .. }))
    }
    #[must_use]
    pub fn circles(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::Circle { .. }))
    }
    #[must_use]
    pub fn erases(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::Erase { .. }))
    }
    #[must_use]
    pub fn clears(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::Clear(_)))
    }
}
impl Surface for RecordingSurface {
    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f64, color: Color) {
        self.calls.push(DrawCall::Line {
            from,
            to,
            width,
            color,
        });
    }
    fn draw_curve(&mut self, from: Vec2, ctrl1: Vec2, ctrl2: Vec2, to: Vec2, width: f64, color: Color) {
        self.calls.push(DrawCall::Curve {
            from,
            ctrl1,
            ctrl2,
            to,
            width,
            color,
        });
    }
    fn draw_filled_circle(&mut self, center: Vec2, diameter: f64, color: Color) {
        self.calls.push(DrawCall::Circle {
            center,
            diameter,
            color,
        });
    }
    fn erase_stroke(&mut self, from: Vec2, to: Vec2, width: f64) {
        self.calls.push(DrawCall::Erase { from, to, width });
    }
    fn clear_region(&mut self, rect: Rect) {
        self.calls.push(DrawCall::Clear(rect));
    }
}
