//! Utility types, used throughout the crate.

/// Position or direction on a surface, in surface pixels.
pub type Vec2 = ultraviolet::DVec2;

/// An axis-aligned rectangle, extending down-right from `(x, y)`.
#[derive(Copy, Clone, PartialEq, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}
impl Rect {
    /// A rect of the given size, anchored at the origin.
    #[must_use]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        // Also catches NaN sizes.
        !(self.width > 0.0 && self.height > 0.0)
    }
    /// Do `self` and `other` share any point? Touching edges count.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x <= other.x + other.width
            && other.x <= self.x + self.width
            && self.y <= other.y + other.height
            && other.y <= self.y + self.height
    }
}

/// Straight-line distance between two positions.
#[must_use]
pub fn distance(a: Vec2, b: Vec2) -> f64 {
    (a - b).mag()
}

#[cfg(test)]
mod test {
    use super::{distance, Rect, Vec2};
    #[test]
    fn empty_rects() {
        assert!(Rect::default().is_empty());
        assert!(Rect::from_size(10.0, 0.0).is_empty());
        assert!(Rect::from_size(f64::NAN, 10.0).is_empty());
        assert!(!Rect::from_size(1.0, 1.0).is_empty());
    }
    #[test]
    fn overlap() {
        let canvas = Rect::from_size(100.0, 100.0);
        let inside = Rect {
            x: 10.0,
            y: 10.0,
            width: 5.0,
            height: 5.0,
        };
        // Hangs off the top left corner.
        let straddling = Rect {
            x: -2.0,
            y: -2.0,
            width: 4.0,
            height: 4.0,
        };
        let outside = Rect {
            x: 150.0,
            y: 10.0,
            width: 5.0,
            height: 5.0,
        };
        assert!(canvas.intersects(&inside));
        assert!(inside.intersects(&canvas));
        assert!(canvas.intersects(&straddling));
        assert!(!canvas.intersects(&outside));
        assert!(!inside.intersects(&straddling));
    }
    #[test]
    fn pythagoras() {
        let d = distance(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
    }
}
