//! # Strokes
//!
//! Raw pointer samples, and the curves built from them. A [`Curve`] always holds at least one [`Point`].

pub mod wire;

use crate::{color::ColorKey, util::Vec2};

/// Milliseconds since the unix epoch.
pub type Timestamp = i64;

/// A single raw measurement of the pointer, as delivered by the input source.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    /// Normalized pressure. Devices without pressure report `None`.
    #[serde(default)]
    pub pressure: Option<f64>,
    pub timestamp: Timestamp,
}
impl Sample {
    #[must_use]
    pub fn new(x: f64, y: f64, pressure: Option<f64>, timestamp: Timestamp) -> Self {
        Self {
            x,
            y,
            pressure,
            timestamp,
        }
    }
    /// Pressure clamped to `[0, 1]`. Missing or non-finite pressure reads as zero.
    #[must_use]
    pub fn pressure(&self) -> f64 {
        self.pressure
            .filter(|p| p.is_finite())
            .map_or(0.0, |p| p.clamp(0.0, 1.0))
    }
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
    /// Samples with a non-finite position cannot be drawn.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A point of a curve. Immutable once created.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
    pressure: f64,
    width: f64,
    timestamp: Timestamp,
}
impl Point {
    /// The first point of a curve, where width follows pressure directly.
    #[must_use]
    pub fn first(sample: &Sample, width_class: f64) -> Self {
        let pressure = sample.pressure();
        Self {
            x: sample.x,
            y: sample.y,
            pressure,
            width: (pressure * width_class).max(0.0),
            timestamp: sample.timestamp,
        }
    }
    /// A point following one of width `prev_width`. The pressure-derived width is bounded to within
    /// `max_delta` of `prev_width`.
    #[must_use]
    pub fn following(sample: &Sample, width_class: f64, prev_width: f64, max_delta: f64) -> Self {
        let pressure = sample.pressure();
        // Not `f64::clamp`, that panics on a bad range rather than saturating.
        let width = (pressure * width_class)
            .max(prev_width - max_delta)
            .min(prev_width + max_delta)
            .max(0.0);
        Self {
            x: sample.x,
            y: sample.y,
            pressure,
            width,
            timestamp: sample.timestamp,
        }
    }
    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }
    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
    #[must_use]
    pub fn pressure(&self) -> f64 {
        self.pressure
    }
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// Index of a curve in the committed timeline. `-1` denotes "before any curve".
pub type SequenceIndex = i64;

/// A drawn curve: its style and its points, in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    sequence_index: SequenceIndex,
    color: ColorKey,
    width_class: f64,
    /// Invariant: never empty.
    points: Vec<Point>,
}
impl Curve {
    #[must_use]
    pub fn new(sequence_index: SequenceIndex, color: ColorKey, width_class: f64, first: Point) -> Self {
        Self {
            sequence_index,
            color,
            width_class,
            points: vec![first],
        }
    }
    /// Create a curve from existing points, `None` if there are none.
    #[must_use]
    pub fn from_points(
        sequence_index: SequenceIndex,
        color: ColorKey,
        width_class: f64,
        points: Vec<Point>,
    ) -> Option<Self> {
        (!points.is_empty()).then_some(Self {
            sequence_index,
            color,
            width_class,
            points,
        })
    }
    #[must_use]
    pub fn sequence_index(&self) -> SequenceIndex {
        self.sequence_index
    }
    #[must_use]
    pub fn color(&self) -> ColorKey {
        self.color
    }
    #[must_use]
    pub fn width_class(&self) -> f64 {
        self.width_class
    }
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }
    /// Always false, curves hold at least one point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }
    pub(crate) fn push(&mut self, point: Point) {
        self.points.push(point);
    }
    pub(crate) fn set_sequence_index(&mut self, sequence_index: SequenceIndex) {
        self.sequence_index = sequence_index;
    }
    /// Summary of how the curve was drawn.
    #[must_use]
    pub fn stats(&self) -> CurveStats {
        let length = self
            .points
            .windows(2)
            .map(|pair| crate::util::distance(pair[0].position(), pair[1].position()))
            .sum::<f64>();
        let duration_ms = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => 0,
        };
        #[allow(clippy::cast_precision_loss)]
        let (average_interval_ms, average_speed) = if duration_ms > 0 {
            (
                duration_ms as f64 / self.points.len() as f64,
                length / duration_ms as f64,
            )
        } else {
            (0.0, 0.0)
        };
        CurveStats {
            length,
            duration_ms,
            average_interval_ms,
            average_speed,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CurveStats {
    /// Total length of the polyline through every point, in pixels.
    pub length: f64,
    pub duration_ms: i64,
    pub average_interval_ms: f64,
    /// Pixels per millisecond.
    pub average_speed: f64,
}
