//! # Curve builder
//!
//! Turns live pointer sample streams into growing [`Curve`]s, one ongoing curve per pointer.
//! The builder knows nothing of rendering or history, callers react to what each method returns.

use crate::{
    color::ColorKey,
    stroke::{Curve, Point, Sample, SequenceIndex},
};

/// Identifier of a pointer, as reported by the input source.
pub type PointerId = i64;

/// Which button started a stroke. Only [`InputButton::Primary`] draws.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputButton {
    #[default]
    Primary,
    /// Right mouse, or the barrel button of a pen. Reserved for menus.
    Secondary,
    Other,
}

/// Outcome of ending a stroke.
#[derive(Debug, PartialEq)]
pub enum Finish {
    /// The stroke ended normally and should be committed.
    Completed {
        curve: Curve,
        /// Whether the final sample added a point, which still needs its provisional draw.
        appended_final: bool,
    },
    /// The stroke was cancelled. The curve must not be committed.
    Cancelled(Curve),
    /// No stroke was ongoing for that pointer.
    Idle,
}

/// Outcome of starting a stroke.
#[derive(Debug, PartialEq)]
pub enum Start {
    /// A fresh curve began for the pointer.
    Began {
        /// The curve the pointer was still drawing, dropped uncommitted.
        replaced: Option<Curve>,
    },
    /// The button does not draw.
    Ignored,
}

/// The per-pointer in-progress curves.
pub struct CurveBuilder {
    ongoing: hashbrown::HashMap<PointerId, Curve>,
    max_width_delta: f64,
}
impl CurveBuilder {
    #[must_use]
    pub fn new(max_width_delta: f64) -> Self {
        Self {
            ongoing: hashbrown::HashMap::new(),
            max_width_delta,
        }
    }
    /// Begin a curve for this pointer, readable through [`Self::get`] afterwards.
    ///
    /// A curve already ongoing for the pointer is dropped uncommitted and handed back, its drawing
    /// is the caller's to undo.
    pub fn start(
        &mut self,
        pointer: PointerId,
        button: InputButton,
        sample: &Sample,
        sequence_index: SequenceIndex,
        color: ColorKey,
        width_class: f64,
    ) -> Start {
        if button != InputButton::Primary {
            return Start::Ignored;
        }
        let curve = Curve::new(
            sequence_index,
            color,
            width_class,
            Point::first(sample, width_class),
        );
        let replaced = self.ongoing.insert(pointer, curve);
        if replaced.is_some() {
            log::debug!("Pointer {pointer} restarted mid-stroke, dropping its old curve");
        }
        Start::Began { replaced }
    }
    /// Append a sample to the pointer's curve. `None` if the pointer is not drawing.
    pub fn extend(&mut self, pointer: PointerId, sample: &Sample) -> Option<&Curve> {
        let max_delta = self.max_width_delta;
        let curve = self.ongoing.get_mut(&pointer)?;
        Self::append(curve, sample, max_delta);
        Some(&*curve)
    }
    fn append(curve: &mut Curve, sample: &Sample, max_delta: f64) {
        let prev_width = curve.last().map_or(0.0, Point::width);
        let point = Point::following(sample, curve.width_class(), prev_width, max_delta);
        curve.push(point);
    }
    /// End the pointer's stroke.
    ///
    /// With a final sample, it is appended (unless it sits exactly on the last point, so a tap
    /// stays a single point) and the curve is completed. Without one, the stroke is cancelled:
    /// there is no reliable final position to draw to.
    pub fn finish(&mut self, pointer: PointerId, sample: Option<&Sample>) -> Finish {
        let Some(mut curve) = self.ongoing.remove(&pointer) else {
            return Finish::Idle;
        };
        let Some(sample) = sample else {
            return Finish::Cancelled(curve);
        };
        let coincident = curve
            .last()
            .is_some_and(|last| last.x() == sample.x && last.y() == sample.y);
        if !coincident {
            Self::append(&mut curve, sample, self.max_width_delta);
        }
        Finish::Completed {
            curve,
            appended_final: !coincident,
        }
    }
    /// Discard the pointer's stroke. Shorthand for `finish(pointer, None)`.
    pub fn cancel(&mut self, pointer: PointerId) -> Option<Curve> {
        match self.finish(pointer, None) {
            Finish::Cancelled(curve) => Some(curve),
            _ => None,
        }
    }
    #[must_use]
    pub fn get(&self, pointer: PointerId) -> Option<&Curve> {
        self.ongoing.get(&pointer)
    }
    #[must_use]
    pub fn is_drawing(&self, pointer: PointerId) -> bool {
        self.ongoing.contains_key(&pointer)
    }
    /// Number of strokes currently in progress, across all pointers.
    #[must_use]
    pub fn ongoing_count(&self) -> usize {
        self.ongoing.len()
    }
    /// All in-progress curves, in ascending sequence order.
    #[must_use]
    pub fn ongoing(&self) -> Vec<&Curve> {
        let mut curves: Vec<_> = self.ongoing.values().collect();
        curves.sort_by_key(|curve| curve.sequence_index());
        curves
    }
}
