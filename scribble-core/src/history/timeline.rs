//! The committed curves, in ascending sequence order.

use crate::stroke::{Curve, SequenceIndex};

#[derive(Clone, Debug, Default)]
pub struct Timeline {
    /// Invariant: strictly ascending by sequence index.
    curves: Vec<Curve>,
}
impl Timeline {
    /// Rebuild from curves in storage order, replaying the commit rule over each.
    #[must_use]
    pub fn seed(curves: impl IntoIterator<Item = Curve>) -> Self {
        let mut timeline = Self::default();
        for curve in curves {
            timeline.commit(curve);
        }
        timeline
    }
    /// Drop every curve at or after `curve`'s sequence index, then append it.
    pub fn commit(&mut self, curve: Curve) -> &Curve {
        let sequence_index = curve.sequence_index();
        let keep = self
            .curves
            .partition_point(|existing| existing.sequence_index() < sequence_index);
        if keep != self.curves.len() {
            log::debug!(
                "Dropping {} superseded curves",
                self.curves.len() - keep
            );
        }
        self.curves.truncate(keep);
        self.curves.push(curve);
        // Just pushed.
        &self.curves[self.curves.len() - 1]
    }
    /// Curves visible at `valid_index`, in draw order.
    pub fn visible(&self, valid_index: SequenceIndex) -> impl Iterator<Item = &Curve> + '_ {
        self.curves
            .iter()
            .take_while(move |curve| curve.sequence_index() <= valid_index)
    }
    #[must_use]
    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }
    /// Highest sequence index held, or `-1` if empty.
    #[must_use]
    pub fn max_index(&self) -> SequenceIndex {
        self.curves.last().map_or(-1, Curve::sequence_index)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::Timeline;
    use crate::color::ColorKey;
    use crate::stroke::{Curve, Point, Sample};

    fn curve(sequence_index: i64) -> Curve {
        Curve::new(
            sequence_index,
            ColorKey::Default,
            5.0,
            Point::first(&Sample::new(0.0, 0.0, Some(0.5), 0), 5.0),
        )
    }
    fn indices<'a>(curves: impl Iterator<Item = &'a Curve>) -> Vec<i64> {
        curves.map(Curve::sequence_index).collect()
    }
    #[test]
    fn commit_truncates() {
        let mut timeline = Timeline::default();
        for i in 0..4 {
            timeline.commit(curve(i));
        }
        timeline.commit(curve(2));
        assert_eq!(indices(timeline.curves().iter()), [0, 1, 2]);
        timeline.commit(curve(0));
        assert_eq!(indices(timeline.curves().iter()), [0]);
    }
    #[test]
    fn visibility_bound() {
        let timeline = Timeline::seed((0..5).map(curve));
        assert_eq!(indices(timeline.visible(2)), [0, 1, 2]);
        assert_eq!(indices(timeline.visible(-1)), Vec::<i64>::new());
        assert_eq!(indices(timeline.visible(10)), [0, 1, 2, 3, 4]);
    }
    #[test]
    fn seed_replays_truncation() {
        // Stored after an undo: curve 2 was superseded by a new curve 1.
        let timeline = Timeline::seed([0, 1, 2, 1, 2].into_iter().map(curve));
        assert_eq!(indices(timeline.curves().iter()), [0, 1, 2]);
        assert_eq!(timeline.max_index(), 2);
        assert_eq!(Timeline::default().max_index(), -1);
    }
}
