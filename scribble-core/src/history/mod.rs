//! # History
//!
//! Undo and redo are navigation over a log of checkpoints, each naming the highest visible sequence index.
//! Nothing is ever recomputed: moving the cursor changes which curves pass the visibility filter, and the
//! canvas is redrawn from scratch.
//!
//! The log is linear. Committing after an undo destroys the redo branch, along with the curves it held.
//! A clear seals everything before it: the clear cannot be undone, and the next commit starts a fresh log.

pub mod timeline;

pub use timeline::Timeline;

use crate::stroke::{Curve, SequenceIndex};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    pub valid_index: SequenceIndex,
    pub is_clear_marker: bool,
}
impl Checkpoint {
    const EMPTY: Self = Self {
        valid_index: -1,
        is_clear_marker: false,
    };
    const CLEAR: Self = Self {
        valid_index: -1,
        is_clear_marker: true,
    };
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    #[error("checkpoint {target} out of range 0..{len}")]
    OutOfRange { target: i64, len: usize },
    #[error("checkpoint {target} lies before the clear at {seal}")]
    Sealed { target: i64, seal: usize },
}

/// The checkpoint log and its cursor.
#[derive(Clone, Debug)]
pub struct DrawingHistory {
    /// Invariant: never empty.
    checkpoints: Vec<Checkpoint>,
    /// Invariant: `< checkpoints.len()`.
    cursor: usize,
}
impl Default for DrawingHistory {
    fn default() -> Self {
        Self::from_valid_index(-1)
    }
}
impl DrawingHistory {
    /// A log with a single checkpoint, for drawings loaded without their undo history.
    #[must_use]
    pub fn from_valid_index(valid_index: SequenceIndex) -> Self {
        Self {
            checkpoints: vec![Checkpoint {
                valid_index,
                is_clear_marker: false,
            }],
            cursor: 0,
        }
    }
    #[must_use]
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    #[must_use]
    pub fn current(&self) -> Checkpoint {
        self.checkpoints[self.cursor]
    }
    #[must_use]
    pub fn valid_index(&self) -> SequenceIndex {
        self.current().valid_index
    }
    pub fn commit(&mut self, sequence_index: SequenceIndex) {
        self.append(Checkpoint {
            valid_index: sequence_index,
            is_clear_marker: false,
        });
    }
    pub fn clear(&mut self) {
        self.append(Checkpoint::CLEAR);
    }
    fn append(&mut self, checkpoint: Checkpoint) {
        if self.current().is_clear_marker {
            self.checkpoints.clear();
            self.checkpoints.push(Checkpoint::EMPTY);
        } else {
            self.checkpoints.truncate(self.cursor + 1);
        }
        self.checkpoints.push(checkpoint);
        self.cursor = self.checkpoints.len() - 1;
    }
    /// Index of the most recent clear marker, before which navigation is refused.
    fn seal(&self) -> Option<usize> {
        self.checkpoints
            .iter()
            .rposition(|checkpoint| checkpoint.is_clear_marker)
    }
    /// Move the cursor to `target`, returning the new valid index. On error, nothing changes.
    pub fn navigate(&mut self, target: i64) -> Result<SequenceIndex, HistoryError> {
        let len = self.checkpoints.len();
        let index = usize::try_from(target)
            .ok()
            .filter(|&index| index < len)
            .ok_or(HistoryError::OutOfRange { target, len })?;
        if let Some(seal) = self.seal().filter(|&seal| index < seal) {
            return Err(HistoryError::Sealed { target, seal });
        }
        self.cursor = index;
        Ok(self.valid_index())
    }
    pub fn undo(&mut self) -> Result<SequenceIndex, HistoryError> {
        self.navigate(self.cursor_i64() - 1)
    }
    pub fn redo(&mut self) -> Result<SequenceIndex, HistoryError> {
        self.navigate(self.cursor_i64() + 1)
    }
    fn cursor_i64(&self) -> i64 {
        // The log would exhaust memory long before overflowing this.
        i64::try_from(self.cursor).unwrap_or(i64::MAX)
    }
}

/// The checkpoint log together with the curves it governs.
#[derive(Clone, Debug, Default)]
pub struct HistoryManager {
    log: DrawingHistory,
    timeline: Timeline,
}
impl HistoryManager {
    /// Rebuild from stored curves, in storage order.
    ///
    /// Visibility is bounded by `valid_index` when known (clamped to the stored curves), otherwise
    /// everything stored is visible.
    #[must_use]
    pub fn seed(curves: impl IntoIterator<Item = Curve>, valid_index: Option<SequenceIndex>) -> Self {
        let timeline = Timeline::seed(curves);
        let max = timeline.max_index();
        let valid_index = valid_index.map_or(max, |valid| valid.clamp(-1, max));
        Self {
            log: DrawingHistory::from_valid_index(valid_index),
            timeline,
        }
    }
    #[must_use]
    pub fn log(&self) -> &DrawingHistory {
        &self.log
    }
    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }
    #[must_use]
    pub fn valid_index(&self) -> SequenceIndex {
        self.log.valid_index()
    }
    /// The sequence index the next committed curve will receive.
    #[must_use]
    pub fn next_sequence_index(&self) -> SequenceIndex {
        self.valid_index() + 1
    }
    /// Commit a finished curve. It is stamped with [`Self::next_sequence_index`], which differs from the
    /// index it started with if another curve was committed, or history navigated, while it was drawn.
    pub fn commit(&mut self, mut curve: Curve) -> &Curve {
        let sequence_index = self.next_sequence_index();
        if curve.sequence_index() != sequence_index {
            log::debug!(
                "Restamping curve {} as {sequence_index}",
                curve.sequence_index()
            );
            curve.set_sequence_index(sequence_index);
        }
        self.log.commit(sequence_index);
        self.timeline.commit(curve)
    }
    /// Hide everything. Curves stay in the timeline until superseded by the next commit.
    pub fn clear(&mut self) {
        self.log.clear();
    }
    pub fn navigate(&mut self, target: i64) -> Result<SequenceIndex, HistoryError> {
        self.log.navigate(target)
    }
    pub fn undo(&mut self) -> Result<SequenceIndex, HistoryError> {
        self.log.undo()
    }
    pub fn redo(&mut self) -> Result<SequenceIndex, HistoryError> {
        self.log.redo()
    }
    /// Curves passing the visibility filter, in draw order.
    pub fn visible(&self) -> impl Iterator<Item = &Curve> + '_ {
        self.timeline.visible(self.valid_index())
    }
}
