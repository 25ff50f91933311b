//! # Persistence
//!
//! The drawing store is remote and slow, drawing must never wait on it. Sessions report through the
//! non-blocking [`Persistence`] trait, and a [`channel::persist_worker`] forwards those reports to a
//! [`DrawingStore`] at its own pace. Failures are logged and forgotten: local state is authoritative
//! for as long as the session lives, nothing is retried or reconciled.

pub mod channel;
pub mod memory;

pub use channel::{persist_worker, ChannelPersistence, PersistRequest, WorkerReport};
pub use memory::InMemoryStore;

use crate::stroke::{
    wire::{WireCurve, WireError},
    Curve, SequenceIndex,
};

/// Opaque identifier of a drawing within a store.
pub type DrawingKey = String;

/// Undo/redo position of a drawing, as last reported.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DrawingState {
    pub valid_index: SequenceIndex,
}

#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    #[error("unknown drawing {0:?}")]
    UnknownDrawing(DrawingKey),
    #[error("store unavailable")]
    Unavailable,
    #[error("stored curve is malformed: {0}")]
    Malformed(#[from] WireError),
}

#[async_trait::async_trait]
pub trait DrawingStore: Send + Sync {
    /// Record a newly committed curve.
    async fn append_curve(&self, key: &DrawingKey, curve: WireCurve) -> Result<(), PersistError>;
    async fn set_drawing_state(
        &self,
        key: &DrawingKey,
        state: DrawingState,
    ) -> Result<(), PersistError>;
    /// Every curve ever appended, in storage order.
    async fn load_curves(&self, key: &DrawingKey) -> Result<Vec<WireCurve>, PersistError>;
    /// The last reported state, if any was.
    async fn load_state(&self, key: &DrawingKey) -> Result<Option<DrawingState>, PersistError>;
}

/// Load a drawing, ready for [`crate::session::DrawingSession::seed`].
///
/// Curves without a stored sequence index take their position in storage order.
pub async fn load(
    store: &(impl DrawingStore + ?Sized),
    key: &DrawingKey,
) -> Result<(Vec<Curve>, Option<DrawingState>), PersistError> {
    let curves = store
        .load_curves(key)
        .await?
        .into_iter()
        .zip(0..)
        .map(|(wire, storage_index)| wire.into_curve(storage_index))
        .collect::<Result<Vec<_>, _>>()?;
    let state = store.load_state(key).await?;
    log::info!("Loaded {} curves of {key:?}", curves.len());
    Ok((curves, state))
}

/// Where a session reports its changes. Must not block.
pub trait Persistence {
    fn append_curve(&mut self, key: &DrawingKey, curve: &Curve);
    fn set_drawing_state(&mut self, key: &DrawingKey, state: DrawingState);
}

/// Reports go nowhere. For drawings that are not stored.
#[derive(Copy, Clone, Debug, Default)]
pub struct Offline;
impl Persistence for Offline {
    fn append_curve(&mut self, _: &DrawingKey, _: &Curve) {}
    fn set_drawing_state(&mut self, _: &DrawingKey, _: DrawingState) {}
}
