//! A [`DrawingStore`] held in memory, for tests and hosts without a backend.

use super::{DrawingKey, DrawingState, DrawingStore, PersistError};
use crate::stroke::wire::WireCurve;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoredDrawing {
    pub curves: Vec<WireCurve>,
    pub state: Option<DrawingState>,
}

#[derive(Default)]
pub struct InMemoryStore {
    drawings: parking_lot::RwLock<hashbrown::HashMap<DrawingKey, StoredDrawing>>,
    next_key: std::sync::atomic::AtomicU64,
    failing: std::sync::atomic::AtomicBool,
}
impl InMemoryStore {
    /// Create an empty drawing, returning its key.
    pub fn insert_new(&self) -> DrawingKey {
        let id = self
            .next_key
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let key = format!("drawing-{id}");
        self.drawings
            .write()
            .insert(key.clone(), StoredDrawing::default());
        key
    }
    /// While set, every request fails with [`PersistError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing
            .store(failing, std::sync::atomic::Ordering::Relaxed);
    }
    /// A copy of everything stored for `key`.
    #[must_use]
    pub fn snapshot(&self, key: &DrawingKey) -> Option<StoredDrawing> {
        self.drawings.read().get(key).cloned()
    }
    fn check_available(&self) -> Result<(), PersistError> {
        if self.failing.load(std::sync::atomic::Ordering::Relaxed) {
            Err(PersistError::Unavailable)
        } else {
            Ok(())
        }
    }
    fn with_drawing<T>(
        &self,
        key: &DrawingKey,
        f: impl FnOnce(&mut StoredDrawing) -> T,
    ) -> Result<T, PersistError> {
        self.check_available()?;
        let mut drawings = self.drawings.write();
        let drawing = drawings
            .get_mut(key)
            .ok_or_else(|| PersistError::UnknownDrawing(key.clone()))?;
        Ok(f(drawing))
    }
}

#[async_trait::async_trait]
impl DrawingStore for InMemoryStore {
    async fn append_curve(&self, key: &DrawingKey, curve: WireCurve) -> Result<(), PersistError> {
        self.with_drawing(key, |drawing| drawing.curves.push(curve))
    }
    async fn set_drawing_state(
        &self,
        key: &DrawingKey,
        state: DrawingState,
    ) -> Result<(), PersistError> {
        self.with_drawing(key, |drawing| drawing.state = Some(state))
    }
    async fn load_curves(&self, key: &DrawingKey) -> Result<Vec<WireCurve>, PersistError> {
        self.with_drawing(key, |drawing| drawing.curves.clone())
    }
    async fn load_state(&self, key: &DrawingKey) -> Result<Option<DrawingState>, PersistError> {
        self.with_drawing(key, |drawing| drawing.state)
    }
}
