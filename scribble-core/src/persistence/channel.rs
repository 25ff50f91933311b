//! Sync -> async bridge between a session and its store.

use super::{DrawingKey, DrawingState, DrawingStore, Persistence};
use crate::stroke::{wire::WireCurve, Curve};

#[derive(Clone, Debug, PartialEq)]
pub enum PersistRequest {
    AppendCurve { key: DrawingKey, curve: WireCurve },
    SetDrawingState { key: DrawingKey, state: DrawingState },
}

/// Queues every report for a [`persist_worker`]. Never blocks.
#[derive(Clone)]
pub struct ChannelPersistence {
    send: tokio::sync::mpsc::UnboundedSender<PersistRequest>,
}
impl ChannelPersistence {
    #[must_use]
    pub fn new() -> (Self, tokio::sync::mpsc::UnboundedReceiver<PersistRequest>) {
        let (send, recv) = tokio::sync::mpsc::unbounded_channel();
        (Self { send }, recv)
    }
    fn send(&self, request: PersistRequest) {
        if self.send.send(request).is_err() {
            log::warn!("Persistence worker is gone, change not stored");
        }
    }
}
impl Persistence for ChannelPersistence {
    fn append_curve(&mut self, key: &DrawingKey, curve: &Curve) {
        self.send(PersistRequest::AppendCurve {
            key: key.clone(),
            curve: curve.into(),
        });
    }
    fn set_drawing_state(&mut self, key: &DrawingKey, state: DrawingState) {
        self.send(PersistRequest::SetDrawingState {
            key: key.clone(),
            state,
        });
    }
}

/// Counts of what a [`persist_worker`] did over its life.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub stored: usize,
    pub failed: usize,
}

/// Forward requests to `store` in order, until every sender is dropped.
///
/// Failures are logged, and the request is dropped.
pub async fn persist_worker(
    store: &(impl DrawingStore + ?Sized),
    mut recv: tokio::sync::mpsc::UnboundedReceiver<PersistRequest>,
) -> WorkerReport {
    let mut report = WorkerReport::default();
    // Live as long as there are requests to serve
    while let Some(request) = recv.recv().await {
        let result = match request {
            PersistRequest::AppendCurve { key, curve } => store
                .append_curve(&key, curve)
                .await
                .map_err(|e| (key, "append curve", e)),
            PersistRequest::SetDrawingState { key, state } => store
                .set_drawing_state(&key, state)
                .await
                .map_err(|e| (key, "set drawing state", e)),
        };
        match result {
            Ok(()) => report.stored += 1,
            Err((key, what, e)) => {
                log::warn!("Failed to {what} for {key:?}: {e}");
                report.failed += 1;
            }
        }
    }
    log::debug!(
        "Persistence worker done, {} stored, {} failed",
        report.stored,
        report.failed
    );
    report
}
