//! Feeding scripted input through a session, with its persistence worker alongside.

use crate::{events::InputEvent, svg::SvgSurface};
use scribble_core::{
    color::ColorMode,
    config::Config,
    persistence::{self, ChannelPersistence, DrawingKey, InMemoryStore, Offline, WorkerReport},
    render::{Canvas, RecordingSurface},
    stroke::SequenceIndex,
    util::Rect,
    DrawingSession,
};

/// The state a replay left its drawing in.
pub struct Outcome {
    pub canvas: Canvas<SvgSurface>,
    pub valid_index: SequenceIndex,
    pub visible: usize,
    pub color_mode: ColorMode,
}

async fn feed(
    events: Vec<InputEvent>,
    send: tokio::sync::mpsc::Sender<InputEvent>,
) -> anyhow::Result<()> {
    for event in events {
        send.send(event)
            .await
            .map_err(|_| anyhow::anyhow!("session stopped accepting input"))?;
    }
    Ok(())
}

async fn drive(
    mut session: DrawingSession<SvgSurface, ChannelPersistence>,
    mut recv: tokio::sync::mpsc::Receiver<InputEvent>,
) -> anyhow::Result<Outcome> {
    let mut handled = 0usize;
    while let Some(event) = recv.recv().await {
        event.apply(&mut session);
        handled += 1;
    }
    log::info!("Handled {handled} input events");
    let valid_index = session.valid_index();
    let visible = session.history().visible().count();
    let color_mode = session.color_mode();
    // Drops the persistence sender, letting the worker finish.
    let canvas = session.into_canvas();
    Ok(Outcome {
        canvas,
        valid_index,
        visible,
        color_mode,
    })
}

/// Replay `events` onto the stored drawing `key`.
pub async fn run(
    events: Vec<InputEvent>,
    config: &Config,
    store: &InMemoryStore,
    key: DrawingKey,
    extent: Rect,
) -> anyhow::Result<Outcome> {
    let (curves, state) = persistence::load(store, &key).await?;
    let (persistence, persist_recv) = ChannelPersistence::new();
    let canvas = Canvas::new(SvgSurface::default(), SvgSurface::default(), extent);
    let mut session = DrawingSession::new(key, canvas, persistence, config);
    session.seed(curves, state);

    let (send, recv) = tokio::sync::mpsc::channel(64);
    // between current_thread runtime and try_join, these tasks are
    // not actually run in parallel, just interleaved.
    let ((), outcome, report) = tokio::try_join!(feed(events, send), drive(session, recv), async {
        Ok::<WorkerReport, anyhow::Error>(persistence::persist_worker(store, persist_recv).await)
    })?;
    if report.failed != 0 {
        log::warn!("{} changes were not stored", report.failed);
    }
    Ok(outcome)
}

/// Load the stored drawing into a fresh session, as a later visit would see it.
/// Returns its valid index and number of visible curves.
pub async fn reload(
    config: &Config,
    store: &InMemoryStore,
    key: &DrawingKey,
) -> anyhow::Result<(SequenceIndex, usize)> {
    let (curves, state) = persistence::load(store, key).await?;
    let canvas = Canvas::new(
        RecordingSurface::default(),
        RecordingSurface::default(),
        Rect::default(),
    );
    let mut session = DrawingSession::new(key.clone(), canvas, Offline, config);
    session.seed(curves, state);
    Ok((session.valid_index(), session.history().visible().count()))
}

#[cfg(test)]
mod test {
    use super::{reload, run};
    use crate::events::parse_script;
    use scribble_core::{config::Config, persistence::InMemoryStore, util::Rect};

    const SCRIPT: &str = r#"
        {"type": "down", "pointer": 1, "x": 10, "y": 10, "pressure": 0.5, "timestamp": 0}
        {"type": "move", "pointer": 1, "x": 60, "y": 30, "pressure": 0.6, "timestamp": 16}
        {"type": "move", "pointer": 1, "x": 110, "y": 10, "pressure": 0.6, "timestamp": 32}
        {"type": "up", "pointer": 1, "x": 160, "y": 40, "pressure": 0.5, "timestamp": 48}
        {"type": "down", "pointer": 1, "x": 200, "y": 200, "pressure": 0.5, "timestamp": 100}
        {"type": "up", "pointer": 1, "x": 200, "y": 200, "pressure": 0.5, "timestamp": 120}
        {"type": "command", "command": "undo"}
    "#;

    #[tokio::test]
    async fn replay_round_trips() {
        let config = Config::default();
        let store = InMemoryStore::default();
        let key = store.insert_new();
        let events = parse_script(SCRIPT).unwrap();

        let outcome = run(events, &config, &store, key.clone(), Rect::from_size(300.0, 300.0))
            .await
            .unwrap();
        assert_eq!(outcome.valid_index, 0);
        assert_eq!(outcome.visible, 1);
        assert!(!outcome.canvas.persistent().is_empty());

        // Both curves were stored, the undo is remembered.
        assert_eq!(store.snapshot(&key).unwrap().curves.len(), 2);
        assert_eq!(reload(&config, &store, &key).await.unwrap(), (0, 1));
    }
    #[tokio::test]
    async fn continues_stored_drawing() {
        let config = Config::default();
        let store = InMemoryStore::default();
        let key = store.insert_new();
        run(
            parse_script(SCRIPT).unwrap(),
            &config,
            &store,
            key.clone(),
            Rect::from_size(300.0, 300.0),
        )
        .await
        .unwrap();
        // The second visit draws over the undone tap.
        let outcome = run(
            parse_script(SCRIPT).unwrap(),
            &config,
            &store,
            key.clone(),
            Rect::from_size(300.0, 300.0),
        )
        .await
        .unwrap();
        assert_eq!(outcome.valid_index, 1);
        assert_eq!(reload(&config, &store, &key).await.unwrap(), (1, 2));
    }
}
