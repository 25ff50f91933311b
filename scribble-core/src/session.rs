//! # Drawing session
//!
//! Everything one open drawing needs: in-progress strokes, committed history, the canvas, and the active
//! pen. Every entry point runs to completion and never blocks, so a host may call them straight from its
//! event loop, or feed them from a channel of input events.

use crate::{
    builder::{CurveBuilder, Finish, InputButton, PointerId, Start},
    color::{Color, ColorKey, ColorMode},
    commands::Command,
    config::Config,
    history::{HistoryError, HistoryManager},
    palette::Palette,
    persistence::{DrawingKey, DrawingState, Persistence},
    render::{self, Canvas, LiveRenderer, Surface},
    stroke::{Curve, Sample, SequenceIndex},
    util::Rect,
};

pub struct DrawingSession<S: Surface, P: Persistence> {
    key: DrawingKey,
    builder: CurveBuilder,
    history: HistoryManager,
    canvas: Canvas<S>,
    live: LiveRenderer,
    palette: Palette,
    persistence: P,
    active_color: ColorKey,
    width_class: f64,
    color_mode: ColorMode,
}
impl<S: Surface, P: Persistence> DrawingSession<S, P> {
    /// An empty drawing.
    #[must_use]
    pub fn new(key: DrawingKey, canvas: Canvas<S>, persistence: P, config: &Config) -> Self {
        Self {
            key,
            builder: CurveBuilder::new(config.smoothing.max_width_delta),
            history: HistoryManager::default(),
            canvas,
            live: LiveRenderer::new(config.smoothing),
            palette: Palette::with_overrides(&config.palette),
            persistence,
            active_color: config.drawing.color,
            width_class: config.drawing.width_class,
            color_mode: config.drawing.color_mode,
        }
    }
    /// Replace local state with a loaded drawing, and redraw.
    pub fn seed(&mut self, curves: impl IntoIterator<Item = Curve>, state: Option<DrawingState>) {
        self.history = HistoryManager::seed(curves, state.map(|state| state.valid_index));
        log::info!(
            "Seeded {:?} with {} curves, {} visible",
            self.key,
            self.history.timeline().len(),
            self.history.visible().count()
        );
        self.redraw();
    }
    fn color_of(&self, key: ColorKey) -> Color {
        self.palette.get(self.color_mode, key)
    }

    // ======== Input ========

    pub fn pointer_down(&mut self, pointer: PointerId, button: InputButton, sample: &Sample) {
        if !sample.is_finite() {
            log::warn!("Dropping non-finite sample from pointer {pointer}");
            return;
        }
        let color = self.color_of(self.active_color);
        let started = self.builder.start(
            pointer,
            button,
            sample,
            self.history.next_sequence_index(),
            self.active_color,
            self.width_class,
        );
        match started {
            // The redraw replays the new curve's start dot along with everything else.
            Start::Began {
                replaced: Some(old),
            } => self.discard(&old),
            Start::Began { replaced: None } => {
                if let Some(curve) = self.builder.get(pointer) {
                    self.live.started(&mut self.canvas, curve, color);
                }
            }
            Start::Ignored => (),
        }
    }
    pub fn pointer_move(&mut self, pointer: PointerId, sample: &Sample) {
        if !sample.is_finite() {
            log::warn!("Dropping non-finite sample from pointer {pointer}");
            return;
        }
        if let Some(curve) = self.builder.extend(pointer, sample) {
            let color = self.palette.get(self.color_mode, curve.color());
            self.live.point_added(&mut self.canvas, curve, color);
        }
    }
    /// End a stroke at `sample`, committing its curve.
    ///
    /// A non-finite final sample gives no position to end at, so the stroke is cancelled instead.
    pub fn pointer_up(&mut self, pointer: PointerId, sample: &Sample) {
        if !sample.is_finite() {
            log::warn!("Non-finite final sample from pointer {pointer}, cancelling");
            self.pointer_cancel(pointer);
            return;
        }
        match self.builder.finish(pointer, Some(sample)) {
            Finish::Completed {
                curve,
                appended_final,
            } => {
                let color = self.color_of(curve.color());
                if appended_final {
                    self.live.point_added(&mut self.canvas, &curve, color);
                }
                self.live.finished(&mut self.canvas, &curve, color);
                self.commit(curve);
            }
            Finish::Cancelled(curve) => self.discard(&curve),
            Finish::Idle => (),
        }
        self.settle_overlay();
    }
    /// Abandon a stroke, without committing or finishing its curve.
    pub fn pointer_cancel(&mut self, pointer: PointerId) {
        if let Some(curve) = self.builder.cancel(pointer) {
            self.discard(&curve);
        }
        self.settle_overlay();
    }
    /// The surfaces changed size, and lost their contents.
    pub fn resize(&mut self, extent: Rect) {
        if extent.is_empty() {
            log::warn!("Ignoring resize to empty extent {extent:?}");
            return;
        }
        log::debug!("Resized to {}x{}", extent.width, extent.height);
        self.canvas.set_extent(extent);
        self.canvas.clear_overlay();
        self.redraw();
    }
    fn commit(&mut self, curve: Curve) {
        let stats = curve.stats();
        let committed = self.history.commit(curve);
        log::debug!(
            "Committed curve {} of {} points: {:.1}px in {}ms, {:.1}ms between points, {:.3}px/ms",
            committed.sequence_index(),
            committed.len(),
            stats.length,
            stats.duration_ms,
            stats.average_interval_ms,
            stats.average_speed,
        );
        self.persistence.append_curve(&self.key, committed);
        self.report_state();
    }
    fn discard(&mut self, curve: &Curve) {
        log::debug!(
            "Discarded curve {} of {} points",
            curve.sequence_index(),
            curve.len()
        );
        self.live.abandoned(&mut self.canvas, curve);
        // Its settled segments are already on the persistent surface.
        self.redraw();
    }
    fn settle_overlay(&mut self) {
        if self.builder.ongoing_count() == 0 {
            self.live.clear_overlay(&mut self.canvas);
        }
    }

    // ======== Commands ========

    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::SetColor(key) => self.set_active_color(key),
            Command::SetWidthClass(width) => self.set_active_width_class(width),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::Clear => self.clear(),
            Command::SetColorMode(mode) => self.set_color_mode(mode),
            Command::ToggleColorMode => self.toggle_color_mode(),
            Command::Navigate(target) => self.navigate(target),
        }
    }
    /// Color for strokes started from now on.
    pub fn set_active_color(&mut self, key: ColorKey) {
        self.active_color = key;
    }
    /// Width class for strokes started from now on. Non-finite or non-positive widths are ignored.
    pub fn set_active_width_class(&mut self, width_class: f64) {
        if width_class.is_finite() && width_class > 0.0 {
            self.width_class = width_class;
        } else {
            log::debug!("Ignoring width class {width_class}");
        }
    }
    pub fn undo(&mut self) {
        let result = self.history.undo();
        self.navigated(result);
    }
    pub fn redo(&mut self) {
        let result = self.history.redo();
        self.navigated(result);
    }
    /// Jump to a checkpoint of the history log. Invalid targets are ignored.
    pub fn navigate(&mut self, target: i64) {
        let result = self.history.navigate(target);
        self.navigated(result);
    }
    fn navigated(&mut self, result: Result<SequenceIndex, HistoryError>) {
        match result {
            Ok(valid_index) => {
                log::debug!("Showing curves up to {valid_index}");
                self.redraw();
                self.report_state();
            }
            Err(e) => log::debug!("Ignoring history navigation: {e}"),
        }
    }
    /// Hide every curve. Cannot be undone.
    pub fn clear(&mut self) {
        self.history.clear();
        self.redraw();
        self.report_state();
    }
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        if mode != self.color_mode {
            self.color_mode = mode;
            self.redraw();
        }
    }
    pub fn toggle_color_mode(&mut self) {
        self.set_color_mode(self.color_mode.toggled());
    }
    /// Clear the persistent surface and replay every visible curve, then what has settled of ongoing ones.
    pub fn redraw(&mut self) {
        let (palette, mode) = (&self.palette, self.color_mode);
        render::render_visible(
            &mut self.canvas,
            self.history.visible(),
            self.builder.ongoing(),
            |key| palette.get(mode, key),
            self.live.params(),
        );
    }
    fn report_state(&mut self) {
        self.persistence.set_drawing_state(
            &self.key,
            DrawingState {
                valid_index: self.history.valid_index(),
            },
        );
    }

    // ======== Accessors ========

    #[must_use]
    pub fn key(&self) -> &DrawingKey {
        &self.key
    }
    #[must_use]
    pub fn history(&self) -> &HistoryManager {
        &self.history
    }
    #[must_use]
    pub fn builder(&self) -> &CurveBuilder {
        &self.builder
    }
    #[must_use]
    pub fn canvas(&self) -> &Canvas<S> {
        &self.canvas
    }
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }
    #[must_use]
    pub fn persistence(&self) -> &P {
        &self.persistence
    }
    #[must_use]
    pub fn active_color(&self) -> ColorKey {
        self.active_color
    }
    #[must_use]
    pub fn width_class(&self) -> f64 {
        self.width_class
    }
    #[must_use]
    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }
    #[must_use]
    pub fn valid_index(&self) -> SequenceIndex {
        self.history.valid_index()
    }
    /// Close the session, returning its canvas.
    pub fn into_canvas(self) -> Canvas<S> {
        self.canvas
    }
}

#[cfg(test)]
mod test {
    use super::DrawingSession;
    use crate::builder::InputButton;
    use crate::color::{ColorKey, ColorMode};
    use crate::commands::Command;
    use crate::config::Config;
    use crate::palette::Palette;
    use crate::persistence::{DrawingKey, DrawingState, Persistence};
    use crate::render::{Canvas, DrawCall, RecordingSurface};
    use crate::stroke::{Curve, Point, Sample};
    use crate::util::Rect;

    /// Remembers every report, in order.
    #[derive(Default)]
    struct Recorder {
        appended: Vec<i64>,
        states: Vec<i64>,
    }
    impl Persistence for Recorder {
        fn append_curve(&mut self, _: &DrawingKey, curve: &Curve) {
            self.appended.push(curve.sequence_index());
        }
        fn set_drawing_state(&mut self, _: &DrawingKey, state: DrawingState) {
            self.states.push(state.valid_index);
        }
    }
    type Session = DrawingSession<RecordingSurface, Recorder>;

    fn session() -> Session {
        let canvas = Canvas::new(
            RecordingSurface::default(),
            RecordingSurface::default(),
            Rect::from_size(640.0, 480.0),
        );
        DrawingSession::new("test".to_owned(), canvas, Recorder::default(), &Config::default())
    }
    fn sample(x: f64, y: f64, t: i64) -> Sample {
        Sample::new(x, y, Some(0.5), t)
    }
    /// A complete stroke of `points` on pointer 1.
    fn stroke(session: &mut Session, points: &[(f64, f64)]) {
        let (x, y) = points[0];
        session.pointer_down(1, InputButton::Primary, &sample(x, y, 0));
        let mut t = 0;
        for &(x, y) in &points[1..points.len() - 1] {
            t += 16;
            session.pointer_move(1, &sample(x, y, t));
        }
        let (x, y) = points[points.len() - 1];
        session.pointer_up(1, &sample(x, y, t + 16));
    }
    fn persistent_calls(session: &Session) -> &[DrawCall] {
        session.canvas().persistent().calls()
    }
    #[test]
    fn tap_draws_one_dot() {
        let mut session = session();
        stroke(&mut session, &[(10.0, 10.0), (10.0, 10.0)]);

        let persistent = session.canvas().persistent();
        assert_eq!(persistent.calls().len(), 1);
        assert_eq!(persistent.circles(), 1);
        assert_eq!(persistent.lines() + persistent.curves(), 0);

        let committed = session.history().timeline().curves();
        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].len(), 1);
        assert_eq!(session.persistence().appended, [0]);
    }
    #[test]
    fn stroke_commits_and_reports() {
        let mut session = session();
        stroke(
            &mut session,
            &[(0.0, 0.0), (40.0, 10.0), (80.0, 0.0), (120.0, 30.0)],
        );
        assert_eq!(session.valid_index(), 0);
        assert_eq!(session.persistence().appended, [0]);
        assert_eq!(session.persistence().states, [0]);
        // Every provisional line was erased, and the overlay cleared once the stroke ended.
        let overlay = session.canvas().overlay();
        assert_eq!(overlay.lines(), 3);
        assert_eq!(overlay.erases(), 3);
        assert!(matches!(overlay.calls().last(), Some(DrawCall::Clear(_))));
        assert!(!session.builder().is_drawing(1));
    }
    #[test]
    fn undo_redraws_visible() {
        let mut session = session();
        stroke(&mut session, &[(0.0, 0.0), (50.0, 50.0)]);
        stroke(&mut session, &[(100.0, 0.0), (150.0, 50.0)]);
        session.undo();
        assert_eq!(session.valid_index(), 0);
        assert_eq!(session.history().visible().count(), 1);
        // Cleared, then one dot and one line for the remaining curve.
        let calls = persistent_calls(&session);
        let redraw = &calls[calls.len() - 3..];
        assert!(matches!(redraw[0], DrawCall::Clear(_)));
        assert!(matches!(redraw[1], DrawCall::Circle { .. }));
        assert!(matches!(redraw[2], DrawCall::Line { .. }));

        session.redo();
        assert_eq!(session.valid_index(), 1);
        assert_eq!(session.persistence().states, [0, 1, 0, 1]);
    }
    #[test]
    fn undo_at_start_is_ignored() {
        let mut session = session();
        session.undo();
        session.redo();
        assert_eq!(session.valid_index(), -1);
        assert!(persistent_calls(&session).is_empty());
        assert!(session.persistence().states.is_empty());
    }
    #[test]
    fn clear_then_undo_keeps_canvas_empty() {
        let mut session = session();
        stroke(&mut session, &[(0.0, 0.0), (50.0, 50.0)]);
        session.clear();
        assert_eq!(session.persistence().states.last(), Some(&-1));
        let drawn = persistent_calls(&session).len();

        session.undo();
        assert_eq!(session.valid_index(), -1);
        assert_eq!(session.history().visible().count(), 0);
        assert_eq!(persistent_calls(&session).len(), drawn);

        // Drawing after a clear starts history over.
        stroke(&mut session, &[(5.0, 5.0), (60.0, 60.0)]);
        assert_eq!(session.valid_index(), 0);
        assert_eq!(session.history().timeline().len(), 1);
    }
    #[test]
    fn commit_after_undo_truncates() {
        let mut session = session();
        for i in 0..3 {
            let x = f64::from(i) * 100.0;
            stroke(&mut session, &[(x, 0.0), (x + 50.0, 50.0)]);
        }
        session.dispatch(Command::Navigate(1));
        stroke(&mut session, &[(0.0, 200.0), (50.0, 250.0)]);

        let indices: Vec<_> = session
            .history()
            .log()
            .checkpoints()
            .iter()
            .map(|checkpoint| checkpoint.valid_index)
            .collect();
        assert_eq!(indices, [-1, 0, 1]);
        assert_eq!(session.history().timeline().len(), 2);
        assert_eq!(session.persistence().appended, [0, 1, 2, 1]);
    }
    #[test]
    fn concurrent_pointers() {
        let mut session = session();
        session.pointer_down(1, InputButton::Primary, &sample(0.0, 0.0, 0));
        session.pointer_down(2, InputButton::Primary, &sample(300.0, 0.0, 0));
        session.pointer_move(1, &sample(40.0, 40.0, 16));
        session.pointer_move(2, &sample(340.0, 40.0, 16));
        session.pointer_up(2, &sample(380.0, 0.0, 32));
        // Pointer 1 is still drawing, its provisional line must survive.
        assert!(!matches!(
            session.canvas().overlay().calls().last(),
            Some(DrawCall::Clear(_))
        ));
        session.pointer_up(1, &sample(80.0, 0.0, 32));

        assert_eq!(session.persistence().appended, [0, 1]);
        assert_eq!(session.valid_index(), 1);
        assert!(matches!(
            session.canvas().overlay().calls().last(),
            Some(DrawCall::Clear(_))
        ));
    }
    #[test]
    fn cancel_discards_stroke() {
        let mut session = session();
        session.pointer_down(1, InputButton::Primary, &sample(0.0, 0.0, 0));
        session.pointer_move(1, &sample(40.0, 40.0, 16));
        session.pointer_move(1, &sample(80.0, 0.0, 32));
        session.pointer_cancel(1);
        assert!(session.history().timeline().is_empty());
        assert!(session.persistence().appended.is_empty());
        // The partly settled stroke is wiped.
        assert!(matches!(
            persistent_calls(&session).last(),
            Some(DrawCall::Clear(_))
        ));

        // A non-finite release cancels too.
        session.pointer_down(1, InputButton::Primary, &sample(0.0, 0.0, 50));
        session.pointer_up(1, &sample(f64::NAN, 0.0, 60));
        assert!(session.history().timeline().is_empty());
    }
    #[test]
    fn restart_mid_stroke_wipes_old_curve() {
        let mut session = session();
        session.pointer_down(1, InputButton::Primary, &sample(0.0, 0.0, 0));
        for (i, (x, y)) in [(40.0, 40.0), (80.0, 0.0), (120.0, 40.0), (160.0, 0.0)]
            .into_iter()
            .enumerate()
        {
            session.pointer_move(1, &sample(x, y, 16 * (i as i64 + 1)));
        }
        session.pointer_down(1, InputButton::Primary, &sample(300.0, 300.0, 100));

        // Redrawn from scratch: only the new start dot follows the clear.
        let calls = persistent_calls(&session);
        assert!(matches!(
            calls[calls.len() - 2..],
            [DrawCall::Clear(_), DrawCall::Circle { .. }]
        ));
        // The trailing provisional line is gone along with the settled ones.
        let overlay = session.canvas().overlay();
        assert_eq!(overlay.lines(), 4);
        assert_eq!(overlay.erases(), 4);
        assert!(session.persistence().appended.is_empty());

        session.pointer_up(1, &sample(350.0, 320.0, 116));
        let committed = session.history().timeline().curves();
        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].len(), 2);
        assert_eq!(committed[0].points()[0].x(), 300.0);
        assert_eq!(session.persistence().appended, [0]);
    }
    #[test]
    fn secondary_and_broken_input_ignored() {
        let mut session = session();
        session.pointer_down(1, InputButton::Secondary, &sample(0.0, 0.0, 0));
        session.pointer_down(2, InputButton::Primary, &sample(f64::INFINITY, 0.0, 0));
        session.pointer_up(1, &sample(10.0, 10.0, 16));
        session.pointer_up(2, &sample(10.0, 10.0, 16));
        assert!(session.history().timeline().is_empty());
        assert!(persistent_calls(&session).is_empty());
    }
    #[test]
    fn pen_settings() {
        let mut session = session();
        session.dispatch(Command::SetColor(ColorKey::Green));
        session.dispatch(Command::SetWidthClass(8.0));
        session.set_active_width_class(f64::NAN);
        session.set_active_width_class(-3.0);
        assert_eq!(session.active_color(), ColorKey::Green);
        assert!((session.width_class() - 8.0).abs() < f64::EPSILON);

        stroke(&mut session, &[(0.0, 0.0), (50.0, 0.0)]);
        let curve = &session.history().timeline().curves()[0];
        assert_eq!(curve.color(), ColorKey::Green);
        // Pressure 0.5 at width class 8.
        assert!((curve.points()[0].width() - 4.0).abs() < 1e-12);
    }
    #[test]
    fn color_mode_recolors() {
        let mut session = session();
        stroke(&mut session, &[(10.0, 10.0), (10.0, 10.0)]);
        session.dispatch(Command::ToggleColorMode);
        assert_eq!(session.color_mode(), ColorMode::Dark);

        let dark = Palette::default().get(ColorMode::Dark, ColorKey::Default);
        assert!(matches!(
            persistent_calls(&session).last(),
            Some(DrawCall::Circle { color, .. }) if *color == dark
        ));
        // Setting the current mode again does nothing.
        let drawn = persistent_calls(&session).len();
        session.set_color_mode(ColorMode::Dark);
        assert_eq!(persistent_calls(&session).len(), drawn);
    }
    #[test]
    fn seed_and_resize_redraw() {
        let mut session = session();
        let curves = (0..3).map(|i| {
            Curve::new(
                i,
                ColorKey::Default,
                5.0,
                Point::first(&Sample::new(i as f64 * 10.0, 0.0, Some(1.0), 0), 5.0),
            )
        });
        session.seed(curves, Some(DrawingState { valid_index: 1 }));
        assert_eq!(session.valid_index(), 1);
        assert_eq!(session.canvas().persistent().circles(), 2);
        // Seeding loads, it does not report back.
        assert!(session.persistence().states.is_empty());

        session.resize(Rect::from_size(100.0, 100.0));
        assert_eq!(session.canvas().extent(), Rect::from_size(100.0, 100.0));
        assert_eq!(session.canvas().persistent().circles(), 4);
        assert!(matches!(
            session.canvas().persistent().calls()[3],
            DrawCall::Clear(rect) if rect == Rect::from_size(100.0, 100.0)
        ));
        // The next stroke continues after the visible curves.
        stroke(&mut session, &[(0.0, 50.0), (50.0, 50.0)]);
        assert_eq!(session.persistence().appended, [2]);
    }
}
