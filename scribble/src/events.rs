//! Recorded input, one JSON event per line.
//!
//! ```text
//! # comments and blank lines are skipped
//! {"type": "resize", "width": 800, "height": 600}
//! {"type": "command", "command": {"set_color": "blue"}}
//! {"type": "down", "pointer": 1, "x": 10, "y": 10, "pressure": 0.5, "timestamp": 0}
//! {"type": "move", "pointer": 1, "x": 30, "y": 12, "pressure": 0.6, "timestamp": 16}
//! {"type": "up", "pointer": 1, "x": 50, "y": 20, "pressure": 0.4, "timestamp": 32}
//! ```

use anyhow::Context;
use scribble_core::{
    builder::{InputButton, PointerId},
    commands::Command,
    persistence::Persistence,
    render::Surface,
    stroke::Sample,
    util::Rect,
    DrawingSession,
};

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputEvent {
    Down {
        pointer: PointerId,
        #[serde(default)]
        button: InputButton,
        #[serde(flatten)]
        sample: Sample,
    },
    Move {
        pointer: PointerId,
        #[serde(flatten)]
        sample: Sample,
    },
    Up {
        pointer: PointerId,
        #[serde(flatten)]
        sample: Sample,
    },
    /// The pointer left the surface, or the platform took it over.
    Cancel { pointer: PointerId },
    Resize { width: f64, height: f64 },
    Command { command: Command },
}
impl InputEvent {
    pub fn apply<S: Surface, P: Persistence>(self, session: &mut DrawingSession<S, P>) {
        match self {
            Self::Down {
                pointer,
                button,
                sample,
            } => session.pointer_down(pointer, button, &sample),
            Self::Move { pointer, sample } => session.pointer_move(pointer, &sample),
            Self::Up { pointer, sample } => session.pointer_up(pointer, &sample),
            Self::Cancel { pointer } => session.pointer_cancel(pointer),
            Self::Resize { width, height } => session.resize(Rect::from_size(width, height)),
            Self::Command { command } => session.dispatch(command),
        }
    }
}

/// Parse a whole script. Blank lines and lines starting with `#` are skipped.
pub fn parse_script(text: &str) -> anyhow::Result<Vec<InputEvent>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(idx, line)| {
            serde_json::from_str(line).with_context(|| format!("bad event on line {}", idx + 1))
        })
        .collect()
}
