//! # Commands
//!
//! Everything the chrome around a drawing (swatches, size pickers, menus, shortcuts) can ask of a session,
//! as plain data. Each control maps to one `Command` with its payload, dispatched with
//! [`crate::session::DrawingSession::dispatch`].

use crate::color::{ColorKey, ColorMode};

#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    SetColor(ColorKey),
    /// Width class in pixels. Non-finite or non-positive values are ignored.
    SetWidthClass(f64),
    Undo,
    Redo,
    Clear,
    SetColorMode(ColorMode),
    ToggleColorMode,
    /// Jump to a checkpoint of the history log.
    Navigate(i64),
}
impl Command {
    /// Does this command change which curves are visible?
    #[must_use]
    pub fn is_history(&self) -> bool {
        matches!(
            self,
            Self::Undo | Self::Redo | Self::Clear | Self::Navigate(_)
        )
    }
}
impl From<ColorKey> for Command {
    fn from(value: ColorKey) -> Self {
        Self::SetColor(value)
    }
}
impl From<ColorMode> for Command {
    fn from(value: ColorMode) -> Self {
        Self::SetColorMode(value)
    }
}
