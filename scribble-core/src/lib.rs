pub mod builder;
pub mod color;
pub mod commands;
pub mod config;
pub mod history;
pub mod palette;
pub mod persistence;
pub mod render;
pub mod session;
pub mod stroke;
pub mod util;

pub use session::DrawingSession;
