//! Output to chains of HUB75 LED matrix panels
//!
//! The [Hub75] driver owns a background thread that keeps the panels in sync
//! with the most recently submitted frame. Talking to the actual hardware is
//! left to an implementation of [Panel].

mod config;
mod driver;
mod panel;

pub use config::{PanelConfig, PanelLocation};
pub use driver::{Frame, Hub75};
pub use panel::{MemoryPanel, Panel};

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("panel did not respond to the initialization sequence")]
    HandshakeFailed,

    #[error("invalid panel configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("failed to spawn the refresh thread")]
    Spawn(#[source] std::io::Error),
}
