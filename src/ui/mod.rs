//! User interface layer
//!
//! Software rendering of the board and a presenter that keeps the latest
//! rendered frame.

pub mod renderer;
pub mod snapshot;
pub mod text;

pub use renderer::{BoardRenderer, RendererError};
pub use snapshot::SnapshotPresenter;
