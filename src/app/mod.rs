//! Application orchestration layer
//!
//! This module coordinates the domain, input and UI layers: a play session
//! with its photos, progress persistence and the controller that pushes state
//! changes to a presenter.

pub mod controller;
pub mod photo;
pub mod progress;
pub mod state;

pub use controller::{GameController, PresentationAdapter};
pub use state::{BoardView, PlaySession, SessionError, SessionStatus};
