//! Pointer input handling
//!
//! Touch and pointer events arrive here as plain contact points; this layer
//! turns them into viewport transforms without knowing how they are drawn.

pub mod gesture;

pub use gesture::{GestureConfigError, GestureController, GestureState, ZoomLimits};
