//! Multi-touch pan and pinch-zoom for the grid viewport
//!
//! The controller consumes raw contact points and produces a
//! [`ViewportTransform`]. One gesture is active at a time and the number of
//! contact points decides which:
//!
//! ```text
//! Idle     --start(1 pt)--> Panning
//! Idle     --start(2 pt)--> Pinching
//! Panning  --start(2 pt)--> Pinching
//! Pinching --start(1 pt)--> Panning
//! any      --end()--------> Idle
//! ```
//!
//! A move whose point count differs from the active gesture re-anchors as if
//! a new gesture had started, so lifting one finger of a pinch hands off to a
//! pan without a jump. No transition drops the accumulated scale or
//! translation; only [`GestureController::reset`] does.

use thiserror::Error;

use crate::domain::core::{Point, ViewportTransform};

/// Pinch anchors closer than this are treated as a single point
const MIN_PINCH_DISTANCE: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GestureConfigError {
    #[error("Zoom bounds must be finite and positive (min {min}, max {max})")]
    NonPositive { min: f32, max: f32 },
    #[error("Minimum zoom {min} is larger than maximum zoom {max}")]
    Inverted { min: f32, max: f32 },
}

/// Allowed range for the viewport scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    min: f32,
    max: f32,
}

impl ZoomLimits {
    pub const DEFAULT_MIN: f32 = 0.5;
    pub const DEFAULT_MAX: f32 = 3.0;

    /// Creates zoom limits
    ///
    /// # Errors
    /// Rejects non-finite or non-positive bounds and `min > max`.
    pub fn new(min: f32, max: f32) -> Result<Self, GestureConfigError> {
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || max <= 0.0 {
            return Err(GestureConfigError::NonPositive { min, max });
        }
        if min > max {
            return Err(GestureConfigError::Inverted { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.min, self.max)
    }
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

/// Active gesture and its anchors
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// One contact; `last` is the previous position of the finger
    Panning { last: Point },
    /// Two contacts; distance and midpoint from the previous event
    Pinching { last_distance: f32, last_mid: Point },
}

/// Pan/zoom controller for one viewport
#[derive(Debug, Clone, PartialEq)]
pub struct GestureController {
    limits: ZoomLimits,
    transform: ViewportTransform,
    state: GestureState,
}

impl GestureController {
    /// Creates a controller with the identity transform
    pub fn new(limits: ZoomLimits) -> Self {
        Self {
            limits,
            transform: ViewportTransform::IDENTITY,
            state: GestureState::Idle,
        }
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Snapshot of the current transform
    pub fn transform(&self) -> ViewportTransform {
        self.transform
    }

    /// Starts (or re-anchors) a gesture
    ///
    /// One point begins a pan, two begin a pinch. Extra contacts beyond the
    /// second are ignored. No points at all ends the gesture.
    pub fn on_gesture_start(&mut self, points: &[Point]) {
        if !all_finite(points) {
            self.on_gesture_end();
            return;
        }
        self.state = match points {
            [] => GestureState::Idle,
            [p] => GestureState::Panning { last: *p },
            [p0, p1, ..] => GestureState::Pinching {
                last_distance: p0.distance(*p1),
                last_mid: p0.midpoint(*p1),
            },
        };
        log::trace!("Gesture anchored: {:?}", self.state);
    }

    /// Applies a move and returns the updated transform
    ///
    /// If the point count does not match the active gesture the controller
    /// re-anchors on these points and the transform is left unchanged. A
    /// non-finite coordinate ends the gesture like an empty move.
    pub fn on_gesture_move(&mut self, points: &[Point]) -> ViewportTransform {
        if !all_finite(points) {
            self.on_gesture_end();
            return self.transform;
        }
        match (self.state, points) {
            (_, []) => self.on_gesture_end(),
            (GestureState::Panning { last }, [p]) => {
                self.transform.translate_x += p.x - last.x;
                self.transform.translate_y += p.y - last.y;
                self.state = GestureState::Panning { last: *p };
            }
            (GestureState::Pinching { last_distance, last_mid }, [p0, p1, ..])
                if last_distance > MIN_PINCH_DISTANCE =>
            {
                self.pinch(p0.distance(*p1), p0.midpoint(*p1), last_distance, last_mid);
            }
            _ => self.on_gesture_start(points),
        }
        self.transform
    }

    fn pinch(&mut self, distance: f32, mid: Point, last_distance: f32, last_mid: Point) {
        let scale = self.transform.scale;
        let new_scale = self.limits.clamp(scale * (distance / last_distance));
        if !new_scale.is_finite() {
            self.on_gesture_end();
            return;
        }

        // The correction must use the clamped scale, otherwise the anchor
        // drifts once a zoom bound is reached.
        let scale_change = new_scale / scale;
        self.transform.translate_x += (mid.x - last_mid.x) * (1.0 - scale_change);
        self.transform.translate_y += (mid.y - last_mid.y) * (1.0 - scale_change);
        self.transform.scale = new_scale;

        self.state = GestureState::Pinching {
            last_distance: distance,
            last_mid: mid,
        };
    }

    /// Ends the active gesture, keeping the current pan and zoom
    pub fn on_gesture_end(&mut self) {
        self.state = GestureState::Idle;
    }

    /// Zooms by a number of fixed steps around a screen point
    ///
    /// Used for zoom buttons and wheel input. Positive `steps` zoom in. The
    /// board point under `focus` stays under `focus`, using the clamped scale.
    pub fn zoom_by_step(&mut self, steps: i32, step: f32, focus: Point) -> ViewportTransform {
        let scale = self.transform.scale;
        #[allow(clippy::cast_precision_loss)]
        let new_scale = self.limits.clamp(scale + steps as f32 * step);
        if !new_scale.is_finite() || !all_finite(&[focus]) {
            return self.transform;
        }
        let ratio = new_scale / scale;

        self.transform.translate_x = focus.x - (focus.x - self.transform.translate_x) * ratio;
        self.transform.translate_y = focus.y - (focus.y - self.transform.translate_y) * ratio;
        self.transform.scale = new_scale;
        self.transform
    }

    /// Restores the identity transform and drops any gesture anchors
    pub fn reset(&mut self) -> ViewportTransform {
        self.transform = ViewportTransform::IDENTITY;
        self.state = GestureState::Idle;
        self.transform
    }
}

fn all_finite(points: &[Point]) -> bool {
    points.iter().all(|p| p.x.is_finite() && p.y.is_finite())
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(ZoomLimits::default())
    }
}
