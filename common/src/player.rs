use crate::PhysicsError;
use serde::{Deserialize, Serialize};

/// The input of a player for one frame.
///
/// Built once per frame by the input layer; the physics never reads devices directly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    pub key_move_forward: bool,
    pub key_move_left: bool,
    pub key_move_backward: bool,
    pub key_move_right: bool,
    /// Ascend while flying
    pub key_move_up: bool,
    /// Descend while flying
    pub key_move_down: bool,
    /// The jump key went down during this frame
    pub jump_pressed: bool,
    /// Mouse movement since the last frame, in pixels
    pub mouse_delta: (f64, f64),
}

/// How inputs are turned into movement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementPolicy {
    /// Horizontal speed when walking, in blocks/s
    pub walk_speed: f64,
    /// Speed when flying, in blocks/s
    pub fly_speed: f64,
    /// Degrees per pixel of mouse movement
    pub mouse_sensitivity: f64,
    /// Maximum pitch of the camera, in degrees
    pub max_pitch: f64,
}

impl Default for MovementPolicy {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            fly_speed: 8.0,
            mouse_sensitivity: 0.1,
            max_pitch: 89.0,
        }
    }
}

impl MovementPolicy {
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;
        if !non_negative(self.walk_speed) || !non_negative(self.fly_speed) {
            return Err(PhysicsError::InvalidConfig("speeds must be finite and non-negative"));
        }
        if !self.mouse_sensitivity.is_finite() {
            return Err(PhysicsError::InvalidConfig("mouse sensitivity must be finite"));
        }
        if !(self.max_pitch >= 0.0 && self.max_pitch < 90.0) {
            return Err(PhysicsError::InvalidConfig("max pitch must be in [0, 90)"));
        }
        Ok(())
    }
}
