//! This module contains the camera and the controller.
//!
//! The controller defines how a player's body reacts to that player's inputs.

use super::{
    player::PhysicsPlayer,
    simulation::{MovementMode, PhysicsSystem},
    BlockContainer,
};
use crate::{
    player::{MovementPolicy, PlayerInput},
    PhysicsError,
};
use log::info;
use nalgebra::Vector3;

/// Orientation of the first-person camera, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewCamera {
    yaw: f64,
    pitch: f64,
    max_pitch: f64,
}

impl ViewCamera {
    pub fn new(yaw: f64, pitch: f64, max_pitch: f64) -> Self {
        let mut camera = Self { yaw, pitch: 0.0, max_pitch };
        camera.set_pitch(pitch);
        camera
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn add_yaw(&mut self, delta: f64) {
        self.yaw += delta;
    }

    pub fn set_pitch(&mut self, pitch: f64) {
        self.pitch = pitch.max(-self.max_pitch).min(self.max_pitch);
    }

    pub fn add_pitch(&mut self, delta: f64) {
        self.set_pitch(self.pitch + delta);
    }

    /// Unit vector the camera is looking along
    pub fn direction(&self) -> Vector3<f64> {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
    }

    /// Unit vector pointing forward, parallel to the ground
    pub fn forward(&self) -> Vector3<f64> {
        let yaw = self.yaw.to_radians();
        Vector3::new(yaw.cos(), 0.0, yaw.sin())
    }

    /// Unit vector pointing to the right, parallel to the ground
    pub fn right(&self) -> Vector3<f64> {
        self.forward().cross(&Vector3::y()).normalize()
    }
}

impl Default for ViewCamera {
    fn default() -> Self {
        // Looking towards -z
        Self::new(-90.0, 0.0, MovementPolicy::default().max_pitch)
    }
}

// Normalize the vector if it can be normalized or return 0 othersize
fn normalize_or_zero(v: Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(1e-9f64).unwrap_or_else(Vector3::zeros)
}

/// Turns player inputs into velocities, runs the physics and keeps track of the movement mode.
#[derive(Debug, Clone)]
pub struct PlayerController {
    pub camera: ViewCamera,
    mode: MovementMode,
    policy: MovementPolicy,
}

impl PlayerController {
    pub fn new(policy: MovementPolicy) -> Result<Self, PhysicsError> {
        policy.validate()?;
        Ok(Self {
            camera: ViewCamera::new(-90.0, 0.0, policy.max_pitch),
            mode: MovementMode::Normal,
            policy,
        })
    }

    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    pub fn policy(&self) -> &MovementPolicy {
        &self.policy
    }

    /// Switch movement mode. Taking off stops the vertical movement and leaves the ground.
    pub fn set_mode(&mut self, mode: MovementMode, player: &mut PhysicsPlayer) {
        if mode == MovementMode::Flight && self.mode != MovementMode::Flight {
            let mut velocity = player.velocity();
            velocity.y = 0.0;
            player.set_velocity(velocity);
            player.set_on_ground(false);
        }
        self.mode = mode;
    }

    pub fn toggle_flight(&mut self, player: &mut PhysicsPlayer) {
        let mode = match self.mode {
            MovementMode::Normal => MovementMode::Flight,
            MovementMode::Flight => MovementMode::Normal,
        };
        self.set_mode(mode, player);
    }

    /// The velocity requested by `input`, already scaled to the speed of the current mode.
    /// In normal mode only the horizontal components are meaningful.
    pub fn movement_intent(&self, input: &PlayerInput) -> Vector3<f64> {
        let forward = self.camera.forward();
        let right = self.camera.right();
        let mut direction = Vector3::zeros();
        if input.key_move_forward {
            direction += forward;
        }
        if input.key_move_backward {
            direction -= forward;
        }
        if input.key_move_left {
            direction -= right;
        }
        if input.key_move_right {
            direction += right;
        }
        match self.mode {
            MovementMode::Normal => normalize_or_zero(direction) * self.policy.walk_speed,
            MovementMode::Flight => {
                if input.key_move_up {
                    direction.y += 1.0;
                }
                if input.key_move_down {
                    direction.y -= 1.0;
                }
                normalize_or_zero(direction) * self.policy.fly_speed
            }
        }
    }

    /// Apply one frame of input to the player and step the physics.
    pub fn update<BC: BlockContainer>(
        &mut self,
        player: &mut PhysicsPlayer,
        input: &PlayerInput,
        seconds_delta: f64,
        physics: &PhysicsSystem,
        world: &BC,
    ) -> Result<(), PhysicsError> {
        let (dx, dy) = input.mouse_delta;
        self.camera.add_yaw(dx * self.policy.mouse_sensitivity);
        self.camera.add_pitch(dy * self.policy.mouse_sensitivity);

        let intent = self.movement_intent(input);
        match self.mode {
            MovementMode::Normal => {
                if input.jump_pressed {
                    physics.try_jump(player);
                }
                let mut velocity = player.velocity();
                velocity.x = intent.x;
                velocity.z = intent.z;
                player.set_velocity(velocity);
            }
            MovementMode::Flight => player.set_velocity(intent),
        }

        let landed = physics.update(player, self.mode, seconds_delta, world)?;

        if self.mode == MovementMode::Flight && landed {
            info!("Landed, flight disabled");
            self.mode = MovementMode::Normal;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vector3<f64>, b: Vector3<f64>) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn default_camera_looks_towards_negative_z() {
        let camera = ViewCamera::default();
        assert!(close(camera.direction(), Vector3::new(0.0, 0.0, -1.0)));
        assert!(close(camera.right(), Vector3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = ViewCamera::default();
        camera.add_pitch(200.0);
        assert_eq!(camera.pitch(), 89.0);
        camera.add_pitch(-500.0);
        assert_eq!(camera.pitch(), -89.0);
        assert!(camera.direction().y > -1.0);
    }

    #[test]
    fn intent_is_scaled_to_the_mode_speed() {
        let mut controller = PlayerController::new(MovementPolicy::default()).unwrap();
        let input = PlayerInput {
            key_move_forward: true,
            key_move_right: true,
            key_move_up: true,
            ..PlayerInput::default()
        };
        let walk = controller.movement_intent(&input);
        assert!((walk.norm() - 5.0).abs() < 1e-9);
        assert_eq!(walk.y, 0.0);

        let mut player = PhysicsPlayer::new(Vector3::zeros()).unwrap();
        controller.set_mode(MovementMode::Flight, &mut player);
        let fly = controller.movement_intent(&input);
        assert!((fly.norm() - 8.0).abs() < 1e-9);
        assert!(fly.y > 0.0);

        assert_eq!(controller.movement_intent(&PlayerInput::default()), Vector3::zeros());
    }

    #[test]
    fn rejects_invalid_policies() {
        let policy = MovementPolicy {
            walk_speed: -1.0,
            ..MovementPolicy::default()
        };
        assert!(PlayerController::new(policy).is_err());
        let policy = MovementPolicy {
            max_pitch: 90.0,
            ..MovementPolicy::default()
        };
        assert!(PlayerController::new(policy).is_err());
    }
}
