//! The physics simulation of a player: gravity, axis-separated movement and collision
//! resolution against the blocks of the world.

use super::{
    aabb::AABB,
    collision::{self, BLOCK_HALF_SIZE},
    player::{is_finite, PhysicsPlayer},
    BlockContainer,
};
use crate::{debug::send_debug_info, PhysicsError};
use log::{trace, warn};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Depth of the box probed under the feet after a horizontal move
const GROUND_PROBE_DEPTH: f64 = 0.01;
/// Maximum number of nudges applied when rounding leaves the body inside a contact plane
const MAX_SETTLE_NUDGES: usize = 8;
/// Most sub-steps one axis may take in a frame, longer displacements are rejected
const MAX_SUBSTEPS: u32 = 4096;

/// Physics constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical acceleration, in blocks/s²
    pub gravity: f64,
    /// Lowest vertical velocity gravity can produce, in blocks/s
    pub terminal_velocity: f64,
    /// Vertical velocity given by a jump, in blocks/s
    pub jump_velocity: f64,
    /// Longest movement along one axis that is checked at once, in blocks.
    /// Must stay below the size of a block so that fast bodies can't go through them.
    pub max_substep: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -20.0,
            terminal_velocity: -50.0,
            jump_velocity: 7.0,
            max_substep: 0.5,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.gravity.is_finite() && self.gravity <= 0.0) {
            return Err(PhysicsError::InvalidConfig("gravity must be finite and pull downwards"));
        }
        if !(self.terminal_velocity.is_finite() && self.terminal_velocity < 0.0) {
            return Err(PhysicsError::InvalidConfig("terminal velocity must be finite and negative"));
        }
        if !(self.jump_velocity.is_finite() && self.jump_velocity > 0.0) {
            return Err(PhysicsError::InvalidConfig("jump velocity must be finite and positive"));
        }
        if !(self.max_substep > 0.0 && self.max_substep < 2.0 * BLOCK_HALF_SIZE) {
            return Err(PhysicsError::InvalidConfig("max substep must be in (0, 1)"));
        }
        Ok(())
    }
}

/// How the player moves. Chosen by the game every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementMode {
    /// Walking: gravity applies and vertical movement comes from jumps
    Normal,
    /// Flying: no gravity, vertical velocity is controlled by the player
    Flight,
}

impl Default for MovementMode {
    fn default() -> Self {
        MovementMode::Normal
    }
}

impl MovementMode {
    pub fn has_gravity(self) -> bool {
        self == MovementMode::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Moves players through a world of blocks
#[derive(Debug, Clone)]
pub struct PhysicsSystem {
    config: PhysicsConfig,
}

impl PhysicsSystem {
    pub fn new(config: PhysicsConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Step the player by `seconds_delta`.
    ///
    /// Frames with a delta that is zero or negative don't do anything. If the delta, the position
    /// or the velocity is not finite, or if the frame would move the player further than
    /// `MAX_SUBSTEPS` sub-steps along one axis, an error is returned and the player is left untouched.
    ///
    /// Returns whether the player landed: its downward movement was stopped by a block.
    pub fn update<BC: BlockContainer>(
        &self,
        player: &mut PhysicsPlayer,
        mode: MovementMode,
        seconds_delta: f64,
        world: &BC,
    ) -> Result<bool, PhysicsError> {
        if !seconds_delta.is_finite() {
            return Err(PhysicsError::NonFinite("frame delta"));
        }
        if seconds_delta <= 0.0 {
            return Ok(false);
        }
        if !is_finite(player.position()) {
            return Err(PhysicsError::NonFinite("player position"));
        }
        if !is_finite(player.velocity()) {
            return Err(PhysicsError::NonFinite("player velocity"));
        }

        // Work on a copy so that a failed frame doesn't leave a half-updated player
        let mut next = player.clone();

        if mode.has_gravity() && !next.is_on_ground() {
            let mut velocity = next.velocity();
            velocity.y += self.config.gravity * seconds_delta;
            if velocity.y < self.config.terminal_velocity {
                velocity.y = self.config.terminal_velocity;
            }
            next.set_velocity(velocity);
        }

        let delta = next.velocity() * seconds_delta;
        if !is_finite(delta) {
            return Err(PhysicsError::NonFinite("player displacement"));
        }
        let longest = delta.amax();
        if longest / self.config.max_substep > MAX_SUBSTEPS as f64 {
            return Err(PhysicsError::DisplacementTooLarge(longest));
        }

        // The vertical movement must be resolved first so that the horizontal movement slides on the ground
        let stopped_below = self.move_axis(&mut next, Axis::Y, delta.y, world) && delta.y < 0.0;
        let landed = stopped_below && next.is_on_ground();
        self.move_axis(&mut next, Axis::X, delta.x, world);
        self.move_axis(&mut next, Axis::Z, delta.z, world);

        if delta.x != 0.0 || delta.z != 0.0 {
            let on_ground = self.ground_below(&next, world);
            next.set_on_ground(on_ground);
        }

        send_debug_info(
            "Physics",
            "ontheground",
            format!("Player on the ground? {}", next.is_on_ground()),
        );
        let [vx, vy, vz]: [f64; 3] = next.velocity().into();
        send_debug_info(
            "Physics",
            "velocity",
            format!("velocity: {:.2} {:.2} {:.2}", vx, vy, vz),
        );

        *player = next;
        Ok(landed)
    }

    /// Make the player jump if it is on the ground. Return whether it jumped.
    pub fn try_jump(&self, player: &mut PhysicsPlayer) -> bool {
        if !player.is_on_ground() {
            return false;
        }
        let mut velocity = player.velocity();
        velocity.y = self.config.jump_velocity;
        player.set_velocity(velocity);
        player.set_on_ground(false);
        true
    }

    /// Move the player along one axis, stopping against the first block in the way.
    /// Returns whether a block stopped the movement.
    fn move_axis<BC: BlockContainer>(&self, player: &mut PhysicsPlayer, axis: Axis, delta: f64, world: &BC) -> bool {
        if delta == 0.0 {
            return false;
        }
        let i = axis.index();
        let steps = (delta.abs() / self.config.max_substep).ceil().max(1.0) as u32;
        let step = delta / steps as f64;

        for _ in 0..steps {
            let previous = player.position();
            let mut candidate = previous;
            candidate[i] += step;
            player.set_position(candidate);

            if !collision::intersect_world(player.aabb(), world) {
                continue;
            }

            match self.contact_position(player, axis, step, world) {
                Some(position) => {
                    trace!("Snapped {:?} from {:.4} to {:.4}", axis, candidate[i], position[i]);
                    player.set_position(position);
                    if axis == Axis::Y && step < 0.0 {
                        player.set_on_ground(true);
                    }
                }
                None => {
                    warn!(
                        "Collision along {:?} at {:?} without a contact plane, cancelling the move",
                        axis, candidate
                    );
                    player.set_position(previous);
                }
            }
            let mut velocity = player.velocity();
            velocity[i] = 0.0;
            player.set_velocity(velocity);
            return true;
        }

        if axis == Axis::Y && delta < 0.0 {
            // Nothing below: the player is falling
            player.set_on_ground(false);
        }
        false
    }

    /// Find where the player should stop along `axis`: flush against the nearest face of the blocks
    /// that its current (penetrating) aabb overlaps.
    ///
    /// Returns `None` if no overlapping block is found.
    fn contact_position<BC: BlockContainer>(
        &self,
        player: &PhysicsPlayer,
        axis: Axis,
        step: f64,
        world: &BC,
    ) -> Option<Vector3<f64>> {
        let i = axis.index();
        let forward = step > 0.0;
        let faces = collision::overlapping_blocks(player.aabb(), world).map(|pos| {
            if forward {
                pos.center()[i] - BLOCK_HALF_SIZE
            } else {
                pos.center()[i] + BLOCK_HALF_SIZE
            }
        });
        let face = if forward {
            faces.fold(None, |acc: Option<f64>, f| Some(acc.map_or(f, |a| a.min(f))))
        } else {
            faces.fold(None, |acc: Option<f64>, f| Some(acc.map_or(f, |a| a.max(f))))
        }?;

        // Distance from the feet to the leading face of the body
        let dimensions = player.dimensions();
        let leading = match (axis, forward) {
            (Axis::Y, true) => dimensions.height,
            (Axis::Y, false) => 0.0,
            (_, true) => dimensions.width / 2.0,
            (_, false) => -dimensions.width / 2.0,
        };
        let mut position = player.position();
        position[i] = face - leading;

        // Rounding can leave the body a few ulps inside the face, push it back out
        for _ in 0..MAX_SETTLE_NUDGES {
            let aabb = player.aabb_at(position);
            let nudge = f64::EPSILON * position[i].abs().max(1.0);
            if forward && aabb.max()[i] > face {
                position[i] -= nudge;
            } else if !forward && aabb.min()[i] < face {
                position[i] += nudge;
            } else {
                break;
            }
        }
        Some(position)
    }

    /// Check whether there is a block right under the feet of the player.
    fn ground_below<BC: BlockContainer>(&self, player: &PhysicsPlayer, world: &BC) -> bool {
        let feet = player.position();
        let half_width = player.dimensions().width / 2.0;
        let probe = AABB::from_valid(
            Vector3::new(feet.x, feet.y - GROUND_PROBE_DEPTH, feet.z),
            Vector3::new(half_width, GROUND_PROBE_DEPTH, half_width),
        );
        collision::intersect_world(&probe, world)
    }
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self {
            config: PhysicsConfig::default(),
        }
    }
}
