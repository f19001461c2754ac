use super::{
    collision::{self, BLOCK_HALF_SIZE},
    player::is_finite,
    BlockContainer,
};
use crate::{world::BlockPos, PhysicsError};
use nalgebra::Vector3;

/// Distance between two samples of a ray
pub const DEFAULT_RAY_STEP: f64 = 0.05;
/// How far the player can reach
pub const DEFAULT_REACH: f64 = 10.0;
/// Most samples taken along a single ray, longer rays are cut short
pub const MAX_RAY_SAMPLES: i64 = 1 << 20;

/// The block hit by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub block: BlockPos,
    /// Distance from the origin of the ray to the first sample inside the block
    pub distance: f64,
    /// The first sample inside the block
    pub point: Vector3<f64>,
    /// Unit normal of the face the ray went through, `None` if the ray started inside the block
    pub normal: Option<(i64, i64, i64)>,
}

impl RaycastHit {
    /// Where a block placed against the hit face would go
    pub fn placement_position(&self) -> Option<BlockPos> {
        self.normal.map(|(dx, dy, dz)| self.block.offset(dx, dy, dz))
    }
}

/// Marches rays through the world in fixed steps.
///
/// The march can skip the corner of a block that the ray crosses over a length shorter than the step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayCaster {
    step: f64,
    reach: f64,
}

impl RayCaster {
    /// The step must be positive and smaller than a block, the reach must be non-negative.
    pub fn new(step: f64, reach: f64) -> Result<Self, PhysicsError> {
        let step_ok = step.is_finite() && step > 0.0 && step < 2.0 * BLOCK_HALF_SIZE;
        if !step_ok || !(reach.is_finite() && reach >= 0.0) {
            return Err(PhysicsError::InvalidRayCaster {
                step,
                max_distance: reach,
            });
        }
        Ok(Self { step, reach })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn reach(&self) -> f64 {
        self.reach
    }

    /// The block the player is looking at
    pub fn select<BC: BlockContainer>(&self, eye: Vector3<f64>, direction: Vector3<f64>, world: &BC) -> Option<RaycastHit> {
        self.cast(eye, direction, self.reach, world)
    }

    /// Find the first block along the ray, sampling from distance 0 up to `max_distance` included.
    /// At most `MAX_RAY_SAMPLES` steps are taken past the origin.
    /// Returns `None` if nothing is hit or if the ray is degenerate.
    pub fn cast<BC: BlockContainer>(
        &self,
        origin: Vector3<f64>,
        direction: Vector3<f64>,
        max_distance: f64,
        world: &BC,
    ) -> Option<RaycastHit> {
        if !is_finite(origin) || !is_finite(direction) || !max_distance.is_finite() {
            return None;
        }
        let direction = direction.try_normalize(1e-12)?;
        let samples = (max_distance / self.step).floor().max(-1.0).min(MAX_RAY_SAMPLES as f64) as i64;

        let mut previous = None;
        for i in 0..=samples {
            let distance = i as f64 * self.step;
            let point = origin + direction * distance;
            if let Some(block) = collision::point_inside_block(point, world) {
                return Some(RaycastHit {
                    block,
                    distance,
                    point,
                    normal: previous.map(|p| entry_face(block, p)),
                });
            }
            previous = Some(point);
        }
        None
    }
}

impl Default for RayCaster {
    fn default() -> Self {
        Self {
            step: DEFAULT_RAY_STEP,
            reach: DEFAULT_REACH,
        }
    }
}

/// The face of `block` crossed to go from `outside` into the block.
fn entry_face(block: BlockPos, outside: Vector3<f64>) -> (i64, i64, i64) {
    let offset = outside - block.center();
    // The axis along which the previous sample was the furthest outside the block
    let (axis, _) = offset
        .iter()
        .map(|d| d.abs() - BLOCK_HALF_SIZE)
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, excess)| if excess > best.1 { (i, excess) } else { best });
    let sign = if offset[axis] < 0.0 { -1 } else { 1 };
    match axis {
        0 => (sign, 0, 0),
        1 => (0, sign, 0),
        _ => (0, 0, sign),
    }
}
