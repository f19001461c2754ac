use crate::{physics::aabb::AABB, PhysicsError};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

pub const PLAYER_WIDTH: f64 = 0.6;
pub const PLAYER_HEIGHT: f64 = 1.8;
pub const PLAYER_EYE_HEIGHT: f64 = 1.62;

/// The size of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyDimensions {
    pub width: f64,
    pub height: f64,
    /// Height of the eyes above the feet
    pub eye_height: f64,
}

impl BodyDimensions {
    pub fn new(width: f64, height: f64, eye_height: f64) -> Result<Self, PhysicsError> {
        let dimensions = Self {
            width,
            height,
            eye_height,
        };
        dimensions.validate()?;
        Ok(dimensions)
    }

    /// Width and height must be positive, the eyes must be inside the body.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if positive(self.width)
            && positive(self.height)
            && self.eye_height.is_finite()
            && self.eye_height >= 0.0
            && self.eye_height <= self.height
        {
            Ok(())
        } else {
            Err(PhysicsError::InvalidBodyDimensions {
                width: self.width,
                height: self.height,
                eye_height: self.eye_height,
            })
        }
    }

    fn half_extents(&self) -> Vector3<f64> {
        Vector3::new(self.width / 2.0, self.height / 2.0, self.width / 2.0)
    }
}

impl Default for BodyDimensions {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            eye_height: PLAYER_EYE_HEIGHT,
        }
    }
}

/// The physics representation of a player.
///
/// `position` is the point under the feet, not the center of the body. The aabb is rebuilt
/// every time the position changes.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsPlayer {
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    on_ground: bool,
    dimensions: BodyDimensions,
    aabb: AABB,
}

impl PhysicsPlayer {
    /// Spawn a player of the default size with its feet on `position`.
    /// The player starts airborne and at rest.
    pub fn new(position: Vector3<f64>) -> Result<Self, PhysicsError> {
        Self::with_dimensions(position, BodyDimensions::default())
    }

    pub fn with_dimensions(position: Vector3<f64>, dimensions: BodyDimensions) -> Result<Self, PhysicsError> {
        dimensions.validate()?;
        if !is_finite(position) {
            return Err(PhysicsError::NonFinite("spawn position"));
        }
        Ok(Self {
            position,
            velocity: Vector3::zeros(),
            on_ground: false,
            dimensions,
            aabb: aabb_at(position, &dimensions),
        })
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    /// Move the feet to `position` and update the aabb
    pub fn set_position(&mut self, position: Vector3<f64>) {
        self.position = position;
        self.aabb = aabb_at(position, &self.dimensions);
    }

    pub fn velocity(&self) -> Vector3<f64> {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vector3<f64>) {
        self.velocity = velocity;
    }

    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn set_on_ground(&mut self, on_ground: bool) {
        self.on_ground = on_ground;
    }

    pub fn dimensions(&self) -> &BodyDimensions {
        &self.dimensions
    }

    pub fn aabb(&self) -> &AABB {
        &self.aabb
    }

    /// The aabb the player would have with its feet on `position`
    pub fn aabb_at(&self, position: Vector3<f64>) -> AABB {
        aabb_at(position, &self.dimensions)
    }

    /// Get the position of the camera
    pub fn eye_position(&self) -> Vector3<f64> {
        self.position + Vector3::new(0.0, self.dimensions.eye_height, 0.0)
    }
}

fn aabb_at(position: Vector3<f64>, dimensions: &BodyDimensions) -> AABB {
    let center = position + Vector3::new(0.0, dimensions.height / 2.0, 0.0);
    AABB::from_valid(center, dimensions.half_extents())
}

pub(crate) fn is_finite(v: Vector3<f64>) -> bool {
    v.iter().all(|c| c.is_finite())
}
