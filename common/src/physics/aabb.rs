use crate::PhysicsError;
use nalgebra::Vector3;

/// An axis-aligned bounding box described by its center and half-extents.
///
/// The `min` and `max` corners are cached and recomputed every time the center or the size
/// changes, they are never modified on their own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    center: Vector3<f64>,
    half_extents: Vector3<f64>,
    min: Vector3<f64>,
    max: Vector3<f64>,
}

impl AABB {
    /// Create a new AABB box. Fails if a half-extent is negative or not finite.
    pub fn new(center: Vector3<f64>, (h_x, h_y, h_z): (f64, f64, f64)) -> Result<Self, PhysicsError> {
        check_extents(h_x, h_y, h_z)?;
        Ok(Self::from_valid(center, Vector3::new(h_x, h_y, h_z)))
    }

    /// Create an AABB box of cubic shape
    pub fn new_cube(center: Vector3<f64>, half_size: f64) -> Result<Self, PhysicsError> {
        Self::new(center, (half_size, half_size, half_size))
    }

    /// Build a box from half-extents that are already known to be valid.
    pub(crate) fn from_valid(center: Vector3<f64>, half_extents: Vector3<f64>) -> Self {
        let mut aabb = AABB {
            center,
            half_extents,
            min: center,
            max: center,
        };
        aabb.update_bounds();
        aabb
    }

    fn update_bounds(&mut self) {
        self.min = self.center - self.half_extents;
        self.max = self.center + self.half_extents;
    }

    pub fn set_center(&mut self, center: Vector3<f64>) {
        self.center = center;
        self.update_bounds();
    }

    /// Change the half-extents of the box. The box is left untouched on error.
    pub fn set_size(&mut self, (h_x, h_y, h_z): (f64, f64, f64)) -> Result<(), PhysicsError> {
        check_extents(h_x, h_y, h_z)?;
        self.half_extents = Vector3::new(h_x, h_y, h_z);
        self.update_bounds();
        Ok(())
    }

    /// Translate the box
    pub fn offset(&mut self, dx: f64, dy: f64, dz: f64) {
        self.center += Vector3::new(dx, dy, dz);
        self.update_bounds();
    }

    /// Return true if the two boxes overlap with a non-zero volume.
    /// Boxes that only share a face, an edge or a corner don't intersect.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
            && self.max.z > other.min.z
            && self.min.z < other.max.z
    }

    /// Return true if the point is inside the box, faces included.
    pub fn contains_point(&self, p: Vector3<f64>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn center(&self) -> Vector3<f64> {
        self.center
    }

    pub fn half_extents(&self) -> Vector3<f64> {
        self.half_extents
    }

    pub fn min(&self) -> Vector3<f64> {
        self.min
    }

    pub fn max(&self) -> Vector3<f64> {
        self.max
    }
}

fn check_extents(h_x: f64, h_y: f64, h_z: f64) -> Result<(), PhysicsError> {
    let valid = |h: f64| h.is_finite() && h >= 0.0;
    if valid(h_x) && valid(h_y) && valid(h_z) {
        Ok(())
    } else {
        Err(PhysicsError::InvalidExtents(h_x, h_y, h_z))
    }
}
