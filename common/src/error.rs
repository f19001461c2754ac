use crate::world::BlockPos;
use thiserror::Error;

/// Errors raised by the physics core.
///
/// Configuration errors are returned when a value is constructed, never at query time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("invalid half-extents ({0}, {1}, {2}): every half-extent must be finite and non-negative")]
    InvalidExtents(f64, f64, f64),
    #[error("invalid body dimensions: width {width}, height {height}, eye height {eye_height}")]
    InvalidBodyDimensions {
        width: f64,
        height: f64,
        eye_height: f64,
    },
    #[error("non-finite {0} rejected")]
    NonFinite(&'static str),
    #[error("displacement of {0} blocks in a single frame is too large")]
    DisplacementTooLarge(f64),
    #[error("invalid ray caster configuration: step {step}, reach {max_distance}")]
    InvalidRayCaster { step: f64, max_distance: f64 },
    #[error("invalid physics configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("cannot place block at {0:?}: the cell is already occupied")]
    CellOccupied(BlockPos),
    #[error("cannot place block at {0:?}: it would collide with the player")]
    CollidesWithPlayer(BlockPos),
    #[error("no block at {0:?}")]
    NoBlock(BlockPos),
}
