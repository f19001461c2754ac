use crate::world::BlockPos;

pub mod aabb;
pub mod camera;
pub mod collision;
pub mod player;
pub mod raycast;
pub mod simulation;

/// A "block container", i.e. anything that knows which unit cubes are occupied.
/// This trait allows the physics to work with the `BlockStore` or with any other world representation.
pub trait BlockContainer {
    fn is_block_full(&self, pos: BlockPos) -> bool;

    /// The insertion rank of the block at `pos`, lower is older.
    /// Used to pick a block deterministically when several of them match a query.
    fn block_rank(&self, pos: BlockPos) -> Option<u64> {
        if self.is_block_full(pos) {
            Some(0)
        } else {
            None
        }
    }
}
