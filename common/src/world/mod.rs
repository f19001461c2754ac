use crate::{
    physics::{aabb::AABB, collision, BlockContainer},
    PhysicsError,
};
use log::debug;
use nalgebra::Vector3;
use std::collections::HashMap;

/// The position of a block in the world, i.e. the integer center of its unit cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    pub px: i64,
    pub py: i64,
    pub pz: i64,
}

impl BlockPos {
    /// Get the block whose cube is centered on `center`, rounding to the unit grid.
    /// Non-finite coordinates are rejected.
    pub fn from_center(center: Vector3<f64>) -> Result<Self, PhysicsError> {
        if !center.iter().all(|c| c.is_finite()) {
            return Err(PhysicsError::NonFinite("block position"));
        }
        Ok(Self {
            px: center.x.round() as i64,
            py: center.y.round() as i64,
            pz: center.z.round() as i64,
        })
    }

    /// The center of the block
    pub fn center(self) -> Vector3<f64> {
        Vector3::new(self.px as f64, self.py as f64, self.pz as f64)
    }

    pub fn offset(self, dx: i64, dy: i64, dz: i64) -> Self {
        Self {
            px: self.px + dx,
            py: self.py + dy,
            pz: self.pz + dz,
        }
    }

    /// The unit cube occupied by the block
    pub fn aabb(self) -> AABB {
        AABB::from_valid(self.center(), Vector3::repeat(collision::BLOCK_HALF_SIZE))
    }
}

impl From<(i64, i64, i64)> for BlockPos {
    fn from((px, py, pz): (i64, i64, i64)) -> Self {
        Self { px, py, pz }
    }
}

/// The set of occupied blocks.
///
/// Blocks are indexed by their grid cell so that queries only look at the cells around a box.
/// Every block remembers when it was added: `positions` lists the blocks in insertion order and
/// ties between blocks sharing a face are broken in favor of the oldest one.
/// Adding a block twice doesn't change anything.
#[derive(Debug, Clone, Default)]
pub struct BlockStore {
    blocks: HashMap<BlockPos, u64>,
    next_rank: u64,
}

impl BlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Add the block centered on `position`. Return false if it was already present.
    pub fn add(&mut self, position: Vector3<f64>) -> Result<bool, PhysicsError> {
        Ok(self.add_block(BlockPos::from_center(position)?))
    }

    /// Add a block. Return false if it was already present.
    pub fn add_block(&mut self, pos: BlockPos) -> bool {
        if self.blocks.contains_key(&pos) {
            return false;
        }
        self.blocks.insert(pos, self.next_rank);
        self.next_rank += 1;
        true
    }

    /// Remove the block centered on `position`. Return false if there was none.
    pub fn remove(&mut self, position: Vector3<f64>) -> Result<bool, PhysicsError> {
        Ok(self.remove_block(BlockPos::from_center(position)?))
    }

    pub fn remove_block(&mut self, pos: BlockPos) -> bool {
        self.blocks.remove(&pos).is_some()
    }

    pub fn contains(&self, pos: BlockPos) -> bool {
        self.blocks.contains_key(&pos)
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
        self.next_rank = 0;
    }

    /// All the blocks, in insertion order
    pub fn blocks(&self) -> Vec<BlockPos> {
        let mut blocks: Vec<_> = self.blocks.iter().map(|(&pos, &rank)| (rank, pos)).collect();
        blocks.sort_unstable();
        blocks.into_iter().map(|(_, pos)| pos).collect()
    }

    /// The centers of all the blocks, in insertion order
    pub fn positions(&self) -> Vec<Vector3<f64>> {
        self.blocks().into_iter().map(BlockPos::center).collect()
    }

    /// Place a block unless the cell is taken or the block would overlap the player's box.
    pub fn place_block(&mut self, pos: BlockPos, player: &AABB) -> Result<(), PhysicsError> {
        if self.contains(pos) {
            return Err(PhysicsError::CellOccupied(pos));
        }
        if collision::overlaps_block(player, pos) {
            return Err(PhysicsError::CollidesWithPlayer(pos));
        }
        debug!("Placing block at {:?}", pos);
        self.add_block(pos);
        Ok(())
    }

    /// Break the block at `pos`.
    pub fn break_block(&mut self, pos: BlockPos) -> Result<(), PhysicsError> {
        if self.remove_block(pos) {
            debug!("Broke block at {:?}", pos);
            Ok(())
        } else {
            Err(PhysicsError::NoBlock(pos))
        }
    }
}

impl BlockContainer for BlockStore {
    fn is_block_full(&self, pos: BlockPos) -> bool {
        self.blocks.contains_key(&pos)
    }

    fn block_rank(&self, pos: BlockPos) -> Option<u64> {
        self.blocks.get(&pos).copied()
    }
}
