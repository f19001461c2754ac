//! Collision queries between boxes, points and the blocks of a `BlockContainer`.
//!
//! Every block is a unit cube centered on its `BlockPos`. The queries only visit the grid cells
//! that could overlap the query, but they select exactly the same blocks as a scan of every block.

use super::{aabb::AABB, BlockContainer};
use crate::{world::BlockPos, PhysicsError};
use nalgebra::Vector3;

/// Half the side of a block
pub const BLOCK_HALF_SIZE: f64 = 0.5;

/// The grid cells whose cube might touch the region between `min` and `max`, bounds included.
fn cells_around(min: Vector3<f64>, max: Vector3<f64>) -> impl Iterator<Item = BlockPos> {
    let finite = min.iter().chain(max.iter()).all(|c| c.is_finite());
    let low = |c: f64| (c - BLOCK_HALF_SIZE).floor() as i64;
    let high = |c: f64| (c + BLOCK_HALF_SIZE).ceil() as i64;
    // An empty range when the region is not finite
    let (x0, x1, y0, y1, z0, z1) = if finite {
        (low(min.x), high(max.x), low(min.y), high(max.y), low(min.z), high(max.z))
    } else {
        (0, -1, 0, -1, 0, -1)
    };
    (x0..=x1).flat_map(move |px| {
        (y0..=y1).flat_map(move |py| (z0..=z1).map(move |pz| BlockPos { px, py, pz }))
    })
}

/// Every block whose cube intersects `aabb`.
pub fn overlapping_blocks<'a, BC: BlockContainer>(
    aabb: &'a AABB,
    world: &'a BC,
) -> impl Iterator<Item = BlockPos> + 'a {
    cells_around(aabb.min(), aabb.max())
        .filter(move |&pos| world.is_block_full(pos) && overlaps_block(aabb, pos))
}

/// Return true if the box intersects some block
pub fn intersect_world<BC: BlockContainer>(aabb: &AABB, world: &BC) -> bool {
    overlapping_blocks(aabb, world).next().is_some()
}

/// Return true if a body standing on `foot` with the given size intersects some block.
pub fn body_collides<BC: BlockContainer>(
    foot: Vector3<f64>,
    width: f64,
    height: f64,
    world: &BC,
) -> Result<bool, PhysicsError> {
    let center = Vector3::new(foot.x, foot.y + height / 2.0, foot.z);
    let aabb = AABB::new(center, (width / 2.0, height / 2.0, width / 2.0))?;
    Ok(intersect_world(&aabb, world))
}

/// Return true if the box intersects the cube of the block at `pos`, whether or not the block exists.
pub fn overlaps_block(aabb: &AABB, pos: BlockPos) -> bool {
    aabb.intersects(&pos.aabb())
}

/// The block containing `point`, faces included.
/// When the point lies on a face shared by several blocks, the oldest one is returned.
pub fn point_inside_block<BC: BlockContainer>(point: Vector3<f64>, world: &BC) -> Option<BlockPos> {
    cells_around(point, point)
        .filter(|&pos| pos.aabb().contains_point(point))
        .filter_map(|pos| world.block_rank(pos).map(|rank| (rank, pos)))
        .min()
        .map(|(_, pos)| pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::BlockStore;

    fn build_store(blocks: &[(i64, i64, i64)]) -> BlockStore {
        let mut store = BlockStore::new();
        for &pos in blocks {
            store.add_block(pos.into());
        }
        store
    }

    /// Reference implementation: scan every block.
    fn brute_force(aabb: &AABB, store: &BlockStore) -> Vec<BlockPos> {
        let mut blocks: Vec<_> = store
            .blocks()
            .into_iter()
            .filter(|pos| aabb.intersects(&pos.aabb()))
            .collect();
        blocks.sort();
        blocks
    }

    #[test]
    fn grid_query_matches_a_full_scan() {
        let mut blocks = Vec::new();
        for x in -3i64..=3 {
            for z in -3..=3 {
                blocks.push((x, (x * z).rem_euclid(3), z));
            }
        }
        let store = build_store(&blocks);
        for i in -12..=12 {
            for j in -4..=8 {
                let center = Vector3::new(i as f64 * 0.3, j as f64 * 0.45, i as f64 * -0.2);
                let aabb = AABB::new(center, (0.3, 0.9, 0.3)).unwrap();
                let mut found: Vec<_> = overlapping_blocks(&aabb, &store).collect();
                found.sort();
                assert_eq!(found, brute_force(&aabb, &store));
            }
        }
    }

    #[test]
    fn body_resting_on_a_block_does_not_collide() {
        let store = build_store(&[(0, 0, 0)]);
        assert_eq!(body_collides(Vector3::new(0.0, 0.5, 0.0), 0.6, 1.8, &store), Ok(false));
        assert_eq!(body_collides(Vector3::new(0.0, 0.4, 0.0), 0.6, 1.8, &store), Ok(true));
        // Flush against the side
        assert_eq!(body_collides(Vector3::new(0.8, -0.5, 0.0), 0.6, 1.8, &store), Ok(false));
        assert!(body_collides(Vector3::zeros(), -0.6, 1.8, &store).is_err());
    }

    #[test]
    fn points_on_faces_are_inside() {
        let store = build_store(&[(0, 0, 0)]);
        assert_eq!(point_inside_block(Vector3::new(0.5, 0.5, -0.5), &store), Some((0, 0, 0).into()));
        assert_eq!(point_inside_block(Vector3::new(0.0, 0.0, 0.0), &store), Some((0, 0, 0).into()));
        assert_eq!(point_inside_block(Vector3::new(0.0, 0.51, 0.0), &store), None);
        assert_eq!(point_inside_block(Vector3::new(f64::NAN, 0.0, 0.0), &store), None);
    }

    #[test]
    fn shared_faces_resolve_to_the_oldest_block() {
        let store = build_store(&[(1, 0, 0), (0, 0, 0)]);
        assert_eq!(point_inside_block(Vector3::new(0.5, 0.0, 0.0), &store), Some((1, 0, 0).into()));
        let store = build_store(&[(0, 0, 0), (1, 0, 0)]);
        assert_eq!(point_inside_block(Vector3::new(0.5, 0.0, 0.0), &store), Some((0, 0, 0).into()));
    }
}
