use nalgebra::Vector3;
use voxelite_common::{
    physics::{
        collision,
        player::PhysicsPlayer,
        simulation::{MovementMode, PhysicsSystem},
    },
    world::{BlockPos, BlockStore},
};

pub const DT: f64 = 1.0 / 60.0;

pub fn store(blocks: &[(i64, i64, i64)]) -> BlockStore {
    let mut store = BlockStore::new();
    for &pos in blocks {
        store.add_block(pos.into());
    }
    store
}

pub fn player_at(x: f64, y: f64, z: f64) -> PhysicsPlayer {
    PhysicsPlayer::new(Vector3::new(x, y, z)).expect("valid spawn position")
}

/// Step the physics until the player is on the ground, at most `max_frames` times.
pub fn settle(physics: &PhysicsSystem, player: &mut PhysicsPlayer, world: &BlockStore, max_frames: usize) {
    for _ in 0..max_frames {
        if player.is_on_ground() {
            return;
        }
        physics
            .update(player, MovementMode::Normal, DT, world)
            .expect("valid frame");
    }
    panic!("player never landed: {:?}", player);
}

pub fn assert_not_penetrating(player: &PhysicsPlayer, world: &BlockStore) {
    let overlapping: Vec<BlockPos> = collision::overlapping_blocks(player.aabb(), world).collect();
    assert!(
        overlapping.is_empty(),
        "player at {:?} overlaps {:?}",
        player.position(),
        overlapping
    );
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
