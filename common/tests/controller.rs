mod common;

use common::*;
use nalgebra::Vector3;
use voxelite_common::{
    physics::{
        camera::PlayerController,
        raycast::RayCaster,
        simulation::{MovementMode, PhysicsSystem},
    },
    player::{MovementPolicy, PlayerInput},
    world::BlockPos,
    PhysicsError,
};

fn runway() -> voxelite_common::world::BlockStore {
    let blocks: Vec<_> = (-5..=0).map(|z| (0, 0, z)).collect();
    store(&blocks)
}

#[test]
fn walks_where_the_camera_looks() {
    let physics = PhysicsSystem::default();
    let world = runway();
    let mut controller = PlayerController::new(MovementPolicy::default()).unwrap();
    let mut player = player_at(0.0, 0.5, 0.0);
    settle(&physics, &mut player, &world, 10);

    let forward = PlayerInput {
        key_move_forward: true,
        ..PlayerInput::default()
    };
    for _ in 0..30 {
        controller.update(&mut player, &forward, DT, &physics, &world).unwrap();
        assert!(player.is_on_ground());
    }
    assert!((player.position().z + 2.5).abs() < 1e-6);
    assert!(player.position().x.abs() < 1e-6);

    // Releasing the keys stops the player
    controller.update(&mut player, &PlayerInput::default(), DT, &physics, &world).unwrap();
    assert_eq!(player.velocity(), Vector3::zeros());
}

#[test]
fn jump_key_jumps_once() {
    let physics = PhysicsSystem::default();
    let world = runway();
    let mut controller = PlayerController::new(MovementPolicy::default()).unwrap();
    let mut player = player_at(0.0, 0.5, 0.0);
    settle(&physics, &mut player, &world, 10);

    let jump = PlayerInput {
        jump_pressed: true,
        ..PlayerInput::default()
    };
    controller.update(&mut player, &jump, DT, &physics, &world).unwrap();
    assert!(!player.is_on_ground());
    let vy = player.velocity().y;
    assert!(vy > 6.0 && vy < 7.0);

    // No double jump
    controller.update(&mut player, &jump, DT, &physics, &world).unwrap();
    assert!(player.velocity().y < vy);
}

#[test]
fn flight_ends_when_landing() {
    let physics = PhysicsSystem::default();
    let world = runway();
    let mut controller = PlayerController::new(MovementPolicy::default()).unwrap();
    let mut player = player_at(0.0, 0.5, 0.0);
    settle(&physics, &mut player, &world, 10);

    controller.toggle_flight(&mut player);
    assert_eq!(controller.mode(), MovementMode::Flight);
    assert!(!player.is_on_ground());

    let up = PlayerInput {
        key_move_up: true,
        ..PlayerInput::default()
    };
    for _ in 0..30 {
        controller.update(&mut player, &up, DT, &physics, &world).unwrap();
    }
    assert!((player.position().y - 4.5).abs() < 1e-6);

    // Hovering: no gravity while flying
    for _ in 0..30 {
        controller.update(&mut player, &PlayerInput::default(), DT, &physics, &world).unwrap();
    }
    assert!((player.position().y - 4.5).abs() < 1e-6);
    assert_eq!(controller.mode(), MovementMode::Flight);

    let down = PlayerInput {
        key_move_down: true,
        ..PlayerInput::default()
    };
    for _ in 0..60 {
        controller.update(&mut player, &down, DT, &physics, &world).unwrap();
        if controller.mode() == MovementMode::Normal {
            break;
        }
    }
    assert_eq!(controller.mode(), MovementMode::Normal);
    assert!(player.is_on_ground());
    assert!(approx(player.position().y, 0.5));
}

#[test]
fn mouse_turns_the_camera() {
    let physics = PhysicsSystem::default();
    let world = runway();
    let mut controller = PlayerController::new(MovementPolicy::default()).unwrap();
    let mut player = player_at(0.0, 0.5, 0.0);
    let look = PlayerInput {
        mouse_delta: (900.0, -300.0),
        ..PlayerInput::default()
    };
    controller.update(&mut player, &look, DT, &physics, &world).unwrap();
    assert!((controller.camera.yaw() - 0.0).abs() < 1e-9);
    assert!((controller.camera.pitch() + 30.0).abs() < 1e-9);
}

#[test]
fn place_and_break_blocks_under_the_crosshair() {
    let physics = PhysicsSystem::default();
    let mut world = runway();
    let mut controller = PlayerController::new(MovementPolicy::default()).unwrap();
    let mut player = player_at(0.0, 0.5, 0.0);
    settle(&physics, &mut player, &world, 10);
    let caster = RayCaster::default();

    // Looking at the feet: the block would be placed inside the player
    controller.camera.set_pitch(-89.0);
    let hit = caster
        .select(player.eye_position(), controller.camera.direction(), &world)
        .unwrap();
    assert_eq!(hit.block, BlockPos::from((0, 0, 0)));
    let target = hit.placement_position().unwrap();
    assert_eq!(target, BlockPos::from((0, 1, 0)));
    assert_eq!(
        world.place_block(target, player.aabb()),
        Err(PhysicsError::CollidesWithPlayer(target))
    );

    // Looking ahead and down
    controller.camera.set_pitch(-45.0);
    let hit = caster
        .select(player.eye_position(), controller.camera.direction(), &world)
        .unwrap();
    assert_eq!(hit.block, BlockPos::from((0, 0, -2)));
    let target = hit.placement_position().unwrap();
    assert_eq!(target, BlockPos::from((0, 1, -2)));
    assert_eq!(world.place_block(target, player.aabb()), Ok(()));

    // The new block is now the one selected
    let hit = caster
        .select(player.eye_position(), controller.camera.direction(), &world)
        .unwrap();
    assert_eq!(hit.block, target);
    assert_eq!(world.break_block(hit.block), Ok(()));
    assert!(!world.contains(target));
}

#[test]
fn taking_off_from_the_ground_keeps_flying() {
    let physics = PhysicsSystem::default();
    let world = runway();
    let mut controller = PlayerController::new(MovementPolicy::default()).unwrap();
    let mut player = player_at(0.0, 0.5, 0.0);
    settle(&physics, &mut player, &world, 10);

    controller.toggle_flight(&mut player);
    let forward = PlayerInput {
        key_move_forward: true,
        ..PlayerInput::default()
    };
    for _ in 0..10 {
        controller.update(&mut player, &forward, DT, &physics, &world).unwrap();
        assert_eq!(controller.mode(), MovementMode::Flight);
    }
    // Still skimming the runway
    assert!(approx(player.position().y, 0.5));
    assert!(player.position().z < -1.0);

    // Pressing down against the floor is a landing
    let down = PlayerInput {
        key_move_down: true,
        ..PlayerInput::default()
    };
    controller.update(&mut player, &down, DT, &physics, &world).unwrap();
    assert_eq!(controller.mode(), MovementMode::Normal);
}
