use crate::settings::Settings;
use anyhow::{Context, Result};
use log::{debug, info};
use nalgebra::Vector3;
use voxelite_common::{
    debug::{send_debug_info, DebugInfo},
    physics::{
        camera::PlayerController,
        player::PhysicsPlayer,
        raycast::{RayCaster, DEFAULT_RAY_STEP},
        simulation::PhysicsSystem,
    },
    player::PlayerInput,
    world::BlockStore,
};

/// Frames between two scripted jumps
const JUMP_PERIOD: u64 = 90;
/// Frames between two dumps of the debug info
const DEBUG_PERIOD: u64 = 60;

/// A single player game without rendering: the player walks forward and jumps from time to time.
pub struct SinglePlayer {
    world: BlockStore,
    player: PhysicsPlayer,
    controller: PlayerController,
    physics: PhysicsSystem,
    ray_caster: RayCaster,
    debug_info: DebugInfo,
    frame: u64,
}

impl SinglePlayer {
    pub fn new(settings: &Settings, world: BlockStore) -> Result<Self> {
        let (x, y, z) = settings.spawn;
        Ok(Self {
            world,
            player: PhysicsPlayer::new(Vector3::new(x, y, z)).context("Invalid spawn position")?,
            controller: PlayerController::new(settings.movement).context("Invalid movement settings")?,
            physics: PhysicsSystem::new(settings.physics).context("Invalid physics settings")?,
            ray_caster: RayCaster::new(DEFAULT_RAY_STEP, settings.reach).context("Invalid reach")?,
            debug_info: DebugInfo::new_current(),
            frame: 0,
        })
    }

    /// Run the game for the duration given in the settings
    pub fn run(&mut self, settings: &Settings) -> Result<()> {
        settings.validate()?;
        let frames = (settings.simulated_seconds / settings.frame_time).floor().max(0.0) as u64;
        info!("Running {} frames of single player", frames);
        for _ in 0..frames {
            let input = scripted_input(self.frame);
            self.update(&input, settings.frame_time)?;
        }
        let p = self.player().position();
        info!(
            "Finished at x = {:.2}, y = {:.2}, z = {:.2}, on the ground: {}",
            p.x,
            p.y,
            p.z,
            self.player.is_on_ground()
        );
        Ok(())
    }

    /// Step the game by one frame
    pub fn update(&mut self, input: &PlayerInput, seconds_delta: f64) -> Result<()> {
        self.controller
            .update(&mut self.player, input, seconds_delta, &self.physics, &self.world)
            .context(format!("Physics failed at frame {}", self.frame))?;

        // Debug current player position, yaw and pitch
        let p = self.player.position();
        send_debug_info(
            "Player",
            "position",
            format!("x = {:.2}\ny = {:.2}\nz = {:.2}", p.x, p.y, p.z),
        );
        send_debug_info(
            "Player",
            "yawpitch",
            format!(
                "yaw = {:.0}\npitch = {:.0}",
                self.controller.camera.yaw(),
                self.controller.camera.pitch()
            ),
        );

        let pointed_block =
            self.ray_caster
                .select(self.player.eye_position(), self.controller.camera.direction(), &self.world);
        match pointed_block.and_then(|hit| hit.normal.map(|face| (hit.block, face))) {
            Some((block, face)) => send_debug_info(
                "Player",
                "pointedat",
                format!(
                    "Pointed block: Some({}, {}, {}), face: {:?}",
                    block.px, block.py, block.pz, face
                ),
            ),
            None => send_debug_info("Player", "pointedat", "Pointed block: None"),
        }

        if self.frame % DEBUG_PERIOD == 0 {
            for (section, messages) in self.debug_info.get_debug_info() {
                for message in messages.values() {
                    debug!("[{}] {}", section, message.replace('\n', ", "));
                }
            }
        }
        self.frame += 1;
        Ok(())
    }

    pub fn player(&self) -> &PhysicsPlayer {
        &self.player
    }
}

/// Walk forward while looking slightly down, and jump every `JUMP_PERIOD` frames.
fn scripted_input(frame: u64) -> PlayerInput {
    PlayerInput {
        key_move_forward: true,
        jump_pressed: frame % JUMP_PERIOD == JUMP_PERIOD - 1,
        mouse_delta: if frame == 0 { (0.0, -200.0) } else { (0.0, 0.0) },
        ..PlayerInput::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelite_common::worldgen::{FlatGenerator, WorldGenerator};

    fn flat_world(radius: i64) -> BlockStore {
        let mut world = BlockStore::new();
        FlatGenerator {
            radius,
            top: 0,
            depth: 1,
        }
        .generate(&mut world, &mut |_| {})
        .unwrap();
        world
    }

    #[test]
    fn walks_on_a_flat_world() {
        let settings = Settings {
            simulated_seconds: 2.0,
            ..Settings::default()
        };
        let mut game = SinglePlayer::new(&settings, flat_world(16)).unwrap();
        game.run(&settings).unwrap();

        let player = game.player();
        assert!(player.position().y >= 0.5 - 1e-9);
        // The player walked towards -z
        assert!(player.position().z < -5.0);
        assert!(player.position().x.abs() < 1e-6);
    }

    #[test]
    fn invalid_settings_are_reported() {
        let settings = Settings {
            reach: -1.0,
            ..Settings::default()
        };
        assert!(SinglePlayer::new(&settings, BlockStore::new()).is_err());
    }

    #[test]
    fn zero_frame_time_does_not_run_forever() {
        let settings = Settings {
            frame_time: 0.0,
            ..Settings::default()
        };
        let mut game = SinglePlayer::new(&settings, flat_world(2)).unwrap();
        assert!(game.run(&settings).is_err());
        assert_eq!(game.frame, 0);
    }

    #[test]
    fn jumps_periodically() {
        assert!(!scripted_input(0).jump_pressed);
        assert!(scripted_input(JUMP_PERIOD - 1).jump_pressed);
        assert!(!scripted_input(JUMP_PERIOD).jump_pressed);
    }
}
