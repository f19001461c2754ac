use anyhow::{anyhow, Result};
use log::{error, info};
use std::{path::Path, time::Duration};
use voxelite_common::worker::{LoadingState, WorldLoader};

mod settings;
mod singleplayer;

fn main() -> Result<()> {
    env_logger::init();

    info!("Starting up...");
    let config_folder = Path::new("config");
    let config_file = Path::new("config/settings.toml");
    let settings = settings::load_settings(&config_folder, &config_file)?;
    info!("Current settings: {:?}", settings);

    let frame = Duration::from_secs_f64(settings.frame_time.max(0.001));
    let mut loader = WorldLoader::start(
        settings.world.into_generator(),
        Duration::from_millis(settings.min_loading_ms),
    );
    let mut last_reported = -1.0;
    let world = loop {
        match loader.poll() {
            LoadingState::Loading { progress } => {
                if progress - last_reported >= 0.1 || (progress >= 1.0 && last_reported < 1.0) {
                    info!("Loading world... {:.0}%", progress * 100.0);
                    last_reported = progress;
                }
                std::thread::sleep(frame);
            }
            LoadingState::Ready(world) => break world,
            LoadingState::Failed | LoadingState::Done => {
                error!("The world could not be loaded");
                return Err(anyhow!("World loading failed"));
            }
        }
    };
    info!("World loaded with {} blocks", world.len());

    let mut game = singleplayer::SinglePlayer::new(&settings, world)?;
    game.run(&settings)
}
