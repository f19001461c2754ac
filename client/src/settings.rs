use anyhow::{ensure, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::OpenOptions,
    io::{Read, Write},
    path::Path,
};
use voxelite_common::{physics::simulation::PhysicsConfig, player::MovementPolicy, worldgen::WorldKind};

pub fn load_settings(folder_path: &Path, file_path: &Path) -> Result<Settings> {
    info!(
        "Reading settings from folder path {} and file path {}...",
        folder_path.display(),
        file_path.display()
    );
    let settings: Settings = if file_path.is_file() {
        let mut settings_file = OpenOptions::new()
            .read(true)
            .open(file_path)
            .context(format!(
                "Failed to open settings file from folder path {} and file path {}...",
                folder_path.display(),
                file_path.display()
            ))?;
        let mut buf = String::new();
        settings_file.read_to_string(&mut buf).context(format!(
            "Failed to read settings file from folder path {} and file path {}...",
            folder_path.display(),
            file_path.display()
        ))?;
        toml::de::from_str(&buf).context(format!(
            "Failed to parse settings file from folder path {} and file path {}...",
            folder_path.display(),
            file_path.display()
        ))?
    } else {
        std::fs::create_dir_all(folder_path)
            .context(format!("Failed to create settings folder {}", folder_path.display()))?;
        let settings = Settings::default();
        write_settings(file_path, &settings)?;
        settings
    };
    settings
        .validate()
        .context(format!("Invalid settings in {}", file_path.display()))?;

    Ok(settings)
}

fn write_settings(path: impl AsRef<Path>, settings: &Settings) -> Result<()> {
    info!("Writing settings...");
    let path = path.as_ref();
    let mut settings_file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(&path)
        .context(format!("Failed to open settings file {}", path.display()))?;
    let string = toml::ser::to_string(settings).context("Failed to serialize settings")?;
    settings_file
        .write_all(string.as_bytes())
        .context(format!("Failed to write settings file {}", path.display()))?;

    Ok(())
}

/// Settings of the game
// Plain values must stay above the tables, toml can't serialize them otherwise
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Duration of one frame, in seconds
    pub frame_time: f64,
    /// How long the single player loop runs, in seconds
    pub simulated_seconds: f64,
    /// Feet position of the player when the game starts
    pub spawn: (f64, f64, f64),
    /// Minimum time the loading screen is shown, in milliseconds
    pub min_loading_ms: u64,
    /// How far the player can select blocks
    pub reach: f64,
    pub world: WorldKind,
    pub physics: PhysicsConfig,
    pub movement: MovementPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_time: 1.0 / 60.0,
            simulated_seconds: 10.0,
            spawn: (0.0, 3.0, 0.0),
            min_loading_ms: 1000,
            reach: 10.0,
            world: WorldKind::default(),
            physics: PhysicsConfig::default(),
            movement: MovementPolicy::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.frame_time.is_finite() && self.frame_time > 0.0,
            "frame time must be positive, got {}",
            self.frame_time
        );
        ensure!(
            self.simulated_seconds.is_finite() && self.simulated_seconds >= 0.0,
            "simulated duration must be non-negative, got {}",
            self.simulated_seconds
        );
        Ok(())
    }
}
