use std::collections::HashSet;
use std::time::Duration;

use anyhow::bail;

use config::{Config, ConfigError, Environment, File, FileFormat};
use ftcsim_kinematics::units::DEFAULT_FIELD_LENGTH_PX;
use ftcsim_simulation::{RobotParams, SimulationOptions};
use serde::Deserialize;
use tracing::{error, info};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Application settings, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// On-screen length of one field edge, in pixels.
    #[serde(default = "default_field_length_px")]
    pub field_length_px: f64,
    /// Render sampler rate in Hz.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    /// Pause between integration ticks in microseconds; 0 runs flat out.
    #[serde(default)]
    pub tick_period_us: u64,
    /// Start every robot as soon as the window opens.
    #[serde(default)]
    pub autostart: bool,
    #[serde(default)]
    pub robots: Vec<RobotParams>,
}

fn default_field_length_px() -> f64 {
    DEFAULT_FIELD_LENGTH_PX
}

fn default_frame_rate() -> f64 {
    60.0
}

impl AppConfig {
    /// Robot names key the drawn frames, so they must be unique.
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();
        for robot in &self.robots {
            if !seen.insert(robot.name.as_str()) {
                bail!(
                    "robot name {:?} is used more than once; give each [[robots]] entry its own name",
                    robot.name
                );
            }
        }
        Ok(())
    }

    pub fn simulation_options(&self) -> SimulationOptions {
        SimulationOptions {
            tick_period: Duration::from_micros(self.tick_period_us),
            frame_rate: self.frame_rate,
        }
    }
}

/// Load `config/default.toml`, then apply `FTCSIM_*` environment overrides.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    info!("Attempting to load configuration from {}", DEFAULT_CONFIG_PATH);

    let settings = Config::builder()
        .add_source(File::new(DEFAULT_CONFIG_PATH, FileFormat::Toml).required(true))
        .add_source(Environment::with_prefix("FTCSIM"))
        .build()
        .and_then(|config| config.try_deserialize::<AppConfig>());

    match settings {
        Ok(config) => {
            info!(
                robots = config.robots.len(),
                field_length_px = config.field_length_px,
                "Successfully loaded configuration."
            );
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}
