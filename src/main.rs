mod config; // brings `config.rs` in as `crate::config`
mod driver; // brings `driver.rs` in as `crate::driver`
mod graphics; // brings `graphics.rs` in as `crate::graphics`

use std::sync::Arc;

use anyhow::Context;
use ftcsim_kinematics::FieldCalibration;
use ftcsim_simulation::{MecanumSimulation, RenderFrame, SimulationRegistry, Topic};
use graphics::window_conf;
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

/// Frames buffered per subscriber before the window starts skipping.
const FRAME_TOPIC_CAPACITY: usize = 64;

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("FTCSim started. Loading configuration and building robots...");

    if let Err(e) = run().await {
        error!("FTCSim failed: {:?}", e);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = config::load_config().context("loading config/default.toml")?;
    config.validate()?;
    let calibration = FieldCalibration::new(config.field_length_px)
        .context("invalid field_length_px")?;
    let options = config.simulation_options();

    let frames: Topic<RenderFrame> = Topic::new(FRAME_TOPIC_CAPACITY);
    let frame_rx = frames.subscribe();

    let registry = Arc::new(SimulationRegistry::new());
    let mut robots = Vec::with_capacity(config.robots.len());
    for params in &config.robots {
        let sim = MecanumSimulation::new(params, &calibration, options, frames.clone())
            .with_context(|| format!("building robot {:?}", params.name))?;
        info!(
            robot = %params.name,
            units = %params.units,
            "Robot registered."
        );
        robots.push(registry.register(Arc::new(sim)));
    }

    if config.autostart {
        registry.start_all().context("starting simulations")?;
    }

    graphics::run_visualization_loop(frame_rx, robots, Arc::clone(&registry), calibration).await;

    registry.stop_all();
    info!("FTCSim shut down.");
    Ok(())
}
