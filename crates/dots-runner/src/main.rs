//! Headless real-time runner for the Dots simulation.

mod checkpoint;
mod driver;
mod surface;
mod telemetry;

use anyhow::Result;
use dots_core::{Error, RunnerConfig};
use dots_world::Simulation;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize telemetry
    telemetry::init_telemetry()?;

    // Load configuration
    let config = match std::env::var("DOTS_CONFIG") {
        Ok(path) => RunnerConfig::load(&path)?,
        Err(_) => RunnerConfig::default(),
    };

    info!(
        fps = config.fps,
        seed = config.sim.seed,
        width = config.sim.world.width,
        height = config.sim.world.height,
        "Starting Dots runner"
    );

    let checkpoints = (config.checkpoint.interval_frames > 0 || config.checkpoint.restore_latest)
        .then(|| checkpoint::CheckpointManager::new(&config.checkpoint.dir, config.checkpoint.keep));

    let sim = match &checkpoints {
        Some(manager) if config.checkpoint.restore_latest => match manager.restore_latest().await {
            Ok(sim) => sim,
            Err(Error::NotFound(reason)) => {
                warn!("Starting a fresh run: {}", reason);
                Simulation::new(config.sim.clone())?
            }
            Err(e) => return Err(e.into()),
        },
        _ => Simulation::new(config.sim.clone())?,
    };
    info!(
        seed = sim.config().seed,
        frame = sim.frame_count(),
        prey = sim.world().prey.len(),
        predators = sim.world().predators.len(),
        "Simulation ready"
    );

    // Quit signal, observed by the frame loop between frames
    let (quit_tx, quit_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = quit_tx.send(true);
    });

    let sim = driver::FrameDriver::new(sim, &config, checkpoints)
        .run(quit_rx)
        .await;

    sim.emit_run_summary();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
