//! Real-time frame driver.

use crate::checkpoint::CheckpointManager;
use crate::surface::LogSurface;
use dots_core::RunnerConfig;
use dots_world::Simulation;
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};

/// Paces a simulation to a fixed frame rate until told to quit
pub struct FrameDriver {
    sim: Simulation,
    surface: LogSurface,
    fps: u32,
    max_frames: Option<u64>,
    checkpoints: Option<CheckpointManager>,
    checkpoint_interval: u64,
}

impl FrameDriver {
    pub fn new(sim: Simulation, config: &RunnerConfig, checkpoints: Option<CheckpointManager>) -> Self {
        Self {
            sim: sim.with_metrics_interval(config.metrics_interval),
            surface: LogSurface::new(),
            fps: config.fps.max(1),
            max_frames: config.max_frames,
            checkpoints,
            checkpoint_interval: config.checkpoint.interval_frames,
        }
    }

    /// Run frames until `quit` flips to true or the frame limit is reached.
    /// Quit is only observed between frames.
    pub async fn run(mut self, mut quit: watch::Receiver<bool>) -> Simulation {
        let mut ticker = interval(Duration::from_secs_f64(1.0 / self.fps as f64));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(fps = self.fps, max_frames = ?self.max_frames, "Frame loop started");
        let mut frames_run = 0u64;
        let mut extinct_logged = false;

        loop {
            if *quit.borrow() {
                break;
            }
            if self.max_frames.is_some_and(|max| frames_run >= max) {
                info!(frames = frames_run, "Frame limit reached");
                break;
            }

            tokio::select! {
                biased;
                _ = quit.changed() => break,
                _ = ticker.tick() => {}
            }

            self.sim.frame(&mut self.surface);
            frames_run += 1;

            if self.checkpoint_due() {
                if let Some(checkpoints) = &self.checkpoints {
                    if let Err(e) = checkpoints.create_checkpoint(&self.sim).await {
                        error!("Failed to create checkpoint: {}", e);
                    }
                }
            }

            if self.sim.is_extinct() && !extinct_logged {
                info!(frame = self.sim.frame_count(), "All agents are gone; food keeps being drawn");
                extinct_logged = true;
            }
        }

        info!(
            frames = frames_run,
            presented = self.surface.frames_presented(),
            "Frame loop stopped"
        );
        self.sim
    }

    fn checkpoint_due(&self) -> bool {
        self.checkpoint_interval > 0 && self.sim.frame_count() % self.checkpoint_interval == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dots_core::SimConfig;

    fn runner_config(max_frames: Option<u64>) -> RunnerConfig {
        RunnerConfig {
            fps: 1000,
            max_frames,
            sim: SimConfig {
                seed: 3,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_stops_at_frame_limit() {
        let config = runner_config(Some(5));
        let sim = Simulation::new(config.sim.clone()).unwrap();
        let (_quit_tx, quit_rx) = watch::channel(false);

        let sim = FrameDriver::new(sim, &config, None).run(quit_rx).await;
        assert_eq!(sim.frame_count(), 5);
    }

    #[tokio::test]
    async fn test_quit_before_first_frame() {
        let config = runner_config(None);
        let sim = Simulation::new(config.sim.clone()).unwrap();
        let (quit_tx, quit_rx) = watch::channel(false);
        quit_tx.send(true).unwrap();

        let sim = FrameDriver::new(sim, &config, None).run(quit_rx).await;
        assert_eq!(sim.frame_count(), 0);
    }

    #[tokio::test]
    async fn test_quit_while_running() {
        let config = runner_config(None);
        let sim = Simulation::new(config.sim.clone()).unwrap();
        let (quit_tx, quit_rx) = watch::channel(false);

        let handle = tokio::spawn(FrameDriver::new(sim, &config, None).run(quit_rx));
        tokio::time::sleep(Duration::from_millis(30)).await;
        quit_tx.send(true).unwrap();

        let sim = handle.await.unwrap();
        assert!(sim.frame_count() > 0);
    }
}
