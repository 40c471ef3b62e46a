//! Checkpoint and restore functionality.

use dots_core::{Error, Result};
use dots_world::{Simulation, Snapshot};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, warn};

const CHECKPOINT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    pub version: u32,
    pub timestamp: i64,
    pub frame: u64,
    /// bincode-encoded [`Snapshot`]
    pub snapshot: Vec<u8>,
}

pub struct CheckpointManager {
    checkpoint_dir: PathBuf,
    keep: usize,
}

impl CheckpointManager {
    pub fn new(checkpoint_dir: impl Into<PathBuf>, keep: usize) -> Self {
        Self {
            checkpoint_dir: checkpoint_dir.into(),
            keep,
        }
    }

    /// Write a checkpoint of the simulation and prune old ones
    pub async fn create_checkpoint(&self, sim: &Simulation) -> Result<PathBuf> {
        fs::create_dir_all(&self.checkpoint_dir).await?;

        let checkpoint = Checkpoint {
            version: CHECKPOINT_VERSION,
            timestamp: chrono::Utc::now().timestamp(),
            frame: sim.frame_count(),
            snapshot: sim.snapshot().to_bytes()?,
        };
        let checkpoint_bytes = bincode::serialize(&checkpoint)?;

        let checkpoint_path = self
            .checkpoint_dir
            .join(format!("checkpoint_{}.bin", checkpoint.frame));
        fs::write(&checkpoint_path, &checkpoint_bytes).await?;

        info!(frame = checkpoint.frame, path = ?checkpoint_path, "Checkpoint created");

        self.cleanup_old_checkpoints().await?;
        Ok(checkpoint_path)
    }

    /// Restore a simulation from the newest checkpoint on disk
    pub async fn restore_latest(&self) -> Result<Simulation> {
        let checkpoints = self.list_checkpoints().await?;

        let Some((path, _)) = checkpoints.into_iter().max_by_key(|(_, frame)| *frame) else {
            return Err(Error::NotFound(format!(
                "no checkpoint files in {:?}",
                self.checkpoint_dir
            )));
        };

        let bytes = fs::read(&path).await?;
        let sim = Self::restore_from_bytes(&bytes)?;
        info!(frame = sim.frame_count(), path = ?path, "Restored from checkpoint");
        Ok(sim)
    }

    fn restore_from_bytes(bytes: &[u8]) -> Result<Simulation> {
        let checkpoint: Checkpoint = bincode::deserialize(bytes)?;

        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(Error::InvalidState(format!(
                "checkpoint version {} is not supported (expected {})",
                checkpoint.version, CHECKPOINT_VERSION
            )));
        }

        info!(
            frame = checkpoint.frame,
            timestamp = checkpoint.timestamp,
            "Restoring checkpoint"
        );

        Simulation::restore(Snapshot::from_bytes(&checkpoint.snapshot)?)
    }

    /// Remove all but the newest `keep` checkpoints
    pub async fn cleanup_old_checkpoints(&self) -> Result<()> {
        let mut checkpoints = self.list_checkpoints().await?;
        if checkpoints.len() <= self.keep {
            return Ok(());
        }

        // Newest first
        checkpoints.sort_by(|a, b| b.1.cmp(&a.1));

        for (path, _) in checkpoints.iter().skip(self.keep) {
            if let Err(e) = fs::remove_file(path).await {
                warn!("Failed to remove old checkpoint {:?}: {}", path, e);
            } else {
                info!("Removed old checkpoint: {:?}", path);
            }
        }

        Ok(())
    }

    /// Checkpoint files with the frame parsed from their name
    async fn list_checkpoints(&self) -> Result<Vec<(PathBuf, u64)>> {
        if !self.checkpoint_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.checkpoint_dir).await?;
        let mut checkpoints = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let frame = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|name| name.strip_prefix("checkpoint_"))
                .and_then(|rest| rest.strip_suffix(".bin"))
                .and_then(|frame| frame.parse::<u64>().ok());

            if let Some(frame) = frame {
                checkpoints.push((path, frame));
            }
        }

        Ok(checkpoints)
    }
}
