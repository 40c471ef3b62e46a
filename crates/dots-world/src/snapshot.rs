//! Serializable simulation state for checkpoint and resume.

use crate::world::World;
use dots_core::{FrameStats, Result, SimConfig};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Full state of a run, including the random stream position, so a
/// restored simulation continues exactly where the snapshot was taken
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub config: SimConfig,
    pub world: World,
    pub rng: ChaCha8Rng,
    pub frame: u64,
    pub totals: FrameStats,
}

impl Snapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
