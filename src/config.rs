use std::path::Path;
use std::time::Duration;

use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_MAX_WORKERS: usize = 20;
pub const DEFAULT_TIME_UNIT_MS: u64 = 1000;
pub const DEFAULT_COMPUTE_LIMIT: u64 = 50_000_000;

/// Dispatcher settings, loadable from JSON or the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Args)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Maximum number of task bodies executing at once
    #[clap(short = 'w', long, default_value_t = DEFAULT_MAX_WORKERS)]
    pub max_workers: usize,

    /// Length of one latency time unit, in milliseconds
    #[clap(long, default_value_t = DEFAULT_TIME_UNIT_MS)]
    pub time_unit_ms: u64,

    /// Largest number of values a compute task may materialize
    #[clap(long, default_value_t = DEFAULT_COMPUTE_LIMIT)]
    pub compute_limit: u64,

    /// Seed for the batch randomness source; drawn from the OS when absent
    #[clap(long)]
    pub seed: Option<u64>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            time_unit_ms: DEFAULT_TIME_UNIT_MS,
            compute_limit: DEFAULT_COMPUTE_LIMIT,
            seed: None,
        }
    }
}

impl DispatcherConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_workers < 1 {
            return Err(Error::InvalidWorkerCount(self.max_workers));
        }
        if self.time_unit_ms == 0 {
            return Err(Error::InvalidTimeUnit);
        }
        Ok(())
    }

    pub fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }

    /// Batch randomness source: seeded when `seed` is set, OS-backed otherwise.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
