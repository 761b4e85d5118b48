use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::worker::PROGRESS_STEPS;

/// Initial job set parameters (optional `[jobs]` section in config.toml).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JobGenConfig {
    /// Fewest jobs a new tenant starts with.
    pub min_jobs: usize,
    /// Most jobs a new tenant starts with.
    pub max_jobs: usize,
    /// Smallest job size in bytes (inclusive).
    pub min_job_bytes: u64,
    /// Largest job size in bytes (inclusive).
    pub max_job_bytes: u64,
}

impl Default for JobGenConfig {
    fn default() -> Self {
        Self {
            min_jobs: 1,
            max_jobs: 10,
            min_job_bytes: 1_000_000,
            max_job_bytes: 512_000_000,
        }
    }
}

impl JobGenConfig {
    /// Ranges with `min <= max` and at least one job per tenant.
    pub fn normalized(self) -> Self {
        let min_jobs = self.min_jobs.max(1);
        let min_job_bytes = self.min_job_bytes.max(1);
        Self {
            min_jobs,
            max_jobs: self.max_jobs.max(min_jobs),
            min_job_bytes,
            max_job_bytes: self.max_job_bytes.max(min_job_bytes),
        }
    }
}

/// Global configuration loaded from `~/.config/bidserve/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of workers in the pool.
    pub worker_count: usize,
    /// Simulated transfer rate of every worker, in bytes per second.
    pub transfer_rate_bytes_per_sec: u64,
    /// How often a paused or idle worker re-checks its state, in milliseconds.
    pub poll_interval_ms: u64,
    /// Weight of the small-job term in the auction score.
    pub auction_weight: f64,
    /// Optional job generation ranges; if missing, built-in defaults are used.
    #[serde(default)]
    pub jobs: Option<JobGenConfig>,
    /// Optional probability (0..=1) that a single progress tick faults.
    #[serde(default)]
    pub failure_rate: Option<f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            worker_count: 5,
            transfer_rate_bytes_per_sec: 25_000_000,
            poll_interval_ms: 1000,
            auction_weight: 1e9,
            jobs: None,
            failure_rate: None,
        }
    }
}

impl SimConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Job generation ranges, falling back to defaults when the section is absent.
    pub fn job_gen(&self) -> JobGenConfig {
        self.jobs.unwrap_or_default().normalized()
    }

    /// Sleep before each progress step of a job of `size_bytes`:
    /// `size / rate / PROGRESS_STEPS` seconds.
    pub fn tick_duration(&self, size_bytes: u64) -> Duration {
        let rate = self.transfer_rate_bytes_per_sec.max(1) as f64;
        Duration::from_secs_f64(size_bytes as f64 / rate / f64::from(PROGRESS_STEPS))
    }

    /// Fault probability clamped to [0, 1]; 0 when unset.
    pub fn failure_rate(&self) -> f64 {
        self.failure_rate.unwrap_or(0.0).clamp(0.0, 1.0)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bidserve")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SimConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SimConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit path (no default file is created).
pub fn load_from_path(path: &Path) -> Result<SimConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: SimConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
