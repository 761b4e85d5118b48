//! `bidserve config` – print the effective configuration.

use anyhow::{Context, Result};
use bidserve_core::config::SimConfig;

pub fn run_config(cfg: &SimConfig) -> Result<()> {
    let toml = toml::to_string_pretty(cfg).context("serialize config")?;
    print!("{}", toml);
    Ok(())
}
