//! CLI for the bidserve transfer scheduler simulation.

mod commands;
mod render;

use anyhow::Result;
use bidserve_core::config::{self, SimConfig};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::{Path, PathBuf};

use commands::{
    run_completions, run_config, run_console, run_man, run_score, run_simulation, RunOptions,
};

/// Top-level CLI for bidserve.
#[derive(Debug, Parser)]
#[command(name = "bidserve")]
#[command(
    about = "bidserve: auction-scheduled multi-tenant transfer simulation",
    long_about = None
)]
pub struct Cli {
    /// Read configuration from this file instead of the XDG config location.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run a headless simulation, printing the status table on every refresh.
    Run {
        /// Worker pool size (overrides worker_count from the config).
        #[arg(long, value_name = "N")]
        workers: Option<usize>,
        /// Tenants registered before the pool starts.
        #[arg(long, default_value = "3", value_name = "M")]
        tenants: usize,
        /// Stop after this many seconds.
        #[arg(long, value_name = "S")]
        seconds: Option<u64>,
        /// Stop once every job has been transferred (implied without --seconds).
        #[arg(long)]
        until_complete: bool,
        /// Status refresh interval in milliseconds.
        #[arg(long, default_value = "1000", value_name = "MS")]
        refresh_ms: u64,
        /// Print one JSON snapshot per refresh instead of the table.
        #[arg(long)]
        json: bool,
    },

    /// Interactive console: start, stop, add [N], status, events, quit.
    Console {
        /// Worker pool size (overrides worker_count from the config).
        #[arg(long, value_name = "N")]
        workers: Option<usize>,
        /// Tenants registered before the first prompt.
        #[arg(long, default_value = "3", value_name = "M")]
        tenants: usize,
    },

    /// Print the auction score of a single bid.
    Score {
        /// Head job size in bytes.
        #[arg(long, value_name = "BYTES")]
        size: u64,
        /// Effective wait of the tenant in seconds.
        #[arg(long, default_value = "0", value_name = "SECS")]
        wait: f64,
        /// Number of eligible tenants in the round.
        #[arg(long, default_value = "1", value_name = "K")]
        bidders: usize,
    },

    /// Print the effective configuration as TOML.
    Config {
        /// Print the config file path instead.
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions on stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Generate the man page on stdout.
    Man,
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let cfg = match path {
        Some(p) => config::load_from_path(p)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let config_path = cli.config.as_deref();

        match cli.command {
            CliCommand::Run {
                workers,
                tenants,
                seconds,
                until_complete,
                refresh_ms,
                json,
            } => {
                let opts = RunOptions {
                    workers,
                    tenants,
                    seconds,
                    until_complete,
                    refresh_ms,
                    json,
                };
                run_simulation(load_config(config_path)?, &opts).await?;
            }
            CliCommand::Console { workers, tenants } => {
                run_console(load_config(config_path)?, workers, tenants).await?;
            }
            CliCommand::Score {
                size,
                wait,
                bidders,
            } => run_score(&load_config(config_path)?, size, wait, bidders),
            CliCommand::Config { path: true } => match config_path {
                Some(p) => println!("{}", p.display()),
                None => println!("{}", config::config_path()?.display()),
            },
            CliCommand::Config { path: false } => run_config(&load_config(config_path)?)?,
            CliCommand::Completions { shell } => run_completions(shell, &mut Cli::command()),
            CliCommand::Man => run_man(Cli::command())?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
