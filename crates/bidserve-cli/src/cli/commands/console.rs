//! `bidserve console` – line-driven control of a live scheduler.

use anyhow::{Context, Result};
use bidserve_core::config::SimConfig;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::build_scheduler;
use crate::cli::render;

const HELP: &str = "commands: start | stop | add [N] | status | events | help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start,
    Stop,
    Add(usize),
    Status,
    Events,
    Help,
    Quit,
}

/// Parse one input line; `Ok(None)` for a blank line.
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let cmd = match word.to_ascii_lowercase().as_str() {
        "start" => ConsoleCommand::Start,
        "stop" => ConsoleCommand::Stop,
        "add" => match words.next() {
            None => ConsoleCommand::Add(1),
            Some(n) => n
                .parse::<usize>()
                .map(ConsoleCommand::Add)
                .map_err(|_| format!("add: not a count: {n}"))?,
        },
        "status" | "s" => ConsoleCommand::Status,
        "events" | "e" => ConsoleCommand::Events,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" | "q" => ConsoleCommand::Quit,
        other => return Err(format!("unknown command: {other}")),
    };
    if let Some(extra) = words.next() {
        return Err(format!("unexpected argument: {extra}"));
    }
    Ok(Some(cmd))
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

pub async fn run_console(cfg: SimConfig, workers: Option<usize>, tenants: usize) -> Result<()> {
    let scheduler = build_scheduler(cfg, workers, tenants);
    println!(
        "{} workers, {} tenants. {}",
        scheduler.worker_count(),
        tenants,
        HELP
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut cursor = 0;
    prompt();
    while let Some(line) = lines.next_line().await.context("read stdin")? {
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(ConsoleCommand::Start)) => {
                scheduler.start().context("start worker pool")?;
                println!("running");
            }
            Ok(Some(ConsoleCommand::Stop)) => {
                scheduler.stop();
                println!("{:?}", scheduler.run_state());
            }
            Ok(Some(ConsoleCommand::Add(n))) => {
                let ids: Vec<String> = (0..n)
                    .map(|_| scheduler.add_tenant().to_string())
                    .collect();
                println!("added tenant(s) {}", ids.join(", "));
            }
            Ok(Some(ConsoleCommand::Status)) => {
                print!("{}", render::status_table(&scheduler.snapshot()));
            }
            Ok(Some(ConsoleCommand::Events)) => {
                let (events, next) = scheduler.events().events_since(cursor);
                if events.is_empty() {
                    println!("no new events");
                }
                for event in &events {
                    println!("{}", render::event_line(event));
                }
                println!("{}", render::event_totals(scheduler.events()));
                cursor = next;
            }
            Ok(Some(ConsoleCommand::Help)) => println!("{}", HELP),
            Ok(Some(ConsoleCommand::Quit)) => break,
            Err(msg) => println!("{}; {}", msg, HELP),
        }
        prompt();
    }

    scheduler.stop();
    let stats = scheduler.stats();
    tracing::info!(
        completed = stats.jobs_completed,
        failed = stats.jobs_failed,
        "console closed"
    );
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_line("start"), Ok(Some(ConsoleCommand::Start)));
        assert_eq!(parse_line("  STOP "), Ok(Some(ConsoleCommand::Stop)));
        assert_eq!(parse_line("add"), Ok(Some(ConsoleCommand::Add(1))));
        assert_eq!(parse_line("add 4"), Ok(Some(ConsoleCommand::Add(4))));
        assert_eq!(parse_line("s"), Ok(Some(ConsoleCommand::Status)));
        assert_eq!(parse_line("events"), Ok(Some(ConsoleCommand::Events)));
        assert_eq!(parse_line("q"), Ok(Some(ConsoleCommand::Quit)));
        assert_eq!(parse_line(""), Ok(None));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_line("add many").unwrap_err().contains("not a count"));
        assert!(parse_line("launch").unwrap_err().contains("unknown command"));
        assert!(parse_line("stop now").unwrap_err().contains("unexpected"));
    }
}
