//! Interactive driver for the per-resource circuit breaker.
//!
//! Reads one command per line from stdin and applies it to a running breaker:
//!
//! ```text
//! fail <resource>     report a failed call
//! ok <resource>       report a successful call
//! status <resource>   print the resource's status
//! dump                print every tracked record as JSON
//! quit                stop the breaker and exit
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use rpc_breaker::config::{load_config, AppConfig};
use rpc_breaker::lifecycle::{self, signals};
use rpc_breaker::observability;
use rpc_breaker::Breaker;

#[derive(Parser)]
#[command(name = "rpc-breaker")]
#[command(about = "Drive a per-resource circuit breaker from stdin", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

enum Command<'a> {
    Fail(&'a str),
    Ok(&'a str),
    Status(&'a str),
    Dump,
    Quit,
}

fn parse_command(line: &str) -> Option<Command<'_>> {
    let mut parts = line.split_whitespace();
    let command = match (parts.next()?, parts.next()) {
        ("fail", Some(resource)) => Command::Fail(resource),
        ("ok", Some(resource)) => Command::Ok(resource),
        ("status", Some(resource)) => Command::Status(resource),
        ("dump", None) => Command::Dump,
        ("quit", None) => Command::Quit,
        _ => return None,
    };
    parts.next().is_none().then_some(command)
}

/// Apply one command. Returns false when the driver should stop.
fn apply(breaker: &Breaker, line: &str) -> Result<bool, serde_json::Error> {
    match parse_command(line) {
        Some(Command::Fail(resource)) => breaker.record_failure(resource),
        Some(Command::Ok(resource)) => breaker.record_success(resource),
        Some(Command::Status(resource)) => println!("{:?}", breaker.status(resource)),
        Some(Command::Dump) => {
            let records: BTreeMap<_, _> = breaker.snapshot().into_iter().collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Some(Command::Quit) => return Ok(false),
        None if line.trim().is_empty() => {}
        None => eprintln!("unrecognised command: {}", line.trim()),
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    observability::init_logging(&config.logging)?;
    tracing::info!(config = ?cli.config, "rpc-breaker starting");

    let handle = lifecycle::start(config.breaker)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let shutdown = signals::shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    if !apply(&handle, &line)? {
                        break;
                    }
                }
                None => break,
            },
            _ = &mut shutdown => break,
        }
    }

    handle.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert!(matches!(parse_command("fail svc-a"), Some(Command::Fail("svc-a"))));
        assert!(matches!(parse_command("  ok   svc-b "), Some(Command::Ok("svc-b"))));
        assert!(matches!(parse_command("dump"), Some(Command::Dump)));
        assert!(parse_command("fail").is_none());
        assert!(parse_command("fail a b").is_none());
        assert!(parse_command("dump now").is_none());
    }

    #[test]
    fn test_apply_drives_breaker() {
        let breaker = Breaker::new(rpc_breaker::BreakerConfig::new(2, 1, 10)).unwrap();
        assert!(apply(&breaker, "fail svc-a").unwrap());
        assert!(apply(&breaker, "fail svc-a").unwrap());
        assert_eq!(breaker.status("svc-a"), rpc_breaker::BreakerStatus::Open);
        assert!(!apply(&breaker, "quit").unwrap());
    }
}
