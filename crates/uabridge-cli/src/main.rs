//! Replay tool for the telemetry-to-address-space bridge.
//!
//! Reads newline-delimited dynamb JSON events from stdin, drives the mapping
//! engine against the recording in-memory provider and logs every resulting
//! address-space mutation. Useful for inspecting how a telemetry capture maps
//! onto protocol variables without running a protocol server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use uabridge_core::{BridgeOptions, Dynamb, MemoryAddressSpace, UaBridge, DYNAMB_EVENT};

/// Replay dynamb telemetry events from stdin through the mapping engine.
#[derive(Parser, Debug)]
#[command(name = "uabridge")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Protocol server port (forwarded configuration).
    #[arg(short, long, default_value_t = uabridge_core::config::DEFAULT_PORT)]
    port: u16,

    /// Server certificate file (forwarded configuration).
    #[arg(long, requires = "private_key_file")]
    certificate_file: Option<PathBuf>,

    /// Private key matching the certificate.
    #[arg(long, requires = "certificate_file")]
    private_key_file: Option<PathBuf>,

    /// Print event-handling errors to stderr.
    #[arg(long)]
    print_errors: bool,

    /// Verbose output (overrides RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut options = BridgeOptions::default()
        .with_port(args.port)
        .with_print_errors(args.print_errors);
    if let (Some(certificate), Some(key)) = (args.certificate_file, args.private_key_file) {
        options = options.with_certificate(certificate, key);
    }

    let space = Arc::new(MemoryAddressSpace::new());
    let bridge = UaBridge::new(space.clone(), options);
    info!(port = bridge.options().port, "bridge ready, reading dynamb events from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut events = 0u64;
    let mut failures = 0u64;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let dynamb: Dynamb = match serde_json::from_str(line) {
            Ok(dynamb) => dynamb,
            Err(error) => {
                warn!(%error, "unparseable line skipped");
                continue;
            }
        };
        events += 1;
        if let Err(error) = bridge.handle_event(DYNAMB_EVENT, &dynamb) {
            failures += 1;
            if bridge.options().print_errors {
                eprintln!("event failed: {error}");
            } else {
                warn!(%error, "event failed");
            }
        }
    }

    info!(
        events,
        failures,
        devices = bridge.registry().len(),
        nodes = space.node_count(),
        writes = space.write_count(),
        "replay complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args() {
        Args::command().debug_assert();
    }
}
