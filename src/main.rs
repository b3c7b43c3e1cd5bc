//! src/main.rs
//!
//! Binary entry point. Parses the mandatory positional arguments, loads
//! layered configuration, initializes tracing, and runs the `App`.

use anyhow::Context;
use clap::Parser;
use gossip_chat::config::CliArgs;
use gossip_chat::{App, Config};

/// `<processID> <nProcesses> <portNo>` — the reference deployment's
/// invocation convention.
#[derive(Parser, Debug)]
#[command(name = "gossip-chat")]
struct Cli {
    process_id: u32,
    n_processes: u16,
    port_no: u16,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let config = Config::load(CliArgs {
        process_id: cli.process_id,
        n_processes: cli.n_processes,
        port_no: cli.port_no,
    })
    .context("failed to load configuration")?;

    let app = App::new(config).context("invalid configuration")?;

    if let Err(e) = app.run() {
        tracing::error!(error = %e, "application failed");
        std::process::exit(1);
    }

    Ok(())
}
