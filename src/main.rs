//! ovn-rebuilder - rebuild OVN and sync changed binaries to remote hosts
//!
//! Usage: ovn-rebuilder -c <CONFIG> -H <HOSTS> [OPTIONS]
//!
//! Waits for Enter, runs `make`, and pushes every artifact whose mtime moved
//! to each remote, restarting its service. Ctrl+C exits.

mod cli;
mod output;

use std::io::BufRead;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use ovn_rebuilder::application::{RebuildOptions, RebuildUseCase, Signal};
use ovn_rebuilder::config::parse_config;
use ovn_rebuilder::domain::ports::Connector;
use ovn_rebuilder::infrastructure::build::MakeBuilder;
use ovn_rebuilder::infrastructure::fs::LocalProbe;
use ovn_rebuilder::infrastructure::sync::create_connector;

use cli::Cli;
use output::Reporter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .init();

    let targets = parse_config(&cli.config, &cli.ovn_src, &cli.remote_path)?;
    log::info!(
        "Watching {} target(s) from {}",
        targets.len(),
        cli.config.display()
    );

    let reporter = Reporter::new(cli.json);
    let mut connector = create_connector(&cli.hosts, Arc::new(reporter))
        .context("Failed to create connection to remote host")?;

    if let Err(e) = connector.check_remote(&cli.remote_path) {
        connector.teardown();
        return Err(e).context("Failed to create connection to remote host");
    }

    let (tx, rx) = mpsc::channel();
    let interrupt_tx = tx.clone();
    ctrlc::set_handler(move || {
        let _ = interrupt_tx.send(Signal::Interrupt);
    })
    .context("Failed to install Ctrl+C handler")?;
    spawn_stdin_reader(tx);

    let options = RebuildOptions::new(&cli.ovn_src, cli.jobs());
    let mut use_case = RebuildUseCase::new(
        targets,
        connector,
        MakeBuilder::new(),
        LocalProbe::new(),
        options,
    );

    let summary = use_case.run(&rx, |event| reporter.emit(&event));
    log::info!(
        "{} cycle(s), {} target update(s), {} failed build(s), {} failed sync(s)",
        summary.cycles,
        summary.updated_targets,
        summary.failed_builds,
        summary.failed_syncs
    );

    Ok(())
}

/// Every line on stdin is a go request; EOF ends the session like Ctrl+C.
fn spawn_stdin_reader(tx: Sender<Signal>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            let signal = match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => Signal::Interrupt,
                Ok(_) => Signal::Go,
            };
            if tx.send(signal).is_err() || signal == Signal::Interrupt {
                break;
            }
        }
    });
}
