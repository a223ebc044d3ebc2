mod config;
mod driver;
mod terminal;
mod theme;
mod ui;

use anyhow::{Context, Result};
use ceph_ops_core::{render, CategoryCounts, Classifier, Monitor, SnapshotSource, RESERVED_ROWS};
use clap::Parser;
use config::{Args, MonitorConfig};
use driver::{CrosstermKeys, Driver, Timing};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use terminal::TerminalSession;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::TerminalView;

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("ceph-activescrubs: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = args.into_config()?;
    init_logging(config.log_file.as_deref())?;
    info!(
        interval_ms = config.interval.as_millis() as u64,
        idle_threshold = config.idle_threshold,
        once = config.once,
        "ceph-activescrubs starting"
    );

    if config.once {
        return print_once(config);
    }

    let monitor = Monitor::new(Classifier::new(config.idle_threshold));
    let timing = Timing {
        interval: config.interval,
        poll_step: config.poll_step,
    };

    let mut session = TerminalSession::enter()?;
    terminal::install_panic_hook();
    let result = {
        let view = TerminalView::new(&mut session);
        let mut driver = Driver::new(config.source, view, CrosstermKeys, monitor, timing);
        let result = driver.run();
        info!(
            cycles = driver.cycles(),
            state = ?driver.state(),
            idle_tracked = driver.monitor().ledger().len(),
            "monitor stopped"
        );
        result
    };
    let restored = session.restore();
    result?;
    restored
}

/// Single pass for scripts and pipes: every active scrub, no raw mode.
fn print_once(config: MonitorConfig) -> Result<()> {
    let mut source = config.source;
    let snapshot = source
        .fetch()
        .context("failed to list scrubbing placement groups")?;
    let active = Monitor::new(Classifier::new(config.idle_threshold)).observe(snapshot);
    let counts = CategoryCounts::tally(&active);

    let width = crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(80);
    let height = RESERVED_ROWS + active.len().max(1);
    for line in render(&active, &counts, height, width).texts() {
        println!("{}", line.trim_end());
    }
    Ok(())
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
        }
    }
    Ok(())
}
