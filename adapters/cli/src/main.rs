#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Tron grid game in the terminal.

mod grid_file;
mod session;

use std::{io, path::PathBuf};

use anyhow::{Context, Result as AnyResult};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tron_grid_core::{PlayMode, ReferenceRoute};
use tron_grid_rendering::{ReportFormat, TextBackend};
use tron_grid_system_turns::{Config, TurnEngine};

const DEFAULT_LOG_FILTER: &str = "warn";

/// Command-line arguments accepted by the `tron-grid` binary.
#[derive(Debug, Parser)]
#[command(name = "tron-grid", about = "Guide Tron to the I/O Tower before the grid bugs catch up")]
struct CliArgs {
    /// Grid file: a "<rows> <columns>" line followed by the symbol rows.
    grid: PathBuf,
    /// 0 previews the bugs' routes after one move, 1 plays with shortest-path
    /// bugs, 2 plays with bugs following the weighted search.
    #[arg(value_parser = clap::value_parser!(u8).range(0..=2), default_value_t = 0)]
    mode: u8,
    /// Route whose cells the weighted search prefers.
    #[arg(long, value_enum, default_value_t = RouteArg::SearcherToTron)]
    reference_route: RouteArg,
    /// Encoding of preview reports.
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    report_format: FormatArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RouteArg {
    SearcherToTron,
    TronToTower,
}

impl From<RouteArg> for ReferenceRoute {
    fn from(value: RouteArg) -> Self {
        match value {
            RouteArg::SearcherToTron => ReferenceRoute::SearcherToTron,
            RouteArg::TronToTower => ReferenceRoute::TronToTower,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

impl CliArgs {
    fn engine_config(&self) -> AnyResult<Config> {
        let mode = PlayMode::from_index(self.mode)
            .with_context(|| format!("unsupported play mode {}", self.mode))?;
        Ok(Config::new(mode, self.reference_route.into()))
    }
}

/// Entry point for the Tron grid command-line interface.
fn main() -> AnyResult<()> {
    let args = CliArgs::parse();
    init_tracing();

    let config = args.engine_config()?;
    let mut world = grid_file::load(&args.grid)
        .with_context(|| format!("failed to load grid from {}", args.grid.display()))?;
    let engine = TurnEngine::new(config);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut backend = TextBackend::new(io::stdout().lock(), args.report_format.into());

    let state = session::run(&mut world, &engine, &mut input, &mut backend)?;
    info!(?state, mode = ?config.mode(), "session finished");
    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
