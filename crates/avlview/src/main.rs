//! avlview: launch two AVL instances showing the geometry and Trefftz views
//! of a wing, tile their plot windows on the right half of the screen, and
//! capture the neutral point from the stability report.

mod assets;
mod capture;
mod cli;
mod config;
mod error;
mod placement;
mod poll;
mod supervisor;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::prelude::*;

use crate::{cli::Cli, error::Result, supervisor::Supervisor};

/// Prepare assets and drive the run: the interactive dual-viewer
/// orchestration, or a single batch instance under `--batch`.
async fn run(cli: &Cli) -> Result<()> {
    let plan = assets::prepare(cli)?;
    let batch_script = plan.batch_script.clone();
    let supervisor = Supervisor::new(plan, winops::platform(), cli.layout.into());
    match batch_script {
        Some(script) => supervisor.run_batch(&script).await,
        None => {
            let result = supervisor.run().await?;
            info!(
                geometry = ?result.geometry_exit,
                trefftz = ?result.trefftz_exit,
                "both AVL instances exited cleanly"
            );
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let spec = logging::compute_spec(
        cli.log.trace,
        cli.log.debug,
        cli.log.log_level.as_deref(),
        cli.log.log_filter.as_deref(),
    );
    let _ = tracing_subscriber::registry()
        .with(logging::env_filter_from_spec(&spec))
        .with(tracing_subscriber::fmt::layer().without_time())
        .try_init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(err) => {
            error!("failed to start async runtime: {err}");
            std::process::exit(1);
        }
    };
    let code = match runtime.block_on(run(&cli)) {
        Ok(()) => 0,
        Err(err) => {
            error!("{err}");
            err.exit_code()
        }
    };
    std::process::exit(code);
}
