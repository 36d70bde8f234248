mod catalog;
mod classify;
mod cli_config;
mod dashboard;
mod logging;
mod naming;
mod ports;
mod render;
mod runtime;
mod server;
mod updater;

use crate::cli_config::Args;
use crate::dashboard::Dashboard;
use crate::logging::setup_logging;
use crate::runtime::ContainerRuntime;
use crate::updater::{DashboardUpdater, WebSettings};

use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tracing::info;

// =============================================================================
// Main Application
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let _guard = setup_logging(&args.log_dir, &args.log_level)?;

    info!("Starting container services dashboard");
    info!(
        "Config: {}, Output: {}, Runtime: {}",
        args.config.display(),
        args.output.display(),
        args.runtime
    );

    let dashboard = Dashboard::new(
        args.config,
        args.output,
        args.web_root,
        ContainerRuntime::new(args.runtime)
            .with_timeout(Duration::from_secs(args.runtime_timeout)),
        !args.running_only,
    );

    let web = args.enable_web.then(|| WebSettings {
        bind: args.bind,
        port: args.web_port,
    });

    let updater = DashboardUpdater::new(dashboard, Duration::from_secs(args.interval), web);

    if args.once {
        return updater.run_once().await;
    }

    updater.run().await;
    Ok(())
}
