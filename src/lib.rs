pub mod commands;
pub mod core;
pub mod forest;
pub mod slides;

use std::future::Future;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use crate::commands::Cli;
use crate::core::config::AppConfig;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

fn log_filter(config: &AppConfig, cli: &Cli) -> EnvFilter {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        config.log_level.as_str()
    };
    EnvFilter::new(format!("statusdeck_lib={level},statusdeck={level},warn"))
}

/// Drives `future` to completion, then shuts `runtime` down without waiting
/// on blocking jobs that outlived their timeout.
pub fn block_on_detached<F: Future>(runtime: Runtime, future: F) -> F::Output {
    let output = runtime.block_on(future);
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    output
}

fn init_tracing(filter: EnvFilter) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let config = AppConfig::from_env();
    init_tracing(log_filter(&config, &cli));

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers.max(1))
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!(error = %err, "failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    match block_on_detached(runtime, commands::execute(cli, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(code = err.code(), "{err}");
            eprintln!("{}", serde_json::json!({ "error": err }));
            ExitCode::FAILURE
        }
    }
}
