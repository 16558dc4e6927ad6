use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::core::config::AppConfig;
use crate::core::errors::{AppError, AppResult};

pub mod aggregate;
pub mod extract;
pub mod regroup;

#[derive(Debug, Parser)]
#[command(name = "statusdeck")]
#[command(about = "Builds a project status tree from per-service slide decks", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract the project forest of a single deck
    Extract(extract::ExtractArgs),
    /// Merge every deck of a folder into one forest
    Aggregate(aggregate::AggregateArgs),
    /// Regroup the top-level projects of an aggregated forest
    Regroup(regroup::RegroupArgs),
}

#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Write the JSON result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print a readable digest
    #[arg(short, long)]
    pub summary: bool,
}

pub async fn execute(cli: Cli, config: AppConfig) -> AppResult<()> {
    match cli.command {
        Command::Extract(args) => extract::run(args, &config),
        Command::Aggregate(args) => aggregate::run(args, config).await,
        Command::Regroup(args) => regroup::run(args),
    }
}

/// JSON goes to `--output` when given; the digest is printed on request; with
/// neither, JSON goes to stdout.
pub(crate) fn emit<T: Serialize>(
    value: &T,
    digest: impl FnOnce() -> String,
    args: &OutputArgs,
) -> AppResult<()> {
    if let Some(path) = &args.output {
        write_json(path, value)?;
        tracing::info!(path = %path.display(), "result written");
    }
    if args.summary {
        println!("{}", digest());
    } else if args.output.is_none() {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)
        .map_err(|e| AppError::Io(format!("cannot write {}: {e}", path.display())))
}
