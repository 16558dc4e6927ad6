use std::path::PathBuf;

use clap::Args;

use crate::commands::{emit, OutputArgs};
use crate::core::config::AppConfig;
use crate::core::errors::AppResult;
use crate::forest::aggregate::aggregate_folder;
use crate::forest::digest::format_digest;

#[derive(Debug, Clone, Args)]
pub struct AggregateArgs {
    /// Folder holding one deck per service
    pub folder: PathBuf,

    /// Decks extracted at the same time
    #[arg(long)]
    pub workers: Option<usize>,

    /// Per-deck extraction timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Keep event cells that do not look like upcoming events as project information
    #[arg(long)]
    pub verify_events: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub async fn run(args: AggregateArgs, mut config: AppConfig) -> AppResult<()> {
    if let Some(workers) = args.workers.filter(|workers| *workers > 0) {
        config.workers = workers;
    }
    if let Some(secs) = args.timeout_secs {
        config.doc_timeout = std::time::Duration::from_secs(secs);
    }
    config.verify_events |= args.verify_events;

    let forest = aggregate_folder(&args.folder, &config).await?;
    emit(&forest, || format_digest(&forest), &args.output)
}
