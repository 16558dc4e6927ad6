use std::path::PathBuf;

use clap::Args;

use crate::commands::{emit, OutputArgs};
use crate::core::config::AppConfig;
use crate::core::errors::AppResult;
use crate::forest::aggregate::{checksum_bytes, ForestAccumulator};
use crate::forest::builder::{extract_document, read_document};
use crate::forest::digest::format_digest;

#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// Path to the deck to analyze
    pub file: PathBuf,

    /// Keep event cells that do not look like upcoming events as project information
    #[arg(long)]
    pub verify_events: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn run(args: ExtractArgs, config: &AppConfig) -> AppResult<()> {
    let bytes = read_document(&args.file, config)?;
    let mut options = config.extract_options();
    options.verify_events |= args.verify_events;
    let document = extract_document(&bytes, options);

    let filename = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| args.file.display().to_string());
    let digest = || {
        let mut accumulator = ForestAccumulator::new();
        accumulator.add_document(&filename, Some(checksum_bytes(&bytes)), document.clone());
        format_digest(&accumulator.finish(&filename, &config.no_events_message))
    };
    emit(&document, digest, &args.output)
}
