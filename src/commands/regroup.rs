use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use crate::commands::{emit, OutputArgs};
use crate::core::errors::{AppError, AppResult};
use crate::core::types::AggregatedForest;
use crate::forest::clusters::parse_clusters;
use crate::forest::digest::format_digest;

#[derive(Debug, Clone, Args)]
pub struct RegroupArgs {
    /// Aggregated forest JSON, as written by `aggregate`
    #[arg(long)]
    pub forest: PathBuf,

    /// Project groups: a JSON list of lists of names, possibly wrapped in prose
    #[arg(long)]
    pub clusters: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn run(args: RegroupArgs) -> AppResult<()> {
    let forest: AggregatedForest = serde_json::from_str(&read_text(&args.forest)?)?;
    let clusters = parse_clusters(&read_text(&args.clusters)?)?;

    let regrouped = forest.regrouped(&clusters);
    info!(
        clusters = clusters.len(),
        moved = regrouped.moved,
        projects = regrouped.forest.projects.len(),
        "regrouped forest"
    );
    emit(&regrouped.forest, || format_digest(&regrouped.forest), &args.output)
}

fn read_text(path: &Path) -> AppResult<String> {
    if !path.is_file() {
        return Err(AppError::NotFound(format!("file {}", path.display())));
    }
    std::fs::read_to_string(path)
        .map_err(|e| AppError::Io(format!("cannot read {}: {e}", path.display())))
}
