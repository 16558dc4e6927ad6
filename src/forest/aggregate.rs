//! Batch aggregation: one deck per service, merged into a single forest.
//!
//! Decks are extracted in parallel on blocking worker threads, each under its
//! own timeout, and merged one at a time in file-name order. A deck that
//! cannot be read, times out or panics leaves an error on its source record
//! and the batch carries on.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use sha2::{Digest, Sha256};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::core::config::AppConfig;
use crate::core::errors::{AppError, AppResult};
use crate::core::types::{
    AggregateMetadata, AggregatedForest, DocumentForest, EventsByService, SourceFileRecord,
};
use crate::forest::builder::{extract_document, read_document};
use crate::forest::merge::merge_into;
use crate::forest::node::ProjectMap;

const PPTX_SUFFIX: &str = ".pptx";

/// Human-readable service name from a deck file name:
/// `"12_service_cyber.pptx"` → `"Service Cyber"`.
pub fn service_name_from_filename(filename: &str) -> String {
    let parts: Vec<&str> = filename.split('_').collect();
    if parts.len() > 1 {
        let title = parts[1..].join(" ").replace(PPTX_SUFFIX, "");
        title
            .split_whitespace()
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        filename.replace(PPTX_SUFFIX, "").trim().to_string()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn checksum_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Serial merge of per-deck results into an aggregated forest.
#[derive(Debug, Clone, Default)]
pub struct ForestAccumulator {
    projects: ProjectMap,
    events_by_service: EventsByService,
    source_files: Vec<SourceFileRecord>,
    errors: Vec<String>,
}

impl ForestAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(
        &mut self,
        filename: &str,
        checksum: Option<String>,
        document: DocumentForest,
    ) {
        let duplicate_of = checksum.as_deref().and_then(|sum| self.find_checksum(sum));
        if let Some(original) = duplicate_of {
            info!(file = filename, duplicate_of = %original, "skipping duplicate deck");
            self.source_files.push(SourceFileRecord {
                filename: filename.to_string(),
                service_name: Some(service_name_from_filename(filename)),
                processed: false,
                events_count: 0,
                checksum,
                duplicate_of: Some(original),
                error: None,
            });
            return;
        }

        let service_name = service_name_from_filename(filename);
        let events = document.metadata.collected_upcoming_events;
        if !events.is_empty() {
            let service_events = self.events_by_service.entry(service_name.clone()).or_default();
            for event in &events {
                if !service_events.contains(event) {
                    service_events.push(event.clone());
                }
            }
        }

        merge_into(&mut self.projects, document.projects);

        if let Some(error) = &document.metadata.error {
            self.errors.push(format!("{filename}: {error}"));
        }
        self.source_files.push(SourceFileRecord {
            filename: filename.to_string(),
            service_name: Some(service_name),
            processed: true,
            events_count: events.len(),
            checksum,
            duplicate_of: None,
            error: document.metadata.error,
        });
    }

    pub fn record_failure(&mut self, filename: &str, error: &AppError) {
        if error.is_document_local() {
            warn!(file = filename, code = error.code(), "deck failed: {error}");
        } else {
            error!(file = filename, code = error.code(), "deck failed: {error}");
        }
        self.errors.push(format!("{filename}: {error}"));
        self.source_files.push(SourceFileRecord {
            filename: filename.to_string(),
            service_name: None,
            processed: false,
            events_count: 0,
            checksum: None,
            duplicate_of: None,
            error: Some(format!("Erreur lors de l'analyse: {error}")),
        });
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn find_checksum(&self, checksum: &str) -> Option<String> {
        self.source_files
            .iter()
            .filter(|record| record.duplicate_of.is_none())
            .find(|record| record.checksum.as_deref() == Some(checksum))
            .map(|record| record.filename.clone())
    }

    /// Closes the batch. When no deck contributed any event, every processed
    /// service gets `no_events_message` so it still shows up.
    pub fn finish(mut self, folder: &str, no_events_message: &str) -> AggregatedForest {
        if self.events_by_service.is_empty() {
            for record in self.source_files.iter().filter(|r| r.processed) {
                if let Some(service) = &record.service_name {
                    self.events_by_service
                        .entry(service.clone())
                        .or_insert_with(|| vec![no_events_message.to_string()]);
                }
            }
        }

        AggregatedForest {
            projects: self.projects,
            events_by_service: self.events_by_service,
            metadata: AggregateMetadata {
                processed_files: self.source_files.len(),
                folder: folder.to_string(),
                batch_id: Uuid::new_v4().to_string(),
                generated_at: Utc::now(),
                errors: self.errors,
            },
            source_files: self.source_files,
        }
    }
}

/// Deck files of `folder` accepted by `config`, sorted by file name.
pub fn list_decks(folder: &Path, config: &AppConfig) -> AppResult<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(AppError::NotFound(format!("folder {}", folder.display())));
    }
    let mut decks: Vec<PathBuf> = std::fs::read_dir(folder)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| config.is_allowed_file(name))
                .unwrap_or(false)
        })
        .collect();
    decks.sort();
    Ok(decks)
}

struct DeckResult {
    filename: String,
    outcome: AppResult<(String, DocumentForest)>,
}

pub async fn aggregate_folder(folder: &Path, config: &AppConfig) -> AppResult<AggregatedForest> {
    let decks = list_decks(folder, config)?;
    let folder_label = folder
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| folder.display().to_string());

    let mut accumulator = ForestAccumulator::new();
    if decks.is_empty() {
        let err = AppError::EmptyInput(format!("no deck found in {}", folder.display()));
        warn!("{err}");
        accumulator.record_error(err.to_string());
        return Ok(accumulator.finish(&folder_label, &config.no_events_message));
    }

    let span = info_span!("aggregate", folder = %folder_label, decks = decks.len());
    async move {
        let results: Vec<DeckResult> = stream::iter(decks)
            .map(|path| extract_deck(path, config.clone()))
            .buffered(config.workers.max(1))
            .collect()
            .await;

        for result in results {
            match result.outcome {
                Ok((checksum, document)) => {
                    accumulator.add_document(&result.filename, Some(checksum), document)
                }
                Err(err) => accumulator.record_failure(&result.filename, &err),
            }
        }

        let forest = accumulator.finish(&folder_label, &config.no_events_message);
        info!(
            projects = forest.projects.len(),
            services = forest.events_by_service.len(),
            errors = forest.metadata.errors.len(),
            "aggregation complete"
        );
        Ok(forest)
    }
    .instrument(span)
    .await
}

async fn extract_deck(path: PathBuf, config: AppConfig) -> DeckResult {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let timeout = config.doc_timeout;

    let outcome = run_blocking_with_timeout(timeout, move || {
        let bytes = read_document(&path, &config)?;
        let checksum = checksum_bytes(&bytes);
        Ok((checksum, extract_document(&bytes, config.extract_options())))
    })
    .await;
    DeckResult { filename, outcome }
}

/// Runs `job` on the blocking pool and gives up waiting after `timeout`.
/// The job itself keeps running; the runtime must be shut down with a
/// deadline for the process to exit before it finishes.
pub async fn run_blocking_with_timeout<T, F>(timeout: Duration, job: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> AppResult<T> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(job);
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_err)) => Err(AppError::Extraction(format!("worker failed: {join_err}"))),
        Err(_) => Err(AppError::Timeout(format!(
            "extraction exceeded {}s",
            timeout.as_secs()
        ))),
    }
}
