use std::path::Path;

use tracing::{debug, info, warn};

use crate::core::config::{AppConfig, ExtractOptions};
use crate::core::errors::{AppError, AppResult};
use crate::core::types::{DocumentForest, ForestMetadata, Row};
use crate::forest::hierarchy::parse_hierarchy;
use crate::forest::node::{ProjectMap, ProjectNode, StatusPayload};
use crate::slides::pptx;
use crate::slides::table::extract_slide_rows;

pub const NO_SLIDES_TITLE: &str = "No slides";
pub const NO_SLIDES_ERROR: &str = "Presentation has no slides";
pub const NO_TABLE_DATA_ERROR: &str = "No table data extracted from slide";
pub const ERROR_TITLE: &str = "Error";

const UPCOMING_EVENT_HINTS: &[&str] = &[
    "événement",
    "evenement",
    "à venir",
    "a venir",
    "prochain",
    "semaine prochaine",
    "mois prochain",
    "futur",
    "prévu",
    "prevu",
    "sera",
    "planning",
    "calendrier",
    "agenda",
    "rendez-vous",
    "rendez vous",
];

pub fn build_forest(rows: &[Row], title: &str) -> DocumentForest {
    build_forest_with(rows, title, ExtractOptions::default())
}

pub fn build_forest_with(rows: &[Row], title: &str, options: ExtractOptions) -> DocumentForest {
    let mut projects = ProjectMap::new();
    let mut events: Vec<String> = Vec::new();

    for row in rows {
        let name = row.name.text.trim();
        if name.is_empty() {
            debug!("skipping row without project name");
            continue;
        }

        let mut status = row_status(row);
        let event = row.events.text.trim();
        if !event.is_empty() {
            if options.verify_events && !looks_like_upcoming_event(event) {
                debug!(project = name, "events cell is not an upcoming event, kept as information");
                if status.information.is_empty() {
                    status.information = event.to_string();
                } else {
                    status.information.push('\n');
                    status.information.push_str(event);
                }
            } else if !events.iter().any(|known| known == event) {
                events.push(event.to_string());
            }
        }

        let levels = parse_hierarchy(name);
        insert_project(&mut projects, &levels, status);
    }

    DocumentForest {
        projects,
        metadata: ForestMetadata {
            title: title.to_string(),
            collected_upcoming_events: events,
            error: None,
        },
    }
}

/// Places `status` at the path `levels`, creating intermediate nodes as needed.
/// Every lookup is case-insensitive and keeps the first spelling seen.
pub fn insert_project(projects: &mut ProjectMap, levels: &[String], status: StatusPayload) {
    let Some((leaf, parents)) = levels.split_last() else {
        return;
    };

    let mut current = projects;
    for level in parents {
        current = current
            .entry_ci(level, ProjectNode::intermediate)
            .children_mut();
    }

    match current.get_ci_mut(leaf) {
        Some(existing) => existing.attach_status(status),
        None => {
            current.insert(leaf.clone(), ProjectNode::Terminal(status));
        }
    }
}

fn row_status(row: &Row) -> StatusPayload {
    let mut status = StatusPayload::with_information(row.information.text.clone());
    for run in &row.information.runs {
        status.push_alert(run.category, &run.text);
    }
    status
}

pub fn looks_like_upcoming_event(text: &str) -> bool {
    let lower = text.to_lowercase();
    UPCOMING_EVENT_HINTS.iter().any(|hint| lower.contains(hint))
}

/// Forest of one `.pptx` package. Package and slide problems are recorded in
/// the forest metadata instead of being returned.
pub fn extract_document(bytes: &[u8], options: ExtractOptions) -> DocumentForest {
    let slide = match pptx::read_first_slide(bytes) {
        Ok(Some(slide)) => slide,
        Ok(None) => {
            warn!("presentation has no slides");
            return DocumentForest::failed(NO_SLIDES_TITLE, NO_SLIDES_ERROR);
        }
        Err(err) => {
            warn!("cannot read presentation: {err}");
            return DocumentForest::failed(
                ERROR_TITLE,
                format!("Error processing presentation: {err}"),
            );
        }
    };

    let rows = extract_slide_rows(&slide.tables);
    if rows.is_empty() {
        warn!(title = %slide.title, tables = slide.tables.len(), "no table rows extracted");
        return DocumentForest::failed(slide.title, NO_TABLE_DATA_ERROR);
    }

    let forest = build_forest_with(&rows, &slide.title, options);
    info!(
        title = %forest.metadata.title,
        rows = rows.len(),
        projects = forest.projects.len(),
        events = forest.metadata.collected_upcoming_events.len(),
        "extracted project forest"
    );
    forest
}

/// Reads and extracts a single deck. File-level problems (missing, too large,
/// unreadable) are returned as errors.
pub fn extract_document_file(path: &Path, config: &AppConfig) -> AppResult<DocumentForest> {
    let bytes = read_document(path, config)?;
    Ok(extract_document(&bytes, config.extract_options()))
}

pub(crate) fn read_document(path: &Path, config: &AppConfig) -> AppResult<Vec<u8>> {
    if !path.is_file() {
        return Err(AppError::NotFound(format!("file {}", path.display())));
    }
    let size = std::fs::metadata(path)?.len();
    if size > config.max_file_size_bytes() {
        return Err(AppError::InvalidInput(format!(
            "{} is {size} bytes, above the {} MB limit",
            path.display(),
            config.max_file_size_mb
        )));
    }
    std::fs::read(path).map_err(|e| AppError::Io(format!("cannot read {}: {e}", path.display())))
}
