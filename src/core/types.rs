use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::forest::node::ProjectMap;

/// Color of a text run as written in the slide (`a:srgbClr`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses a six-digit hex value such as `FF0000`.
    pub fn from_hex(raw: &str) -> Option<Self> {
        let hex = raw.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    Advancement,
    SmallAlert,
    CriticalAlert,
    Normal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub color: Option<Rgb>,
    #[serde(rename = "color_type")]
    pub category: AlertCategory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub runs: Vec<TextRun>,
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// One body row of a status table: project name, status text, upcoming events.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Row {
    pub name: Cell,
    pub information: Cell,
    pub events: Cell,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ForestMetadata {
    pub title: String,
    pub collected_upcoming_events: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Projects extracted from a single slide deck.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentForest {
    pub projects: ProjectMap,
    pub metadata: ForestMetadata,
}

impl DocumentForest {
    pub fn failed(title: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            projects: ProjectMap::new(),
            metadata: ForestMetadata {
                title: title.into(),
                collected_upcoming_events: Vec::new(),
                error: Some(error.into()),
            },
        }
    }
}

pub type EventsByService = IndexMap<String, Vec<String>>;

/// Node names an external collaborator judged to denote the same project.
pub type GroupingCluster = Vec<String>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceFileRecord {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    pub processed: bool,
    pub events_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_of: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateMetadata {
    pub processed_files: usize,
    pub folder: String,
    pub batch_id: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Projects and events merged across every deck of a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregatedForest {
    pub projects: ProjectMap,
    #[serde(rename = "upcoming_events")]
    pub events_by_service: EventsByService,
    pub metadata: AggregateMetadata,
    pub source_files: Vec<SourceFileRecord>,
}
