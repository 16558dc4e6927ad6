use std::time::Duration;

pub const DEFAULT_NO_EVENTS_MESSAGE: &str = "Aucun événement particulier prévu pour ce service.";

const DEFAULT_MAX_FILE_SIZE_MB: u64 = 100;
const DEFAULT_DOC_TIMEOUT_SECS: u64 = 30;
const DEFAULT_WORKERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractOptions {
    /// Route event cells that do not read like upcoming events into the
    /// project's information instead of the event list.
    pub verify_events: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    pub max_file_size_mb: u64,
    pub doc_timeout: Duration,
    pub workers: usize,
    pub verify_events: bool,
    pub no_events_message: String,
    pub allowed_extensions: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            doc_timeout: Duration::from_secs(DEFAULT_DOC_TIMEOUT_SECS),
            workers: DEFAULT_WORKERS,
            verify_events: false,
            no_events_message: DEFAULT_NO_EVENTS_MESSAGE.to_string(),
            allowed_extensions: vec!["pptx".to_string()],
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or unparsable values keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let log_level = lookup("STATUSDECK_LOG")
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| {
                matches!(value.as_str(), "trace" | "debug" | "info" | "warn" | "error")
            })
            .unwrap_or(defaults.log_level);
        let max_file_size_mb = lookup("STATUSDECK_MAX_FILE_SIZE_MB")
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(defaults.max_file_size_mb);
        let doc_timeout = lookup("STATUSDECK_DOC_TIMEOUT_SECS")
            .and_then(|value| value.trim().parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.doc_timeout);
        let workers = lookup("STATUSDECK_WORKERS")
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|workers| *workers > 0)
            .unwrap_or(defaults.workers);
        let verify_events = lookup("STATUSDECK_VERIFY_EVENTS")
            .map(|value| flag_enabled(&value))
            .unwrap_or(defaults.verify_events);
        let no_events_message = lookup("STATUSDECK_NO_EVENTS_MESSAGE")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.no_events_message);

        Self {
            log_level,
            max_file_size_mb,
            doc_timeout,
            workers,
            verify_events,
            no_events_message,
            allowed_extensions: defaults.allowed_extensions,
        }
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            verify_events: self.verify_events,
        }
    }

    pub fn is_allowed_file(&self, file_name: &str) -> bool {
        let lower = file_name.to_ascii_lowercase();
        self.allowed_extensions
            .iter()
            .any(|ext| lower.ends_with(&format!(".{ext}")))
    }
}

fn flag_enabled(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
