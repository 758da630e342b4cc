//! Widget and source settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::filter::DEFAULT_DEBOUNCE_MS;

/// Default endpoint: the Rick and Morty character list.
pub const DEFAULT_SOURCE_URL: &str = "https://rickandmortyapi.com/api/character";

/// How search text changes are committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterModeSetting {
    /// Recompute on every keystroke.
    Sync,
    /// Recompute once typing pauses.
    #[default]
    Debounced,
}

/// Appearance and behavior of the picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    pub title: String,
    pub placeholder: String,
    /// Shown when nothing matches; "Not found" if unset.
    pub empty_text: Option<String>,
    pub loading_text: String,
    pub filter_mode: FilterModeSetting,
    /// Debounce window in milliseconds.
    pub debounce_ms: u64,
    /// "dark" or "light".
    pub theme: String,
    /// Loading animation: "braille" or "simple".
    pub spinner: String,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            title: " Characters ".to_string(),
            placeholder: "Type to search...".to_string(),
            empty_text: None,
            loading_text: "Loading...".to_string(),
            filter_mode: FilterModeSetting::Debounced,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            theme: "dark".to_string(),
            spinner: "braille".to_string(),
        }
    }
}

/// Where the candidate records come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// HTTP(S) endpoint returning JSON.
    pub url: String,
    /// Local JSON file; takes precedence over `url`.
    pub file: Option<PathBuf>,
    /// Record field the search matches against.
    pub field: String,
    /// Optional field shown as a second line under each suggestion.
    pub detail_field: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            file: None,
            field: "name".to_string(),
            detail_field: Some("species".to_string()),
            timeout_secs: 30,
        }
    }
}
