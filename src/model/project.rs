use serde::{Deserialize, Serialize};

use crate::model::resource::DEFAULT_SOURCE_LOCALE;

/// Largest number of rows written per database batch.
pub const MAX_BATCH_SIZE: usize = 1000;

fn default_source_locale() -> String {
    DEFAULT_SOURCE_LOCALE.to_string()
}

fn default_xliff_dir() -> String {
    "xliff".to_string()
}

fn default_batch_size() -> usize {
    MAX_BATCH_SIZE
}

/// Per-project settings, stored as `project.json` in the project directory.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default, alias = "project_path")]
    pub project_path: String,

    #[serde(default, alias = "root_path")]
    pub root_path: String,

    #[serde(default = "default_source_locale", alias = "source_locale")]
    pub source_locale: String,

    #[serde(default, alias = "target_locales")]
    pub target_locales: Vec<String>,

    /// Directory of exchange files, relative to the project directory.
    #[serde(default = "default_xliff_dir", alias = "xliff_dir")]
    pub xliff_dir: String,

    #[serde(default, alias = "db_path", skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,

    #[serde(default = "default_batch_size", alias = "batch_size")]
    pub batch_size: usize,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            project_path: String::new(),
            root_path: String::new(),
            source_locale: default_source_locale(),
            target_locales: Vec::new(),
            xliff_dir: default_xliff_dir(),
            db_path: None,
            batch_size: default_batch_size(),
        }
    }
}

impl ProjectConfig {
    /// Batch size clamped to `1..=MAX_BATCH_SIZE`.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.clamp(1, MAX_BATCH_SIZE)
    }
}
