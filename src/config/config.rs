use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::data::data_view::{SortConfig, SortDirection, DEFAULT_PAGE_SIZE};
use crate::data::datatable::Field;

/// Endpoint the records are fetched from when nothing else is configured
pub const DEFAULT_SOURCE_URL: &str = "https://jsonplaceholder.typicode.com/todos";

/// Environment variable overriding the configured source URL
pub const SOURCE_URL_ENV: &str = "TODO_GRID_URL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// JSON endpoint returning the todo array
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows per page
    pub page_size: usize,

    /// Use Unicode arrows for sort indicators
    pub use_glyphs: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Field the search box matches against at startup
    pub default_category: Field,

    /// Field the table is sorted by at startup
    pub default_sort: Field,

    pub default_direction: SortDirection,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            use_glyphs: true,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            default_category: Field::Title,
            default_sort: Field::Id,
            default_direction: SortDirection::Ascending,
        }
    }
}

impl BehaviorConfig {
    pub fn initial_sort(&self) -> SortConfig {
        SortConfig::new(self.default_sort, self.default_direction)
    }
}

impl Config {
    /// Load config from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config.with_env_overrides());
        }

        Ok(Self::load_from(&config_path)?.with_env_overrides())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.display.page_size = config.display.page_size.max(1);
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(SOURCE_URL_ENV) {
            if !url.trim().is_empty() {
                self.source.url = url;
            }
        }
        self
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("todo-grid").join("config.toml"))
    }

    /// Default config file with comments
    pub fn create_default_with_comments() -> String {
        format!(
            r#"# todo-grid configuration
# Location: ~/.config/todo-grid/config.toml (Linux)

[source]
# JSON endpoint returning an array of {{ userId, id, title }} records.
# The {env} environment variable takes precedence.
url = "{url}"

[display]
# Rows per page
page_size = {page_size}

# Unicode sort arrows; set to false for ASCII
use_glyphs = true

[behavior]
# Search category at startup: "id", "userId" or "title"
default_category = "title"

# Sort column and direction at startup
default_sort = "id"
default_direction = "ascending"
"#,
            env = SOURCE_URL_ENV,
            url = DEFAULT_SOURCE_URL,
            page_size = DEFAULT_PAGE_SIZE,
        )
    }
}
