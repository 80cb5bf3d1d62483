use anyhow::Result;
use eventfeed_sheets::{ColumnLayout, ColumnMap, DEFAULT_PLACEHOLDER_IMAGE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable that replaces the feed endpoint.
pub const SHEET_URL_ENV: &str = "EVENTFEED_SHEET_URL";

const SHEETS_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub feed: FeedConfig,

    #[serde(default)]
    pub columns: ColumnsConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub page: PageConfig,
}

/// Where the event sheet lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Spreadsheet id, the long token in the sheet's URL
    pub sheet_id: String,

    /// Tab name
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// Full endpoint override; `sheet_id` and `sheet_name` are ignored when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_sheet_name() -> String {
    "Form Responses 1".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            sheet_id: "YOUR_SHEET_ID".to_string(),
            sheet_name: default_sheet_name(),
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FeedConfig {
    /// Check if the feed points somewhere real (not the placeholder)
    pub fn is_configured(&self) -> bool {
        self.url.is_some() || (!self.sheet_id.is_empty() && !self.sheet_id.starts_with("YOUR_"))
    }

    /// The JSON export endpoint for the configured sheet.
    pub fn endpoint(&self) -> Result<String, ConfigError> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }

        let base = format!("{}/{}/gviz/tq", SHEETS_BASE, self.sheet_id);
        Url::parse_with_params(
            &base,
            &[("tqx", "out:json"), ("sheet", self.sheet_name.as_str())],
        )
        .map(String::from)
        .map_err(|e| ConfigError::Invalid(format!("feed endpoint: {}", e)))
    }
}

/// Override for an optional column: an index, or `"none"` when the sheet has
/// no such column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionalColumn {
    Index(usize),
    Absent(NoColumn),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoColumn {
    None,
}

impl OptionalColumn {
    pub fn index(self) -> Option<usize> {
        match self {
            OptionalColumn::Index(i) => Some(i),
            OptionalColumn::Absent(_) => None,
        }
    }
}

/// Column layout of the sheet; explicit indices override the layout preset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default)]
    pub layout: ColumnLayout,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_date: Option<OptionalColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<OptionalColumn>,
}

impl ColumnsConfig {
    pub fn column_map(&self) -> ColumnMap {
        let base = self.layout.column_map();
        ColumnMap {
            date: self.date.unwrap_or(base.date),
            sort_date: self.sort_date.map_or(base.sort_date, OptionalColumn::index),
            title: self.title.unwrap_or(base.title),
            description: self.description.unwrap_or(base.description),
            image: self.image.unwrap_or(base.image),
            alt: self.alt.unwrap_or(base.alt),
            publish: self.publish.map_or(base.publish, OptionalColumn::index),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Maximum number of cards; unset shows all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Only show rows whose publish column says "yes"
    #[serde(default)]
    pub published_only: bool,

    /// Interpret descriptions as markdown
    #[serde(default = "default_markdown")]
    pub markdown: bool,

    /// Image used when a row has none
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,

    /// Message shown instead of cards when nothing is visible
    #[serde(default = "default_empty_message")]
    pub empty_message: String,
}

fn default_markdown() -> bool {
    true
}

fn default_placeholder_image() -> String {
    DEFAULT_PLACEHOLDER_IMAGE.to_string()
}

fn default_empty_message() -> String {
    "No events available at this time.".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            limit: None,
            published_only: false,
            markdown: default_markdown(),
            placeholder_image: default_placeholder_image(),
            empty_message: default_empty_message(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// HTML page to render into; without one the bare fragment is printed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    /// Id of the element that receives the cards
    #[serde(default = "default_container_id")]
    pub container_id: String,
}

fn default_container_id() -> String {
    "events-container".to_string()
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            template: None,
            container_id: default_container_id(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save(&config_path)?;
            tracing::info!("Created default config at {}", config_path.display());
            return Ok(config.with_env_overrides());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, which must exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config.with_env_overrides())
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(SHEET_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!("Using feed endpoint from {}", SHEET_URL_ENV);
                self.feed.url = Some(url.trim().to_string());
            }
        }
        self
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if !self.feed.is_configured() {
            result.add_warning(
                "feed.sheet_id",
                "No sheet configured - only sample events are available",
            );
        }

        match self.feed.endpoint() {
            Ok(endpoint) => self.validate_url(&endpoint, "feed.url", &mut result),
            Err(e) => result.add_error("feed.url", e.to_string()),
        }

        if self.feed.timeout_secs == 0 {
            result.add_error("feed.timeout_secs", "Timeout must be greater than 0");
        } else if self.feed.timeout_secs > 300 {
            result.add_warning("feed.timeout_secs", "Timeout is unusually long (>300s)");
        }

        for (a, b, index) in self.columns.column_map().conflicts() {
            result.add_error(
                "columns",
                format!("{} and {} both use column {}", a, b, index),
            );
        }

        if self.render.limit == Some(0) {
            result.add_warning("render.limit", "A limit of 0 shows all events");
        }

        if self.page.container_id.trim().is_empty() {
            result.add_error("page.container_id", "Container id must not be empty");
        }

        if let Some(template) = &self.page.template {
            if !template.is_file() {
                result.add_warning(
                    "page.template",
                    format!("Template not found: {}", template.display()),
                );
            }
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))?;

        std::fs::write(path, contents).map_err(io_err)?;

        Ok(())
    }

    /// Get the path to the default configuration file
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("eventfeed");

        Ok(config_dir.join("config.toml"))
    }
}
