use crate::chart::{ChartKind, ColorScheme};
use crate::table::DEFAULT_UNIQUE_VALUES_LIMIT;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get path to a specific config file within the config directory
    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Generate default configuration template as a string
    pub fn generate_default_config(&self) -> String {
        DEFAULT_CONFIG_TEMPLATE.to_string()
    }

    /// Write default configuration to config file
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;
        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;

        Ok(config_path)
    }

    /// Read and parse `config.toml` from this directory.
    ///
    /// A missing file yields the defaults.
    pub fn load_config_file(&self) -> Result<AppConfig> {
        let config_path = self.config_path("config.toml");

        if !config_path.exists() {
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            eyre!(
                "Failed to read config file at {}: {}",
                config_path.display(),
                e
            )
        })?;

        toml::from_str(&content).map_err(|e| {
            eyre!(
                "Failed to parse config file at {}: {}",
                config_path.display(),
                e
            )
        })
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../config/default.toml");

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version (for future compatibility)
    pub version: String,
    pub analysis: AnalysisConfig,
    pub chart: ChartDefaults,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Cap on distinct values offered as filter suggestions
    pub unique_values_limit: usize,
}

/// Fallbacks for chart runs that leave kind or colour scheme unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartDefaults {
    pub default_kind: String,
    pub default_color_scheme: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            analysis: AnalysisConfig::default(),
            chart: ChartDefaults::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            unique_values_limit: DEFAULT_UNIQUE_VALUES_LIMIT,
        }
    }
}

impl Default for ChartDefaults {
    fn default() -> Self {
        Self {
            default_kind: ChartKind::default().as_str().to_string(),
            default_color_scheme: ColorScheme::default().as_str().to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

// Configuration loading and merging
impl AppConfig {
    /// Load configuration from all layers (default → user)
    pub fn load(app_name: &str) -> Result<Self> {
        let manager = ConfigManager::new(app_name)?;
        Self::load_from(&manager)
    }

    /// Same as [`AppConfig::load`] but reading from an explicit config directory.
    pub fn load_from(manager: &ConfigManager) -> Result<Self> {
        let mut config = AppConfig::default();
        config.merge(manager.load_config_file()?);
        config.validate()?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: AppConfig) {
        if other.version != AppConfig::default().version {
            self.version = other.version;
        }

        self.analysis.merge(other.analysis);
        self.chart.merge(other.chart);
        self.output.merge(other.output);
        self.logging.merge(other.logging);
        self.debug.merge(other.debug);
    }

    pub fn validate(&self) -> Result<()> {
        if !self.version.starts_with("0.1") {
            return Err(eyre!(
                "Unsupported config version: {}. Expected 0.1.x",
                self.version
            ));
        }

        if self.analysis.unique_values_limit == 0 {
            return Err(eyre!("unique_values_limit must be greater than 0"));
        }

        if ChartKind::parse(&self.chart.default_kind).is_none() {
            return Err(eyre!(
                "Invalid default_kind: {}. Run `snaplens chart --help` for the supported kinds",
                self.chart.default_kind
            ));
        }

        if !ColorScheme::iterator().any(|s| s.as_str() == self.chart.default_color_scheme) {
            return Err(eyre!(
                "Invalid default_color_scheme: {}",
                self.chart.default_color_scheme
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(eyre!(
                "Invalid logging level: {}. Must be one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            ));
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => {
                return Err(eyre!(
                    "Invalid logging format: {}. Must be 'pretty' or 'json'",
                    self.logging.format
                ))
            }
        }

        Ok(())
    }

    pub fn default_chart_kind(&self) -> ChartKind {
        ChartKind::parse(&self.chart.default_kind).unwrap_or_default()
    }
}

// Merge implementations for each config section
impl AnalysisConfig {
    pub fn merge(&mut self, other: Self) {
        let default = AnalysisConfig::default();
        if other.unique_values_limit != default.unique_values_limit {
            self.unique_values_limit = other.unique_values_limit;
        }
    }
}

impl ChartDefaults {
    pub fn merge(&mut self, other: Self) {
        let default = ChartDefaults::default();
        if other.default_kind != default.default_kind {
            self.default_kind = other.default_kind;
        }
        if other.default_color_scheme != default.default_color_scheme {
            self.default_color_scheme = other.default_color_scheme;
        }
    }
}

impl OutputConfig {
    pub fn merge(&mut self, other: Self) {
        if other.pretty {
            self.pretty = true;
        }
    }
}

impl LoggingConfig {
    pub fn merge(&mut self, other: Self) {
        let default = LoggingConfig::default();
        if other.level != default.level {
            self.level = other.level;
        }
        if other.format != default.format {
            self.format = other.format;
        }
    }
}

impl DebugConfig {
    pub fn merge(&mut self, other: Self) {
        if other.enabled {
            self.enabled = true;
        }
    }
}
