use lessonmark_engine::{parsing::ParseOptions, sections::GradingSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base directory for relative content paths.
    pub content_dir: PathBuf,
    /// Course and lesson ids key the option shuffle.
    #[serde(default = "default_course_id")]
    pub course_id: String,
    #[serde(default = "default_lesson_id")]
    pub lesson_id: String,
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub grading: GradingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub answer_scan_window: usize,
    pub answer_scan_grace: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        let options = ParseOptions::default();
        Self {
            answer_scan_window: options.answer_scan_window,
            answer_scan_grace: options.answer_scan_grace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    pub poll_attempts: u32,
    pub poll_interval_ms: u64,
}

impl Default for GradingConfig {
    fn default() -> Self {
        let settings = GradingSettings::default();
        Self {
            poll_attempts: settings.poll_attempts,
            poll_interval_ms: u64::try_from(settings.poll_interval.as_millis()).unwrap_or(500),
        }
    }
}

fn default_course_id() -> String {
    "course-1".to_string()
}

fn default_lesson_id() -> String {
    "lesson-1".to_string()
}

impl Config {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            course_id: default_course_id(),
            lesson_id: default_lesson_id(),
            parser: ParserConfig::default(),
            grading: GradingConfig::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded content path
        config.content_dir = Self::expand_path(&config.content_dir).unwrap_or(config.content_dir);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/lessonmark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Resolves a content path: absolute paths are kept, relative ones are
    /// taken from `content_dir`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        let path = Self::expand_path(path).unwrap_or_else(|| path.to_path_buf());
        if path.is_absolute() {
            path
        } else {
            self.content_dir.join(path)
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            answer_scan_window: self.parser.answer_scan_window,
            answer_scan_grace: self.parser.answer_scan_grace,
        }
    }

    pub fn grading_settings(&self) -> GradingSettings {
        GradingSettings {
            poll_attempts: self.grading.poll_attempts,
            poll_interval: Duration::from_millis(self.grading.poll_interval_ms),
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
