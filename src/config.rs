//! Configuration loaded from `~/.rivalcal/rc`
//!
//! The rc file holds `key=value` lines; blank lines and `#` comments are ignored.
//!
//! ```text
//! data.location=./state.db
//! intensity.base=0.15
//! intensity.increment=0.08
//! intensity.max=0.9
//! insight.match=same-kind
//! insight.document.warning_at=3
//! insight.aptitude.warning_at=2
//! insight.interview1.warning_at=3
//! insight.interview2.info_at=2
//! insight.interview3.warning_at=2
//! insight.interview1.enabled=false
//! insight.timeline.fast_below=14
//! insight.timeline.slow_above=30
//! insight.timeline.enabled=true
//! fetch.debounce_ms=300
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::fetch::DEFAULT_DEBOUNCE_MS;
use crate::insight::{InsightRules, InsightThresholds, StageMatch};
use crate::models::PinType;
use crate::overlap::IntensityScale;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("rc line {line}: invalid value '{value}' for '{key}' (expected {expected})")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
        expected: &'static str,
    },
    #[error("rc line {line}: expected key=value, got '{content}'")]
    MalformedLine { line: usize, content: String },
    #[error("intensity scale is inconsistent: base {base}, increment {increment}, max {max}")]
    InvalidScale { base: f64, increment: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Pin store location; `None` means the default under the config directory
    pub data_location: Option<PathBuf>,
    pub intensity: IntensityScale,
    pub insight: InsightThresholds,
    pub stage_match: StageMatch,
    pub debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_location: None,
            intensity: IntensityScale::default(),
            insight: InsightThresholds::default(),
            stage_match: StageMatch::SameKind,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// Home directory, honouring `$HOME` first so tests can redirect it
pub fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    pub fn config_dir() -> PathBuf {
        home_dir().join(".rivalcal")
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("rc")
    }

    /// Load the rc file, falling back to defaults when it does not exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let config = Self::parse(&content, base_dir)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Parse rc content. Relative `data.location` paths resolve against `base_dir`.
    pub fn parse(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (idx, raw_line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::MalformedLine {
                line: line_no,
                content: line.to_string(),
            })?;
            let key = key.trim();
            let value = value.trim();

            let invalid = |expected: &'static str| ConfigError::InvalidValue {
                line: line_no,
                key: key.to_string(),
                value: value.to_string(),
                expected,
            };
            let count = || value.parse::<usize>().map_err(|_| invalid("a non-negative integer"));
            let days = || value.parse::<i64>().map_err(|_| invalid("a number of days"));
            let ratio = || {
                value
                    .parse::<f64>()
                    .ok()
                    .filter(|v| (0.0..=1.0).contains(v))
                    .ok_or_else(|| invalid("a number between 0 and 1"))
            };
            let flag = || match value.to_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Ok(true),
                "false" | "off" | "no" | "0" => Ok(false),
                _ => Err(invalid("true or false")),
            };

            match key {
                "data.location" => {
                    let path = PathBuf::from(value);
                    config.data_location = Some(if path.is_relative() {
                        base_dir.join(path)
                    } else {
                        path
                    });
                }
                "intensity.base" => config.intensity.base = ratio()?,
                "intensity.increment" => config.intensity.increment = ratio()?,
                "intensity.max" => config.intensity.max = ratio()?,
                "insight.match" => {
                    config.stage_match = StageMatch::from_str(value).ok_or_else(|| invalid("same-kind or any"))?
                }
                "insight.document.warning_at" => config.insight.document_warning_at = count()?,
                "insight.aptitude.warning_at" => config.insight.aptitude_warning_at = count()?,
                "insight.interview1.warning_at" => config.insight.interview1_warning_at = count()?,
                "insight.interview2.info_at" => config.insight.interview2_info_at = count()?,
                "insight.interview3.warning_at" => config.insight.interview3_warning_at = Some(count()?),
                "insight.timeline.fast_below" => config.insight.timeline_fast_below = days()?,
                "insight.timeline.slow_above" => config.insight.timeline_slow_above = days()?,
                "insight.timeline.enabled" => config.insight.timeline_enabled = flag()?,
                "fetch.debounce_ms" => {
                    config.debounce_ms = value
                        .parse::<u64>()
                        .map_err(|_| invalid("milliseconds"))?
                }
                _ => {
                    if let Some(pin_type) = enabled_key(key) {
                        if flag()? {
                            config.insight.disabled.retain(|p| *p != pin_type);
                        } else if !config.insight.disabled.contains(&pin_type) {
                            config.insight.disabled.push(pin_type);
                        }
                    } else {
                        log::warn!("Ignoring unknown config key '{}' (rc line {})", key, line_no);
                    }
                }
            }
        }

        let scale = config.intensity;
        if scale.base > scale.max {
            return Err(ConfigError::InvalidScale {
                base: scale.base,
                increment: scale.increment,
                max: scale.max,
            });
        }

        Ok(config)
    }

    /// Rule set built from the configured thresholds
    pub fn insight_rules(&self) -> InsightRules {
        InsightRules::from_thresholds(&self.insight, self.stage_match)
    }
}

/// `insight.<category>.enabled` -> category
fn enabled_key(key: &str) -> Option<PinType> {
    let category = key.strip_prefix("insight.")?.strip_suffix(".enabled")?;
    category.parse::<PinType>().ok()
}
