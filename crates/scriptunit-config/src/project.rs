//! Project Configuration (scriptunit.toml)
//!
//! Handles project-level configuration stored in `scriptunit.toml`.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Log levels accepted by `[log] level`
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Project configuration from scriptunit.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Run settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunConfig>,

    /// Output settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,

    /// Logging settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<LogConfig>,
}

/// Run configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Units to run when none are named on the command line
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Colorize CLI headers (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Minimum level written to stderr (default: "warn")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(level) = self.log.as_ref().and_then(|l| l.level.as_deref()) {
            validate_log_level("log.level", level)?;
        }

        if let Some(run) = &self.run {
            if run.units.iter().any(|unit| unit.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field: "run.units".to_string(),
                    reason: "unit names must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Configured default units
    pub fn units(&self) -> &[String] {
        self.run.as_ref().map(|r| r.units.as_slice()).unwrap_or(&[])
    }

    pub fn color(&self) -> Option<bool> {
        self.output.as_ref().and_then(|o| o.color)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.log.as_ref().and_then(|l| l.level.as_deref())
    }
}

/// Validate a log level value
pub fn validate_log_level(field: &str, value: &str) -> ConfigResult<()> {
    if !LOG_LEVELS.contains(&value.to_lowercase().as_str()) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!(
                "must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                value
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[run]
units = ["sample"]
"#;

        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.units(), ["sample".to_string()]);
        assert_eq!(config.color(), None);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[run]
units = ["sample", "nested"]

[output]
color = false

[log]
level = "debug"
"#;

        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.units().len(), 2);
        assert_eq!(config.color(), Some(false));
        assert_eq!(config.log_level(), Some("debug"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml = r#"
[run]
filter = "test_a"
"#;

        assert!(toml::from_str::<ProjectConfig>(toml).is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let config = ProjectConfig {
            log: Some(LogConfig {
                level: Some("loud".to_string()),
            }),
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_unit_name() {
        let config = ProjectConfig {
            run: Some(RunConfig {
                units: vec![" ".to_string()],
            }),
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }
}
