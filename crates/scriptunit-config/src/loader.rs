//! Configuration Loader
//!
//! Handles loading configuration and applying overrides with proper precedence.

use crate::project::{validate_log_level, LogConfig, OutputConfig, ProjectConfig};
use crate::{ConfigResult, CONFIG_FILE_NAME};
use std::env;
use std::path::{Path, PathBuf};

/// Default log level when nothing is configured
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Configuration loader
///
/// Loads configuration and merges it with proper precedence:
/// 1. Project config (./scriptunit.toml) - lowest priority
/// 2. Environment variables (SCRIPTUNIT_LOG, NO_COLOR) - overrides project
/// 3. CLI flags - highest priority (handled by caller)
#[derive(Debug, Default)]
pub struct ConfigLoader;

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Project configuration with environment overrides applied
    pub project: ProjectConfig,

    /// Project root directory (where scriptunit.toml was found)
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find scriptunit.toml.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_config) = self.find_project_config(start_dir)?;
        let project_config = self.apply_env_overrides(project_config)?;

        Ok(Config {
            project: project_config,
            project_root,
        })
    }

    /// Load configuration from a specific config file
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<Config> {
        let project_config = ProjectConfig::load_from_file(config_path)?;
        let project_config = self.apply_env_overrides(project_config)?;

        Ok(Config {
            project: project_config,
            project_root: config_path.parent().map(|p| p.to_path_buf()),
        })
    }

    /// Find project configuration by walking up the directory tree
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        for dir in start_dir.ancestors() {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                let project_config = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(dir.to_path_buf()), project_config));
            }
        }

        Ok((None, ProjectConfig::default()))
    }

    /// Apply environment variable overrides
    ///
    /// - SCRIPTUNIT_LOG=<level> replaces `[log] level`
    /// - NO_COLOR (any value) forces `[output] color = false`
    fn apply_env_overrides(&self, mut config: ProjectConfig) -> ConfigResult<ProjectConfig> {
        if let Ok(level) = env::var("SCRIPTUNIT_LOG") {
            validate_log_level("SCRIPTUNIT_LOG", &level)?;
            config
                .log
                .get_or_insert_with(LogConfig::default)
                .level = Some(level.to_lowercase());
        }

        if env::var_os("NO_COLOR").is_some() {
            config
                .output
                .get_or_insert_with(OutputConfig::default)
                .color = Some(false);
        }

        Ok(config)
    }
}

impl Config {
    /// Effective log level (config > default)
    pub fn log_level(&self) -> &str {
        self.project.log_level().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Whether colored output is enabled (default: true)
    pub fn color(&self) -> bool {
        self.project.color().unwrap_or(true)
    }

    /// Units to run when none are named
    pub fn units(&self) -> &[String] {
        self.project.units()
    }

    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if a scriptunit.toml was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }
}
