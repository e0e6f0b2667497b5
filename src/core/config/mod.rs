//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! shotpath has two configuration scopes:
//! - **Global**: User-level settings (site URL, menu favourites)
//! - **Project**: Per host-project settings (templates, publish, render)
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$SHOTPATH_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/shotpath/config.toml`
//! 3. `~/.shotpath/config.toml` (canonical write location)
//!
//! # Project Config Locations
//!
//! Searched in order:
//! 1. `<project>/.shotpath/config.toml` (canonical)
//! 2. `<project>/shotpath.toml` (compatibility, warns)
//!
//! # Example
//!
//! ```no_run
//! use shotpath::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/path/to/project"))).unwrap();
//! let config = result.config;
//!
//! println!("Metadata prefix: {}", config.metadata_tag_prefix());
//! println!("Movie template: {}", config.movie_template());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, MenuFavourite, ProjectConfig};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::template::TemplateSet;

/// Default prefix for asset metadata tags.
pub const DEFAULT_METADATA_TAG_PREFIX: &str = "SG.";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence rules automatically. Project config overrides
/// global config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Project configuration (if one was found)
    pub project: Option<ProjectConfig>,
    global_path: Option<PathBuf>,
    project_path: Option<PathBuf>,
}

impl Config {
    /// Configuration built in memory rather than loaded from disk.
    pub fn new(global: GlobalConfig, project: Option<ProjectConfig>) -> Self {
        Self {
            global,
            project,
            global_path: None,
            project_path: None,
        }
    }

    /// Load configuration from default locations.
    ///
    /// If `project_dir` is provided, also loads project-specific config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or fail
    /// validation. Missing config files are not an error.
    pub fn load(project_dir: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let (global, global_path) = Self::load_global()?;

        let (project, project_path) = match project_dir {
            Some(dir) => Self::load_project(dir, &mut warnings)?,
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref p) = project {
            p.validate()?;
        }

        let config = Config {
            global,
            project,
            global_path,
            project_path,
        };
        config.validate_template_references()?;

        Ok(ConfigLoadResult { config, warnings })
    }

    fn load_global() -> Result<(GlobalConfig, Option<PathBuf>), ConfigError> {
        // 1. Check $SHOTPATH_CONFIG
        if let Ok(path) = std::env::var("SHOTPATH_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 2. Check $XDG_CONFIG_HOME/shotpath/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("shotpath/config.toml");
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 3. Check ~/.shotpath/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".shotpath/config.toml");
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((GlobalConfig::default(), None))
    }

    fn load_project(
        project_dir: &Path,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<(Option<ProjectConfig>, Option<PathBuf>), ConfigError> {
        let canonical = Self::project_config_path(project_dir);
        if canonical.exists() {
            let config = Self::read_config(&canonical)?;
            return Ok((Some(config), Some(canonical)));
        }

        let compat = project_dir.join("shotpath.toml");
        if compat.exists() {
            warnings.push(ConfigWarning {
                message: format!(
                    "Using deprecated config location. Please move to '{}'",
                    canonical.display()
                ),
                path: compat.clone(),
            });
            let config = Self::read_config(&compat)?;
            return Ok((Some(config), Some(compat)));
        }

        Ok((None, None))
    }

    fn read_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Publish template names must exist in the merged template set.
    fn validate_template_references(&self) -> Result<(), ConfigError> {
        let templates = self.templates()?;
        for name in [self.movie_template(), self.asset_template()] {
            if templates.get(name).is_none() {
                return Err(ConfigError::InvalidValue(format!(
                    "publish template '{}' is not defined",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Get the canonical path for global config.
    ///
    /// Returns `~/.shotpath/config.toml`.
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".shotpath/config.toml"))
    }

    /// Get the canonical path for project config.
    pub fn project_config_path(project_dir: &Path) -> PathBuf {
        project_dir.join(".shotpath/config.toml")
    }

    /// Write project config atomically.
    ///
    /// Creates parent directories if needed.
    pub fn write_project(project_dir: &Path, config: &ProjectConfig) -> Result<PathBuf, ConfigError> {
        let path = Self::project_config_path(project_dir);
        Self::write_config_atomic(&path, config)?;
        Ok(path)
    }

    /// Write global config atomically.
    pub fn write_global(config: &GlobalConfig) -> Result<PathBuf, ConfigError> {
        let path = Self::global_config_path()?;
        Self::write_config_atomic(&path, config)?;
        Ok(path)
    }

    fn write_config_atomic<T: serde::Serialize>(path: &Path, config: &T) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        // Write to temp file in same directory (for atomic rename)
        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Pipeline site URL from the global config, if any.
    pub fn site_url(&self) -> Option<&str> {
        self.global.site_url.as_deref()
    }

    /// Prefix for asset metadata tags.
    ///
    /// Defaults to `"SG."` if not configured.
    pub fn metadata_tag_prefix(&self) -> &str {
        self.project
            .as_ref()
            .and_then(|p| p.metadata_tag_prefix.as_deref())
            .or(self.global.metadata_tag_prefix.as_deref())
            .unwrap_or(DEFAULT_METADATA_TAG_PREFIX)
    }

    /// Full metadata tag name for a key, e.g. `SG.version_number`.
    pub fn metadata_tag(&self, key: &str) -> String {
        format!("{}{}", self.metadata_tag_prefix(), key)
    }

    /// Menu favourites.
    pub fn menu_favourites(&self) -> &[MenuFavourite] {
        self.global.menu_favourites.as_deref().unwrap_or(&[])
    }

    /// Template used for movie publishes.
    ///
    /// Defaults to `"unreal_movie_publish"`.
    pub fn movie_template(&self) -> &str {
        self.publish_setting(|p| p.movie_template.as_deref())
            .unwrap_or("unreal_movie_publish")
    }

    /// Template used for FBX publishes.
    ///
    /// Defaults to `"unreal_asset_publish"`.
    pub fn asset_template(&self) -> &str {
        self.publish_setting(|p| p.asset_template.as_deref())
            .unwrap_or("unreal_asset_publish")
    }

    /// Movie Render Queue presets asset path, if configured.
    pub fn render_presets(&self) -> Option<&str> {
        self.publish_setting(|p| p.render_presets.as_deref())
    }

    /// Render resolution as `(width, height)`.
    ///
    /// Defaults to 1280x720.
    pub fn render_resolution(&self) -> (u32, u32) {
        self.render_setting(|r| r.resolution)
            .map(|[w, h]| (w, h))
            .unwrap_or((1280, 720))
    }

    /// Level Sequencer capture frame rate.
    ///
    /// Defaults to 24.
    pub fn render_frame_rate(&self) -> u32 {
        self.render_setting(|r| r.frame_rate).unwrap_or(24)
    }

    /// Level Sequencer movie quality.
    ///
    /// Defaults to 75.
    pub fn render_quality(&self) -> u32 {
        self.render_setting(|r| r.quality).unwrap_or(75)
    }

    /// Built-in templates merged with the project's.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a definition does not parse.
    pub fn templates(&self) -> Result<TemplateSet, ConfigError> {
        let mut keys = schema::default_template_keys();
        let mut paths = schema::default_template_paths();

        if let Some(templates) = self.project.as_ref().and_then(|p| p.templates.as_ref()) {
            keys.extend(templates.keys.clone());
            paths.extend(templates.paths.clone());
        }

        TemplateSet::new(keys, &paths).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded project config file.
    pub fn project_config_loaded_from(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }

    fn publish_setting<'a, T: ?Sized>(
        &'a self,
        get: impl Fn(&'a schema::PublishConfig) -> Option<&'a T>,
    ) -> Option<&'a T> {
        self.project
            .as_ref()
            .and_then(|p| p.publish.as_ref())
            .and_then(get)
    }

    fn render_setting<T>(&self, get: impl Fn(&schema::RenderConfig) -> Option<T>) -> Option<T> {
        self.project
            .as_ref()
            .and_then(|p| p.render.as_ref())
            .and_then(get)
    }
}
