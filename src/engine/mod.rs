//! engine
//!
//! Ties configuration and the host session together for commands.
//!
//! # Session Lifecycle
//!
//! ```text
//! Context -> Session::open -> command -> [Session::save_scene]
//! ```
//!
//! A [`Session`] loads the configuration for the working directory and the
//! scene snapshot exported by the host. Commands read from it; publishes
//! write the updated snapshot back so version metadata persists.
//!
//! # Example
//!
//! ```ignore
//! use shotpath::engine::{Context, Session};
//!
//! let session = Session::open(&Context::default())?;
//! let collection = shotpath::publish::collect(&session.scene);
//! ```

pub mod session;

pub use session::Session;

use std::path::PathBuf;

use crate::core::config::ConfigError;
use crate::host::HostError;

/// Environment variable naming the scene snapshot when `--scene` is not given.
pub const SCENE_ENV: &str = "SHOTPATH_SCENE";

/// Scene snapshot file looked up in the working directory by default.
pub const DEFAULT_SCENE_FILE: &str = "scene.json";

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags that affect command behavior.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Scene snapshot override.
    pub scene: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Machine-readable output.
    pub json: bool,
}

impl Context {
    /// Working directory commands run in.
    pub fn working_dir(&self) -> Result<PathBuf, EngineError> {
        match &self.cwd {
            Some(cwd) => Ok(cwd.clone()),
            None => std::env::current_dir().map_err(EngineError::NoWorkingDir),
        }
    }

    /// Scene snapshot path: `--scene`, then `$SHOTPATH_SCENE`, then
    /// `scene.json` in the working directory.
    pub fn scene_path(&self) -> Result<PathBuf, EngineError> {
        if let Some(scene) = &self.scene {
            return Ok(scene.clone());
        }
        if let Ok(scene) = std::env::var(SCENE_ENV) {
            if !scene.is_empty() {
                return Ok(PathBuf::from(scene));
            }
        }
        Ok(self.working_dir()?.join(DEFAULT_SCENE_FILE))
    }
}

/// Errors from engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Working directory unavailable.
    #[error("cannot determine working directory: {0}")]
    NoWorkingDir(std::io::Error),

    /// Configuration failed to load.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene snapshot failed to load or save.
    #[error(transparent)]
    Host(#[from] HostError),
}
