//! host::snapshot
//!
//! Scene snapshot schema.
//!
//! # Example
//!
//! ```json
//! {
//!   "project": { "name": "Demo", "directory": "/projects/Demo", "executable": "/ue/UnrealEditor" },
//!   "world": { "name": "Main", "path": "/Game/Maps/Main" },
//!   "context": { "name": "Shot SH010", "fields": { "Shot": "SH010" } },
//!   "sequences": [
//!     { "path": "/Game/Cine/SEQ.SEQ", "tracks": [
//!       { "name": "Shots", "kind": "cinematic_shot",
//!         "sections": [ { "name": "sh010", "sequence": "/Game/Cine/SH010.SH010" } ] }
//!     ] }
//!   ],
//!   "assets": [
//!     { "path": "/Game/Cine/SH010.SH010", "class": "LevelSequence",
//!       "metadata": { "SG.version_number": "3" } }
//!   ],
//!   "selected_assets": ["/Game/Cine/SH010.SH010"]
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::edits::{SceneSource, SequenceRecord};
use crate::core::template::Fields;

/// Asset class of level sequences.
pub const LEVEL_SEQUENCE_CLASS: &str = "LevelSequence";

/// Errors from snapshot operations.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to read scene snapshot '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse scene snapshot '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write scene snapshot '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("asset not found in scene: {0}")]
    UnknownAsset(String),
}

/// The host project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostProject {
    /// Project (game) name; the project file is `<name>.uproject`
    pub name: String,
    /// Project directory
    pub directory: PathBuf,
    /// Host executable used for renders
    pub executable: PathBuf,
}

impl HostProject {
    /// Path of the project file.
    pub fn project_file(&self) -> PathBuf {
        self.directory.join(format!("{}.uproject", self.name))
    }

    /// The project's `Saved` folder.
    pub fn saved_dir(&self) -> PathBuf {
        self.directory.join("Saved")
    }
}

/// The world (map) open in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    pub name: String,
    pub path: String,
}

impl World {
    /// Unsaved maps live under `/Temp/`.
    pub fn is_transient(&self) -> bool {
        self.path.starts_with("/Temp/")
    }
}

/// A pipeline entity reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} {}", self.entity_type, name),
            None => write!(f, "{} {}", self.entity_type, self.id),
        }
    }
}

/// The pipeline context the engine runs in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineContext {
    /// Display name; derived from the entities when empty
    pub name: String,
    pub site_url: Option<String>,
    pub project: Option<EntityRef>,
    pub entity: Option<EntityRef>,
    pub task: Option<EntityRef>,
    /// Folders on disk associated with the context
    pub filesystem_locations: Vec<PathBuf>,
    /// Root that relative publish paths are resolved against
    pub storage_root: Option<PathBuf>,
    /// Template fields the context resolves to
    pub fields: Fields,
}

impl PipelineContext {
    /// Display name of the context.
    pub fn display_name(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        let parts: Vec<String> = [&self.task, &self.entity, &self.project]
            .into_iter()
            .flatten()
            .map(|e| e.to_string())
            .collect();
        if parts.is_empty() {
            "Empty Context".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Resolve a rendered template path against the storage root.
    pub fn resolve_path(&self, rendered: &str, fallback_root: &Path) -> PathBuf {
        let path = Path::new(rendered);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        self.storage_root
            .as_deref()
            .unwrap_or(fallback_root)
            .join(path)
    }
}

/// An asset in the host's content browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub path: String,
    pub class: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl AssetRecord {
    /// Asset name: last path component without the object suffix.
    pub fn name(&self) -> &str {
        let last = self.path.rsplit('/').next().unwrap_or(&self.path);
        last.split_once('.').map(|(n, _)| n).unwrap_or(last)
    }

    pub fn is_level_sequence(&self) -> bool {
        self.class == LEVEL_SEQUENCE_CLASS
    }
}

/// What the host can render with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostCapabilities {
    /// Movie Render Queue subsystem is available
    pub movie_render_queue: bool,
    /// Apple ProRes output plugin is loaded
    pub prores_output: bool,
}

/// Kind of a render preset setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderSettingKind {
    /// The main deferred render pass
    DeferredPass,
    /// Any other image render pass
    ImagePass,
    /// Apple ProRes movie output
    ProresOutput,
    /// Any other output
    Output,
    #[serde(other)]
    Other,
}

/// A setting inside a render preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSetting {
    pub name: String,
    pub kind: RenderSettingKind,
}

/// A Movie Render Queue preset asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderPreset {
    pub path: String,
    #[serde(default)]
    pub settings: Vec<RenderSetting>,
}

impl RenderPreset {
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// How a command is shown in the menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    /// Listed in the context section
    ContextMenu,
    #[default]
    #[serde(other)]
    Default,
}

/// A command registered by an app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// Menu title, unique across the session
    pub name: String,
    #[serde(default, rename = "type")]
    pub command_type: CommandType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Instance name of the owning app, e.g. `tk-multi-publish2`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_instance: Option<String>,
    /// Display name of the owning app
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
}

impl CommandRecord {
    /// Command without an owning app.
    pub fn new(name: &str, command_type: CommandType, short_name: &str) -> Self {
        Self {
            name: name.to_string(),
            command_type,
            short_name: Some(short_name.to_string()),
            description: None,
            app_instance: None,
            app_name: None,
        }
    }
}

/// Everything the engine knows about the host session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSnapshot {
    pub project: HostProject,
    pub world: Option<World>,
    pub context: PipelineContext,
    pub sequences: Vec<SequenceRecord>,
    pub assets: Vec<AssetRecord>,
    pub selected_assets: Vec<String>,
    pub capabilities: HostCapabilities,
    pub render_presets: Vec<RenderPreset>,
    /// Commands registered by apps
    pub commands: Vec<CommandRecord>,
}

impl SceneSnapshot {
    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, HostError> {
        let contents = fs::read_to_string(path).map_err(|e| HostError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&contents).map_err(|e| HostError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Save the snapshot atomically.
    pub fn save(&self, path: &Path) -> Result<(), HostError> {
        let write_error = |source| HostError::WriteError {
            path: path.to_path_buf(),
            source,
        };

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| write_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

        let temp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path).map_err(write_error)?;
        file.write_all(contents.as_bytes()).map_err(write_error)?;
        file.sync_all().map_err(write_error)?;
        fs::rename(&temp_path, path).map_err(write_error)?;

        Ok(())
    }

    /// Look up an asset by content path.
    pub fn asset(&self, path: &str) -> Option<&AssetRecord> {
        self.assets.iter().find(|a| a.path == path)
    }

    /// Read a metadata tag from an asset.
    pub fn metadata_tag(&self, asset: &str, tag: &str) -> Option<&str> {
        self.asset(asset)
            .and_then(|a| a.metadata.get(tag))
            .map(String::as_str)
    }

    /// Write a metadata tag on an asset.
    pub fn set_metadata_tag(&mut self, asset: &str, tag: &str, value: &str) -> Result<(), HostError> {
        let record = self
            .assets
            .iter_mut()
            .find(|a| a.path == asset)
            .ok_or_else(|| HostError::UnknownAsset(asset.to_string()))?;
        record.metadata.insert(tag.to_string(), value.to_string());
        Ok(())
    }

    /// Look up a render preset by asset path.
    pub fn render_preset(&self, path: &str) -> Option<&RenderPreset> {
        self.render_presets.iter().find(|p| p.path == path)
    }

    /// The selected asset, first of a multi-selection.
    pub fn first_selected(&self) -> Option<&AssetRecord> {
        self.selected_assets.first().and_then(|p| self.asset(p))
    }
}

impl SceneSource for SceneSnapshot {
    fn sequences(&self) -> &[SequenceRecord] {
        &self.sequences
    }
}
