//! publish
//!
//! Collects publishable items from the host session and turns them into
//! publish plans.
//!
//! # Lifecycle
//!
//! ```text
//! collect -> accept -> validate -> publish
//! ```
//!
//! - **collect**: one item per edit path of each selected level sequence,
//!   one item per other selected asset
//! - **accept**: the plugin's publish template must exist
//! - **validate**: resolve template fields and the publish path
//! - **publish**: compute the render or export, bump the version metadata,
//!   and produce the records the pipeline platform stores
//!
//! # Modules
//!
//! - [`item`] - Publish items
//! - [`collector`] - Session collector
//! - [`version`] - Version tracking in asset metadata
//! - [`render`] - Movie render invocations
//! - [`movie`] - Level sequence movie publishing
//! - [`asset`] - FBX asset publishing

pub mod asset;
pub mod collector;
pub mod item;
pub mod movie;
pub mod render;
pub mod version;

pub use asset::{AssetPlan, AssetPublisher};
pub use collector::{collect, Collection};
pub use item::{ItemKind, PublishItem};
pub use movie::{MoviePlan, MoviePublishResult, MoviePublisher};
pub use render::{Platform, RenderInvocation, Renderer};

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::core::template::TemplateError;
use crate::host::{EntityRef, HostError};

/// Errors from publish operations.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("a publish template could not be determined: '{0}' is not defined")]
    NotAccepted(String),

    #[error("item '{0}' is not a level sequence")]
    NotALevelSequence(String),

    #[error("asset not found in scene: {0}")]
    UnknownAsset(String),

    #[error("no world is open in the editor")]
    NoWorld,

    #[error("current map must be saved first: {0}")]
    TransientWorld(String),

    #[error("render presets not found: {0}")]
    UnknownRenderPreset(String),

    #[error("publish path has no file name: {0}")]
    InvalidPublishPath(PathBuf),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Published file record sent to the pipeline platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedFileData {
    pub code: String,
    pub path: PathBuf,
    pub published_file_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<EntityRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<EntityRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
