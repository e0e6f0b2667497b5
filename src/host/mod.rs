//! host
//!
//! The host application as seen by the engine.
//!
//! # Overview
//!
//! The engine never talks to the host's scripting runtime directly. The
//! host exports a [`SceneSnapshot`] (JSON) describing what the engine needs:
//! sequences and their tracks, assets and their metadata tags, the current
//! selection and world, the pipeline context, and what the host can render.
//! The engine reads the snapshot, and writes it back when a publish updates
//! asset metadata.
//!
//! # Modules
//!
//! - [`snapshot`] - Snapshot schema, loading and saving

pub mod snapshot;

pub use snapshot::{
    AssetRecord, CommandRecord, CommandType, EntityRef, HostCapabilities, HostError, HostProject, PipelineContext,
    RenderPreset, RenderSetting, RenderSettingKind, SceneSnapshot, World,
};
