//! publish::version
//!
//! Version numbers stored as asset metadata tags.
//!
//! The tag name is the configured prefix followed by `version_number`, e.g.
//! `SG.version_number`. A missing or unparsable tag means version 0.

use crate::host::{HostError, SceneSnapshot};

/// Metadata key holding the last published version.
pub const VERSION_NUMBER_KEY: &str = "version_number";

/// Last published version of an asset.
pub fn current_version(scene: &SceneSnapshot, asset: &str, tag: &str) -> u32 {
    scene
        .metadata_tag(asset, tag)
        .and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

/// Version the next publish of an asset will get.
pub fn next_version(scene: &SceneSnapshot, asset: &str, tag: &str) -> u32 {
    current_version(scene, asset, tag) + 1
}

/// Store a published version on the asset.
pub fn record_version(
    scene: &mut SceneSnapshot,
    asset: &str,
    tag: &str,
    version: u32,
) -> Result<(), HostError> {
    scene.set_metadata_tag(asset, tag, &version.to_string())
}
