//! publish::item
//!
//! Publish items produced by the collector.

use serde::Serialize;

use crate::core::resolve::EditPath;
use crate::host::AssetRecord;

/// Item type prefix shared by every host asset item.
pub const ITEM_TYPE_PREFIX: &str = "unreal.asset";

/// What an item publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    /// A level sequence reached through one edit path
    LevelSequence { edits_path: EditPath },
    /// Any other asset
    Asset { class: String },
}

/// An item shown in the publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishItem {
    /// Display name
    pub name: String,
    /// Item type, e.g. `unreal.asset.LevelSequence`
    pub item_type: String,
    pub asset_path: String,
    pub asset_name: String,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl PublishItem {
    /// Item for a level sequence reached through `path`.
    ///
    /// Named after the path, root first.
    pub fn level_sequence(asset: &AssetRecord, path: EditPath) -> Self {
        Self {
            name: path.to_string(),
            item_type: format!("{}.{}", ITEM_TYPE_PREFIX, asset.class),
            asset_path: asset.path.clone(),
            asset_name: asset.name().to_string(),
            kind: ItemKind::LevelSequence { edits_path: path },
        }
    }

    /// Item for a plain asset.
    pub fn asset(asset: &AssetRecord) -> Self {
        Self {
            name: asset.name().to_string(),
            item_type: format!("{}.{}", ITEM_TYPE_PREFIX, asset.class),
            asset_path: asset.path.clone(),
            asset_name: asset.name().to_string(),
            kind: ItemKind::Asset {
                class: asset.class.clone(),
            },
        }
    }

    /// The edit path, for level sequence items.
    pub fn edits_path(&self) -> Option<&EditPath> {
        match &self.kind {
            ItemKind::LevelSequence { edits_path } => Some(edits_path),
            ItemKind::Asset { .. } => None,
        }
    }

    pub fn is_level_sequence(&self) -> bool {
        matches!(self.kind, ItemKind::LevelSequence { .. })
    }
}
