//! publish::collector
//!
//! Turns the host selection into publish items.
//!
//! Each selected level sequence yields one item per edit path leading from
//! it to a root sequence, with the path attached for template field
//! resolution later on. Other selected assets yield a single item each.
//! The edit index is built at most once per collection, and only if a level
//! sequence is selected.

use serde::Serialize;

use super::item::PublishItem;
use crate::core::edits::EditIndex;
use crate::core::resolve::{resolve, CycleReport};
use crate::core::types::NodeId;
use crate::host::SceneSnapshot;

/// Result of collecting a session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Collection {
    pub items: Vec<PublishItem>,
    /// Cycles found while resolving edit paths
    pub cycles: Vec<CycleReport>,
    /// Selected paths that produced no item
    pub skipped: Vec<String>,
}

/// Collect publish items for the current selection.
pub fn collect(scene: &SceneSnapshot) -> Collection {
    let mut collection = Collection::default();
    let mut index: Option<EditIndex> = None;

    for selected in &scene.selected_assets {
        let Some(asset) = scene.asset(selected) else {
            tracing::warn!("selected asset '{}' is not in the scene", selected);
            collection.skipped.push(selected.clone());
            continue;
        };

        if !asset.is_level_sequence() {
            collection.items.push(PublishItem::asset(asset));
            continue;
        }

        let node = match NodeId::new(asset.path.as_str()) {
            Ok(node) => node,
            Err(e) => {
                tracing::warn!("cannot resolve edits of '{}': {}", asset.path, e);
                collection.skipped.push(selected.clone());
                continue;
            }
        };

        let index = index.get_or_insert_with(|| EditIndex::build(scene));
        let resolution = resolve(index, &node);
        collection.cycles.extend(resolution.cycles);

        if resolution.paths.is_empty() {
            tracing::warn!(
                "every edit path of '{}' is cyclic, nothing to publish",
                asset.path
            );
            collection.skipped.push(selected.clone());
            continue;
        }

        for path in resolution.paths {
            tracing::debug!("collected {} through {}", asset.path, path);
            collection.items.push(PublishItem::level_sequence(asset, path));
        }
    }

    collection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::edits::{SectionRecord, SequenceRecord, TrackKind, TrackRecord};
    use crate::host::AssetRecord;
    use std::collections::BTreeMap;

    fn sequence(path: &str, children: &[&str]) -> SequenceRecord {
        SequenceRecord {
            path: path.into(),
            tracks: vec![TrackRecord {
                name: "Shots".into(),
                kind: TrackKind::CinematicShot,
                sections: children
                    .iter()
                    .map(|c| SectionRecord {
                        name: None,
                        sequence: Some(c.to_string()),
                    })
                    .collect(),
            }],
        }
    }

    fn asset(path: &str, class: &str) -> AssetRecord {
        AssetRecord {
            path: path.into(),
            class: class.into(),
            metadata: BTreeMap::new(),
        }
    }

    fn scene(sequences: Vec<SequenceRecord>, assets: Vec<AssetRecord>, selected: &[&str]) -> SceneSnapshot {
        SceneSnapshot {
            sequences,
            assets,
            selected_assets: selected.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn shot_in_two_sequences_gives_two_items() {
        let scene = scene(
            vec![
                sequence("/Game/SEQ_A", &["/Game/SH010"]),
                sequence("/Game/SEQ_B", &["/Game/SH010"]),
                sequence("/Game/SH010", &[]),
            ],
            vec![asset("/Game/SH010", "LevelSequence")],
            &["/Game/SH010"],
        );

        let collection = collect(&scene);
        let names: Vec<_> = collection.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["SEQ_A > SH010", "SEQ_B > SH010"]);
        assert!(collection.cycles.is_empty());
    }

    #[test]
    fn root_sequence_gives_single_item() {
        let scene = scene(
            vec![sequence("/Game/SEQ", &["/Game/SH010"])],
            vec![asset("/Game/SEQ", "LevelSequence")],
            &["/Game/SEQ"],
        );

        let collection = collect(&scene);
        assert_eq!(collection.items.len(), 1);
        assert_eq!(collection.items[0].edits_path().unwrap().len(), 1);
    }

    #[test]
    fn cyclic_sequence_skipped_with_report() {
        let scene = scene(
            vec![
                sequence("/Game/A", &["/Game/B"]),
                sequence("/Game/B", &["/Game/A"]),
            ],
            vec![asset("/Game/A", "LevelSequence")],
            &["/Game/A"],
        );

        let collection = collect(&scene);
        assert!(collection.items.is_empty());
        assert_eq!(collection.cycles.len(), 1);
        assert_eq!(collection.skipped, vec!["/Game/A".to_string()]);
    }

    #[test]
    fn other_assets_and_unknown_selection() {
        let scene = scene(
            Vec::new(),
            vec![asset("/Game/Props/Chair.Chair", "StaticMesh")],
            &["/Game/Props/Chair.Chair", "/Game/Missing"],
        );

        let collection = collect(&scene);
        assert_eq!(collection.items.len(), 1);
        assert_eq!(collection.items[0].item_type, "unreal.asset.StaticMesh");
        assert_eq!(collection.skipped, vec!["/Game/Missing".to_string()]);
    }

    #[test]
    fn nothing_selected() {
        let collection = collect(&SceneSnapshot::default());
        assert!(collection.items.is_empty());
        assert!(collection.skipped.is_empty());
    }
}
