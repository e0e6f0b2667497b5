//! core::edits
//!
//! Edit records and the edit index.
//!
//! # Architecture
//!
//! The containment graph is stored child-first:
//! - Nodes are level sequences, keyed by [`NodeId`]
//! - An [`Edit`] records that a child is referenced by a parent through a
//!   section on one of the parent's containment tracks
//! - The [`EditIndex`] maps each child to every edit that references it
//!
//! # Invariants
//!
//! - Per-node edit order is scan order and is never re-sorted
//! - A node whose edit list is empty is a root
//! - A node that was never recorded is also treated as a root; use
//!   [`EditIndex::contains`] to tell the two apart
//!
//! The index is rebuilt for every resolution session and is read-only once
//! built.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::NodeId;

/// Kind of a track on a sequence.
///
/// Only [`TrackKind::CinematicShot`] and [`TrackKind::Subsequence`] tracks
/// reference other sequences; everything else is ignored by the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    CinematicShot,
    Subsequence,
    Camera,
    Audio,
    Event,
    #[serde(other)]
    Other,
}

impl TrackKind {
    /// Whether sections on this track reference child sequences.
    pub fn is_containment(self) -> bool {
        matches!(self, TrackKind::CinematicShot | TrackKind::Subsequence)
    }
}

/// A section on a track, as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionRecord {
    /// Display name of the section, if any
    pub name: Option<String>,
    /// Content path of the referenced sequence, if any
    pub sequence: Option<String>,
}

/// A track on a sequence, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub name: String,
    pub kind: TrackKind,
    #[serde(default)]
    pub sections: Vec<SectionRecord>,
}

/// A candidate parent sequence, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    pub path: String,
    #[serde(default)]
    pub tracks: Vec<TrackRecord>,
}

/// Provider of the raw scan input.
///
/// Implemented by whatever knows the host's sequences: the JSON scene
/// snapshot in production, plain vectors in tests.
pub trait SceneSource {
    /// Enumerate every candidate parent sequence.
    fn sequences(&self) -> &[SequenceRecord];

    /// Resolve the child a section references.
    ///
    /// Returns `None` when the section references nothing usable.
    fn resolve_section(&self, section: &SectionRecord) -> Option<NodeId> {
        section
            .sequence
            .as_deref()
            .and_then(|path| NodeId::new(path).ok())
    }
}

impl SceneSource for Vec<SequenceRecord> {
    fn sequences(&self) -> &[SequenceRecord] {
        self
    }
}

/// Where an edit happens inside its parent.
///
/// Opaque to the resolver; carried through for callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSite {
    pub track: String,
    pub kind: TrackKind,
    pub section: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_name: Option<String>,
}

/// A child-to-parent containment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub parent: NodeId,
    pub site: EditSite,
}

impl Edit {
    /// Create an edit with a bare site, mostly useful in tests.
    pub fn to(parent: NodeId) -> Self {
        Self {
            parent,
            site: EditSite {
                track: String::new(),
                kind: TrackKind::Subsequence,
                section: 0,
                section_name: None,
            },
        }
    }
}

/// Mapping from child node to the edits that reference it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditIndex {
    edits: BTreeMap<NodeId, Vec<Edit>>,
}

impl EditIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index by scanning every sequence of a source.
    ///
    /// Every candidate parent is recorded, so a sequence nothing references
    /// ends up with an explicit empty entry. Sections that do not resolve
    /// to a child are skipped.
    ///
    /// # Example
    ///
    /// ```
    /// use shotpath::core::edits::{
    ///     EditIndex, SectionRecord, SequenceRecord, TrackKind, TrackRecord,
    /// };
    /// use shotpath::core::types::NodeId;
    ///
    /// let scene = vec![SequenceRecord {
    ///     path: "/Game/SEQ".into(),
    ///     tracks: vec![TrackRecord {
    ///         name: "Shots".into(),
    ///         kind: TrackKind::CinematicShot,
    ///         sections: vec![SectionRecord {
    ///             name: Some("sh010".into()),
    ///             sequence: Some("/Game/SH010".into()),
    ///         }],
    ///     }],
    /// }];
    ///
    /// let index = EditIndex::build(&scene);
    /// let shot = NodeId::new("/Game/SH010").unwrap();
    /// assert_eq!(index.edits(&shot)[0].parent.as_str(), "/Game/SEQ");
    /// ```
    pub fn build(source: &impl SceneSource) -> Self {
        let mut index = Self::new();

        for sequence in source.sequences() {
            let parent = match NodeId::new(sequence.path.as_str()) {
                Ok(id) => id,
                Err(e) => {
                    tracing::debug!("skipping sequence '{}': {}", sequence.path, e);
                    continue;
                }
            };
            index.record(parent.clone());

            for track in sequence.tracks.iter().filter(|t| t.kind.is_containment()) {
                for (position, section) in track.sections.iter().enumerate() {
                    let Some(child) = source.resolve_section(section) else {
                        tracing::debug!(
                            "section {} on track '{}' of {} references no sequence",
                            position,
                            track.name,
                            parent
                        );
                        continue;
                    };

                    index.push(
                        child,
                        Edit {
                            parent: parent.clone(),
                            site: EditSite {
                                track: track.name.clone(),
                                kind: track.kind,
                                section: position,
                                section_name: section.name.clone(),
                            },
                        },
                    );
                }
            }
        }

        index
    }

    /// Record a node, leaving its edits untouched if already present.
    pub fn record(&mut self, node: NodeId) {
        self.edits.entry(node).or_default();
    }

    /// Append an edit to a child's list.
    pub fn push(&mut self, child: NodeId, edit: Edit) {
        self.edits.entry(child).or_default().push(edit);
    }

    /// Edits referencing a node, in scan order.
    ///
    /// Unknown nodes have no edits.
    pub fn edits(&self, node: &NodeId) -> &[Edit] {
        self.edits.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the node was recorded during the scan.
    pub fn contains(&self, node: &NodeId) -> bool {
        self.edits.contains_key(node)
    }

    /// Whether the node has no recorded parents.
    pub fn is_root(&self, node: &NodeId) -> bool {
        self.edits(node).is_empty()
    }

    /// All recorded nodes, sorted by id.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.edits.keys()
    }

    /// Iterate over recorded nodes and their edits.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &[Edit])> {
        self.edits.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of recorded nodes.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}
