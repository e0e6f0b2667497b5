//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`NodeId`] - Stable identity of a node in the containment graph
//!
//! # Validation
//!
//! Identities are validated at construction time. A `NodeId` is compared
//! by its string key only, never by the identity of whatever host object
//! it was read from.
//!
//! # Examples
//!
//! ```
//! use shotpath::core::types::NodeId;
//!
//! let shot = NodeId::new("/Game/Cinematics/SH010.SH010").unwrap();
//! assert_eq!(shot.name(), "SH010");
//!
//! assert!(NodeId::new("").is_err());
//! assert!(NodeId::new(" padded ").is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid node id: {0}")]
    InvalidNodeId(String),
}

/// A validated node identity.
///
/// Node ids are content paths of level sequences as reported by the host,
/// e.g. `/Game/Cinematics/SEQ_010.SEQ_010`. Rules:
/// - Cannot be empty
/// - Cannot start or end with whitespace
/// - Cannot contain ASCII control characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(String);

impl NodeId {
    /// Create a new validated node id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidNodeId` if the id is empty, padded with
    /// whitespace, or contains control characters.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    fn validate(id: &str) -> Result<(), TypeError> {
        if id.is_empty() {
            return Err(TypeError::InvalidNodeId("node id cannot be empty".into()));
        }

        if id.trim() != id {
            return Err(TypeError::InvalidNodeId(format!(
                "node id '{id}' cannot start or end with whitespace"
            )));
        }

        if id.chars().any(|c| c.is_ascii_control()) {
            return Err(TypeError::InvalidNodeId(
                "node id cannot contain control characters".into(),
            ));
        }

        Ok(())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short display name of the node.
    ///
    /// The last `/` component with any `.Object` suffix removed:
    /// `/Game/Cine/SH010.SH010` becomes `SH010`.
    pub fn name(&self) -> &str {
        let last = self.0.rsplit('/').next().unwrap_or(&self.0);
        match last.split_once('.') {
            Some((package, _)) if !package.is_empty() => package,
            _ => last,
        }
    }
}

impl TryFrom<String> for NodeId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NodeId {
    type Error = TypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids() {
        assert!(NodeId::new("A").is_ok());
        assert!(NodeId::new("/Game/Cine/SEQ_010.SEQ_010").is_ok());
        assert!(NodeId::new("/Game/With Space/Seq").is_ok());
    }

    #[test]
    fn empty_rejected() {
        assert_eq!(
            NodeId::new(""),
            Err(TypeError::InvalidNodeId("node id cannot be empty".into()))
        );
    }

    #[test]
    fn whitespace_padding_rejected() {
        assert!(NodeId::new(" /Game/Seq").is_err());
        assert!(NodeId::new("/Game/Seq\t").is_err());
    }

    #[test]
    fn control_chars_rejected() {
        assert!(NodeId::new("/Game/Se\u{7}q").is_err());
    }

    #[test]
    fn name_strips_package_and_object() {
        let id = NodeId::new("/Game/Cine/SH010.SH010").unwrap();
        assert_eq!(id.name(), "SH010");

        let plain = NodeId::new("/Game/Cine/SH020").unwrap();
        assert_eq!(plain.name(), "SH020");

        let bare = NodeId::new("A").unwrap();
        assert_eq!(bare.name(), "A");
    }

    #[test]
    fn name_keeps_leading_dot_component() {
        let id = NodeId::new("/Game/.hidden").unwrap();
        assert_eq!(id.name(), ".hidden");
    }

    #[test]
    fn serde_roundtrip_validates() {
        let id = NodeId::new("/Game/Seq").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"/Game/Seq\"");
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        let bad: Result<NodeId, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }
}
