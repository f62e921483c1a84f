//! Modification Records
//!
//! Append-only log entries describing each completed change of a POST request.
//! The log is rendered into the response body once processing ends.

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

/// Kind of applied change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModificationType {
    Created,
    Modified,
    Deleted,
    Moved,
    Copied,
}

/// One applied change
///
/// Move and copy records carry both source and destination; all other kinds
/// only have a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    pub kind: ModificationType,
    pub source: String,
    pub destination: Option<String>,
}

impl Modification {
    pub fn on_created(path: impl Into<String>) -> Self {
        Self::single(ModificationType::Created, path)
    }

    pub fn on_modified(path: impl Into<String>) -> Self {
        Self::single(ModificationType::Modified, path)
    }

    pub fn on_deleted(path: impl Into<String>) -> Self {
        Self::single(ModificationType::Deleted, path)
    }

    pub fn on_moved(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            kind: ModificationType::Moved,
            source: source.into(),
            destination: Some(destination.into()),
        }
    }

    pub fn on_copied(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            kind: ModificationType::Copied,
            source: source.into(),
            destination: Some(destination.into()),
        }
    }

    fn single(kind: ModificationType, path: impl Into<String>) -> Self {
        Self {
            kind,
            source: path.into(),
            destination: None,
        }
    }
}

impl Serialize for Modification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut arguments = vec![self.source.as_str()];
        if let Some(destination) = &self.destination {
            arguments.push(destination.as_str());
        }

        let mut state = serializer.serialize_struct("Modification", 2)?;
        state.serialize_field("type", &self.kind)?;
        state.serialize_field("argument", &arguments)?;
        state.end()
    }
}
