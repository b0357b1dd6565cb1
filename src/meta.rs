//! Structured save-state metadata and its on-disk JSON encoding.
//!
//! The metadata section is a self-describing JSON record with camelCase field
//! names. `timestamp`, `mode` and `appVersion` are required; everything else
//! defaults. Unknown fields are ignored so newer writers stay readable.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StateFileError};

/// BASIC interpreter active when the state was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicVariant {
    Atari,
    Turbo,
}

/// Interactive mode active when the state was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplMode {
    Monitor,
    Basic(BasicVariant),
    Dos,
}

impl ReplMode {
    /// Flattens to the serializable `(mode, basicVariant)` pair.
    pub fn to_wire_pair(self) -> (&'static str, Option<&'static str>) {
        match self {
            ReplMode::Monitor => ("monitor", None),
            ReplMode::Basic(BasicVariant::Atari) => ("basic", Some("atari")),
            ReplMode::Basic(BasicVariant::Turbo) => ("basic", Some("turbo")),
            ReplMode::Dos => ("dos", None),
        }
    }

    /// Total inverse of [`to_wire_pair`](Self::to_wire_pair). Unrecognized
    /// mode or variant text resolves to `Basic(Atari)` so metadata written by
    /// other format revisions still loads; callers can observe the fallback
    /// in the decoded value itself.
    pub fn from_wire_pair(mode: &str, basic_variant: Option<&str>) -> Self {
        match mode {
            "monitor" => ReplMode::Monitor,
            "dos" => ReplMode::Dos,
            "basic" => match basic_variant {
                Some("turbo") => ReplMode::Basic(BasicVariant::Turbo),
                _ => ReplMode::Basic(BasicVariant::Atari),
            },
            _ => ReplMode::Basic(BasicVariant::Atari),
        }
    }
}

/// Reference to a disk image that was mounted when the state was captured.
///
/// `path` and `disk_type` are opaque at this layer; duplicate `drive` slots
/// pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountedDiskReference {
    pub drive: u32,
    pub path: String,
    pub disk_type: String,
    pub read_only: bool,
}

/// Descriptive record stored alongside the raw machine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMetadata {
    pub timestamp: String,
    pub repl_mode: ReplMode,
    pub mounted_disks: Vec<MountedDiskReference>,
    pub note: Option<String>,
    pub app_version: String,
}

/// Wire form of [`StateMetadata`] with the mode flattened to a string pair.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataRecord {
    timestamp: String,
    mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    basic_variant: Option<String>,
    #[serde(default)]
    mounted_disks: Vec<MountedDiskReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    app_version: String,
}

pub fn encode(metadata: &StateMetadata) -> Result<Vec<u8>> {
    let (mode, basic_variant) = metadata.repl_mode.to_wire_pair();
    let record = MetadataRecord {
        timestamp: metadata.timestamp.clone(),
        mode: mode.to_owned(),
        basic_variant: basic_variant.map(str::to_owned),
        mounted_disks: metadata.mounted_disks.clone(),
        note: metadata.note.clone(),
        app_version: metadata.app_version.clone(),
    };
    serde_json::to_vec(&record).map_err(StateFileError::MetadataEncode)
}

pub fn decode(bytes: &[u8]) -> Result<StateMetadata> {
    let record: MetadataRecord =
        serde_json::from_slice(bytes).map_err(StateFileError::MetadataDecode)?;
    Ok(StateMetadata {
        timestamp: record.timestamp,
        repl_mode: ReplMode::from_wire_pair(&record.mode, record.basic_variant.as_deref()),
        mounted_disks: record.mounted_disks,
        note: record.note,
        app_version: record.app_version,
    })
}
