//! Save-state file codec for the attic Atari emulator.
//!
//! A state file is a single portable artifact combining a fixed binary
//! header, a length-framed JSON metadata record and the raw machine-state
//! payload (all integers little-endian):
//!
//! ```text
//! offset 0..16    fixed header (magic "ATSF", version, flags, reserved)
//! offset 16..20   metadata length L (u32)
//! offset 20..20+L metadata (JSON record)
//! offset 20+L..   payload, opaque bytes preserved exactly
//! ```
//!
//! Writes go through a temporary file in the target directory followed by an
//! atomic rename, so readers never observe a half-written file and a failed
//! write leaves any previous file intact. Concurrent writers to the same path
//! are not coordinated; the last rename wins.
//!
//! [`load_state_metadata`] reads only the first `20 + L` bytes, which keeps
//! inspecting a save cheap no matter how large its payload is.

mod error;
mod format;
mod io;
mod meta;
mod state;

pub use crate::error::{Result, StateFileError};
pub use crate::format::{StateFileHeader, HEADER_LEN, STATE_MAGIC, STATE_VERSION_V1};
pub use crate::meta::{BasicVariant, MountedDiskReference, ReplMode, StateMetadata};
pub use crate::state::{CpuRegisters, EmulatorState, MachineState};

use std::fs::{self, File};
use std::io::{ErrorKind, Read as _, Write as _};
use std::path::{Path, PathBuf};

use crate::io::ReadLeExt;

/// Upper bound on the metadata length claim. Real records are a few hundred
/// bytes; anything past this is a corrupt or hostile file, rejected before
/// allocation.
pub const MAX_METADATA_LEN: u32 = 1024 * 1024;

const LEN_FIELD_SIZE: usize = 4;

/// Writes `metadata` and `state` to `path` as one state file.
///
/// The file is assembled at `<path>.tmp` and atomically renamed over the
/// target, so on failure the previous file (if any) is untouched.
pub fn save_state(
    path: impl AsRef<Path>,
    metadata: &StateMetadata,
    state: &EmulatorState,
) -> Result<()> {
    let path = path.as_ref();
    let metadata_bytes = meta::encode(metadata)?;
    let len = u32::try_from(metadata_bytes.len())
        .ok()
        .filter(|&len| len <= MAX_METADATA_LEN)
        .ok_or_else(|| {
            StateFileError::Write(std::io::Error::new(
                ErrorKind::InvalidData,
                "metadata section too large",
            ))
        })?;

    let tmp = tmp_path(path);
    let written = (|| {
        let mut file = File::create(&tmp)?;
        file.write_all(&StateFileHeader::current().encode())?;
        file.write_all(&len.to_le_bytes())?;
        file.write_all(&metadata_bytes)?;
        file.write_all(state.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    written.map_err(|e| {
        let _ = fs::remove_file(&tmp);
        StateFileError::Write(e)
    })
}

/// Reads a complete state file back into `(metadata, state)`.
pub fn load_state(path: impl AsRef<Path>) -> Result<(StateMetadata, EmulatorState)> {
    let bytes = fs::read(path).map_err(StateFileError::Read)?;
    parse_state_bytes(&bytes)
}

/// Parses an in-memory state file image.
///
/// Validation is incremental: header first, then the length field, then the
/// metadata record; everything after the metadata section is the payload,
/// returned verbatim (an empty payload is valid).
pub fn parse_state_bytes(bytes: &[u8]) -> Result<(StateMetadata, EmulatorState)> {
    StateFileHeader::decode(bytes)?;
    let rest = &bytes[HEADER_LEN..];
    if rest.len() < LEN_FIELD_SIZE {
        return Err(StateFileError::Truncated("metadata length"));
    }
    let (len_bytes, rest) = rest.split_at(LEN_FIELD_SIZE);
    let len = u32::from_le_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]);
    if len > MAX_METADATA_LEN {
        return Err(StateFileError::Corrupt("metadata section too large"));
    }
    if (rest.len() as u64) < u64::from(len) {
        return Err(StateFileError::Truncated("metadata section"));
    }
    let (metadata_bytes, payload) = rest.split_at(len as usize);
    let metadata = meta::decode(metadata_bytes)?;
    Ok((metadata, EmulatorState::from_raw(payload.to_vec())))
}

/// Reads only the metadata record from a state file, skipping the payload.
pub fn load_state_metadata(path: impl AsRef<Path>) -> Result<StateMetadata> {
    let mut file = File::open(path).map_err(StateFileError::Read)?;

    let mut header_bytes = [0u8; HEADER_LEN];
    file.read_exact(&mut header_bytes)
        .map_err(read_stage_err("file header"))?;
    StateFileHeader::decode(&header_bytes)?;

    let len = file
        .read_u32_le()
        .map_err(read_stage_err("metadata length"))?;
    if len > MAX_METADATA_LEN {
        return Err(StateFileError::Corrupt("metadata section too large"));
    }

    let len = len as usize;
    let mut metadata_bytes = Vec::new();
    metadata_bytes
        .try_reserve_exact(len)
        .map_err(|_| StateFileError::OutOfMemory { len })?;
    metadata_bytes.resize(len, 0);
    file.read_exact(&mut metadata_bytes)
        .map_err(read_stage_err("metadata section"))?;

    meta::decode(&metadata_bytes)
}

fn read_stage_err(stage: &'static str) -> impl FnOnce(std::io::Error) -> StateFileError {
    move |e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            StateFileError::Truncated(stage)
        } else {
            StateFileError::Read(e)
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
