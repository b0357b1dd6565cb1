//! Fixed 16-byte state-file header: magic, format version, flags, reserved.

use crate::error::{Result, StateFileError};

pub const STATE_MAGIC: &[u8; 4] = b"ATSF";
pub const STATE_VERSION_V1: u8 = 1;

/// Total size of the fixed header on disk.
pub const HEADER_LEN: usize = 16;

const SUPPORTED_VERSIONS: &[u8] = &[STATE_VERSION_V1];

/// Decoded file header. Writers always emit the current version with zeroed
/// flags and reserved bytes; readers keep whatever flag bits they find so
/// future revisions can add flags without breaking older files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateFileHeader {
    pub version: u8,
    pub flags: u8,
}

impl StateFileHeader {
    pub fn current() -> Self {
        Self {
            version: STATE_VERSION_V1,
            flags: 0,
        }
    }

    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[..4].copy_from_slice(STATE_MAGIC);
        bytes[4] = self.version;
        bytes[5] = self.flags;
        // bytes 6..16 reserved, already zero
        bytes
    }

    /// Validates magic before version; flags and reserved bytes are read but
    /// not checked.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(StateFileError::Truncated("file header"));
        }
        if &bytes[..4] != STATE_MAGIC {
            return Err(StateFileError::InvalidMagic);
        }
        let version = bytes[4];
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(StateFileError::UnsupportedVersion(version));
        }
        Ok(Self {
            version,
            flags: bytes[5],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_header_shape() {
        let bytes = StateFileHeader::current().encode();
        assert_eq!(&bytes[..4], STATE_MAGIC);
        assert_eq!(bytes[4], STATE_VERSION_V1);
        assert_eq!(bytes[5], 0);
        assert_eq!(&bytes[6..], &[0u8; 10]);
    }

    #[test]
    fn decode_roundtrip() {
        let header = StateFileHeader::current();
        assert_eq!(StateFileHeader::decode(&header.encode()).unwrap(), header);
    }

    #[test]
    fn short_input_is_truncated() {
        let err = StateFileHeader::decode(&[0u8; 15]).unwrap_err();
        assert!(matches!(err, StateFileError::Truncated(_)));
    }

    #[test]
    fn magic_checked_before_version() {
        // Bad magic and bad version together must report the magic.
        let mut bytes = [0u8; HEADER_LEN];
        bytes[..4].copy_from_slice(b"NOPE");
        bytes[4] = 0x99;
        let err = StateFileHeader::decode(&bytes).unwrap_err();
        assert!(matches!(err, StateFileError::InvalidMagic));
    }

    #[test]
    fn unsupported_version_carries_byte() {
        let mut bytes = StateFileHeader::current().encode();
        bytes[4] = 0x99;
        let err = StateFileHeader::decode(&bytes).unwrap_err();
        assert!(matches!(err, StateFileError::UnsupportedVersion(0x99)));
    }

    #[test]
    fn nonzero_flags_are_tolerated() {
        let mut bytes = StateFileHeader::current().encode();
        bytes[5] = 0b0000_0100;
        let header = StateFileHeader::decode(&bytes).unwrap();
        assert_eq!(header.flags, 0b0000_0100);
    }
}
