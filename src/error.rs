use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StateFileError>;

#[derive(Debug, Error)]
pub enum StateFileError {
    #[error("invalid state file magic")]
    InvalidMagic,

    #[error("unsupported state file version 0x{0:02x}")]
    UnsupportedVersion(u8),

    #[error("truncated state file: {0}")]
    Truncated(&'static str),

    #[error("metadata decode failed: {0}")]
    MetadataDecode(#[source] serde_json::Error),

    #[error("metadata encode failed: {0}")]
    MetadataEncode(#[source] serde_json::Error),

    #[error("corrupt state file: {0}")]
    Corrupt(&'static str),

    #[error("out of memory allocating {len} bytes")]
    OutOfMemory { len: usize },

    #[error("failed to read state file: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write state file: {0}")]
    Write(#[source] io::Error),
}
