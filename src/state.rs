//! Raw machine-state payload.
//!
//! The codec treats the payload as an opaque byte sequence and preserves it
//! exactly; [`EmulatorState`] is that sequence. [`MachineState`] is the
//! concrete layout the emulator core writes into it, provided here so callers
//! have one documented encoding rather than ad-hoc byte offsets:
//!
//! ```text
//! ram_kib: u32 LE | a x y s p: u8 each | pc: u16 LE | frame: u64 LE | memory
//! ```
//!
//! Nothing in the file codec depends on this layout.

use std::io::Cursor;

use crate::error::{Result, StateFileError};
use crate::io::{ReadLeExt, WriteLeExt};

/// Opaque save-state payload, returned at read time byte-for-byte as it was
/// handed in at write time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmulatorState {
    data: Vec<u8>,
}

impl EmulatorState {
    pub fn from_raw(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// 6502 register file as captured at save time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuRegisters {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub s: u8,
    pub p: u8,
    pub pc: u16,
}

/// Typed view over the payload bytes: descriptive fixed fields followed by
/// the raw memory image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MachineState {
    pub ram_kib: u32,
    pub cpu: CpuRegisters,
    pub frame: u64,
    pub memory: Vec<u8>,
}

impl MachineState {
    pub fn encode(&self) -> EmulatorState {
        let mut data = Vec::with_capacity(21 + self.memory.len());
        // Vec writes cannot fail.
        let _ = data.write_u32_le(self.ram_kib);
        let _ = data.write_u8(self.cpu.a);
        let _ = data.write_u8(self.cpu.x);
        let _ = data.write_u8(self.cpu.y);
        let _ = data.write_u8(self.cpu.s);
        let _ = data.write_u8(self.cpu.p);
        let _ = data.write_u16_le(self.cpu.pc);
        let _ = data.write_u64_le(self.frame);
        data.extend_from_slice(&self.memory);
        EmulatorState::from_raw(data)
    }

    pub fn decode(state: &EmulatorState) -> Result<Self> {
        let bytes = state.as_bytes();
        let mut cursor = Cursor::new(bytes);
        let truncated = |_| StateFileError::Truncated("machine state fields");
        let ram_kib = cursor.read_u32_le().map_err(truncated)?;
        let cpu = CpuRegisters {
            a: cursor.read_u8().map_err(truncated)?,
            x: cursor.read_u8().map_err(truncated)?,
            y: cursor.read_u8().map_err(truncated)?,
            s: cursor.read_u8().map_err(truncated)?,
            p: cursor.read_u8().map_err(truncated)?,
            pc: cursor.read_u16_le().map_err(truncated)?,
        };
        let frame = cursor.read_u64_le().map_err(truncated)?;
        let memory = bytes[cursor.position() as usize..].to_vec();
        Ok(Self {
            ram_kib,
            cpu,
            frame,
            memory,
        })
    }
}
