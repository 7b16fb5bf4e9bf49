//! Save state encoding and decoding.
//!
//! A save state captures enough of the emulator's state to resume play
//! exactly where it left off: the CPU registers, PPU, APU, internal RAM,
//! and nametable RAM. It deliberately excludes the mapper's own bank
//! registers (see the crate's design notes) - reloading a save state
//! assumes the same ROM is already loaded and its mapper freshly
//! constructed.
//!
//! # Format
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │ Magic: b"NSCR" (4 bytes)             │
//! │ Version: u32                         │
//! │ Checksum: CRC32 of the payload       │
//! │ Payload: bincode-encoded StateBlob    │
//! └─────────────────────────────────────┘
//! ```
//!
//! Encoding and decoding are only available under the `serde` feature,
//! since the payload needs every component's state to be
//! `Serialize`/`Deserialize`. Without that feature this module still
//! exposes the header constants and [`SaveStateError`].

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

/// Save state format version.
pub const SAVE_STATE_VERSION: u32 = 1;

/// Magic bytes identifying a save state file.
pub const SAVE_STATE_MAGIC: [u8; 4] = *b"NSCR";

/// Errors from encoding or decoding a save state.
#[derive(Debug, thiserror::Error)]
pub enum SaveStateError {
    /// The file doesn't start with [`SAVE_STATE_MAGIC`].
    #[error("invalid magic bytes (expected {SAVE_STATE_MAGIC:02X?})")]
    InvalidMagic,

    /// The file's version isn't one this build knows how to read.
    #[error("unsupported save state version: {0} (current: {SAVE_STATE_VERSION})")]
    UnsupportedVersion(u32),

    /// The payload's CRC32 doesn't match the stored checksum.
    #[error("checksum mismatch: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch {
        /// Checksum recorded in the file.
        expected: u32,
        /// Checksum computed over the payload actually read.
        actual: u32,
    },

    /// The file is shorter than a valid header plus payload.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData {
        /// Minimum bytes required.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// Failed to serialize the state payload.
    #[cfg(feature = "serde")]
    #[error("encode error: {0}")]
    Encode(String),

    /// Failed to deserialize the state payload.
    #[cfg(feature = "serde")]
    #[error("decode error: {0}")]
    Decode(String),
}

#[cfg(feature = "serde")]
mod codec {
    use super::{SaveStateError, SAVE_STATE_MAGIC, SAVE_STATE_VERSION};
    use crate::console::Console;
    use nescore_apu::Apu;
    use nescore_cpu::Cpu;
    use nescore_ppu::Ppu;
    use serde::{Deserialize, Serialize};

    #[cfg(not(feature = "std"))]
    use alloc::vec::Vec;

    const HEADER_LEN: usize = 4 + 4 + 4;

    #[derive(Serialize, Deserialize)]
    struct StateBlob {
        cpu: Cpu,
        ppu: Ppu,
        apu: Apu,
        ram: [u8; 2048],
        ciram: [u8; 2048],
    }

    impl Console {
        /// Encode the console's current state into a self-describing,
        /// checksummed byte buffer.
        ///
        /// # Errors
        ///
        /// Returns an error if the state fails to serialize.
        pub fn save_state(&self) -> Result<Vec<u8>, SaveStateError> {
            let blob = StateBlob {
                cpu: self.cpu().clone(),
                ppu: self.ppu().clone(),
                apu: *self.apu(),
                ram: *self.bus().ram(),
                ciram: *self.bus().ciram(),
            };

            let payload =
                bincode::serialize(&blob).map_err(|e| SaveStateError::Encode(e.to_string()))?;

            let mut checksum = crc32fast::Hasher::new();
            checksum.update(&payload);
            let checksum = checksum.finalize();

            let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
            out.extend_from_slice(&SAVE_STATE_MAGIC);
            out.extend_from_slice(&SAVE_STATE_VERSION.to_le_bytes());
            out.extend_from_slice(&checksum.to_le_bytes());
            out.extend_from_slice(&payload);
            Ok(out)
        }

        /// Restore the console's state from a buffer produced by
        /// [`Console::save_state`].
        ///
        /// # Errors
        ///
        /// Returns an error if the header is malformed, the checksum
        /// doesn't match, or the payload fails to deserialize.
        pub fn load_state(&mut self, data: &[u8]) -> Result<(), SaveStateError> {
            if data.len() < HEADER_LEN {
                return Err(SaveStateError::InsufficientData {
                    needed: HEADER_LEN,
                    available: data.len(),
                });
            }

            let (magic, rest) = data.split_at(4);
            if magic != SAVE_STATE_MAGIC {
                return Err(SaveStateError::InvalidMagic);
            }

            let (version, rest) = rest.split_at(4);
            let version = u32::from_le_bytes(version.try_into().unwrap());
            if version != SAVE_STATE_VERSION {
                return Err(SaveStateError::UnsupportedVersion(version));
            }

            let (checksum, payload) = rest.split_at(4);
            let expected = u32::from_le_bytes(checksum.try_into().unwrap());

            let mut hasher = crc32fast::Hasher::new();
            hasher.update(payload);
            let actual = hasher.finalize();
            if actual != expected {
                return Err(SaveStateError::ChecksumMismatch { expected, actual });
            }

            let blob: StateBlob =
                bincode::deserialize(payload).map_err(|e| SaveStateError::Decode(e.to_string()))?;

            *self.bus_mut().ram_mut() = blob.ram;
            *self.bus_mut().ciram_mut() = blob.ciram;
            self.bus_mut().ppu = blob.ppu;
            self.bus_mut().apu = blob.apu;
            self.restore_cpu(blob.cpu);

            Ok(())
        }
    }
}
