//! Compact binary edit script format
//!
//! A script is a flat stream of one-byte headers. Each header packs a 2-bit
//! opcode and a 6-bit `count - 1`:
//!
//! ```text
//!   7   6   5   4   3   2   1   0
//! +-------+-----------------------+
//! |opcode |       count - 1       |
//! +-------+-----------------------+
//! ```
//!
//! | Opcode | Meaning | Effect |
//! |--------|---------|--------|
//! | 0 | reserved | rejected by the reader |
//! | 1 | Insert | followed by `count` literal bytes |
//! | 2 | Delete | skip `count` old bytes |
//! | 3 | Keep | copy `count` old bytes |
//!
//! A run longer than [`MAX_RUN`] is split into full 64-unit headers followed
//! by one header for the remainder. Insert payload is interleaved with its
//! headers. There is no end marker; the script length travels out of band.
//!
//! Old bytes left over after the last header are copied to the output, so a
//! script may leave off a trailing keep.

mod decode;
mod encode;

pub use decode::{Op, ScriptReader};
pub use encode::{encode_run, ScriptSink, SliceSink};

use crate::error::{DeltaError, DeltaResult};

/// Largest count a single header can carry
pub const MAX_RUN: usize = 64;

const OPCODE_SHIFT: u8 = 6;
const COUNT_MASK: u8 = 0x3F;

// =============================================================================
// Opcode / Header
// =============================================================================

/// Edit operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Insert = 1,
    Delete = 2,
    Keep = 3,
}

impl Opcode {
    /// The two wire bits for this opcode.
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode wire bits; `0` and anything above `3` are not opcodes.
    #[inline]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            1 => Some(Self::Insert),
            2 => Some(Self::Delete),
            3 => Some(Self::Keep),
            _ => None,
        }
    }
}

/// A single header unit, count in `1..=64`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub opcode: Opcode,
    pub count: usize,
}

impl Header {
    #[inline]
    pub fn new(opcode: Opcode, count: usize) -> Self {
        debug_assert!((1..=MAX_RUN).contains(&count));
        Self { opcode, count }
    }

    /// Pack into the wire byte.
    #[inline]
    pub fn pack(self) -> u8 {
        (self.opcode.bits() << OPCODE_SHIFT) | ((self.count - 1) as u8 & COUNT_MASK)
    }

    /// Unpack a wire byte found at `offset` in a script.
    #[inline]
    pub fn unpack(byte: u8, offset: usize) -> DeltaResult<Self> {
        let bits = byte >> OPCODE_SHIFT;
        let opcode = Opcode::from_bits(bits).ok_or(DeltaError::InvalidOpcode { offset, bits })?;
        Ok(Self { opcode, count: (byte & COUNT_MASK) as usize + 1 })
    }
}

// =============================================================================
// Inspection
// =============================================================================

/// Unit counts of a decoded script
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStats {
    /// Number of header bytes
    pub headers: usize,
    /// Old bytes copied by explicit keeps
    pub kept: usize,
    /// Literal bytes inserted
    pub inserted: usize,
    /// Old bytes skipped
    pub deleted: usize,
}

impl ScriptStats {
    /// Inserts plus deletes; the edit distance for a script from `compute`.
    pub fn edit_count(&self) -> usize {
        self.inserted + self.deleted
    }

    /// Check if the script changes nothing
    pub fn is_empty(&self) -> bool {
        self.edit_count() == 0
    }
}

/// Count the units of every header in `script`.
pub fn stats(script: &[u8]) -> DeltaResult<ScriptStats> {
    let mut stats = ScriptStats::default();
    for unit in ScriptReader::new(script) {
        let (_, op) = unit?;
        stats.headers += 1;
        match op {
            Op::Insert(payload) => stats.inserted += payload.len(),
            Op::Delete(count) => stats.deleted += count,
            Op::Keep(count) => stats.kept += count,
        }
    }
    Ok(stats)
}

/// Exact number of bytes applying `script` to an old sequence of `old_len`
/// bytes produces.
///
/// Fails the same way [`apply`](crate::apply) would on a script that reads
/// past the old sequence.
pub fn output_len(old_len: usize, script: &[u8]) -> DeltaResult<usize> {
    let mut consumed = 0usize;
    let mut produced = 0usize;

    for unit in ScriptReader::new(script) {
        let (offset, op) = unit?;
        match op {
            Op::Insert(payload) => produced += payload.len(),
            Op::Delete(count) | Op::Keep(count) => {
                let available = old_len - consumed;
                if count > available {
                    return Err(DeltaError::SourceExhausted { offset, needed: count, available });
                }
                consumed += count;
                if matches!(op, Op::Keep(_)) {
                    produced += count;
                }
            }
        }
    }

    Ok(produced + (old_len - consumed))
}

// =============================================================================
// Tests
// =============================================================================
