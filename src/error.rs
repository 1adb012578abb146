//! Error types for tola-delta.
//!
//! One enum covers the whole engine. Variants fall into four classes:
//!
//! | Class | Variants | Recovery |
//! |-------|----------|----------|
//! | Capacity | `ScriptTooSmall`, `DestinationTooSmall` | retry with a larger buffer |
//! | Resource | `WorkspaceAlloc`, `EditDistanceExceeded` | retry, or shrink the input |
//! | Corrupt input | `InvalidOpcode`, `TruncatedScript`, `SourceExhausted` | none for this script |
//! | Internal | `NoSolution` | library defect |
//!
//! [`DeltaError::code`] maps each class onto the negative sentinel integers
//! used by the classic C interface.

use thiserror::Error;

/// Errors that can occur while computing or applying edit scripts.
#[derive(Debug, Error)]
pub enum DeltaError {
    /// The script buffer cannot hold the next header unit
    #[error("script buffer too small: capacity {capacity} bytes")]
    ScriptTooSmall {
        /// Declared capacity of the script buffer
        capacity: usize,
    },

    /// The output buffer cannot hold the reconstructed sequence
    #[error("destination buffer too small: capacity {capacity} bytes")]
    DestinationTooSmall {
        /// Declared capacity of the output buffer
        capacity: usize,
    },

    /// Search scratch space could not be allocated
    #[error("workspace allocation failed at {entries} entries")]
    WorkspaceAlloc {
        /// Number of entries requested when allocation failed
        entries: usize,
    },

    /// The configured edit distance limit was hit before a path was found
    #[error("edit distance exceeds configured limit of {limit}")]
    EditDistanceExceeded {
        /// Configured limit
        limit: usize,
    },

    /// The search exhausted every round without reaching the end point
    #[error("no edit path found within {bound} rounds")]
    NoSolution {
        /// Theoretical bound (old length + new length)
        bound: usize,
    },

    /// A header carries the reserved opcode
    #[error("invalid opcode {bits:#04b} at script offset {offset}")]
    InvalidOpcode {
        /// Byte offset of the header in the script
        offset: usize,
        /// The two opcode bits found
        bits: u8,
    },

    /// An insert payload runs past the end of the script
    #[error("truncated script at offset {offset}: insert needs {needed} bytes, {available} left")]
    TruncatedScript {
        /// Byte offset of the insert header
        offset: usize,
        /// Payload bytes the header declares
        needed: usize,
        /// Bytes remaining after the header
        available: usize,
    },

    /// A keep or delete runs past the end of the old sequence
    #[error("script at offset {offset} consumes {needed} old bytes, {available} left")]
    SourceExhausted {
        /// Byte offset of the header in the script
        offset: usize,
        /// Old bytes the header declares
        needed: usize,
        /// Old bytes remaining
        available: usize,
    },

    /// Patch bytes do not start with the expected magic
    #[error("invalid patch format: expected magic bytes {expected:?}, found {found:?}")]
    InvalidMagic {
        /// Expected magic bytes
        expected: [u8; 4],
        /// Found magic bytes
        found: [u8; 4],
    },

    /// Patch was serialized with an incompatible schema
    #[error("patch version mismatch: expected v{expected}, found v{found}")]
    VersionMismatch {
        /// Expected schema version
        expected: u32,
        /// Found schema version
        found: u32,
    },

    /// A content digest did not match
    #[error("{which} digest mismatch")]
    DigestMismatch {
        /// Which side failed verification ("base" or "target")
        which: &'static str,
    },

    /// The reconstructed sequence has the wrong length
    #[error("target length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Length recorded in the patch
        expected: u64,
        /// Length produced by applying the script
        actual: u64,
    },

    /// Serialization/deserialization failed
    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Result type alias for delta operations.
pub type DeltaResult<T> = Result<T, DeltaError>;

impl DeltaError {
    /// Create a serialization error from any error type.
    pub fn serialize(err: impl std::error::Error) -> Self {
        Self::Serialize(err.to_string())
    }

    /// Buffer capacity errors; the caller may retry with a larger buffer.
    pub fn is_capacity(&self) -> bool {
        matches!(self, Self::ScriptTooSmall { .. } | Self::DestinationTooSmall { .. })
    }

    /// Errors caused by a malformed or tampered script.
    pub fn is_corrupt_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidOpcode { .. } | Self::TruncatedScript { .. } | Self::SourceExhausted { .. }
        )
    }

    /// Sentinel integer of the classic C interface.
    ///
    /// `-1` capacity, `-2` workspace, `-3` everything else.
    pub fn code(&self) -> i32 {
        match self {
            Self::ScriptTooSmall { .. } | Self::DestinationTooSmall { .. } => -1,
            Self::WorkspaceAlloc { .. } | Self::EditDistanceExceeded { .. } => -2,
            _ => -3,
        }
    }
}

#[cfg(feature = "cache")]
impl From<rkyv::rancor::Error> for DeltaError {
    fn from(err: rkyv::rancor::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}
