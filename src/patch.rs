//! Self-verifying patch envelope.
//!
//! A bare script only makes sense against the exact old sequence it was
//! computed from. [`Patch`] carries digests of both sides so the receiver can
//! refuse the wrong base and confirm the result.
//!
//! With the `cache` feature a patch serializes through rkyv, framed by magic
//! bytes and a schema version.

use crate::algo::{compute_into, DeltaConfig};
use crate::apply::apply_to_vec;
use crate::error::{DeltaError, DeltaResult};
use crate::hash::{digest, Digest};

/// Current schema version for serialized patches.
/// Increment this when making breaking changes to SerPatch structure.
pub const SCHEMA_VERSION: u32 = 1;

/// Magic bytes for tola-delta patch files.
const MAGIC: [u8; 4] = *b"TDLT";

/// An edit script bundled with digests of its base and target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    base_digest: Digest,
    target_digest: Digest,
    target_len: u64,
    script: Vec<u8>,
}

impl Patch {
    /// Compute a patch turning `old` into `new`.
    pub fn create(old: &[u8], new: &[u8]) -> DeltaResult<Self> {
        Self::create_with_config(old, new, &DeltaConfig::default())
    }

    /// [`Patch::create`] with custom limits.
    pub fn create_with_config(old: &[u8], new: &[u8], config: &DeltaConfig) -> DeltaResult<Self> {
        let mut script = Vec::new();
        compute_into(old, new, &mut script, config)?;
        Ok(Self {
            base_digest: digest(old),
            target_digest: digest(new),
            target_len: new.len() as u64,
            script,
        })
    }

    /// The encoded edit script.
    pub fn script(&self) -> &[u8] {
        &self.script
    }

    pub fn base_digest(&self) -> &Digest {
        &self.base_digest
    }

    pub fn target_digest(&self) -> &Digest {
        &self.target_digest
    }

    /// Length of the sequence this patch produces.
    pub fn target_len(&self) -> u64 {
        self.target_len
    }

    /// Check if `old` is the sequence this patch was computed from.
    pub fn matches_base(&self, old: &[u8]) -> bool {
        digest(old) == self.base_digest
    }

    /// Reconstruct the target from `old`, verifying both digests.
    pub fn apply(&self, old: &[u8]) -> DeltaResult<Vec<u8>> {
        if !self.matches_base(old) {
            return Err(DeltaError::DigestMismatch { which: "base" });
        }

        let new = apply_to_vec(old, &self.script)?;
        if new.len() as u64 != self.target_len {
            return Err(DeltaError::LengthMismatch { expected: self.target_len, actual: new.len() as u64 });
        }
        if digest(&new) != self.target_digest {
            return Err(DeltaError::DigestMismatch { which: "target" });
        }
        Ok(new)
    }
}

#[cfg(feature = "cache")]
mod concrete {
    //! Serializable patch frame.

    use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};

    /// Patch as stored on disk or sent over the wire.
    #[derive(Archive, RkyvSerialize, RkyvDeserialize, Debug)]
    pub struct SerPatch {
        /// Magic bytes for validation
        pub magic: [u8; 4],
        /// Schema version for compatibility checking
        pub schema_version: u32,
        pub base_digest: [u8; 32],
        pub target_digest: [u8; 32],
        pub target_len: u64,
        pub script: Vec<u8>,
    }
}

#[cfg(feature = "cache")]
use concrete::SerPatch;

#[cfg(feature = "cache")]
use rkyv::rancor::Error as RkyvError;

#[cfg(feature = "cache")]
impl Patch {
    /// Serialize the patch to bytes.
    pub fn to_bytes(&self) -> DeltaResult<Vec<u8>> {
        let frame = SerPatch {
            magic: MAGIC,
            schema_version: SCHEMA_VERSION,
            base_digest: self.base_digest,
            target_digest: self.target_digest,
            target_len: self.target_len,
            script: self.script.clone(),
        };
        let bytes = rkyv::to_bytes::<RkyvError>(&frame)?;
        Ok(bytes.to_vec())
    }

    /// Deserialize a patch from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Archive data is corrupted
    /// - Magic bytes don't match (not a tola-delta patch)
    /// - Schema version is incompatible
    pub fn from_bytes(bytes: &[u8]) -> DeltaResult<Self> {
        // rkyv needs the archive aligned; the caller's slice may not be
        let mut aligned = rkyv::util::AlignedVec::<16>::with_capacity(bytes.len());
        aligned.extend_from_slice(bytes);

        let frame = rkyv::from_bytes::<SerPatch, RkyvError>(&aligned)?;

        if frame.magic != MAGIC {
            return Err(DeltaError::InvalidMagic { expected: MAGIC, found: frame.magic });
        }
        if frame.schema_version != SCHEMA_VERSION {
            return Err(DeltaError::VersionMismatch { expected: SCHEMA_VERSION, found: frame.schema_version });
        }

        Ok(Self {
            base_digest: frame.base_digest,
            target_digest: frame.target_digest,
            target_len: frame.target_len,
            script: frame.script,
        })
    }
}

#[cfg(not(feature = "cache"))]
impl Patch {
    pub fn to_bytes(&self) -> DeltaResult<Vec<u8>> {
        Err(DeltaError::Serialize("serialization requires 'cache' feature".to_string()))
    }

    pub fn from_bytes(_bytes: &[u8]) -> DeltaResult<Self> {
        Err(DeltaError::Serialize("deserialization requires 'cache' feature".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OLD: &[u8] = b"quickfoxback!";
    const NEW: &[u8] = b"The quick brown fox jumped over the lazy dog's back!";

    #[test]
    fn test_create_and_apply() {
        let patch = Patch::create(OLD, NEW).unwrap();
        assert_eq!(patch.target_len(), NEW.len() as u64);
        assert!(patch.matches_base(OLD));
        assert_eq!(patch.apply(OLD).unwrap(), NEW);
    }

    #[test]
    fn test_wrong_base_rejected() {
        let patch = Patch::create(OLD, NEW).unwrap();
        let err = patch.apply(b"quickfoxback?").unwrap_err();
        assert!(matches!(err, DeltaError::DigestMismatch { which: "base" }));
    }

    #[test]
    fn test_tampered_script_detected() {
        let mut patch = Patch::create(b"abcdef", b"abXdef").unwrap();
        let last = patch.script.len() - 1;
        patch.script[last] ^= 0x01;
        assert!(patch.apply(b"abcdef").is_err());
    }

    #[test]
    fn test_tampered_payload_fails_target_digest() {
        let mut patch = Patch::create(b"", b"hello").unwrap();
        patch.script[1] = b'j';
        let err = patch.apply(b"").unwrap_err();
        assert!(matches!(err, DeltaError::DigestMismatch { which: "target" }));
    }

    #[cfg(feature = "cache")]
    #[test]
    fn test_bytes_round_trip() {
        let patch = Patch::create(OLD, NEW).unwrap();
        let bytes = patch.to_bytes().unwrap();
        let restored = Patch::from_bytes(&bytes).unwrap();
        assert_eq!(restored, patch);
        assert_eq!(restored.apply(OLD).unwrap(), NEW);
    }

    #[cfg(feature = "cache")]
    #[test]
    fn test_wrong_magic_and_version() {
        let frame = SerPatch {
            magic: *b"NOPE",
            schema_version: SCHEMA_VERSION,
            base_digest: [0; 32],
            target_digest: [0; 32],
            target_len: 0,
            script: Vec::new(),
        };
        let bytes = rkyv::to_bytes::<RkyvError>(&frame).unwrap();
        let err = Patch::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, DeltaError::InvalidMagic { found, .. } if &found == b"NOPE"));

        let frame = SerPatch { magic: MAGIC, schema_version: SCHEMA_VERSION + 1, ..frame };
        let bytes = rkyv::to_bytes::<RkyvError>(&frame).unwrap();
        let err = Patch::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, DeltaError::VersionMismatch { expected: SCHEMA_VERSION, .. }));
    }

    #[cfg(feature = "cache")]
    #[test]
    fn test_garbage_bytes_rejected() {
        let err = Patch::from_bytes(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, DeltaError::Serialize(_)));
    }
}
