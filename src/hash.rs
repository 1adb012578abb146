//! Content digests for patch verification
//!
//! Provides cross-process deterministic hashing using blake3.

/// A 32-byte blake3 digest
pub type Digest = [u8; 32];

// =============================================================================
// StableHasher - Builder Pattern
// =============================================================================

/// A deterministic hasher using blake3
///
/// Unlike `std::hash::Hasher`, this produces the same output across
/// process restarts and machines, so digests can travel with a patch.
pub struct StableHasher {
    inner: blake3::Hasher,
}

impl StableHasher {
    /// Create a new StableHasher
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    /// Update with raw bytes
    #[inline]
    pub fn update(mut self, data: &[u8]) -> Self {
        self.inner.update(data);
        self
    }

    /// Update with a u64 value (little-endian)
    #[inline]
    pub fn update_u64(self, v: u64) -> Self {
        self.update(&v.to_le_bytes())
    }

    /// Finish and return the full digest
    #[inline]
    pub fn finish(self) -> Digest {
        *self.inner.finalize().as_bytes()
    }
}

impl Default for StableHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Digest of a byte sequence, length-prefixed.
pub fn digest(data: &[u8]) -> Digest {
    StableHasher::new().update_u64(data.len() as u64).update(data).finish()
}
