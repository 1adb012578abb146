//! tola-delta - Minimal byte-level edit scripts
//!
//! ## Core Concepts
//!
//! **Compute**: Myers' O((N+M)·D) search finds the fewest single-byte inserts
//! and deletes turning `old` into `new`. The path is coalesced into maximal
//! runs and encoded as a compact binary script.
//!
//! **Apply**: the script is replayed against the same `old` to rebuild `new`,
//! with every read and write bounds-checked.
//!
//! ## Modules
//! - `algo`: edit graph search, run coalescing, compute entry points
//! - `script`: wire format (headers, encoder, reader, inspection)
//! - `apply`: script replay
//! - `patch`: script plus content digests, optional rkyv serialization
//! - `batch`: many independent pairs at once (rayon with `parallel`)
//! - `error`: the crate error type
//!
//! ## Usage
//!
//! ```
//! use tola_delta::{apply_to_vec, compute_to_vec};
//!
//! let old = b"ABCABBA";
//! let new = b"CBABAC";
//!
//! let script = compute_to_vec(old, new)?;
//! assert_eq!(apply_to_vec(old, &script)?, new);
//! # Ok::<(), tola_delta::DeltaError>(())
//! ```
//!
//! Callers that manage their own buffers use [`compute`] and [`apply`], which
//! report [`DeltaError::ScriptTooSmall`] / [`DeltaError::DestinationTooSmall`]
//! instead of writing past the slice.

// =============================================================================
// Core modules
// =============================================================================

/// Algorithms: search, backtrace, compute
pub mod algo;

/// Script wire format
pub mod script;

/// Script replay
pub mod apply;

/// Deterministic content hashing
pub mod hash;

/// Verified patch envelope
pub mod patch;

/// Batch operations
pub mod batch;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Compute
pub use algo::{compute, compute_into, compute_to_vec, compute_with_config, edit_distance, DeltaConfig};

// Apply
pub use apply::{apply, apply_to_vec};

// Script format
pub use script::{Op, Opcode, ScriptReader, ScriptSink, ScriptStats, SliceSink, MAX_RUN};

// Patch envelope
pub use patch::Patch;

// Batch
pub use batch::{apply_batch, compute_batch};

// Hashing
pub use hash::{Digest, StableHasher};

// Error types
pub use error::{DeltaError, DeltaResult};

// Re-export rkyv for callers embedding patches in their own archives
#[cfg(feature = "cache")]
pub use rkyv;

// =============================================================================
// Tests
// =============================================================================
