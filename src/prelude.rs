//! Prelude for common imports.
//!
//! ```
//! use tola_delta::prelude::*;
//!
//! let script = compute_to_vec(b"hello", b"help")?;
//! assert_eq!(script::stats(&script)?.edit_count(), 3);
//! # Ok::<(), DeltaError>(())
//! ```

// Compute / apply
pub use crate::algo::{compute, compute_to_vec, compute_with_config, edit_distance, DeltaConfig};
pub use crate::apply::{apply, apply_to_vec};

// Script format
pub use crate::script::{self, Op, Opcode, ScriptReader};

// Patch envelope
pub use crate::patch::Patch;

// Error types
pub use crate::error::{DeltaError, DeltaResult};
