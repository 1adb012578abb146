//! Algorithm implementations for edit scripts.
//!
//! - `myers`: edit graph search for the minimal edit path
//! - `backtrace`: path reversal and run coalescing
//! - `delta`: compute entry points tying search, coalescing and encoding together

mod backtrace;
mod delta;
mod myers;

pub use backtrace::{coalesce, forward_path, runs, Run};
pub use delta::{compute, compute_into, compute_to_vec, compute_with_config, edit_distance, DeltaConfig};
pub use myers::{dk_index, search, Entry, SearchPath, Step, Workspace};
