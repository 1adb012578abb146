//! Batch computation over independent pairs.
//!
//! Each pair gets its own search workspace, so pairs never share state. With
//! the `parallel` feature the pairs are spread over the rayon thread pool;
//! without it they run in order on the calling thread. Results come back in
//! input order either way.

use crate::algo::compute_to_vec;
use crate::apply::apply_to_vec;
use crate::error::DeltaResult;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Compute a script for every `(old, new)` pair.
pub fn compute_batch(pairs: &[(&[u8], &[u8])]) -> Vec<DeltaResult<Vec<u8>>> {
    #[cfg(feature = "parallel")]
    let iter = pairs.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = pairs.iter();

    iter.map(|&(old, new)| compute_to_vec(old, new)).collect()
}

/// Apply a script to every `(old, script)` pair.
pub fn apply_batch(pairs: &[(&[u8], &[u8])]) -> Vec<DeltaResult<Vec<u8>>> {
    #[cfg(feature = "parallel")]
    let iter = pairs.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = pairs.iter();

    iter.map(|&(old, script)| apply_to_vec(old, script)).collect()
}
