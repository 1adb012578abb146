//! Edit script computation
//!
//! Ties the pieces together:
//!
//! 1. [`search`] explores the edit graph until the minimal path is found
//! 2. [`coalesce`] walks that path forward and merges single steps into runs
//! 3. [`encode_run`] writes each run to the script destination as it completes
//!
//! # Configuration
//!
//! [`DeltaConfig`] bounds the work a single call may do. Both limits are off
//! by default; the search always terminates by round `old.len() + new.len()`.

use tracing::debug;

use super::backtrace::coalesce;
use super::myers::{search, Workspace};
use crate::error::DeltaResult;
use crate::script::{encode_run, ScriptSink, SliceSink};

// =============================================================================
// Configuration
// =============================================================================

/// Limits for a compute call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeltaConfig {
    /// Give up once the edit distance is known to exceed this.
    /// Default: unbounded
    pub max_edit_distance: Option<usize>,
    /// Cap on search workspace entries.
    /// Default: unbounded
    pub max_workspace_entries: Option<usize>,
}

impl DeltaConfig {
    /// Create config with custom limits.
    pub fn new(max_edit_distance: Option<usize>, max_workspace_entries: Option<usize>) -> Self {
        Self { max_edit_distance, max_workspace_entries }
    }

    /// No limits; the search runs until it finds the path.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Stop once more than `max_edit_distance` edits would be needed.
    ///
    /// Also caps the workspace at the entries that distance can use.
    pub fn bounded(max_edit_distance: usize) -> Self {
        let rounds = max_edit_distance.saturating_add(1);
        Self {
            max_edit_distance: Some(max_edit_distance),
            max_workspace_entries: Some(rounds.saturating_mul(rounds.saturating_add(1)) / 2),
        }
    }
}

// =============================================================================
// Main API
// =============================================================================

/// Compute the script turning `old` into `new`, written into `script`.
///
/// Returns the script length in bytes.
pub fn compute(old: &[u8], new: &[u8], script: &mut [u8]) -> DeltaResult<usize> {
    compute_with_config(old, new, script, &DeltaConfig::default())
}

/// [`compute`] with custom limits.
pub fn compute_with_config(
    old: &[u8],
    new: &[u8],
    script: &mut [u8],
    config: &DeltaConfig,
) -> DeltaResult<usize> {
    let mut sink = SliceSink::new(script);
    compute_into(old, new, &mut sink, config)
}

/// Compute the script into a freshly allocated buffer.
pub fn compute_to_vec(old: &[u8], new: &[u8]) -> DeltaResult<Vec<u8>> {
    let mut script = Vec::new();
    compute_into(old, new, &mut script, &DeltaConfig::default())?;
    Ok(script)
}

/// Compute the script into any [`ScriptSink`].
///
/// Returns the sink position after the last run.
pub fn compute_into<S>(old: &[u8], new: &[u8], sink: &mut S, config: &DeltaConfig) -> DeltaResult<usize>
where
    S: ScriptSink + ?Sized,
{
    let mut workspace = Workspace::with_limit(config.max_workspace_entries);
    let path = search(old, new, &mut workspace, config.max_edit_distance)?;

    coalesce(&workspace, path.terminus, old.len(), |run| {
        encode_run(&mut *sink, run, new).map(|_| ())
    })?;

    let script_len = sink.position();
    debug!(
        old_len = old.len(),
        new_len = new.len(),
        distance = path.distance,
        entries = workspace.len(),
        script_len,
        "computed edit script"
    );
    Ok(script_len)
}

/// Minimal number of single-byte inserts and deletes turning `old` into `new`.
pub fn edit_distance(old: &[u8], new: &[u8]) -> DeltaResult<usize> {
    let mut workspace = Workspace::new();
    search(old, new, &mut workspace, None).map(|path| path.distance)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::apply_to_vec;
    use crate::error::DeltaError;
    use crate::script::{self, Op, ScriptReader};

    /// Edit distance via the textbook LCS table
    fn reference_distance(old: &[u8], new: &[u8]) -> usize {
        let mut table = vec![vec![0usize; new.len() + 1]; old.len() + 1];
        for i in 1..=old.len() {
            for j in 1..=new.len() {
                table[i][j] = if old[i - 1] == new[j - 1] {
                    table[i - 1][j - 1] + 1
                } else {
                    table[i - 1][j].max(table[i][j - 1])
                };
            }
        }
        old.len() + new.len() - 2 * table[old.len()][new.len()]
    }

    fn round_trip(old: &[u8], new: &[u8]) -> Vec<u8> {
        let script = compute_to_vec(old, new).unwrap();
        apply_to_vec(old, &script).unwrap()
    }

    #[test]
    fn test_paper_example() {
        assert_eq!(round_trip(b"ABCABBA", b"CBABAC"), b"CBABAC");
        assert_eq!(edit_distance(b"ABCABBA", b"CBABAC").unwrap(), 5);
    }

    #[test]
    fn test_insert_into_empty() {
        let script = compute_to_vec(b"", b"hello").unwrap();
        assert_eq!(script, b"\x44hello");
        let ops: Vec<Op<'_>> = ScriptReader::new(&script).map(|u| u.unwrap().1).collect();
        assert_eq!(ops, vec![Op::Insert(b"hello")]);
        assert_eq!(apply_to_vec(b"", &script).unwrap(), b"hello");
    }

    #[test]
    fn test_delete_everything() {
        let script = compute_to_vec(b"hello", b"").unwrap();
        assert_eq!(script, vec![0x84]);
        assert_eq!(apply_to_vec(b"hello", &script).unwrap(), b"");
    }

    #[test]
    fn test_identical() {
        let script = compute_to_vec(b"samesame", b"samesame").unwrap();
        assert_eq!(script, vec![0xC7]);
        assert_eq!(apply_to_vec(b"samesame", &script).unwrap(), b"samesame");
    }

    #[test]
    fn test_both_empty() {
        assert!(compute_to_vec(b"", b"").unwrap().is_empty());
    }

    #[test]
    fn test_deterministic() {
        let old = b"the quick brown fox jumps over the lazy dog";
        let new = b"the quack brown fix jumped over a lazy cat";
        let first = compute_to_vec(old, new).unwrap();
        for _ in 0..4 {
            assert_eq!(compute_to_vec(old, new).unwrap(), first);
        }
    }

    #[test]
    fn test_capacity_boundary() {
        let old = b"quickfoxback!";
        let new = b"The quick brown fox jumped over the lazy dog's back!";
        let required = compute_to_vec(old, new).unwrap();

        let mut exact = vec![0u8; required.len()];
        assert_eq!(compute(old, new, &mut exact).unwrap(), required.len());
        assert_eq!(exact, required);

        let mut short = vec![0u8; required.len() - 1];
        let err = compute(old, new, &mut short).unwrap_err();
        assert!(matches!(err, DeltaError::ScriptTooSmall { .. }));
        assert_eq!(err.code(), -1);
    }

    #[test]
    fn test_long_runs_are_chunked() {
        let old = vec![b'a'; 130];
        let script = compute_to_vec(&old, b"").unwrap();
        assert_eq!(script, vec![0xBF, 0xBF, 0x81]);

        let new = vec![b'z'; 130];
        let script = compute_to_vec(b"", &new).unwrap();
        assert_eq!(script.len(), 3 + 130);
        assert_eq!(apply_to_vec(b"", &script).unwrap(), new);
    }

    #[test]
    fn test_bounded_config() {
        let mut buf = [0u8; 64];
        let err = compute_with_config(b"abc", b"xyz", &mut buf, &DeltaConfig::bounded(2)).unwrap_err();
        assert!(matches!(err, DeltaError::EditDistanceExceeded { limit: 2 }));

        let len = compute_with_config(b"abc", b"xyz", &mut buf, &DeltaConfig::bounded(6)).unwrap();
        assert_eq!(apply_to_vec(b"abc", &buf[..len]).unwrap(), b"xyz");
    }

    #[test]
    fn test_workspace_limit_reported() {
        let mut buf = [0u8; 64];
        let config = DeltaConfig::new(None, Some(2));
        let err = compute_with_config(b"abc", b"xyz", &mut buf, &config).unwrap_err();
        assert!(matches!(err, DeltaError::WorkspaceAlloc { .. }));
        assert_eq!(err.code(), -2);
    }

    #[test]
    fn test_distance_matches_reference() {
        let cases: [(&[u8], &[u8]); 5] = [
            (b"kitten", b"sitting"),
            (b"abcdef", b"fedcba"),
            (b"", b"abc"),
            (b"aaaa", b"aa"),
            (b"xmjyauz", b"mzjawxu"),
        ];
        for (old, new) in cases {
            let script = compute_to_vec(old, new).unwrap();
            let stats = script::stats(&script).unwrap();
            assert_eq!(stats.edit_count(), reference_distance(old, new));
            assert_eq!(stats.kept + stats.deleted, old.len());
            assert_eq!(stats.kept + stats.inserted, new.len());
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Small alphabet so matches are common
        fn bytes(max: usize) -> impl Strategy<Value = Vec<u8>> {
            prop::collection::vec(b'a'..=b'd', 0..max)
        }

        proptest! {
            #[test]
            fn apply_reproduces_new(old in bytes(80), new in bytes(80)) {
                prop_assert_eq!(round_trip(&old, &new), new);
            }

            #[test]
            fn arbitrary_bytes_round_trip(
                old in prop::collection::vec(any::<u8>(), 0..200),
                new in prop::collection::vec(any::<u8>(), 0..200)
            ) {
                prop_assert_eq!(round_trip(&old, &new), new);
            }

            #[test]
            fn script_is_minimal(old in bytes(24), new in bytes(24)) {
                let script = compute_to_vec(&old, &new).unwrap();
                let stats = script::stats(&script).unwrap();
                prop_assert_eq!(stats.edit_count(), reference_distance(&old, &new));
            }

            #[test]
            fn script_covers_both_sides(old in bytes(60), new in bytes(60)) {
                let script = compute_to_vec(&old, &new).unwrap();
                let stats = script::stats(&script).unwrap();
                prop_assert_eq!(stats.kept + stats.deleted, old.len());
                prop_assert_eq!(stats.kept + stats.inserted, new.len());
            }

            #[test]
            fn adjacent_headers_differ_unless_full(old in bytes(300), new in bytes(300)) {
                let script = compute_to_vec(&old, &new).unwrap();
                let ops: Vec<Op<'_>> = ScriptReader::new(&script).map(|u| u.unwrap().1).collect();
                for pair in ops.windows(2) {
                    if pair[0].opcode() == pair[1].opcode() {
                        prop_assert_eq!(pair[0].count(), script::MAX_RUN);
                    }
                }
            }

            #[test]
            fn slice_and_vec_agree(old in bytes(40), new in bytes(40)) {
                let expected = compute_to_vec(&old, &new).unwrap();
                let mut buf = vec![0u8; expected.len()];
                prop_assert_eq!(compute(&old, &new, &mut buf).unwrap(), expected.len());
                prop_assert_eq!(buf, expected);
            }
        }
    }
}
