//! Myers edit graph search over raw bytes
//!
//! Finds the minimal number of single-byte inserts and deletes that turn
//! `old` into `new`, and keeps enough of the search to rebuild the path.
//!
//! # Algorithm
//!
//! The edit graph has a node for every `(x, y)` with `x <= old.len()` and
//! `y <= new.len()`. Horizontal edges delete `old[x]`, vertical edges insert
//! `new[y]`, and diagonal edges are free wherever `old[x] == new[y]`.
//!
//! Round `d` holds the furthest-reaching `d`-path on every diagonal
//! `k = x - y` in `-d, -d + 2, ..., d`. Each entry extends one entry of round
//! `d - 1` by a single insert or delete, then follows the diagonal (the
//! "snake") as far as the bytes match.
//!
//! # Workspace Layout
//!
//! Entries are stored round after round in one flat vector:
//!
//! ```text
//! index  0   1   2   3   4   5   6   7   8   9
//! d      0   1   1   2   2   2   3   3   3   3
//! k      0  -1  +1  -2   0  +2  -3  -1  +1  +3
//! ```
//!
//! so `(d, k)` lives at `d * (d + 1) / 2 + (k + d) / 2`. The vector only grows
//! by the `d + 1` entries of each round actually explored, which keeps it at
//! `(D + 1)(D + 2) / 2` entries for a final distance `D`.
//!
//! # References
//!
//! - Myers, E.W. "An O(ND) Difference Algorithm and Its Variations" (1986)

use tracing::trace;

use crate::error::{DeltaError, DeltaResult};

// =============================================================================
// Workspace Types
// =============================================================================

/// How an entry was reached from its predecessor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The origin `(0, 0)`; only round 0 has it
    Start,
    /// Delete `old[op_index]`
    Delete,
    /// Insert `new[token]` before `old[op_index]`
    Insert {
        /// Offset into `new` of the inserted byte
        token: usize,
    },
}

/// One explored `(d, k)` state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    /// Edit-distance round
    pub d: usize,
    /// Diagonal, `reached_x - reached_y`
    pub k: isize,
    /// Furthest `x` after following the snake
    pub reached_x: usize,
    /// Furthest `y` after following the snake
    pub reached_y: usize,
    /// The single step taken from the predecessor
    pub step: Step,
    /// Position in `old` where the step applies
    pub op_index: usize,
    /// Workspace index of the round `d - 1` entry this one extends
    pub predecessor: usize,
}

impl Entry {
    pub fn is_delete(&self) -> bool {
        matches!(self.step, Step::Delete)
    }

    pub fn is_insert(&self) -> bool {
        matches!(self.step, Step::Insert { .. })
    }
}

/// Flat index of `(d, k)` in the workspace.
#[inline]
pub fn dk_index(d: usize, k: isize) -> usize {
    debug_assert!(k.unsigned_abs() <= d && (k + d as isize) % 2 == 0);
    d * (d + 1) / 2 + ((k + d as isize) / 2) as usize
}

/// Scratch space owned by a single search.
#[derive(Debug, Default)]
pub struct Workspace {
    entries: Vec<Entry>,
    limit: Option<usize>,
}

impl Workspace {
    /// Create an empty workspace with no entry limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty workspace that refuses to grow past `limit` entries.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self { entries: Vec::new(), limit }
    }

    /// Number of entries explored so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at a flat workspace index.
    #[inline]
    pub fn entry(&self, index: usize) -> &Entry {
        &self.entries[index]
    }

    /// Entry for `(d, k)`; the round must already be explored.
    #[inline]
    pub fn at(&self, d: usize, k: isize) -> &Entry {
        &self.entries[dk_index(d, k)]
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Make room for the `d + 1` entries of round `d`.
    fn reserve_round(&mut self, d: usize) -> DeltaResult<()> {
        let needed = self.entries.len() + d + 1;
        if self.limit.is_some_and(|limit| needed > limit) {
            return Err(DeltaError::WorkspaceAlloc { entries: needed });
        }
        self.entries
            .try_reserve(d + 1)
            .map_err(|_| DeltaError::WorkspaceAlloc { entries: needed })
    }

    fn push(&mut self, entry: Entry) {
        debug_assert_eq!(self.entries.len(), dk_index(entry.d, entry.k));
        self.entries.push(entry);
    }
}

/// Where the search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPath {
    /// Workspace index of the entry that reached `(old.len(), new.len())`
    pub terminus: usize,
    /// Minimal edit distance
    pub distance: usize,
}

// =============================================================================
// Search
// =============================================================================

/// Run the search, filling `workspace` round by round.
///
/// Stops at the first entry that reaches the far corner of the edit graph.
/// `max_distance` aborts with [`DeltaError::EditDistanceExceeded`] before a
/// round beyond it is explored.
pub fn search(
    old: &[u8],
    new: &[u8],
    workspace: &mut Workspace,
    max_distance: Option<usize>,
) -> DeltaResult<SearchPath> {
    let n = old.len();
    let m = new.len();
    let bound = n + m;

    for d in 0..=bound {
        if let Some(limit) = max_distance.filter(|&limit| d > limit) {
            return Err(DeltaError::EditDistanceExceeded { limit });
        }

        workspace.reserve_round(d)?;
        let di = d as isize;

        for k in (-di..=di).step_by(2) {
            let entry = next_entry(workspace, old, new, d, k);
            let index = workspace.len();
            workspace.push(entry);

            if entry.reached_x == n && entry.reached_y == m {
                trace!(round = d, entries = workspace.len(), "edit graph search reached end");
                return Ok(SearchPath { terminus: index, distance: d });
            }
        }

        trace!(round = d, entries = workspace.len(), "edit graph search round done");
    }

    Err(DeltaError::NoSolution { bound })
}

/// Build the `(d, k)` entry from round `d - 1`.
fn next_entry(workspace: &Workspace, old: &[u8], new: &[u8], d: usize, k: isize) -> Entry {
    let (step, predecessor, x, y) = if d == 0 {
        (Step::Start, 0, 0, 0)
    } else {
        let di = d as isize;

        // At k=-d there is nothing below; at k=d nothing above.
        // Otherwise extend whichever neighbor reaches further right,
        // preferring delete on ties.
        let insert = k == -di
            || (k != di && workspace.at(d - 1, k - 1).reached_x < workspace.at(d - 1, k + 1).reached_x);

        if insert {
            let predecessor = dk_index(d - 1, k + 1);
            let from = workspace.entry(predecessor);
            let step = Step::Insert { token: from.reached_y };
            (step, predecessor, from.reached_x, from.reached_y + 1)
        } else {
            let predecessor = dk_index(d - 1, k - 1);
            let from = workspace.entry(predecessor);
            (Step::Delete, predecessor, from.reached_x + 1, from.reached_y)
        }
    };

    // The step happens at the predecessor's x for both kinds
    let op_index = match step {
        Step::Delete => x - 1,
        _ => x,
    };

    let (reached_x, reached_y) = follow_snake(old, new, x, y);

    Entry { d, k, reached_x, reached_y, step, op_index, predecessor }
}

/// Advance along the diagonal while bytes match.
#[inline]
fn follow_snake(old: &[u8], new: &[u8], mut x: usize, mut y: usize) -> (usize, usize) {
    while x < old.len() && y < new.len() && old[x] == new[y] {
        x += 1;
        y += 1;
    }
    (x, y)
}

// =============================================================================
// Tests
// =============================================================================
