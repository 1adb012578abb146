//! Backtrace and run coalescing
//!
//! Turns the backward predecessor chain left by the search into forward,
//! maximal runs of Insert/Delete/Keep.

use super::myers::{Step, Workspace};
use crate::error::DeltaResult;
use crate::script::Opcode;

/// A coalesced edit run
///
/// Insert runs borrow their bytes from `new` by offset; they are only
/// meaningful together with the `new` sequence they were computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Run {
    /// Insert `new[start..start + len]`
    Insert { start: usize, len: usize },
    /// Skip old bytes
    Delete(usize),
    /// Copy old bytes
    Keep(usize),
}

impl Run {
    pub fn opcode(&self) -> Opcode {
        match self {
            Run::Insert { .. } => Opcode::Insert,
            Run::Delete(_) => Opcode::Delete,
            Run::Keep(_) => Opcode::Keep,
        }
    }

    pub fn count(&self) -> usize {
        match *self {
            Run::Insert { len, .. } => len,
            Run::Delete(count) | Run::Keep(count) => count,
        }
    }

    /// Fold `next` into `self` if both have the same opcode.
    fn absorb(&mut self, next: Run) -> bool {
        match (self, next) {
            (Run::Keep(count), Run::Keep(more)) | (Run::Delete(count), Run::Delete(more)) => {
                *count += more;
                true
            }
            (Run::Insert { start, len }, Run::Insert { start: next_start, len: more }) => {
                // Inserts with no keep or delete between them are adjacent in `new`
                debug_assert_eq!(*start + *len, next_start);
                *len += more;
                true
            }
            _ => false,
        }
    }
}

/// Reverse the predecessor chain ending at `terminus`.
///
/// Returns workspace indices from the start entry to `terminus`.
pub fn forward_path(workspace: &Workspace, terminus: usize) -> Vec<usize> {
    let mut path = Vec::with_capacity(workspace.entry(terminus).d + 1);
    let mut index = terminus;
    loop {
        path.push(index);
        let entry = workspace.entry(index);
        if entry.step == Step::Start {
            break;
        }
        index = entry.predecessor;
    }
    path.reverse();
    path
}

/// Holds the run being accumulated and hands finished runs to `emit`.
struct Coalescer<F> {
    pending: Option<Run>,
    emit: F,
}

impl<F> Coalescer<F>
where
    F: FnMut(Run) -> DeltaResult<()>,
{
    fn new(emit: F) -> Self {
        Self { pending: None, emit }
    }

    fn push(&mut self, run: Run) -> DeltaResult<()> {
        if run.count() == 0 {
            return Ok(());
        }
        if let Some(pending) = self.pending.as_mut() {
            if pending.absorb(run) {
                return Ok(());
            }
        }
        match self.pending.replace(run) {
            Some(done) => (self.emit)(done),
            None => Ok(()),
        }
    }

    fn finish(mut self) -> DeltaResult<()> {
        match self.pending.take() {
            Some(done) => (self.emit)(done),
            None => Ok(()),
        }
    }
}

/// Walk the path ending at `terminus` and emit maximal runs in order.
///
/// The gaps between steps (the snakes) become keeps, and so does the tail of
/// `old` after the last step, so Keep+Delete always covers `old_len`.
pub fn coalesce<F>(workspace: &Workspace, terminus: usize, old_len: usize, emit: F) -> DeltaResult<()>
where
    F: FnMut(Run) -> DeltaResult<()>,
{
    let path = forward_path(workspace, terminus);
    let mut runs = Coalescer::new(emit);
    let mut cursor = 0;

    for &index in path.iter().skip(1) {
        let entry = workspace.entry(index);
        if cursor < entry.op_index {
            runs.push(Run::Keep(entry.op_index - cursor))?;
            cursor = entry.op_index;
        }
        match entry.step {
            Step::Delete => {
                runs.push(Run::Delete(1))?;
                cursor += 1;
            }
            Step::Insert { token } => runs.push(Run::Insert { start: token, len: 1 })?,
            // only the first path entry
            Step::Start => {}
        }
    }

    if cursor < old_len {
        runs.push(Run::Keep(old_len - cursor))?;
    }

    runs.finish()
}

/// Collect the runs for the path ending at `terminus`.
pub fn runs(workspace: &Workspace, terminus: usize, old_len: usize) -> Vec<Run> {
    let mut out = Vec::new();
    // pushing to a Vec cannot fail
    let _ = coalesce(workspace, terminus, old_len, |run| {
        out.push(run);
        Ok(())
    });
    out
}
