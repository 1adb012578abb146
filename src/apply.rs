//! Script application
//!
//! Replays a script against the old sequence with three cursors: old, script
//! and output. Every read is bounds-checked against its source and every write
//! against the declared output capacity before any byte moves.

use tracing::debug;

use crate::error::{DeltaError, DeltaResult};
use crate::script::{self, Op, ScriptReader};

/// Apply `script` to `old`, writing the result into `out`.
///
/// Old bytes left after the last header are appended unchanged. Returns the
/// number of bytes written.
///
/// # Errors
///
/// - [`DeltaError::DestinationTooSmall`] if the result does not fit in `out`
/// - [`DeltaError::InvalidOpcode`] / [`DeltaError::TruncatedScript`] for a
///   malformed script
/// - [`DeltaError::SourceExhausted`] if the script reads past the end of `old`
///
/// Nothing is written past `out.len()`; the contents of `out` are unspecified
/// after an error.
pub fn apply(old: &[u8], script: &[u8], out: &mut [u8]) -> DeltaResult<usize> {
    let mut output = Output { buf: out, pos: 0 };
    let mut old_pos = 0;

    for unit in ScriptReader::new(script) {
        let (offset, op) = unit?;
        match op {
            Op::Delete(count) => {
                take(old, old_pos, count, offset)?;
                old_pos += count;
            }
            Op::Keep(count) => {
                output.write(take(old, old_pos, count, offset)?)?;
                old_pos += count;
            }
            Op::Insert(payload) => output.write(payload)?,
        }
    }

    output.write(&old[old_pos..])?;

    debug!(old_len = old.len(), script_len = script.len(), new_len = output.pos, "applied edit script");
    Ok(output.pos)
}

/// Apply `script` to `old` into a buffer sized exactly for the result.
pub fn apply_to_vec(old: &[u8], script: &[u8]) -> DeltaResult<Vec<u8>> {
    let len = script::output_len(old.len(), script)?;
    let mut out = vec![0u8; len];
    let written = apply(old, script, &mut out)?;
    out.truncate(written);
    Ok(out)
}

/// `count` old bytes starting at `pos`, or the overrun error for the header at
/// `offset`.
fn take(old: &[u8], pos: usize, count: usize, offset: usize) -> DeltaResult<&[u8]> {
    old.get(pos..pos + count).ok_or(DeltaError::SourceExhausted {
        offset,
        needed: count,
        available: old.len() - pos,
    })
}

struct Output<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl Output<'_> {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> DeltaResult<()> {
        if bytes.len() > self.buf.len() - self.pos {
            return Err(DeltaError::DestinationTooSmall { capacity: self.buf.len() });
        }
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }
}
