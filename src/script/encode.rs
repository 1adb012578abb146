//! Run encoder and script destinations.

use super::{Header, Opcode, MAX_RUN};
use crate::algo::Run;
use crate::error::{DeltaError, DeltaResult};

/// Destination for encoded header units.
///
/// A unit is written whole or not at all.
pub trait ScriptSink {
    /// Append one header and its payload (empty unless it is an insert).
    fn write_unit(&mut self, header: Header, payload: &[u8]) -> DeltaResult<()>;

    /// Bytes written so far.
    fn position(&self) -> usize;
}

/// Fixed-capacity destination over a caller-provided buffer.
#[derive(Debug)]
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }
}

impl ScriptSink for SliceSink<'_> {
    fn write_unit(&mut self, header: Header, payload: &[u8]) -> DeltaResult<()> {
        let needed = 1 + payload.len();
        if self.buf.len() - self.pos < needed {
            return Err(DeltaError::ScriptTooSmall { capacity: self.buf.len() });
        }
        self.buf[self.pos] = header.pack();
        self.buf[self.pos + 1..self.pos + needed].copy_from_slice(payload);
        self.pos += needed;
        Ok(())
    }

    fn position(&self) -> usize {
        self.pos
    }
}

impl ScriptSink for Vec<u8> {
    fn write_unit(&mut self, header: Header, payload: &[u8]) -> DeltaResult<()> {
        self.push(header.pack());
        self.extend_from_slice(payload);
        Ok(())
    }

    fn position(&self) -> usize {
        self.len()
    }
}

/// Append one coalesced run to `sink`, splitting it into 64-unit headers.
///
/// Insert payload is read from `new` at the run's offset. Returns the sink
/// position after the run.
pub fn encode_run<S>(sink: &mut S, run: Run, new: &[u8]) -> DeltaResult<usize>
where
    S: ScriptSink + ?Sized,
{
    let opcode = run.opcode();
    let payload = match run {
        Run::Insert { start, len } => &new[start..start + len],
        Run::Delete(_) | Run::Keep(_) => &[][..],
    };

    let mut remaining = run.count();
    let mut offset = 0;
    while remaining > 0 {
        let chunk = remaining.min(MAX_RUN);
        let data = match opcode {
            Opcode::Insert => &payload[offset..offset + chunk],
            Opcode::Delete | Opcode::Keep => &[][..],
        };
        sink.write_unit(Header::new(opcode, chunk), data)?;
        remaining -= chunk;
        offset += chunk;
    }

    Ok(sink.position())
}
