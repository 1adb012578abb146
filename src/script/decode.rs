//! Header-by-header script reader.

use super::{Header, Opcode};
use crate::error::{DeltaError, DeltaResult};

/// One decoded header unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op<'a> {
    /// Literal bytes taken from the script
    Insert(&'a [u8]),
    /// Skip this many old bytes
    Delete(usize),
    /// Copy this many old bytes
    Keep(usize),
}

impl Op<'_> {
    pub fn opcode(&self) -> Opcode {
        match self {
            Op::Insert(_) => Opcode::Insert,
            Op::Delete(_) => Opcode::Delete,
            Op::Keep(_) => Opcode::Keep,
        }
    }

    pub fn count(&self) -> usize {
        match *self {
            Op::Insert(payload) => payload.len(),
            Op::Delete(count) | Op::Keep(count) => count,
        }
    }
}

/// Iterator over the header units of a script.
///
/// Yields `(offset, op)` where `offset` is the header's position in the
/// script. Stops after the first malformed header.
#[derive(Debug, Clone)]
pub struct ScriptReader<'a> {
    script: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> ScriptReader<'a> {
    pub fn new(script: &'a [u8]) -> Self {
        Self { script, pos: 0, failed: false }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn read_unit(&mut self) -> DeltaResult<(usize, Op<'a>)> {
        let offset = self.pos;
        let header = Header::unpack(self.script[offset], offset)?;
        self.pos += 1;

        let op = match header.opcode {
            Opcode::Insert => {
                let available = self.script.len() - self.pos;
                if header.count > available {
                    return Err(DeltaError::TruncatedScript { offset, needed: header.count, available });
                }
                let payload = &self.script[self.pos..self.pos + header.count];
                self.pos += header.count;
                Op::Insert(payload)
            }
            Opcode::Delete => Op::Delete(header.count),
            Opcode::Keep => Op::Keep(header.count),
        };

        Ok((offset, op))
    }
}

impl<'a> Iterator for ScriptReader<'a> {
    type Item = DeltaResult<(usize, Op<'a>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.script.len() {
            return None;
        }
        let unit = self.read_unit();
        self.failed = unit.is_err();
        Some(unit)
    }
}

impl std::iter::FusedIterator for ScriptReader<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(script: &[u8]) -> Vec<Op<'_>> {
        ScriptReader::new(script).map(|unit| unit.unwrap().1).collect()
    }

    #[test]
    fn test_empty_script() {
        assert!(ops(&[]).is_empty());
    }

    #[test]
    fn test_insert_payload_is_interleaved() {
        // I1"a" K2 I2"bc"
        let script = [0x40, b'a', 0xC1, 0x41, b'b', b'c'];
        assert_eq!(ops(&script), vec![Op::Insert(b"a"), Op::Keep(2), Op::Insert(b"bc")]);
    }

    #[test]
    fn test_offsets() {
        let script = [0x40, b'a', 0xC1, 0x80];
        let offsets: Vec<usize> = ScriptReader::new(&script).map(|u| u.unwrap().0).collect();
        assert_eq!(offsets, vec![0, 2, 3]);
    }

    #[test]
    fn test_truncated_insert() {
        // I3 with only 2 payload bytes
        let script = [0xC0, 0x42, b'x', b'y'];
        let mut reader = ScriptReader::new(&script);
        assert_eq!(reader.next().unwrap().unwrap(), (0, Op::Keep(1)));
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(err, DeltaError::TruncatedScript { offset: 1, needed: 3, available: 2 }));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_reserved_opcode_stops_reader() {
        let script = [0x80, 0x05, 0xC0];
        let mut reader = ScriptReader::new(&script);
        assert!(reader.next().unwrap().is_ok());
        assert!(matches!(
            reader.next().unwrap().unwrap_err(),
            DeltaError::InvalidOpcode { offset: 1, bits: 0 }
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_op_accessors() {
        assert_eq!(Op::Insert(b"xyz").count(), 3);
        assert_eq!(Op::Insert(b"xyz").opcode(), Opcode::Insert);
        assert_eq!(Op::Delete(9).count(), 9);
        assert_eq!(Op::Keep(1).opcode(), Opcode::Keep);
    }
}
