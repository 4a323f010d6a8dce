//! Per-gate trace recording.
//!
//! A trace is one fixed-width little-endian record per executed gate, in
//! program order: the value just written to the gate's destination wire.
//! Record width is the smallest of 1/2/4/8 bytes that covers every active
//! lane, so a traced run produces exactly
//! `num_opcodes * trace_item_bytes(batch)` bytes.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Bytes per trace record for a batch width
pub const fn trace_item_bytes(batch: usize) -> usize {
    match batch {
        0..=8 => 1,
        9..=16 => 2,
        17..=32 => 4,
        _ => 8,
    }
}

/// Fixed-width trace record writer over any byte sink.
pub struct TraceWriter<W: Write> {
    out: W,
    item_bytes: usize,
    records: u64,
}

impl TraceWriter<BufWriter<File>> {
    /// Create a buffered trace file for a run at the given batch width
    pub fn create<P: AsRef<Path>>(path: P, batch: usize) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(TraceWriter::new(BufWriter::new(file), batch))
    }
}

impl<W: Write> TraceWriter<W> {
    pub fn new(out: W, batch: usize) -> Self {
        TraceWriter {
            out,
            item_bytes: trace_item_bytes(batch),
            records: 0,
        }
    }

    /// Record width in bytes
    pub fn item_bytes(&self) -> usize {
        self.item_bytes
    }

    /// Records written so far
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Append one record: the destination word truncated to the record width
    pub fn record(&mut self, word: u64) -> io::Result<()> {
        self.out.write_all(&word.to_le_bytes()[..self.item_bytes])?;
        self.records += 1;
        Ok(())
    }

    /// Flush and hand back the sink
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
