//! Circuit structure and binary layout.
//!
//! ## File Layout (little-endian)
//!
//! ```text
//! Offset  Size              Field
//! ────────────────────────────────────────────────
//! 0x00    8                 input_size (wire count)
//! 0x08    8                 output_size (wire count)
//! 0x10    8                 num_opcodes (gate count)
//! 0x18    8                 opcodes_size (stream bytes)
//! 0x20    8                 memory (RAM word slots)
//! 0x28    2*input_size      input address table
//! ...     2*output_size     output address table
//! ...     opcodes_size      opcode stream
//! ```
//!
//! Bytes past the opcode stream are ignored.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CircuitError, Result};
use crate::gate::{Addr, Gate, GateReader};

/// Widest usable RAM: one slot per 16-bit address.
pub const MAX_MEMORY: u64 = 1 << 16;

/// Circuit file header (40 bytes)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitHeader {
    /// Number of external input wires
    pub input_size: u64,

    /// Number of external output wires
    pub output_size: u64,

    /// Number of gates in the opcode stream
    pub num_opcodes: u64,

    /// Opcode stream length in bytes
    pub opcodes_size: u64,

    /// RAM size in word slots
    pub memory: u64,
}

impl CircuitHeader {
    /// Header size in bytes
    pub const SIZE: usize = 40;

    /// Validate the header
    pub fn validate(&self) -> Result<()> {
        if self.memory > MAX_MEMORY {
            return Err(CircuitError::MemoryTooLarge {
                memory: self.memory,
                max: MAX_MEMORY,
            });
        }
        Ok(())
    }

    /// Bytes per lane of packed input bits
    pub fn bytes_per_input(&self) -> usize {
        self.input_size.div_ceil(8) as usize
    }

    /// Bytes per lane of packed output bits
    pub fn bytes_per_output(&self) -> usize {
        self.output_size.div_ceil(8) as usize
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..8].copy_from_slice(&self.input_size.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.output_size.to_le_bytes());
        bytes[16..24].copy_from_slice(&self.num_opcodes.to_le_bytes());
        bytes[24..32].copy_from_slice(&self.opcodes_size.to_le_bytes());
        bytes[32..40].copy_from_slice(&self.memory.to_le_bytes());
        bytes
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(CircuitError::MalformedFile {
                context: "header truncated",
            });
        }
        let field = |offset: usize| {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&bytes[offset..offset + 8]);
            u64::from_le_bytes(buf)
        };
        let header = Self {
            input_size: field(0),
            output_size: field(8),
            num_opcodes: field(16),
            opcodes_size: field(24),
            memory: field(32),
        };
        header.validate()?;
        Ok(header)
    }
}

impl fmt::Display for CircuitHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Circuit Header")?;
        writeln!(f, "  Inputs:   {} wires", self.input_size)?;
        writeln!(f, "  Outputs:  {} wires", self.output_size)?;
        writeln!(f, "  Gates:    {}", self.num_opcodes)?;
        writeln!(f, "  Stream:   {} bytes", self.opcodes_size)?;
        writeln!(f, "  Memory:   {} word slots", self.memory)?;
        Ok(())
    }
}

/// A loaded circuit: header, wire-address tables, and the opcode stream.
///
/// Every instance produced by [`Circuit::from_bytes`] or [`Circuit::from_file`]
/// has passed [`Circuit::validate`]: table lengths match the header, every
/// address is inside the declared RAM, and the stream decodes to exactly
/// `num_opcodes` gates.
#[derive(Clone, Debug)]
pub struct Circuit {
    /// Circuit header
    pub header: CircuitHeader,

    /// RAM slot for each external input bit
    pub input_addr: Vec<Addr>,

    /// RAM slot for each external output bit
    pub output_addr: Vec<Addr>,

    /// Encoded gate stream
    pub opcodes: Vec<u8>,
}

impl Circuit {
    /// Build a circuit from decoded gates, validating it
    pub fn from_gates(
        input_addr: Vec<Addr>,
        output_addr: Vec<Addr>,
        gates: &[Gate],
        memory: u64,
    ) -> Result<Self> {
        let opcodes = crate::gate::encode_gates(gates);
        let header = CircuitHeader {
            input_size: input_addr.len() as u64,
            output_size: output_addr.len() as u64,
            num_opcodes: gates.len() as u64,
            opcodes_size: opcodes.len() as u64,
            memory,
        };
        let circuit = Self {
            header,
            input_addr,
            output_addr,
            opcodes,
        };
        circuit.validate()?;
        Ok(circuit)
    }

    /// Load and validate a circuit from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                CircuitError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                CircuitError::Io(err)
            }
        })?;
        let circuit = Self::from_bytes(&bytes)?;
        tracing::debug!(
            "loaded circuit {}: {} inputs, {} outputs, {} gates, {} ram slots",
            path.display(),
            circuit.header.input_size,
            circuit.header.output_size,
            circuit.header.num_opcodes,
            circuit.header.memory
        );
        Ok(circuit)
    }

    /// Parse and validate a circuit from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = CircuitHeader::from_bytes(bytes)?;
        let mut pos = CircuitHeader::SIZE;

        let input_addr = read_addr_table(bytes, &mut pos, header.input_size, "input table")?;
        let output_addr = read_addr_table(bytes, &mut pos, header.output_size, "output table")?;

        let stream_len = usize::try_from(header.opcodes_size).map_err(|_| {
            CircuitError::MalformedFile {
                context: "opcode stream length overflows",
            }
        })?;
        let end = pos
            .checked_add(stream_len)
            .ok_or(CircuitError::MalformedFile {
                context: "opcode stream length overflows",
            })?;
        let stream = bytes.get(pos..end).ok_or(CircuitError::MalformedFile {
            context: "opcode stream truncated",
        })?;
        let mut opcodes = try_alloc::<u8>(stream_len)?;
        opcodes.extend_from_slice(stream);

        let circuit = Self {
            header,
            input_addr,
            output_addr,
            opcodes,
        };
        circuit.validate()?;
        Ok(circuit)
    }

    /// Serialize to the file layout
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(
            CircuitHeader::SIZE
                + 2 * (self.input_addr.len() + self.output_addr.len())
                + self.opcodes.len(),
        );
        bytes.extend_from_slice(&self.header.to_bytes());
        for &addr in &self.input_addr {
            bytes.extend_from_slice(&addr.to_le_bytes());
        }
        for &addr in &self.output_addr {
            bytes.extend_from_slice(&addr.to_le_bytes());
        }
        bytes.extend_from_slice(&self.opcodes);
        bytes
    }

    /// Check internal consistency and address bounds.
    ///
    /// The opcode stream must decode to `num_opcodes` gates; bytes past the
    /// final gate are tolerated, matching the file format.
    pub fn validate(&self) -> Result<()> {
        self.header.validate()?;

        if self.input_addr.len() as u64 != self.header.input_size {
            return Err(CircuitError::MalformedFile {
                context: "input table length disagrees with header",
            });
        }
        if self.output_addr.len() as u64 != self.header.output_size {
            return Err(CircuitError::MalformedFile {
                context: "output table length disagrees with header",
            });
        }

        let memory = self.header.memory;
        for &addr in self.input_addr.iter().chain(&self.output_addr) {
            if addr as u64 >= memory {
                return Err(CircuitError::OutOfBoundsAddress { addr, memory });
            }
        }

        let mut reader = self.gates();
        for _ in 0..self.header.num_opcodes {
            reader.next_gate()?.check_addresses(memory)?;
        }
        Ok(())
    }

    /// Cursor over the opcode stream, positioned at the first gate
    pub fn gates(&self) -> GateReader<'_> {
        GateReader::new(&self.opcodes)
    }
}

fn read_addr_table(
    bytes: &[u8],
    pos: &mut usize,
    count: u64,
    context: &'static str,
) -> Result<Vec<Addr>> {
    let count = usize::try_from(count).map_err(|_| CircuitError::MalformedFile { context })?;
    let len = count
        .checked_mul(2)
        .ok_or(CircuitError::MalformedFile { context })?;
    let end = pos
        .checked_add(len)
        .ok_or(CircuitError::MalformedFile { context })?;
    let raw = bytes
        .get(*pos..end)
        .ok_or(CircuitError::MalformedFile { context })?;

    let mut table = try_alloc::<Addr>(count)?;
    table.extend(
        raw.chunks_exact(2)
            .map(|pair| Addr::from_le_bytes([pair[0], pair[1]])),
    );
    *pos = end;
    Ok(table)
}

/// Fallible allocation so a hostile header can not abort the process
fn try_alloc<T>(count: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(count)
        .map_err(|_| CircuitError::OutOfMemory {
            bytes: count * std::mem::size_of::<T>(),
        })?;
    Ok(v)
}
