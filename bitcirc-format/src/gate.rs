//! Gate encoding and the bounds-checked opcode stream reader.
//!
//! ## Gate Encoding (variable width)
//!
//! ```text
//! [opcode:1 byte][dst:2 bytes LE][src:2 bytes LE per source operand]
//! ```
//!
//! XOR/AND/OR carry two sources, NOT one, RANDOM none.

use crate::error::{CircuitError, Result};
use crate::opcode::Opcode;

/// Wire address: an index into circuit RAM.
pub type Addr = u16;

/// A decoded gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    Xor { dst: Addr, a: Addr, b: Addr },
    And { dst: Addr, a: Addr, b: Addr },
    Or { dst: Addr, a: Addr, b: Addr },
    Not { dst: Addr, a: Addr },
    Random { dst: Addr },
}

impl Gate {
    /// The opcode this gate encodes to
    pub const fn opcode(&self) -> Opcode {
        match self {
            Gate::Xor { .. } => Opcode::Xor,
            Gate::And { .. } => Opcode::And,
            Gate::Or { .. } => Opcode::Or,
            Gate::Not { .. } => Opcode::Not,
            Gate::Random { .. } => Opcode::Random,
        }
    }

    /// Destination wire address
    pub const fn dst(&self) -> Addr {
        match *self {
            Gate::Xor { dst, .. }
            | Gate::And { dst, .. }
            | Gate::Or { dst, .. }
            | Gate::Not { dst, .. }
            | Gate::Random { dst } => dst,
        }
    }

    /// Append the encoded form to `out`
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.push(self.opcode().to_u8());
        out.extend_from_slice(&self.dst().to_le_bytes());
        match *self {
            Gate::Xor { a, b, .. } | Gate::And { a, b, .. } | Gate::Or { a, b, .. } => {
                out.extend_from_slice(&a.to_le_bytes());
                out.extend_from_slice(&b.to_le_bytes());
            }
            Gate::Not { a, .. } => out.extend_from_slice(&a.to_le_bytes()),
            Gate::Random { .. } => {}
        }
    }

    /// Check every address against the declared RAM size
    pub fn check_addresses(&self, memory: u64) -> Result<()> {
        let check = |addr: Addr| {
            if (addr as u64) < memory {
                Ok(())
            } else {
                Err(CircuitError::OutOfBoundsAddress { addr, memory })
            }
        };
        match *self {
            Gate::Xor { dst, a, b } | Gate::And { dst, a, b } | Gate::Or { dst, a, b } => {
                check(dst)?;
                check(a)?;
                check(b)
            }
            Gate::Not { dst, a } => {
                check(dst)?;
                check(a)
            }
            Gate::Random { dst } => check(dst),
        }
    }
}

/// Encode a gate sequence into a fresh opcode stream
pub fn encode_gates(gates: &[Gate]) -> Vec<u8> {
    let mut out = Vec::with_capacity(gates.iter().map(|g| g.opcode().encoded_len()).sum());
    for gate in gates {
        gate.encode_into(&mut out);
    }
    out
}

/// Bounds-checked cursor over an opcode byte stream.
///
/// Every read is checked against the remaining bytes; underflow reports
/// `MalformedFile` instead of trusting the declared stream length.
pub struct GateReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> GateReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        GateReader { bytes, pos: 0 }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left in the stream
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn read_u8(&mut self) -> Result<u8> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or(CircuitError::MalformedFile {
                context: "opcode stream truncated",
            })?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_addr(&mut self) -> Result<Addr> {
        let lo = self.read_u8()?;
        let hi = self.read_u8()?;
        Ok(Addr::from_le_bytes([lo, hi]))
    }

    /// Decode the next gate, in stream order
    pub fn next_gate(&mut self) -> Result<Gate> {
        let raw = self.read_u8()?;
        let op = Opcode::from_u8(raw).ok_or(CircuitError::UnknownOpcode(raw))?;
        let dst = self.read_addr()?;
        Ok(match op {
            Opcode::Xor => Gate::Xor {
                dst,
                a: self.read_addr()?,
                b: self.read_addr()?,
            },
            Opcode::And => Gate::And {
                dst,
                a: self.read_addr()?,
                b: self.read_addr()?,
            },
            Opcode::Or => Gate::Or {
                dst,
                a: self.read_addr()?,
                b: self.read_addr()?,
            },
            Opcode::Not => Gate::Not {
                dst,
                a: self.read_addr()?,
            },
            Opcode::Random => Gate::Random { dst },
        })
    }
}
