//! Gate opcode definitions.
//!
//! One byte per gate in the opcode stream. Values follow the circuit
//! serializer's mapping: XOR=1, AND=2, OR=3, NOT=4, RANDOM=5. Zero is
//! deliberately unassigned so an all-zero file never decodes.

use serde::{Deserialize, Serialize};

/// Gate opcode (one byte in the opcode stream).
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// XOR: ram[dst] = ram[a] ^ ram[b]
    Xor = 1,
    /// AND: ram[dst] = ram[a] & ram[b]
    And = 2,
    /// OR: ram[dst] = ram[a] | ram[b]
    Or = 3,
    /// NOT: ram[dst] = mask ^ ram[a], inverting active lanes only
    Not = 4,
    /// RANDOM: ram[dst] = fresh random word
    Random = 5,
}

impl Opcode {
    /// Try to convert from the raw stream byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Opcode::Xor),
            2 => Some(Opcode::And),
            3 => Some(Opcode::Or),
            4 => Some(Opcode::Not),
            5 => Some(Opcode::Random),
            _ => None,
        }
    }

    /// Convert to the raw stream byte
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Number of source addresses following the destination
    #[inline]
    pub const fn arity(self) -> usize {
        match self {
            Opcode::Xor | Opcode::And | Opcode::Or => 2,
            Opcode::Not => 1,
            Opcode::Random => 0,
        }
    }

    /// Encoded gate width in bytes: opcode byte, destination, sources
    #[inline]
    pub const fn encoded_len(self) -> usize {
        3 + 2 * self.arity()
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Opcode::Xor => "xor",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Not => "not",
            Opcode::Random => "random",
        };
        write!(f, "{}", name)
    }
}
