//! # Bit-sliced Circuit Format
//!
//! Binary format for boolean circuits evaluated in bit-sliced batches.
//!
//! A circuit file is a fixed little-endian layout: a 40-byte header, the
//! input and output wire-address tables, then a raw opcode stream. Gates are
//! variable width: one opcode byte, a 16-bit destination address, and zero to
//! two 16-bit source addresses depending on arity.
//!
//! ## Key Features
//! - Five-gate opcode set (XOR, AND, OR, NOT, RANDOM)
//! - 16-bit wire addresses into a flat RAM of up to 65536 word slots
//! - Bounds-checked decoding: truncation and out-of-range addresses are
//!   rejected at load time, never trusted at evaluation time

pub mod circuit;
pub mod error;
pub mod gate;
pub mod opcode;

pub use circuit::{Circuit, CircuitHeader, MAX_MEMORY};
pub use error::CircuitError;
pub use gate::{Addr, Gate, GateReader};
pub use opcode::Opcode;
