//! Error types for the circuit format

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CircuitError {
    #[error("circuit file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("malformed circuit file: {context}")]
    MalformedFile { context: &'static str },

    #[error("allocation of {bytes} bytes failed")]
    OutOfMemory { bytes: usize },

    #[error("declared memory of {memory} slots exceeds the {max} reachable by 16-bit addresses")]
    MemoryTooLarge { memory: u64, max: u64 },

    #[error("address {addr} out of bounds: circuit declares {memory} memory slots")]
    OutOfBoundsAddress { addr: u16, memory: u64 },

    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CircuitError>;
