//! Runtime error types for circuit evaluation

use std::path::PathBuf;
use thiserror::Error;

use bitcirc_format::CircuitError;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("format error: {0}")]
    Format(#[from] CircuitError),

    #[error("invalid batch size {batch}: must be between 1 and 64")]
    InvalidBatchSize { batch: usize },

    #[error("input buffer is {found} bytes, expected {expected} for this batch")]
    InputLengthMismatch { expected: usize, found: usize },

    #[error("output buffer is {found} bytes, expected {expected} for this batch")]
    OutputLengthMismatch { expected: usize, found: usize },

    #[error("can not open trace file {path}: {source}")]
    TraceOpenFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RuntimeError::InvalidBatchSize { batch: 65 };
        assert_eq!(
            err.to_string(),
            "invalid batch size 65: must be between 1 and 64"
        );

        let err = RuntimeError::InputLengthMismatch {
            expected: 32,
            found: 16,
        };
        assert_eq!(
            err.to_string(),
            "input buffer is 16 bytes, expected 32 for this batch"
        );
    }

    #[test]
    fn test_format_error_from() {
        let err: RuntimeError = CircuitError::UnknownOpcode(9).into();
        assert!(err.to_string().contains("unknown opcode"));
    }

    #[test]
    fn test_trace_open_failed_display() {
        let err = RuntimeError::TraceOpenFailed {
            path: PathBuf::from("/nope/trace.bin"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing dir"),
        };
        assert!(err.to_string().contains("/nope/trace.bin"));
    }
}
