//! # bitcirc-runtime
//!
//! Word-parallel evaluator for bit-sliced boolean circuits.
//!
//! A circuit is evaluated over a batch of up to 64 independent input
//! instances at once, one instance per bit lane of each RAM word, so every
//! gate costs a single native word operation. An optional trace records the
//! value written to each gate's destination wire in program order, which is
//! the raw material for leakage and differential analysis of masked
//! cryptographic circuits.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use bitcirc_format::Circuit;
//! use bitcirc_runtime::{Evaluator, LaneRng};
//!
//! let circuit = Circuit::from_file("cipher.circuit").unwrap();
//! let mut ev = Evaluator::with_rng(circuit, LaneRng::seeded(7)).unwrap();
//!
//! let inputs = vec![0u8; ev.circuit().header.bytes_per_input()];
//! let mut outputs = vec![0u8; ev.circuit().header.bytes_per_output()];
//! ev.compute(&inputs, &mut outputs, Some(Path::new("gates.trace")), 1)
//!     .unwrap();
//! ```

pub mod error;
pub mod evaluator;
pub mod lanes;
pub mod rng;
pub mod trace;

pub use error::RuntimeError;
pub use evaluator::Evaluator;
pub use lanes::MAX_LANES;
pub use rng::LaneRng;
pub use trace::{trace_item_bytes, TraceWriter};

/// Simple evaluation helper
///
/// Runs one batch with a fresh entropy-seeded RNG and returns the packed
/// output blocks.
pub fn evaluate(
    circuit: bitcirc_format::Circuit,
    inputs: &[u8],
    batch: usize,
) -> Result<Vec<u8>, RuntimeError> {
    let mut ev = Evaluator::new(circuit)?;
    let mut outputs = vec![0u8; batch * ev.circuit().header.bytes_per_output()];
    ev.evaluate(inputs, &mut outputs, batch)?;
    Ok(outputs)
}
