//! Word-parallel circuit evaluator.
//!
//! One pass over the opcode stream evaluates every active lane of every gate
//! with a single word operation, so the cost of a run is one instruction per
//! gate regardless of batch width.

use std::io::Write;
use std::path::Path;

use bitcirc_format::{Circuit, Gate};

use crate::error::{Result, RuntimeError};
use crate::lanes::{self, MAX_LANES};
use crate::rng::LaneRng;
use crate::trace::TraceWriter;

/// Evaluates one circuit over batches of up to 64 lanes.
///
/// Owns the circuit, its RAM buffer, and the lane RNG. RAM is zeroed at the
/// start of every evaluation and never persists between calls; `&mut self`
/// keeps concurrent evaluation of one instance out of the type system.
pub struct Evaluator {
    circuit: Circuit,
    ram: Vec<u64>,
    rng: LaneRng,
}

impl Evaluator {
    /// Evaluator with an entropy-seeded RNG
    pub fn new(circuit: Circuit) -> Result<Self> {
        Self::with_rng(circuit, LaneRng::from_entropy())
    }

    /// Evaluator with a caller-controlled RNG.
    ///
    /// Re-validates the circuit: gate execution indexes RAM without bounds
    /// checks on the strength of this validation.
    pub fn with_rng(circuit: Circuit, rng: LaneRng) -> Result<Self> {
        circuit.validate()?;
        let ram = vec![0u64; circuit.header.memory as usize];
        Ok(Evaluator { circuit, ram, rng })
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Reseed or toggle the randomness source between runs
    pub fn rng_mut(&mut self) -> &mut LaneRng {
        &mut self.rng
    }

    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    /// Evaluate `batch` lanes without tracing.
    ///
    /// `inputs` and `outputs` hold one contiguous per-lane block each, sized
    /// `bytes_per_input()` / `bytes_per_output()`.
    pub fn evaluate(&mut self, inputs: &[u8], outputs: &mut [u8], batch: usize) -> Result<()> {
        self.run::<std::io::Sink>(inputs, outputs, batch, None)
    }

    /// Evaluate and record every gate's destination word to `trace`
    pub fn evaluate_traced<W: Write>(
        &mut self,
        inputs: &[u8],
        outputs: &mut [u8],
        batch: usize,
        trace: &mut TraceWriter<W>,
    ) -> Result<()> {
        self.run(inputs, outputs, batch, Some(trace))
    }

    /// Evaluate with an optional trace file.
    ///
    /// The trace file is opened before anything else touches RAM; an
    /// unopenable destination is `TraceOpenFailed` with no side effects.
    pub fn compute(
        &mut self,
        inputs: &[u8],
        outputs: &mut [u8],
        trace_path: Option<&Path>,
        batch: usize,
    ) -> Result<()> {
        match trace_path {
            Some(path) => {
                let mut trace = TraceWriter::create(path, batch).map_err(|source| {
                    RuntimeError::TraceOpenFailed {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                self.run(inputs, outputs, batch, Some(&mut trace))?;
                trace.finish()?;
                Ok(())
            }
            None => self.run::<std::io::Sink>(inputs, outputs, batch, None),
        }
    }

    fn run<W: Write>(
        &mut self,
        inputs: &[u8],
        outputs: &mut [u8],
        batch: usize,
        mut trace: Option<&mut TraceWriter<W>>,
    ) -> Result<()> {
        if !(1..=MAX_LANES).contains(&batch) {
            return Err(RuntimeError::InvalidBatchSize { batch });
        }
        let expected_in = batch * self.circuit.header.bytes_per_input();
        if inputs.len() != expected_in {
            return Err(RuntimeError::InputLengthMismatch {
                expected: expected_in,
                found: inputs.len(),
            });
        }
        let expected_out = batch * self.circuit.header.bytes_per_output();
        if outputs.len() != expected_out {
            return Err(RuntimeError::OutputLengthMismatch {
                expected: expected_out,
                found: outputs.len(),
            });
        }

        self.ram.fill(0);
        let mask = lanes::lane_mask(batch);
        lanes::pack_inputs(&self.circuit, &mut self.ram, inputs, batch);

        let mut gates = self.circuit.gates();
        for _ in 0..self.circuit.header.num_opcodes {
            let gate = gates.next_gate().map_err(RuntimeError::Format)?;
            let value = match gate {
                Gate::Xor { dst, a, b } => {
                    let v = self.ram[a as usize] ^ self.ram[b as usize];
                    self.ram[dst as usize] = v;
                    v
                }
                Gate::And { dst, a, b } => {
                    let v = self.ram[a as usize] & self.ram[b as usize];
                    self.ram[dst as usize] = v;
                    v
                }
                Gate::Or { dst, a, b } => {
                    let v = self.ram[a as usize] | self.ram[b as usize];
                    self.ram[dst as usize] = v;
                    v
                }
                Gate::Not { dst, a } => {
                    // Invert active lanes only; unused lanes stay zero
                    let v = mask ^ self.ram[a as usize];
                    self.ram[dst as usize] = v;
                    v
                }
                Gate::Random { dst } => {
                    let v = self.rng.next_word();
                    self.ram[dst as usize] = v;
                    v
                }
            };
            if let Some(trace) = trace.as_deref_mut() {
                trace.record(value)?;
            }
        }

        lanes::unpack_outputs(&self.circuit, &self.ram, outputs, batch);
        tracing::debug!(
            "evaluated {} gates over {} lanes",
            self.circuit.header.num_opcodes,
            batch
        );
        Ok(())
    }
}
