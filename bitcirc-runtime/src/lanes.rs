//! Lane packing codec.
//!
//! Each RAM word carries up to 64 evaluation lanes, one instance per bit.
//! Lane `j` sits at word bit `(j/8)*8 + (7 - j%8)`: most-significant-bit
//! first within each byte, bytes in little-endian order across the word.
//! Serializing a word little-endian therefore yields a plain MSB-first
//! bitstring, byte by byte, which is what the trace format relies on.

use bitcirc_format::Circuit;

/// Maximum lanes per word
pub const MAX_LANES: usize = 64;

/// Bit position of lane `j` inside a RAM word
#[inline]
pub const fn lane_bit(lane: usize) -> u32 {
    ((lane & !7) + (7 - (lane & 7))) as u32
}

/// OR of the lane bits of lanes `0..batch`.
///
/// The NOT gate inverts through this mask so inactive lanes stay zero.
pub fn lane_mask(batch: usize) -> u64 {
    let mut mask = 0u64;
    for j in 0..batch.min(MAX_LANES) {
        mask |= 1u64 << lane_bit(j);
    }
    mask
}

/// OR each lane's input bitstring into RAM through the input address table.
///
/// `inputs` holds one contiguous `bytes_per_input()` block per lane; wire
/// bit `i` is read MSB-first from byte `i/8` of its lane's block. RAM must
/// be zeroed by the caller beforehand.
pub fn pack_inputs(circuit: &Circuit, ram: &mut [u64], inputs: &[u8], batch: usize) {
    let wires = circuit.header.input_size as usize;
    let per_lane = circuit.header.bytes_per_input();
    if wires == 0 {
        return;
    }
    for (j, block) in inputs.chunks_exact(per_lane).take(batch).enumerate() {
        let shift = lane_bit(j);
        for i in 0..wires {
            let bit = (block[i >> 3] >> (7 - (i & 7))) & 1;
            ram[circuit.input_addr[i] as usize] |= (bit as u64) << shift;
        }
    }
}

/// Write each lane's output bitstring from RAM through the output address
/// table, zeroing every block first so trailing bits of a partial last byte
/// are deterministic.
pub fn unpack_outputs(circuit: &Circuit, ram: &[u64], outputs: &mut [u8], batch: usize) {
    let wires = circuit.header.output_size as usize;
    let per_lane = circuit.header.bytes_per_output();
    if wires == 0 {
        return;
    }
    for (j, block) in outputs.chunks_exact_mut(per_lane).take(batch).enumerate() {
        let shift = lane_bit(j);
        block.fill(0);
        for i in 0..wires {
            let bit = (ram[circuit.output_addr[i] as usize] >> shift) & 1;
            block[i >> 3] |= (bit as u8) << (7 - (i & 7));
        }
    }
}
