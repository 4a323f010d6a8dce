//! File loader tests
//!
//! Exercises `Circuit::from_file` against real files on disk, including the
//! truncation and missing-file failure paths.

use std::io::Write;

use bitcirc_format::{Circuit, CircuitError, CircuitHeader, Gate};

fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

fn sample_circuit() -> Circuit {
    Circuit::from_gates(
        vec![0, 1],
        vec![2],
        &[Gate::Xor { dst: 2, a: 0, b: 1 }],
        3,
    )
    .unwrap()
}

#[test]
fn load_written_circuit() {
    let circuit = sample_circuit();
    let file = write_temp(&circuit.to_bytes());

    let loaded = Circuit::from_file(file.path()).unwrap();
    assert_eq!(loaded.header, circuit.header);
    assert_eq!(loaded.input_addr, circuit.input_addr);
    assert_eq!(loaded.output_addr, circuit.output_addr);
    assert_eq!(loaded.opcodes, circuit.opcodes);
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such.circuit");

    let err = Circuit::from_file(&path).unwrap_err();
    assert!(matches!(err, CircuitError::FileNotFound { .. }));
}

#[test]
fn file_shorter_than_header() {
    let file = write_temp(&[0u8; CircuitHeader::SIZE - 1]);

    let err = Circuit::from_file(file.path()).unwrap_err();
    assert!(matches!(err, CircuitError::MalformedFile { .. }));
}

#[test]
fn opcode_stream_ten_bytes_short() {
    let circuit = Circuit::from_gates(
        vec![0, 1],
        vec![4],
        &[
            Gate::Xor { dst: 2, a: 0, b: 1 },
            Gate::And { dst: 3, a: 2, b: 0 },
            Gate::Or { dst: 4, a: 3, b: 1 },
        ],
        5,
    )
    .unwrap();
    let bytes = circuit.to_bytes();
    let file = write_temp(&bytes[..bytes.len() - 10]);

    let err = Circuit::from_file(file.path()).unwrap_err();
    assert!(matches!(err, CircuitError::MalformedFile { .. }));
}

#[test]
fn trailing_file_bytes_ignored() {
    let mut bytes = sample_circuit().to_bytes();
    bytes.extend_from_slice(b"trailing garbage");
    let file = write_temp(&bytes);

    assert!(Circuit::from_file(file.path()).is_ok());
}
