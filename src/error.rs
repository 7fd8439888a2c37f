//! Typed error taxonomy shared by every library module.
//!
//! The CLI binary is the only place these are rendered to a human; library code always
//! returns `Result<_, GarbleError>` and never logs or retries internally.

use crate::circuit::{GateType, WireId};

/// Everything that can go wrong while building, garbling, or evaluating a circuit.
#[derive(Debug, thiserror::Error)]
pub enum GarbleError {
    /// A gate was given the wrong number of inputs for its type.
    #[error("arity mismatch for {gate_type:?}: expected {expected} input(s), got {actual}")]
    ArityMismatch {
        /// The gate type whose arity was violated.
        gate_type: GateType,
        /// The arity `gate_type` requires.
        expected: usize,
        /// The number of inputs actually supplied.
        actual: usize,
    },

    /// A gate (or netlist cell) referenced a wire that was never created.
    #[error("unknown wire {0}")]
    UnknownWire(WireId),

    /// A wire was the declared output of more than one gate.
    #[error("wire {0} is driven by more than one gate")]
    DoubleDriver(WireId),

    /// The circuit's dependency graph contains a cycle.
    #[error("circuit contains a cycle reachable from a declared output")]
    CycleDetected,

    /// A netlist document did not match the expected shape.
    #[error("malformed netlist: {0}")]
    MalformedNetlist(String),

    /// A netlist cell used a `$_..._` type this crate does not recognize.
    #[error("unsupported gate type: {0}")]
    UnsupportedGateType(String),

    /// A netlist port declared a direction other than `input`/`output`.
    #[error("unsupported port direction: {0}")]
    UnsupportedPortDirection(String),

    /// An input label supplied at evaluation time matches neither of the wire's two
    /// known labels.
    #[error("input label for wire {0} matches neither known label of that wire")]
    BadInputLabel(WireId),

    /// A primary input wire had no label supplied at evaluation time.
    #[error("missing input label for primary input wire {0}")]
    MissingInput(WireId),

    /// More than one party supplied a label for the same wire.
    #[error("wire {0} was supplied by more than one party")]
    DuplicateInput(WireId),

    /// No row of a non-XOR garbled gate decrypted successfully.
    #[error("no row of the garbled gate producing wire {0} decrypted successfully")]
    DecryptionMismatch(WireId),

    /// A computed output-wire label matched neither of the two known output labels.
    #[error("computed label for output wire {0} matches neither known output label")]
    OutputLabelMismatch(WireId),

    /// The underlying authenticated-encryption primitive failed unexpectedly while
    /// encrypting (not to be confused with an expected decryption failure, which is a
    /// signal handled by [`GarbleError::DecryptionMismatch`], not an error).
    #[error("crypto operation failed: {0}")]
    Crypto(String),
}
