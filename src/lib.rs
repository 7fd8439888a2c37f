//! Two-party Yao garbled circuit construction and evaluation with free XOR optimization.

/// Shared constants used across the library
pub mod constants;
/// Circuit gate counting utilities
pub mod counter;
/// The Boolean circuit model: gate types, wires, and the DAG itself
pub mod circuit;
/// Typed error taxonomy for construction, garbling, and evaluation failures
pub mod error;
/// Garbled circuit evaluation functionality
pub mod evaluator;
/// Label wire format: the boundary to an upstream OT / input-exchange collaborator
pub mod exchange;
/// Circuit garbling using Yao's protocol with free XOR
pub mod garbler;
/// Wire label cryptography: generation, XOR, and authenticated encryption
pub mod label;
/// Synthesized netlist ingestion (Yosys-style JSON) into the circuit model
pub mod netlist;

pub use circuit::{Circuit, Gate, GateType, WireId};
pub use error::GarbleError;
pub use label::Label;
