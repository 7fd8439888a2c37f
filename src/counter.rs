//! Gate-type counting, used by the `stats` CLI subcommand to summarize a circuit
//! before garbling it.

use crate::circuit::Circuit;
use std::collections::HashMap;

/// Counts gates in `circuit` by type.
///
/// # Example
/// ```
/// use yao_gc::circuit::{Circuit, GateType};
/// use yao_gc::counter::count_gate_types;
///
/// let mut c = Circuit::new();
/// let a = c.new_wire();
/// let b = c.new_wire();
/// c.new_gate(GateType::Xor, &[a, b]).unwrap();
/// let counts = count_gate_types(&c);
/// assert_eq!(counts.get("XOR"), Some(&1));
/// ```
pub fn count_gate_types(circuit: &Circuit) -> HashMap<&'static str, usize> {
    let mut counts = HashMap::new();
    for gate in circuit.gates() {
        *counts.entry(gate.gate_type.as_str()).or_insert(0) += 1;
    }
    counts
}
