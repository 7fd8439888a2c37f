//! The Boolean circuit model: gate types, wires, and the in-memory DAG.
//!
//! Two construction paths produce the same model (§4.2): the programmatic path
//! (`new_wire`/`new_gate`) used to build a circuit by hand, and the import-facing path
//! (`reserve_wire`/`add_gate_with_output`) used by [`crate::netlist`] to bind a gate's
//! output to a wire id the importer has already allocated for a declared output port.

use crate::error::GarbleError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// An integer wire identifier. Stable for the lifetime of the [`Circuit`] it belongs to.
pub type WireId = u32;

/// The closed set of Boolean gate types this crate garbles and evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateType {
    /// `a ∧ b`
    And,
    /// `a ∨ b`
    Or,
    /// `a ⊕ b`, free under the free-XOR optimization.
    Xor,
    /// `¬a`, the only arity-1 gate type.
    Not,
    /// `¬(a ∧ b)`
    Nand,
    /// `¬(a ∨ b)`
    Nor,
    /// `¬(a ⊕ b)`
    Xnor,
    /// `a ∧ ¬b`
    AndNot,
    /// `a ∨ ¬b`
    OrNot,
}

impl GateType {
    /// Number of inputs this gate type takes: 1 for `Not`, 2 for everything else.
    pub fn arity(self) -> usize {
        match self {
            GateType::Not => 1,
            _ => 2,
        }
    }

    /// Plain Boolean semantics, used by the garbler to compute truth-table rows and by
    /// reference evaluators in tests. `b` is ignored for `Not`.
    pub fn eval(self, a: bool, b: bool) -> bool {
        match self {
            GateType::And => a && b,
            GateType::Or => a || b,
            GateType::Xor => a ^ b,
            GateType::Not => !a,
            GateType::Nand => !(a && b),
            GateType::Nor => !(a || b),
            GateType::Xnor => a == b,
            GateType::AndNot => a && !b,
            GateType::OrNot => a || !b,
        }
    }

    /// The `$_..._` netlist cell type mapping to this gate, for error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            GateType::And => "AND",
            GateType::Or => "OR",
            GateType::Xor => "XOR",
            GateType::Not => "NOT",
            GateType::Nand => "NAND",
            GateType::Nor => "NOR",
            GateType::Xnor => "XNOR",
            GateType::AndNot => "ANDNOT",
            GateType::OrNot => "ORNOT",
        }
    }
}

/// A single gate: its type, its ordered inputs, and the (single-assignment) wire it
/// drives.
#[derive(Debug, Clone)]
pub struct Gate {
    /// The Boolean operation this gate performs.
    pub gate_type: GateType,
    /// Input wires, in order. Length always equals `gate_type.arity()`.
    pub inputs: Vec<WireId>,
    /// The wire this gate, and only this gate, drives.
    pub output: WireId,
}

/// An immutable-after-construction DAG of wires and gates.
#[derive(Debug, Clone)]
pub struct Circuit {
    next_wire: WireId,
    gates: Vec<Gate>,
    driven_by: HashMap<WireId, usize>,
    primary_inputs: Vec<WireId>,
    declared_outputs: Option<Vec<WireId>>,
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

impl Circuit {
    /// An empty circuit, ready for programmatic construction.
    pub fn new() -> Self {
        Circuit {
            next_wire: 0,
            gates: Vec::new(),
            driven_by: HashMap::new(),
            primary_inputs: Vec::new(),
            declared_outputs: None,
        }
    }

    /// Allocates a fresh wire id and marks it a primary input (programmatic path).
    pub fn new_wire(&mut self) -> WireId {
        let id = self.next_wire;
        self.next_wire += 1;
        self.primary_inputs.push(id);
        id
    }

    /// Creates a gate from already-known wires and allocates its output wire
    /// (programmatic path).
    pub fn new_gate(&mut self, gate_type: GateType, inputs: &[WireId]) -> Result<WireId, GarbleError> {
        self.check_arity(gate_type, inputs)?;
        for &w in inputs {
            self.check_known(w)?;
        }
        let output = self.next_wire;
        self.next_wire += 1;
        let idx = self.gates.len();
        self.gates.push(Gate {
            gate_type,
            inputs: inputs.to_vec(),
            output,
        });
        self.driven_by.insert(output, idx);
        Ok(output)
    }

    /// Allocates a wire id without marking it a primary input. Used by the netlist
    /// importer to reserve ids for port bits before any cell is processed.
    pub fn reserve_wire(&mut self) -> WireId {
        let id = self.next_wire;
        self.next_wire += 1;
        id
    }

    /// Appends a gate whose output wire was already reserved (import path). Fails if
    /// the output wire is already driven by another gate (double driver), if any input
    /// is unknown, or on arity mismatch.
    pub fn add_gate_with_output(
        &mut self,
        gate_type: GateType,
        inputs: &[WireId],
        output: WireId,
    ) -> Result<(), GarbleError> {
        self.check_arity(gate_type, inputs)?;
        for &w in inputs {
            self.check_known(w)?;
        }
        if self.driven_by.contains_key(&output) {
            return Err(GarbleError::DoubleDriver(output));
        }
        let idx = self.gates.len();
        self.gates.push(Gate {
            gate_type,
            inputs: inputs.to_vec(),
            output,
        });
        self.driven_by.insert(output, idx);
        Ok(())
    }

    /// Marks `wire` as a primary input (import path: input-port bits).
    pub fn mark_primary_input(&mut self, wire: WireId) {
        if !self.primary_inputs.contains(&wire) {
            self.primary_inputs.push(wire);
        }
    }

    /// Declares the full set of primary outputs explicitly (import path). Once set,
    /// [`Circuit::primary_outputs`] returns exactly this list instead of inferring it.
    pub fn set_declared_outputs(&mut self, outputs: Vec<WireId>) {
        self.declared_outputs = Some(outputs);
    }

    fn check_arity(&self, gate_type: GateType, inputs: &[WireId]) -> Result<(), GarbleError> {
        let expected = gate_type.arity();
        if inputs.len() != expected {
            return Err(GarbleError::ArityMismatch {
                gate_type,
                expected,
                actual: inputs.len(),
            });
        }
        Ok(())
    }

    fn check_known(&self, wire: WireId) -> Result<(), GarbleError> {
        if wire < self.next_wire {
            Ok(())
        } else {
            Err(GarbleError::UnknownWire(wire))
        }
    }

    /// All gates, in insertion order (not necessarily a valid evaluation order for an
    /// imported circuit; use [`Circuit::topological_order`] for that).
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// The gate driving `wire`, if any (`None` for primary inputs).
    pub fn driving_gate(&self, wire: WireId) -> Option<&Gate> {
        self.driven_by.get(&wire).map(|&idx| &self.gates[idx])
    }

    /// Primary input wires, in the order they were created / declared.
    pub fn primary_inputs(&self) -> &[WireId] {
        &self.primary_inputs
    }

    /// Primary output wires: the explicitly declared set if one was set by the
    /// importer, otherwise every gate-output wire never consumed as another gate's
    /// input (programmatic path). The inferred form is only correct if the caller does
    /// not create dead internal wires (§9).
    pub fn primary_outputs(&self) -> Vec<WireId> {
        if let Some(outputs) = &self.declared_outputs {
            return outputs.clone();
        }
        let consumed: HashSet<WireId> = self
            .gates
            .iter()
            .flat_map(|g| g.inputs.iter().copied())
            .collect();
        self.gates
            .iter()
            .map(|g| g.output)
            .filter(|w| !consumed.contains(w))
            .collect()
    }

    /// Gate indices in a valid topological order (every gate after the gates producing
    /// its inputs). Programmatic circuits are already in such an order by construction;
    /// imported circuits are ordered by a cycle-checked depth-first post-order visit
    /// starting from each declared output wire.
    pub fn topological_order(&self) -> Result<Vec<usize>, GarbleError> {
        if self.declared_outputs.is_none() {
            return Ok((0..self.gates.len()).collect());
        }
        let outputs = self.declared_outputs.as_ref().unwrap();
        let mut state = vec![VisitState::Unvisited; self.gates.len()];
        let mut wire_done: HashSet<WireId> = HashSet::new();
        let mut order = Vec::with_capacity(self.gates.len());
        for &w in outputs {
            self.visit(w, &mut state, &mut wire_done, &mut order)?;
        }
        Ok(order)
    }

    fn visit(
        &self,
        wire: WireId,
        state: &mut [VisitState],
        wire_done: &mut HashSet<WireId>,
        order: &mut Vec<usize>,
    ) -> Result<(), GarbleError> {
        if wire_done.contains(&wire) {
            return Ok(());
        }
        let Some(&idx) = self.driven_by.get(&wire) else {
            // Primary input: nothing to schedule.
            wire_done.insert(wire);
            return Ok(());
        };
        match state[idx] {
            VisitState::Done => return Ok(()),
            VisitState::InProgress => return Err(GarbleError::CycleDetected),
            VisitState::Unvisited => {}
        }
        state[idx] = VisitState::InProgress;
        let inputs = self.gates[idx].inputs.clone();
        for input in inputs {
            self.visit(input, state, wire_done, order)?;
        }
        state[idx] = VisitState::Done;
        wire_done.insert(wire);
        order.push(idx);
        Ok(())
    }

    /// The gate at topological-order index `idx` (as returned in
    /// [`Circuit::topological_order`]'s output); panics if out of range, matching
    /// `Vec`'s own indexing contract.
    pub fn gate(&self, idx: usize) -> &Gate {
        &self.gates[idx]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}
