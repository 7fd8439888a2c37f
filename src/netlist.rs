//! Synthesized netlist ingestion (Yosys-style JSON) into the circuit model.
//!
//! Grounded directly on `utils.py::parse_yosys_json` from the original source: the
//! mapping rules below are a line-for-line restatement of that function, not an
//! independent reinterpretation of §4.3.

use crate::circuit::{Circuit, GateType, WireId};
use crate::error::GarbleError;
use serde::Deserialize;
use std::collections::HashMap;

/// Top-level netlist document: `{"modules": {...}}`.
#[derive(Debug, Deserialize)]
pub struct NetlistDocument {
    /// Every module in the document, keyed by name. Only the first is imported; a
    /// document with more than one module is rejected (§4.3).
    pub modules: HashMap<String, Module>,
}

/// A single module: its boundary ports and its gate-level cells.
#[derive(Debug, Deserialize)]
pub struct Module {
    /// Boundary ports, keyed by name.
    pub ports: HashMap<String, Port>,
    /// Gate-level cells, keyed by an arbitrary (unused) cell name.
    pub cells: HashMap<String, Cell>,
}

/// A boundary port: its direction and the raw netlist bit ids assigned to it, in
/// bit-index order (bit 0 first).
#[derive(Debug, Deserialize)]
pub struct Port {
    /// `"input"` or `"output"`; anything else is rejected.
    pub direction: String,
    /// Raw netlist bit ids, one per bit of the port, LSB first.
    pub bits: Vec<u32>,
}

/// A single gate-level cell.
#[derive(Debug, Deserialize)]
pub struct Cell {
    /// The `$_..._` cell type.
    #[serde(rename = "type")]
    pub cell_type: String,
    /// Direction of each named port on this cell (`"A"`, `"B"`, `"Y"`, ...).
    pub port_directions: HashMap<String, String>,
    /// The raw netlist bit id connected to each named port (single-bit connections,
    /// as produced for primitive gate cells).
    pub connections: HashMap<String, Vec<u32>>,
}

/// The result of importing a netlist: the circuit plus the name→wire maps needed to
/// assemble integer-valued input/output words.
#[derive(Debug)]
pub struct ImportedNetlist {
    /// The imported circuit, ready for [`crate::garbler::garble`].
    pub circuit: Circuit,
    /// For each input port, its wire ids in bit-index order (bit 0 first).
    pub input_bits: HashMap<String, Vec<WireId>>,
    /// For each output port, its wire ids in bit-index order (bit 0 first).
    pub output_bits: HashMap<String, Vec<WireId>>,
}

fn gate_type_for_cell(cell_type: &str) -> Result<GateType, GarbleError> {
    match cell_type {
        "$_AND_" => Ok(GateType::And),
        "$_OR_" => Ok(GateType::Or),
        "$_XOR_" => Ok(GateType::Xor),
        "$_NOT_" => Ok(GateType::Not),
        "$_NAND_" => Ok(GateType::Nand),
        "$_NOR_" => Ok(GateType::Nor),
        "$_XNOR_" => Ok(GateType::Xnor),
        "$_ANDNOT_" => Ok(GateType::AndNot),
        "$_ORNOT_" => Ok(GateType::OrNot),
        other => Err(GarbleError::UnsupportedGateType(other.to_string())),
    }
}

/// Input/output port-pin names, in the order the garbling/evaluation library expects
/// them for each gate type. `NOT` has only `A`/`Y`; every other gate has `A`, `B`, `Y`.
fn input_port_names(gate_type: GateType) -> &'static [&'static str] {
    if gate_type.arity() == 1 {
        &["A"]
    } else {
        &["A", "B"]
    }
}

/// Imports the first module of `doc` into a [`Circuit`]. Mirrors `parse_yosys_json`:
/// every port bit gets a wire reserved up front; cell connections resolve through that
/// reservation, allocating a fresh internal wire on first reference to any bit id that
/// is not a port bit.
pub fn import(doc: &NetlistDocument) -> Result<ImportedNetlist, GarbleError> {
    if doc.modules.len() != 1 {
        return Err(GarbleError::MalformedNetlist(format!(
            "expected exactly one module, found {}",
            doc.modules.len()
        )));
    }
    let module = doc.modules.values().next().unwrap();

    let mut circuit = Circuit::new();
    let mut bit_to_wire: HashMap<u32, WireId> = HashMap::new();
    let mut input_bits: HashMap<String, Vec<WireId>> = HashMap::new();
    let mut output_bits: HashMap<String, Vec<WireId>> = HashMap::new();
    let mut declared_outputs: Vec<WireId> = Vec::new();

    // Reserve a wire for every port bit before touching any cell, per §4.3.
    for (name, port) in module.ports.iter() {
        match port.direction.as_str() {
            "input" => {
                let mut wires = Vec::with_capacity(port.bits.len());
                for &bit in &port.bits {
                    let wire = circuit.reserve_wire();
                    circuit.mark_primary_input(wire);
                    bit_to_wire.insert(bit, wire);
                    wires.push(wire);
                }
                input_bits.insert(name.clone(), wires);
            }
            "output" => {
                let mut wires = Vec::with_capacity(port.bits.len());
                for &bit in &port.bits {
                    let wire = circuit.reserve_wire();
                    bit_to_wire.insert(bit, wire);
                    declared_outputs.push(wire);
                    wires.push(wire);
                }
                output_bits.insert(name.clone(), wires);
            }
            other => return Err(GarbleError::UnsupportedPortDirection(other.to_string())),
        }
    }

    let mut resolve = |bit: u32, circuit: &mut Circuit| -> WireId {
        *bit_to_wire.entry(bit).or_insert_with(|| circuit.reserve_wire())
    };

    for cell in module.cells.values() {
        let gate_type = gate_type_for_cell(&cell.cell_type)?;

        for (port, direction) in &cell.port_directions {
            if direction != "input" && direction != "output" {
                return Err(GarbleError::UnsupportedPortDirection(direction.clone()));
            }
            if !cell.connections.contains_key(port) {
                return Err(GarbleError::MalformedNetlist(format!(
                    "cell of type {} has no connection for port {port}",
                    cell.cell_type
                )));
            }
        }

        let output_bit = single_bit(cell, "Y")?;
        let output_wire = resolve(output_bit, &mut circuit);

        let mut inputs = Vec::with_capacity(gate_type.arity());
        for name in input_port_names(gate_type) {
            let bit = single_bit(cell, name)?;
            inputs.push(resolve(bit, &mut circuit));
        }

        circuit.add_gate_with_output(gate_type, &inputs, output_wire)?;
    }

    circuit.set_declared_outputs(declared_outputs);

    Ok(ImportedNetlist {
        circuit,
        input_bits,
        output_bits,
    })
}

fn single_bit(cell: &Cell, port: &str) -> Result<u32, GarbleError> {
    let bits = cell.connections.get(port).ok_or_else(|| {
        GarbleError::MalformedNetlist(format!(
            "cell of type {} has no connection for port {port}",
            cell.cell_type
        ))
    })?;
    if bits.len() != 1 {
        return Err(GarbleError::MalformedNetlist(format!(
            "cell of type {} port {port} is not a single bit",
            cell.cell_type
        )));
    }
    Ok(bits[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn and_netlist_json() -> serde_json::Value {
        serde_json::json!({
            "modules": {
                "top": {
                    "ports": {
                        "a": {"direction": "input", "bits": [2]},
                        "b": {"direction": "input", "bits": [3]},
                        "y": {"direction": "output", "bits": [4]}
                    },
                    "cells": {
                        "g0": {
                            "type": "$_AND_",
                            "port_directions": {"A": "input", "B": "input", "Y": "output"},
                            "connections": {"A": [2], "B": [3], "Y": [4]}
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn imports_single_and_gate() {
        let doc: NetlistDocument = serde_json::from_value(and_netlist_json()).unwrap();
        let imported = import(&doc).unwrap();
        assert_eq!(imported.input_bits["a"].len(), 1);
        assert_eq!(imported.input_bits["b"].len(), 1);
        assert_eq!(imported.output_bits["y"].len(), 1);
        assert_eq!(imported.circuit.primary_outputs(), imported.output_bits["y"]);
        assert_eq!(imported.circuit.gates().len(), 1);
        assert_eq!(imported.circuit.gates()[0].gate_type, GateType::And);
    }

    #[test]
    fn rejects_unsupported_gate_type() {
        let mut doc = and_netlist_json();
        doc["modules"]["top"]["cells"]["g0"]["type"] = serde_json::json!("$_MUX_");
        let doc: NetlistDocument = serde_json::from_value(doc).unwrap();
        assert!(matches!(import(&doc), Err(GarbleError::UnsupportedGateType(_))));
    }

    #[test]
    fn rejects_unsupported_direction() {
        let mut doc = and_netlist_json();
        doc["modules"]["top"]["ports"]["a"]["direction"] = serde_json::json!("inout");
        let doc: NetlistDocument = serde_json::from_value(doc).unwrap();
        assert!(matches!(import(&doc), Err(GarbleError::UnsupportedPortDirection(_))));
    }

    #[test]
    fn rejects_multi_module_documents() {
        let mut v = and_netlist_json();
        v["modules"]["extra"] = v["modules"]["top"].clone();
        let doc: NetlistDocument = serde_json::from_value(v).unwrap();
        assert!(matches!(import(&doc), Err(GarbleError::MalformedNetlist(_))));
    }

    #[test]
    fn import_is_idempotent() {
        let doc: NetlistDocument = serde_json::from_value(and_netlist_json()).unwrap();
        let first = import(&doc).unwrap();
        let second = import(&doc).unwrap();
        assert_eq!(first.circuit.gates().len(), second.circuit.gates().len());
        assert_eq!(
            first.circuit.gates()[0].gate_type,
            second.circuit.gates()[0].gate_type
        );
        assert_eq!(
            first.circuit.topological_order().unwrap(),
            second.circuit.topological_order().unwrap()
        );
    }
}
