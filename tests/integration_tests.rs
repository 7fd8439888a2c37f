//! End-to-end scenarios: build or import a circuit, garble it, select input labels
//! for a concrete bit assignment, evaluate, and check the decoded output bits.

use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde_json::{json, Value};
use std::collections::HashMap;
use yao_gc::circuit::{Circuit, GateType, WireId};
use yao_gc::evaluator::evaluate;
use yao_gc::garbler::{garble, EvaluatorSetup};
use yao_gc::netlist::{self, NetlistDocument};

fn rng() -> ChaCha12Rng {
    ChaCha12Rng::from_seed([0x99; 32])
}

fn eval_with_bits(setup: &EvaluatorSetup, bits: &[(WireId, bool)]) -> HashMap<WireId, bool> {
    let inputs = bits
        .iter()
        .map(|&(w, v)| {
            let (l0, l1) = setup.input_labels[&w];
            (w, if v { l1 } else { l0 })
        })
        .collect();
    evaluate(setup, &inputs).unwrap()
}

#[test]
fn scenario_a_and_gate_true_true() {
    let mut c = Circuit::new();
    let a = c.new_wire();
    let b = c.new_wire();
    let out = c.new_gate(GateType::And, &[a, b]).unwrap();
    let (_, setup) = garble(&c, &mut rng()).unwrap();
    let result = eval_with_bits(&setup, &[(a, true), (b, true)]);
    assert_eq!(result[&out], true);
}

#[test]
fn scenario_b_and_gate_true_false() {
    let mut c = Circuit::new();
    let a = c.new_wire();
    let b = c.new_wire();
    let out = c.new_gate(GateType::And, &[a, b]).unwrap();
    let (_, setup) = garble(&c, &mut rng()).unwrap();
    let result = eval_with_bits(&setup, &[(a, true), (b, false)]);
    assert_eq!(result[&out], false);
}

#[test]
fn scenario_c_xor_gate() {
    let mut c = Circuit::new();
    let a = c.new_wire();
    let b = c.new_wire();
    let out = c.new_gate(GateType::Xor, &[a, b]).unwrap();
    let (_, setup) = garble(&c, &mut rng()).unwrap();
    let result = eval_with_bits(&setup, &[(a, false), (b, true)]);
    assert_eq!(result[&out], true);
}

#[test]
fn scenario_d_nor_gate() {
    let mut c = Circuit::new();
    let a = c.new_wire();
    let b = c.new_wire();
    let out = c.new_gate(GateType::Nor, &[a, b]).unwrap();
    let (_, setup) = garble(&c, &mut rng()).unwrap();
    let result = eval_with_bits(&setup, &[(a, false), (b, false)]);
    assert_eq!(result[&out], true);
}

#[test]
fn scenario_e_full_adder() {
    let mut c = Circuit::new();
    let a = c.new_wire();
    let b = c.new_wire();
    let cin = c.new_wire();

    let a_xor_b = c.new_gate(GateType::Xor, &[a, b]).unwrap();
    let sum = c.new_gate(GateType::Xor, &[a_xor_b, cin]).unwrap();

    let a_and_b = c.new_gate(GateType::And, &[a, b]).unwrap();
    let b_and_cin = c.new_gate(GateType::And, &[b, cin]).unwrap();
    let a_and_cin = c.new_gate(GateType::And, &[a, cin]).unwrap();
    let carry1 = c.new_gate(GateType::Or, &[a_and_b, b_and_cin]).unwrap();
    let carry_out = c.new_gate(GateType::Or, &[carry1, a_and_cin]).unwrap();

    let (_, setup) = garble(&c, &mut rng()).unwrap();
    let result = eval_with_bits(&setup, &[(a, false), (b, true), (cin, false)]);
    assert_eq!(result[&sum], true);
    assert_eq!(result[&carry_out], false);
}

/// Minimal Yosys-JSON cell emitter used to assemble the multiplier netlist below.
struct Builder {
    next_bit: u32,
    cells: serde_json::Map<String, Value>,
    cell_id: usize,
}

impl Builder {
    fn new() -> Self {
        Builder {
            next_bit: 0,
            cells: serde_json::Map::new(),
            cell_id: 0,
        }
    }

    fn fresh_bit(&mut self) -> u32 {
        let b = self.next_bit;
        self.next_bit += 1;
        b
    }

    fn add_cell(&mut self, cell_type: &str, a: u32, b: Option<u32>, y: u32) {
        let mut port_directions = serde_json::Map::new();
        let mut connections = serde_json::Map::new();
        port_directions.insert("A".to_string(), json!("input"));
        connections.insert("A".to_string(), json!([a]));
        if let Some(b) = b {
            port_directions.insert("B".to_string(), json!("input"));
            connections.insert("B".to_string(), json!([b]));
        }
        port_directions.insert("Y".to_string(), json!("output"));
        connections.insert("Y".to_string(), json!([y]));

        self.cells.insert(
            format!("c{}", self.cell_id),
            json!({
                "type": cell_type,
                "port_directions": port_directions,
                "connections": connections,
            }),
        );
        self.cell_id += 1;
    }

    /// Emits a full adder (`a + b + cin`) and returns `(sum, carry_out)`.
    fn full_adder(&mut self, a: u32, b: u32, cin: u32) -> (u32, u32) {
        let a_xor_b = self.fresh_bit();
        self.add_cell("$_XOR_", a, Some(b), a_xor_b);
        let sum = self.fresh_bit();
        self.add_cell("$_XOR_", a_xor_b, Some(cin), sum);

        let a_and_b = self.fresh_bit();
        self.add_cell("$_AND_", a, Some(b), a_and_b);
        let axorb_and_cin = self.fresh_bit();
        self.add_cell("$_AND_", a_xor_b, Some(cin), axorb_and_cin);
        let cout = self.fresh_bit();
        self.add_cell("$_OR_", a_and_b, Some(axorb_and_cin), cout);

        (sum, cout)
    }
}

/// Builds a Yosys-style JSON netlist for an N-bit unsigned shift-and-add array
/// multiplier: `result = a * b`, truncated to `n` bits. Every cell is one of
/// `$_AND_`/`$_XOR_`/`$_OR_`, matching what the importer accepts.
///
/// Grade-school multiplication: `result = sum_i (a AND b[i]) << i`, accumulated into a
/// `2n`-bit running total with a full-width ripple-carry adder per partial-product row.
fn build_multiplier_netlist(n: usize) -> Value {
    let mut bld = Builder::new();

    let a_bits: Vec<u32> = (0..n).map(|_| bld.fresh_bit()).collect();
    let b_bits: Vec<u32> = (0..n).map(|_| bld.fresh_bit()).collect();

    // A constant zero wire, built once via XOR of a bit with itself.
    let zero = bld.fresh_bit();
    bld.add_cell("$_XOR_", a_bits[0], Some(a_bits[0]), zero);

    // Running 2n-bit accumulator, initialized to the first partial-product row
    // (a AND b[0]), zero-extended.
    let mut acc: Vec<u32> = Vec::with_capacity(2 * n);
    for i in 0..n {
        let y = bld.fresh_bit();
        bld.add_cell("$_AND_", a_bits[i], Some(b_bits[0]), y);
        acc.push(y);
    }
    for _ in n..2 * n {
        acc.push(zero);
    }

    for row in 1..n {
        let mut shifted: Vec<u32> = vec![zero; 2 * n];
        for i in 0..n {
            let y = bld.fresh_bit();
            bld.add_cell("$_AND_", a_bits[i], Some(b_bits[row]), y);
            shifted[row + i] = y;
        }

        let mut carry = zero;
        let mut new_acc = Vec::with_capacity(2 * n);
        for i in 0..2 * n {
            let (sum, cout) = bld.full_adder(acc[i], shifted[i], carry);
            new_acc.push(sum);
            carry = cout;
        }
        acc = new_acc;
    }

    let result_bits: Vec<u32> = acc[..n].to_vec();

    let mut ports = serde_json::Map::new();
    ports.insert("a".to_string(), json!({"direction": "input", "bits": a_bits}));
    ports.insert("b".to_string(), json!({"direction": "input", "bits": b_bits}));
    ports.insert(
        "result".to_string(),
        json!({"direction": "output", "bits": result_bits}),
    );

    json!({
        "modules": {
            "top": {
                "ports": ports,
                "cells": Value::Object(bld.cells),
            }
        }
    })
}

#[test]
fn scenario_f_32_bit_multiplier() {
    const N: usize = 32;
    let doc_json = build_multiplier_netlist(N);
    let doc: NetlistDocument = serde_json::from_value(doc_json).unwrap();
    let imported = netlist::import(&doc).unwrap();

    let (_, setup) = garble(&imported.circuit, &mut rng()).unwrap();

    let a_val: u64 = 123;
    let b_val: u64 = 123;
    let mut bits = Vec::with_capacity(2 * N);
    for (i, &w) in imported.input_bits["a"].iter().enumerate() {
        bits.push((w, (a_val >> i) & 1 == 1));
    }
    for (i, &w) in imported.input_bits["b"].iter().enumerate() {
        bits.push((w, (b_val >> i) & 1 == 1));
    }

    let result = eval_with_bits(&setup, &bits);

    let mut product: u64 = 0;
    for (i, &w) in imported.output_bits["result"].iter().enumerate() {
        if result[&w] {
            product |= 1u64 << i;
        }
    }
    assert_eq!(product, (a_val * b_val) & 0xFFFF_FFFF);
}

#[test]
fn import_is_idempotent_on_generated_multiplier() {
    let doc_json = build_multiplier_netlist(8);
    let doc: NetlistDocument = serde_json::from_value(doc_json).unwrap();
    let first = netlist::import(&doc).unwrap();
    let second = netlist::import(&doc).unwrap();
    assert_eq!(first.circuit.gates().len(), second.circuit.gates().len());
    assert_eq!(
        first.circuit.topological_order().unwrap(),
        second.circuit.topological_order().unwrap()
    );
}
