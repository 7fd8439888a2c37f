//! Circuit garbling using Yao's protocol with free XOR.
//!
//! Builds a [`GarblerSecrets`]/[`EvaluatorSetup`] pair from a [`Circuit`]: δ and every
//! wire's full label pair stay in `GarblerSecrets`; only what the evaluator needs ever
//! lands in `EvaluatorSetup` (§4.4).

use crate::circuit::{Circuit, GateType, WireId};
use crate::constants::PROGRESS_BAR_THRESHOLD;
use crate::error::GarbleError;
use crate::label::{self, Label};
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The garbled form of one gate: free for XOR, or a shuffled table of ciphertext rows
/// for everything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GarbledGate {
    /// Free-XOR: no ciphertext, output labels derived directly from input labels.
    Xor,
    /// `2^arity` shuffled rows (2 for `Not`, 4 for every other non-XOR gate), with the
    /// `(u, v)` keys that produced them discarded.
    Table(Vec<Vec<u8>>),
}

/// One gate, carrying enough of its own structure that the evaluator never needs the
/// original [`Circuit`]: type, input wires, output wire, and the garbled table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarbledGateEntry {
    /// The gate's Boolean operation.
    pub gate_type: GateType,
    /// Input wires, in the same order the garbler consumed them.
    pub inputs: Vec<WireId>,
    /// The wire this gate drives.
    pub output: WireId,
    /// The garbled representation of this gate.
    pub garbled: GarbledGate,
}

/// Everything the evaluator needs: the garbled gates in topological order, and the
/// label pair for every primary input and primary output wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorSetup {
    /// Garbled gates, already in a valid topological order.
    pub gates: Vec<GarbledGateEntry>,
    /// Both labels of every primary input wire.
    pub input_labels: HashMap<WireId, (Label, Label)>,
    /// Both labels of every primary output wire, used only to decode the final bit.
    pub output_labels: HashMap<WireId, (Label, Label)>,
}

/// Everything the garbler keeps to itself: δ, and the label pair of every wire
/// (including internal ones). Never handed to the evaluator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarblerSecrets {
    /// The process-wide free-XOR offset.
    pub delta: Label,
    /// The label pair of every wire in the circuit, input and internal alike.
    pub wire_to_keys: HashMap<WireId, (Label, Label)>,
}

/// Garbles `circuit`, drawing all randomness from `rng` (which must be a cryptographic
/// source: §5 requires this for δ, per-wire sampling, and row shuffling).
pub fn garble<R: RngCore>(
    circuit: &Circuit,
    rng: &mut R,
) -> Result<(GarblerSecrets, EvaluatorSetup), GarbleError> {
    let delta = Label::random(rng);
    let mut wire_to_keys: HashMap<WireId, (Label, Label)> = HashMap::new();

    for &w in circuit.primary_inputs() {
        let l0 = Label::random(rng);
        wire_to_keys.insert(w, (l0, l0.xor(&delta)));
    }

    // Open Question (a): pre-assign labels for primary outputs driven by a non-XOR
    // gate only; XOR-driven outputs always get their labels from free-XOR derivation.
    let primary_outputs = circuit.primary_outputs();
    for &w in &primary_outputs {
        let is_xor_driven = circuit
            .driving_gate(w)
            .map(|g| g.gate_type == GateType::Xor)
            .unwrap_or(false);
        if !is_xor_driven {
            let l0 = Label::random(rng);
            wire_to_keys.insert(w, (l0, l0.xor(&delta)));
        }
    }

    let order = circuit.topological_order()?;
    let progress = if order.len() >= PROGRESS_BAR_THRESHOLD {
        let pb = ProgressBar::new(order.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
                .unwrap()
                .progress_chars("##-"),
        );
        pb.set_message("Garbling circuit...");
        Some(pb)
    } else {
        None
    };

    let mut garbled_gates = Vec::with_capacity(order.len());
    for (processed, &idx) in order.iter().enumerate() {
        let gate = circuit.gate(idx);
        let entry = garble_gate(
            gate.gate_type,
            &gate.inputs,
            gate.output,
            &mut wire_to_keys,
            delta,
            rng,
        )?;
        garbled_gates.push(entry);
        if let Some(pb) = &progress {
            pb.set_position((processed + 1) as u64);
        }
    }
    if let Some(pb) = progress {
        pb.finish_with_message("done");
    }

    let input_labels = restrict(&wire_to_keys, circuit.primary_inputs())?;
    let output_labels = restrict(&wire_to_keys, &primary_outputs)?;

    Ok((
        GarblerSecrets { delta, wire_to_keys },
        EvaluatorSetup {
            gates: garbled_gates,
            input_labels,
            output_labels,
        },
    ))
}

fn restrict(
    wire_to_keys: &HashMap<WireId, (Label, Label)>,
    wires: &[WireId],
) -> Result<HashMap<WireId, (Label, Label)>, GarbleError> {
    wires
        .iter()
        .map(|&w| {
            wire_to_keys
                .get(&w)
                .copied()
                .map(|pair| (w, pair))
                .ok_or(GarbleError::UnknownWire(w))
        })
        .collect()
}

fn garble_gate<R: RngCore>(
    gate_type: GateType,
    inputs: &[WireId],
    output: WireId,
    wire_to_keys: &mut HashMap<WireId, (Label, Label)>,
    delta: Label,
    rng: &mut R,
) -> Result<GarbledGateEntry, GarbleError> {
    if gate_type == GateType::Xor {
        let (a0, _) = *wire_to_keys
            .get(&inputs[0])
            .ok_or(GarbleError::UnknownWire(inputs[0]))?;
        let (b0, _) = *wire_to_keys
            .get(&inputs[1])
            .ok_or(GarbleError::UnknownWire(inputs[1]))?;
        let out0 = a0.xor(&b0);
        wire_to_keys.insert(output, (out0, out0.xor(&delta)));
        return Ok(GarbledGateEntry {
            gate_type,
            inputs: inputs.to_vec(),
            output,
            garbled: GarbledGate::Xor,
        });
    }

    let (out0, out1) = match wire_to_keys.get(&output).copied() {
        Some(pair) => pair,
        None => {
            let l0 = Label::random(rng);
            let pair = (l0, l0.xor(&delta));
            wire_to_keys.insert(output, pair);
            pair
        }
    };
    let output_label = |bit: bool| if bit { out1 } else { out0 };

    let table = if gate_type.arity() == 1 {
        let (a0, a1) = *wire_to_keys
            .get(&inputs[0])
            .ok_or(GarbleError::UnknownWire(inputs[0]))?;
        let mut rows = Vec::with_capacity(2);
        for (v, key) in [(false, a0), (true, a1)] {
            let out_bit = gate_type.eval(v, false);
            rows.push(label::enc_label(&key, &output_label(out_bit), rng));
        }
        rows
    } else {
        let (a0, a1) = *wire_to_keys
            .get(&inputs[0])
            .ok_or(GarbleError::UnknownWire(inputs[0]))?;
        let (b0, b1) = *wire_to_keys
            .get(&inputs[1])
            .ok_or(GarbleError::UnknownWire(inputs[1]))?;
        let mut rows = Vec::with_capacity(4);
        for (u, key_a) in [(false, a0), (true, a1)] {
            for (v, key_b) in [(false, b0), (true, b1)] {
                let out_bit = gate_type.eval(u, v);
                // Outer = key_a, inner = key_b (see SPEC_FULL.md §9, "Row encryption order").
                let inner = label::enc_label(&key_b, &output_label(out_bit), rng);
                let outer = label::enc(&key_a, &inner, rng);
                rows.push(outer);
            }
        }
        rows
    };

    let mut rows = table;
    rows.shuffle(rng);

    Ok(GarbledGateEntry {
        gate_type,
        inputs: inputs.to_vec(),
        output,
        garbled: GarbledGate::Table(rows),
    })
}
