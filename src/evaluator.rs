//! Garbled circuit evaluation functionality.
//!
//! Evaluates a [`crate::garbler::EvaluatorSetup`] purely through oblivious trial
//! decryption (§4.5): every row of a non-XOR gate's table is attempted, the first row
//! whose authentication tag verifies wins, and the rest are discarded unread. This is
//! a deliberate departure from the host's original point-and-permute-style direct row
//! lookup, which the garbled rows here carry no index or permutation bit to support.

use crate::circuit::WireId;
use crate::constants::PROGRESS_BAR_THRESHOLD;
use crate::error::GarbleError;
use crate::garbler::{EvaluatorSetup, GarbledGate};
use crate::label::{self, Label};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;

/// Evaluates `setup` against the supplied input labels, one per primary input wire.
///
/// `inputs` must contain exactly one label per primary input wire (§4.5); a missing
/// wire is [`GarbleError::MissingInput`], and a label matching neither of that wire's
/// two known labels is [`GarbleError::BadInputLabel`].
pub fn evaluate(
    setup: &EvaluatorSetup,
    inputs: &HashMap<WireId, Label>,
) -> Result<HashMap<WireId, bool>, GarbleError> {
    let mut active: HashMap<WireId, (Label, bool)> = HashMap::new();

    for (&wire, (l0, l1)) in &setup.input_labels {
        let given = inputs.get(&wire).ok_or(GarbleError::MissingInput(wire))?;
        let bit = if given == l0 {
            false
        } else if given == l1 {
            true
        } else {
            return Err(GarbleError::BadInputLabel(wire));
        };
        active.insert(wire, (*given, bit));
    }

    let progress = if setup.gates.len() >= PROGRESS_BAR_THRESHOLD {
        let pb = ProgressBar::new(setup.gates.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
                .unwrap()
                .progress_chars("##-"),
        );
        pb.set_message("Evaluating circuit...");
        Some(pb)
    } else {
        None
    };

    for (processed, entry) in setup.gates.iter().enumerate() {
        let (label, bit) = evaluate_gate(entry, &active)?;
        active.insert(entry.output, (label, bit));
        if let Some(pb) = &progress {
            pb.set_position((processed + 1) as u64);
        }
    }
    if let Some(pb) = progress {
        pb.finish_with_message("done");
    }

    let mut outputs = HashMap::with_capacity(setup.output_labels.len());
    for (&wire, (l0, l1)) in &setup.output_labels {
        let (label, bit) = active.get(&wire).copied().ok_or(GarbleError::UnknownWire(wire))?;
        if label == *l0 || label == *l1 {
            outputs.insert(wire, bit);
        } else {
            return Err(GarbleError::OutputLabelMismatch(wire));
        }
    }

    Ok(outputs)
}

fn evaluate_gate(
    entry: &crate::garbler::GarbledGateEntry,
    active: &HashMap<WireId, (Label, bool)>,
) -> Result<(Label, bool), GarbleError> {
    let &(a_label, a_bit) = active
        .get(&entry.inputs[0])
        .ok_or(GarbleError::UnknownWire(entry.inputs[0]))?;

    match &entry.garbled {
        GarbledGate::Xor => {
            let &(b_label, b_bit) = active
                .get(&entry.inputs[1])
                .ok_or(GarbleError::UnknownWire(entry.inputs[1]))?;
            Ok((a_label.xor(&b_label), a_bit ^ b_bit))
        }
        GarbledGate::Table(rows) if entry.inputs.len() == 1 => {
            for row in rows {
                if let Some(label) = label::dec_label(&a_label, row)? {
                    let bit = entry.gate_type.eval(a_bit, false);
                    return Ok((label, bit));
                }
            }
            Err(GarbleError::DecryptionMismatch(entry.output))
        }
        GarbledGate::Table(rows) => {
            let &(b_label, b_bit) = active
                .get(&entry.inputs[1])
                .ok_or(GarbleError::UnknownWire(entry.inputs[1]))?;
            for row in rows {
                // Trial decryption peels the outer layer (keyed by input A) first; only
                // a row whose outer layer verifies under `a_label` is attempted inner.
                let Some(inner) = label::dec(&a_label, row) else {
                    continue;
                };
                if let Some(label) = label::dec_label(&b_label, &inner)? {
                    let bit = entry.gate_type.eval(a_bit, b_bit);
                    return Ok((label, bit));
                }
            }
            Err(GarbleError::DecryptionMismatch(entry.output))
        }
    }
}
