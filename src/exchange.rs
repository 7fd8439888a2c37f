//! Label wire format: the boundary to an upstream OT / input-exchange collaborator.
//!
//! This crate does not implement oblivious transfer itself (§6 Non-goals): it only
//! defines what a completed exchange must hand the evaluator, and how labels
//! contributed by more than one party are merged into the single input map
//! [`crate::evaluator::evaluate`] expects. [`simulate_label_exchange`] is a test/demo
//! stand-in for a real OT handshake, adapted from the host's OT-simulation shape but
//! selecting the label for a caller-supplied bit rather than a random one.

use crate::circuit::WireId;
use crate::error::GarbleError;
use crate::label::Label;
use std::collections::HashMap;

/// One party's contribution to an input exchange: the wire it supplies a label for,
/// and the label itself (already chosen to represent that party's bit).
pub type LabelAssignment = Vec<(WireId, Label)>;

/// Merges label assignments from every party into the single map the evaluator needs.
///
/// Fails with [`GarbleError::DuplicateInput`] if more than one party supplies a label
/// for the same wire — each primary input wire belongs to exactly one party.
pub fn merge_party_assignments(
    parties: &[LabelAssignment],
) -> Result<HashMap<WireId, Label>, GarbleError> {
    let mut merged = HashMap::new();
    for assignment in parties {
        for &(wire, label) in assignment {
            if merged.insert(wire, label).is_some() {
                return Err(GarbleError::DuplicateInput(wire));
            }
        }
    }
    Ok(merged)
}

/// Picks, for each `(wire, bit)` pair, the label representing that bit out of the
/// wire's known label pair. A stand-in for a real OT exchange: a genuine protocol
/// never lets either party learn the label it did *not* request, while this simply
/// looks the requested one up, so it must never be used outside tests or demos.
pub fn simulate_label_exchange(
    input_labels: &HashMap<WireId, (Label, Label)>,
    bits: &HashMap<WireId, bool>,
) -> Result<LabelAssignment, GarbleError> {
    bits.iter()
        .map(|(&wire, &bit)| {
            let (l0, l1) = input_labels.get(&wire).ok_or(GarbleError::UnknownWire(wire))?;
            Ok((wire, if bit { *l1 } else { *l0 }))
        })
        .collect()
}
