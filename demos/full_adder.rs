//! Builds a 1-bit full adder, garbles it, and evaluates it end to end with a fixed
//! input (`a=0, b=1, cin=0`), the same scenario the circuit was originally exercised
//! with.
//!
//! Run with `cargo run --example full_adder`.

use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use yao_gc::circuit::{Circuit, GateType};
use yao_gc::evaluator::evaluate;
use yao_gc::garbler::garble;

fn main() {
    let mut c = Circuit::new();
    let a = c.new_wire();
    let b = c.new_wire();
    let cin = c.new_wire();

    let a_xor_b = c.new_gate(GateType::Xor, &[a, b]).unwrap();
    let sum = c.new_gate(GateType::Xor, &[a_xor_b, cin]).unwrap();

    let a_and_b = c.new_gate(GateType::And, &[a, b]).unwrap();
    let b_and_cin = c.new_gate(GateType::And, &[b, cin]).unwrap();
    let a_and_cin = c.new_gate(GateType::And, &[a, cin]).unwrap();

    let intermediate_carry = c.new_gate(GateType::Or, &[a_and_b, b_and_cin]).unwrap();
    let carry_out = c.new_gate(GateType::Or, &[intermediate_carry, a_and_cin]).unwrap();

    let mut rng = ChaCha12Rng::from_seed([0x07; 32]);
    let (_secrets, setup) = garble(&c, &mut rng).unwrap();

    // a = 0, b = 1, cin = 0.
    let (a0, _a1) = setup.input_labels[&a];
    let (_b0, b1) = setup.input_labels[&b];
    let (cin0, _cin1) = setup.input_labels[&cin];

    let inputs = [(a, a0), (b, b1), (cin, cin0)].into_iter().collect();
    let outputs = evaluate(&setup, &inputs).unwrap();

    println!("sum = {}", outputs[&sum] as u8);
    println!("carry_out = {}", outputs[&carry_out] as u8);
    assert_eq!(outputs[&sum], true, "0 XOR 1 XOR 0 should be 1");
    assert_eq!(outputs[&carry_out], false, "no carry expected for this input");
}
