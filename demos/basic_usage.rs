// ============================================================================
// Basic Usage Example
// ============================================================================

use quantized_field::prelude::*;

fn main() {
    println!("=== Quantized Field Example ===\n");

    // Parse decimal inputs onto the 2^-16 grid
    let price: Quantized = "1.5".parse().unwrap();
    let quantity = Quantized::from_integer(4);

    println!("price    = {}", price);
    println!("quantity = {}", quantity);

    // The four operators, checked form
    let total = price.checked_mul(&quantity).unwrap();
    println!("\nprice * quantity = {}", total);

    let with_fee = total.checked_add(&"0.25".parse().unwrap()).unwrap();
    println!("plus fee         = {}", with_fee);

    let per_unit = with_fee.checked_div(&quantity).unwrap();
    println!("per unit         = {}", per_unit);

    let margin = per_unit.checked_sub(&price).unwrap();
    println!("margin           = {}", margin);

    // Negative values live in the upper half of the ring
    let loss = Quantized::from_integer(-3);
    println!("\nloss             = {}", loss);
    println!("loss is negative: {}", loss.is_negative());
    println!("loss raw residue = {}", loss.raw());

    // Ordering is consistent with the decoded values
    let mut values: Vec<Quantized> = ["2", "-0.5", "0.25", "-3"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    values.sort();
    println!("\nsorted:");
    for v in &values {
        println!("  {}", v);
    }

    // Overflow and division by zero are hard errors
    println!("\n=== Failure Modes ===");
    match price.checked_div(&Quantized::zero()) {
        Err(e) => println!("divide by zero: {}", e),
        Ok(_) => unreachable!(),
    }

    let wide = Quantized::from_integer(i64::MAX);
    match wide.checked_mul(&wide) {
        Err(e) => println!("oversized operand: {}", e),
        Ok(_) => unreachable!(),
    }
}
