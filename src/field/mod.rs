// ============================================================================
// Field Module
// Unsigned arithmetic modulo a fixed 254-bit prime
// ============================================================================
//
// This module provides:
// - FieldElement: a canonical residue in [0, p)
// - MODULUS / MIDPOINT: the prime and its half-space boundary
//
// Design principles:
// - Every element is kept reduced; construction is the only reduction point
// - No signedness here: sign is a property of the numeric layer's encoding
// - Arithmetic never fails; range policing happens in the numeric layer

mod element;

pub use element::{FieldElement, MIDPOINT, MODULUS};
