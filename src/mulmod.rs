//! # Mulmod — Shift-and-Add Modular Multiplication
//!
//! a·b mod x without ever forming the product a·b: the larger operand is
//! reduced once, then accumulated along the bits of the smaller operand,
//! most significant first, doubling and reducing per bit. Intermediates stay
//! below 2x, so the engine works wherever addition does.
//!
//! This is the multiplication primitive behind the `doubling-mulmod`
//! Fibonacci strategy, the fallback shape for stacks without a fast native
//! multiply. Results are always fully reduced into [0, x); callers never
//! need a trailing reduction of their own.
//!
//! ## References
//!
//! - D.E. Knuth, "The Art of Computer Programming", vol. 2, §4.3.1
//!   (classical multiplication), adapted to interleaved reduction.

use std::cmp::Ordering;

use anyhow::{bail, Result};
use rug::Integer;

use crate::check_modulus;

/// a·b mod x by binary doubling over the smaller operand's bits.
///
/// Operands must be non-negative; the modulus must be positive. The smaller
/// operand bounds the loop length, the larger is pre-reduced so every
/// intermediate fits in one extra bit over x.
pub fn mul_mod(a: &Integer, b: &Integer, x: &Integer) -> Result<Integer> {
    if a.cmp0() == Ordering::Less || b.cmp0() == Ordering::Less {
        bail!("mul_mod operands must be non-negative, got {} and {}", a, b);
    }
    check_modulus(x)?;
    if *x == 1 {
        return Ok(Integer::new());
    }
    let (small, big) = if a <= b { (a, b) } else { (b, a) };
    let big = Integer::from(big % x);
    let mut r = Integer::new();
    for i in (0..small.significant_bits()).rev() {
        r = (r * 2u32) % x;
        if small.get_bit(i) {
            r = (r + &big) % x;
        }
    }
    Ok(r)
}
