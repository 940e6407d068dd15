//! # Pow2 — Modular Exponentiation Strategies (2^n mod x)
//!
//! Computes the Fermat-condition residue 2^(p−1) mod p, the cheaper of the two
//! conjecture conditions. Five strategies implement one contract so that the
//! self-test harness always has a ground truth independent of the optimization
//! under test:
//!
//! 1. **Direct** — materialize 2^n exactly (a left shift), reduce once. The
//!    definitional reference: no modular arithmetic to get wrong.
//! 2. **Linear** — double-and-reduce n times. O(n) multiplications; kept for
//!    cross-validation only.
//! 3. **BinaryIter** — square-and-multiply over n's bits, most significant
//!    first. O(log n); the performance-critical shape.
//! 4. **BinaryRecursive** — the same chain expressed as n → n/2 recursion.
//!    Equivalent cost, different control shape; catches off-by-ones the
//!    iterative form could hide.
//! 5. **Gmp** — delegate to GMP's `mpz_powm` through `rug`. The
//!    presumed-fastest baseline, used by the search orchestrator.
//!
//! Every strategy checks the degenerate modulus x = 1 up front and returns 0;
//! residues are otherwise always in [0, x).
//!
//! ## References
//!
//! - D.E. Knuth, "The Art of Computer Programming", vol. 2, §4.6.3
//!   (evaluation of powers).
//! - A. Menezes, P. van Oorschot, S. Vanstone, "Handbook of Applied
//!   Cryptography", ch. 14 (square-and-multiply).

use anyhow::{bail, Context, Result};
use rug::Integer;

use crate::bits::{bit_decompose, BitOrder};
use crate::check_modulus;

/// Named strategies for 2^n mod x, reference first, production fast path last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pow2Strategy {
    Direct,
    Linear,
    BinaryIter,
    BinaryRecursive,
    Gmp,
}

impl Pow2Strategy {
    pub const ALL: [Pow2Strategy; 5] = [
        Pow2Strategy::Direct,
        Pow2Strategy::Linear,
        Pow2Strategy::BinaryIter,
        Pow2Strategy::BinaryRecursive,
        Pow2Strategy::Gmp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pow2Strategy::Direct => "direct",
            Pow2Strategy::Linear => "linear",
            Pow2Strategy::BinaryIter => "binary-iter",
            Pow2Strategy::BinaryRecursive => "binary-recursive",
            Pow2Strategy::Gmp => "gmp",
        }
    }

    pub fn compute(self, n: u64, x: &Integer) -> Result<Integer> {
        match self {
            Pow2Strategy::Direct => direct(n, x),
            Pow2Strategy::Linear => linear(n, x),
            Pow2Strategy::BinaryIter => binary_iterative(n, x),
            Pow2Strategy::BinaryRecursive => binary_recursive(n, x),
            Pow2Strategy::Gmp => gmp(n, x),
        }
    }
}

/// Reference: build 2^n exactly, then reduce.
///
/// The shift exponent must fit u32 (a ~4-gigabit number otherwise); that is a
/// capability limit of this reference, not of the binary strategies.
pub fn direct(n: u64, x: &Integer) -> Result<Integer> {
    check_modulus(x)?;
    if *x == 1 {
        return Ok(Integer::new());
    }
    let shift = u32::try_from(n).with_context(|| format!("2^{} too large to materialize", n))?;
    Ok((Integer::from(1u32) << shift) % x)
}

/// Double-and-reduce n times. O(n); cross-validation only.
pub fn linear(n: u64, x: &Integer) -> Result<Integer> {
    check_modulus(x)?;
    if *x == 1 {
        return Ok(Integer::new());
    }
    let mut s = Integer::from(1u32);
    for _ in 0..n {
        s = (s * 2u32) % x;
    }
    Ok(s)
}

/// Square-and-multiply over n's bits, most significant first.
///
/// Per bit: square-and-reduce the accumulator, then double-and-reduce if the
/// bit is set. n = 0 walks no bits and leaves the accumulator at 1.
pub fn binary_iterative(n: u64, x: &Integer) -> Result<Integer> {
    check_modulus(x)?;
    if *x == 1 {
        return Ok(Integer::new());
    }
    let mut s = Integer::from(1u32);
    for bit in bit_decompose(n, BitOrder::MsbFirst) {
        s.square_mut();
        s %= x;
        if bit {
            s = (s * 2u32) % x;
        }
    }
    Ok(s)
}

/// The same square-and-multiply chain as n → n/2 recursion.
///
/// Combine step: odd n squares then doubles, even n only squares. Depth is
/// log2(n) ≤ 64, so the recursion cannot exhaust the stack.
pub fn binary_recursive(n: u64, x: &Integer) -> Result<Integer> {
    check_modulus(x)?;
    if *x == 1 {
        return Ok(Integer::new());
    }
    Ok(recurse(n, x))
}

fn recurse(n: u64, x: &Integer) -> Integer {
    if n == 0 {
        return Integer::from(1u32);
    }
    let mut s = recurse(n / 2, x);
    s.square_mut();
    if n & 1 == 1 {
        s *= 2u32;
    }
    s % x
}

/// GMP fast path via `rug::Integer::pow_mod`.
pub fn gmp(n: u64, x: &Integer) -> Result<Integer> {
    check_modulus(x)?;
    if *x == 1 {
        return Ok(Integer::new());
    }
    match Integer::from(2u32).pow_mod(&Integer::from(n), x) {
        Ok(r) => Ok(r),
        Err(_) => bail!("GMP pow_mod rejected exponent {} for modulus {}", n, x),
    }
}
