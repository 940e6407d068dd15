//! # pswhunt — Selfridge/Pomerance/Wagstaff Counterexample Search
//!
//! For odd p, the conjecture says: if 2^(p−1) ≡ 1 (mod p) and p divides
//! F(p+1), then p is prime. No composite has ever been found passing both
//! conditions; this crate searches ranges for one and benchmarks the
//! algorithm ladder that makes the search tractable.
//!
//! ## Engines
//!
//! Each core computation ships as a family of strategies behind one enum,
//! ordered reference first and production fast path last, so the self-test
//! harness can always pit the clever against the definitional:
//!
//! | engine | operation | production strategy |
//! |---|---|---|
//! | [`pow2`] | 2^n mod x | [`pow2::Pow2Strategy::Gmp`] |
//! | [`fib`] | F(n) mod x | [`fib::FibStrategy::FastDoubling`] |
//! | [`mulmod`] | a·b mod x | shift-and-add (single strategy) |
//! | [`primality`] | is k prime? | [`primality::PrimalityStrategy::Wheel`] |
//! | [`sieve`] | flags over [start, end] | [`sieve::BatchStrategy::Eratosthenes`] |
//!
//! [`bits`] carries the shared bit-decomposition the binary strategies walk.
//!
//! ## Drivers
//!
//! [`search`] runs the block-wise hunt, [`selftest`] gates it with a
//! cross-variant sweep, [`timing`] produces the range-scaling benchmark
//! rows, and [`progress`] keeps the counters the status reporter prints.

pub mod bits;
pub mod fib;
pub mod mulmod;
pub mod pow2;
pub mod primality;
pub mod progress;
pub mod search;
pub mod selftest;
pub mod sieve;
pub mod timing;

use anyhow::{bail, Result};
use rug::Integer;

/// Shared domain check: every modular engine requires a positive modulus.
pub(crate) fn check_modulus(x: &Integer) -> Result<()> {
    if *x < 1 {
        bail!("modulus must be >= 1, got {}", x);
    }
    Ok(())
}
