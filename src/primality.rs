//! # Primality — Trial-Division Strategies
//!
//! Classifies a single machine-word candidate. Counterexample classification
//! only needs this after both conjecture conditions already passed, which at
//! current search depths happens for primes alone, so an O(√k) wheel is
//! plenty; no probabilistic testing is involved anywhere in the verdict.
//!
//! Three strategies, reference first:
//!
//! 1. **Trial** — divide by every d in [2, k). O(k), definitional.
//! 2. **SqrtTrial** — divide by every d in [2, √k]. O(√k).
//! 3. **Wheel** — SqrtTrial restricted to divisors ending in 1, 3, 7 or 9
//!    after dedicated checks for 2, 3, 5 and 7. Same bound, 2.5× fewer
//!    divisions; the production path.
//!
//! 1 is non-prime by convention; 0 is outside the domain.

use anyhow::{bail, Result};

/// Named strategies for the primality verdict, reference first, production
/// fast path last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimalityStrategy {
    Trial,
    SqrtTrial,
    Wheel,
}

impl PrimalityStrategy {
    pub const ALL: [PrimalityStrategy; 3] = [
        PrimalityStrategy::Trial,
        PrimalityStrategy::SqrtTrial,
        PrimalityStrategy::Wheel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimalityStrategy::Trial => "trial",
            PrimalityStrategy::SqrtTrial => "sqrt-trial",
            PrimalityStrategy::Wheel => "wheel",
        }
    }

    pub fn test(self, k: u64) -> Result<bool> {
        match self {
            PrimalityStrategy::Trial => is_prime_trial(k),
            PrimalityStrategy::SqrtTrial => is_prime_sqrt(k),
            PrimalityStrategy::Wheel => is_prime_wheel(k),
        }
    }
}

fn check_candidate(k: u64) -> Result<()> {
    if k == 0 {
        bail!("primality candidate must be >= 1, got 0");
    }
    Ok(())
}

/// Exclusive upper bound on useful trial divisors: ⌊√k⌋ + 1.
fn divisor_bound(k: u64) -> u64 {
    (k as f64).sqrt() as u64 + 1
}

/// Reference: divide by everything below k.
pub fn is_prime_trial(k: u64) -> Result<bool> {
    check_candidate(k)?;
    if k == 1 {
        return Ok(false);
    }
    for d in 2..k {
        if k % d == 0 {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Trial division bounded by √k: a composite k has a factor not above √k.
pub fn is_prime_sqrt(k: u64) -> Result<bool> {
    check_candidate(k)?;
    if k == 1 {
        return Ok(false);
    }
    for d in 2..divisor_bound(k) {
        if k % d == 0 {
            return Ok(false);
        }
    }
    Ok(true)
}

/// √k-bounded trial division on the mod-10 wheel.
///
/// After 2, 3, 5 and 7 are handled directly, any remaining prime factor ends
/// in 1, 3, 7 or 9, so only those residues are tried from 11 upward.
pub fn is_prime_wheel(k: u64) -> Result<bool> {
    check_candidate(k)?;
    if k == 1 {
        return Ok(false);
    }
    if matches!(k, 2 | 3 | 5 | 7) {
        return Ok(true);
    }
    if k % 2 == 0 || k % 3 == 0 || k % 5 == 0 || k % 7 == 0 {
        return Ok(false);
    }
    let bound = divisor_bound(k);
    let mut base = 10;
    while base < bound {
        for offset in [1, 3, 7, 9] {
            let d = base + offset;
            if d < bound && k % d == 0 {
                return Ok(false);
            }
        }
        base += 10;
    }
    Ok(true)
}
