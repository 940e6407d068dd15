//! # Sieve — Batch Primality over a Range
//!
//! The search orchestrator classifies whole candidate blocks at once; doing
//! it one candidate at a time would repeat the same trial divisions millions
//! of times. Two strategies produce a flag per candidate in [start, end],
//! index i holding the verdict for start + i:
//!
//! 1. **PerCandidate** — one trial-division test per candidate. The
//!    reference, O((end−start)·end) in the worst case.
//! 2. **Eratosthenes** — a classic sieve over [0, end], sliced to the
//!    requested window. O(end log log end) for the whole block; the
//!    production path.
//!
//! 0 and 1 are flagged non-prime by convention. The window is inclusive on
//! both sides, so the output always holds end − start + 1 flags.
//!
//! ## References
//!
//! - OEIS A000720 (π(x), used by the tests as ground truth).

use anyhow::{bail, Context, Result};

use crate::primality::is_prime_trial;

/// Named strategies for batch classification, reference first, production
/// fast path last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStrategy {
    PerCandidate,
    Eratosthenes,
}

impl BatchStrategy {
    pub const ALL: [BatchStrategy; 2] = [BatchStrategy::PerCandidate, BatchStrategy::Eratosthenes];

    pub fn name(self) -> &'static str {
        match self {
            BatchStrategy::PerCandidate => "per-candidate",
            BatchStrategy::Eratosthenes => "eratosthenes",
        }
    }

    pub fn compute(self, start: u64, end: u64) -> Result<Vec<bool>> {
        match self {
            BatchStrategy::PerCandidate => per_candidate(start, end),
            BatchStrategy::Eratosthenes => sieve_range(start, end),
        }
    }
}

fn check_window(start: u64, end: u64) -> Result<()> {
    if end < start {
        bail!("range end {} is below start {}", end, start);
    }
    Ok(())
}

/// Reference: one trial-division verdict per candidate.
pub fn per_candidate(start: u64, end: u64) -> Result<Vec<bool>> {
    check_window(start, end)?;
    (start..=end)
        .map(|k| if k == 0 { Ok(false) } else { is_prime_trial(k) })
        .collect()
}

/// Sieve of Eratosthenes over [0, end], sliced to [start, end].
///
/// Sieving always covers [0, end] regardless of the window start; the flag
/// table costs one byte per candidate up to end, which is what the search
/// block size bounds.
pub fn sieve_range(start: u64, end: u64) -> Result<Vec<bool>> {
    check_window(start, end)?;
    let size = usize::try_from(end)
        .ok()
        .and_then(|e| e.checked_add(1))
        .context("sieve window too large to allocate")?;
    let mut flags = vec![true; size];
    for i in 0..2.min(size) {
        flags[i] = false;
    }
    for x in 2..sieving_bound(end) {
        if flags[x as usize] {
            for multiple in ((x * 2)..=end).step_by(x as usize) {
                flags[multiple as usize] = false;
            }
        }
    }
    Ok(flags[start as usize..].to_vec())
}

/// Exclusive bound on sieving primes: ⌊√end⌋ + 1.
fn sieving_bound(end: u64) -> u64 {
    (end as f64).sqrt() as u64 + 1
}
