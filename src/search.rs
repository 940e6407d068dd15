//! # Search — Conjecture Counterexample Orchestrator
//!
//! Drives the hunt itself: for every candidate p in [start, end], decide
//! the two conjecture conditions and the true primality verdict, and flag
//! any composite p that passes both conditions. Such a p would be the first
//! known counterexample to the Selfridge/Pomerance/Wagstaff conjecture; the
//! $620 is still unclaimed, so the expected steady state is a clean report.
//!
//! ## Algorithm
//!
//! The range is cut into fixed-size blocks. Per block:
//!
//! 1. **Fermat stage** — 2^(p−1) mod p = 1, via the GMP fast path, in
//!    parallel across the block.
//! 2. **Fibonacci stage** — F(p+1) mod p = 0, via fast doubling, in
//!    parallel. The `staged` method evaluates this only for Fermat
//!    survivors (roughly the primes plus a thin band of pseudoprimes,
//!    about 1/ln p of the block); the `direct` method evaluates it for
//!    every candidate, which is what the benchmark harness times.
//! 3. **Sieve stage** — one Eratosthenes pass classifies the whole block.
//!
//! A candidate flagged by both condition stages and not by the sieve stops
//! the search immediately; everything already computed is folded into the
//! final report. Stage wall times are accumulated per report so method
//! comparisons come for free.
//!
//! ## References
//!
//! - Pomerance, Selfridge, Wagstaff, "The pseudoprimes to 25·10^9",
//!   Math. Comp. 35 (1980). The $620 prize condition is conjecture B.
//! - OEIS A001567 (base-2 Fermat pseudoprimes, the survivors the Fibonacci
//!   stage exists to kill).

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use rug::Integer;
use serde::Serialize;
use tracing::info;

use crate::progress::Progress;
use crate::{fib, pow2, sieve};

/// Default candidates per block. Bounds sieve memory (one byte per
/// candidate) and sets the progress/logging granularity.
pub const DEFAULT_BLOCK: u64 = 1_000_000;

/// Condition evaluation order within a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMethod {
    /// Evaluate both conditions for every candidate.
    Direct,
    /// Evaluate the Fibonacci condition only for Fermat survivors.
    Staged,
}

impl SearchMethod {
    pub fn name(self) -> &'static str {
        match self {
            SearchMethod::Direct => "direct",
            SearchMethod::Staged => "staged",
        }
    }
}

/// Everything a finished (or interrupted-by-find) search has to say.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub start: u64,
    pub end: u64,
    pub method: String,
    /// Candidates actually evaluated before the search stopped.
    pub tested: u64,
    pub fermat_passed: u64,
    pub fibonacci_passed: u64,
    pub primes: u64,
    /// The composite that passed both conditions, if one turned up.
    pub counterexample: Option<u64>,
    pub fermat_secs: f64,
    pub fibonacci_secs: f64,
    pub sieve_secs: f64,
    pub total_secs: f64,
}

impl SearchReport {
    fn new(start: u64, end: u64, method: SearchMethod) -> SearchReport {
        SearchReport {
            start,
            end,
            method: method.name().to_string(),
            tested: 0,
            fermat_passed: 0,
            fibonacci_passed: 0,
            primes: 0,
            counterexample: None,
            fermat_secs: 0.0,
            fibonacci_secs: 0.0,
            sieve_secs: 0.0,
            total_secs: 0.0,
        }
    }
}

/// Fermat condition: 2^(p−1) ≡ 1 (mod p).
pub fn fermat_condition(p: u64) -> Result<bool> {
    if p == 0 {
        bail!("candidate must be >= 1, got 0");
    }
    let modulus = Integer::from(p);
    Ok(pow2::gmp(p - 1, &modulus)? == 1u32)
}

/// Fibonacci condition: F(p+1) ≡ 0 (mod p).
pub fn fibonacci_condition(p: u64) -> Result<bool> {
    let n = p
        .checked_add(1)
        .with_context(|| format!("candidate {} leaves no room for F(p+1)", p))?;
    let modulus = Integer::from(p);
    Ok(fib::fast_doubling(n, &modulus)? == 0u32)
}

/// Search [start, end] for a composite passing both conditions.
///
/// Stops at the first counterexample; the report then covers the blocks
/// evaluated up to and including the one that found it.
pub fn run(
    start: u64,
    end: u64,
    method: SearchMethod,
    block: u64,
    progress: &Arc<Progress>,
) -> Result<SearchReport> {
    if start < 1 {
        bail!("search start must be >= 1, got {}", start);
    }
    if end < start {
        bail!("search end {} is below start {}", end, start);
    }
    if end == u64::MAX {
        bail!("search end must leave room for F(end+1)");
    }
    if block < 1 {
        bail!("block size must be >= 1, got {}", block);
    }

    info!(
        start,
        end,
        method = method.name(),
        block,
        "starting counterexample search"
    );

    let mut report = SearchReport::new(start, end, method);
    let t_total = Instant::now();
    let mut lo = start;
    loop {
        let hi = lo.saturating_add(block - 1).min(end);
        {
            let mut current = progress.current.lock().unwrap();
            *current = format!("p=[{}..{}]", lo, hi);
        }
        let found = run_block(lo, hi, method, &mut report)?;
        progress.tested.fetch_add(hi - lo + 1, Ordering::Relaxed);
        if let Some(p) = found {
            progress.found.fetch_add(1, Ordering::Relaxed);
            report.counterexample = Some(p);
            break;
        }
        if hi == end {
            break;
        }
        lo = hi + 1;
    }
    report.total_secs = t_total.elapsed().as_secs_f64();

    info!(
        tested = report.tested,
        fermat_passed = report.fermat_passed,
        fibonacci_passed = report.fibonacci_passed,
        primes = report.primes,
        total_secs = format_args!("{:.2}", report.total_secs),
        "search finished"
    );
    Ok(report)
}

/// Evaluate one block, fold its counts into the report, and return the
/// smallest counterexample in it, if any.
fn run_block(
    lo: u64,
    hi: u64,
    method: SearchMethod,
    report: &mut SearchReport,
) -> Result<Option<u64>> {
    let candidates: Vec<u64> = (lo..=hi).collect();

    let t = Instant::now();
    let fermat: Vec<bool> = candidates
        .par_iter()
        .map(|&p| fermat_condition(p))
        .collect::<Result<_>>()?;
    report.fermat_secs += t.elapsed().as_secs_f64();

    let t = Instant::now();
    let fibonacci: Vec<bool> = match method {
        SearchMethod::Direct => candidates
            .par_iter()
            .map(|&p| fibonacci_condition(p))
            .collect::<Result<_>>()?,
        SearchMethod::Staged => candidates
            .par_iter()
            .zip(fermat.par_iter())
            .map(|(&p, &survived)| if survived { fibonacci_condition(p) } else { Ok(false) })
            .collect::<Result<_>>()?,
    };
    report.fibonacci_secs += t.elapsed().as_secs_f64();

    let t = Instant::now();
    let prime = sieve::sieve_range(lo, hi)?;
    report.sieve_secs += t.elapsed().as_secs_f64();

    report.tested += candidates.len() as u64;
    report.fermat_passed += fermat.iter().filter(|&&b| b).count() as u64;
    report.fibonacci_passed += fibonacci.iter().filter(|&&b| b).count() as u64;
    report.primes += prime.iter().filter(|&&b| b).count() as u64;

    info!(
        lo,
        hi,
        fermat_passed = fermat.iter().filter(|&&b| b).count(),
        "block complete"
    );

    for (i, &p) in candidates.iter().enumerate() {
        if fermat[i] && fibonacci[i] && !prime[i] {
            return Ok(Some(p));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Condition Checks ────────────────────────────────────────────

    /// p = 4: 2^3 mod 4 = 0, so even the cheapest condition rejects it.
    #[test]
    fn four_fails_fermat() {
        assert!(!fermat_condition(4).unwrap());
    }

    /// Odd primes satisfy the Fermat condition; p = 1 and p = 2 do not
    /// (2^0 mod 1 = 0 and 2^1 mod 2 = 0).
    #[test]
    fn fermat_condition_known_values() {
        for p in [3u64, 5, 7, 97, 9973] {
            assert!(fermat_condition(p).unwrap(), "p={}", p);
        }
        for p in [1u64, 2, 4, 6, 9, 15] {
            assert!(!fermat_condition(p).unwrap(), "p={}", p);
        }
    }

    /// 341 = 11·31 is the smallest base-2 Fermat pseudoprime (OEIS
    /// A001567): it survives the Fermat stage and must be killed by the
    /// Fibonacci stage, not the sieve.
    #[test]
    fn pseudoprime_341_passes_fermat_but_not_fibonacci() {
        assert!(fermat_condition(341).unwrap());
        assert!(!fibonacci_condition(341).unwrap());
    }

    /// Fibonacci condition known values: p ≡ ±2 (mod 5) primes divide
    /// F(p+1); p ≡ ±1 (mod 5) primes divide F(p−1) instead and fail here.
    #[test]
    fn fibonacci_condition_known_values() {
        for p in [2u64, 3, 7, 13, 17, 23] {
            assert!(fibonacci_condition(p).unwrap(), "p={}", p);
        }
        for p in [5u64, 11, 19, 29, 31] {
            assert!(!fibonacci_condition(p).unwrap(), "p={}", p);
        }
    }

    /// The condition domain ends where the arithmetic would wrap: p = 0 has
    /// no exponent p−1, p = u64::MAX no index p+1.
    #[test]
    fn condition_domain_edges_are_rejected() {
        assert!(fermat_condition(0).is_err());
        assert!(fibonacci_condition(u64::MAX).is_err());
    }

    // ── Full Runs ───────────────────────────────────────────────────

    /// [1, 1000] is clean, and the stage counts are pinned: 167 odd primes
    /// pass Fermat plus the pseudoprimes 341, 561 and 645, giving 170.
    #[test]
    fn first_thousand_is_clean_with_exact_counts() {
        let progress = Progress::new();
        let report = run(1, 1000, SearchMethod::Staged, 250, &progress).unwrap();
        assert_eq!(report.counterexample, None);
        assert_eq!(report.tested, 1000);
        assert_eq!(report.primes, 168);
        assert_eq!(report.fermat_passed, 170);
        assert!(report.fibonacci_passed < report.fermat_passed);
    }

    /// Direct and staged must agree on the verdict and on every count the
    /// staging cannot change.
    #[test]
    fn methods_agree_on_verdict() {
        let progress = Progress::new();
        let direct = run(1, 400, SearchMethod::Direct, 100, &progress).unwrap();
        let staged = run(1, 400, SearchMethod::Staged, 100, &progress).unwrap();
        assert_eq!(direct.counterexample, staged.counterexample);
        assert_eq!(direct.fermat_passed, staged.fermat_passed);
        assert_eq!(direct.primes, staged.primes);
        // Staging suppresses Fibonacci passes among Fermat failures (p = 2
        // being the smallest), so direct counts at least as many.
        assert!(staged.fibonacci_passed <= direct.fibonacci_passed);
    }

    /// Block size is an implementation knob: carving the same range
    /// differently must not change any count.
    #[test]
    fn block_size_does_not_change_counts() {
        let progress = Progress::new();
        let small = run(1, 600, SearchMethod::Staged, 7, &progress).unwrap();
        let large = run(1, 600, SearchMethod::Staged, 600, &progress).unwrap();
        assert_eq!(small.tested, large.tested);
        assert_eq!(small.fermat_passed, large.fermat_passed);
        assert_eq!(small.fibonacci_passed, large.fibonacci_passed);
        assert_eq!(small.primes, large.primes);
        assert_eq!(small.counterexample, large.counterexample);
    }

    #[test]
    fn single_candidate_range() {
        let progress = Progress::new();
        let report = run(97, 97, SearchMethod::Staged, 10, &progress).unwrap();
        assert_eq!(report.tested, 1);
        assert_eq!(report.primes, 1);
        assert_eq!(report.counterexample, None);
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        let progress = Progress::new();
        assert!(run(0, 10, SearchMethod::Staged, 10, &progress).is_err());
        assert!(run(20, 10, SearchMethod::Staged, 10, &progress).is_err());
        assert!(run(1, 10, SearchMethod::Staged, 0, &progress).is_err());
    }

    /// Progress counters reflect the candidates pushed through the blocks.
    #[test]
    fn progress_is_updated() {
        let progress = Progress::new();
        run(1, 500, SearchMethod::Staged, 100, &progress).unwrap();
        assert_eq!(progress.tested.load(Ordering::Relaxed), 500);
        assert_eq!(progress.found.load(Ordering::Relaxed), 0);
    }
}
