//! # Selftest — Cross-Variant Verification Harness
//!
//! Sweeps every strategy of every engine against its definitional reference
//! over a dense range before a search is allowed to start. The sweep uses
//! the shapes the search will actually evaluate: exponent p−1 and index p+1
//! for each p in [1, limit), under both the per-candidate modulus and a
//! fixed large one.
//!
//! A disagreement is a hard error naming the strategy and the first input it
//! got wrong; the search driver refuses to start in that case.

use std::time::Instant;

use anyhow::{bail, Result};
use rug::Integer;
use tracing::info;

use crate::fib::FibStrategy;
use crate::pow2::Pow2Strategy;
use crate::primality::PrimalityStrategy;
use crate::sieve::BatchStrategy;

/// Default sweep bound, matching the search driver's pre-flight check.
pub const DEFAULT_LIMIT: u64 = 1000;

/// Fixed large modulus exercised alongside the per-candidate one.
const LARGE_MODULUS: u64 = 1_000_000;

/// Sweep every engine over [1, limit); error out on the first disagreement.
pub fn run(limit: u64) -> Result<()> {
    if limit < 2 {
        bail!("self-test limit must be >= 2, got {}", limit);
    }
    check_pow2(limit)?;
    check_fib(limit)?;
    check_primality(limit)?;
    check_batch(limit)?;
    Ok(())
}

/// All pow2 strategies against the direct reference, at the Fermat-condition
/// exponent p−1 for every p in the sweep.
fn check_pow2(limit: u64) -> Result<()> {
    let t = Instant::now();
    let large = Integer::from(LARGE_MODULUS);
    for p in 1..limit {
        let n = p - 1;
        let modulus = Integer::from(p);
        for x in [&modulus, &large] {
            let expected = crate::pow2::direct(n, x)?;
            for strategy in Pow2Strategy::ALL {
                let got = strategy.compute(n, x)?;
                if got != expected {
                    bail!(
                        "pow2 strategy {} disagrees at n={}, x={}: got {}, expected {}",
                        strategy.name(),
                        n,
                        x,
                        got,
                        expected
                    );
                }
            }
        }
    }
    info!(
        engine = "pow2",
        sweep = limit - 1,
        elapsed_secs = format_args!("{:.2}", t.elapsed().as_secs_f64()),
        "all strategies agree"
    );
    Ok(())
}

/// All fib strategies against the exact-recurrence reference, at the
/// Fibonacci-condition index p+1.
fn check_fib(limit: u64) -> Result<()> {
    let t = Instant::now();
    let large = Integer::from(LARGE_MODULUS);
    for p in 1..limit {
        let n = p + 1;
        let modulus = Integer::from(p);
        for x in [&modulus, &large] {
            let expected = crate::fib::naive_full(n, x)?;
            for strategy in FibStrategy::ALL {
                let got = strategy.compute(n, x)?;
                if got != expected {
                    bail!(
                        "fib strategy {} disagrees at n={}, x={}: got {}, expected {}",
                        strategy.name(),
                        n,
                        x,
                        got,
                        expected
                    );
                }
            }
        }
    }
    info!(
        engine = "fib",
        sweep = limit - 1,
        elapsed_secs = format_args!("{:.2}", t.elapsed().as_secs_f64()),
        "all strategies agree"
    );
    Ok(())
}

fn check_primality(limit: u64) -> Result<()> {
    let t = Instant::now();
    for k in 1..limit {
        let expected = crate::primality::is_prime_trial(k)?;
        for strategy in PrimalityStrategy::ALL {
            let got = strategy.test(k)?;
            if got != expected {
                bail!(
                    "primality strategy {} disagrees at k={}: got {}, expected {}",
                    strategy.name(),
                    k,
                    got,
                    expected
                );
            }
        }
    }
    info!(
        engine = "primality",
        sweep = limit - 1,
        elapsed_secs = format_args!("{:.2}", t.elapsed().as_secs_f64()),
        "all strategies agree"
    );
    Ok(())
}

/// Both batch strategies over the whole window at once, compared flag by
/// flag so the error can name the exact candidate.
fn check_batch(limit: u64) -> Result<()> {
    let t = Instant::now();
    let reference = crate::sieve::per_candidate(1, limit - 1)?;
    for strategy in BatchStrategy::ALL {
        let got = strategy.compute(1, limit - 1)?;
        for (i, (g, e)) in got.iter().zip(reference.iter()).enumerate() {
            if g != e {
                bail!(
                    "batch strategy {} disagrees at k={}: got {}, expected {}",
                    strategy.name(),
                    1 + i as u64,
                    g,
                    e
                );
            }
        }
    }
    info!(
        engine = "batch",
        sweep = limit - 1,
        elapsed_secs = format_args!("{:.2}", t.elapsed().as_secs_f64()),
        "all strategies agree"
    );
    Ok(())
}
