//! # Timing — Variant Benchmark Harness
//!
//! Times every strategy of every engine over exponentially growing ranges:
//! each strategy sweeps 2..=10^power for power = 1, 2, ..., escalating until
//! one sweep exceeds the per-sweep time limit or the power cap. The sweeps
//! evaluate the real condition shapes, so each row also carries a hit count
//! (condition passes, or primes for the primality engines) that doubles as a
//! correctness observable: fixed range, fixed count, whatever the strategy.
//!
//! Sub-threshold rows at low powers are computed but not printed live;
//! every row still lands in the returned set, which the `bench` subcommand
//! can emit as JSON. `criterion` benches cover per-call latencies; this
//! harness covers range scaling.

use std::time::Instant;

use anyhow::Result;
use rug::Integer;
use serde::Serialize;
use tracing::info;

use crate::fib::FibStrategy;
use crate::pow2::Pow2Strategy;
use crate::primality::PrimalityStrategy;
use crate::sieve::BatchStrategy;

/// Escalation knobs, shared by all engines.
#[derive(Debug, Clone)]
pub struct TimingOptions {
    /// Largest power of ten a strategy may attempt.
    pub max_power: u32,
    /// A sweep slower than this stops the strategy's escalation.
    pub time_limit: f64,
    /// Print rows as they finish.
    pub print_live: bool,
    /// Live printing skips rows faster than this threshold.
    pub report_threshold: f64,
    /// Powers at or above this always print, threshold or not.
    pub report_min_power: u32,
}

impl Default for TimingOptions {
    fn default() -> TimingOptions {
        TimingOptions {
            max_power: 10,
            time_limit: 0.1,
            print_live: true,
            report_threshold: 0.1,
            report_min_power: 4,
        }
    }
}

/// One finished sweep: a strategy, a range, its wall time and hit count.
#[derive(Debug, Clone, Serialize)]
pub struct TimingRow {
    pub engine: String,
    pub strategy: String,
    pub power: u32,
    pub hits: u64,
    pub secs: f64,
}

impl TimingRow {
    fn render(&self) -> String {
        format!(
            "  {:<10} {:<18} 2..10^{:<2} {:>9.3}s  {:>8} hits",
            self.engine, self.strategy, self.power, self.secs, self.hits
        )
    }
}

/// Run the full escalation for all four engines.
pub fn run(opts: &TimingOptions) -> Result<Vec<TimingRow>> {
    let mut rows = Vec::new();
    time_fermat(opts, &mut rows)?;
    time_fibonacci(opts, &mut rows)?;
    time_primality(opts, &mut rows)?;
    time_batch(opts, &mut rows)?;
    info!(rows = rows.len(), "benchmark harness finished");
    Ok(rows)
}

fn push_row(opts: &TimingOptions, rows: &mut Vec<TimingRow>, row: TimingRow) {
    if opts.print_live && (row.secs > opts.report_threshold || row.power >= opts.report_min_power) {
        println!("{}", row.render());
    }
    rows.push(row);
}

/// Fermat-condition sweeps: count p in 2..=10^power with 2^(p−1) ≡ 1.
fn time_fermat(opts: &TimingOptions, rows: &mut Vec<TimingRow>) -> Result<()> {
    for strategy in Pow2Strategy::ALL {
        for power in 1..=opts.max_power {
            let end = 10u64.pow(power);
            let t = Instant::now();
            let mut hits = 0u64;
            for p in 2..=end {
                let x = Integer::from(p);
                if strategy.compute(p - 1, &x)? == 1u32 {
                    hits += 1;
                }
            }
            let secs = t.elapsed().as_secs_f64();
            push_row(
                opts,
                rows,
                TimingRow {
                    engine: "fermat".to_string(),
                    strategy: strategy.name().to_string(),
                    power,
                    hits,
                    secs,
                },
            );
            if secs > opts.time_limit {
                break;
            }
        }
    }
    Ok(())
}

/// Fibonacci-condition sweeps: count p in 2..=10^power with F(p+1) ≡ 0.
fn time_fibonacci(opts: &TimingOptions, rows: &mut Vec<TimingRow>) -> Result<()> {
    for strategy in FibStrategy::ALL {
        for power in 1..=opts.max_power {
            let end = 10u64.pow(power);
            let t = Instant::now();
            let mut hits = 0u64;
            for p in 2..=end {
                let x = Integer::from(p);
                if strategy.compute(p + 1, &x)? == 0u32 {
                    hits += 1;
                }
            }
            let secs = t.elapsed().as_secs_f64();
            push_row(
                opts,
                rows,
                TimingRow {
                    engine: "fibonacci".to_string(),
                    strategy: strategy.name().to_string(),
                    power,
                    hits,
                    secs,
                },
            );
            if secs > opts.time_limit {
                break;
            }
        }
    }
    Ok(())
}

/// Primality sweeps: count primes in 2..=10^power, one verdict at a time.
fn time_primality(opts: &TimingOptions, rows: &mut Vec<TimingRow>) -> Result<()> {
    for strategy in PrimalityStrategy::ALL {
        for power in 1..=opts.max_power {
            let end = 10u64.pow(power);
            let t = Instant::now();
            let mut hits = 0u64;
            for k in 2..=end {
                if strategy.test(k)? {
                    hits += 1;
                }
            }
            let secs = t.elapsed().as_secs_f64();
            push_row(
                opts,
                rows,
                TimingRow {
                    engine: "primality".to_string(),
                    strategy: strategy.name().to_string(),
                    power,
                    hits,
                    secs,
                },
            );
            if secs > opts.time_limit {
                break;
            }
        }
    }
    Ok(())
}

/// Batch sweeps: classify 2..=10^power in one call per sweep.
fn time_batch(opts: &TimingOptions, rows: &mut Vec<TimingRow>) -> Result<()> {
    for strategy in BatchStrategy::ALL {
        for power in 1..=opts.max_power {
            let end = 10u64.pow(power);
            let t = Instant::now();
            let flags = strategy.compute(2, end)?;
            let hits = flags.iter().filter(|&&b| b).count() as u64;
            let secs = t.elapsed().as_secs_f64();
            push_row(
                opts,
                rows,
                TimingRow {
                    engine: "batch".to_string(),
                    strategy: strategy.name().to_string(),
                    power,
                    hits,
                    secs,
                },
            );
            if secs > opts.time_limit {
                break;
            }
        }
    }
    Ok(())
}
