//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim. Contains the
//! execution logic for each subcommand: the counterexample search with its
//! pre-flight self-test and progress reporter, the standalone self-test, the
//! variant benchmark harness, and rayon configuration.

use std::time::Duration;

use anyhow::{bail, Result};
use pswhunt::progress::Progress;
use pswhunt::search::{self, SearchMethod, SearchReport};
use pswhunt::selftest;
use pswhunt::timing::{self, TimingOptions};
use tracing::{info, warn};

/// Status reporter wake interval during a search.
const REPORT_INTERVAL: Duration = Duration::from_secs(10);

// ── Search ──────────────────────────────────────────────────────

/// Run the counterexample search over [start, end].
///
/// Returns the counterexample if one was found; the caller turns that into
/// the distinct exit code.
pub fn run_search(
    start: u64,
    end: u64,
    method: &str,
    block: u64,
    skip_selftest: bool,
    json: bool,
) -> Result<Option<u64>> {
    let method = parse_method(method)?;

    if !skip_selftest {
        info!(limit = selftest::DEFAULT_LIMIT, "pre-flight self-test");
        selftest::run(selftest::DEFAULT_LIMIT)?;
    }

    let progress = Progress::new();
    let reporter = progress.start_reporter(REPORT_INTERVAL);

    let report = search::run(start, end, method, block, &progress)?;

    progress.stop();
    let _ = reporter.join();
    progress.print_status();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    match report.counterexample {
        Some(p) => {
            warn!(p, "counterexample found: composite passes both conjecture conditions");
            Ok(Some(p))
        }
        None => {
            info!("range clean, the conjecture survives");
            Ok(None)
        }
    }
}

fn parse_method(name: &str) -> Result<SearchMethod> {
    match name {
        "direct" => Ok(SearchMethod::Direct),
        "staged" => Ok(SearchMethod::Staged),
        other => bail!("unknown method '{}' (expected 'direct' or 'staged')", other),
    }
}

fn print_report(report: &SearchReport) {
    let verdict = match report.counterexample {
        Some(p) => p.to_string(),
        None => "none".to_string(),
    };
    println!("search report");
    println!("  {:<18} {} .. {}", "range", report.start, report.end);
    println!("  {:<18} {}", "method", report.method);
    println!("  {:<18} {}", "tested", report.tested);
    println!("  {:<18} {}", "fermat passed", report.fermat_passed);
    println!("  {:<18} {}", "fibonacci passed", report.fibonacci_passed);
    println!("  {:<18} {}", "primes", report.primes);
    println!("  {:<18} {}", "counterexample", verdict);
    println!("  {:<18} {:.2}s", "fermat stage", report.fermat_secs);
    println!("  {:<18} {:.2}s", "fibonacci stage", report.fibonacci_secs);
    println!("  {:<18} {:.2}s", "sieve stage", report.sieve_secs);
    println!("  {:<18} {:.2}s", "total", report.total_secs);
}

// ── Selftest ────────────────────────────────────────────────────

pub fn run_selftest(limit: u64) -> Result<()> {
    selftest::run(limit)?;
    info!(limit, "self-test passed: every strategy agrees with its reference");
    Ok(())
}

// ── Bench ───────────────────────────────────────────────────────

pub fn run_bench(max_power: u32, time_limit: f64, json: bool) -> Result<()> {
    let opts = TimingOptions {
        max_power,
        time_limit,
        print_live: !json,
        ..TimingOptions::default()
    };
    if !json {
        println!(
            "timing sweeps: 2..10^{{1..{}}}, escalation stops past {:.2}s",
            opts.max_power, opts.time_limit
        );
    }
    let rows = timing::run(&opts)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    }
    Ok(())
}

// ── Rayon Configuration ─────────────────────────────────────────

/// Configure the global rayon pool size. 0 or absent keeps rayon's default
/// (all logical cores).
pub fn configure_rayon(threads: Option<usize>) {
    let num_threads = threads.unwrap_or(0);
    if num_threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            warn!(error = %e, "Could not configure rayon thread pool");
        }
    }
}
