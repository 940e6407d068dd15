//! # Main — CLI Entry Point
//!
//! Routes CLI subcommands to the search, self-test and benchmark drivers.
//! Handles shared concerns: tracing setup, the Rayon thread pool, and exit
//! codes.
//!
//! ## Subcommands
//!
//! - `search` — hunt a range for a composite passing both conjecture
//!   conditions. Exit code 0 for a clean range, 2 for a counterexample,
//!   1 for any error.
//! - `selftest` — cross-check every algorithm variant against its
//!   reference and exit.
//! - `bench` — time every variant over exponentially growing ranges.
//!
//! ## Global Options
//!
//! - `--threads`: Rayon thread pool size (0 = all cores).
//! - `LOG_FORMAT=json`: structured JSON logs instead of human-readable.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "pswhunt",
    about = "Hunt for counterexamples to the Selfridge/Pomerance/Wagstaff primality conjecture"
)]
struct Cli {
    /// Number of rayon worker threads (defaults to all logical cores)
    #[arg(long)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a range for composites passing both conjecture conditions
    Search {
        /// First candidate, inclusive (must be >= 1)
        #[arg(long)]
        start: u64,
        /// Last candidate, inclusive
        #[arg(long)]
        end: u64,
        /// Condition order: "staged" tests Fibonacci only for Fermat
        /// survivors, "direct" tests both for every candidate
        #[arg(long, default_value = "staged")]
        method: String,
        /// Candidates per block (bounds sieve memory and progress granularity)
        #[arg(long, default_value_t = pswhunt::search::DEFAULT_BLOCK)]
        block: u64,
        /// Skip the cross-variant self-test that runs before the search
        #[arg(long)]
        skip_selftest: bool,
        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Cross-check every algorithm variant against its reference
    Selftest {
        /// Sweep bound, exclusive (every engine is checked on [1, limit))
        #[arg(long, default_value_t = pswhunt::selftest::DEFAULT_LIMIT)]
        limit: u64,
    },
    /// Time every algorithm variant over exponentially growing ranges
    Bench {
        /// Largest power of ten to attempt (sweeps cover 2..10^power)
        #[arg(long, default_value_t = 10)]
        max_power: u32,
        /// Stop escalating a variant once one sweep exceeds this many seconds
        #[arg(long, default_value_t = 0.1)]
        time_limit: f64,
        /// Print the timing rows as JSON instead of the live table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt().json().with_target(false).init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    cli::configure_rayon(cli.threads);

    match &cli.command {
        Commands::Search {
            start,
            end,
            method,
            block,
            skip_selftest,
            json,
        } => {
            let found = cli::run_search(*start, *end, method, *block, *skip_selftest, *json)?;
            if found.is_some() {
                // A counterexample is a finding, not a failure; scripts get
                // a dedicated exit code to tell the two apart.
                std::process::exit(2);
            }
            Ok(())
        }
        Commands::Selftest { limit } => cli::run_selftest(*limit),
        Commands::Bench {
            max_power,
            time_limit,
            json,
        } => cli::run_bench(*max_power, *time_limit, *json),
    }
}
