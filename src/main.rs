//! Toy Bank CLI
//!
//! Command-line interface for driving the in-memory ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- replay script.csv > balances.csv
//! cargo run -- --lock-strategy per-account replay script.csv > balances.csv
//! cargo run -- simulate
//! cargo run -- --lock-strategy per-account simulate --accounts 8 --transfers 1000000 --workers 16
//! ```
//!
//! `replay` applies the commands in the input CSV in order and writes the
//! final balance of every opened account to stdout. `simulate` hammers the
//! ledger with random concurrent transfers and checks that the total balance
//! is unchanged afterwards.
//!
//! Logs go to stderr; set `RUST_LOG` to adjust verbosity.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, unwritable output, simulation did not conserve money, etc.)

use std::process;
use toy_bank_ledger::cli::{self, Command};
use toy_bank_ledger::run_simulation;
use toy_bank_ledger::{logging, run_replay, Bank};
use tracing::error;

fn main() {
    logging::init();

    let args = cli::parse_args();
    let bank = Bank::new(args.lock_strategy);

    match &args.command {
        Command::Replay { input_file } => {
            let mut output = std::io::stdout();
            if let Err(e) = run_replay(bank, input_file, &mut output) {
                error!("Replay failed: {}", e);
                process::exit(1);
            }
        }
        Command::Simulate { .. } => {
            let config = args.to_simulation_config().unwrap_or_default();
            match run_simulation(&bank, &config) {
                Ok(report) => {
                    println!(
                        "strategy={} completed={} rejected={} expected_total={} final_total={} elapsed_ms={}",
                        bank.strategy(),
                        report.completed,
                        report.rejected,
                        report.expected_total,
                        report.final_total,
                        report.elapsed.as_millis()
                    );
                    if !report.is_conserved() {
                        error!(
                            expected = %report.expected_total,
                            actual = %report.final_total,
                            "Total balance was not conserved"
                        );
                        process::exit(1);
                    }
                }
                Err(e) => {
                    error!("Simulation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
