//! Concurrent transfer simulation
//!
//! This module drives a ledger with random unit transfers from many threads
//! at once and checks afterwards that no money was created or destroyed.
//!
//! # Architecture
//!
//! ```text
//! run_simulation
//!     ├── SimulationConfig (accounts, initial_balance, transfers, workers)
//!     ├── Bank (seeded with one user and one funded account per slot)
//!     └── tokio multi-threaded runtime
//!         └── `workers` blocking tasks, each issuing its share of transfers
//! ```
//!
//! Each transfer moves one unit between two distinct, randomly chosen
//! accounts. Transfers rejected for insufficient funds are counted, not
//! retried.

use crate::bank::Bank;
use crate::core::Ledger;
use crate::types::{AccountId, CommandError, LedgerError, NewUser};
use rand::Rng;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Configuration for a simulation run
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Number of accounts transfers are drawn from
    pub accounts: usize,
    /// Starting balance of every account
    pub initial_balance: u64,
    /// Total number of unit transfers across all workers
    pub transfers: usize,
    /// Number of concurrent workers
    pub workers: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            accounts: 4,
            initial_balance: 1_000_000,
            transfers: 100_000,
            workers: num_cpus::get(),
        }
    }
}

impl SimulationConfig {
    /// Create a new SimulationConfig with custom values
    ///
    /// Fewer than two accounts or zero workers cannot run a transfer workload;
    /// such values are replaced by the defaults with a warning.
    pub fn new(accounts: usize, initial_balance: u64, transfers: usize, workers: usize) -> Self {
        let default = Self::default();

        let accounts = if accounts < 2 {
            warn!(
                accounts,
                default = default.accounts,
                "Invalid account count, using default"
            );
            default.accounts
        } else {
            accounts
        };

        let workers = if workers == 0 {
            warn!(
                workers,
                default = default.workers,
                "Invalid worker count, using default"
            );
            default.workers
        } else {
            workers
        };

        Self {
            accounts,
            initial_balance,
            transfers,
            workers,
        }
    }

    /// Sum of all balances before and after the run
    pub fn expected_total(&self) -> Decimal {
        Decimal::from(self.initial_balance) * Decimal::from(self.accounts as u64)
    }
}

/// Outcome of a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub expected_total: Decimal,
    pub final_total: Decimal,
    /// Transfers applied
    pub completed: usize,
    /// Transfers rejected by the ledger
    pub rejected: usize,
    pub elapsed: Duration,
}

impl SimulationReport {
    /// Whether the run conserved the total balance
    pub fn is_conserved(&self) -> bool {
        self.expected_total == self.final_total
    }
}

/// Open `config.accounts` accounts, each owned by its own user and funded
/// with `config.initial_balance`
pub fn seed_accounts(bank: &Bank, config: &SimulationConfig) -> Result<Vec<AccountId>, LedgerError> {
    let initial = Decimal::from(config.initial_balance);
    (0..config.accounts)
        .map(|slot| {
            let user = bank
                .users()
                .add_user(NewUser::new("Simulation", format!("Account {}", slot), ""));
            let iban = bank.ledger().create_account(user)?;
            bank.ledger().deposit(&iban, initial)?;
            Ok(iban)
        })
        .collect()
}

/// Split `total` transfers into `workers` shares that differ by at most one
fn worker_shares(total: usize, workers: usize) -> Vec<usize> {
    let base = total / workers;
    let remainder = total % workers;
    (0..workers)
        .map(|worker| base + usize::from(worker < remainder))
        .collect()
}

/// Issue `count` random unit transfers; returns (completed, rejected)
fn run_worker(ledger: &dyn Ledger, ibans: &[AccountId], count: usize) -> (usize, usize) {
    if ibans.len() < 2 {
        return (0, count);
    }

    let mut rng = rand::thread_rng();
    let mut completed = 0;
    let mut rejected = 0;

    for _ in 0..count {
        let sender = rng.gen_range(0..ibans.len());
        let mut receiver = rng.gen_range(0..ibans.len() - 1);
        if receiver >= sender {
            receiver += 1;
        }

        match ledger.transfer(&ibans[sender], &ibans[receiver], Decimal::ONE) {
            Ok(()) => completed += 1,
            Err(_) => rejected += 1,
        }
    }

    (completed, rejected)
}

/// Sum of the balances of the given accounts
fn total_of(ledger: &dyn Ledger, ibans: &[AccountId]) -> Result<Decimal, LedgerError> {
    ibans.iter().map(|iban| ledger.check_funds(iban)).sum()
}

/// Run a simulation against a bank
///
/// Only the accounts seeded for this run take part; accounts already in the
/// bank are neither touched nor counted in the totals.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built or seeding the accounts
/// fails.
pub fn run_simulation(bank: &Bank, config: &SimulationConfig) -> Result<SimulationReport, CommandError> {
    let ibans = Arc::new(seed_accounts(bank, config)?);
    info!(
        accounts = config.accounts,
        transfers = config.transfers,
        workers = config.workers,
        strategy = ?bank.strategy(),
        "starting simulation"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .max_blocking_threads(config.workers)
        .build()?;

    let started = Instant::now();
    let (completed, rejected) = runtime.block_on(async {
        let mut tasks = Vec::with_capacity(config.workers);
        for share in worker_shares(config.transfers, config.workers) {
            let ledger = bank.shared_ledger();
            let ibans = Arc::clone(&ibans);
            tasks.push(tokio::task::spawn_blocking(move || {
                run_worker(ledger.as_ref(), &ibans, share)
            }));
        }

        let mut completed = 0;
        let mut rejected = 0;
        for task in tasks {
            match task.await {
                Ok((done, failed)) => {
                    completed += done;
                    rejected += failed;
                }
                Err(e) => error!("Worker panicked: {:?}", e),
            }
        }
        (completed, rejected)
    });
    let elapsed = started.elapsed();

    let report = SimulationReport {
        expected_total: config.expected_total(),
        final_total: total_of(bank.ledger(), &ibans)?,
        completed,
        rejected,
        elapsed,
    };
    info!(
        completed = report.completed,
        rejected = report.rejected,
        elapsed_ms = report.elapsed.as_millis() as u64,
        expected_total = %report.expected_total,
        final_total = %report.final_total,
        "simulation finished"
    );
    Ok(report)
}
