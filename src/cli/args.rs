use crate::simulation::SimulationConfig;
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// Run an in-memory bank ledger from a script or under concurrent load
#[derive(Parser, Debug)]
#[command(name = "toy-bank")]
#[command(about = "Run an in-memory bank ledger from a script or under concurrent load", long_about = None)]
pub struct CliArgs {
    /// Locking strategy the ledger uses
    #[arg(
        long = "lock-strategy",
        value_name = "STRATEGY",
        default_value = "global",
        global = true,
        help = "Ledger locking: 'global' for one service-wide lock or 'per-account' for ordered per-account locks"
    )]
    pub lock_strategy: LockStrategy,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply a CSV script of bank commands and print final balances
    Replay {
        /// Input CSV file path containing bank commands
        #[arg(value_name = "INPUT", help = "Path to the input CSV script")]
        input_file: PathBuf,
    },

    /// Run random concurrent transfers and check that money is conserved
    Simulate {
        /// Number of accounts taking part in the simulation
        #[arg(long = "accounts", value_name = "COUNT", help = "Number of accounts (default: 4, minimum: 2)")]
        accounts: Option<usize>,

        /// Starting balance of every account
        #[arg(
            long = "initial-balance",
            value_name = "AMOUNT",
            help = "Starting balance of every account (default: 1000000)"
        )]
        initial_balance: Option<u64>,

        /// Number of unit transfers to execute
        #[arg(long = "transfers", value_name = "COUNT", help = "Number of unit transfers (default: 100000)")]
        transfers: Option<usize>,

        /// Number of worker threads
        #[arg(long = "workers", value_name = "COUNT", help = "Number of worker threads (default: CPU cores)")]
        workers: Option<usize>,
    },
}

/// Available ledger locking strategies
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LockStrategy {
    /// One lock serializing every mutating operation
    #[default]
    Global,
    /// Per-account locks, acquired in ascending IBAN order
    PerAccount,
}

impl fmt::Display for LockStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockStrategy::Global => write!(f, "global"),
            LockStrategy::PerAccount => write!(f, "per-account"),
        }
    }
}

impl CliArgs {
    /// Create a SimulationConfig from the `simulate` arguments
    ///
    /// Missing values fall back to defaults; invalid values are replaced by
    /// defaults with a warning. Returns `None` for other subcommands.
    pub fn to_simulation_config(&self) -> Option<SimulationConfig> {
        match &self.command {
            Command::Simulate {
                accounts,
                initial_balance,
                transfers,
                workers,
            } => {
                let default = SimulationConfig::default();
                Some(SimulationConfig::new(
                    accounts.unwrap_or(default.accounts),
                    initial_balance.unwrap_or(default.initial_balance),
                    transfers.unwrap_or(default.transfers),
                    workers.unwrap_or(default.workers),
                ))
            }
            Command::Replay { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program", "replay", "input.csv"], LockStrategy::Global)]
    #[case::explicit_global(&["program", "--lock-strategy", "global", "replay", "input.csv"], LockStrategy::Global)]
    #[case::per_account(&["program", "--lock-strategy", "per-account", "replay", "input.csv"], LockStrategy::PerAccount)]
    #[case::flag_after_subcommand(&["program", "simulate", "--lock-strategy", "per-account"], LockStrategy::PerAccount)]
    fn test_lock_strategy_parsing(#[case] args: &[&str], #[case] expected: LockStrategy) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.lock_strategy, expected);
    }

    #[test]
    fn test_replay_input_file() {
        let parsed = CliArgs::try_parse_from(["program", "replay", "script.csv"]).unwrap();

        match parsed.command {
            Command::Replay { input_file } => assert_eq!(input_file, PathBuf::from("script.csv")),
            other => panic!("Expected replay, got {:?}", other),
        }
        assert!(parsed_config_is_none(&["program", "replay", "script.csv"]));
    }

    fn parsed_config_is_none(args: &[&str]) -> bool {
        CliArgs::try_parse_from(args)
            .unwrap()
            .to_simulation_config()
            .is_none()
    }

    #[rstest]
    #[case::all_defaults(&["program", "simulate"], 4, 1_000_000, 100_000, num_cpus::get())]
    #[case::custom_accounts(&["program", "simulate", "--accounts", "8"], 8, 1_000_000, 100_000, num_cpus::get())]
    #[case::all_custom(
        &["program", "simulate", "--accounts", "3", "--initial-balance", "50", "--transfers", "10", "--workers", "2"],
        3,
        50,
        10,
        2
    )]
    fn test_simulation_config_conversion(
        #[case] args: &[&str],
        #[case] accounts: usize,
        #[case] initial_balance: u64,
        #[case] transfers: usize,
        #[case] workers: usize,
    ) {
        let config = CliArgs::try_parse_from(args)
            .unwrap()
            .to_simulation_config()
            .unwrap();

        assert_eq!(config.accounts, accounts);
        assert_eq!(config.initial_balance, initial_balance);
        assert_eq!(config.transfers, transfers);
        assert_eq!(config.workers, workers);
    }

    #[rstest]
    #[case::zero_workers(&["program", "simulate", "--workers", "0"], "workers", num_cpus::get())]
    #[case::one_account(&["program", "simulate", "--accounts", "1"], "accounts", 4)]
    fn test_simulation_config_invalid_values_fallback(
        #[case] args: &[&str],
        #[case] field: &str,
        #[case] expected_default: usize,
    ) {
        let config = CliArgs::try_parse_from(args)
            .unwrap()
            .to_simulation_config()
            .unwrap();

        match field {
            "workers" => assert_eq!(config.workers, expected_default),
            "accounts" => assert_eq!(config.accounts, expected_default),
            _ => panic!("Unknown field: {}", field),
        }
    }

    #[rstest]
    #[case(LockStrategy::Global, "global")]
    #[case(LockStrategy::PerAccount, "per-account")]
    fn test_lock_strategy_display_matches_flag_value(#[case] strategy: LockStrategy, #[case] value: &str) {
        assert_eq!(strategy.to_string(), value);
        assert_eq!(LockStrategy::from_str(value, false).unwrap(), strategy);
    }

    #[rstest]
    #[case::missing_subcommand(&["program"])]
    #[case::missing_input(&["program", "replay"])]
    #[case::invalid_strategy(&["program", "--lock-strategy", "optimistic", "replay", "input.csv"])]
    #[case::negative_transfers(&["program", "simulate", "--transfers", "-1"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
