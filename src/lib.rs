//! Toy Bank Ledger Library
//! # Overview
//!
//! This library provides an in-memory bank ledger that is safe to share between threads,
//! with two interchangeable locking strategies
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, User, IBAN generation, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::account_store`] / [`core::user_store`] - Concurrent registries
//!   - [`core::account_service`] - Ledger guarded by one service-wide write lock
//!   - [`core::per_account`] - Ledger that locks only the accounts it touches
//!   - [`core::user_service`] - User registration and lookup
//! - [`bank`] - Wires the stores, the user service and the chosen ledger together
//! - [`io`] - CSV script parsing and balance output
//! - [`replay`] - Applies a CSV script to a bank
//! - [`simulation`] - Random concurrent transfers with a conservation check
//!
//! # Ledger Operations
//!
//! - **create_account**: Open a zero-balance account for an existing user
//! - **check_funds**: Read the current balance of an account
//! - **deposit**: Credit funds to an account
//! - **withdraw**: Debit funds from an account (requires sufficient balance)
//! - **transfer**: Move funds between two accounts atomically
//!
//! # Guarantees
//!
//! Under any interleaving of concurrent callers:
//! - no balance ever becomes negative
//! - transfers never create or destroy money
//! - every successful `create_account` yields a distinct IBAN

// Module declarations
pub mod bank;
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod replay;
pub mod simulation;
pub mod types;

pub use bank::Bank;
pub use core::{AccountService, AccountStore, Ledger, PerAccountLockService, UserService, UserStore};
pub use io::write_balances_csv;
pub use replay::run_replay;
pub use simulation::{run_simulation, SimulationConfig, SimulationReport};
pub use types::{
    Account, AccountId, AccountSnapshot, BankCommand, CommandError, LedgerError, NewUser, UserId,
    UserProfile,
};
