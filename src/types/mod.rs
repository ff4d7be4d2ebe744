//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account record and identifier
//! - `command`: Parsed replay-script operations
//! - `user`: User record, registration data and read model
//! - `iban`: Account identifier generation and lexical validation
//! - `error`: Error types for the ledger and the command-line driver

pub mod account;
pub mod command;
pub mod error;
pub mod iban;
pub mod user;

pub use account::{Account, AccountId, AccountSnapshot};
pub use command::BankCommand;
pub use error::{CommandError, LedgerError};
pub use iban::{is_valid_iban, IbanGenerator};
pub use user::{NewUser, User, UserId, UserProfile};
