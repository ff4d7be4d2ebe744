//! Error types for the toy bank ledger
//!
//! This module defines the errors returned by the ledger core and by the
//! command-line driver that calls into it.
//!
//! # Error Categories
//!
//! - **Ledger Errors**: unknown user or account, insufficient funds, invalid amounts
//! - **Command Errors**: file I/O, CSV parsing, input validation, plus any ledger error

use super::account::AccountId;
use super::user::UserId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error type for ledger operations
///
/// Every variant is an expected, recoverable outcome of a single operation.
/// The ledger never retries; the state of every account is unchanged when an
/// operation returns one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// No user is registered under the given id
    #[error("No user found with id of {user}")]
    UserNotFound {
        /// The id that was looked up
        user: UserId,
    },

    /// No account exists with the given IBAN
    #[error("No account found with iban {account}")]
    AccountNotFound {
        /// The IBAN that was looked up
        account: AccountId,
    },

    /// Withdrawal would take the balance below zero
    #[error("Not enough amount on account with iban {account}: available {available}, requested {requested}")]
    InsufficientFunds {
        /// IBAN of the debited account
        account: AccountId,
        /// Balance at the time of the attempt
        available: Decimal,
        /// Requested withdrawal amount
        requested: Decimal,
    },

    /// Amount is negative
    #[error("Amount can not be a negative value: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Balance arithmetic would overflow the decimal range
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// IBAN of the affected account
        account: AccountId,
    },
}

impl LedgerError {
    /// Create a UserNotFound error
    pub fn user_not_found(user: UserId) -> Self {
        LedgerError::UserNotFound { user }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: &str) -> Self {
        LedgerError::AccountNotFound {
            account: account.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: &str, available: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account: account.to_string(),
            available,
            requested,
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account: account.to_string(),
        }
    }
}

/// Error type for the command-line driver
///
/// Wraps ledger failures together with the errors that only exist at the
/// boundary: reading scripts, parsing rows and validating raw input.
#[derive(Debug, Error)]
pub enum CommandError {
    /// I/O error while reading input or writing output
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// A script row could not be parsed
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Input failed boundary validation (bad IBAN, negative or missing amount)
    #[error("Invalid input{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    InvalidInput {
        /// Script line of the rejected row (if known)
        line: Option<u64>,
        /// Description of the validation failure
        message: String,
    },

    /// The ledger rejected the operation
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl From<std::io::Error> for CommandError {
    fn from(error: std::io::Error) -> Self {
        CommandError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for CommandError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        CommandError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

impl CommandError {
    /// Create an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CommandError::InvalidInput {
            line: None,
            message: message.into(),
        }
    }

    /// Attach a script line number to a row-level error
    ///
    /// Only `Parse` and `InvalidInput` carry a line; a line that is already
    /// set is kept. Other variants are returned unchanged.
    pub fn at_line(self, line_num: u64) -> Self {
        match self {
            CommandError::Parse { line, message } => CommandError::Parse {
                line: line.or(Some(line_num)),
                message,
            },
            CommandError::InvalidInput { line, message } => CommandError::InvalidInput {
                line: line.or(Some(line_num)),
                message,
            },
            other => other,
        }
    }
}
