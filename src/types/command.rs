//! Bank command types for the replay driver
//!
//! A `BankCommand` is one parsed, validated row of a replay script. Account
//! references are still raw strings here: either an alias bound by an earlier
//! `OpenAccount` or a literal IBAN.

use super::user::{NewUser, UserId};
use rust_decimal::Decimal;

/// One operation requested by a replay script
#[derive(Debug, Clone, PartialEq)]
pub enum BankCommand {
    /// Register a new user
    CreateUser(NewUser),

    /// Open an account for `user` and bind it to `alias`
    OpenAccount { user: UserId, alias: String },

    /// Put `amount` into `account`
    Deposit { account: String, amount: Decimal },

    /// Take `amount` out of `account`
    Withdraw { account: String, amount: Decimal },

    /// Move `amount` from `sender` to `receiver`
    Transfer {
        sender: String,
        receiver: String,
        amount: Decimal,
    },

    /// Report the balance of `account`
    Balance { account: String },
}
