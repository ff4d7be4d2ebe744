//! Core trait for ledger implementations
//!
//! This module defines the `Ledger` abstraction so that the coarse-lock and
//! per-account-lock implementations can be used interchangeably by callers.

use crate::types::{AccountId, LedgerError, UserId};
use rust_decimal::Decimal;

/// Trait for executing banking operations
///
/// Implementations own every mutable balance and are solely responsible for
/// concurrency correctness: all methods take `&self` and may be called from
/// any number of threads at once.
///
/// # Guarantees
///
/// - No balance is ever observable below zero
/// - Operations on one account are linearizable
/// - `transfer` is atomic with respect to the pair of accounts involved and
///   never changes the sum of balances
/// - A failed operation leaves every balance unchanged
pub trait Ledger: Send + Sync {
    /// Open a zero-balance account for an existing user
    ///
    /// # Errors
    ///
    /// * `UserNotFound` - no user is registered under `user_id`
    fn create_account(&self, user_id: UserId) -> Result<AccountId, LedgerError>;

    /// Read the current balance of an account
    ///
    /// # Errors
    ///
    /// * `AccountNotFound` - no account has this IBAN
    fn check_funds(&self, iban: &str) -> Result<Decimal, LedgerError>;

    /// Take money out of an account
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` - `amount` is negative
    /// * `AccountNotFound` - no account has this IBAN
    /// * `InsufficientFunds` - the balance is lower than `amount`
    fn withdraw(&self, iban: &str, amount: Decimal) -> Result<(), LedgerError>;

    /// Put money into an account
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` - `amount` is negative
    /// * `AccountNotFound` - no account has this IBAN
    /// * `ArithmeticOverflow` - the new balance does not fit in a decimal
    fn deposit(&self, iban: &str, amount: Decimal) -> Result<(), LedgerError>;

    /// Move money from one account to another
    ///
    /// Both accounts are resolved before either is touched, so a missing
    /// receiver never strands a withdrawn amount.
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` - `amount` is negative
    /// * `AccountNotFound` - sender or receiver does not exist
    /// * `InsufficientFunds` - the sender's balance is lower than `amount`
    /// * `ArithmeticOverflow` - the receiver's new balance does not fit
    fn transfer(&self, sender: &str, receiver: &str, amount: Decimal) -> Result<(), LedgerError>;
}
