//! Account-related types for the toy bank ledger
//!
//! This module defines the Account structure and the identifier alias used
//! to key accounts in the store.

use rust_decimal::Decimal;

/// Account identifier
///
/// An IBAN string, globally unique and immutable once assigned.
pub type AccountId = String;

/// Bank account state
///
/// Represents a single account: its identifier and its current balance.
/// The balance is never negative at any observable point; only the ledger
/// mutates it, and only while holding the account's lock.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The IBAN identifying this account
    pub iban: AccountId,

    /// Current balance
    ///
    /// Arbitrary-precision decimal, always >= 0.
    pub balance: Decimal,
}

impl Account {
    /// Create a new account with a zero balance
    ///
    /// # Arguments
    ///
    /// * `iban` - The identifier for this account
    ///
    /// # Returns
    ///
    /// A new Account with balance = 0
    pub fn new(iban: impl Into<AccountId>) -> Self {
        Account {
            iban: iban.into(),
            balance: Decimal::ZERO,
        }
    }
}

/// Point-in-time view of one account, used for reporting
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    pub iban: AccountId,
    pub balance: Decimal,
}
