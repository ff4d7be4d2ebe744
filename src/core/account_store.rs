//! Thread-safe account storage
//!
//! This module provides the `AccountStore` struct, a passive key-value holder
//! mapping IBANs to account records.
//!
//! # Design
//!
//! Accounts live in a `DashMap` so that inserts and lookups can run from any
//! number of threads without external locking. Each record sits behind its own
//! `Mutex`: the store hands out shared handles and never mutates balances
//! itself. How those mutexes are taken (one global lock first, or ordered
//! per-account locking) is decided by the ledger.

use crate::types::{Account, AccountId, AccountSnapshot, IbanGenerator};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared handle to one account record
pub type SharedAccount = Arc<Mutex<Account>>;

/// Lock an account record
///
/// Poisoning is ignored: ledger critical sections validate before they write,
/// so a panicking holder never leaves a half-applied balance behind.
pub fn lock_account(account: &SharedAccount) -> MutexGuard<'_, Account> {
    account.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory account store
///
/// # Thread Safety
///
/// `add_account` and `get_account` are atomic per key: a lookup after an insert
/// sees the whole record, never a partially constructed one. Atomicity of
/// balance updates across several calls is not provided here.
#[derive(Debug, Default)]
pub struct AccountStore {
    /// Account records keyed by IBAN
    accounts: DashMap<AccountId, SharedAccount>,

    /// Identifier source; one per store so ledgers sharing a store never
    /// issue the same IBAN twice
    ibans: IbanGenerator,
}

impl AccountStore {
    /// Create a new empty AccountStore
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            ibans: IbanGenerator::new(),
        }
    }

    /// Open a zero-balance account under a freshly generated IBAN
    ///
    /// Never replaces an existing record: an IBAN already present (inserted
    /// through `add_account`) is skipped and the next one is drawn.
    pub fn open_account(&self) -> AccountId {
        loop {
            let iban = self.ibans.next_iban();
            let mut inserted = false;
            self.accounts.entry(iban.clone()).or_insert_with(|| {
                inserted = true;
                Arc::new(Mutex::new(Account::new(iban.clone())))
            });
            if inserted {
                return iban;
            }
        }
    }

    /// Insert an account keyed by its IBAN
    ///
    /// Replaces an existing record with the same IBAN; callers guarantee
    /// uniqueness of freshly generated identifiers.
    pub fn add_account(&self, account: Account) {
        let iban = account.iban.clone();
        self.accounts.insert(iban, Arc::new(Mutex::new(account)));
    }

    /// Look up an account by IBAN
    ///
    /// # Returns
    ///
    /// * `Some(SharedAccount)` - handle to the live record
    /// * `None` - no account with this IBAN exists
    pub fn get_account(&self, iban: &str) -> Option<SharedAccount> {
        self.accounts.get(iban).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the store holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Balances of all accounts, sorted by IBAN
    ///
    /// Each balance is read under its own account lock, so every value is one
    /// that really existed; the list as a whole is not a global snapshot while
    /// writers are active.
    pub fn snapshot(&self) -> Vec<AccountSnapshot> {
        let handles: Vec<SharedAccount> = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut snapshots: Vec<AccountSnapshot> = handles
            .iter()
            .map(|handle| {
                let account = lock_account(handle);
                AccountSnapshot {
                    iban: account.iban.clone(),
                    balance: account.balance,
                }
            })
            .collect();
        snapshots.sort_by(|a, b| a.iban.cmp(&b.iban));
        snapshots
    }

    /// Sum of all balances
    pub fn total_balance(&self) -> Decimal {
        self.snapshot().iter().map(|account| account.balance).sum()
    }
}
