//! Coarse-lock ledger
//!
//! This module provides `AccountService`, the default `Ledger` implementation.
//! Every mutating operation runs under one service-wide lock, which gives all
//! writers a single total order.
//!
//! # Locking
//!
//! ```text
//! create_account / withdraw / deposit / transfer
//!     └── write_lock (service-wide)
//!         └── account lock(s) held only while a balance is read or written
//!
//! check_funds
//!     └── account lock only
//! ```
//!
//! Writers hold the account lock for the whole read-modify-write, so readers
//! never observe a half-applied update. Because at most one thread at a time
//! ever holds two account locks, lock order between accounts does not matter
//! here.
//!
//! # Trade-off
//!
//! Simple to reason about, but writers never run in parallel: two deposits on
//! unrelated accounts still wait for each other. `PerAccountLockService` lifts
//! that restriction at the cost of ordered lock acquisition.

use crate::core::account_store::{lock_account, AccountStore, SharedAccount};
use crate::core::balance::{credit, debit, ensure_covers, ensure_valid_amount, move_funds};
use crate::core::traits::Ledger;
use crate::core::user_store::UserStore;
use crate::types::{AccountId, LedgerError, UserId};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Ledger serializing all writers behind one lock
#[derive(Debug)]
pub struct AccountService {
    account_store: Arc<AccountStore>,
    user_store: Arc<UserStore>,

    /// Held for the full duration of every mutating operation
    write_lock: Mutex<()>,
}

impl AccountService {
    /// Create a new AccountService over shared stores
    ///
    /// # Arguments
    ///
    /// * `account_store` - Store the service opens accounts in
    /// * `user_store` - Store used to look up account owners
    pub fn new(account_store: Arc<AccountStore>, user_store: Arc<UserStore>) -> Self {
        Self {
            account_store,
            user_store,
            write_lock: Mutex::new(()),
        }
    }

    fn serialize_writers(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn find_account(&self, iban: &str) -> Result<SharedAccount, LedgerError> {
        self.account_store
            .get_account(iban)
            .ok_or_else(|| LedgerError::account_not_found(iban))
    }
}

impl Ledger for AccountService {
    fn create_account(&self, user_id: UserId) -> Result<AccountId, LedgerError> {
        let _writer = self.serialize_writers();

        let user = self
            .user_store
            .get_user(user_id)
            .ok_or_else(|| LedgerError::user_not_found(user_id))?;

        let iban = self.account_store.open_account();
        user.attach_account(iban.clone());

        info!(user = user_id, iban = %iban, "account created");
        Ok(iban)
    }

    fn check_funds(&self, iban: &str) -> Result<Decimal, LedgerError> {
        let handle = self.find_account(iban)?;
        let balance = lock_account(&handle).balance;
        Ok(balance)
    }

    fn withdraw(&self, iban: &str, amount: Decimal) -> Result<(), LedgerError> {
        ensure_valid_amount(amount)?;
        let _writer = self.serialize_writers();

        let handle = self.find_account(iban)?;
        debit(&mut lock_account(&handle), amount)?;

        debug!(iban, %amount, "withdrawal applied");
        Ok(())
    }

    fn deposit(&self, iban: &str, amount: Decimal) -> Result<(), LedgerError> {
        ensure_valid_amount(amount)?;
        let _writer = self.serialize_writers();

        let handle = self.find_account(iban)?;
        credit(&mut lock_account(&handle), amount)?;

        debug!(iban, %amount, "deposit applied");
        Ok(())
    }

    fn transfer(&self, sender: &str, receiver: &str, amount: Decimal) -> Result<(), LedgerError> {
        ensure_valid_amount(amount)?;
        let _writer = self.serialize_writers();

        let sender_handle = self.find_account(sender)?;
        let receiver_handle = self.find_account(receiver)?;

        if sender == receiver {
            ensure_covers(&lock_account(&sender_handle), amount)?;
        } else {
            let mut from = lock_account(&sender_handle);
            let mut to = lock_account(&receiver_handle);
            move_funds(&mut from, &mut to, amount)?;
        }

        debug!(sender, receiver, %amount, "transfer applied");
        Ok(())
    }
}
