//! Per-account-lock ledger
//!
//! This module provides `PerAccountLockService`, a `Ledger` that only locks the
//! accounts an operation touches. Operations on unrelated accounts run in
//! parallel.
//!
//! # Deadlock Freedom
//!
//! Single-account operations hold exactly one account lock. A transfer holds
//! two, always acquired in ascending IBAN order, so no cycle of waiting threads
//! can form: A→B and B→A both lock `min(A, B)` first.
//!
//! # Account Creation
//!
//! Users are never deleted, so the existence check stays true once it passes.
//! The account is inserted into the store before its IBAN is attached to the
//! owner's concurrent set, so anyone reading the set can always resolve the
//! account. Concurrent creations for the same user each insert a distinct IBAN
//! and none of them can be lost.

use crate::core::account_store::{lock_account, AccountStore, SharedAccount};
use crate::core::balance::{credit, debit, ensure_covers, ensure_valid_amount, move_funds};
use crate::core::traits::Ledger;
use crate::core::user_store::UserStore;
use crate::types::{AccountId, LedgerError, UserId};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

/// Ledger with per-account mutual exclusion and ordered two-account locking
#[derive(Debug)]
pub struct PerAccountLockService {
    account_store: Arc<AccountStore>,
    user_store: Arc<UserStore>,
}

impl PerAccountLockService {
    /// Create a new PerAccountLockService over shared stores
    pub fn new(account_store: Arc<AccountStore>, user_store: Arc<UserStore>) -> Self {
        Self {
            account_store,
            user_store,
        }
    }

    fn find_account(&self, iban: &str) -> Result<SharedAccount, LedgerError> {
        self.account_store
            .get_account(iban)
            .ok_or_else(|| LedgerError::account_not_found(iban))
    }
}

impl Ledger for PerAccountLockService {
    fn create_account(&self, user_id: UserId) -> Result<AccountId, LedgerError> {
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
        let handle = self.find_account(iban)?;
        debit(&mut lock_account(&handle), amount)?;

        debug!(iban, %amount, "withdrawal applied");
        Ok(())
    }

    fn deposit(&self, iban: &str, amount: Decimal) -> Result<(), LedgerError> {
        ensure_valid_amount(amount)?;
        let handle = self.find_account(iban)?;
        credit(&mut lock_account(&handle), amount)?;

        debug!(iban, %amount, "deposit applied");
        Ok(())
    }

    fn transfer(&self, sender: &str, receiver: &str, amount: Decimal) -> Result<(), LedgerError> {
        ensure_valid_amount(amount)?;
        let sender_handle = self.find_account(sender)?;
        let receiver_handle = self.find_account(receiver)?;

        if sender == receiver {
            ensure_covers(&lock_account(&sender_handle), amount)?;
            debug!(sender, receiver, %amount, "transfer applied");
            return Ok(());
        }

        // Canonical order: lower IBAN first
        let sender_first = sender < receiver;
        let (first, second) = if sender_first {
            (&sender_handle, &receiver_handle)
        } else {
            (&receiver_handle, &sender_handle)
        };
        let mut first_guard = lock_account(first);
        let mut second_guard = lock_account(second);

        let (from, to) = if sender_first {
            (&mut *first_guard, &mut *second_guard)
        } else {
            (&mut *second_guard, &mut *first_guard)
        };
        move_funds(from, to, amount)?;

        debug!(sender, receiver, %amount, "transfer applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewUser;
    use std::thread;

    fn setup() -> (Arc<PerAccountLockService>, Arc<UserStore>, Arc<AccountStore>) {
        let accounts = Arc::new(AccountStore::new());
        let users = Arc::new(UserStore::new());
        let service = Arc::new(PerAccountLockService::new(
            Arc::clone(&accounts),
            Arc::clone(&users),
        ));
        (service, users, accounts)
    }

    fn funded_account(service: &PerAccountLockService, users: &UserStore, amount: i64) -> AccountId {
        let user = users.add_user(NewUser::default());
        let iban = service.create_account(user).unwrap();
        service.deposit(&iban, Decimal::from(amount)).unwrap();
        iban
    }

    #[test]
    fn test_create_account_for_unknown_user_consumes_no_iban() {
        let (service, users, _) = setup();

        assert_eq!(service.create_account(5), Err(LedgerError::user_not_found(5)));

        let user = users.add_user(NewUser::default());
        assert_eq!(service.create_account(user).unwrap(), "RO54XXXX0000000000000000");
    }

    /// Open two empty accounts and return them as (lower IBAN, higher IBAN)
    fn ordered_pair(service: &PerAccountLockService, users: &UserStore) -> (AccountId, AccountId) {
        let a = funded_account(service, users, 0);
        let b = funded_account(service, users, 0);
        if a < b {
            (a, b)
        } else {
            (b, a)
        }
    }

    #[test]
    fn test_transfer_in_both_directions() {
        let (service, users, _) = setup();
        let (low, high) = ordered_pair(&service, &users);
        service.deposit(&low, Decimal::from(50)).unwrap();
        service.deposit(&high, Decimal::from(50)).unwrap();

        service.transfer(&low, &high, Decimal::from(20)).unwrap();
        service.transfer(&high, &low, Decimal::from(5)).unwrap();

        assert_eq!(service.check_funds(&low), Ok(Decimal::from(35)));
        assert_eq!(service.check_funds(&high), Ok(Decimal::from(65)));
    }

    #[test]
    fn test_transfer_from_higher_iban_insufficient() {
        let (service, users, _) = setup();
        let (low, high) = ordered_pair(&service, &users);
        service.deposit(&high, Decimal::from(3)).unwrap();

        let result = service.transfer(&high, &low, Decimal::from(4));

        assert_eq!(
            result,
            Err(LedgerError::insufficient_funds(&high, Decimal::from(3), Decimal::from(4)))
        );
        assert_eq!(service.check_funds(&low), Ok(Decimal::ZERO));
        assert_eq!(service.check_funds(&high), Ok(Decimal::from(3)));
    }

    #[test]
    fn test_transfer_from_missing_sender() {
        let (service, users, _) = setup();
        let receiver = funded_account(&service, &users, 1);

        assert_eq!(
            service.transfer("missing", &receiver, Decimal::ONE),
            Err(LedgerError::account_not_found("missing"))
        );
        assert_eq!(service.check_funds(&receiver), Ok(Decimal::ONE));
    }

    #[test]
    fn test_transfer_to_self_is_noop() {
        let (service, users, _) = setup();
        let iban = funded_account(&service, &users, 7);

        service.transfer(&iban, &iban, Decimal::from(7)).unwrap();

        assert_eq!(service.check_funds(&iban), Ok(Decimal::from(7)));
    }

    #[test]
    fn test_concurrent_opposite_transfers_do_not_deadlock() {
        let (service, users, accounts) = setup();
        let a = funded_account(&service, &users, 1000);
        let b = funded_account(&service, &users, 1000);

        let mut handles = vec![];
        for t in 0..8 {
            let service = Arc::clone(&service);
            let (from, to) = if t % 2 == 0 {
                (a.clone(), b.clone())
            } else {
                (b.clone(), a.clone())
            };
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    let _ = service.transfer(&from, &to, Decimal::ONE);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(accounts.total_balance(), Decimal::from(2000));
        assert!(service.check_funds(&a).unwrap() >= Decimal::ZERO);
        assert!(service.check_funds(&b).unwrap() >= Decimal::ZERO);
    }

    #[test]
    fn test_concurrent_create_account_same_user() {
        let (service, users, accounts) = setup();
        let user_id = users.add_user(NewUser::default());

        let mut handles = vec![];
        for _ in 0..8 {
            let service = Arc::clone(&service);
            handles.push(thread::spawn(move || {
                for _ in 0..250 {
                    service.create_account(user_id).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(users.get_user(user_id).unwrap().account_count(), 2000);
        assert_eq!(accounts.len(), 2000);
    }
}
