//! Dependency wiring for the ledger core
//!
//! `Bank` builds the two stores, the user service and the ledger selected by a
//! `LockStrategy`, and hands them out to callers. Cloning a `Bank` shares the
//! same state.

use crate::cli::LockStrategy;
use crate::core::{AccountService, AccountStore, Ledger, PerAccountLockService, UserService, UserStore};
use crate::types::AccountSnapshot;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Create the ledger implementation for a locking strategy
///
/// # Arguments
///
/// * `strategy` - Which locking discipline the ledger uses
/// * `account_store` - Store the ledger owns balances in
/// * `user_store` - Store the ledger attaches new accounts to
pub fn create_ledger(
    strategy: LockStrategy,
    account_store: Arc<AccountStore>,
    user_store: Arc<UserStore>,
) -> Arc<dyn Ledger> {
    match strategy {
        LockStrategy::Global => Arc::new(AccountService::new(account_store, user_store)),
        LockStrategy::PerAccount => {
            Arc::new(PerAccountLockService::new(account_store, user_store))
        }
    }
}

/// A fully wired, in-memory bank
#[derive(Clone)]
pub struct Bank {
    strategy: LockStrategy,
    accounts: Arc<AccountStore>,
    users: UserService,
    ledger: Arc<dyn Ledger>,
}

impl Bank {
    /// Build an empty bank using the given locking strategy
    pub fn new(strategy: LockStrategy) -> Self {
        let accounts = Arc::new(AccountStore::new());
        let user_store = Arc::new(UserStore::new());
        let ledger = create_ledger(strategy, Arc::clone(&accounts), Arc::clone(&user_store));

        Self {
            strategy,
            accounts,
            users: UserService::new(user_store),
            ledger,
        }
    }

    pub fn strategy(&self) -> LockStrategy {
        self.strategy
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }

    pub fn ledger(&self) -> &dyn Ledger {
        self.ledger.as_ref()
    }

    /// Shared handle to the ledger, for moving into worker threads
    pub fn shared_ledger(&self) -> Arc<dyn Ledger> {
        Arc::clone(&self.ledger)
    }

    /// Balances of all accounts, sorted by IBAN
    pub fn account_snapshot(&self) -> Vec<AccountSnapshot> {
        self.accounts.snapshot()
    }

    /// Sum of all balances
    pub fn total_balance(&self) -> Decimal {
        self.accounts.total_balance()
    }
}

impl Default for Bank {
    fn default() -> Self {
        Self::new(LockStrategy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewUser;
    use rstest::rstest;

    #[rstest]
    fn test_bank_wires_shared_state(
        #[values(LockStrategy::Global, LockStrategy::PerAccount)] strategy: LockStrategy,
    ) {
        let bank = Bank::new(strategy);
        let user = bank.users().add_user(NewUser::new("Ada", "Lovelace", "London"));

        let iban = bank.ledger().create_account(user).unwrap();
        bank.ledger().deposit(&iban, Decimal::TEN).unwrap();

        assert_eq!(bank.users().get_accounts_for_user(user), Ok(vec![iban.clone()]));
        assert_eq!(bank.total_balance(), Decimal::TEN);
        assert_eq!(bank.account_snapshot().len(), 1);
        assert_eq!(bank.strategy(), strategy);
    }

    #[test]
    fn test_clones_share_state() {
        let bank = Bank::default();
        let clone = bank.clone();
        let user = bank.users().add_user(NewUser::default());

        let iban = clone.ledger().create_account(user).unwrap();

        assert_eq!(bank.ledger().check_funds(&iban), Ok(Decimal::ZERO));
    }
}
