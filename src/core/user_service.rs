//! User management
//!
//! `UserService` registers users and exposes their personal data and account
//! identifiers. It only reads the user store; accounts are attached to users by
//! the ledger.

use crate::core::user_store::UserStore;
use crate::types::{AccountId, LedgerError, NewUser, UserId, UserProfile};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct UserService {
    user_store: Arc<UserStore>,
}

impl UserService {
    pub fn new(user_store: Arc<UserStore>) -> Self {
        Self { user_store }
    }

    /// Register a user with an empty account set and return its id
    pub fn add_user(&self, new_user: NewUser) -> UserId {
        let id = self.user_store.add_user(new_user);
        info!(user = id, "user created");
        id
    }

    /// Personal data of a user
    ///
    /// # Errors
    ///
    /// * `UserNotFound` - no user is registered under `id`
    pub fn get_user(&self, id: UserId) -> Result<UserProfile, LedgerError> {
        self.user_store
            .get_user(id)
            .map(|user| user.profile())
            .ok_or_else(|| LedgerError::user_not_found(id))
    }

    /// IBANs of all accounts owned by a user, sorted
    ///
    /// # Errors
    ///
    /// * `UserNotFound` - no user is registered under `id`
    pub fn get_accounts_for_user(&self, id: UserId) -> Result<Vec<AccountId>, LedgerError> {
        self.user_store
            .get_user(id)
            .map(|user| user.account_ids())
            .ok_or_else(|| LedgerError::user_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::account_service::AccountService;
    use crate::core::account_store::AccountStore;
    use crate::core::traits::Ledger;

    #[test]
    fn test_add_and_get_user() {
        let service = UserService::new(Arc::new(UserStore::new()));

        let id = service.add_user(NewUser::new("Ada", "Lovelace", "London"));

        assert_eq!(id, 1);
        assert_eq!(
            service.get_user(id),
            Ok(UserProfile {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                address: "London".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_user() {
        let service = UserService::new(Arc::new(UserStore::new()));

        assert_eq!(service.get_user(3), Err(LedgerError::user_not_found(3)));
        assert_eq!(
            service.get_accounts_for_user(3),
            Err(LedgerError::user_not_found(3))
        );
    }

    #[test]
    fn test_new_user_has_no_accounts() {
        let service = UserService::new(Arc::new(UserStore::new()));
        let id = service.add_user(NewUser::default());

        assert_eq!(service.get_accounts_for_user(id), Ok(vec![]));
    }

    #[test]
    fn test_accounts_opened_by_ledger_are_listed() {
        let users = Arc::new(UserStore::new());
        let service = UserService::new(Arc::clone(&users));
        let ledger = AccountService::new(Arc::new(AccountStore::new()), Arc::clone(&users));
        let id = service.add_user(NewUser::default());

        let first = ledger.create_account(id).unwrap();
        let second = ledger.create_account(id).unwrap();

        let mut expected = vec![first, second];
        expected.sort();
        assert_eq!(service.get_accounts_for_user(id), Ok(expected));
    }
}
