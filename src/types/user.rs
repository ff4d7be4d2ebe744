//! User-related types for the toy bank ledger

use super::account::AccountId;
use dashmap::DashSet;

/// User identifier
///
/// Assigned by the user store, starting at 1 and never reused.
pub type UserId = u64;

/// Data needed to register a new user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
}

impl NewUser {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
        }
    }
}

/// A registered bank user
///
/// The identifier and personal data are immutable once the user is stored.
/// The account set is a concurrent set: it only ever grows, and only the
/// ledger appends to it when it opens an account for this user.
#[derive(Debug)]
pub struct User {
    /// Identifier assigned by the user store
    pub id: UserId,

    pub first_name: String,
    pub last_name: String,
    pub address: String,

    /// IBANs of the accounts owned by this user
    accounts: DashSet<AccountId>,
}

impl User {
    /// Build a stored user from registration data and its assigned id
    pub fn new(id: UserId, new_user: NewUser) -> Self {
        Self {
            id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            address: new_user.address,
            accounts: DashSet::new(),
        }
    }

    /// Record ownership of an account
    ///
    /// Returns false if the identifier was already present.
    pub(crate) fn attach_account(&self, iban: AccountId) -> bool {
        self.accounts.insert(iban)
    }

    /// Check whether this user owns the given account
    pub fn owns(&self, iban: &str) -> bool {
        self.accounts.contains(iban)
    }

    /// Number of accounts owned by this user
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Snapshot of the owned account identifiers, sorted for stable output
    pub fn account_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = self.accounts.iter().map(|iban| iban.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Read model of the user's personal data
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            address: self.address.clone(),
        }
    }
}

/// Personal data of a user as returned to callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_starts_without_accounts() {
        let user = User::new(1, NewUser::new("Ada", "Lovelace", "London"));

        assert_eq!(user.id, 1);
        assert_eq!(user.account_count(), 0);
        assert!(user.account_ids().is_empty());
    }

    #[test]
    fn test_attach_account_ignores_duplicates() {
        let user = User::new(1, NewUser::default());

        assert!(user.attach_account("B".to_string()));
        assert!(user.attach_account("A".to_string()));
        assert!(!user.attach_account("B".to_string()));

        assert_eq!(user.account_count(), 2);
        assert_eq!(user.account_ids(), vec!["A".to_string(), "B".to_string()]);
        assert!(user.owns("A"));
        assert!(!user.owns("C"));
    }

    #[test]
    fn test_profile_copies_personal_data() {
        let user = User::new(7, NewUser::new("Grace", "Hopper", "Arlington"));

        assert_eq!(
            user.profile(),
            UserProfile {
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                address: "Arlington".to_string(),
            }
        );
    }
}
