//! Thread-safe user storage
//!
//! `UserStore` maps user ids to user records and hands out ids from an atomic
//! counter, so concurrent registrations never collide.

use crate::types::{NewUser, User, UserId};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// In-memory user store
#[derive(Debug, Default)]
pub struct UserStore {
    /// Last id handed out; the first user gets 1
    id_generator: AtomicU64,

    users: DashMap<UserId, Arc<User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            id_generator: AtomicU64::new(0),
            users: DashMap::new(),
        }
    }

    /// Store a new user under the next free id and return that id
    pub fn add_user(&self, new_user: NewUser) -> UserId {
        let id = self.id_generator.fetch_add(1, Ordering::Relaxed) + 1;
        self.users.insert(id, Arc::new(User::new(id, new_user)));
        id
    }

    /// Look up a user by id
    pub fn get_user(&self, id: UserId) -> Option<Arc<User>> {
        self.users.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let store = UserStore::new();

        assert_eq!(store.add_user(NewUser::new("A", "A", "A")), 1);
        assert_eq!(store.add_user(NewUser::new("B", "B", "B")), 2);
        assert_eq!(store.add_user(NewUser::new("C", "C", "C")), 3);
    }

    #[test]
    fn test_get_user_returns_stored_record() {
        let store = UserStore::new();
        let id = store.add_user(NewUser::new("Ada", "Lovelace", "London"));

        let user = store.get_user(id).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.first_name, "Ada");
        assert!(store.get_user(id + 1).is_none());
        assert!(store.get_user(0).is_none());
    }

    #[test]
    fn test_concurrent_add_user_assigns_unique_ids() {
        let store = Arc::new(UserStore::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                (0..500)
                    .map(|_| store.add_user(NewUser::default()))
                    .collect::<Vec<_>>()
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(ids.insert(id));
            }
        }

        assert_eq!(store.len(), 4000);
        assert_eq!(ids, (1..=4000).collect::<HashSet<UserId>>());
    }
}
