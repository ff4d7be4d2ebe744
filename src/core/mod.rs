//! Core business logic module
//!
//! This module contains the concurrent ledger components:
//! - `traits` - The `Ledger` abstraction shared by both implementations
//! - `account_store` - Thread-safe account storage
//! - `user_store` - Thread-safe user storage and id generation
//! - `balance` - Checked balance arithmetic on locked accounts
//! - `account_service` - Coarse-lock ledger (default)
//! - `per_account` - Per-account-lock ledger with ordered lock acquisition
//! - `user_service` - User registration and lookup

pub mod account_service;
pub mod account_store;
pub mod balance;
pub mod per_account;
pub mod traits;
pub mod user_service;
pub mod user_store;

pub use account_service::AccountService;
pub use account_store::{AccountStore, SharedAccount};
pub use per_account::PerAccountLockService;
pub use traits::Ledger;
pub use user_service::UserService;
pub use user_store::UserStore;
