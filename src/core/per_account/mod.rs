//! Per-account locking implementation
//!
//! This module contains the scalable alternative to the coarse-lock
//! `AccountService`:
//! - `account_service` - Ledger locking only the accounts an operation touches

pub mod account_service;

pub use account_service::PerAccountLockService;
