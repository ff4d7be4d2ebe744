//! Script replay driver
//!
//! This module plays the role of the external caller: it reads bank commands
//! from a CSV script, validates raw account references, calls the ledger, and
//! turns failures into log lines.
//!
//! # Design
//!
//! `run_replay` focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Account and user operations to the `Bank`
//! - CSV output to `csv_format::write_balances_csv`
//!
//! Rows are applied strictly in script order on the calling thread. A row that
//! fails (bad input or a ledger error) is logged at warn level and skipped;
//! only I/O failures abort the replay.

use crate::bank::Bank;
use crate::io::csv_format::{write_balances_csv, BalanceRow};
use crate::io::sync_reader::SyncReader;
use crate::types::{is_valid_iban, AccountId, BankCommand, CommandError, UserId};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Account opened by the script
#[derive(Debug, Clone, PartialEq)]
struct OpenedAccount {
    iban: AccountId,
    user: UserId,
}

/// State of one replay run: the bank plus the aliases bound so far
pub struct ReplaySession {
    bank: Bank,
    aliases: BTreeMap<String, OpenedAccount>,
}

impl ReplaySession {
    pub fn new(bank: Bank) -> Self {
        Self {
            bank,
            aliases: BTreeMap::new(),
        }
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    /// IBAN bound to an alias, if any
    pub fn iban_for(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(|opened| opened.iban.as_str())
    }

    /// Turn a script account reference into an IBAN
    ///
    /// Aliases bound by `open` win; anything else must be a lexically valid
    /// IBAN.
    fn resolve(&self, reference: &str) -> Result<AccountId, CommandError> {
        if let Some(opened) = self.aliases.get(reference) {
            return Ok(opened.iban.clone());
        }
        if is_valid_iban(reference) {
            return Ok(reference.to_string());
        }
        Err(CommandError::invalid_input(format!(
            "Invalid IBAN value {}",
            reference
        )))
    }

    /// Apply one command to the bank
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - unknown account reference, an alias shaped like an
    ///   IBAN, or an alias opened twice
    /// * `Ledger` - the ledger rejected the operation
    pub fn apply(&mut self, command: BankCommand) -> Result<(), CommandError> {
        match command {
            BankCommand::CreateUser(new_user) => {
                self.bank.users().add_user(new_user);
            }
            BankCommand::OpenAccount { user, alias } => {
                if is_valid_iban(&alias) {
                    return Err(CommandError::invalid_input(format!(
                        "Account alias '{}' has the form of an IBAN",
                        alias
                    )));
                }
                if self.aliases.contains_key(&alias) {
                    return Err(CommandError::invalid_input(format!(
                        "Account alias '{}' is already in use",
                        alias
                    )));
                }
                let iban = self.bank.ledger().create_account(user)?;
                self.aliases.insert(alias, OpenedAccount { iban, user });
            }
            BankCommand::Deposit { account, amount } => {
                let iban = self.resolve(&account)?;
                self.bank.ledger().deposit(&iban, amount)?;
            }
            BankCommand::Withdraw { account, amount } => {
                let iban = self.resolve(&account)?;
                self.bank.ledger().withdraw(&iban, amount)?;
            }
            BankCommand::Transfer {
                sender,
                receiver,
                amount,
            } => {
                let sender = self.resolve(&sender)?;
                let receiver = self.resolve(&receiver)?;
                self.bank.ledger().transfer(&sender, &receiver, amount)?;
            }
            BankCommand::Balance { account } => {
                let iban = self.resolve(&account)?;
                let balance = self.bank.ledger().check_funds(&iban)?;
                info!(account = %account, iban = %iban, %balance, "balance");
            }
        }
        Ok(())
    }

    /// Current balance of every account opened by the script
    pub fn balances(&self) -> Result<Vec<BalanceRow>, CommandError> {
        self.aliases
            .iter()
            .map(|(alias, opened)| -> Result<BalanceRow, CommandError> {
                Ok(BalanceRow {
                    account: alias.clone(),
                    user: opened.user,
                    balance: self.bank.ledger().check_funds(&opened.iban)?,
                })
            })
            .collect()
    }
}

/// Replay a script against `bank` and write the final balances to `output`
///
/// # Errors
///
/// Returns an error only if the script cannot be opened or the output cannot
/// be written. Individual row failures are logged and skipped.
pub fn run_replay(bank: Bank, input_path: &Path, output: &mut dyn Write) -> Result<(), CommandError> {
    let reader = SyncReader::new(input_path)?;
    let mut session = ReplaySession::new(bank);

    for row in reader {
        match row.and_then(|command| session.apply(command)) {
            Ok(()) => {}
            Err(e) => warn!("Skipping row: {}", e),
        }
    }

    write_balances_csv(&session.balances()?, output)
}
