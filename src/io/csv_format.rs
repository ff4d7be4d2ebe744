//! CSV format handling for replay scripts and balance output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvCommand structure for deserialization
//! - Conversion and boundary validation from CSV rows to `BankCommand`
//! - Balance output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{BankCommand, CommandError, NewUser, UserId};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the script format with columns:
/// `op,user,account,counterparty,amount,first_name,last_name,address`.
/// Every column except `op` is optional; which ones are required depends on
/// the operation.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvCommand {
    pub op: String,
    pub user: Option<String>,
    pub account: Option<String>,
    pub counterparty: Option<String>,
    pub amount: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
}

/// One row of the balance report
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceRow {
    /// Alias the account was opened under
    pub account: String,
    /// Owner of the account
    pub user: UserId,
    pub balance: Decimal,
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

fn require(field: Option<String>, name: &str, op: &str) -> Result<String, CommandError> {
    non_empty(field).ok_or_else(|| CommandError::invalid_input(format!("'{}' requires the '{}' column", op, name)))
}

/// Parse and validate an amount
///
/// Amounts must be present, parse as a decimal and be non-negative.
pub fn parse_amount(field: Option<String>) -> Result<Decimal, CommandError> {
    let raw = non_empty(field).ok_or_else(|| CommandError::invalid_input("Missing amount value!"))?;
    let amount = Decimal::from_str(raw.trim())
        .map_err(|_| CommandError::invalid_input(format!("Invalid amount '{}'", raw)))?;
    if amount < Decimal::ZERO {
        return Err(CommandError::invalid_input("Amount can not be a negative value!"));
    }
    Ok(amount)
}

fn parse_user(field: Option<String>, op: &str) -> Result<UserId, CommandError> {
    let raw = require(field, "user", op)?;
    raw.trim()
        .parse::<UserId>()
        .map_err(|_| CommandError::invalid_input(format!("Invalid user id '{}'", raw)))
}

/// Convert a CsvCommand to a BankCommand
///
/// This function:
/// - Parses the operation name (case-insensitive)
/// - Checks that the columns the operation needs are present
/// - Parses user ids and amounts, rejecting negative amounts
///
/// # Returns
///
/// * `Ok(BankCommand)` - Successfully converted command
/// * `Err(CommandError::InvalidInput)` - The row failed validation
pub fn convert_csv_command(csv_command: CsvCommand) -> Result<BankCommand, CommandError> {
    let op = csv_command.op.trim().to_lowercase();

    match op.as_str() {
        "user" => Ok(BankCommand::CreateUser(NewUser::new(
            non_empty(csv_command.first_name).unwrap_or_default(),
            non_empty(csv_command.last_name).unwrap_or_default(),
            non_empty(csv_command.address).unwrap_or_default(),
        ))),
        "open" => Ok(BankCommand::OpenAccount {
            user: parse_user(csv_command.user, &op)?,
            alias: require(csv_command.account, "account", &op)?,
        }),
        "deposit" => Ok(BankCommand::Deposit {
            account: require(csv_command.account, "account", &op)?,
            amount: parse_amount(csv_command.amount)?,
        }),
        "withdraw" => Ok(BankCommand::Withdraw {
            account: require(csv_command.account, "account", &op)?,
            amount: parse_amount(csv_command.amount)?,
        }),
        "transfer" => Ok(BankCommand::Transfer {
            sender: require(csv_command.account, "account", &op)?,
            receiver: require(csv_command.counterparty, "counterparty", &op)?,
            amount: parse_amount(csv_command.amount)?,
        }),
        "balance" => Ok(BankCommand::Balance {
            account: require(csv_command.account, "account", &op)?,
        }),
        _ => Err(CommandError::invalid_input(format!(
            "Unknown operation '{}'",
            csv_command.op
        ))),
    }
}

/// Write the balance report in CSV format
///
/// Writes columns `account,user,balance`, sorted by account alias, with
/// balances printed to four decimal places.
pub fn write_balances_csv(rows: &[BalanceRow], output: &mut dyn Write) -> Result<(), CommandError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["account", "user", "balance"])?;

    let mut sorted_rows = rows.to_vec();
    sorted_rows.sort_by(|a, b| a.account.cmp(&b.account));

    for row in sorted_rows {
        writer.write_record(&[
            row.account,
            row.user.to_string(),
            format!("{:.4}", row.balance),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
