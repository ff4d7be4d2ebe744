//! Balance arithmetic shared by the ledger implementations
//!
//! These functions operate on an account the caller has already locked. They
//! validate first and write last, so an error always leaves the account as it
//! was.

use crate::types::{Account, LedgerError};
use rust_decimal::Decimal;

/// Reject negative amounts
///
/// Zero is accepted and results in a no-op mutation.
pub fn ensure_valid_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::invalid_amount(amount));
    }
    Ok(())
}

/// Increase an account's balance
///
/// Uses checked arithmetic to prevent overflow and maintain account integrity.
///
/// # Errors
///
/// Returns `ArithmeticOverflow` if the new balance does not fit in a `Decimal`.
pub fn credit(account: &mut Account, amount: Decimal) -> Result<(), LedgerError> {
    account.balance = account
        .balance
        .checked_add(amount)
        .ok_or_else(|| LedgerError::arithmetic_overflow("deposit", &account.iban))?;
    Ok(())
}

/// Decrease an account's balance
///
/// # Errors
///
/// Returns `InsufficientFunds` if the balance is lower than `amount`; the
/// balance is left untouched.
pub fn debit(account: &mut Account, amount: Decimal) -> Result<(), LedgerError> {
    ensure_covers(account, amount)?;
    // balance >= amount >= 0, so the subtraction cannot leave the decimal range
    account.balance -= amount;
    Ok(())
}

/// Check that an account can pay `amount` without going negative
pub fn ensure_covers(account: &Account, amount: Decimal) -> Result<(), LedgerError> {
    if account.balance < amount {
        return Err(LedgerError::insufficient_funds(
            &account.iban,
            account.balance,
            amount,
        ));
    }
    Ok(())
}

/// Move `amount` between two locked accounts
///
/// Both checks run before either balance changes, so the pair is either fully
/// updated or not touched at all.
pub fn move_funds(
    sender: &mut Account,
    receiver: &mut Account,
    amount: Decimal,
) -> Result<(), LedgerError> {
    ensure_covers(sender, amount)?;
    let new_receiver_balance = receiver
        .balance
        .checked_add(amount)
        .ok_or_else(|| LedgerError::arithmetic_overflow("transfer", &receiver.iban))?;

    sender.balance -= amount;
    receiver.balance = new_receiver_balance;
    Ok(())
}
