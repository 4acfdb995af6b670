//! Human readable rendering of balances and history.
//!
//! The line shapes are what chat members see and are kept stable:
//!
//! - balance: `Alice owes Bob $15.00`
//! - history: `Alice owes Bob $20.00 for lunch on 2026-10-15`
//! - confirmation: `Added transaction: Alice owes Bob $20.00 for lunch`

use crate::{Money, NetBalances, Transaction};

/// Rendered instead of an empty report.
pub const NO_TRANSACTIONS: &str = "No transactions yet!";

/// Upper-cases the first letter of every alphabetic run and lower-cases the
/// rest, so `mary-jane o'neil` becomes `Mary-Jane O'Neil`.
#[must_use]
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_alpha = false;
    for c in name.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

fn debt_line(debtor: &str, creditor: &str, amount: Money) -> String {
    format!(
        "{} owes {} ${amount}",
        title_case(debtor),
        title_case(creditor)
    )
}

fn transaction_line(tx: &Transaction) -> String {
    let line = debt_line(&tx.debtor, &tx.creditor, tx.amount);
    match tx.reason.as_deref() {
        Some(reason) => format!("{line} for {reason}"),
        None => line,
    }
}

fn join_or_sentinel(lines: Vec<String>) -> String {
    if lines.is_empty() {
        NO_TRANSACTIONS.to_string()
    } else {
        lines.join("\n")
    }
}

/// One line per positive net balance.
#[must_use]
pub fn format_balances(balances: &NetBalances) -> String {
    let lines = balances
        .iter()
        .flat_map(|(debtor, creditors)| {
            creditors
                .iter()
                .filter(|(_, amount)| amount.is_positive())
                .map(move |(creditor, amount)| debt_line(debtor, creditor, *amount))
        })
        .collect();
    join_or_sentinel(lines)
}

/// One line per transaction, in the given order.
#[must_use]
pub fn format_history(history: &[Transaction]) -> String {
    let lines = history
        .iter()
        .map(|tx| format!("{} on {}", transaction_line(tx), tx.date.format("%Y-%m-%d")))
        .collect();
    join_or_sentinel(lines)
}

/// Reply sent after a statement has been stored.
#[must_use]
pub fn format_recorded(tx: &Transaction) -> String {
    format!("Added transaction: {}", transaction_line(tx))
}
