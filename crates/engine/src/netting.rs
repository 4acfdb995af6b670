//! Netting of a group's raw debts into pairwise balances.
//!
//! Runs in two phases. First every debt is summed into an immutable gross
//! aggregate keyed by the ordered `(debtor, creditor)` pair. Then each
//! unordered pair `{a, b}` is visited exactly once and the difference of the
//! two gross directions is attributed to whoever owes more. The second phase
//! only reads the gross aggregate, so the result does not depend on the order
//! in which debts were recorded.

use std::collections::{BTreeMap, BTreeSet};

use crate::{EngineError, Money, ResultEngine};

/// One raw debt as stored in the ledger, without date or reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Debt {
    pub debtor: String,
    pub creditor: String,
    pub amount: Money,
}

impl Debt {
    pub fn new(debtor: impl Into<String>, creditor: impl Into<String>, amount: Money) -> Self {
        Self {
            debtor: debtor.into(),
            creditor: creditor.into(),
            amount,
        }
    }
}

/// Net amounts owed: `debtor -> creditor -> amount`.
///
/// Only strictly positive balances are present, and for any two people at
/// most one direction has an entry. Iteration is alphabetical.
pub type NetBalances = BTreeMap<String, BTreeMap<String, Money>>;

type Gross = BTreeMap<(String, String), Money>;

fn overflow() -> EngineError {
    EngineError::InvalidAmount("balance too large".to_string())
}

fn aggregate(debts: &[Debt]) -> ResultEngine<Gross> {
    let mut gross = Gross::new();
    for debt in debts {
        let entry = gross
            .entry((debt.debtor.clone(), debt.creditor.clone()))
            .or_insert(Money::ZERO);
        *entry = entry.checked_add(debt.amount).ok_or_else(overflow)?;
    }
    Ok(gross)
}

/// Collapses raw debts into net pairwise balances.
///
/// Fails with [`EngineError::InvalidAmount`] when a gross total does not fit
/// in [`Money`].
///
/// ```rust
/// use engine::{Debt, Money, net_balances};
///
/// let net = net_balances(&[
///     Debt::new("alice", "bob", Money::new(1000)),
///     Debt::new("bob", "alice", Money::new(400)),
/// ])
/// .unwrap();
/// assert_eq!(net["alice"]["bob"], Money::new(600));
/// assert!(!net.contains_key("bob"));
/// ```
pub fn net_balances(debts: &[Debt]) -> ResultEngine<NetBalances> {
    let gross = aggregate(debts)?;

    let pairs: BTreeSet<(&str, &str)> = gross
        .keys()
        .map(|(debtor, creditor)| {
            if debtor <= creditor {
                (debtor.as_str(), creditor.as_str())
            } else {
                (creditor.as_str(), debtor.as_str())
            }
        })
        .collect();

    let owed = |from: &str, to: &str| {
        gross
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .unwrap_or(Money::ZERO)
    };

    let mut net = NetBalances::new();
    for (a, b) in pairs {
        let (forward, backward) = (owed(a, b), owed(b, a));
        let (debtor, creditor, amount) = if forward >= backward {
            (a, b, forward.checked_sub(backward))
        } else {
            (b, a, backward.checked_sub(forward))
        };
        let amount = amount.ok_or_else(overflow)?;
        if amount.is_positive() {
            net.entry(debtor.to_string())
                .or_default()
                .insert(creditor.to_string(), amount);
        }
    }
    Ok(net)
}
