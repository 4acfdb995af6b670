//! IOU statement parser.
//!
//! Recognizes `<debtor> owe(s) <creditor> <amount> [for <reason>]` anywhere a
//! line of chat text fits that shape. The match is a single regex pass: the
//! debtor is greedy (the last `owe`/`owes` that still leaves a valid tail
//! wins), the creditor stops at the first amount-shaped token. Splits of names
//! that themselves contain `owes` follow from that and are not second-guessed.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{EngineError, Money, expression::evaluate};

#[allow(clippy::expect_used)]
static STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<debtor>.+) owes? (?P<creditor>.+?) (?P<amount>[0-9]+(?:\.[0-9]+)?(?: ?[-+*/] ?[0-9]+(?:\.[0-9]+)?)?)(?: (?:for\b ?)?(?P<reason>.*))?$",
    )
    .expect("statement pattern is valid")
});

/// A debt declared in free text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    /// Lower-cased debtor name.
    pub debtor: String,
    /// Lower-cased creditor name.
    pub creditor: String,
    /// Evaluated amount, rounded to the cent. Always positive.
    pub amount: Money,
    /// Free-text annotation, original casing.
    pub reason: Option<String>,
}

impl Statement {
    /// `true` when somebody declared a debt to themselves.
    #[must_use]
    pub fn is_self_debt(&self) -> bool {
        self.debtor == self.creditor
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatementError {
    /// The text does not look like an IOU statement.
    #[error("not an IOU statement")]
    NoMatch,
    /// The text has the right shape but its amount cannot be used.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

// Amount evaluation only ever fails with `InvalidAmount`.
impl From<EngineError> for StatementError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidAmount(reason) => Self::InvalidAmount(reason),
            other => Self::InvalidAmount(other.to_string()),
        }
    }
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

// `3 + 4 + 5` leaves `+ 5` in the reason slot.
fn continues_expression(reason: &str) -> bool {
    let mut chars = reason.chars();
    matches!(chars.next(), Some('+' | '-' | '*' | '/'))
        && chars
            .as_str()
            .trim_start()
            .starts_with(|c: char| c.is_ascii_digit())
}

/// Parses a line of text into a [`Statement`], telling apart text that is not
/// an IOU at all from an IOU whose amount is unusable.
pub fn try_parse_statement(text: &str) -> Result<Statement, StatementError> {
    let normalized = collapse_whitespace(text);
    let caps = STATEMENT
        .captures(&normalized)
        .ok_or(StatementError::NoMatch)?;

    let group = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or_default();

    let amount = Money::from_decimal(evaluate(group("amount"))?)?;
    if !amount.is_positive() {
        return Err(StatementError::InvalidAmount(
            "amount rounds to zero".to_string(),
        ));
    }

    let reason = group("reason").trim();
    if continues_expression(reason) {
        return Err(StatementError::InvalidAmount(
            "only one operator is allowed".to_string(),
        ));
    }

    Ok(Statement {
        debtor: group("debtor").trim().to_lowercase(),
        creditor: group("creditor").trim().to_lowercase(),
        amount,
        reason: (!reason.is_empty()).then(|| reason.to_string()),
    })
}

/// Parses a line of text into a [`Statement`].
///
/// Text that does not match and text whose amount is malformed both yield
/// `None`; use [`try_parse_statement`] to distinguish them.
///
/// ```rust
/// use engine::{Money, parse_statement};
///
/// let st = parse_statement("alice owes bob 20 for lunch").unwrap();
/// assert_eq!(st.debtor, "alice");
/// assert_eq!(st.creditor, "bob");
/// assert_eq!(st.amount, Money::new(2000));
/// assert_eq!(st.reason.as_deref(), Some("lunch"));
///
/// assert!(parse_statement("see you tomorrow").is_none());
/// ```
#[must_use]
pub fn parse_statement(text: &str) -> Option<Statement> {
    let parsed = try_parse_statement(text).ok();
    if let Some(statement) = &parsed {
        tracing::debug!(
            debtor = %statement.debtor,
            creditor = %statement.creditor,
            amount = %statement.amount,
            "parsed IOU statement"
        );
    }
    parsed
}
