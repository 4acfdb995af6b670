//! IOU ledger engine.
//!
//! Turns chat lines such as `alice owes bob 20 for lunch` into stored
//! transactions and reports the net amount each member of a group owes the
//! others.
//!
//! The pure pieces (expression evaluation, statement parsing, netting and
//! report formatting) never touch the database. [`Engine`] is the storage
//! side: it is built once around a sea-orm connection and every ledger
//! operation is scoped by a group id.

pub use error::EngineError;
pub use expression::evaluate;
pub use money::Money;
pub use netting::{Debt, NetBalances, net_balances};
pub use ops::{Engine, EngineBuilder};
pub use report::{NO_TRANSACTIONS, format_balances, format_history, format_recorded, title_case};
pub use statement::{Statement, StatementError, parse_statement, try_parse_statement};
pub use transactions::Transaction;

mod error;
mod expression;
mod money;
mod netting;
mod ops;
mod report;
mod statement;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;
