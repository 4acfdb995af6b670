//! Transaction primitives.
//!
//! A `Transaction` is one recorded IOU. Rows are append-only: the engine
//! never updates or deletes them.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{Debt, Money};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: i32,
    pub group_id: String,
    pub debtor: String,
    pub creditor: String,
    pub amount: Money,
    pub reason: Option<String>,
    pub date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub group_id: String,
    pub debtor: String,
    pub creditor: String,
    pub amount_minor: i64,
    pub reason: Option<String>,
    pub date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Fields of a row that is about to be inserted; the id is assigned by the
/// database.
pub(crate) struct NewTransaction {
    pub group_id: String,
    pub debtor: String,
    pub creditor: String,
    pub amount: Money,
    pub reason: Option<String>,
    pub date: NaiveDate,
}

impl From<NewTransaction> for ActiveModel {
    fn from(tx: NewTransaction) -> Self {
        Self {
            id: ActiveValue::NotSet,
            group_id: ActiveValue::Set(tx.group_id),
            debtor: ActiveValue::Set(tx.debtor),
            creditor: ActiveValue::Set(tx.creditor),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            reason: ActiveValue::Set(tx.reason),
            date: ActiveValue::Set(tx.date),
        }
    }
}

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            group_id: model.group_id,
            debtor: model.debtor,
            creditor: model.creditor,
            amount: Money::new(model.amount_minor),
            reason: model.reason,
            date: model.date,
        }
    }
}

impl From<&Transaction> for Debt {
    fn from(tx: &Transaction) -> Self {
        Debt::new(tx.debtor.clone(), tx.creditor.clone(), tx.amount)
    }
}
