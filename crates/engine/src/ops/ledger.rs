use chrono::NaiveDate;
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{
    Debt, EngineError, Money, ResultEngine, Transaction,
    transactions::{self, NewTransaction},
};

use super::{Engine, normalize_name, normalize_optional_text, with_tx};

impl Engine {
    /// Durably appends a transaction to the group's ledger, dated today.
    ///
    /// Names are normalized (trimmed, lower-cased) before storage. Any
    /// database failure is returned as [`EngineError::Storage`].
    pub async fn append_transaction(
        &self,
        group_id: &str,
        debtor: &str,
        creditor: &str,
        amount: Money,
        reason: Option<&str>,
    ) -> ResultEngine<Transaction> {
        self.append_transaction_on(group_id, debtor, creditor, amount, reason, self.today())
            .await
    }

    /// Same as [`Engine::append_transaction`] with an explicit creation date,
    /// for backfills.
    pub async fn append_transaction_on(
        &self,
        group_id: &str,
        debtor: &str,
        creditor: &str,
        amount: Money,
        reason: Option<&str>,
        date: NaiveDate,
    ) -> ResultEngine<Transaction> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(format!(
                "amount must be > 0, got {amount}"
            )));
        }

        let new = NewTransaction {
            group_id: group_id.to_string(),
            debtor: normalize_name(debtor, "debtor")?,
            creditor: normalize_name(creditor, "creditor")?,
            amount,
            reason: normalize_optional_text(reason),
            date,
        };

        let model = with_tx!(self, |db_tx| {
            transactions::ActiveModel::from(new)
                .insert(&db_tx)
                .await
                .map_err(EngineError::from)
        })?;

        tracing::info!(
            group_id = %model.group_id,
            id = model.id,
            "appended transaction"
        );
        Ok(Transaction::from(model))
    }

    /// Complete, unordered snapshot of the group's debts, used for netting.
    pub async fn list_transactions(&self, group_id: &str) -> ResultEngine<Vec<Debt>> {
        let rows: Vec<(String, String, i64)> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Debtor)
            .column(transactions::Column::Creditor)
            .column(transactions::Column::AmountMinor)
            .filter(transactions::Column::GroupId.eq(group_id))
            .into_tuple()
            .all(&self.database)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(debtor, creditor, cents)| Debt::new(debtor, creditor, Money::new(cents)))
            .collect())
    }

    /// The group's transactions, most recent first.
    ///
    /// Transactions from the same day are returned newest insertion first.
    pub async fn list_history(&self, group_id: &str) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::GroupId.eq(group_id))
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::Id)
            .all(&self.database)
            .await?;

        Ok(models.into_iter().map(Transaction::from).collect())
    }
}
