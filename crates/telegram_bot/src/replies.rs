//! Reply texts, independent from the Telegram transport.

use engine::{
    Engine, EngineError, StatementError, format_balances, format_history, format_recorded,
    try_parse_statement,
};

pub(crate) const START_TEXT: &str = "Hello! Send me a message in the format \"{name1} owes {name2} {amount} for {reason}\" to track IOUs.";

const STORE_FAILED: &str = "Could not save that IOU right now, please try again later.";
const LOAD_FAILED: &str = "Could not load the ledger right now, please try again later.";
const TOTALS_TOO_LARGE: &str = "The balances in this chat are too large to total.";

/// Reply to a plain chat message, `None` when the bot should stay silent.
pub(crate) async fn statement_reply(
    engine: &Engine,
    group_id: &str,
    text: &str,
    reject_invalid_amounts: bool,
) -> Option<String> {
    let statement = match try_parse_statement(text) {
        Ok(statement) => statement,
        Err(StatementError::NoMatch) => return None,
        Err(StatementError::InvalidAmount(reason)) => {
            tracing::debug!(group_id, "rejected IOU amount: {reason}");
            return reject_invalid_amounts
                .then(|| format!("Could not record that IOU: invalid amount ({reason})."));
        }
    };

    if statement.is_self_debt() {
        tracing::debug!(group_id, name = %statement.debtor, "ignoring self debt");
        return None;
    }

    match engine
        .append_transaction(
            group_id,
            &statement.debtor,
            &statement.creditor,
            statement.amount,
            statement.reason.as_deref(),
        )
        .await
    {
        Ok(tx) => Some(format_recorded(&tx)),
        Err(err) => {
            tracing::error!(group_id, "failed to store transaction: {err}");
            Some(STORE_FAILED.to_string())
        }
    }
}

pub(crate) async fn totals_reply(engine: &Engine, group_id: &str) -> String {
    match engine.net_balances(group_id).await {
        Ok(balances) => format_balances(&balances),
        Err(EngineError::InvalidAmount(reason)) => {
            tracing::warn!(group_id, "cannot total balances: {reason}");
            TOTALS_TOO_LARGE.to_string()
        }
        Err(err) => {
            tracing::error!(group_id, "failed to compute totals: {err}");
            LOAD_FAILED.to_string()
        }
    }
}

pub(crate) async fn history_reply(engine: &Engine, group_id: &str) -> String {
    match engine.list_history(group_id).await {
        Ok(history) => format_history(&history),
        Err(err) => {
            tracing::error!(group_id, "failed to load history: {err}");
            LOAD_FAILED.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use engine::NO_TRANSACTIONS;
    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

    use super::*;

    async fn engine_with_db() -> (Engine, DatabaseConnection) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder()
            .database(db.clone())
            .build()
            .await
            .unwrap();
        (engine, db)
    }

    #[tokio::test]
    async fn records_and_confirms_statement() {
        let (engine, _db) = engine_with_db().await;

        let reply = statement_reply(&engine, "42", "alice owes bob 20 for lunch", false).await;
        assert_eq!(
            reply.as_deref(),
            Some("Added transaction: Alice owes Bob $20.00 for lunch")
        );
        assert_eq!(totals_reply(&engine, "42").await, "Alice owes Bob $20.00");
    }

    #[tokio::test]
    async fn chatter_is_ignored() {
        let (engine, _db) = engine_with_db().await;

        assert_eq!(statement_reply(&engine, "42", "see you at 8", true).await, None);
        assert_eq!(totals_reply(&engine, "42").await, NO_TRANSACTIONS);
    }

    #[tokio::test]
    async fn invalid_amount_is_silent_unless_rejection_enabled() {
        let (engine, _db) = engine_with_db().await;

        assert_eq!(
            statement_reply(&engine, "42", "alice owes bob 10/0", false).await,
            None
        );
        let reply = statement_reply(&engine, "42", "alice owes bob 10/0", true)
            .await
            .unwrap();
        assert!(reply.starts_with("Could not record that IOU"), "{reply}");
        assert!(reply.contains("division by zero"), "{reply}");
        assert_eq!(history_reply(&engine, "42").await, NO_TRANSACTIONS);
    }

    #[tokio::test]
    async fn self_debts_are_not_recorded() {
        let (engine, _db) = engine_with_db().await;

        assert_eq!(
            statement_reply(&engine, "42", "Alice owes alice 5", true).await,
            None
        );
        assert!(engine.list_transactions("42").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn netting_across_messages() {
        let (engine, _db) = engine_with_db().await;

        statement_reply(&engine, "42", "alice owes bob 20", false).await;
        statement_reply(&engine, "42", "bob owes alice 5", false).await;

        assert_eq!(totals_reply(&engine, "42").await, "Alice owes Bob $15.00");
        let history = history_reply(&engine, "42").await;
        assert_eq!(history.lines().count(), 2);
        assert!(history.starts_with("Bob owes Alice $5.00 on "), "{history}");
    }

    #[tokio::test]
    async fn storage_failure_is_reported_to_the_chat() {
        let (engine, db) = engine_with_db().await;
        db.execute(Statement::from_string(
            db.get_database_backend(),
            "DROP TABLE transactions",
        ))
        .await
        .unwrap();

        assert_eq!(
            statement_reply(&engine, "42", "alice owes bob 20", false)
                .await
                .as_deref(),
            Some(STORE_FAILED)
        );
        assert_eq!(totals_reply(&engine, "42").await, LOAD_FAILED);
        assert_eq!(history_reply(&engine, "42").await, LOAD_FAILED);
    }

    #[tokio::test]
    async fn oversized_totals_do_not_crash_the_bot() {
        let (engine, _db) = engine_with_db().await;

        for _ in 0..2 {
            statement_reply(&engine, "42", "alice owes bob 50000000000000000", false).await;
        }
        assert_eq!(totals_reply(&engine, "42").await, TOTALS_TOO_LARGE);
        assert_eq!(history_reply(&engine, "42").await.lines().count(), 2);
    }
}
