use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Debt, Engine, EngineError, Money, NO_TRANSACTIONS, format_balances, format_history,
    format_recorded, parse_statement,
};
use migration::MigratorTrait;

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

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

/// Parses `text` the way the bot does and stores the result.
async fn record(engine: &Engine, group_id: &str, text: &str) -> engine::Transaction {
    let st = parse_statement(text).unwrap();
    engine
        .append_transaction(
            group_id,
            &st.debtor,
            &st.creditor,
            st.amount,
            st.reason.as_deref(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn statement_is_stored_and_reported() {
    let (engine, _db) = engine_with_db().await;

    let tx = record(&engine, "chat-1", "alice owes bob 20 for lunch").await;
    assert_eq!(tx.group_id, "chat-1");
    assert_eq!(tx.debtor, "alice");
    assert_eq!(tx.creditor, "bob");
    assert_eq!(tx.amount, Money::new(2000));
    assert_eq!(tx.reason.as_deref(), Some("lunch"));
    assert_eq!(tx.date, engine.today());
    assert_eq!(
        format_recorded(&tx),
        "Added transaction: Alice owes Bob $20.00 for lunch"
    );

    let balances = engine.net_balances("chat-1").await.unwrap();
    assert_eq!(format_balances(&balances), "Alice owes Bob $20.00");
}

#[tokio::test]
async fn opposite_statements_are_netted() {
    let (engine, _db) = engine_with_db().await;

    record(&engine, "chat-1", "alice owes bob 20").await;
    record(&engine, "chat-1", "bob owes alice 5").await;

    let balances = engine.net_balances("chat-1").await.unwrap();
    assert_eq!(format_balances(&balances), "Alice owes Bob $15.00");
}

#[tokio::test]
async fn fully_cancelled_group_renders_sentinel() {
    let (engine, _db) = engine_with_db().await;

    record(&engine, "chat-1", "alice owes bob 5").await;
    record(&engine, "chat-1", "Bob owes Alice 2.5*2").await;

    let balances = engine.net_balances("chat-1").await.unwrap();
    assert!(balances.is_empty());
    assert_eq!(format_balances(&balances), NO_TRANSACTIONS);
}

#[tokio::test]
async fn empty_group_is_not_an_error() {
    let (engine, _db) = engine_with_db().await;

    assert!(engine.list_transactions("nobody").await.unwrap().is_empty());
    assert!(engine.net_balances("nobody").await.unwrap().is_empty());
    let history = engine.list_history("nobody").await.unwrap();
    assert_eq!(format_history(&history), NO_TRANSACTIONS);
}

#[tokio::test]
async fn groups_are_isolated() {
    let (engine, _db) = engine_with_db().await;

    record(&engine, "chat-1", "alice owes bob 20").await;
    record(&engine, "chat-2", "bob owes alice 5").await;

    assert_eq!(
        format_balances(&engine.net_balances("chat-1").await.unwrap()),
        "Alice owes Bob $20.00"
    );
    assert_eq!(
        format_balances(&engine.net_balances("chat-2").await.unwrap()),
        "Bob owes Alice $5.00"
    );
}

#[tokio::test]
async fn names_are_case_folded_and_trimmed() {
    let (engine, _db) = engine_with_db().await;

    engine
        .append_transaction("g", "Bob ", "ALICE", Money::new(1000), None)
        .await
        .unwrap();
    engine
        .append_transaction("g", " alice", "bob", Money::new(300), Some("  "))
        .await
        .unwrap();

    let debts = engine.list_transactions("g").await.unwrap();
    assert!(debts.contains(&Debt::new("bob", "alice", Money::new(1000))));
    assert!(debts.contains(&Debt::new("alice", "bob", Money::new(300))));

    let balances = engine.net_balances("g").await.unwrap();
    assert_eq!(format_balances(&balances), "Bob owes Alice $7.00");

    let history = engine.list_history("g").await.unwrap();
    assert!(history.iter().all(|tx| tx.reason.is_none()));
}

#[tokio::test]
async fn invalid_input_is_rejected_before_storage() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .append_transaction("g", "alice", "bob", Money::ZERO, None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .append_transaction("g", "alice", "bob", Money::new(-100), None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .append_transaction("g", "  ", "bob", Money::new(100), None)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidName("debtor name must not be empty".to_string())
    );

    assert!(engine.list_transactions("g").await.unwrap().is_empty());
}

#[tokio::test]
async fn history_is_most_recent_first() {
    let (engine, _db) = engine_with_db().await;

    engine
        .append_transaction_on("g", "alice", "bob", Money::new(2000), Some("lunch"), day(3))
        .await
        .unwrap();
    engine
        .append_transaction_on("g", "bob", "alice", Money::new(500), None, day(15))
        .await
        .unwrap();
    engine
        .append_transaction_on("g", "carol", "bob", Money::new(125), Some("coffee"), day(3))
        .await
        .unwrap();

    let history = engine.list_history("g").await.unwrap();
    assert_eq!(
        format_history(&history),
        "Bob owes Alice $5.00 on 2026-10-15\n\
         Carol owes Bob $1.25 for coffee on 2026-10-03\n\
         Alice owes Bob $20.00 for lunch on 2026-10-03"
    );
}

#[tokio::test]
async fn history_and_snapshot_agree() {
    let (engine, _db) = engine_with_db().await;

    record(&engine, "g", "alice owes bob 12").await;
    record(&engine, "g", "carol owes alice 30/4 for tickets").await;
    record(&engine, "g", "bob owes alice 3").await;

    let from_history: Vec<Debt> = engine
        .list_history("g")
        .await
        .unwrap()
        .iter()
        .map(Debt::from)
        .collect();

    assert_eq!(
        engine::net_balances(&from_history).unwrap(),
        engine.net_balances("g").await.unwrap()
    );
}

#[tokio::test]
async fn transactions_persist_across_engines() {
    let (engine, db) = engine_with_db().await;
    record(&engine, "g", "alice owes bob 20").await;

    let other = Engine::builder()
        .database(db.clone())
        .timezone(chrono_tz::Europe::Rome)
        .build()
        .await
        .unwrap();
    assert_eq!(other.list_transactions("g").await.unwrap().len(), 1);
}

#[tokio::test]
async fn storage_failures_are_surfaced() {
    let (engine, db) = engine_with_db().await;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "DROP TABLE transactions",
    ))
    .await
    .unwrap();

    let err = engine
        .append_transaction("g", "alice", "bob", Money::new(100), None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Storage(_)));

    let err = engine.net_balances("g").await.unwrap_err();
    assert!(matches!(err, EngineError::Storage(_)));
}

#[tokio::test]
async fn balances_too_large_to_total_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    record(&engine, "g", "alice owes bob 50000000000000000").await;
    record(&engine, "g", "alice owes bob 50000000000000000").await;

    let err = engine.net_balances("g").await.unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("balance too large".to_string())
    );

    // the same amounts in opposite directions still net out
    record(&engine, "h", "alice owes bob 50000000000000000").await;
    record(&engine, "h", "bob owes alice 50000000000000000").await;
    assert!(engine.net_balances("h").await.unwrap().is_empty());
}
