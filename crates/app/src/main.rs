use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "iou={level},telegram_bot={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let timezone = settings.timezone()?;
    let db = parse_database(&settings.database).await?;
    let engine = Arc::new(
        engine::Engine::builder()
            .database(db)
            .timezone(timezone)
            .build()
            .await?,
    );

    match settings.telegram {
        Some(telegram) => {
            tracing::info!("Found telegram settings...");
            let bot = telegram_bot::Bot::builder()
                .token(&telegram.token)
                .engine(Arc::clone(&engine))
                .reject_invalid_amounts(telegram.reject_invalid_amounts)
                .build()?;
            bot.run().await;
        }
        None => tracing::warn!("no telegram settings found, nothing to run"),
    }

    if let Ok(engine) = Arc::try_unwrap(engine) {
        engine.close().await?;
    }
    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    tracing::info!("opening database {url}");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
