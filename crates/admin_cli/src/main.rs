use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, StatementError, format_balances, format_history, format_recorded};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "iou_admin")]
#[command(about = "Admin utilities for the IOU ledger (record, totals, history)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./iou.db?mode=rwc")]
    database_url: String,

    /// IANA timezone used to date recorded IOUs.
    #[arg(long, env = "IOU_TIMEZONE", default_value = "UTC")]
    timezone: chrono_tz::Tz,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record an IOU statement, e.g. `alice owes bob 20 for lunch`.
    Record(RecordArgs),
    /// Print the group's net balances.
    Totals(GroupArgs),
    /// Print the group's history, newest first.
    History(GroupArgs),
}

#[derive(Args, Debug)]
struct GroupArgs {
    /// Group (chat) identifier.
    #[arg(long)]
    group: String,
}

#[derive(Args, Debug)]
struct RecordArgs {
    #[command(flatten)]
    group: GroupArgs,
    /// Statement text.
    #[arg(required = true, trailing_var_arg = true)]
    text: Vec<String>,
}

async fn connect_db(database_url: &str) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder()
        .database(db)
        .timezone(cli.timezone)
        .build()
        .await?;

    match cli.command {
        Command::Record(args) => {
            let text = args.text.join(" ");
            let statement = match engine::try_parse_statement(&text) {
                Ok(statement) => statement,
                Err(StatementError::NoMatch) => {
                    eprintln!("not an IOU statement: {text}");
                    std::process::exit(1);
                }
                Err(err @ StatementError::InvalidAmount(_)) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            };

            let tx = engine
                .append_transaction(
                    &args.group.group,
                    &statement.debtor,
                    &statement.creditor,
                    statement.amount,
                    statement.reason.as_deref(),
                )
                .await?;
            println!("{}", format_recorded(&tx));
        }
        Command::Totals(args) => {
            let balances = engine.net_balances(&args.group).await?;
            println!("{}", format_balances(&balances));
        }
        Command::History(args) => {
            let history = engine.list_history(&args.group).await?;
            println!("{}", format_history(&history));
        }
    }

    engine.close().await?;
    Ok(())
}
