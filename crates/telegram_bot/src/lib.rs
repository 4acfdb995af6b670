//! Telegram bot.
//!
//! The bot is the messaging side of the IOU tracker: every chat is a group,
//! free-text messages that look like `alice owes bob 20 for lunch` are
//! recorded, and `/totals` or `/history` render the group's ledger.

use std::sync::Arc;

use engine::Engine;
use teloxide::{prelude::*, utils::command::BotCommands};

mod commands;
mod handlers;
mod replies;

use commands::IouCommands;

#[derive(Clone)]
pub struct ConfigParameters {
    engine: Arc<Engine>,
    reject_invalid_amounts: bool,
}

pub struct Bot {
    token: String,
    engine: Arc<Engine>,
    reject_invalid_amounts: bool,
}

impl Bot {
    pub fn new(token: &str, engine: Arc<Engine>, reject_invalid_amounts: bool) -> Self {
        Self {
            token: token.to_string(),
            engine,
            reject_invalid_amounts,
        }
    }

    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);
        if let Err(err) = bot.set_my_commands(IouCommands::bot_commands()).await {
            tracing::warn!("failed to register bot commands: {err}");
        }

        let parameters = ConfigParameters {
            engine: Arc::clone(&self.engine),
            reject_invalid_amounts: self.reject_invalid_amounts,
        };

        Dispatcher::builder(bot, handlers::schema())
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::warn!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

#[derive(Default)]
pub struct BotBuilder {
    token: String,
    engine: Option<Arc<Engine>>,
    reject_invalid_amounts: bool,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    pub fn engine(mut self, engine: Arc<Engine>) -> BotBuilder {
        self.engine = Some(engine);
        self
    }

    /// Reply with a rejection when an IOU has an unusable amount instead of
    /// staying silent.
    pub fn reject_invalid_amounts(mut self, reject: bool) -> BotBuilder {
        self.reject_invalid_amounts = reject;
        self
    }

    pub fn build(self) -> Result<Bot, String> {
        tracing::info!("Initializing telegram bot...");
        if self.token.trim().is_empty() {
            return Err("telegram token must not be empty".to_string());
        }
        let engine = self
            .engine
            .ok_or_else(|| "telegram bot requires an engine".to_string())?;
        Ok(Bot::new(&self.token, engine, self.reject_invalid_amounts))
    }
}
