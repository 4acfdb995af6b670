//! Update routing: commands first, then free text.

use teloxide::{
    RequestError,
    dispatching::{HandlerExt, UpdateHandler},
    prelude::*,
    utils::command::BotCommands,
};

use crate::{
    ConfigParameters,
    commands::IouCommands,
    replies::{self, START_TEXT},
};

/// Build the dispatcher schema.
pub(crate) fn schema() -> UpdateHandler<RequestError> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<IouCommands>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_message().endpoint(handle_message))
}

async fn handle_command(
    bot: Bot,
    cfg: ConfigParameters,
    msg: Message,
    cmd: IouCommands,
) -> ResponseResult<()> {
    let group_id = msg.chat.id.to_string();

    let reply = match cmd {
        IouCommands::Start => START_TEXT.to_string(),
        IouCommands::Help => IouCommands::descriptions().to_string(),
        IouCommands::Totals => replies::totals_reply(&cfg.engine, &group_id).await,
        IouCommands::History => replies::history_reply(&cfg.engine, &group_id).await,
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn handle_message(bot: Bot, cfg: ConfigParameters, msg: Message) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    // Unknown commands end up here too.
    if text.starts_with('/') {
        return Ok(());
    }

    let group_id = msg.chat.id.to_string();
    if let Some(reply) =
        replies::statement_reply(&cfg.engine, &group_id, text, cfg.reject_invalid_amounts).await
    {
        bot.send_message(msg.chat.id, reply).await?;
    }

    Ok(())
}
