//! Command structs

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum IouCommands {
    #[command(description = "explain how to record an IOU.")]
    Start,
    #[command(description = "display this text.")]
    Help,
    #[command(description = "show who owes whom, netted.")]
    Totals,
    #[command(description = "list every recorded IOU, newest first.")]
    History,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lowercase_commands() {
        assert_eq!(IouCommands::parse("/start", "iou_bot").unwrap(), IouCommands::Start);
        assert_eq!(IouCommands::parse("/totals", "iou_bot").unwrap(), IouCommands::Totals);
        assert_eq!(
            IouCommands::parse("/history@iou_bot", "iou_bot").unwrap(),
            IouCommands::History
        );
    }

    #[test]
    fn free_text_is_not_a_command() {
        assert!(IouCommands::parse("alice owes bob 20", "iou_bot").is_err());
        assert!(IouCommands::parse("/balance", "iou_bot").is_err());
    }

    #[test]
    fn help_lists_every_command() {
        let help = IouCommands::descriptions().to_string();
        for cmd in ["/start", "/help", "/totals", "/history"] {
            assert!(help.contains(cmd), "{cmd} missing from {help}");
        }
    }
}
