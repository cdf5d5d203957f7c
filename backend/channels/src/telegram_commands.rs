//! Telegram command menu
//!
//! Publishes the registry to Telegram so clients can suggest `/start`,
//! `/query` and the rest while typing.

use teloxide::prelude::*;
use teloxide::types::BotCommand;
use tracing::{info, warn};
use voxrelay_commands::CommandRegistry;

/// Telegram's limit for a menu description.
const MAX_DESCRIPTION_CHARS: usize = 256;

/// One menu entry per alias, in registry order.
pub fn bot_commands(registry: &CommandRegistry) -> Vec<BotCommand> {
    registry
        .all()
        .iter()
        .flat_map(|def| {
            let description: String = def.description.chars().take(MAX_DESCRIPTION_CHARS).collect();
            def.native_names()
                .map(move |name| BotCommand::new(name, description.clone()))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Register the command menu. Failure only costs the client-side suggestions.
pub async fn publish_command_menu(bot: &Bot, registry: &CommandRegistry) {
    let commands = bot_commands(registry);
    let count = commands.len();
    match bot.set_my_commands(commands).await {
        Ok(_) => info!("Published {} Telegram commands", count),
        Err(e) => warn!("Could not publish Telegram command menu: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_alias_gets_a_menu_entry() {
        let commands = bot_commands(&CommandRegistry::new());
        let names: Vec<&str> = commands.iter().map(|c| c.command.as_str()).collect();
        assert_eq!(
            names,
            ["start", "query", "openai", "elevenlabs", "help", "commands", "voices", "set_voice"]
        );
        assert!(commands.iter().all(|c| !c.description.is_empty()));
        assert!(commands.iter().all(|c| c.description.chars().count() <= MAX_DESCRIPTION_CHARS));
    }
}
