/// Slash command registry for the bot's built-in commands.
use crate::types::CommandDef;

fn command(key: &str, usage: &str, description: &str, aliases: &[&str], accepts_args: bool) -> CommandDef {
    CommandDef {
        key: key.to_string(),
        usage: usage.to_string(),
        description: description.to_string(),
        text_aliases: aliases.iter().map(|s| s.to_string()).collect(),
        accepts_args,
    }
}

/// Build the built-in command list, in help order.
pub fn builtin_commands() -> Vec<CommandDef> {
    vec![
        command(
            "start",
            "/start",
            "Start the bot and receive a welcome message",
            &["/start"],
            false,
        ),
        command(
            "query",
            "/query {your query}",
            "Process your query and generate a response",
            &["/query"],
            true,
        ),
        command(
            "openai",
            "/openai {OPENAI-API-KEY}",
            "Set your OpenAI API key",
            &["/openai"],
            true,
        ),
        command(
            "elevenlabs",
            "/elevenlabs {ELEVEN-LABS-API-KEY}",
            "Set your ElevenLabs API key",
            &["/elevenlabs"],
            true,
        ),
        command(
            "help",
            "/help or /commands",
            "Show the available commands and their descriptions",
            &["/help", "/commands"],
            false,
        ),
        command(
            "voices",
            "/voices",
            "Get a list of available voices from ElevenLabs to choose from",
            &["/voices"],
            false,
        ),
        command(
            "set_voice",
            "/set_voice {name or -id ID}",
            "Set the voice ID for generating the response. Use the `-id` flag followed by the ID if you want to use an ID instead of the voice name.",
            &["/set_voice"],
            true,
        ),
    ]
}

#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: Vec<CommandDef>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self { commands: builtin_commands() }
    }

    pub fn all(&self) -> &[CommandDef] {
        &self.commands
    }

    /// Look up by slash alias, ignoring ASCII case.
    pub fn find_by_alias(&self, alias: &str) -> Option<&CommandDef> {
        self.commands
            .iter()
            .find(|c| c.text_aliases.iter().any(|a| a.eq_ignore_ascii_case(alias)))
    }

    pub fn find_by_key(&self, key: &str) -> Option<&CommandDef> {
        self.commands.iter().find(|c| c.key == key)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_and_commands_share_a_definition() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.find_by_alias("/commands").unwrap().key, "help");
        assert_eq!(registry.find_by_alias("/HELP").unwrap().key, "help");
        assert!(registry.find_by_alias("/status").is_none());
    }

    #[test]
    fn every_key_is_unique_and_aliased() {
        let registry = CommandRegistry::new();
        for def in registry.all() {
            assert!(!def.text_aliases.is_empty(), "{} has no alias", def.key);
            assert!(def.text_aliases.iter().all(|a| a.starts_with('/')));
            assert_eq!(registry.find_by_key(&def.key).unwrap().usage, def.usage);
        }
        assert_eq!(registry.all().len(), 7);
    }

    #[test]
    fn native_names_drop_the_slash() {
        let registry = CommandRegistry::new();
        let names: Vec<_> = registry.find_by_key("help").unwrap().native_names().collect();
        assert_eq!(names, ["help", "commands"]);
    }
}
