//! User-facing reply texts.

use voxrelay_core::{Service, VoiceInfo};

use crate::registry::CommandRegistry;

pub const WELCOME: &str =
    "Bot is ready. Send your query using /query command or use /help to see available commands.";

pub const KEYS_NOT_CONFIGURED: &str = "API keys are not configured. Please use /openai {API-KEY} and /elevenlabs {API-KEY} commands to set the API keys.";

pub const GENERIC_ERROR: &str = "An error occurred while processing your query. Please try again.";

pub const QUERY_USAGE: &str = "Please add your query after the command: /query {your query}";

pub const KEY_STORE_UNAVAILABLE: &str =
    "Your API key could not be stored securely. Please contact the bot operator.";

pub const NO_VOICES: &str = "No voices available.";

pub const VOICES_ERROR: &str =
    "An error occurred while fetching the available voices. Please try again.";

pub const CATALOG_MISSING: &str = "List of voices to get ID from missing, please do /voices.";

pub const INVALID_VOICE: &str = "Invalid voice selection. Please try again.";

pub const INVALID_VOICE_ID: &str =
    "Voice IDs contain only letters and digits. Please check the ID and try again.";

pub const SET_VOICE_USAGE: &str = "Please provide a voice name or ID: /set_voice {name or -id ID}";

pub fn key_not_configured(service: Service) -> String {
    format!(
        "{} API key is not configured. Please use /{} {{API-KEY}} command to set the API key.",
        service.display_name(),
        service.command()
    )
}

pub fn key_configured(service: Service) -> String {
    format!("{} API key has been configured successfully.", service.display_name())
}

pub fn key_usage(service: Service) -> String {
    format!(
        "Please provide your {} API key: /{} {{API-KEY}}",
        service.display_name(),
        service.command()
    )
}

pub fn key_unreadable(service: Service) -> String {
    format!(
        "Your stored {} API key could not be read. Please set it again with /{} {{API-KEY}}.",
        service.display_name(),
        service.command()
    )
}

pub fn voice_list(voices: &[VoiceInfo]) -> String {
    let names: Vec<&str> = voices.iter().map(|v| v.name.as_str()).collect();
    format!(
        "Available voices:\n{}\n\nPlease do /set_voice `name`.",
        names.join("\n")
    )
}

pub fn voice_id_set(voice_id: &str) -> String {
    format!("Voice ID set to `{voice_id}` successfully.")
}

pub fn voice_selected(voice: &VoiceInfo) -> String {
    format!(
        "Voice `{}` set successfully, ID set to {}.",
        voice.name, voice.voice_id
    )
}

pub fn unknown_command(alias: &str) -> String {
    format!("Unknown command {alias}. Use /help to see available commands.")
}

pub fn help(registry: &CommandRegistry) -> String {
    let mut text = String::from("Available commands:\n");
    for def in registry.all() {
        text.push_str(&format!("{}: {}\n", def.usage, def.description));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reply_names_the_fixing_command() {
        assert_eq!(
            key_not_configured(Service::ElevenLabs),
            "ElevenLabs API key is not configured. Please use /elevenlabs {API-KEY} command to set the API key."
        );
        assert!(key_unreadable(Service::OpenAi).contains("/openai"));
    }

    #[test]
    fn help_lists_every_usage() {
        let registry = CommandRegistry::new();
        let text = help(&registry);
        for def in registry.all() {
            assert!(text.contains(&def.usage), "missing {}", def.usage);
        }
        assert!(text.contains("/help or /commands"));
    }

    #[test]
    fn voice_list_is_one_name_per_line() {
        let voices = [VoiceInfo::new("a", "Adam"), VoiceInfo::new("b", "Bella")];
        assert_eq!(
            voice_list(&voices),
            "Available voices:\nAdam\nBella\n\nPlease do /set_voice `name`."
        );
    }
}
