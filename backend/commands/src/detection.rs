/// Slash command detection: identify /commands in inbound messages.
use crate::registry::CommandRegistry;
use crate::types::{CommandInvocation, Detection};

/// Detect a slash command at the start of a message.
///
/// Telegram group chats address commands as `/cmd@botname`. A suffix naming
/// another bot makes the message not ours; a matching one (compared without
/// case) is dropped before lookup. With no `own_username` every suffix is
/// accepted. Everything after the first whitespace (newlines included) is the
/// argument text.
pub fn detect_command(text: &str, registry: &CommandRegistry, own_username: Option<&str>) -> Detection {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return Detection::NotACommand;
    }

    let (alias_part, rest) = trimmed
        .split_once(|c: char| c.is_whitespace())
        .map(|(a, r)| (a, r.trim()))
        .unwrap_or((trimmed, ""));

    let alias = match alias_part.split_once('@') {
        Some((alias, addressee)) => {
            if own_username.is_some_and(|own| !own.eq_ignore_ascii_case(addressee)) {
                return Detection::NotACommand;
            }
            alias
        }
        None => alias_part,
    };

    let Some(def) = registry.find_by_alias(alias) else {
        return Detection::Unknown(alias.to_string());
    };

    Detection::Command(CommandInvocation {
        key: def.key.clone(),
        raw_alias: alias.to_string(),
        raw_args: if def.accepts_args { rest.to_string() } else { String::new() },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Detection {
        detect_command(text, &CommandRegistry::new(), None)
    }

    fn invocation(text: &str) -> CommandInvocation {
        match detect(text) {
            Detection::Command(inv) => inv,
            other => panic!("expected a command, got {other:?}"),
        }
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(detect("hello there"), Detection::NotACommand);
        assert_eq!(detect(""), Detection::NotACommand);
    }

    #[test]
    fn unknown_commands_are_reported() {
        assert_eq!(detect("/weather today"), Detection::Unknown("/weather".into()));
    }

    #[test]
    fn query_keeps_the_whole_remainder() {
        let inv = invocation("/query  what is\nthe answer? ");
        assert_eq!(inv.key, "query");
        assert_eq!(inv.raw_args, "what is\nthe answer?");
    }

    #[test]
    fn bot_mention_suffix_is_ignored() {
        let inv = invocation("/set_voice@voxrelay_bot -id abc123");
        assert_eq!(inv.key, "set_voice");
        assert_eq!(inv.raw_alias, "/set_voice");
        assert_eq!(inv.raw_args, "-id abc123");
    }

    #[test]
    fn commands_for_other_bots_are_ignored() {
        let registry = CommandRegistry::new();
        assert_eq!(
            detect_command("/start@some_other_bot", &registry, Some("voxrelay_bot")),
            Detection::NotACommand
        );
        assert_eq!(
            detect_command("/weather@some_other_bot", &registry, Some("voxrelay_bot")),
            Detection::NotACommand
        );
        match detect_command("/start@VoxRelay_Bot", &registry, Some("voxrelay_bot")) {
            Detection::Command(inv) => assert_eq!(inv.key, "start"),
            other => panic!("expected a command, got {other:?}"),
        }
        assert!(matches!(
            detect_command("/start", &registry, Some("voxrelay_bot")),
            Detection::Command(_)
        ));
    }

    #[test]
    fn argless_commands_drop_arguments() {
        let inv = invocation("/commands please");
        assert_eq!(inv.key, "help");
        assert_eq!(inv.raw_args, "");
    }
}
