//! Slash commands available on the chat screen.

mod registry;

pub use registry::{all_commands, matching_commands, CommandInvocation};

use crate::core::companion::CompanionId;

/// Canned messages offered under the chat input.
pub const QUICK_REPLIES: [&str; 4] = [
    "How are you feeling?",
    "Tell me about your day",
    "I miss you",
    "What should we do today?",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    Switch(CompanionId),
    ListQuickReplies,
    SendQuickReply(usize),
    Profile,
    Home,
    Logout,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    ProcessAsMessage(String),
    Run(ChatCommand),
    Invalid(String),
}

pub fn process_input(input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match registry::find_command(command_name) {
        Some(command) => {
            match (command.parse)(CommandInvocation { args }) {
                Ok(parsed) => CommandResult::Run(parsed),
                Err(message) => CommandResult::Invalid(message),
            }
        }
        None => {
            let suggestions: Vec<String> = matching_commands(command_name)
                .iter()
                .map(|command| format!("/{}", command.name))
                .collect();
            if suggestions.is_empty() {
                CommandResult::Invalid(format!("Unknown command: /{command_name} (try /help)"))
            } else {
                CommandResult::Invalid(format!(
                    "Unknown command: /{command_name}. Did you mean {}?",
                    suggestions.join(", ")
                ))
            }
        }
    }
}

pub fn help_lines() -> Vec<String> {
    let mut lines = vec!["Commands:".to_string()];
    for command in all_commands() {
        for usage in command.usages {
            lines.push(format!("  {:<20} {}", usage.syntax, usage.description));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(
            process_input("hello there"),
            CommandResult::ProcessAsMessage("hello there".to_string())
        );
        assert_eq!(
            process_input("/"),
            CommandResult::ProcessAsMessage("/".to_string())
        );
    }

    #[test]
    fn switch_accepts_ids_and_names() {
        assert_eq!(
            process_input("/switch jenny"),
            CommandResult::Run(ChatCommand::Switch(CompanionId::Girlfriend))
        );
        assert_eq!(
            process_input("/SWITCH boyfriend"),
            CommandResult::Run(ChatCommand::Switch(CompanionId::Boyfriend))
        );
        assert!(matches!(process_input("/switch"), CommandResult::Invalid(_)));
        assert_eq!(
            process_input("/switch bob"),
            CommandResult::Invalid("Unknown companion: bob".to_string())
        );
    }

    #[test]
    fn quick_replies_are_one_based() {
        assert_eq!(
            process_input("/quick"),
            CommandResult::Run(ChatCommand::ListQuickReplies)
        );
        assert_eq!(
            process_input("/quick 3"),
            CommandResult::Run(ChatCommand::SendQuickReply(2))
        );
        assert_eq!(QUICK_REPLIES[2], "I miss you");
        assert!(matches!(process_input("/quick 0"), CommandResult::Invalid(_)));
        assert!(matches!(process_input("/quick 5"), CommandResult::Invalid(_)));
    }

    #[test]
    fn unknown_commands_suggest_prefix_matches() {
        assert_eq!(
            process_input("/log"),
            CommandResult::Invalid("Unknown command: /log. Did you mean /logout?".to_string())
        );
        assert_eq!(
            process_input("/dance"),
            CommandResult::Invalid("Unknown command: /dance (try /help)".to_string())
        );
    }

    #[test]
    fn help_lists_every_command() {
        let help = help_lines().join("\n");
        for command in all_commands() {
            assert!(help.contains(&format!("/{}", command.name)));
        }
    }
}
