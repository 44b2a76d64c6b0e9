use super::ChatCommand;
use crate::core::companion::CompanionId;

pub type CommandParser = fn(CommandInvocation<'_>) -> Result<ChatCommand, String>;

pub struct CommandUsage {
    pub syntax: &'static str,
    pub description: &'static str,
}

pub struct Command {
    pub name: &'static str,
    pub usages: &'static [CommandUsage],
    pub parse: CommandParser,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

/// Commands whose name starts with `prefix`, for "did you mean" hints.
pub fn matching_commands(prefix: &str) -> Vec<&'static Command> {
    let prefix = prefix.to_ascii_lowercase();
    all_commands()
        .iter()
        .filter(|command| command.name.starts_with(&prefix))
        .collect()
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usages: &[CommandUsage {
            syntax: "/help",
            description: "Show available commands.",
        }],
        parse: parse_help,
    },
    Command {
        name: "switch",
        usages: &[CommandUsage {
            syntax: "/switch <companion>",
            description: "Start a new conversation with another companion (boyfriend, girlfriend, Allu, Jenny).",
        }],
        parse: parse_switch,
    },
    Command {
        name: "quick",
        usages: &[
            CommandUsage {
                syntax: "/quick",
                description: "List quick replies.",
            },
            CommandUsage {
                syntax: "/quick <n>",
                description: "Send quick reply number n.",
            },
        ],
        parse: parse_quick,
    },
    Command {
        name: "profile",
        usages: &[CommandUsage {
            syntax: "/profile",
            description: "Show your profile.",
        }],
        parse: parse_profile,
    },
    Command {
        name: "home",
        usages: &[CommandUsage {
            syntax: "/home",
            description: "Go back to the companion cards.",
        }],
        parse: parse_home,
    },
    Command {
        name: "logout",
        usages: &[CommandUsage {
            syntax: "/logout",
            description: "Sign out and return to the companion cards.",
        }],
        parse: parse_logout,
    },
    Command {
        name: "quit",
        usages: &[CommandUsage {
            syntax: "/quit",
            description: "Leave ChatBuddy.",
        }],
        parse: parse_quit,
    },
];

fn parse_help(_: CommandInvocation<'_>) -> Result<ChatCommand, String> {
    Ok(ChatCommand::Help)
}

fn parse_profile(_: CommandInvocation<'_>) -> Result<ChatCommand, String> {
    Ok(ChatCommand::Profile)
}

fn parse_home(_: CommandInvocation<'_>) -> Result<ChatCommand, String> {
    Ok(ChatCommand::Home)
}

fn parse_logout(_: CommandInvocation<'_>) -> Result<ChatCommand, String> {
    Ok(ChatCommand::Logout)
}

fn parse_quit(_: CommandInvocation<'_>) -> Result<ChatCommand, String> {
    Ok(ChatCommand::Quit)
}

fn parse_switch(invocation: CommandInvocation<'_>) -> Result<ChatCommand, String> {
    if invocation.args.is_empty() {
        return Err("Usage: /switch <companion>".to_string());
    }
    CompanionId::parse(invocation.args)
        .map(ChatCommand::Switch)
        .ok_or_else(|| format!("Unknown companion: {}", invocation.args))
}

fn parse_quick(invocation: CommandInvocation<'_>) -> Result<ChatCommand, String> {
    if invocation.args.is_empty() {
        return Ok(ChatCommand::ListQuickReplies);
    }
    let count = super::QUICK_REPLIES.len();
    match invocation.args.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Ok(ChatCommand::SendQuickReply(n - 1)),
        _ => Err(format!("Pick a quick reply between 1 and {count}")),
    }
}
