use super::personality::personality_for;
use crate::core::companion::CompanionId;
use crate::core::message::{Message, Sender};

/// One prior turn as seen by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTurn {
    pub role: Sender,
    pub text: String,
}

impl PromptTurn {
    pub fn new(role: Sender, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(Sender::Ai, text)
    }
}

impl From<&Message> for PromptTurn {
    fn from(message: &Message) -> Self {
        Self::new(message.sender(), message.content())
    }
}

const RESPONSE_GUIDELINES: &str = "\
Respond naturally to the following message, keeping in mind:
1. Keep responses concise (2-3 sentences)
2. Use appropriate emojis occasionally
3. Show genuine interest and emotional awareness
4. Stay true to your personality while being supportive
5. Express your current mood (happy, calm, concerned, or loving) through your response";

/// Assemble the persona-conditioned prompt for the newest turn in `history`.
///
/// Every turn except the last is flattened into the "Previous context" block;
/// the last turn becomes the "User's message". An empty history yields an
/// empty user message.
pub fn build_prompt(
    history: &[PromptTurn],
    companion: CompanionId,
    companion_name: &str,
) -> String {
    let personality = personality_for(companion);
    let (context, newest) = match history.split_last() {
        Some((newest, earlier)) => (
            earlier
                .iter()
                .map(|turn| turn.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            newest.text.as_str(),
        ),
        None => (String::new(), ""),
    };

    format!(
        "You are {companion_name}, an AI {role} who is {traits}\n\n\
         Your interests include {interests}\n\n\
         Your communication style is {style}\n\n\
         {RESPONSE_GUIDELINES}\n\n\
         Previous context: {context}\n\
         User's message: {newest}",
        role = companion.as_str(),
        traits = personality.traits,
        interests = personality.interests,
        style = personality.communication_style,
    )
}
