//! Keyword heuristic that maps free-text replies onto a [`Mood`].
//!
//! Categories are scanned in a fixed priority order and the first category
//! with any keyword contained in the lowercased reply wins. Replies that match
//! nothing are treated as [`Mood::Loving`].

use crate::core::companion::Mood;

const MOOD_KEYWORDS: &[(Mood, &[&str])] = &[
    (
        Mood::Happy,
        &["joy", "happy", "excited", "wonderful", "😊", "😄", "delighted", "thrilled"],
    ),
    (
        Mood::Calm,
        &["peaceful", "calm", "relaxed", "gentle", "😌", "😊", "serene", "tranquil"],
    ),
    (
        Mood::Concerned,
        &["worried", "concerned", "care", "support", "🤔", "💭", "thoughtful"],
    ),
    (
        Mood::Loving,
        &["love", "adore", "cherish", "heart", "💕", "🥰", "affectionate", "warmth"],
    ),
];

pub const DEFAULT_MOOD: Mood = Mood::Loving;

pub fn infer_mood(reply: &str) -> Mood {
    let lowered = reply.to_lowercase();
    MOOD_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(mood, _)| *mood)
        .unwrap_or(DEFAULT_MOOD)
}
