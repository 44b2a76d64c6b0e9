use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one of the two built-in companion personas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanionId {
    Boyfriend,
    Girlfriend,
}

impl CompanionId {
    pub const ALL: [CompanionId; 2] = [CompanionId::Boyfriend, CompanionId::Girlfriend];

    pub fn as_str(self) -> &'static str {
        match self {
            CompanionId::Boyfriend => "boyfriend",
            CompanionId::Girlfriend => "girlfriend",
        }
    }

    /// Parse either the identity ("girlfriend") or the display name ("Jenny").
    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim();
        CompanionId::ALL.into_iter().find(|id| {
            id.as_str().eq_ignore_ascii_case(needle)
                || Companion::builtin(*id).name.eq_ignore_ascii_case(needle)
        })
    }
}

impl Default for CompanionId {
    fn default() -> Self {
        CompanionId::Boyfriend
    }
}

impl fmt::Display for CompanionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emotional state reported after every companion reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Calm,
    Concerned,
    Loving,
}

impl Mood {
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Calm => "calm",
            Mood::Concerned => "concerned",
            Mood::Loving => "loving",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Calm => "😌",
            Mood::Concerned => "🤔",
            Mood::Loving => "🥰",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColors {
    pub primary: &'static str,
    pub secondary: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Companion {
    pub id: CompanionId,
    pub name: &'static str,
    pub avatar: &'static str,
    pub theme: ThemeColors,
    pub description: &'static str,
    mood: Mood,
}

impl Companion {
    /// A fresh copy of the static persona, carrying its initial mood.
    pub fn builtin(id: CompanionId) -> Self {
        match id {
            CompanionId::Boyfriend => Companion {
                id,
                name: "Allu",
                avatar: "avatars/Allu.jpeg",
                theme: ThemeColors {
                    primary: "#4F46E5",
                    secondary: "#7C3AED",
                },
                description: "A caring and attentive companion who loves deep conversations and sharing moments together.",
                mood: Mood::Loving,
            },
            CompanionId::Girlfriend => Companion {
                id,
                name: "Jenny",
                avatar: "avatars/Jenny.jpeg",
                theme: ThemeColors {
                    primary: "#EC4899",
                    secondary: "#F472B6",
                },
                description: "A vibrant and empathetic soul who brings warmth and joy to every conversation.",
                mood: Mood::Happy,
            },
        }
    }

    pub fn roster() -> Vec<Companion> {
        CompanionId::ALL.into_iter().map(Companion::builtin).collect()
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn set_mood(&mut self, mood: Mood) {
        self.mood = mood;
    }

    pub fn status_line(&self) -> String {
        format!("Feeling {} {}", self.mood, self.mood.emoji())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_companions_carry_initial_moods() {
        assert_eq!(Companion::builtin(CompanionId::Boyfriend).mood(), Mood::Loving);
        assert_eq!(Companion::builtin(CompanionId::Girlfriend).mood(), Mood::Happy);
    }

    #[test]
    fn parse_accepts_ids_and_display_names() {
        assert_eq!(CompanionId::parse("boyfriend"), Some(CompanionId::Boyfriend));
        assert_eq!(CompanionId::parse("  GIRLFRIEND "), Some(CompanionId::Girlfriend));
        assert_eq!(CompanionId::parse("jenny"), Some(CompanionId::Girlfriend));
        assert_eq!(CompanionId::parse("Allu"), Some(CompanionId::Boyfriend));
        assert_eq!(CompanionId::parse("stranger"), None);
    }

    #[test]
    fn status_line_shows_mood_and_emoji() {
        let mut companion = Companion::builtin(CompanionId::Girlfriend);
        companion.set_mood(Mood::Concerned);
        assert_eq!(companion.status_line(), "Feeling concerned 🤔");
    }

    #[test]
    fn roster_lists_both_personas_in_order() {
        let names: Vec<_> = Companion::roster().iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Allu", "Jenny"]);
    }
}
