//! Builds the styled lines for each screen and writes them to the terminal.

use std::io::{self, Write};

use chrono::Local;
use ratatui::crossterm::{
    queue,
    style::{Attribute, Color as CColor, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::auth::UserProfile;
use crate::commands::QUICK_REPLIES;
use crate::core::companion::Companion;
use crate::core::message::Message;
use crate::ui::theme::Theme;

const RULE_CHAR: &str = "━";
const COMPANION_TAGLINE: &str = "AI Companion";

pub fn selection_screen(companions: &[(Companion, Theme)]) -> Vec<Line<'static>> {
    let neutral = Theme::neutral();
    let mut lines = vec![
        Line::default(),
        Line::styled("💞 Choose your companion", neutral.title_style),
        rule(26, neutral.system_text_style),
    ];
    for (index, (companion, theme)) in companions.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::raw(format!("  {}. ", index + 1)),
            Span::styled(companion.name.to_string(), theme.title_style),
            Span::styled(format!("  {COMPANION_TAGLINE}"), theme.mood_style),
        ]));
        lines.push(Line::styled(
            format!("     {}", companion.description),
            neutral.system_text_style,
        ));
    }
    lines.push(Line::default());
    lines
}

pub fn chat_header(companion: &Companion, theme: &Theme) -> Vec<Line<'static>> {
    let title = format!(" {} ", companion.name);
    let width = UnicodeWidthStr::width(title.as_str()) + 8;
    vec![
        Line::default(),
        Line::from(vec![
            Span::styled(RULE_CHAR.repeat(4), theme.system_text_style),
            Span::styled(title, theme.title_style),
            Span::styled(RULE_CHAR.repeat(4), theme.system_text_style),
        ]),
        Line::styled(companion.status_line(), theme.mood_style),
        rule(width, theme.system_text_style),
        Line::styled(
            "Type a message, /quick for ideas, /help for commands.",
            theme.system_text_style,
        ),
    ]
}

/// One transcript entry, prefixed with the speaker and local time.
pub fn message_lines(
    message: &Message,
    companion_name: &str,
    user_name: &str,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let (speaker, prefix_style, text_style) = if message.is_user() {
        (user_name, theme.user_prefix_style, theme.user_text_style)
    } else {
        (
            companion_name,
            theme.companion_prefix_style,
            theme.companion_text_style,
        )
    };
    let stamp = message
        .timestamp()
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string();

    let mut content = message.content().lines();
    let first = content.next().unwrap_or_default().to_string();
    let prefix = format!("{speaker}: ");
    let indent = " ".repeat(UnicodeWidthStr::width(prefix.as_str()));

    let mut lines = vec![Line::from(vec![
        Span::styled(prefix, prefix_style),
        Span::styled(first, text_style),
        Span::styled(format!("  {stamp}"), theme.system_text_style),
    ])];
    lines.extend(
        content.map(|rest| Line::styled(format!("{indent}{rest}"), text_style)),
    );
    lines
}

pub fn typing_indicator(companion: &Companion, theme: &Theme) -> Line<'static> {
    Line::styled(
        format!("{} is typing…", companion.name),
        theme.typing_indicator_style,
    )
}

pub fn mood_update(companion: &Companion, theme: &Theme) -> Line<'static> {
    Line::styled(
        format!(
            "{} is feeling {} {}",
            companion.name,
            companion.mood(),
            companion.mood().emoji()
        ),
        theme.mood_style,
    )
}

pub fn quick_replies(theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![Line::styled("Quick replies:", theme.system_text_style)];
    lines.extend(QUICK_REPLIES.iter().enumerate().map(|(index, text)| {
        Line::from(vec![
            Span::styled(format!("  /quick {} ", index + 1), theme.system_text_style),
            Span::raw(text.to_string()),
        ])
    }));
    lines
}

pub fn profile_card(profile: &UserProfile, theme: &Theme) -> Vec<Line<'static>> {
    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {label:<14}"), theme.system_text_style),
            Span::raw(value),
        ])
    };
    let or_dash = |value: &str| {
        if value.trim().is_empty() {
            "—".to_string()
        } else {
            value.to_string()
        }
    };
    let age = if profile.age == 0 {
        "—".to_string()
    } else {
        profile.age.to_string()
    };

    vec![
        Line::styled(format!("👤 {}", profile.name), theme.title_style),
        field("Email", or_dash(&profile.email)),
        field("Age", age),
        field("Gender", or_dash(&profile.gender)),
        field("Interests", or_dash(&profile.interests.join(", "))),
        field("Bio", or_dash(&profile.bio)),
        field(
            "Member since",
            profile.created_at.with_timezone(&Local).format("%B %-d, %Y").to_string(),
        ),
    ]
}

pub fn help(theme: &Theme) -> Vec<Line<'static>> {
    crate::commands::help_lines()
        .into_iter()
        .map(|line| Line::styled(line, theme.system_text_style))
        .collect()
}

pub fn info(text: impl Into<String>, theme: &Theme) -> Line<'static> {
    Line::styled(text.into(), theme.system_text_style)
}

pub fn error(text: impl std::fmt::Display, theme: &Theme) -> Line<'static> {
    Line::styled(format!("❌ {text}"), theme.error_text_style)
}

fn rule(width: usize, style: Style) -> Line<'static> {
    Line::styled(RULE_CHAR.repeat(width), style)
}

/// Write `lines` at the start of the current row.
///
/// Each line clears what was drawn there before and ends with CRLF, so the
/// output stays aligned while the input editor holds the terminal in raw mode.
pub fn emit(lines: &[Line<'_>]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for line in lines {
        queue!(out, Print("\r\x1b[K"))?;
        for span in &line.spans {
            let style = line.style.patch(span.style);
            write_styled(&mut out, span.content.as_ref(), style)?;
        }
        queue!(out, Print("\r\n"))?;
    }
    out.flush()
}

fn write_styled(out: &mut impl Write, text: &str, style: Style) -> io::Result<()> {
    let styled = style.fg.is_some() || !style.add_modifier.is_empty();
    if let Some(fg) = style.fg {
        queue!(out, SetForegroundColor(CColor::from(fg)))?;
    }
    for (modifier, attribute) in [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::DIM, Attribute::Dim),
    ] {
        if style.add_modifier.contains(modifier) {
            queue!(out, SetAttribute(attribute))?;
        }
    }
    queue!(out, Print(text))?;
    if styled {
        queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    }
    Ok(())
}
