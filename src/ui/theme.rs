use crate::core::companion::Companion;
use crate::utils::color::{parse_hex_color, quantize_style, ColorDepth};
use ratatui::style::{Color, Modifier, Style};

/// Styles for one companion's screens, derived from its theme colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub title_style: Style,
    pub mood_style: Style,
    pub companion_prefix_style: Style,
    pub companion_text_style: Style,
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub system_text_style: Style,
    pub error_text_style: Style,
    pub typing_indicator_style: Style,
}

impl Theme {
    pub fn for_companion(companion: &Companion, depth: ColorDepth) -> Self {
        let primary = parse_hex_color(companion.theme.primary).unwrap_or(Color::Cyan);
        let secondary = parse_hex_color(companion.theme.secondary).unwrap_or(Color::Magenta);

        Theme {
            title_style: Style::default().fg(primary).add_modifier(Modifier::BOLD),
            mood_style: Style::default().fg(secondary),
            companion_prefix_style: Style::default().fg(primary).add_modifier(Modifier::BOLD),
            companion_text_style: Style::default(),
            user_prefix_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Gray),
            system_text_style: Style::default().fg(Color::DarkGray),
            error_text_style: Style::default().fg(Color::LightRed),
            typing_indicator_style: Style::default()
                .fg(secondary)
                .add_modifier(Modifier::ITALIC),
        }
        .quantized(depth)
    }

    /// Neutral styles for screens without an active companion.
    pub fn neutral() -> Self {
        Theme {
            title_style: Style::default().add_modifier(Modifier::BOLD),
            mood_style: Style::default().fg(Color::Gray),
            companion_prefix_style: Style::default().add_modifier(Modifier::BOLD),
            companion_text_style: Style::default(),
            user_prefix_style: Style::default().add_modifier(Modifier::BOLD),
            user_text_style: Style::default(),
            system_text_style: Style::default().fg(Color::DarkGray),
            error_text_style: Style::default().fg(Color::LightRed),
            typing_indicator_style: Style::default().add_modifier(Modifier::ITALIC),
        }
    }

    fn quantized(self, depth: ColorDepth) -> Self {
        if depth == ColorDepth::Truecolor {
            return self;
        }
        Theme {
            title_style: quantize_style(self.title_style, depth),
            mood_style: quantize_style(self.mood_style, depth),
            companion_prefix_style: quantize_style(self.companion_prefix_style, depth),
            companion_text_style: quantize_style(self.companion_text_style, depth),
            user_prefix_style: quantize_style(self.user_prefix_style, depth),
            user_text_style: quantize_style(self.user_text_style, depth),
            system_text_style: quantize_style(self.system_text_style, depth),
            error_text_style: quantize_style(self.error_text_style, depth),
            typing_indicator_style: quantize_style(self.typing_indicator_style, depth),
        }
    }
}
