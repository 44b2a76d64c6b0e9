//! Terminal color depth detection and RGB quantization.

use ratatui::style::{Color, Style};

pub const COLOR_OVERRIDE_VAR: &str = "CHATBUDDY_COLOR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    Truecolor,
    X256,
    X16,
}

/// Detect terminal color depth from the process environment.
pub fn detect_color_depth() -> ColorDepth {
    color_depth_from(
        std::env::var(COLOR_OVERRIDE_VAR).ok().as_deref(),
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

/// Priority: explicit override, then COLORTERM truecolor/24bit, then
/// TERM *256color, then 16 colors.
pub fn color_depth_from(
    force: Option<&str>,
    colorterm: Option<&str>,
    term: Option<&str>,
) -> ColorDepth {
    if let Some(force) = force {
        match force.trim().to_ascii_lowercase().as_str() {
            "truecolor" | "24bit" | "24-bit" => return ColorDepth::Truecolor,
            "256" | "x256" | "256color" => return ColorDepth::X256,
            "16" | "ansi" | "x16" => return ColorDepth::X16,
            _ => {}
        }
    }

    if let Some(colorterm) = colorterm {
        let s = colorterm.to_ascii_lowercase();
        if s.contains("truecolor") || s.contains("24bit") || s.contains("24-bit") {
            return ColorDepth::Truecolor;
        }
    }
    if term.is_some_and(|t| t.to_ascii_lowercase().contains("256color")) {
        return ColorDepth::X256;
    }
    ColorDepth::X16
}

/// Parse `#rgb` or `#rrggbb`.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    match hex.len() {
        3 => Some(Color::Rgb(
            channel(&hex[0..1].repeat(2))?,
            channel(&hex[1..2].repeat(2))?,
            channel(&hex[2..3].repeat(2))?,
        )),
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

/// Map a Color to the nearest representable color in the chosen depth.
pub fn quantize_color(color: Color, depth: ColorDepth) -> Color {
    match depth {
        ColorDepth::Truecolor => color,
        ColorDepth::X256 => quantize_color_256(color),
        ColorDepth::X16 => quantize_color_16(color),
    }
}

pub fn quantize_style(mut style: Style, depth: ColorDepth) -> Style {
    if let Some(fg) = style.fg {
        style.fg = Some(quantize_color(fg, depth));
    }
    if let Some(bg) = style.bg {
        style.bg = Some(quantize_color(bg, depth));
    }
    style
}

fn quantize_color_256(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Indexed(rgb_to_xterm256(r, g, b)),
        // Keep named and indexed as-is
        other => other,
    }
}

fn quantize_color_16(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => nearest_ansi16_from_rgb(r, g, b),
        Color::Indexed(i) => {
            let (r, g, b) = xterm256_to_rgb(i);
            nearest_ansi16_from_rgb(r, g, b)
        }
        other => other,
    }
}

fn nearest_ansi16_from_rgb(r: u8, g: u8, b: u8) -> Color {
    // Define 16-color palette approximations (RGB) and mapping to ratatui Color
    // 0..7 standard, 8..15 bright
    const ANSI16: &[(u8, u8, u8, Color); 16] = &[
        (0, 0, 0, Color::Black),            // 0 Black
        (205, 0, 0, Color::Red),            // 1 Red
        (0, 205, 0, Color::Green),          // 2 Green
        (205, 205, 0, Color::Yellow),       // 3 Yellow
        (0, 0, 205, Color::Blue),           // 4 Blue
        (205, 0, 205, Color::Magenta),      // 5 Magenta
        (0, 205, 205, Color::Cyan),         // 6 Cyan
        (192, 192, 192, Color::Gray),       // 7 Light gray
        (128, 128, 128, Color::DarkGray),   // 8 Dark gray (bright black)
        (255, 0, 0, Color::LightRed),       // 9 Bright red
        (0, 255, 0, Color::LightGreen),     // 10 Bright green
        (255, 255, 0, Color::LightYellow),  // 11 Bright yellow
        (92, 92, 255, Color::LightBlue),    // 12 Bright blue
        (255, 0, 255, Color::LightMagenta), // 13 Bright magenta
        (0, 255, 255, Color::LightCyan),    // 14 Bright cyan
        (255, 255, 255, Color::White),      // 15 Bright white
    ];

    let mut best = 0usize;
    let mut best_dist = u32::MAX;
    for (i, &(rr, gg, bb, _)) in ANSI16.iter().enumerate() {
        let dr = rr as i32 - r as i32;
        let dg = gg as i32 - g as i32;
        let db = bb as i32 - b as i32;
        let dist = (dr * dr + dg * dg + db * db) as u32;
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    ANSI16[best].3
}

fn rgb_to_xterm256(r: u8, g: u8, b: u8) -> u8 {
    // Try mapping to color cube 6x6x6 first, then grayscale, pick nearest overall
    let cube_index = rgb_to_xterm_cube_index(r, g, b);
    let (cr, cg, cb) = xterm256_to_rgb(cube_index);
    let cube_dist = color_dist_sq(r, g, b, cr, cg, cb);

    let gray_index = rgb_to_xterm_gray_index(r, g, b);
    let (gr, gg, gb) = xterm256_to_rgb(gray_index);
    let gray_dist = color_dist_sq(r, g, b, gr, gg, gb);

    if gray_dist < cube_dist {
        gray_index
    } else {
        cube_index
    }
}

fn rgb_to_xterm_cube_index(r: u8, g: u8, b: u8) -> u8 {
    fn map_comp(c: u8) -> u8 {
        if c < 48 {
            0
        } else if c < 114 {
            1
        } else {
            ((c - 35) / 40).min(5)
        }
    }
    let ri = map_comp(r);
    let gi = map_comp(g);
    let bi = map_comp(b);
    16 + 36 * ri + 6 * gi + bi
}

fn rgb_to_xterm_gray_index(r: u8, g: u8, b: u8) -> u8 {
    let avg = (r as u16 + g as u16 + b as u16) / 3;
    // Map [0,255] to grayscale 232..255 with thresholds around midpoints
    let idx = if avg <= 3 {
        16
    } else {
        // black corner case prefers cube sometimes
        ((avg.saturating_sub(8)) / 10) as u8
    };
    let idx = idx.min(23);
    232 + idx
}

fn color_dist_sq(r1: u8, g1: u8, b1: u8, r2: u8, g2: u8, b2: u8) -> u32 {
    let dr = r1 as i32 - r2 as i32;
    let dg = g1 as i32 - g2 as i32;
    let db = b1 as i32 - b2 as i32;
    (dr * dr + dg * dg + db * db) as u32
}

fn xterm_cube_comp(i: u8) -> u8 {
    if i == 0 {
        0
    } else {
        55 + 40 * i
    }
}

pub fn xterm256_to_rgb(i: u8) -> (u8, u8, u8) {
    match i {
        0 => (0, 0, 0),
        1 => (205, 0, 0),
        2 => (0, 205, 0),
        3 => (205, 205, 0),
        4 => (0, 0, 205),
        5 => (205, 0, 205),
        6 => (0, 205, 205),
        7 => (229, 229, 229),
        8 => (127, 127, 127),
        9 => (255, 0, 0),
        10 => (0, 255, 0),
        11 => (255, 255, 0),
        12 => (92, 92, 255),
        13 => (255, 0, 255),
        14 => (0, 255, 255),
        15 => (255, 255, 255),
        16..=231 => {
            let mut n = i - 16;
            let r = n / 36;
            n %= 36;
            let g = n / 6;
            n %= 6;
            let b = n;
            (xterm_cube_comp(r), xterm_cube_comp(g), xterm_cube_comp(b))
        }
        232..=255 => {
            let v = 8 + 10 * (i - 232);
            (v, v, v)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_terminal_hints() {
        assert_eq!(
            color_depth_from(Some("16"), Some("truecolor"), Some("xterm-256color")),
            ColorDepth::X16
        );
        assert_eq!(color_depth_from(None, Some("24bit"), None), ColorDepth::Truecolor);
        assert_eq!(
            color_depth_from(None, None, Some("xterm-256color")),
            ColorDepth::X256
        );
        assert_eq!(color_depth_from(Some("bogus"), None, Some("vt100")), ColorDepth::X16);
    }

    #[test]
    fn parses_companion_hex_colors() {
        assert_eq!(parse_hex_color("#4F46E5"), Some(Color::Rgb(0x4f, 0x46, 0xe5)));
        assert_eq!(parse_hex_color("#f0a"), Some(Color::Rgb(0xff, 0x00, 0xaa)));
        assert_eq!(parse_hex_color("EC4899"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }

    #[test]
    fn non_ascii_hex_is_rejected() {
        assert_eq!(parse_hex_color("#é1"), None);
        assert_eq!(parse_hex_color("#ab€"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn pink_theme_quantizes_to_a_magenta_family() {
        let pink = Color::Rgb(0xec, 0x48, 0x99);
        assert!(matches!(
            quantize_color(pink, ColorDepth::X16),
            Color::Magenta | Color::LightMagenta | Color::LightRed
        ));
        assert!(matches!(quantize_color(pink, ColorDepth::X256), Color::Indexed(16..=231)));
        assert_eq!(quantize_color(pink, ColorDepth::Truecolor), pink);
    }

    #[test]
    fn grays_prefer_the_grayscale_ramp() {
        assert_eq!(rgb_to_xterm256(128, 128, 128), 244);
        assert_eq!(xterm256_to_rgb(232), (8, 8, 8));
    }
}
