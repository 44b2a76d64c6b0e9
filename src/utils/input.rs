//! Cleanup for text pasted into the line editor.

/// Make pasted text safe to echo on a single terminal row.
///
/// Tabs become one space, `\r\n` and lone `\r` become `\n`, and other
/// control characters plus byte-order marks are dropped.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\t' => sanitized.push(' '),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                sanitized.push('\n');
            }
            '\n' => sanitized.push('\n'),
            '\u{feff}' => {}
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }

    sanitized
}
