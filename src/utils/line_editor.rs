//! Single-line terminal editor used for chat input and credential prompts.

use crate::utils::input::sanitize_text_input;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEditorState {
    pub text: String,
    pub cursor: usize,
}

impl LineEditorState {
    pub fn with_text(text: String) -> Self {
        let cursor = text.chars().count();
        Self { text, cursor }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskMode {
    None,
    /// Every character is drawn as `*` (passwords).
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEditorOptions {
    pub initial_text: String,
    pub allow_cancel: bool,
    pub mask_mode: MaskMode,
}

impl Default for LineEditorOptions {
    fn default() -> Self {
        Self {
            initial_text: String::new(),
            allow_cancel: true,
            mask_mode: MaskMode::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEditAction {
    Insert(char),
    Backspace,
    Delete,
    MoveLeft,
    MoveRight,
    MoveStart,
    MoveEnd,
    DeleteToEnd,
    DeleteWord,
    ClearAll,
    Paste(String),
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEditOutcome {
    Continue { redraw: bool },
    Submit(String),
    Cancelled,
}

#[derive(Debug)]
pub enum LineEditorError {
    /// Esc or Ctrl+C while cancelling was allowed.
    Cancelled,
    Terminal(io::Error),
}

impl LineEditorError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LineEditorError::Cancelled)
    }
}

impl fmt::Display for LineEditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineEditorError::Cancelled => write!(f, "Cancelled by user"),
            LineEditorError::Terminal(err) => write!(f, "Terminal error: {err}"),
        }
    }
}

impl std::error::Error for LineEditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LineEditorError::Cancelled => None,
            LineEditorError::Terminal(err) => Some(err),
        }
    }
}

impl From<io::Error> for LineEditorError {
    fn from(err: io::Error) -> Self {
        LineEditorError::Terminal(err)
    }
}

pub fn prompt_line_editor(
    prompt: &str,
    options: &LineEditorOptions,
) -> Result<String, LineEditorError> {
    prompt_line_editor_with_redraw(prompt, options, None)
}

/// Like [`prompt_line_editor`], but redraws the prompt whenever `redraw` is
/// raised by another thread that printed over the input line.
pub fn prompt_line_editor_with_redraw(
    prompt: &str,
    options: &LineEditorOptions,
    redraw: Option<&AtomicBool>,
) -> Result<String, LineEditorError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, event::EnableBracketedPaste)?;

    let result = (|| -> Result<String, LineEditorError> {
        let mut state = LineEditorState::with_text(options.initial_text.clone());
        let mut needs_redraw = true;

        loop {
            if redraw.is_some_and(|flag| flag.swap(false, Ordering::AcqRel)) {
                needs_redraw = true;
            }
            if needs_redraw {
                redraw_line(prompt, &state, options)?;
                needs_redraw = false;
            }

            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = map_key_event_to_action(&key, options) {
                            match apply_line_edit_action(&mut state, action) {
                                LineEditOutcome::Continue { redraw } => needs_redraw = redraw,
                                LineEditOutcome::Submit(value) => break Ok(value),
                                LineEditOutcome::Cancelled => {
                                    break Err(LineEditorError::Cancelled);
                                }
                            }
                        }
                    }
                    Event::Paste(text) => {
                        let sanitized = sanitize_text_input(&text);
                        match apply_line_edit_action(&mut state, LineEditAction::Paste(sanitized)) {
                            LineEditOutcome::Continue { redraw } => needs_redraw = redraw,
                            LineEditOutcome::Submit(value) => break Ok(value),
                            LineEditOutcome::Cancelled => {
                                break Err(LineEditorError::Cancelled);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    })();

    let restore = disable_raw_mode().and_then(|_| execute!(stdout, event::DisableBracketedPaste));
    println!();

    match (result, restore) {
        (Ok(_), Err(err)) => Err(err.into()),
        (result, _) => result,
    }
}

fn redraw_line(
    prompt: &str,
    state: &LineEditorState,
    options: &LineEditorOptions,
) -> io::Result<()> {
    let display_text = display_text(state, options);
    let prefix = display_prefix_up_to_cursor(state, options);
    let prompt_width = UnicodeWidthStr::width(prompt);
    let prefix_width = UnicodeWidthStr::width(prefix.as_str());

    print!("\r\x1b[K{}{}", prompt, display_text);

    let cursor_columns = prompt_width + prefix_width;
    if cursor_columns > 0 {
        print!("\r\x1b[{}C", cursor_columns);
    } else {
        print!("\r");
    }

    io::stdout().flush()
}

fn display_text(state: &LineEditorState, options: &LineEditorOptions) -> String {
    match options.mask_mode {
        MaskMode::None => state.text.clone(),
        MaskMode::Hidden => "*".repeat(state.text.chars().count()),
    }
}

fn display_prefix_up_to_cursor(state: &LineEditorState, options: &LineEditorOptions) -> String {
    let display = display_text(state, options);
    display.chars().take(state.cursor).collect()
}

pub fn map_key_event_to_action(
    key: &event::KeyEvent,
    options: &LineEditorOptions,
) -> Option<LineEditAction> {
    match key.code {
        KeyCode::Enter => Some(LineEditAction::Submit),
        KeyCode::Esc if options.allow_cancel => Some(LineEditAction::Cancel),
        KeyCode::Backspace => Some(LineEditAction::Backspace),
        KeyCode::Delete => Some(LineEditAction::Delete),
        KeyCode::Left => Some(LineEditAction::MoveLeft),
        KeyCode::Right => Some(LineEditAction::MoveRight),
        KeyCode::Home => Some(LineEditAction::MoveStart),
        KeyCode::End => Some(LineEditAction::MoveEnd),
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(LineEditAction::MoveStart)
        }
        KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(LineEditAction::MoveEnd)
        }
        KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(LineEditAction::DeleteToEnd)
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(LineEditAction::DeleteWord)
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(LineEditAction::ClearAll)
        }
        KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) && options.allow_cancel =>
        {
            Some(LineEditAction::Cancel)
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if c == '\n' || c == '\r' {
                Some(LineEditAction::Submit)
            } else {
                Some(LineEditAction::Insert(c))
            }
        }
        _ => None,
    }
}

pub fn apply_line_edit_action(
    state: &mut LineEditorState,
    action: LineEditAction,
) -> LineEditOutcome {
    match action {
        LineEditAction::Insert(c) => {
            insert_char_at_cursor(&mut state.text, state.cursor, c);
            state.cursor += 1;
            LineEditOutcome::Continue { redraw: true }
        }
        LineEditAction::Backspace => {
            if state.cursor == 0 {
                LineEditOutcome::Continue { redraw: false }
            } else {
                let removed = remove_char_before_cursor(&mut state.text, state.cursor);
                if removed {
                    state.cursor = state.cursor.saturating_sub(1);
                    LineEditOutcome::Continue { redraw: true }
                } else {
                    LineEditOutcome::Continue { redraw: false }
                }
            }
        }
        LineEditAction::Delete => {
            let removed = remove_char_at_cursor(&mut state.text, state.cursor);
            if removed {
                LineEditOutcome::Continue { redraw: true }
            } else {
                LineEditOutcome::Continue { redraw: false }
            }
        }
        LineEditAction::MoveLeft => {
            if state.cursor > 0 {
                state.cursor -= 1;
                LineEditOutcome::Continue { redraw: true }
            } else {
                LineEditOutcome::Continue { redraw: false }
            }
        }
        LineEditAction::MoveRight => {
            let len = state.text.chars().count();
            if state.cursor < len {
                state.cursor += 1;
                LineEditOutcome::Continue { redraw: true }
            } else {
                LineEditOutcome::Continue { redraw: false }
            }
        }
        LineEditAction::MoveStart => {
            if state.cursor == 0 {
                LineEditOutcome::Continue { redraw: false }
            } else {
                state.cursor = 0;
                LineEditOutcome::Continue { redraw: true }
            }
        }
        LineEditAction::MoveEnd => {
            let end = state.text.chars().count();
            if state.cursor == end {
                LineEditOutcome::Continue { redraw: false }
            } else {
                state.cursor = end;
                LineEditOutcome::Continue { redraw: true }
            }
        }
        LineEditAction::DeleteToEnd => {
            let byte_idx = char_to_byte_index(&state.text, state.cursor);
            if byte_idx >= state.text.len() {
                LineEditOutcome::Continue { redraw: false }
            } else {
                state.text.truncate(byte_idx);
                LineEditOutcome::Continue { redraw: true }
            }
        }
        LineEditAction::DeleteWord => {
            if state.cursor == 0 {
                LineEditOutcome::Continue { redraw: false }
            } else {
                let new_cursor = delete_word_before_cursor(&mut state.text, state.cursor);
                state.cursor = new_cursor;
                LineEditOutcome::Continue { redraw: true }
            }
        }
        LineEditAction::ClearAll => {
            if state.text.is_empty() {
                LineEditOutcome::Continue { redraw: false }
            } else {
                state.text.clear();
                state.cursor = 0;
                LineEditOutcome::Continue { redraw: true }
            }
        }
        LineEditAction::Paste(text) => {
            let before_newline = text.split('\n').next().unwrap_or("");
            if !before_newline.is_empty() {
                insert_str_at_cursor(&mut state.text, state.cursor, before_newline);
                state.cursor += before_newline.chars().count();
            }
            if text.contains('\n') {
                LineEditOutcome::Submit(state.text.clone())
            } else {
                LineEditOutcome::Continue {
                    redraw: !before_newline.is_empty(),
                }
            }
        }
        LineEditAction::Submit => LineEditOutcome::Submit(state.text.clone()),
        LineEditAction::Cancel => LineEditOutcome::Cancelled,
    }
}

fn insert_char_at_cursor(input: &mut String, cursor: usize, c: char) {
    let byte_idx = char_to_byte_index(input, cursor);
    input.insert(byte_idx, c);
}

fn insert_str_at_cursor(input: &mut String, cursor: usize, text: &str) {
    let byte_idx = char_to_byte_index(input, cursor);
    input.insert_str(byte_idx, text);
}

fn remove_char_before_cursor(input: &mut String, cursor: usize) -> bool {
    if cursor == 0 {
        return false;
    }
    let end = char_to_byte_index(input, cursor);
    let start = char_to_byte_index(input, cursor - 1);
    input.replace_range(start..end, "");
    true
}

fn remove_char_at_cursor(input: &mut String, cursor: usize) -> bool {
    let start = char_to_byte_index(input, cursor);
    if start >= input.len() {
        return false;
    }
    let end = char_to_byte_index(input, cursor + 1);
    input.replace_range(start..end, "");
    true
}

fn delete_word_before_cursor(input: &mut String, cursor: usize) -> usize {
    let mut chars: Vec<char> = input.chars().collect();
    let mut idx = cursor.min(chars.len());
    while idx > 0 && chars[idx - 1] == ' ' {
        idx -= 1;
    }
    while idx > 0 && chars[idx - 1] != ' ' {
        idx -= 1;
    }
    chars.drain(idx..cursor.min(chars.len()));
    *input = chars.into_iter().collect();
    idx
}

fn char_to_byte_index(input: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }
    input
        .char_indices()
        .nth(char_index)
        .map(|(idx, _)| idx)
        .unwrap_or(input.len())
}
