//! Interactive loop driving the companion selection, auth and chat screens.

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ratatui::text::Line;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};

use crate::auth::ui::{
    prompt_auth_menu, prompt_login_details, prompt_sign_up_details, AuthMenuSelection, UiError,
};
use crate::auth::SignUpOutcome;
use crate::commands::{process_input, ChatCommand, CommandResult, QUICK_REPLIES};
use crate::core::app::{App, AppError};
use crate::core::companion::{Companion, CompanionId};
use crate::core::conversation::{ConversationError, TurnOutcome};
use crate::core::screen::Screen;
use crate::generator::service::{GenerationEvent, GenerationService};
use crate::ui::render;
use crate::ui::theme::Theme;
use crate::utils::color::{detect_color_depth, ColorDepth};
use crate::utils::line_editor::{
    prompt_line_editor, prompt_line_editor_with_redraw, LineEditorError, LineEditorOptions,
};
use crate::utils::logging::TranscriptLog;

const CURSOR_UP: &str = "\x1b[1A";

type GenerationReceiver = mpsc::UnboundedReceiver<(GenerationEvent, u64)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChoice {
    Companion(CompanionId),
    Login,
    Logout,
    Quit,
    Invalid(String),
}

/// Interpret input on the companion cards: a card number, a companion name,
/// or one of the login / logout / quit shortcuts.
pub fn parse_selection(input: &str) -> SelectionChoice {
    let trimmed = input.trim();
    if let Ok(index) = trimmed.parse::<usize>() {
        return match CompanionId::ALL.get(index.wrapping_sub(1)) {
            Some(id) => SelectionChoice::Companion(*id),
            None => SelectionChoice::Invalid(format!(
                "Pick a companion between 1 and {}",
                CompanionId::ALL.len()
            )),
        };
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "l" | "login" => SelectionChoice::Login,
        "logout" => SelectionChoice::Logout,
        "q" | "quit" | "exit" => SelectionChoice::Quit,
        "" => SelectionChoice::Invalid("Selection cannot be empty".to_string()),
        other => CompanionId::parse(other)
            .map(SelectionChoice::Companion)
            .unwrap_or_else(|| SelectionChoice::Invalid(format!("Unknown companion: {trimmed}"))),
    }
}

pub async fn run_chat(
    mut app: App,
    initial_companion: Option<CompanionId>,
) -> Result<(), Box<dyn Error>> {
    let depth = detect_color_depth();
    let (service, mut events) = GenerationService::new();

    if let Some(companion) = initial_companion {
        app.select_companion(companion);
    }

    loop {
        let control = match app.screen() {
            Screen::SelectingCompanion => selection_screen(&mut app, depth).await?,
            Screen::AwaitingAuth => auth_screen(&mut app).await?,
            Screen::Chatting => chat_screen(&mut app, &service, &mut events, depth).await?,
        };
        if control == LoopControl::Quit {
            break;
        }
    }

    render::emit(&[render::info("Goodbye! 👋", &Theme::neutral())])?;
    Ok(())
}

async fn read_line(
    prompt: &'static str,
) -> Result<Result<String, LineEditorError>, Box<dyn Error>> {
    let result = spawn_blocking(move || prompt_line_editor(prompt, &LineEditorOptions::default()))
        .await?;
    Ok(result)
}

fn spawn_chat_input(
    prompt: String,
    initial_text: String,
    redraw: Arc<AtomicBool>,
) -> JoinHandle<Result<String, LineEditorError>> {
    spawn_blocking(move || {
        let options = LineEditorOptions {
            initial_text,
            ..LineEditorOptions::default()
        };
        prompt_line_editor_with_redraw(&prompt, &options, Some(&redraw))
    })
}

async fn selection_screen(app: &mut App, depth: ColorDepth) -> Result<LoopControl, Box<dyn Error>> {
    let neutral = Theme::neutral();
    let roster: Vec<(Companion, Theme)> = Companion::roster()
        .into_iter()
        .map(|companion| {
            let theme = Theme::for_companion(&companion, depth);
            (companion, theme)
        })
        .collect();

    let mut lines = render::selection_screen(&roster);
    let hint = match app.profile() {
        Some(profile) => format!("Signed in as {}. Type a number, 'logout' or 'q'.", profile.name),
        None => "Type a number to pick a companion, 'l' to log in, or 'q' to quit.".to_string(),
    };
    lines.push(render::info(hint, &neutral));
    render::emit(&lines)?;

    loop {
        let input = match read_line("Companion: ").await? {
            Ok(input) => input,
            Err(err) if err.is_cancelled() => return Ok(LoopControl::Quit),
            Err(err) => return Err(err.into()),
        };

        match parse_selection(&input) {
            SelectionChoice::Companion(id) => {
                app.select_companion(id);
                return Ok(LoopControl::Continue);
            }
            SelectionChoice::Login if app.is_signed_in() => {
                render::emit(&[render::info("You are already signed in.", &neutral)])?;
            }
            SelectionChoice::Login => {
                app.request_login();
                return Ok(LoopControl::Continue);
            }
            SelectionChoice::Logout => {
                if let Err(err) = app.log_out().await {
                    render::emit(&[render::error(err, &neutral)])?;
                }
                render::emit(&[render::info("Signed out.", &neutral)])?;
                return Ok(LoopControl::Continue);
            }
            SelectionChoice::Quit => return Ok(LoopControl::Quit),
            SelectionChoice::Invalid(message) => {
                render::emit(&[render::error(message, &neutral)])?;
            }
        }
    }
}

async fn auth_screen(app: &mut App) -> Result<LoopControl, Box<dyn Error>> {
    let neutral = Theme::neutral();
    let companion_name = app.companion().name;

    let selection = spawn_blocking(move || prompt_auth_menu(Some(companion_name))).await?;
    let outcome = match selection {
        Ok(AuthMenuSelection::Login) => login(app).await,
        Ok(AuthMenuSelection::SignUp) => sign_up(app).await,
        Ok(AuthMenuSelection::Back) | Err(UiError::Cancelled) => {
            app.go_home();
            Ok(())
        }
        Err(err) => Err(err),
    };

    match outcome {
        Ok(()) => {}
        Err(UiError::Cancelled) => {}
        Err(UiError::Terminal(err)) => return Err(err.into()),
        Err(err @ UiError::Invalid(_)) => render::emit(&[render::error(err, &neutral)])?,
    }
    Ok(LoopControl::Continue)
}

async fn login(app: &mut App) -> Result<(), UiError> {
    let neutral = Theme::neutral();
    let details = spawn_blocking(prompt_login_details)
        .await
        .map_err(|err| UiError::Invalid(err.to_string()))??;

    let lines = match app.sign_in(&details.email, &details.password).await {
        Ok(profile) => vec![render::info(
            format!("Welcome back, {}! 💫", profile.name),
            &neutral,
        )],
        Err(err) => vec![render::error(err, &neutral)],
    };
    render::emit(&lines).map_err(|err| UiError::Terminal(err.into()))
}

async fn sign_up(app: &mut App) -> Result<(), UiError> {
    let neutral = Theme::neutral();
    let details = spawn_blocking(prompt_sign_up_details)
        .await
        .map_err(|err| UiError::Invalid(err.to_string()))??;

    let line = match app
        .sign_up(&details.email, &details.password, &details.username)
        .await
    {
        Ok(SignUpOutcome::SignedIn(profile)) => {
            render::info(format!("Welcome, {}! 🎉", profile.name), &neutral)
        }
        Ok(SignUpOutcome::ConfirmationRequired) => render::info(
            "Account created. Confirm it from your inbox, then log in.",
            &neutral,
        ),
        Err(err) => render::error(err, &neutral),
    };
    render::emit(&[line]).map_err(|err| UiError::Terminal(err.into()))
}

/// Chat screen state that only lives while the screen is shown.
struct ChatView {
    theme: Theme,
    depth: ColorDepth,
    /// Shown below every emitted block while a reply is outstanding.
    typing: Option<Line<'static>>,
    /// The typing indicator is the line directly above the cursor.
    indicator_visible: bool,
}

impl ChatView {
    fn new(theme: Theme, depth: ColorDepth) -> Self {
        Self {
            theme,
            depth,
            typing: None,
            indicator_visible: false,
        }
    }

    /// Lines to print for `lines`, and whether the cursor must first move
    /// up over a typing indicator that is still on screen.
    fn frame<'a>(&mut self, lines: &[Line<'a>]) -> (bool, Vec<Line<'a>>) {
        let overwrite = self.indicator_visible;
        let mut frame = lines.to_vec();
        if let Some(indicator) = &self.typing {
            frame.push(indicator.clone());
        }
        self.indicator_visible = self.typing.is_some();
        (overwrite, frame)
    }

    fn emit(&mut self, lines: &[Line<'_>]) -> Result<(), Box<dyn Error>> {
        let (overwrite, frame) = self.frame(lines);
        if overwrite {
            print!("{CURSOR_UP}");
        }
        render::emit(&frame)?;
        Ok(())
    }

    fn show_typing(&mut self, indicator: Line<'static>) {
        self.typing = Some(indicator);
    }

    fn clear_typing(&mut self) {
        self.typing = None;
    }
}

async fn chat_screen(
    app: &mut App,
    service: &GenerationService,
    events: &mut GenerationReceiver,
    depth: ColorDepth,
) -> Result<LoopControl, Box<dyn Error>> {
    let mut view = ChatView::new(Theme::for_companion(app.companion(), depth), depth);
    view.emit(&render::chat_header(app.companion(), &view.theme))?;
    if let Some(notice) = transcript_notice(app.transcript()) {
        view.emit(&[render::info(notice, &view.theme)])?;
    }

    let redraw = Arc::new(AtomicBool::new(false));
    let mut draft = String::new();
    loop {
        let prompt = format!("{} › ", user_name(app));
        let mut input = spawn_chat_input(prompt, std::mem::take(&mut draft), Arc::clone(&redraw));

        let line = loop {
            tokio::select! {
                result = &mut input => break result?,
                Some((event, ticket)) = events.recv() => {
                    show_generation_result(app, &mut view, event, ticket)?;
                    redraw.store(true, Ordering::Release);
                }
            }
        };

        let text = match line {
            Ok(text) => text,
            Err(err) if err.is_cancelled() => return Ok(LoopControl::Quit),
            Err(err) => return Err(err.into()),
        };
        // Replace the echoed input line with the formatted transcript entry.
        print!("{CURSOR_UP}");
        if text.trim().is_empty() {
            continue;
        }

        match process_input(&text) {
            CommandResult::ProcessAsMessage(message) => {
                if let Some(kept) = send_message(app, service, &mut view, &message)? {
                    draft = kept;
                }
            }
            CommandResult::Run(command) => {
                if let Some(control) = run_command(app, service, &mut view, command).await? {
                    return Ok(control);
                }
            }
            CommandResult::Invalid(message) => {
                view.emit(&[render::error(message, &view.theme)])?;
            }
        }
    }
}

/// Text to put back into the input line after `begin_send` rejected it.
fn retained_draft(err: &AppError, text: &str) -> Option<String> {
    match err {
        AppError::Conversation(ConversationError::ReplyPending) => Some(text.to_string()),
        _ => None,
    }
}

/// Returns the rejected text when it should be offered again for editing.
fn send_message(
    app: &mut App,
    service: &GenerationService,
    view: &mut ChatView,
    text: &str,
) -> Result<Option<String>, Box<dyn Error>> {
    match app.begin_send(text) {
        Ok(request) => {
            let lines = last_message_lines(app, &view.theme);
            view.show_typing(render::typing_indicator(app.companion(), &view.theme));
            view.emit(&lines)?;
            service.spawn_generation(request);
            Ok(None)
        }
        Err(err) => {
            view.emit(&[render::error(&err, &view.theme)])?;
            Ok(retained_draft(&err, text))
        }
    }
}

fn show_generation_result(
    app: &mut App,
    view: &mut ChatView,
    event: GenerationEvent,
    ticket: u64,
) -> Result<(), Box<dyn Error>> {
    match app.apply_generation(event, ticket) {
        TurnOutcome::Replied => {
            let mut lines = last_message_lines(app, &view.theme);
            lines.push(render::mood_update(app.companion(), &view.theme));
            view.clear_typing();
            view.emit(&lines)?;
        }
        TurnOutcome::Failed => {
            let line = render::error(
                format!("{} couldn't reply just now. Try again in a moment.", app.companion().name),
                &view.theme,
            );
            view.clear_typing();
            view.emit(&[line])?;
        }
        TurnOutcome::Discarded => {}
    }
    Ok(())
}

/// Returns `Some` when the chat screen should be left.
async fn run_command(
    app: &mut App,
    service: &GenerationService,
    view: &mut ChatView,
    command: ChatCommand,
) -> Result<Option<LoopControl>, Box<dyn Error>> {
    match command {
        ChatCommand::Help => view.emit(&render::help(&view.theme))?,
        ChatCommand::Switch(companion) => {
            app.select_companion(companion);
            view.theme = Theme::for_companion(app.companion(), view.depth);
            return Ok(Some(LoopControl::Continue));
        }
        ChatCommand::ListQuickReplies => view.emit(&render::quick_replies(&view.theme))?,
        ChatCommand::SendQuickReply(index) => {
            if let Some(text) = QUICK_REPLIES.get(index) {
                send_message(app, service, view, text)?;
            }
        }
        ChatCommand::Profile => match app.profile() {
            Some(profile) => {
                let lines = render::profile_card(profile, &view.theme);
                view.emit(&lines)?;
            }
            None => view.emit(&[render::info("No profile loaded.", &view.theme)])?,
        },
        ChatCommand::Home => {
            app.go_home();
            return Ok(Some(LoopControl::Continue));
        }
        ChatCommand::Logout => {
            if let Err(err) = app.log_out().await {
                view.emit(&[render::error(err, &view.theme)])?;
            }
            return Ok(Some(LoopControl::Continue));
        }
        ChatCommand::Quit => return Ok(Some(LoopControl::Quit)),
    }
    Ok(None)
}

fn transcript_notice(log: &TranscriptLog) -> Option<String> {
    log.is_active().then(|| format!("Transcript: {}", log.status()))
}

fn user_name(app: &App) -> String {
    app.profile()
        .map(|profile| profile.name.clone())
        .unwrap_or_else(|| "You".to_string())
}

fn last_message_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    app.messages()
        .last()
        .map(|message| {
            render::message_lines(message, app.companion().name, &user_name(app), theme)
        })
        .unwrap_or_default()
}
