//! Ties the screen flow, the conversation and the account session together.
//!
//! Front ends drive an [`App`] with discrete user actions and feed back the
//! completion of each generation call through [`App::apply_generation`].

use std::error::Error;
use std::fmt;
use tracing::{debug, warn};

use crate::auth::{AuthError, SessionManager, SignUpOutcome, UserProfile};
use crate::core::companion::{Companion, CompanionId};
use crate::core::conversation::{ConversationError, ConversationState, TurnOutcome};
use crate::core::message::Message;
use crate::core::screen::{Screen, ScreenFlow};
use crate::generator::service::{GenerationEvent, GenerationRequest};
use crate::generator::{GeneratedReply, ResponseGenerator};
use crate::utils::logging::TranscriptLog;

const ANONYMOUS_USER_NAME: &str = "You";

#[derive(Debug)]
pub enum AppError {
    Conversation(ConversationError),
    Auth(AuthError),
    /// Messages can only be sent from the chat screen.
    NotChatting,
    Generation(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Conversation(err) => write!(f, "{err}"),
            AppError::Auth(err) => write!(f, "{err}"),
            AppError::NotChatting => write!(f, "Pick a companion and sign in before chatting"),
            AppError::Generation(message) => write!(f, "No reply this time: {message}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Conversation(err) => Some(err),
            AppError::Auth(err) => Some(err),
            AppError::NotChatting | AppError::Generation(_) => None,
        }
    }
}

impl From<ConversationError> for AppError {
    fn from(err: ConversationError) -> Self {
        AppError::Conversation(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

pub struct App {
    default_companion: CompanionId,
    flow: ScreenFlow,
    conversation: ConversationState,
    sessions: SessionManager,
    generator: ResponseGenerator,
    transcript: TranscriptLog,
}

impl App {
    pub fn new(
        default_companion: CompanionId,
        sessions: SessionManager,
        generator: ResponseGenerator,
        transcript: TranscriptLog,
    ) -> Self {
        Self {
            default_companion,
            flow: ScreenFlow::new(),
            conversation: ConversationState::new(default_companion),
            sessions,
            generator,
            transcript,
        }
    }

    pub fn screen(&self) -> Screen {
        self.flow.screen()
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    pub fn companion(&self) -> &Companion {
        self.conversation.companion()
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn is_signed_in(&self) -> bool {
        self.sessions.is_signed_in()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.sessions.profile()
    }

    pub fn transcript(&self) -> &TranscriptLog {
        &self.transcript
    }

    pub fn default_companion(&self) -> CompanionId {
        self.default_companion
    }

    /// Pick up a session stored by an earlier run.
    pub async fn restore_session(&mut self) -> Result<bool, AppError> {
        Ok(self.sessions.restore().await?)
    }

    /// Start over with `companion`. Any reply still in flight is discarded
    /// when it arrives.
    pub fn select_companion(&mut self, companion: CompanionId) {
        self.conversation.reset(companion);
        self.flow.companion_chosen(self.sessions.is_signed_in());
        debug!(companion = %companion, screen = ?self.flow.screen(), "companion selected");

        let marker = format!("Chatting with {}", self.conversation.companion().name);
        if let Err(err) = self.transcript.log_marker(&marker) {
            warn!(error = %err, "transcript write failed");
        }
    }

    pub fn request_login(&mut self) {
        self.flow.login_requested();
    }

    /// Back to the companion cards; an outstanding reply is abandoned.
    pub fn go_home(&mut self) {
        let current = self.conversation.companion().id;
        self.conversation.reset(current);
        self.flow.home();
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<UserProfile, AppError> {
        let profile = self.sessions.sign_in(email, password).await?.clone();
        self.flow.authenticated();
        Ok(profile)
    }

    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<SignUpOutcome, AppError> {
        let outcome = self.sessions.sign_up(email, password, username).await?;
        if matches!(outcome, SignUpOutcome::SignedIn(_)) {
            self.flow.authenticated();
        }
        Ok(outcome)
    }

    /// Drop the session and return to the companion cards with a fresh
    /// conversation for the default companion.
    pub async fn log_out(&mut self) -> Result<(), AppError> {
        self.conversation.reset(self.default_companion);
        self.flow.logged_out();
        self.sessions.sign_out().await?;
        Ok(())
    }

    /// Record the user's message and describe the generation call to run.
    pub fn begin_send(&mut self, text: &str) -> Result<GenerationRequest, AppError> {
        if !self.flow.is_chatting() {
            return Err(AppError::NotChatting);
        }
        let turn = self.conversation.begin_turn(text)?;
        self.log_last_message();

        Ok(GenerationRequest {
            generator: self.generator.clone(),
            history: turn.history,
            companion: turn.companion,
            companion_name: turn.companion_name,
            ticket: turn.ticket,
        })
    }

    pub fn apply_generation(&mut self, event: GenerationEvent, ticket: u64) -> TurnOutcome {
        let outcome = match event {
            GenerationEvent::Reply(reply) => self.conversation.complete_turn(ticket, reply),
            GenerationEvent::Failed(_) => self.conversation.fail_turn(ticket),
        };
        match outcome {
            TurnOutcome::Replied => self.log_last_message(),
            TurnOutcome::Discarded => debug!(ticket, "discarded stale generation result"),
            TurnOutcome::Failed => {}
        }
        outcome
    }

    /// Run one full turn inline: send, wait for the model, apply the result.
    pub async fn send_and_wait(&mut self, text: &str) -> Result<GeneratedReply, AppError> {
        let request = self.begin_send(text)?;
        let result = request
            .generator
            .generate(&request.history, request.companion, &request.companion_name)
            .await;

        match result {
            Ok(reply) => {
                self.apply_generation(GenerationEvent::Reply(reply.clone()), request.ticket);
                Ok(reply)
            }
            Err(err) => {
                warn!(error = %err, "reply generation failed");
                self.apply_generation(GenerationEvent::Failed(err.to_string()), request.ticket);
                Err(AppError::Generation(err.to_string()))
            }
        }
    }

    fn log_last_message(&self) {
        let Some(message) = self.conversation.last_message() else {
            return;
        };
        let user_name = self
            .sessions
            .profile()
            .map(|profile| profile.name.as_str())
            .unwrap_or(ANONYMOUS_USER_NAME);
        let companion_name = self.conversation.companion().name;
        if let Err(err) = self
            .transcript
            .log_message(message, user_name, companion_name)
        {
            warn!(error = %err, "transcript write failed");
        }
    }
}

#[cfg(test)]
mod tests;
