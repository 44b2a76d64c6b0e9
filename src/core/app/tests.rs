use super::*;
use crate::core::companion::Mood;
use crate::core::keyring::MemorySessionStore;
use crate::generator::service::GenerationService;
use crate::utils::test_utils::{MockAuthProvider, ScriptedBackend};
use std::sync::Arc;
use tempfile::tempdir;

const EMAIL: &str = "sam@example.com";
const PASSWORD: &str = "secret1";

fn app_with(backend: ScriptedBackend) -> App {
    app_with_transcript(backend, TranscriptLog::disabled())
}

fn app_with_transcript(backend: ScriptedBackend, transcript: TranscriptLog) -> App {
    let sessions = SessionManager::new(
        Arc::new(MockAuthProvider::new(EMAIL, PASSWORD)),
        Arc::new(MemorySessionStore::new()),
    );
    let generator = ResponseGenerator::new(Arc::new(backend));
    App::new(CompanionId::Boyfriend, sessions, generator, transcript)
}

async fn chatting_app(backend: ScriptedBackend, companion: CompanionId) -> App {
    let mut app = app_with(backend);
    app.select_companion(companion);
    app.sign_in(EMAIL, PASSWORD).await.expect("sign in");
    app
}

#[tokio::test]
async fn selecting_without_session_goes_to_auth_then_chat() {
    let mut app = app_with(ScriptedBackend::with_replies(Vec::<String>::new()));
    assert_eq!(app.screen(), Screen::SelectingCompanion);

    app.select_companion(CompanionId::Girlfriend);
    assert_eq!(app.screen(), Screen::AwaitingAuth);
    assert_eq!(app.companion().name, "Jenny");

    app.sign_in(EMAIL, PASSWORD).await.expect("sign in");
    assert_eq!(app.screen(), Screen::Chatting);
}

#[tokio::test]
async fn selecting_any_companion_resets_conversation() {
    for companion in CompanionId::ALL {
        let mut app = chatting_app(ScriptedBackend::with_replies(["hey"]), CompanionId::Boyfriend).await;
        app.begin_send("hello").expect("send");
        assert!(app.conversation().is_pending());

        app.select_companion(companion);

        assert_eq!(app.companion().id, companion);
        assert!(app.messages().is_empty());
        assert!(!app.conversation().is_pending());
        assert_eq!(app.screen(), Screen::Chatting);
    }
}

#[tokio::test]
async fn failed_sign_in_keeps_auth_screen() {
    let mut app = app_with(ScriptedBackend::with_replies(Vec::<String>::new()));
    app.select_companion(CompanionId::Boyfriend);

    let err = app.sign_in(EMAIL, "wrong-password").await.expect_err("rejected");
    assert_eq!(err.to_string(), "Invalid login credentials");
    assert_eq!(app.screen(), Screen::AwaitingAuth);
    assert!(!app.is_signed_in());
}

#[tokio::test]
async fn sending_outside_chat_is_rejected() {
    let mut app = app_with(ScriptedBackend::with_replies(["hi"]));
    assert!(matches!(app.begin_send("hello"), Err(AppError::NotChatting)));
    assert!(app.messages().is_empty());
}

#[tokio::test]
async fn send_and_wait_appends_reply_and_updates_mood() {
    let mut app = chatting_app(
        ScriptedBackend::with_replies(["That sounds wonderful, I'm so excited!"]),
        CompanionId::Girlfriend,
    )
    .await;

    let reply = app.send_and_wait("We got the tickets!").await.expect("reply");

    assert_eq!(reply.mood, Mood::Happy);
    assert_eq!(app.messages().len(), 2);
    assert!(app.messages()[0].is_user());
    assert_eq!(app.messages()[1].content(), "That sounds wonderful, I'm so excited!");
    assert_eq!(app.companion().mood(), Mood::Happy);
    assert!(!app.conversation().is_pending());
}

#[tokio::test]
async fn failed_generation_keeps_only_user_message() {
    let mut app = chatting_app(ScriptedBackend::failing("quota exceeded"), CompanionId::Boyfriend).await;

    let err = app.send_and_wait("are you there?").await.expect_err("failure");

    assert!(err.to_string().contains("quota exceeded"));
    assert_eq!(app.messages().len(), 1);
    assert!(!app.conversation().is_pending());
    assert_eq!(app.companion().mood(), Mood::Loving);
}

#[tokio::test]
async fn background_reply_is_applied_through_service() {
    let mut app = chatting_app(
        ScriptedBackend::with_replies(["I adore spending time with you 💕"]),
        CompanionId::Boyfriend,
    )
    .await;
    let (service, mut rx) = GenerationService::new();

    service.spawn_generation(app.begin_send("miss you").expect("send"));
    assert!(matches!(app.begin_send("again"), Err(AppError::Conversation(ConversationError::ReplyPending))));

    let (event, ticket) = rx.recv().await.expect("event");
    assert_eq!(app.apply_generation(event, ticket), TurnOutcome::Replied);
    assert_eq!(app.companion().mood(), Mood::Loving);
    assert_eq!(app.messages().len(), 2);
}

#[tokio::test]
async fn reply_arriving_after_going_home_is_discarded() {
    let mut app = chatting_app(ScriptedBackend::with_replies(["late reply"]), CompanionId::Girlfriend).await;
    let (service, mut rx) = GenerationService::new();
    service.spawn_generation(app.begin_send("hello?").expect("send"));

    app.go_home();
    assert_eq!(app.screen(), Screen::SelectingCompanion);

    let (event, ticket) = rx.recv().await.expect("event");
    assert_eq!(app.apply_generation(event, ticket), TurnOutcome::Discarded);
    assert!(app.messages().is_empty());
}

#[tokio::test]
async fn log_out_resets_to_default_companion() {
    let mut app = chatting_app(ScriptedBackend::with_replies(["hi"]), CompanionId::Girlfriend).await;
    app.begin_send("hello").expect("send");

    app.log_out().await.expect("log out");

    assert_eq!(app.companion().id, app.default_companion());
    assert!(app.messages().is_empty());
    assert!(!app.conversation().is_pending());
    assert!(!app.is_signed_in());
    assert!(app.profile().is_none());
    assert_eq!(app.screen(), Screen::SelectingCompanion);
}

#[tokio::test]
async fn sign_up_with_short_password_stays_on_auth_screen() {
    let mut app = app_with(ScriptedBackend::with_replies(Vec::<String>::new()));
    app.select_companion(CompanionId::Girlfriend);

    let err = app.sign_up("new@example.com", "abc", "newbie").await.expect_err("short");
    assert_eq!(err.to_string(), "Password must be at least 6 characters long");
    assert_eq!(app.screen(), Screen::AwaitingAuth);

    let outcome = app.sign_up("new@example.com", "abcdef", "newbie").await.expect("sign up");
    assert!(matches!(outcome, SignUpOutcome::SignedIn(ref p) if p.name == "newbie"));
    assert_eq!(app.screen(), Screen::Chatting);
}

#[tokio::test]
async fn transcript_records_both_sides() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("chat.log");
    let transcript = TranscriptLog::new(Some(path.clone())).expect("log");
    let mut app = app_with_transcript(
        ScriptedBackend::with_replies(["Calm and peaceful 😌"]),
        transcript,
    );
    app.select_companion(CompanionId::Girlfriend);
    app.sign_in(EMAIL, PASSWORD).await.expect("sign in");

    app.send_and_wait("how are you?").await.expect("reply");

    let contents = std::fs::read_to_string(path).expect("read");
    assert!(contents.contains("## Chatting with Jenny"));
    assert!(contents.contains("sam: how are you?"));
    assert!(contents.contains("Jenny: Calm and peaceful 😌"));
}
