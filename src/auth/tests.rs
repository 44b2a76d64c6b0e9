use super::*;
use crate::core::keyring::MemorySessionStore;
use crate::utils::test_utils::{test_session, MockAuthProvider};
use chrono::Duration;

fn manager(provider: MockAuthProvider) -> (SessionManager, Arc<MockAuthProvider>, Arc<MemorySessionStore>) {
    manager_with_store(provider, MemorySessionStore::new())
}

fn manager_with_store(
    provider: MockAuthProvider,
    store: MemorySessionStore,
) -> (SessionManager, Arc<MockAuthProvider>, Arc<MemorySessionStore>) {
    let provider = Arc::new(provider);
    let store = Arc::new(store);
    let manager = SessionManager::new(provider.clone(), store.clone());
    (manager, provider, store)
}

fn stored(session: &AuthSession) -> MemorySessionStore {
    MemorySessionStore::with_payload(serde_json::to_string(session).expect("serialize"))
}

#[tokio::test]
async fn sign_in_merges_profile_and_persists_session() {
    let (mut manager, provider, store) = manager(MockAuthProvider::new("sam@example.com", "secret1"));

    let profile = manager
        .sign_in("sam@example.com", "secret1")
        .await
        .expect("sign in")
        .clone();

    assert!(manager.is_signed_in());
    assert_eq!(profile.name, "sam");
    assert_eq!(profile.email, "sam@example.com");
    assert_eq!(profile.age, 27);
    assert_eq!(provider.calls(), vec!["sign_in", "fetch_profile"]);
    assert!(store.snapshot().is_some_and(|payload| payload.contains("access-user-1")));
}

#[tokio::test]
async fn bad_credentials_leave_state_untouched() {
    let (mut manager, _, store) = manager(MockAuthProvider::new("sam@example.com", "secret1"));

    let err = manager
        .sign_in("sam@example.com", "nope!!")
        .await
        .expect_err("rejected");

    assert_eq!(err.to_string(), "Invalid login credentials");
    assert!(!manager.is_signed_in());
    assert!(manager.profile().is_none());
    assert_eq!(store.snapshot(), None);
}

#[tokio::test]
async fn missing_username_falls_back_to_email_local_part() {
    let provider = MockAuthProvider::new("pat@example.com", "secret1")
        .with_profile(Some(crate::utils::test_utils::test_profile_row("user-1", None)));
    let (mut manager, _, _) = manager(provider);

    let profile = manager.sign_in("pat@example.com", "secret1").await.expect("sign in");
    assert_eq!(profile.name, "pat");
}

#[tokio::test]
async fn short_password_is_rejected_before_any_call() {
    let (mut manager, provider, _) = manager(MockAuthProvider::new("sam@example.com", "secret1"));

    let err = manager
        .sign_up("new@example.com", "12345", "newbie")
        .await
        .expect_err("too short");

    assert!(matches!(err, AuthError::Validation(_)));
    assert_eq!(err.to_string(), "Password must be at least 6 characters long");
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn sign_up_builds_local_profile() {
    let (mut manager, provider, _) = manager(MockAuthProvider::new("sam@example.com", "secret1"));

    let outcome = manager
        .sign_up("new@example.com", "123456", "newbie")
        .await
        .expect("sign up");

    let SignUpOutcome::SignedIn(profile) = outcome else {
        panic!("expected a session");
    };
    assert_eq!(profile.name, "newbie");
    assert_eq!(profile.email, "new@example.com");
    assert_eq!(profile.age, 0);
    assert!(profile.interests.is_empty());
    assert!(manager.is_signed_in());
    assert_eq!(provider.calls(), vec!["sign_up"]);
}

#[tokio::test]
async fn sign_up_with_confirmation_stays_signed_out() {
    let provider = MockAuthProvider::new("sam@example.com", "secret1").requiring_confirmation();
    let (mut manager, _, store) = manager(provider);

    let outcome = manager
        .sign_up("new@example.com", "123456", "newbie")
        .await
        .expect("sign up");

    assert_eq!(outcome, SignUpOutcome::ConfirmationRequired);
    assert!(!manager.is_signed_in());
    assert_eq!(store.snapshot(), None);
}

#[tokio::test]
async fn duplicate_account_is_surfaced() {
    let (mut manager, _, _) = manager(MockAuthProvider::new("sam@example.com", "secret1"));
    let err = manager
        .sign_up("sam@example.com", "123456", "sam")
        .await
        .expect_err("duplicate");
    assert_eq!(err.to_string(), "User already registered");
}

#[tokio::test]
async fn restore_uses_valid_stored_session_without_refresh() {
    let session = test_session("user-1", "sam@example.com", Utc::now() + Duration::hours(2));
    let (mut manager, provider, _) = manager_with_store(
        MockAuthProvider::new("sam@example.com", "secret1"),
        stored(&session),
    );

    assert!(manager.restore().await.expect("restore"));
    assert_eq!(manager.session(), Some(&session));
    assert_eq!(provider.calls(), vec!["fetch_profile"]);
}

#[tokio::test]
async fn restore_refreshes_expired_session_once() {
    let session = test_session("user-1", "sam@example.com", Utc::now() - Duration::hours(1));
    let (mut manager, provider, store) = manager_with_store(
        MockAuthProvider::new("sam@example.com", "secret1"),
        stored(&session),
    );

    assert!(manager.restore().await.expect("restore"));
    assert_eq!(provider.calls(), vec!["refresh_session", "fetch_profile"]);
    let refreshed = manager.session().expect("session");
    assert!(!refreshed.is_expired(Utc::now()));
    assert!(store.snapshot().is_some());
}

#[tokio::test]
async fn failed_refresh_clears_stored_session() {
    let session = test_session("user-1", "sam@example.com", Utc::now() - Duration::hours(1));
    let (mut manager, provider, store) = manager_with_store(
        MockAuthProvider::new("sam@example.com", "secret1").with_broken_refresh(),
        stored(&session),
    );

    assert!(!manager.restore().await.expect("restore"));
    assert_eq!(provider.calls(), vec!["refresh_session"]);
    assert!(!manager.is_signed_in());
    assert_eq!(store.snapshot(), None);
}

#[tokio::test]
async fn unreadable_stored_session_is_discarded() {
    let (mut manager, _, store) = manager_with_store(
        MockAuthProvider::new("sam@example.com", "secret1"),
        MemorySessionStore::with_payload("not json"),
    );

    assert!(!manager.restore().await.expect("restore"));
    assert_eq!(store.snapshot(), None);
}

#[tokio::test]
async fn sign_out_clears_everything() {
    let (mut manager, provider, store) = manager(MockAuthProvider::new("sam@example.com", "secret1"));
    manager.sign_in("sam@example.com", "secret1").await.expect("sign in");

    manager.sign_out().await.expect("sign out");

    assert!(!manager.is_signed_in());
    assert!(manager.profile().is_none());
    assert_eq!(store.snapshot(), None);
    assert_eq!(provider.calls().last().map(String::as_str), Some("sign_out"));
}
