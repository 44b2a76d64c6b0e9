//! Account sessions and the signed-in user's profile.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::auth::ProfileRow;
use crate::core::keyring::{KeyringAccessError, SessionStore};

pub mod profile;
pub mod supabase;
pub mod ui;

pub use profile::UserProfile;
pub use supabase::SupabaseAuth;

pub const MIN_PASSWORD_CHARS: usize = 6;

/// Tokens are refreshed slightly before they actually lapse.
const EXPIRY_LEEWAY_SECS: i64 = 30;

#[derive(Debug)]
pub enum AuthError {
    /// Rejected locally before contacting the provider.
    Validation(String),
    /// The provider answered with an error status.
    Rejected { status: u16, message: String },
    Transport(reqwest::Error),
    Decode(serde_json::Error),
    Storage(KeyringAccessError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Validation(message) => write!(f, "{message}"),
            AuthError::Rejected { message, .. } => write!(f, "{message}"),
            AuthError::Transport(err) => write!(f, "Could not reach the account service: {err}"),
            AuthError::Decode(err) => write!(f, "Unexpected reply from the account service: {err}"),
            AuthError::Storage(err) => write!(f, "Could not access the stored session: {err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AuthError::Transport(err) => Some(err),
            AuthError::Decode(err) => Some(err),
            AuthError::Storage(err) => Some(err),
            AuthError::Validation(_) | AuthError::Rejected { .. } => None,
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Transport(err)
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::Decode(err)
    }
}

impl From<KeyringAccessError> for AuthError {
    fn from(err: KeyringAccessError) -> Self {
        AuthError::Storage(err)
    }
}

/// An authenticated identity plus the tokens that prove it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: String,
    pub email: Option<String>,
}

impl AuthSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now + Duration::seconds(EXPIRY_LEEWAY_SECS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    SignedIn(UserProfile),
    /// The account exists but must be confirmed by e-mail before signing in.
    ConfirmationRequired,
}

/// External identity and profile store.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Returns `None` when the provider created the account without a session.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<Option<AuthSession>, AuthError>;

    async fn sign_out(&self, session: &AuthSession) -> Result<(), AuthError>;

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, AuthError>;

    async fn fetch_profile(&self, session: &AuthSession) -> Result<Option<ProfileRow>, AuthError>;
}

pub fn validate_sign_up(email: &str, password: &str, username: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() {
        return Err(AuthError::Validation("Email is required".to_string()));
    }
    if username.trim().is_empty() {
        return Err(AuthError::Validation("Username is required".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AuthError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_CHARS} characters long"
        )));
    }
    Ok(())
}

/// Tracks the current session and profile, persisting the session between
/// runs through a [`SessionStore`].
pub struct SessionManager {
    provider: Arc<dyn AuthProvider>,
    store: Arc<dyn SessionStore>,
    session: Option<AuthSession>,
    profile: Option<UserProfile>,
}

impl SessionManager {
    pub fn new(provider: Arc<dyn AuthProvider>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            provider,
            store,
            session: None,
            profile: None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Load a previously stored session, refreshing it once if it expired.
    ///
    /// Returns whether a usable session was found. A session that cannot be
    /// decoded or refreshed is dropped from the store.
    pub async fn restore(&mut self) -> Result<bool, AuthError> {
        let Some(payload) = self.store.load()? else {
            return Ok(false);
        };

        let stored: AuthSession = match serde_json::from_str(&payload) {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "discarding unreadable stored session");
                self.store.clear()?;
                return Ok(false);
            }
        };

        let session = if stored.is_expired(Utc::now()) {
            debug!(user_id = %stored.user_id, "refreshing expired session");
            match self.provider.refresh_session(&stored.refresh_token).await {
                Ok(fresh) => {
                    self.persist(&fresh)?;
                    fresh
                }
                Err(err) => {
                    warn!(error = %err, "session refresh failed; signing out locally");
                    self.store.clear()?;
                    return Ok(false);
                }
            }
        } else {
            stored
        };

        let profile = self.load_profile(&session).await;
        self.session = Some(session);
        self.profile = Some(profile);
        Ok(true)
    }

    pub async fn sign_in(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<&UserProfile, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        debug!("signing in");
        let session = self.provider.sign_in(email.trim(), password).await?;
        self.persist(&session)?;
        let profile = self.load_profile(&session).await;
        self.session = Some(session);
        Ok(self.profile.insert(profile))
    }

    /// Create an account. The remote store creates the profile row itself;
    /// the profile returned here is assembled locally.
    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<SignUpOutcome, AuthError> {
        validate_sign_up(email, password, username)?;

        debug!("creating account");
        let Some(session) = self
            .provider
            .sign_up(email.trim(), password, username.trim())
            .await?
        else {
            return Ok(SignUpOutcome::ConfirmationRequired);
        };

        self.persist(&session)?;
        let profile = UserProfile::for_new_account(&session, username.trim(), Utc::now());
        self.session = Some(session);
        self.profile = Some(profile.clone());
        Ok(SignUpOutcome::SignedIn(profile))
    }

    /// Forget the local session. A failed remote sign-out is logged only.
    pub async fn sign_out(&mut self) -> Result<(), AuthError> {
        if let Some(session) = self.session.take() {
            if let Err(err) = self.provider.sign_out(&session).await {
                warn!(error = %err, "remote sign-out failed");
            }
        }
        self.profile = None;
        self.store.clear()?;
        Ok(())
    }

    fn persist(&self, session: &AuthSession) -> Result<(), AuthError> {
        let payload = serde_json::to_string(session)?;
        self.store.save(&payload)?;
        Ok(())
    }

    async fn load_profile(&self, session: &AuthSession) -> UserProfile {
        let row = match self.provider.fetch_profile(session).await {
            Ok(row) => row,
            Err(err) => {
                warn!(error = %err, "profile fetch failed; using identity only");
                None
            }
        };
        UserProfile::merge(session, row, Utc::now())
    }
}

#[cfg(test)]
mod tests;
