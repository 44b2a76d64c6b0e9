use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{AuthError, AuthProvider, AuthSession};
use crate::api::auth::{
    PasswordGrant, ProfileRow, RefreshGrant, SignUpMetadata, SignUpRequest, SignUpResponse,
    TokenResponse,
};
use crate::api::summarize_error_body;
use crate::utils::url::construct_api_url;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// [`AuthProvider`] for a hosted GoTrue + PostgREST project.
#[derive(Clone)]
pub struct SupabaseAuth {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            anon_key: anon_key.into(),
        }
    }

    fn post(&self, endpoint: &str) -> RequestBuilder {
        self.client
            .post(construct_api_url(&self.base_url, endpoint))
            .header("apikey", &self.anon_key)
    }

    async fn token_grant<T: serde::Serialize>(
        &self,
        grant_type: &str,
        body: &T,
    ) -> Result<AuthSession, AuthError> {
        let response = self
            .post(&format!("auth/v1/token?grant_type={grant_type}"))
            .json(body)
            .send()
            .await?;
        let token: TokenResponse = read_json(response).await?;
        Ok(session_from_token(token, Utc::now()))
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        debug!("password grant");
        self.token_grant("password", &PasswordGrant { email, password })
            .await
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<Option<AuthSession>, AuthError> {
        debug!("sign-up request");
        let request = SignUpRequest {
            email,
            password,
            data: SignUpMetadata { username },
        };
        let response = self.post("auth/v1/signup").json(&request).send().await?;
        let parsed: SignUpResponse = read_json(response).await?;
        Ok(match parsed {
            SignUpResponse::Session(token) => Some(session_from_token(token, Utc::now())),
            SignUpResponse::Nested { .. } | SignUpResponse::User(_) => None,
        })
    }

    async fn sign_out(&self, session: &AuthSession) -> Result<(), AuthError> {
        debug!(user_id = %session.user_id, "sign-out request");
        let response = self
            .post("auth/v1/logout")
            .bearer_auth(&session.access_token)
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        debug!("refresh grant");
        self.token_grant("refresh_token", &RefreshGrant { refresh_token })
            .await
    }

    async fn fetch_profile(&self, session: &AuthSession) -> Result<Option<ProfileRow>, AuthError> {
        let url = construct_api_url(
            &self.base_url,
            &format!("rest/v1/profiles?id=eq.{}&select=*", session.user_id),
        );
        debug!(user_id = %session.user_id, "fetching profile");
        let response = self
            .client
            .get(url)
            .header("apikey", &self.anon_key)
            .header("Accept", SINGLE_OBJECT)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        // PostgREST answers 406 when a single-object request matches no row.
        if response.status() == reqwest::StatusCode::NOT_ACCEPTABLE {
            return Ok(None);
        }
        read_json(response).await.map(Some)
    }
}

async fn ensure_success(response: Response) -> Result<String, AuthError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(AuthError::Rejected {
            status: status.as_u16(),
            message: summarize_error_body(&body),
        });
    }
    Ok(body)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AuthError> {
    let body = ensure_success(response).await?;
    Ok(serde_json::from_str(&body)?)
}

fn session_from_token(token: TokenResponse, now: DateTime<Utc>) -> AuthSession {
    let expires_at = token
        .expires_at
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(|| now + Duration::seconds(token.expires_in));
    AuthSession {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        expires_at,
        user_id: token.user.id,
        email: token.user.email,
    }
}
