use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize)]
pub struct PasswordGrant<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct RefreshGrant<'a> {
    pub refresh_token: &'a str,
}

#[derive(Serialize)]
pub struct SignUpMetadata<'a> {
    pub username: &'a str,
}

#[derive(Serialize)]
pub struct SignUpRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub data: SignUpMetadata<'a>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UserPayload {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub expires_at: Option<i64>,
    pub user: UserPayload,
}

/// Sign-up answers with a full session when e-mail confirmation is off, and
/// with the bare user (sometimes nested under `user`) when it is on.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(TokenResponse),
    Nested { user: UserPayload },
    User(UserPayload),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ProfileRow {
    pub id: String,
    pub username: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub interests: Option<Vec<String>>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
