use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AuthSession;
use crate::api::auth::ProfileRow;

/// The signed-in user as shown on the profile card. Never carries a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: u32,
    pub gender: String,
    pub interests: Vec<String>,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Merge a stored profile row with the identity's e-mail.
    ///
    /// A missing row or null username falls back to the e-mail local part;
    /// null numbers and lists become zero and empty.
    pub fn merge(session: &AuthSession, row: Option<ProfileRow>, now: DateTime<Utc>) -> Self {
        let email = session.email.clone().unwrap_or_default();
        let fallback_name = email_local_part(&email).to_string();

        match row {
            Some(row) => Self {
                id: row.id,
                name: row
                    .username
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or(fallback_name),
                email,
                age: row.age.unwrap_or(0),
                gender: row.gender.unwrap_or_default(),
                interests: row.interests.unwrap_or_default(),
                bio: row.bio.unwrap_or_default(),
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            None => Self::blank(session, fallback_name, email, now),
        }
    }

    /// Profile assembled locally right after sign-up, before the remote row
    /// is readable.
    pub fn for_new_account(session: &AuthSession, username: &str, now: DateTime<Utc>) -> Self {
        let email = session.email.clone().unwrap_or_default();
        Self::blank(session, username.to_string(), email, now)
    }

    fn blank(session: &AuthSession, name: String, email: String, now: DateTime<Utc>) -> Self {
        Self {
            id: session.user_id.clone(),
            name,
            email,
            age: 0,
            gender: String::new(),
            interests: Vec::new(),
            bio: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session() -> AuthSession {
        AuthSession {
            access_token: "at".into(),
            refresh_token: "rt".into(),
            expires_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            user_id: "u-1".into(),
            email: Some("sam@example.com".into()),
        }
    }

    fn row() -> ProfileRow {
        ProfileRow {
            id: "u-1".into(),
            username: Some("sammy".into()),
            age: Some(29),
            gender: Some("nonbinary".into()),
            interests: Some(vec!["hiking".into(), "jazz".into()]),
            bio: Some("Hi!".into()),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn merge_takes_row_fields_and_identity_email() {
        let profile = UserProfile::merge(&session(), Some(row()), Utc::now());
        assert_eq!(profile.name, "sammy");
        assert_eq!(profile.email, "sam@example.com");
        assert_eq!(profile.age, 29);
        assert_eq!(profile.interests, vec!["hiking", "jazz"]);
        assert_eq!(profile.created_at, row().created_at);
    }

    #[test]
    fn merge_defaults_nullable_fields() {
        let sparse = ProfileRow {
            username: None,
            age: None,
            gender: None,
            interests: None,
            bio: None,
            ..row()
        };
        let profile = UserProfile::merge(&session(), Some(sparse), Utc::now());
        assert_eq!(profile.name, "sam");
        assert_eq!(profile.age, 0);
        assert!(profile.gender.is_empty());
        assert!(profile.interests.is_empty());
        assert!(profile.bio.is_empty());
    }

    #[test]
    fn missing_row_builds_blank_profile() {
        let now = Utc::now();
        let profile = UserProfile::merge(&session(), None, now);
        assert_eq!(profile.id, "u-1");
        assert_eq!(profile.name, "sam");
        assert_eq!(profile.created_at, now);
    }

    #[test]
    fn new_account_profile_uses_chosen_username() {
        let profile = UserProfile::for_new_account(&session(), "sunny", Utc::now());
        assert_eq!(profile.name, "sunny");
        assert_eq!(profile.age, 0);
    }
}
