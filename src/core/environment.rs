//! Startup settings drawn from the process environment and the config file.

use crate::core::config::Config;
use std::error::Error;
use std::fmt;

pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const LEGACY_GEMINI_API_KEY_VAR: &str = "VITE_GEMINI_API_KEY";
pub const GEMINI_BASE_URL_VAR: &str = "GEMINI_BASE_URL";
pub const AUTH_URL_VAR: &str = "SUPABASE_URL";
pub const AUTH_ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";

const MODEL_QUICK_FIXES: &[&str] = &["export GEMINI_API_KEY=...      # Key from Google AI Studio"];
const AUTH_QUICK_FIXES: &[&str] = &[
    "export SUPABASE_URL=https://<project>.supabase.co",
    "export SUPABASE_ANON_KEY=...",
    "chatbuddy set auth-url https://<project>.supabase.co",
];

#[derive(Debug)]
pub struct EnvironmentError {
    message: String,
    quick_fixes: &'static [&'static str],
    exit_code: i32,
}

impl EnvironmentError {
    pub fn missing_api_key() -> Self {
        Self {
            message: format!("❌ {GEMINI_API_KEY_VAR} is not set in environment variables"),
            quick_fixes: MODEL_QUICK_FIXES,
            exit_code: 2,
        }
    }

    pub fn missing_auth_setting(what: &str) -> Self {
        Self {
            message: format!("❌ No {what} configured for the account service"),
            quick_fixes: AUTH_QUICK_FIXES,
            exit_code: 2,
        }
    }

    pub fn quick_fixes(&self) -> &'static [&'static str] {
        self.quick_fixes
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }
}

impl fmt::Display for EnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for EnvironmentError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthSettings {
    pub url: String,
    pub anon_key: String,
}

/// Lookup used for environment variables; swapped out in tests.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|value| !value.trim().is_empty())
    }
}

pub fn resolve_model_settings(
    env: &dyn EnvSource,
    config: &Config,
) -> Result<ModelSettings, EnvironmentError> {
    let api_key = env
        .var(GEMINI_API_KEY_VAR)
        .or_else(|| env.var(LEGACY_GEMINI_API_KEY_VAR))
        .ok_or_else(EnvironmentError::missing_api_key)?;
    let base_url = env
        .var(GEMINI_BASE_URL_VAR)
        .unwrap_or_else(|| config.model_base_url().to_string());

    Ok(ModelSettings {
        api_key,
        base_url,
        model: config.model().to_string(),
    })
}

pub fn resolve_auth_settings(
    env: &dyn EnvSource,
    config: &Config,
) -> Result<AuthSettings, EnvironmentError> {
    let url = env
        .var(AUTH_URL_VAR)
        .or_else(|| config.auth_url.clone())
        .ok_or_else(|| EnvironmentError::missing_auth_setting("project URL"))?;
    let anon_key = env
        .var(AUTH_ANON_KEY_VAR)
        .or_else(|| config.auth_anon_key.clone())
        .ok_or_else(|| EnvironmentError::missing_auth_setting("anon key"))?;

    Ok(AuthSettings { url, anon_key })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapEnv(HashMap<&'static str, &'static str>);

    impl EnvSource for MapEnv {
        fn var(&self, name: &str) -> Option<String> {
            self.0.get(name).map(|v| v.to_string())
        }
    }

    fn env(pairs: &[(&'static str, &'static str)]) -> MapEnv {
        MapEnv(pairs.iter().copied().collect())
    }

    #[test]
    fn missing_api_key_is_fatal_configuration_error() {
        let err = resolve_model_settings(&env(&[]), &Config::default()).expect_err("missing key");
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("GEMINI_API_KEY"));
        assert!(!err.quick_fixes().is_empty());
    }

    #[test]
    fn legacy_key_name_is_accepted() {
        let settings = resolve_model_settings(
            &env(&[(LEGACY_GEMINI_API_KEY_VAR, "legacy")]),
            &Config::default(),
        )
        .expect("settings");
        assert_eq!(settings.api_key, "legacy");
        assert_eq!(settings.model, "gemini-2.0-flash");
    }

    #[test]
    fn environment_overrides_config_for_base_url() {
        let config = Config {
            model_base_url: Some("https://config.example".into()),
            model: Some("gemini-x".into()),
            ..Default::default()
        };
        let settings = resolve_model_settings(
            &env(&[(GEMINI_API_KEY_VAR, "k"), (GEMINI_BASE_URL_VAR, "http://localhost:9")]),
            &config,
        )
        .expect("settings");
        assert_eq!(settings.base_url, "http://localhost:9");
        assert_eq!(settings.model, "gemini-x");
    }

    #[test]
    fn auth_settings_fall_back_to_config() {
        let config = Config {
            auth_url: Some("https://p.supabase.co".into()),
            auth_anon_key: Some("anon".into()),
            ..Default::default()
        };
        let settings = resolve_auth_settings(&env(&[]), &config).expect("settings");
        assert_eq!(settings.url, "https://p.supabase.co");
        assert_eq!(settings.anon_key, "anon");

        let err = resolve_auth_settings(&env(&[]), &Config::default()).expect_err("missing");
        assert!(err.to_string().contains("project URL"));
    }
}
