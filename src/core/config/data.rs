use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::companion::CompanionId;
use crate::generator::gemini::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Companion shown first and restored after logout
    pub default_companion: Option<CompanionId>,
    /// Gemini model name (e.g., "gemini-2.0-flash")
    pub model: Option<String>,
    /// Base URL of the Gemini REST API
    pub model_base_url: Option<String>,
    /// Project URL of the auth/profile store (e.g., "https://xyz.supabase.co")
    pub auth_url: Option<String>,
    /// Public anon key of the auth/profile store
    pub auth_anon_key: Option<String>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn default_companion(&self) -> CompanionId {
        self.default_companion.unwrap_or_default()
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
    }

    pub fn model_base_url(&self) -> &str {
        self.model_base_url
            .as_deref()
            .unwrap_or(DEFAULT_GEMINI_BASE_URL)
    }
}
