//! Error types for settings operations.

use std::fmt;

/// Errors that can occur when modifying configuration settings.
#[derive(Debug)]
pub enum SettingError {
    /// The provided setting key is not recognized.
    UnknownKey(String),
    /// The provided companion identifier was not found.
    UnknownCompanion { input: String },
    /// The provided value is not a usable http(s) URL.
    InvalidUrl { key: &'static str, input: String },
    /// Required arguments are missing.
    MissingArgs {
        hint: &'static str,
        example: &'static str,
    },
    /// An error occurred while loading or persisting the configuration.
    ConfigError(String),
}

impl SettingError {
    /// Print the error message to stderr with appropriate formatting.
    pub fn print(&self) {
        match self {
            SettingError::UnknownKey(key) => {
                eprintln!("❌ Unknown config key: {key}");
                eprintln!("   Run 'chatbuddy set' to list the available keys.");
            }
            SettingError::UnknownCompanion { input } => {
                eprintln!(
                    "❌ Unknown companion: {input}. Run 'chatbuddy companions' to list them."
                );
            }
            SettingError::InvalidUrl { key, input } => {
                eprintln!("❌ Invalid URL for {key}: {input}");
                eprintln!("   URLs must start with http:// or https://");
            }
            SettingError::MissingArgs { hint, example } => {
                eprintln!("⚠️  {hint}");
                eprintln!("Example: {example}");
            }
            SettingError::ConfigError(msg) => {
                eprintln!("❌ Failed to save configuration: {msg}");
            }
        }
    }

    /// Returns the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(f, "Unknown config key: {key}"),
            SettingError::UnknownCompanion { input } => write!(f, "Unknown companion: {input}"),
            SettingError::InvalidUrl { key, input } => write!(f, "Invalid URL for {key}: {input}"),
            SettingError::MissingArgs { hint, .. } => write!(f, "{hint}"),
            SettingError::ConfigError(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl std::error::Error for SettingError {}
