//! Handlers for the individual configuration keys.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::SettingHandler;
use crate::core::companion::CompanionId;
use crate::core::config::data::Config;

fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

fn success_unset(key: &str) -> String {
    format!("✅ Unset {key}")
}

/// Handler for the `default-companion` setting.
pub struct DefaultCompanionHandler;

impl SettingHandler for DefaultCompanionHandler {
    fn key(&self) -> &'static str {
        "default-companion"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To set a default companion, specify the companion:",
                example: "chatbuddy set default-companion jenny",
            });
        }

        let input = args.join(" ");
        let companion =
            CompanionId::parse(&input).ok_or(SettingError::UnknownCompanion { input })?;
        config.default_companion = Some(companion);
        Ok(success_set(self.key(), companion.as_str()))
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        config.default_companion = None;
        Ok(success_unset(self.key()))
    }

    fn format(&self, config: &Config) -> String {
        match config.default_companion {
            Some(companion) => format!("  default-companion: {companion}"),
            None => "  default-companion: (unset)".to_string(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Plain,
    Url,
    Secret,
}

/// Handler for a single optional string field of [`Config`].
pub struct StringSettingHandler {
    key: &'static str,
    kind: ValueKind,
    example: &'static str,
    field: fn(&mut Config) -> &mut Option<String>,
    read: fn(&Config) -> Option<&str>,
}

impl SettingHandler for StringSettingHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let value = args.join(" ").trim().to_string();
        if value.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "Specify a value for this setting:",
                example: self.example,
            });
        }

        let value = match self.kind {
            ValueKind::Url => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(SettingError::InvalidUrl {
                        key: self.key,
                        input: value,
                    });
                }
                value.trim_end_matches('/').to_string()
            }
            ValueKind::Plain | ValueKind::Secret => value,
        };

        let shown = if self.kind == ValueKind::Secret {
            "(hidden)".to_string()
        } else {
            value.clone()
        };
        *(self.field)(config) = Some(value);
        Ok(success_set(self.key, &shown))
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        *(self.field)(config) = None;
        Ok(success_unset(self.key))
    }

    fn format(&self, config: &Config) -> String {
        match ((self.read)(config), self.kind) {
            (None, _) => format!("  {}: (unset)", self.key),
            (Some(_), ValueKind::Secret) => format!("  {}: (set)", self.key),
            (Some(value), _) => format!("  {}: {value}", self.key),
        }
    }
}

pub fn model_handler() -> StringSettingHandler {
    StringSettingHandler {
        key: "model",
        kind: ValueKind::Plain,
        example: "chatbuddy set model gemini-2.0-flash",
        field: model_field,
        read: read_model,
    }
}

pub fn model_base_url_handler() -> StringSettingHandler {
    StringSettingHandler {
        key: "model-base-url",
        kind: ValueKind::Url,
        example: "chatbuddy set model-base-url https://generativelanguage.googleapis.com/v1beta",
        field: model_base_url_field,
        read: read_model_base_url,
    }
}

pub fn auth_url_handler() -> StringSettingHandler {
    StringSettingHandler {
        key: "auth-url",
        kind: ValueKind::Url,
        example: "chatbuddy set auth-url https://xyz.supabase.co",
        field: auth_url_field,
        read: read_auth_url,
    }
}

pub fn auth_anon_key_handler() -> StringSettingHandler {
    StringSettingHandler {
        key: "auth-anon-key",
        kind: ValueKind::Secret,
        example: "chatbuddy set auth-anon-key <anon-key>",
        field: auth_anon_key_field,
        read: read_auth_anon_key,
    }
}

fn model_field(config: &mut Config) -> &mut Option<String> {
    &mut config.model
}

fn read_model(config: &Config) -> Option<&str> {
    config.model.as_deref()
}

fn model_base_url_field(config: &mut Config) -> &mut Option<String> {
    &mut config.model_base_url
}

fn read_model_base_url(config: &Config) -> Option<&str> {
    config.model_base_url.as_deref()
}

fn auth_url_field(config: &mut Config) -> &mut Option<String> {
    &mut config.auth_url
}

fn read_auth_url(config: &Config) -> Option<&str> {
    config.auth_url.as_deref()
}

fn auth_anon_key_field(config: &mut Config) -> &mut Option<String> {
    &mut config.auth_anon_key
}

fn read_auth_anon_key(config: &Config) -> Option<&str> {
    config.auth_anon_key.as_deref()
}
