//! Settings management for CLI set/unset commands.
//!
//! Each configuration key has a [`SettingHandler`]; the [`SettingRegistry`]
//! dispatches `chatbuddy set <key> <value>` and `chatbuddy unset <key>` to it.

pub mod error;
pub mod handlers;

pub use error::SettingError;

use std::collections::HashMap;
use std::path::Path;

use crate::core::config::data::Config;
use handlers::DefaultCompanionHandler;

/// Trait for handling a configuration setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Apply `args` to `config`, returning the success message to display.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Clear the value from `config`.
    fn unset(&self, config: &mut Config) -> Result<String, SettingError>;

    /// Format the current value for display in `chatbuddy set` output.
    fn format(&self, config: &Config) -> String;
}

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    /// Keys in display order for `chatbuddy set` output.
    display_order: Vec<&'static str>,
}

impl SettingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };

        registry.register(Box::new(DefaultCompanionHandler));
        registry.register(Box::new(handlers::model_handler()));
        registry.register(Box::new(handlers::model_base_url_handler()));
        registry.register(Box::new(handlers::auth_url_handler()));
        registry.register(Box::new(handlers::auth_anon_key_handler()));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.display_order
    }

    /// Render every setting, one per line, in display order.
    pub fn describe(&self, config: &Config) -> Vec<String> {
        self.display_order
            .iter()
            .filter_map(|key| self.get(key))
            .map(|handler| handler.format(config))
            .collect()
    }

    pub fn set_in(&self, path: &Path, key: &str, args: &[String]) -> Result<String, SettingError> {
        let handler = self.lookup(key)?;
        mutate_config(path, |config| handler.set(args, config))
    }

    pub fn unset_in(&self, path: &Path, key: &str) -> Result<String, SettingError> {
        let handler = self.lookup(key)?;
        mutate_config(path, |config| handler.unset(config))
    }

    fn lookup(&self, key: &str) -> Result<&dyn SettingHandler, SettingError> {
        self.get(key)
            .ok_or_else(|| SettingError::UnknownKey(key.to_string()))
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the config at `path`, apply `f`, and save only when `f` succeeds.
fn mutate_config<F>(path: &Path, f: F) -> Result<String, SettingError>
where
    F: FnOnce(&mut Config) -> Result<String, SettingError>,
{
    let mut config =
        Config::load_from_path(path).map_err(|e| SettingError::ConfigError(e.to_string()))?;
    let message = f(&mut config)?;
    config
        .save_to_path(path)
        .map_err(|e| SettingError::ConfigError(e.to_string()))?;
    Ok(message)
}

/// `chatbuddy set [key value...]`: with no key, print every setting.
pub fn run_set(key: Option<String>, value: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let path = Config::get_config_path()?;
    let registry = SettingRegistry::new();

    let Some(key) = key else {
        let config = Config::load_from_path(&path)?;
        println!("Current configuration:");
        for line in registry.describe(&config) {
            println!("{line}");
        }
        return Ok(());
    };

    match registry.set_in(&path, &key, &value) {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(err) => {
            err.print();
            std::process::exit(err.exit_code());
        }
    }
}

pub fn run_unset(key: String) -> Result<(), Box<dyn std::error::Error>> {
    let path = Config::get_config_path()?;
    match SettingRegistry::new().unset_in(&path, &key) {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(err) => {
            err.print();
            std::process::exit(err.exit_code());
        }
    }
}
