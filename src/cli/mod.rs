//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments, wiring the model and
//! account clients together, and executing the selected subcommand.

pub mod account;
pub mod companion_list;
pub mod say;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::auth::{SessionManager, SupabaseAuth};
use crate::core::app::App;
use crate::core::companion::CompanionId;
use crate::core::config::Config;
use crate::core::environment::{
    resolve_auth_settings, resolve_model_settings, EnvironmentError, ProcessEnv,
};
use crate::core::keyring::KeyringSessionStore;
use crate::generator::gemini::GeminiBackend;
use crate::generator::ResponseGenerator;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::{init_tracing, TranscriptLog};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("VERGEN_GIT_SHA"),
    "\nbuilt: ",
    env!("VERGEN_BUILD_DATE"),
);

#[derive(Parser)]
#[command(name = "chatbuddy", version, long_version = LONG_VERSION)]
#[command(about = "Chat with an AI boyfriend or girlfriend in your terminal")]
#[command(
    long_about = "ChatBuddy pairs you with one of two AI companions, Allu or Jenny, who \
remember the conversation, answer in character and let you know how they are feeling.\n\n\
Accounts:\n\
  Sign in with 'chatbuddy login' or create an account with 'chatbuddy signup'.\n\
  Sessions are stored in your system keyring.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY      API key for the Gemini model (required)\n\
  GEMINI_BASE_URL     Custom model API base URL (optional)\n\
  SUPABASE_URL        Account service project URL\n\
  SUPABASE_ANON_KEY   Account service anon key\n\
  CHATBUDDY_LOG       Diagnostic log filter (e.g. debug)\n\n\
Chat commands:\n\
  /help             Show the available commands\n\
  /switch <name>    Start over with another companion\n\
  /quick [n]        List or send a quick reply\n\
  /profile          Show your profile\n\
  /home             Back to the companion cards\n\
  /logout           Sign out\n\
  /quit             Leave ChatBuddy"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Append the conversation transcript to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat {
        /// Companion to chat with (allu, jenny, boyfriend, girlfriend)
        #[arg(short = 'c', long)]
        companion: Option<String>,
    },
    /// Send one message and print the reply
    Say {
        /// Companion to ask (defaults to the configured companion)
        #[arg(short = 'c', long)]
        companion: Option<String>,
        /// Message text
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Sign in to your account
    Login,
    /// Create a new account
    Signup,
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in account and profile
    Status,
    /// List the available companions
    Companions,
    /// Set configuration values
    Set {
        /// Configuration key to set; omit to print the current configuration
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing()?;
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command.unwrap_or(Commands::Chat { companion: None }) {
        Commands::Chat { companion } => {
            let config = Config::load()?;
            let companion = companion.as_deref().map(parse_companion_arg).transpose()?;
            let mut app = build_app(&config, args.log)?;
            if let Err(err) = app.restore_session().await {
                eprintln!("⚠️  Could not restore your session: {err}");
            }
            run_chat(app, companion).await
        }
        Commands::Say { companion, prompt } => {
            let config = Config::load()?;
            let companion = companion.as_deref().map(parse_companion_arg).transpose()?;
            let app = build_app(&config, args.log)?;
            say::run_say(app, companion, prompt).await
        }
        Commands::Login => account::run_login(session_manager(&Config::load()?)).await,
        Commands::Signup => account::run_signup(session_manager(&Config::load()?)).await,
        Commands::Logout => account::run_logout(session_manager(&Config::load()?)).await,
        Commands::Status => account::run_status(session_manager(&Config::load()?)).await,
        Commands::Companions => {
            let config = Config::load()?;
            companion_list::list_companions(config.default_companion());
            Ok(())
        }
        Commands::Set { key, value } => settings::run_set(key, value),
        Commands::Unset { key } => settings::run_unset(key),
    }
}

fn parse_companion_arg(input: &str) -> Result<CompanionId, Box<dyn Error>> {
    CompanionId::parse(input).ok_or_else(|| {
        format!("❌ Unknown companion: {input}. Run 'chatbuddy companions' to list them.").into()
    })
}

/// Print an environment error with its quick fixes and exit.
fn exit_with_environment_error(err: EnvironmentError) -> ! {
    eprintln!("{err}");
    let fixes = err.quick_fixes();
    if !fixes.is_empty() {
        eprintln!();
        eprintln!("💡 Quick fixes:");
        for fix in fixes {
            eprintln!("  • {fix}");
        }
    }
    std::process::exit(err.exit_code());
}

fn session_manager(config: &Config) -> SessionManager {
    let settings = resolve_auth_settings(&ProcessEnv, config)
        .unwrap_or_else(|err| exit_with_environment_error(err));
    let provider = SupabaseAuth::new(reqwest::Client::new(), settings.url, settings.anon_key);
    SessionManager::new(Arc::new(provider), Arc::new(KeyringSessionStore::new()))
}

fn build_app(config: &Config, log: Option<PathBuf>) -> Result<App, Box<dyn Error>> {
    let model = resolve_model_settings(&ProcessEnv, config)
        .unwrap_or_else(|err| exit_with_environment_error(err));
    let backend = GeminiBackend::new(
        reqwest::Client::new(),
        model.base_url,
        model.model,
        model.api_key,
    );
    let transcript = TranscriptLog::new(log)?;

    Ok(App::new(
        config.default_companion(),
        session_manager(config),
        ResponseGenerator::new(Arc::new(backend)),
        transcript,
    ))
}
