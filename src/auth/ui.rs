//! Terminal prompts for the login / sign-up screen.

use crate::utils::line_editor::{prompt_line_editor, LineEditorError, LineEditorOptions, MaskMode};
use std::fmt;

const INVALID_CHOICE_MSG: &str = "Invalid choice";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMenuSelection {
    Login,
    SignUp,
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub enum UiError {
    Cancelled,
    Invalid(String),
    Terminal(LineEditorError),
}

impl UiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, UiError::Cancelled)
    }
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::Cancelled => write!(f, "Cancelled"),
            UiError::Invalid(message) => write!(f, "{message}"),
            UiError::Terminal(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for UiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UiError::Terminal(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LineEditorError> for UiError {
    fn from(err: LineEditorError) -> Self {
        if err.is_cancelled() {
            UiError::Cancelled
        } else {
            UiError::Terminal(err)
        }
    }
}

pub fn prompt_auth_menu(companion_name: Option<&str>) -> Result<AuthMenuSelection, UiError> {
    println!();
    match companion_name {
        Some(name) => println!("🔐 Sign in to start chatting with {name}"),
        None => println!("🔐 Sign in to ChatBuddy"),
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  1. Log in");
    println!("  2. Create an account");
    println!("  3. Back to companions");
    println!();

    let input = prompt_text("Select an option (1-3): ")?;
    parse_auth_choice(&input)
}

pub fn prompt_login_details() -> Result<LoginInput, UiError> {
    let email = prompt_required("Email: ", "Email")?;
    let password = prompt_password()?;
    Ok(LoginInput { email, password })
}

pub fn prompt_sign_up_details() -> Result<SignUpInput, UiError> {
    let username = prompt_required("Username: ", "Username")?;
    let email = prompt_required("Email: ", "Email")?;
    let password = prompt_password()?;
    Ok(SignUpInput {
        username,
        email,
        password,
    })
}

pub fn prompt_password() -> Result<String, UiError> {
    let options = LineEditorOptions {
        mask_mode: MaskMode::Hidden,
        ..LineEditorOptions::default()
    };
    Ok(prompt_line_editor("Password: ", &options)?)
}

fn prompt_text(prompt: &str) -> Result<String, UiError> {
    Ok(prompt_line_editor(prompt, &LineEditorOptions::default())?)
}

fn prompt_required(prompt: &str, field: &str) -> Result<String, UiError> {
    let value = prompt_text(prompt)?;
    require_field(&value, field)
}

pub fn require_field(value: &str, field: &str) -> Result<String, UiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UiError::Invalid(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

pub fn parse_auth_choice(input: &str) -> Result<AuthMenuSelection, UiError> {
    match input.trim().to_lowercase().as_str() {
        "" => Err(UiError::Invalid("Selection cannot be empty".to_string())),
        "1" | "l" | "login" | "log in" => Ok(AuthMenuSelection::Login),
        "2" | "s" | "signup" | "sign up" | "register" => Ok(AuthMenuSelection::SignUp),
        "3" | "b" | "back" => Ok(AuthMenuSelection::Back),
        _ => Err(UiError::Invalid(INVALID_CHOICE_MSG.to_string())),
    }
}
