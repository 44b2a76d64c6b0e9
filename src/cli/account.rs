//! `login`, `signup`, `logout` and `status` subcommands.

use std::error::Error;

use crate::auth::ui::{prompt_login_details, prompt_sign_up_details, UiError};
use crate::auth::{SessionManager, SignUpOutcome};
use crate::ui::render;
use crate::ui::theme::Theme;

fn exit_on_prompt_error(err: UiError) -> ! {
    if err.is_cancelled() {
        eprintln!("Cancelled.");
        std::process::exit(130);
    }
    eprintln!("❌ {err}");
    std::process::exit(1);
}

pub async fn run_login(mut sessions: SessionManager) -> Result<(), Box<dyn Error>> {
    let details = prompt_login_details().unwrap_or_else(|err| exit_on_prompt_error(err));
    match sessions.sign_in(&details.email, &details.password).await {
        Ok(profile) => {
            println!("✅ Signed in as {} ({})", profile.name, profile.email);
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ Sign in failed: {err}");
            std::process::exit(1);
        }
    }
}

pub async fn run_signup(mut sessions: SessionManager) -> Result<(), Box<dyn Error>> {
    let details = prompt_sign_up_details().unwrap_or_else(|err| exit_on_prompt_error(err));
    match sessions
        .sign_up(&details.email, &details.password, &details.username)
        .await
    {
        Ok(SignUpOutcome::SignedIn(profile)) => {
            println!("✅ Account created. Signed in as {}", profile.name);
            Ok(())
        }
        Ok(SignUpOutcome::ConfirmationRequired) => {
            println!("📧 Account created. Confirm it from your inbox, then run 'chatbuddy login'.");
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ Sign up failed: {err}");
            std::process::exit(1);
        }
    }
}

pub async fn run_logout(mut sessions: SessionManager) -> Result<(), Box<dyn Error>> {
    if let Err(err) = sessions.restore().await {
        tracing::debug!(error = %err, "no usable session before logout");
    }
    let was_signed_in = sessions.is_signed_in();
    sessions.sign_out().await?;
    if was_signed_in {
        println!("✅ Signed out");
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

pub async fn run_status(mut sessions: SessionManager) -> Result<(), Box<dyn Error>> {
    if let Err(err) = sessions.restore().await {
        eprintln!("⚠️  Could not restore your session: {err}");
    }
    match sessions.profile() {
        Some(profile) => render::emit(&render::profile_card(profile, &Theme::neutral()))?,
        None => println!("Not signed in. Run 'chatbuddy login' to sign in."),
    }
    Ok(())
}
