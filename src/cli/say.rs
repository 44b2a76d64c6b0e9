//! One-shot "say" command: send a single message and print the reply.

use std::error::Error;

use crate::core::app::App;
use crate::core::companion::CompanionId;
use crate::generator::GeneratedReply;

fn format_reply(companion_name: &str, reply: &GeneratedReply) -> String {
    format!(
        "{companion_name}: {}\n\n{companion_name} is feeling {} {}",
        reply.text,
        reply.mood,
        reply.mood.emoji()
    )
}

pub async fn run_say(
    mut app: App,
    companion: Option<CompanionId>,
    prompt: Vec<String>,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: chatbuddy say [-c <companion>] <message>");
        std::process::exit(1);
    }

    let signed_in = match app.restore_session().await {
        Ok(signed_in) => signed_in,
        Err(err) => {
            eprintln!("❌ Could not restore your session: {err}");
            std::process::exit(1);
        }
    };
    if !signed_in {
        eprintln!("❌ Not signed in. Run 'chatbuddy login' first.");
        std::process::exit(1);
    }

    let companion = companion.unwrap_or_else(|| app.default_companion());
    app.select_companion(companion);
    match app.send_and_wait(&prompt).await {
        Ok(reply) => {
            println!("{}", format_reply(app.companion().name, &reply));
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::companion::Mood;

    #[test]
    fn reply_is_followed_by_mood_line() {
        let reply = GeneratedReply {
            text: "Always here for you".to_string(),
            mood: Mood::Loving,
        };
        assert_eq!(
            format_reply("Allu", &reply),
            "Allu: Always here for you\n\nAllu is feeling loving 🥰"
        );
    }
}
