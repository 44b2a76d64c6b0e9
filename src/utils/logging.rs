use crate::core::message::Message;
use std::error::Error;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_VAR: &str = "CHATBUDDY_LOG";
pub const LOG_FILE_VAR: &str = "CHATBUDDY_LOG_FILE";
const DEFAULT_FILTER: &str = "warn";

/// Install the global `tracing` subscriber.
///
/// Diagnostics go to stderr unless `CHATBUDDY_LOG_FILE` names a file, which
/// keeps them from tearing through the chat screen.
pub fn init_tracing() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_env(LOG_FILTER_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match std::env::var_os(LOG_FILE_VAR) {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| err as Box<dyn Error>)?;
        }
        None => {
            builder
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|err| err as Box<dyn Error>)?;
        }
    }
    Ok(())
}

/// Appends "Name: text" lines for every message in a conversation.
pub struct TranscriptLog {
    file_path: Option<PathBuf>,
}

impl TranscriptLog {
    pub fn new(log_file: Option<PathBuf>) -> Result<Self, Box<dyn Error>> {
        if let Some(path) = &log_file {
            test_file_access(path)?;
        }
        Ok(Self {
            file_path: log_file,
        })
    }

    pub fn disabled() -> Self {
        Self { file_path: None }
    }

    pub fn is_active(&self) -> bool {
        self.file_path.is_some()
    }

    pub fn status(&self) -> String {
        match &self.file_path {
            None => "disabled".to_string(),
            Some(path) => format!(
                "active ({})",
                path.file_name().unwrap_or_default().to_string_lossy()
            ),
        }
    }

    pub fn log_message(
        &self,
        message: &Message,
        user_name: &str,
        companion_name: &str,
    ) -> Result<(), Box<dyn Error>> {
        let speaker = if message.is_user() {
            user_name
        } else {
            companion_name
        };
        self.write_block(&format!("{speaker}: {}", message.content()))
    }

    /// Marks a companion switch or a new session in the transcript.
    pub fn log_marker(&self, text: &str) -> Result<(), Box<dyn Error>> {
        self.write_block(&format!("## {text}"))
    }

    fn write_block(&self, content: &str) -> Result<(), Box<dyn Error>> {
        let Some(file_path) = &self.file_path else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        writeln!(writer)?;

        writer.flush()?;
        Ok(())
    }
}

fn test_file_access(path: &Path) -> Result<(), Box<dyn Error>> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Sender;
    use tempfile::tempdir;

    #[test]
    fn transcript_prefixes_speaker_names() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("chat.log");
        let log = TranscriptLog::new(Some(path.clone())).expect("log");

        log.log_marker("Chatting with Jenny").expect("marker");
        log.log_message(&Message::new("1-0", Sender::User, "hi"), "sam", "Jenny")
            .expect("user");
        log.log_message(
            &Message::new("1-1", Sender::Ai, "Hello!\nMissed you 💕"),
            "sam",
            "Jenny",
        )
        .expect("ai");

        let contents = std::fs::read_to_string(&path).expect("read");
        assert_eq!(
            contents,
            "## Chatting with Jenny\n\nsam: hi\n\nJenny: Hello!\nMissed you 💕\n\n"
        );
        assert_eq!(log.status(), "active (chat.log)");
    }

    #[test]
    fn disabled_log_writes_nothing() {
        let log = TranscriptLog::disabled();
        assert!(!log.is_active());
        assert_eq!(log.status(), "disabled");
        log.log_marker("ignored").expect("noop");
    }
}
