use tokio::sync::mpsc;
use tracing::warn;

use super::prompt::PromptTurn;
use super::{GeneratedReply, ResponseGenerator};
use crate::core::companion::CompanionId;

#[derive(Clone, Debug)]
pub enum GenerationEvent {
    Reply(GeneratedReply),
    Failed(String),
}

/// Everything a background task needs to produce one reply.
pub struct GenerationRequest {
    pub generator: ResponseGenerator,
    pub history: Vec<PromptTurn>,
    pub companion: CompanionId,
    pub companion_name: String,
    pub ticket: u64,
}

/// Runs generation calls off the input loop and reports each outcome tagged
/// with the ticket of the turn that asked for it.
#[derive(Clone)]
pub struct GenerationService {
    tx: mpsc::UnboundedSender<(GenerationEvent, u64)>,
}

impl GenerationService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(GenerationEvent, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_generation(&self, request: GenerationRequest) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let GenerationRequest {
                generator,
                history,
                companion,
                companion_name,
                ticket,
            } = request;

            let event = match generator
                .generate(&history, companion, &companion_name)
                .await
            {
                Ok(reply) => GenerationEvent::Reply(reply),
                Err(err) => {
                    warn!(ticket, companion = %companion, error = %err, "reply generation failed");
                    GenerationEvent::Failed(err.to_string())
                }
            };

            // The receiver is gone once the chat loop has exited; nothing to report to.
            let _ = tx.send((event, ticket));
        });
    }
}
