//! Chatbot conversation state

use crate::client::PortalClient;
use crate::error::ClientError;
use medportal_core::{ChatTurn, ChatbotReply, ChatbotRequest};
use tracing::debug;

/// Number of previous turns sent along as context
pub const CONTEXT_TURNS: usize = 6;

const EMPTY_REPLY: &str = "I am here to help.";
const FAILED_REPLY: &str = "Sorry, I could not process that. Please try again.";
const FAILED_NOTICE: &str = "Failed to reach AI assistant";

/// A running conversation with the AI assistant
#[derive(Debug, Clone)]
pub struct ChatConversation {
    client: PortalClient,
    history: Vec<ChatTurn>,
}

impl ChatConversation {
    pub fn new(client: PortalClient) -> Self {
        Self {
            client,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Send one message and append both sides to the transcript
    ///
    /// Blank input is ignored and returns `Ok(None)`. On failure a canned bot
    /// turn is appended and the error is returned after notifying.
    pub async fn send(&mut self, prompt: &str) -> Result<Option<ChatbotReply>, ClientError> {
        let message = prompt.trim();
        if message.is_empty() {
            return Ok(None);
        }

        let start = self.history.len().saturating_sub(CONTEXT_TURNS);
        let request = ChatbotRequest {
            message: message.to_string(),
            context: self.history[start..].to_vec(),
        };
        self.history.push(ChatTurn::user(message));

        match self.client.ai().chatbot(&request).await {
            Ok(response) => {
                let reply = response.response.unwrap_or_default();
                let text = reply
                    .reply
                    .as_deref()
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or(EMPTY_REPLY);
                debug!(kind = ?reply.kind, "assistant replied");
                self.history.push(ChatTurn::bot(text));
                Ok(Some(reply))
            }
            Err(err) => {
                self.client
                    .notifier()
                    .error(err.server_message().unwrap_or(FAILED_NOTICE));
                self.history.push(ChatTurn::bot(FAILED_REPLY));
                Err(err)
            }
        }
    }
}
