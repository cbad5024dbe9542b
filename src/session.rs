use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::completion::Completion;
use crate::error::ChatError;
use crate::persona::Persona;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: MessageRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: MessageRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: MessageRole::Assistant, content: content.into() }
    }
}

/// Whether the raw message list is dumped under the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

/// A displayable transcript line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub key: String,
    pub is_user: bool,
    pub content: String,
}

/// A request waiting on the completion API: the current list followed by
/// the new system and user records.
#[derive(Debug, Clone)]
pub struct PendingExchange {
    request: Vec<ChatMessage>,
}

impl PendingExchange {
    pub fn request(&self) -> &[ChatMessage] {
        &self.request
    }
}

/// One conversation: the message list plus the sidebar settings.
#[derive(Debug, Clone, Default)]
pub struct Session {
    messages: Vec<ChatMessage>,
    persona: Persona,
    role_prompt: Option<String>,
    visibility: Visibility,
    last_error: Option<String>,
}

impl Session {
    pub fn new(persona: Persona) -> Self {
        Self { persona, ..Self::default() }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    /// The prompt the next submission will send as its system message.
    pub fn role_prompt(&self) -> &str {
        self.role_prompt.as_deref().unwrap_or_else(|| self.persona.role_prompt())
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Switches persona. A changed persona drops any edited role prompt.
    pub fn set_persona(&mut self, persona: Persona) {
        if persona != self.persona {
            debug!(from = %self.persona, to = %persona, "Persona changed");
            self.persona = persona;
            self.role_prompt = None;
        }
    }

    /// Overrides the role prompt for the current persona. Text identical to the
    /// persona default, or blank text, clears the override.
    pub fn set_role_prompt(&mut self, prompt: &str) {
        if prompt.trim().is_empty() || prompt == self.persona.role_prompt() {
            self.role_prompt = None;
        } else {
            self.role_prompt = Some(prompt.to_string());
        }
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    pub fn clear(&mut self) {
        info!(dropped = self.messages.len(), "Clearing conversation");
        self.messages.clear();
        self.last_error = None;
    }

    /// Builds the request for `input` without touching the message list.
    /// Blank input yields `None`.
    pub fn begin(&self, input: &str) -> Option<PendingExchange> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let mut request = Vec::with_capacity(self.messages.len() + 2);
        request.extend_from_slice(&self.messages);
        request.push(ChatMessage::system(self.role_prompt()));
        request.push(ChatMessage::user(input));
        Some(PendingExchange { request })
    }

    /// Records the outcome of a pending exchange. Only a successful reply
    /// touches the list, and then all three records land together.
    pub fn finish(
        &mut self,
        pending: PendingExchange,
        outcome: Result<String, ChatError>,
    ) -> Result<String, ChatError> {
        match outcome {
            Ok(reply) => {
                let mut request = pending.request;
                let user = request.pop();
                let system = request.pop();
                if request.len() != self.messages.len() {
                    debug!("Conversation changed while waiting for the reply");
                }
                self.messages.extend(system);
                self.messages.extend(user);
                self.messages.push(ChatMessage::assistant(reply.clone()));
                self.last_error = None;
                Ok(reply)
            }
            Err(e) => {
                warn!(error = %e, "Completion failed, discarding the pending exchange");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Sends `input` with the current role prompt and records the reply.
    ///
    /// Blank input does nothing and yields `Ok(None)`. The list is only
    /// modified once the reply has arrived, so a failed or cancelled call
    /// leaves it as it was.
    pub async fn submit<C: Completion>(
        &mut self,
        input: &str,
        client: &C,
    ) -> Result<Option<String>, ChatError> {
        let Some(pending) = self.begin(input) else {
            return Ok(None);
        };
        let outcome = client.complete(pending.request()).await;
        self.finish(pending, outcome).map(Some)
    }

    /// User and assistant lines in order; system messages are never shown.
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.messages
            .iter()
            .enumerate()
            .filter_map(|(i, msg)| match msg.role {
                MessageRole::System => None,
                MessageRole::User => Some(TranscriptEntry {
                    key: format!("{}_user", i),
                    is_user: true,
                    content: msg.content.clone(),
                }),
                MessageRole::Assistant => Some(TranscriptEntry {
                    key: format!("{}_ai", i),
                    is_user: false,
                    content: msg.content.clone(),
                }),
            })
            .collect()
    }
}
