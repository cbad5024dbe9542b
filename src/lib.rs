pub mod chat;
pub mod completion;
pub mod config;
pub mod constants;
pub mod error;
pub mod persona;
pub mod session;
pub mod web_server;

pub use completion::{Completion, OpenAiClient};
pub use config::Config;
pub use error::{ChatError, ConfigError, UnknownPersona};
pub use persona::Persona;
pub use session::{ChatMessage, MessageRole, PendingExchange, Session, TranscriptEntry, Visibility};
