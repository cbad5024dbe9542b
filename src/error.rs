use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not load .env file or it is empty. Please check if it exists and is readable: {0}")]
    EnvFile(#[source] dotenvy::Error),
    #[error("Could not load .env file or it is empty. Please check if it exists and is readable: {} sets no variables", .0.display())]
    EmptyEnvFile(std::path::PathBuf),
    #[error(">> OPENAI_API_KEY is not set")]
    MissingApiKey,
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("failed to reach the chat completion API: {0}")]
    Http(#[from] reqwest::Error),
    #[error("chat completion API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("chat completion API returned no message content")]
    EmptyResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown persona '{0}'")]
pub struct UnknownPersona(pub String);
