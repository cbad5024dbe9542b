// Defaults for values that can be overridden from the environment.

use std::env;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_PORT: u16 = 8501;
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

pub const PAGE_TITLE: &str = "Your own ChatGPT";
pub const PAGE_ICON: &str = "💬";

lazy_static::lazy_static! {
    pub static ref TEMPLATES_DIR: String = env::var("OWNCHAT_TEMPLATES_DIR").unwrap_or_else(|_| "templates".to_string());
    pub static ref STATIC_DIR: String = env::var("OWNCHAT_STATIC_DIR").unwrap_or_else(|_| "static".to_string());
}
