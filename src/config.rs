use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::constants;
use crate::error::ConfigError;

/// Runtime configuration for the completion client and the web UI.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("templates_dir", &self.templates_dir)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

impl Config {
    /// Loads the `.env` file (the default lookup, or `env_file` when given)
    /// into the process environment and reads the configuration from it.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        let loaded = match env_file {
            Some(path) => dotenvy::from_path(path).map(|_| path.to_path_buf()),
            None => dotenvy::dotenv(),
        }
        .map_err(ConfigError::EnvFile)?;

        let entries = dotenvy::from_path_iter(&loaded)
            .map_err(ConfigError::EnvFile)?
            .filter(Result::is_ok)
            .count();
        if entries == 0 {
            return Err(ConfigError::EmptyEnvFile(loaded));
        }
        info!("Loaded {} variables from {}", entries, loaded.display());

        Self::from_env()
    }

    /// Reads the configuration from the process environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let api_base = lookup("OPENAI_API_BASE")
            .filter(|base| !base.trim().is_empty())
            .unwrap_or_else(|| constants::DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = lookup("OPENAI_MODEL")
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| constants::DEFAULT_MODEL.to_string());

        let temperature = match lookup("OWNCHAT_TEMPERATURE") {
            Some(raw) => parse_temperature(&raw)?,
            None => constants::DEFAULT_TEMPERATURE,
        };

        let config = Self {
            api_key,
            api_base,
            model,
            temperature,
            templates_dir: PathBuf::from(constants::TEMPLATES_DIR.as_str()),
            static_dir: PathBuf::from(constants::STATIC_DIR.as_str()),
        };
        debug!(?config, "Configuration resolved");
        Ok(config)
    }
}

fn parse_temperature(raw: &str) -> Result<f32, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        name: "OWNCHAT_TEMPERATURE",
        value: raw.to_string(),
    };
    let value: f32 = raw.trim().parse().map_err(|_| invalid())?;
    if (0.0..=2.0).contains(&value) {
        Ok(value)
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.api_base, constants::DEFAULT_API_BASE);
        assert_eq!(config.model, constants::DEFAULT_MODEL);
        assert_eq!(config.temperature, 0.0);
    }

    #[test]
    fn test_missing_api_key() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_empty_api_key_is_missing() {
        let err = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
        assert_eq!(err.to_string(), ">> OPENAI_API_KEY is not set");
    }

    #[test]
    fn test_api_base_trailing_slash_trimmed() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_API_BASE", "http://localhost:9000/v1/"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "http://localhost:9000/v1");
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[test]
    fn test_temperature_parsing() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OWNCHAT_TEMPERATURE", "0.5"),
        ]))
        .unwrap();
        assert_eq!(config.temperature, 0.5);

        for bad in ["hot", "-1", "2.5"] {
            let err = Config::from_lookup(lookup_from(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("OWNCHAT_TEMPERATURE", bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-secret")])).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
