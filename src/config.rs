use std::env;
use std::str::FromStr;
use std::time::Duration;

use log::warn;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone, Debug)]
pub struct GenerationConfig {
    /// Missing credentials do not stop the server; generation calls fail instead.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GenerationConfig {
    /// Key with all but the first and last four characters hidden, for logs
    /// and the health report.
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| {
            if key.len() > 8 && key.is_ascii() {
                format!("{}***{}", &key[0..4], &key[key.len() - 4..])
            } else {
                "***".to_string()
            }
        })
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub generation: GenerationConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't have to mutate
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("OPENAI_API_KEY").or_else(|| non_empty("OPENAI_API_KEY_ENV_VAR"));

        let generation = GenerationConfig {
            api_key,
            model: non_empty("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_empty("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            temperature: parse_or(&lookup, "OPENAI_TEMPERATURE", DEFAULT_TEMPERATURE),
            timeout: Duration::from_secs(parse_or(
                &lookup,
                "OPENAI_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )),
        };

        Self {
            host: non_empty("HOST").unwrap_or_else(|| HOST.to_string()),
            port: parse_or(&lookup, "PORT", PORT),
            environment: non_empty("RUST_ENV").unwrap_or_else(|| "development".to_string()),
            generation,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.generation.api_key, None);
        assert_eq!(config.generation.model, "gpt-4o");
        assert_eq!(config.generation.temperature, 0.7);
        assert_eq!(config.generation.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_overrides_and_fallback_key() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("OPENAI_API_KEY_ENV_VAR", "sk-fallback-key-1234"),
            ("OPENAI_BASE_URL", "http://localhost:4010/v1/"),
            ("OPENAI_TEMPERATURE", "0.2"),
        ]);
        assert_eq!(config.port, 9000);
        assert_eq!(config.generation.api_key.as_deref(), Some("sk-fallback-key-1234"));
        assert_eq!(config.generation.base_url, "http://localhost:4010/v1");
        assert_eq!(config.generation.temperature, 0.2);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[("PORT", "eighty"), ("OPENAI_TIMEOUT_SECS", "-1")]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.generation.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_masked_api_key() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-abcdefghijklmnop")]);
        assert_eq!(
            config.generation.masked_api_key().as_deref(),
            Some("sk-a***mnop")
        );

        let short = config_from(&[("OPENAI_API_KEY", "short")]);
        assert_eq!(short.generation.masked_api_key().as_deref(), Some("***"));
    }
}
