//! Environment-sourced configuration for the activity watcher.
use thiserror::Error;

pub const BEARER_TOKEN_VAR: &str = "BEARER_TOKEN";
pub const DISCORD_WEBHOOK_VAR: &str = "DISCORD_WEBHOOK";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Runtime configuration. Both values are secrets sourced from the process
/// environment (optionally seeded from a local `.env` file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bearer_token: String,
    pub webhook_url: String,
}

/// Load configuration from the process environment and validate it.
pub fn from_env() -> Result<Config, ConfigError> {
    let bearer_token =
        std::env::var(BEARER_TOKEN_VAR).map_err(|_| ConfigError::Missing(BEARER_TOKEN_VAR))?;
    let webhook_url =
        std::env::var(DISCORD_WEBHOOK_VAR).map_err(|_| ConfigError::Missing(DISCORD_WEBHOOK_VAR))?;
    let cfg = Config {
        bearer_token,
        webhook_url,
    };
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.bearer_token.trim().is_empty() {
        return Err(ConfigError::Invalid("BEARER_TOKEN must be non-empty"));
    }
    if cfg.webhook_url.trim().is_empty() {
        return Err(ConfigError::Invalid("DISCORD_WEBHOOK must be non-empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> Config {
        Config {
            bearer_token: "token".into(),
            webhook_url: "https://discord.com/api/webhooks/1/abc".into(),
        }
    }

    #[test]
    fn valid_config_ok() {
        validate(&sample()).unwrap();
    }

    #[test]
    fn empty_bearer_token_rejected() {
        let mut cfg = sample();
        cfg.bearer_token = "  ".into();
        let err = validate(&cfg).unwrap_err();
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("BEARER_TOKEN")),
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn empty_webhook_rejected() {
        let mut cfg = sample();
        cfg.webhook_url = "".into();
        let err = validate(&cfg).unwrap_err();
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("DISCORD_WEBHOOK")),
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn dotenv_file_parses_both_vars() {
        let td = tempfile::tempdir().unwrap();
        let p = td.path().join(".env");
        let mut f = std::fs::File::create(&p).unwrap();
        writeln!(f, "BEARER_TOKEN=abc123").unwrap();
        writeln!(f, "DISCORD_WEBHOOK=https://discord.com/api/webhooks/1/xyz").unwrap();

        let mut bearer = None;
        let mut webhook = None;
        for item in dotenvy::from_path_iter(&p).unwrap() {
            let (key, value) = item.unwrap();
            match key.as_str() {
                BEARER_TOKEN_VAR => bearer = Some(value),
                DISCORD_WEBHOOK_VAR => webhook = Some(value),
                _ => {}
            }
        }
        let cfg = Config {
            bearer_token: bearer.unwrap(),
            webhook_url: webhook.unwrap(),
        };
        validate(&cfg).unwrap();
        assert_eq!(cfg.bearer_token, "abc123");
    }

    #[test]
    fn from_env_roundtrip() {
        std::env::set_var(BEARER_TOKEN_VAR, "env-token");
        std::env::set_var(DISCORD_WEBHOOK_VAR, "https://discord.com/api/webhooks/2/def");
        let cfg = from_env().unwrap();
        assert_eq!(cfg.bearer_token, "env-token");
        assert!(cfg.webhook_url.ends_with("/2/def"));
    }
}
