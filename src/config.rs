//! Process-wide configuration. Loaded once at startup, never read lazily by
//! the engine — the engine always takes its key as an explicit parameter.

use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("SECRET_KEY environment variable is not set")]
    MissingSecretKey,
}

/// Process-wide secret, used as the default HMAC/cipher key when a caller
/// supplies no passphrase.
#[derive(Clone)]
pub struct Config {
    pub secret_key: Vec<u8>,
}

impl Config {
    /// Load configuration from the environment. Call once at process start;
    /// a missing `SECRET_KEY` is a startup failure, not a per-request error.
    pub fn from_env() -> Result<Config, ConfigError> {
        let secret_key = env::var("SECRET_KEY")
            .map_err(|_| ConfigError::MissingSecretKey)?
            .into_bytes();
        Ok(Config { secret_key })
    }

    /// Build a config directly from bytes, bypassing the environment.
    /// Used by tests that need a deterministic key.
    pub fn with_secret_key(secret_key: impl Into<Vec<u8>>) -> Config {
        Config { secret_key: secret_key.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_secret_key_sets_bytes() {
        let cfg = Config::with_secret_key("test-key");
        assert_eq!(cfg.secret_key, b"test-key");
    }
}
