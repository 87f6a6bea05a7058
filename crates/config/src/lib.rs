//! Configuration files.

use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::path::Path;
use voltaire_tracing::LogFormat;

/// Default cap on the size of a raw transaction accepted for decoding (128 KiB).
pub const DEFAULT_MAX_ENCODED_LEN: usize = 4 * 32 * 1024;

/// Configuration for the voltaire tools.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct Config {
    /// Transaction codec configuration.
    pub codec: CodecConfig,
    /// Logging configuration.
    pub log: LogConfig,
}

impl Config {
    /// Loads the configuration at `path`, writing the defaults there first if the file does not
    /// exist.
    pub fn load(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        confy::load_path::<Self>(path)
            .wrap_err_with(|| format!("Could not load config file {}", path.display()))
    }
}

/// Transaction codec configuration.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Chain id decoded transactions are expected to carry. `None` accepts any chain.
    pub chain_id: Option<u64>,
    /// Raw transactions longer than this many bytes are rejected before decoding.
    pub max_encoded_len: usize,
    /// Treat a sender mismatch during verification as an error instead of a `false` result.
    pub require_sender_match: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            chain_id: None,
            max_encoded_len: DEFAULT_MAX_ENCODED_LEN,
            require_sender_match: false,
        }
    }
}

impl CodecConfig {
    /// Checks a raw transaction length against [`CodecConfig::max_encoded_len`].
    pub fn check_size(&self, len: usize) -> Result<(), ConfigError> {
        if len > self.max_encoded_len {
            return Err(ConfigError::Oversized { len, max: self.max_encoded_len })
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Output format.
    pub format: LogFormat,
    /// Comma separated tracing directives, e.g. `primitives::tx=debug`.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { format: LogFormat::Terminal, filter: String::new() }
    }
}

/// Errors raised by configured limits.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The raw transaction exceeds the configured size.
    #[error("encoded transaction is {len} bytes, limit is {max}")]
    Oversized {
        /// Length of the input.
        len: usize,
        /// Configured limit.
        max: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTENSION: &str = "toml";

    fn with_tempdir(filename: &str, proc: fn(&std::path::Path)) {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join(filename).with_extension(EXTENSION);

        proc(&config_path);

        temp_dir.close().unwrap()
    }

    #[test]
    fn test_store_config() {
        with_tempdir("config-store-test", |config_path| {
            let config = Config::default();
            confy::store_path(config_path, config).unwrap();
        })
    }

    #[test]
    fn test_load_config() {
        with_tempdir("config-load-test", |config_path| {
            let config = Config::default();
            confy::store_path(config_path, &config).unwrap();

            let loaded_config = Config::load(config_path).unwrap();
            assert_eq!(config, loaded_config);
        })
    }

    #[test]
    fn test_load_creates_missing_file() {
        with_tempdir("config-missing-test", |config_path| {
            assert!(!config_path.exists());
            assert_eq!(Config::load(config_path).unwrap(), Config::default());
            assert!(config_path.exists());
        })
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [codec]
            chain_id = 5

            [log]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.codec.chain_id, Some(5));
        assert_eq!(config.codec.max_encoded_len, DEFAULT_MAX_ENCODED_LEN);
        assert_eq!(config.log.format, LogFormat::Json);
        assert!(config.log.filter.is_empty());
    }

    #[test]
    fn size_limit() {
        let config = CodecConfig { max_encoded_len: 10, ..Default::default() };
        assert!(config.check_size(10).is_ok());
        assert_eq!(config.check_size(11), Err(ConfigError::Oversized { len: 11, max: 10 }));
    }
}
