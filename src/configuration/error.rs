use std::fmt;

/// An error raised while reading a typed value out of the settings tree.
#[derive(Debug)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// The key exists but holds a value of the wrong type.
    InvalidType {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },
    /// The key is absent and no default was registered for it.
    Missing(String),
    /// The underlying configuration source failed to load or merge.
    Source(config::ConfigError),
}

impl ConfigurationError {
    pub fn invalid_type(key: &str, expected: &'static str, actual: &'static str) -> Self {
        ConfigurationError::InvalidType {
            key: key.to_owned(),
            expected,
            actual,
        }
    }

    pub fn missing(key: &str) -> Self {
        ConfigurationError::Missing(key.to_owned())
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigurationError::InvalidType {
                key,
                expected,
                actual,
            } => write!(
                f,
                "Invalid configuration value found for {} (must be {}, found {})",
                key, expected, actual
            ),
            ConfigurationError::Missing(key) => {
                write!(f, "Invalid configuration value found for {} (key not found)", key)
            }
            ConfigurationError::Source(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ConfigurationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigurationError::Source(err) => Some(err),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for ConfigurationError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => ConfigurationError::Missing(key),
            other => ConfigurationError::Source(other),
        }
    }
}
