use crate::configuration::error::ConfigurationError;
use std::fmt;
use std::io;

/// Unrecoverable failures inside the printer. Host-supplied test failures
/// are data on the records, never one of these.
#[derive(Debug)]
#[non_exhaustive]
pub enum PrinterError {
    /// A settings value could not be read with the expected type.
    Configuration(ConfigurationError),
    /// The terminal is too narrow for the configured fixed columns, leaving
    /// no room for the name column.
    NameColumnExhausted {
        terminal_width: usize,
        required: usize,
    },
    /// Writing to the output failed.
    Io(io::Error),
}

impl fmt::Display for PrinterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PrinterError::Configuration(err) => err.fmt(f),
            PrinterError::NameColumnExhausted {
                terminal_width,
                required,
            } => write!(
                f,
                "Terminal width {} cannot fit the configured columns (at least {} required)",
                terminal_width,
                required + 1
            ),
            PrinterError::Io(err) => write!(f, "Failed to write report output: {}", err),
        }
    }
}

impl std::error::Error for PrinterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PrinterError::Configuration(err) => Some(err),
            PrinterError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigurationError> for PrinterError {
    fn from(err: ConfigurationError) -> Self {
        PrinterError::Configuration(err)
    }
}

impl From<io::Error> for PrinterError {
    fn from(err: io::Error) -> Self {
        PrinterError::Io(err)
    }
}
