use crate::reporter::single::Failure;
use crate::reporter::status::Status;
use config::{Config, ConfigError, File};
use serde_derive::Deserialize;
use std::path::PathBuf;

/// A recorded run to replay through the printer: suites in encounter
/// order, each with its tests and their reported outcomes.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub suites: Vec<SuiteEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuiteEntry {
    pub name: String,
    #[serde(default)]
    pub tests: Vec<TestEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestEntry {
    pub name: String,
    pub status: Status,
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub failure: Option<FailureEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FailureEntry {
    pub exception: String,
    pub message: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub line: Option<usize>,
}

impl Manifest {
    pub fn from(file: PathBuf) -> Result<Self, ConfigError> {
        let mut config = Config::new();
        config.merge(File::from(file))?;
        config.try_into()
    }
}

impl From<FailureEntry> for Failure {
    fn from(entry: FailureEntry) -> Self {
        Failure {
            exception: entry.exception,
            message: entry.message,
            file: entry.file,
            line: entry.line,
        }
    }
}
