use serde_derive::Deserialize;
use std::fmt;

/// Outcome classification of a single test. Presentation attributes (icon,
/// terms, colors) live in the settings tree under `statuses.<name>.*`; only
/// the aggregation behavior is intrinsic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Success,
    Failed,
    Error,
    Warning,
    Skipped,
    Incomplete,
    Risky,
    Unknown,
}

impl Status {
    pub fn all() -> [Status; 9] {
        [
            Status::Pending,
            Status::Success,
            Status::Failed,
            Status::Error,
            Status::Warning,
            Status::Skipped,
            Status::Incomplete,
            Status::Risky,
            Status::Unknown,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Success => "success",
            Status::Failed => "failed",
            Status::Error => "error",
            Status::Warning => "warning",
            Status::Skipped => "skipped",
            Status::Incomplete => "incomplete",
            Status::Risky => "risky",
            Status::Unknown => "unknown",
        }
    }

    /// The aggregation group this status reduces to. Every status maps to
    /// exactly one of success, warning, failed.
    pub fn group(&self) -> Status {
        match self {
            Status::Success => Status::Success,
            Status::Failed | Status::Error => Status::Failed,
            _ => Status::Warning,
        }
    }

    /// Worst-status-wins reduction: failed > warning > success, with
    /// unknown reserved for an empty input.
    pub fn lowest_denominator<I>(statuses: I) -> Status
    where
        I: IntoIterator<Item = Status>,
    {
        let mut any_success = false;
        let mut any_warning = false;

        for status in statuses {
            match status.group() {
                Status::Failed => return Status::Failed,
                Status::Warning => any_warning = true,
                Status::Success => any_success = true,
                _ => {}
            }
        }

        if any_warning {
            Status::Warning
        } else if any_success {
            Status::Success
        } else {
            Status::Unknown
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
