pub(crate) mod grading;

use self::grading::{GradeThresholds, TimeGrading};

/// An elapsed measurement for one test, together with its severity grade.
/// A test that never reported a time stays `None` and grades null.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Time {
    seconds: Option<f64>,
    grading: TimeGrading,
}

impl Time {
    pub fn parse(seconds: Option<f64>, thresholds: &GradeThresholds) -> Self {
        Self {
            seconds,
            grading: TimeGrading::determine(seconds, thresholds),
        }
    }

    pub fn none() -> Self {
        Self {
            seconds: None,
            grading: TimeGrading::Null,
        }
    }

    pub fn seconds(&self) -> Option<f64> {
        self.seconds
    }

    pub fn grading(&self) -> TimeGrading {
        self.grading
    }

    pub fn format(&self) -> String {
        match self.seconds {
            Some(seconds) => format!("{}s", format_seconds(seconds)),
            None => "unknown".to_owned(),
        }
    }
}

/// Three-decimal rendering with thousands grouping on the integral part.
pub fn format_seconds(seconds: f64) -> String {
    let fixed = format!("{:.3}", seconds);
    let mut parts = fixed.splitn(2, '.');
    let integral = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();

    let (sign, digits) = match integral.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integral),
    };

    let mut grouped = String::new();
    let length = digits.len();
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (length - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}{}.{}", sign, grouped, fraction)
}
