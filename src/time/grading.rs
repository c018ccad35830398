use std::cmp::Ordering;

/// Severity bucket assigned to an elapsed duration, used to colourise the
/// time column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeGrading {
    Fast,
    Okay,
    Slow,
    Null,
}

/// The three graded ceilings, in seconds. Configuration may supply them in
/// any order; `determine` ranks them by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeThresholds {
    pub fast: f64,
    pub okay: f64,
    pub slow: f64,
}

impl TimeGrading {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeGrading::Fast => "fast",
            TimeGrading::Okay => "okay",
            TimeGrading::Slow => "slow",
            TimeGrading::Null => "null",
        }
    }

    /// Assign the smallest-ceiling grade the duration does not exceed. The
    /// comparison is inclusive, so a duration exactly on a ceiling belongs
    /// to that grade. Durations beyond every ceiling grade slow; a missing
    /// duration is always null, thresholds unconsulted.
    pub fn determine(seconds: Option<f64>, thresholds: &GradeThresholds) -> TimeGrading {
        let seconds = match seconds {
            Some(seconds) => seconds,
            None => return TimeGrading::Null,
        };

        let mut ranked = [
            (TimeGrading::Fast, thresholds.fast),
            (TimeGrading::Okay, thresholds.okay),
            (TimeGrading::Slow, thresholds.slow),
        ];
        ranked.sort_by(|left, right| left.1.partial_cmp(&right.1).unwrap_or(Ordering::Equal));

        for (grading, ceiling) in ranked.iter() {
            if seconds <= *ceiling {
                return *grading;
            }
        }

        TimeGrading::Slow
    }
}
