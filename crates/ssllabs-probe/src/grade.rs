//! Grade ordering and threshold classification.
//!
//! SSL Labs grades are short strings (`A+`, `A`, `A-`, `B` … `F`, `T`, `M`).
//! They are ordered with a fixed heuristic rather than a severity table:
//! grades with different leading letters sort alphabetically, grades that
//! share a leading letter sort in reverse byte order.

use crate::status::Status;

/// Treat an empty grade the same as a missing one.
fn present(grade: Option<&str>) -> Option<&str> {
    grade.filter(|g| !g.is_empty())
}

/// Ordering predicate shared by worst-grade reduction and threshold checks.
///
/// Returns `true` when `b` ranks past `a`: an absent `a` is always passed,
/// an absent `b` never passes anything.
pub fn is_worse(a: Option<&str>, b: Option<&str>) -> bool {
    let Some(a) = present(a) else {
        return true;
    };
    let Some(b) = present(b) else {
        return false;
    };

    if a.chars().next() == b.chars().next() {
        a > b
    } else {
        a < b
    }
}

/// Reduce a sequence of endpoint grades to the worst one.
///
/// Starts from "no grade"; each grade replaces the current worst when
/// [`is_worse`]`(worst, grade)` holds.
pub fn worst_grade<'a, I>(grades: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    grades.into_iter().fold(None, |worst, grade| {
        if is_worse(worst, grade) {
            present(grade)
        } else {
            worst
        }
    })
}

/// Warning and critical grade boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thresholds {
    warning: String,
    critical: String,
}

impl Thresholds {
    /// Build thresholds, rejecting a warning grade that ranks past the
    /// critical grade.
    pub fn new(
        warning: impl Into<String>,
        critical: impl Into<String>,
    ) -> Result<Self, ThresholdError> {
        let warning = warning.into();
        let critical = critical.into();

        if warning.is_empty() || critical.is_empty() {
            return Err(ThresholdError::Empty);
        }
        if is_worse(Some(&critical), Some(&warning)) {
            return Err(ThresholdError::Inverted { warning, critical });
        }

        Ok(Self { warning, critical })
    }

    pub fn warning(&self) -> &str {
        &self.warning
    }

    pub fn critical(&self) -> &str {
        &self.critical
    }

    /// Map an observed worst grade onto a status level.
    pub fn classify(&self, grade: Option<&str>) -> Status {
        if trips(&self.critical, grade) {
            Status::Critical
        } else if trips(&self.warning, grade) {
            Status::Warning
        } else {
            Status::Ok
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: "B".to_string(),
            critical: "C".to_string(),
        }
    }
}

/// A grade at the threshold, or past it, trips the threshold.
fn trips(threshold: &str, grade: Option<&str>) -> bool {
    present(grade) == Some(threshold) || is_worse(Some(threshold), grade)
}

/// Invalid threshold configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThresholdError {
    #[error("threshold grades must not be empty")]
    Empty,

    #[error(
        "threshold for warning has to be below critical (warning '{warning}', critical '{critical}')"
    )]
    Inverted { warning: String, critical: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTERS: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

    #[test]
    fn absent_a_is_always_passed() {
        assert!(is_worse(None, Some("A+")));
        assert!(is_worse(None, Some("F")));
        assert!(is_worse(None, None));
        assert!(is_worse(Some(""), Some("B")));
    }

    #[test]
    fn absent_b_never_passes() {
        for g in ["A+", "A", "A-", "B", "F", "T", "M"] {
            assert!(!is_worse(Some(g), None));
            assert!(!is_worse(Some(g), Some("")));
        }
    }

    #[test]
    fn same_letter_uses_descending_order() {
        assert!(is_worse(Some("A-"), Some("A+")));
        assert!(!is_worse(Some("A+"), Some("A-")));
        assert!(is_worse(Some("A+"), Some("A")));
        assert!(!is_worse(Some("A"), Some("A")));
    }

    #[test]
    fn different_letters_use_ascending_order() {
        for a in LETTERS {
            for b in LETTERS {
                if a == b {
                    continue;
                }
                assert_eq!(is_worse(Some(a), Some(b)), a < b, "{a} vs {b}");
            }
        }
        assert!(is_worse(Some("B"), Some("C")));
        assert!(!is_worse(Some("C"), Some("B")));
        assert!(is_worse(Some("A+"), Some("B")));
    }

    #[test]
    fn worst_of_b_and_f_is_f() {
        assert_eq!(worst_grade([Some("B"), Some("F")]), Some("F"));
        assert_eq!(worst_grade([Some("F"), Some("B")]), Some("F"));
    }

    #[test]
    fn worst_grade_skips_missing_grades() {
        assert_eq!(worst_grade([None, Some("A"), None]), Some("A"));
        assert_eq!(worst_grade([Some(""), Some("B")]), Some("B"));
        assert_eq!(worst_grade(Vec::<Option<&str>>::new()), None);
        assert_eq!(worst_grade([None, None]), None);
    }

    #[test]
    fn default_thresholds_classify_examples() {
        let t = Thresholds::default();
        assert_eq!(t.classify(Some("A+")), Status::Ok);
        assert_eq!(t.classify(Some("A")), Status::Ok);
        assert_eq!(t.classify(Some("B")), Status::Warning);
        assert_eq!(t.classify(Some("C")), Status::Critical);
        assert_eq!(t.classify(Some("D")), Status::Critical);
        assert_eq!(t.classify(Some("F")), Status::Critical);
    }

    #[test]
    fn classification_is_monotonic_over_letters() {
        let t = Thresholds::default();
        let levels: Vec<Status> = LETTERS.iter().map(|g| t.classify(Some(*g))).collect();
        assert!(levels.windows(2).all(|w| w[0] <= w[1]), "{levels:?}");
    }

    #[test]
    fn missing_grade_does_not_trip_thresholds() {
        assert_eq!(Thresholds::default().classify(None), Status::Ok);
    }

    #[test]
    fn thresholds_accept_equal_grades() {
        let t = Thresholds::new("B", "B").unwrap();
        assert_eq!(t.classify(Some("B")), Status::Critical);
        assert_eq!(t.classify(Some("A")), Status::Ok);
    }

    #[test]
    fn thresholds_reject_warning_past_critical() {
        let err = Thresholds::new("C", "B").unwrap_err();
        assert!(matches!(err, ThresholdError::Inverted { .. }));
        assert!(Thresholds::new("A", "B").is_ok());
    }

    #[test]
    fn thresholds_reject_empty() {
        assert_eq!(Thresholds::new("", "C"), Err(ThresholdError::Empty));
    }
}
