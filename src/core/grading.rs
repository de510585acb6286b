//! Letter grades and grade points
//!
//! Letters are derived from the stored numeric grade whenever they are needed;
//! nothing here is cached on a record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest valid numeric grade
pub const MIN_GRADE: f64 = 0.0;
/// Highest valid numeric grade
pub const MAX_GRADE: f64 = 100.0;

/// Label shown for an enrollment without a grade
pub const UNGRADED_LABEL: &str = "N/A";

/// Discrete letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    /// 97 to 100
    APlus,
    /// 93 to below 97
    A,
    /// 90 to below 93
    AMinus,
    /// 87 to below 90
    BPlus,
    /// 83 to below 87
    B,
    /// 80 to below 83
    BMinus,
    /// 77 to below 80
    CPlus,
    /// 73 to below 77
    C,
    /// 70 to below 73
    CMinus,
    /// 60 to below 70
    D,
    /// Below 60
    F,
}

/// Lower bound of each letter, highest first
const THRESHOLDS: [(f64, LetterGrade); 10] = [
    (97.0, LetterGrade::APlus),
    (93.0, LetterGrade::A),
    (90.0, LetterGrade::AMinus),
    (87.0, LetterGrade::BPlus),
    (83.0, LetterGrade::B),
    (80.0, LetterGrade::BMinus),
    (77.0, LetterGrade::CPlus),
    (73.0, LetterGrade::C),
    (70.0, LetterGrade::CMinus),
    (60.0, LetterGrade::D),
];

impl LetterGrade {
    /// Map a numeric grade to its letter
    ///
    /// Lower bounds are inclusive, so `93.0` is an `A` and `92.999` an `A-`.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        THRESHOLDS
            .iter()
            .find(|(floor, _)| score >= *floor)
            .map_or(Self::F, |(_, letter)| *letter)
    }

    /// Points on the 4.0 scale
    #[must_use]
    pub const fn points(self) -> f64 {
        match self {
            Self::APlus | Self::A => 4.0,
            Self::AMinus => 3.7,
            Self::BPlus => 3.3,
            Self::B => 3.0,
            Self::BMinus => 2.7,
            Self::CPlus => 2.3,
            Self::C => 2.0,
            Self::CMinus => 1.7,
            Self::D => 1.0,
            Self::F => 0.0,
        }
    }

    /// Whether the letter carries credit
    #[must_use]
    pub const fn is_passing(self) -> bool {
        !matches!(self, Self::F)
    }

    /// Display form (e.g., `A-`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::CMinus => "C-",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Letter for an optional grade; `None` stays `None`
#[must_use]
pub fn letter_for(grade: Option<f64>) -> Option<LetterGrade> {
    grade.map(LetterGrade::from_score)
}

/// Display label for an optional grade, `N/A` when ungraded
#[must_use]
pub fn letter_label(grade: Option<f64>) -> &'static str {
    letter_for(grade).map_or(UNGRADED_LABEL, LetterGrade::as_str)
}

/// Whether `grade` is a finite number inside [0, 100]
#[must_use]
pub fn is_valid_grade(grade: f64) -> bool {
    grade.is_finite() && (MIN_GRADE..=MAX_GRADE).contains(&grade)
}

/// Unweighted mean of grade points over the graded entries
///
/// Ungraded entries are skipped rather than counted as zero. Returns `0.0`
/// when nothing is graded.
#[must_use]
pub fn grade_point_average<I>(grades: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    mean(grades.into_iter().flatten().map(|g| LetterGrade::from_score(g).points()))
}

/// Mean of the numeric grades over the graded entries, `0.0` when none
#[must_use]
pub fn average_score<I>(grades: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    mean(grades.into_iter().flatten())
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_exact() {
        assert_eq!(LetterGrade::from_score(92.999), LetterGrade::AMinus);
        assert_eq!(LetterGrade::from_score(93.0), LetterGrade::A);
        assert_eq!(LetterGrade::from_score(59.999), LetterGrade::F);
        assert_eq!(LetterGrade::from_score(60.0), LetterGrade::D);
        assert_eq!(LetterGrade::from_score(100.0), LetterGrade::APlus);
        assert_eq!(LetterGrade::from_score(97.0), LetterGrade::APlus);
        assert_eq!(LetterGrade::from_score(0.0), LetterGrade::F);
    }

    #[test]
    fn test_every_band() {
        let cases = [
            (98.0, "A+", 4.0),
            (95.0, "A", 4.0),
            (91.0, "A-", 3.7),
            (88.0, "B+", 3.3),
            (85.0, "B", 3.0),
            (81.0, "B-", 2.7),
            (78.0, "C+", 2.3),
            (75.0, "C", 2.0),
            (71.0, "C-", 1.7),
            (65.0, "D", 1.0),
            (30.0, "F", 0.0),
        ];
        for (score, letter, points) in cases {
            let grade = LetterGrade::from_score(score);
            assert_eq!(grade.to_string(), letter);
            assert!((grade.points() - points).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_ungraded_label() {
        assert_eq!(letter_label(None), "N/A");
        assert_eq!(letter_label(Some(85.0)), "B");
    }

    #[test]
    fn test_grade_range() {
        assert!(is_valid_grade(0.0));
        assert!(is_valid_grade(100.0));
        assert!(!is_valid_grade(100.01));
        assert!(!is_valid_grade(-0.01));
        assert!(!is_valid_grade(f64::NAN));
    }

    #[test]
    fn test_gpa_skips_ungraded() {
        assert!((grade_point_average([Some(95.0), None]) - 4.0).abs() < f64::EPSILON);
        assert!((grade_point_average([Some(95.0), Some(85.0)]) - 3.5).abs() < f64::EPSILON);
        assert!(grade_point_average([None, None]).abs() < f64::EPSILON);
        assert!(grade_point_average(std::iter::empty()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_score() {
        assert!((average_score([Some(80.0), None, Some(90.0)]) - 85.0).abs() < f64::EPSILON);
        assert!(average_score([None]).abs() < f64::EPSILON);
    }
}
