//! Grading engine - turns raw marks into percentages, grades, pass/fail and rank.
//!
//! Every function here is pure: callers pass an immutable view of the records
//! and get plain values back. Nothing is cached between calls and nothing reads
//! the system clock; the academic year takes its reference date as input.
//!
//! Inputs are trusted. Marks above the maximum, negative totals or `NaN` are
//! not rejected here and flow through the arithmetic as-is; validation happens
//! where marks enter the store (see [`crate::core::assessment`]).

use crate::core::locale::Locale;
use crate::entities::{assessment, subject};
use crate::errors::Error;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::{fmt, str::FromStr};

/// Minimum overall percentage for a student to pass, independent of subject
/// count or exam weightage.
pub const OVERALL_PASS_PERCENTAGE: f64 = 35.0;

/// First month (1-based) of a new academic year.
pub const ACADEMIC_YEAR_START_MONTH: u32 = 4;

/// Letter grade bands, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Grade {
    /// 90% and above
    APlus,
    /// 80% to below 90%
    A,
    /// 70% to below 80%
    BPlus,
    /// 60% to below 70%
    B,
    /// 50% to below 60%
    CPlus,
    /// 40% to below 50%
    C,
    /// 35% to below 40%
    D,
    /// Below 35%
    F,
}

impl Grade {
    /// All grades in band order, best first.
    pub const ALL: [Self; 8] = [
        Self::APlus,
        Self::A,
        Self::BPlus,
        Self::B,
        Self::CPlus,
        Self::C,
        Self::D,
        Self::F,
    ];

    /// Maps a percentage onto its band. Lower bounds are inclusive and bands
    /// are tried from the top, so anything above 100 is `A+` and anything
    /// negative (or `NaN`) is `F`.
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Self::APlus
        } else if percentage >= 80.0 {
            Self::A
        } else if percentage >= 70.0 {
            Self::BPlus
        } else if percentage >= 60.0 {
            Self::B
        } else if percentage >= 50.0 {
            Self::CPlus
        } else if percentage >= 40.0 {
            Self::C
        } else if percentage >= OVERALL_PASS_PERCENTAGE {
            Self::D
        } else {
            Self::F
        }
    }

    /// Printed label, `"A+"` through `"F"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    /// Parses a printed label. Unknown labels yield `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.label() == label)
    }

    /// Descriptive phrase for this grade in the given language.
    #[must_use]
    pub const fn description(self, locale: Locale) -> &'static str {
        match locale {
            Locale::Marathi => match self {
                Self::APlus => "उत्कृष्ट",
                Self::A => "अति उत्तम",
                Self::BPlus => "उत्तम",
                Self::B => "चांगले",
                Self::CPlus => "सरासरीपेक्षा चांगले",
                Self::C => "सरासरी",
                Self::D => "उत्तीर्ण",
                Self::F => "अनुत्तीर्ण",
            },
            Locale::English => match self {
                Self::APlus => "Outstanding",
                Self::A => "Excellent",
                Self::BPlus => "Very Good",
                Self::B => "Good",
                Self::CPlus => "Above Average",
                Self::C => "Average",
                Self::D => "Pass",
                Self::F => "Fail",
            },
        }
    }

    /// Chart colour used for this grade in analytics views.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::APlus => "#4CAF50",
            Self::A => "#8BC34A",
            Self::BPlus => "#CDDC39",
            Self::B => "#FFEB3B",
            Self::CPlus => "#FFC107",
            Self::C => "#FF9800",
            Self::D => "#FF5722",
            Self::F => "#F44336",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Grade {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s.trim()).ok_or_else(|| Error::Validation {
            message: format!("Unknown grade label '{s}'"),
        })
    }
}

/// Colour for labels that are not a known grade.
pub const UNKNOWN_GRADE_COLOR: &str = "#9E9E9E";

/// Text returned by [`grade_description`] for an unrecognised label.
#[must_use]
pub const fn unknown_grade_description(locale: Locale) -> &'static str {
    match locale {
        Locale::Marathi => "अज्ञात",
        Locale::English => "Unknown",
    }
}

/// Looks up the descriptive phrase for a printed grade label.
/// Unknown labels map to a fixed "unknown" phrase instead of failing.
#[must_use]
pub fn grade_description(label: &str, locale: Locale) -> &'static str {
    Grade::from_label(label).map_or_else(
        || unknown_grade_description(locale),
        |grade| grade.description(locale),
    )
}

/// Chart colour for a printed grade label, grey when the label is unknown.
#[must_use]
pub fn grade_color(label: &str) -> &'static str {
    Grade::from_label(label).map_or(UNKNOWN_GRADE_COLOR, Grade::color)
}

/// Percentage of `total_marks` out of `total_max_marks`, rounded to two
/// decimals. A zero maximum gives `0.0` instead of dividing by zero.
#[must_use]
pub fn calculate_percentage(total_marks: f64, total_max_marks: f64) -> f64 {
    if total_max_marks == 0.0 {
        return 0.0;
    }
    (total_marks / total_max_marks * 100.0 * 100.0).round() / 100.0
}

/// Percentage for a single subject row on the report card.
#[must_use]
pub fn calculate_subject_percentage(marks: f64, max_marks: f64) -> f64 {
    calculate_percentage(marks, max_marks)
}

/// Summed marks and maxima over a set of assessments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StudentTotal {
    /// Sum of marks obtained
    pub total_marks: f64,
    /// Sum of the stored per-assessment maxima
    pub total_max_marks: f64,
}

impl StudentTotal {
    /// Percentage for these totals.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        calculate_percentage(self.total_marks, self.total_max_marks)
    }
}

/// Sums marks and the assessments' own `max_marks`. An empty slice gives `(0, 0)`.
#[must_use]
pub fn calculate_student_total<'a, I>(assessments: I) -> StudentTotal
where
    I: IntoIterator<Item = &'a assessment::Model>,
{
    assessments
        .into_iter()
        .fold(StudentTotal::default(), |acc, a| StudentTotal {
            total_marks: acc.total_marks + a.marks,
            total_max_marks: acc.total_max_marks + a.max_marks,
        })
}

/// True when `marks` reaches `passing_marks`. No rounding or tolerance.
#[must_use]
pub fn is_subject_passed(marks: f64, passing_marks: f64) -> bool {
    marks >= passing_marks
}

/// A student passes overall when every assessment meets its subject's passing
/// marks and the overall percentage is at least [`OVERALL_PASS_PERCENTAGE`].
///
/// Assessments whose subject is not in `subjects` are skipped for the
/// per-subject check, though they still count towards the percentage.
#[must_use]
pub fn is_overall_passed(assessments: &[assessment::Model], subjects: &[subject::Model]) -> bool {
    let all_subjects_passed = assessments.iter().all(|a| {
        subjects
            .iter()
            .find(|s| s.id == a.subject_id)
            .is_none_or(|s| is_subject_passed(a.marks, f64::from(s.passing_marks)))
    });
    if !all_subjects_passed {
        return false;
    }

    calculate_student_total(assessments).percentage() >= OVERALL_PASS_PERCENTAGE
}

/// 1-based rank of `student_percentage` among `all_percentages`, highest first.
///
/// Ties share the position of their first occurrence, so `[90, 90, 70]` ranks
/// both 90s first and the 70 third. Returns `None` when the exact value is not
/// in the list. The input slice is left untouched.
#[must_use]
#[allow(clippy::float_cmp)] // exact match is the ranking rule
pub fn calculate_rank(student_percentage: f64, all_percentages: &[f64]) -> Option<usize> {
    let mut sorted = all_percentages.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    sorted
        .iter()
        .position(|p| *p == student_percentage)
        .map(|index| index + 1)
}

/// Academic year label for the given date. Years run from April 1 to
/// March 31, so March 15 2024 is in `"2023-2024"` and April 1 2024 starts
/// `"2024-2025"`.
#[must_use]
pub fn academic_year_for(date: NaiveDate) -> String {
    let year = date.year();
    if date.month() >= ACADEMIC_YEAR_START_MONTH {
        format!("{}-{}", year, year + 1)
    } else {
        format!("{}-{}", year - 1, year)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{assessment_row, subject_row};

    #[test]
    fn test_calculate_percentage_basic() {
        assert_eq!(calculate_percentage(85.0, 100.0), 85.0);
        assert_eq!(calculate_percentage(163.0, 200.0), 81.5);
    }

    #[test]
    fn test_calculate_percentage_rounds_to_two_decimals() {
        assert_eq!(calculate_percentage(2.0, 3.0), 66.67);
        assert_eq!(calculate_percentage(1.0, 3.0), 33.33);
    }

    #[test]
    fn test_calculate_percentage_zero_max() {
        assert_eq!(calculate_percentage(0.0, 0.0), 0.0);
        assert_eq!(calculate_percentage(42.0, 0.0), 0.0);
    }

    #[test]
    fn test_calculate_percentage_stays_in_range() {
        for max in [1.0, 7.0, 50.0, 100.0, 350.0] {
            let mut marks = 0.0;
            while marks <= max {
                let p = calculate_percentage(marks, max);
                assert!((0.0..=100.0).contains(&p), "{marks}/{max} gave {p}");
                marks += 0.5;
            }
        }
    }

    #[test]
    fn test_calculate_percentage_nan_propagates() {
        assert!(calculate_percentage(f64::NAN, 100.0).is_nan());
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_percentage(90.0), Grade::APlus);
        assert_eq!(Grade::from_percentage(89.99), Grade::A);
        assert_eq!(Grade::from_percentage(80.0), Grade::A);
        assert_eq!(Grade::from_percentage(70.0), Grade::BPlus);
        assert_eq!(Grade::from_percentage(60.0), Grade::B);
        assert_eq!(Grade::from_percentage(50.0), Grade::CPlus);
        assert_eq!(Grade::from_percentage(40.0), Grade::C);
        assert_eq!(Grade::from_percentage(35.0), Grade::D);
        assert_eq!(Grade::from_percentage(34.9), Grade::F);
    }

    #[test]
    fn test_grade_out_of_range_falls_into_extreme_bands() {
        assert_eq!(Grade::from_percentage(120.0), Grade::APlus);
        assert_eq!(Grade::from_percentage(-5.0), Grade::F);
        assert_eq!(Grade::from_percentage(f64::NAN), Grade::F);
    }

    #[test]
    fn test_grade_is_monotonic() {
        let mut previous = Grade::from_percentage(100.0);
        let mut p = 100.0;
        while p >= 0.0 {
            let grade = Grade::from_percentage(p);
            // Grade ordering is best-first, so a lower percentage never yields a smaller variant
            assert!(grade >= previous, "grade improved when dropping to {p}");
            previous = grade;
            p -= 0.25;
        }
    }

    #[test]
    fn test_grade_labels_round_trip() {
        for grade in Grade::ALL {
            assert_eq!(Grade::from_label(grade.label()), Some(grade));
            assert_eq!(grade.to_string(), grade.label());
        }
        assert_eq!(Grade::from_label("E"), None);

        assert_eq!(" B+ ".parse::<Grade>().ok(), Some(Grade::BPlus));
        assert!(matches!("E".parse::<Grade>(), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_grade_description_lookup() {
        assert_eq!(grade_description("A", Locale::Marathi), "अति उत्तम");
        assert_eq!(grade_description("F", Locale::Marathi), "अनुत्तीर्ण");
        assert_eq!(grade_description("B+", Locale::English), "Very Good");
        assert_eq!(grade_description("Z", Locale::Marathi), "अज्ञात");
        assert_eq!(grade_description("", Locale::English), "Unknown");
    }

    #[test]
    fn test_grade_color_lookup() {
        assert_eq!(grade_color("A+"), "#4CAF50");
        assert_eq!(grade_color("F"), "#F44336");
        assert_eq!(grade_color("?"), UNKNOWN_GRADE_COLOR);
    }

    #[test]
    fn test_calculate_student_total_empty() {
        let empty: Vec<assessment::Model> = Vec::new();
        let total = calculate_student_total(&empty);
        assert_eq!(total, StudentTotal::default());
        assert_eq!(total.percentage(), 0.0);
    }

    #[test]
    fn test_calculate_student_total_uses_stored_max_marks() {
        let rows = vec![
            assessment_row(1, 1, 1, 85.0, 100.0),
            assessment_row(2, 1, 2, 40.0, 50.0),
        ];
        let total = calculate_student_total(&rows);
        assert_eq!(total.total_marks, 125.0);
        assert_eq!(total.total_max_marks, 150.0);
    }

    #[test]
    fn test_end_to_end_percentage_and_grade() {
        let rows = vec![
            assessment_row(1, 1, 1, 85.0, 100.0),
            assessment_row(2, 1, 2, 78.0, 100.0),
        ];
        let total = calculate_student_total(&rows);
        assert_eq!(total.total_marks, 163.0);
        assert_eq!(total.total_max_marks, 200.0);
        assert_eq!(total.percentage(), 81.5);
        assert_eq!(Grade::from_percentage(total.percentage()), Grade::A);
    }

    #[test]
    fn test_is_subject_passed() {
        assert!(is_subject_passed(35.0, 35.0));
        assert!(!is_subject_passed(34.0, 35.0));
        assert!(is_subject_passed(100.0, 35.0));
    }

    #[test]
    fn test_is_overall_passed_all_subjects_pass() {
        let subjects = vec![subject_row(1, 100, 35), subject_row(2, 100, 35)];
        let rows = vec![
            assessment_row(1, 1, 1, 60.0, 100.0),
            assessment_row(2, 1, 2, 45.0, 100.0),
        ];
        assert!(is_overall_passed(&rows, &subjects));
    }

    #[test]
    fn test_is_overall_passed_fails_on_one_subject() {
        let subjects = vec![subject_row(1, 100, 35), subject_row(2, 100, 35)];
        let rows = vec![
            assessment_row(1, 1, 1, 95.0, 100.0),
            assessment_row(2, 1, 2, 30.0, 100.0),
        ];
        // 62.5% overall, but subject 2 is below its passing marks
        assert!(!is_overall_passed(&rows, &subjects));
    }

    #[test]
    fn test_is_overall_passed_fails_on_percentage() {
        // Passing marks of zero let every subject pass, so only the overall check decides
        let subjects = vec![subject_row(1, 100, 0)];
        let rows = vec![assessment_row(1, 1, 1, 34.0, 100.0)];
        assert!(!is_overall_passed(&rows, &subjects));
    }

    #[test]
    fn test_is_overall_passed_skips_unknown_subjects() {
        let subjects = vec![subject_row(1, 100, 35)];
        let rows = vec![
            assessment_row(1, 1, 1, 80.0, 100.0),
            // Subject 99 does not exist; 20 marks would fail a 35 threshold
            assessment_row(2, 1, 99, 20.0, 100.0),
        ];
        // 50% overall and the unresolved subject is not checked
        assert!(is_overall_passed(&rows, &subjects));
    }

    #[test]
    fn test_is_overall_passed_empty_assessments() {
        // No assessments means 0% overall
        assert!(!is_overall_passed(&[], &[subject_row(1, 100, 35)]));
    }

    #[test]
    fn test_calculate_rank_ties_share_first_position() {
        let all = [90.0, 70.0, 90.0];
        assert_eq!(calculate_rank(90.0, &all), Some(1));
        assert_eq!(calculate_rank(70.0, &all), Some(3));
    }

    #[test]
    fn test_calculate_rank_not_found() {
        assert_eq!(calculate_rank(50.0, &[90.0, 80.0, 70.0]), None);
        assert_eq!(calculate_rank(50.0, &[]), None);
    }

    #[test]
    fn test_calculate_rank_does_not_reorder_input() {
        let all = [70.0, 90.0, 80.0];
        assert_eq!(calculate_rank(80.0, &all), Some(2));
        assert_eq!(all, [70.0, 90.0, 80.0]);
    }

    #[test]
    fn test_academic_year_boundaries() {
        let march = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let april = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let march_end = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let january = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(academic_year_for(march), "2023-2024");
        assert_eq!(academic_year_for(april), "2024-2025");
        assert_eq!(academic_year_for(march_end), "2024-2025");
        assert_eq!(academic_year_for(january), "2023-2024");
    }

    #[test]
    fn test_calculations_are_idempotent() {
        let rows = vec![
            assessment_row(1, 1, 1, 72.0, 100.0),
            assessment_row(2, 1, 2, 18.5, 50.0),
        ];
        let subjects = vec![subject_row(1, 100, 35), subject_row(2, 50, 18)];
        let all = [55.0, 72.0, 61.33];

        assert_eq!(calculate_student_total(&rows), calculate_student_total(&rows));
        assert_eq!(calculate_percentage(90.5, 150.0), calculate_percentage(90.5, 150.0));
        assert_eq!(is_overall_passed(&rows, &subjects), is_overall_passed(&rows, &subjects));
        assert_eq!(calculate_rank(61.33, &all), calculate_rank(61.33, &all));
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(academic_year_for(date), academic_year_for(date));
    }
}
