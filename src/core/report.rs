//! Report card assembly.
//!
//! This module turns a [`Snapshot`] into [`ReportCard`]s: the student's
//! assessments, totals, percentage, grade, pass/fail and rank among a peer set.
//! All functions are pure and return structured data that the rendering layer
//! formats.
//!
//! Rank needs every peer's percentage. [`build_report_cards`] computes those
//! once for the whole batch; [`build_report_card`] computes them per call.

use crate::{
    core::{
        grading::{
            Grade, StudentTotal, calculate_rank, calculate_student_total,
            calculate_subject_percentage, is_overall_passed, is_subject_passed,
        },
        snapshot::Snapshot,
    },
    entities::{AssessmentModel, ExamTypeModel, SchoolModel, StudentModel, SubjectModel},
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which students a report card's rank is computed against.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerScope {
    /// Every student on the roster
    #[default]
    AllStudents,
    /// Only students with the same class label
    SameClass,
}

/// Settings shared by every report card in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Academic year label printed on the card
    pub academic_year: String,
    /// Peer set used for ranking
    pub peer_scope: PeerScope,
}

/// One marks line on a report card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectRow {
    /// Id of the assessment this row comes from
    pub assessment_id: i64,
    /// Subject name in English
    pub subject_name: String,
    /// Subject name in the local language
    pub subject_name_local: String,
    /// Exam name, if the exam type still exists
    pub exam_type_name: Option<String>,
    /// Marks obtained
    pub marks: f64,
    /// Stored maximum for this assessment
    pub max_marks: f64,
    /// Row percentage
    pub percentage: f64,
    /// Row grade
    pub grade: Grade,
    /// Whether the marks reach the subject's passing marks
    pub passed: bool,
}

/// Everything printed on one student's report card. Computed on demand and
/// never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportCard {
    /// The student
    pub student: StudentModel,
    /// School header
    pub school: SchoolModel,
    /// The student's assessments
    pub assessments: Vec<AssessmentModel>,
    /// All subjects, for name lookups
    pub subjects: Vec<SubjectModel>,
    /// All exam types, for name lookups
    pub exam_types: Vec<ExamTypeModel>,
    /// One row per assessment whose subject is known
    pub rows: Vec<SubjectRow>,
    /// Sum of marks obtained
    pub total_marks: f64,
    /// Sum of stored maxima
    pub total_max_marks: f64,
    /// Overall percentage
    pub percentage: f64,
    /// Overall grade
    pub grade: Grade,
    /// Rank among peers; `None` when the student could not be ranked
    pub rank: Option<usize>,
    /// Overall pass/fail
    pub passed: bool,
    /// Academic year label
    pub academic_year: String,
}

/// Overall percentage of every student, keyed by student id. Students
/// without assessments get `0.0`.
#[must_use]
pub fn student_percentages(
    students: &[StudentModel],
    assessments: &[AssessmentModel],
) -> HashMap<i64, f64> {
    let mut totals: HashMap<i64, StudentTotal> = HashMap::new();
    for a in assessments {
        let entry = totals.entry(a.student_id).or_default();
        entry.total_marks += a.marks;
        entry.total_max_marks += a.max_marks;
    }

    students
        .iter()
        .map(|s| {
            let pct = totals.get(&s.id).copied().unwrap_or_default().percentage();
            (s.id, pct)
        })
        .collect()
}

/// Percentages of the students that `student` is ranked against.
#[must_use]
pub fn peer_percentages(
    students: &[StudentModel],
    percentages: &HashMap<i64, f64>,
    student: &StudentModel,
    scope: PeerScope,
) -> Vec<f64> {
    students
        .iter()
        .filter(|s| match scope {
            PeerScope::AllStudents => true,
            PeerScope::SameClass => s.class_label == student.class_label,
        })
        .filter_map(|s| percentages.get(&s.id).copied())
        .collect()
}

fn subject_rows(snapshot: &Snapshot, assessments: &[AssessmentModel]) -> Vec<SubjectRow> {
    assessments
        .iter()
        .filter_map(|a| {
            let subject = snapshot.subject(a.subject_id)?;
            let percentage = calculate_subject_percentage(a.marks, a.max_marks);
            Some(SubjectRow {
                assessment_id: a.id,
                subject_name: subject.name.clone(),
                subject_name_local: subject.name_local.clone(),
                exam_type_name: snapshot.exam_type(a.exam_type_id).map(|e| e.name.clone()),
                marks: a.marks,
                max_marks: a.max_marks,
                percentage,
                grade: Grade::from_percentage(percentage),
                passed: is_subject_passed(a.marks, f64::from(subject.passing_marks)),
            })
        })
        .collect()
}

fn assemble(
    snapshot: &Snapshot,
    school: &SchoolModel,
    student: &StudentModel,
    percentages: &HashMap<i64, f64>,
    options: &ReportOptions,
) -> ReportCard {
    let assessments: Vec<AssessmentModel> = snapshot.assessments_for(student.id).cloned().collect();
    let total = calculate_student_total(&assessments);
    let percentage = total.percentage();

    let peers = peer_percentages(&snapshot.students, percentages, student, options.peer_scope);
    let rank = calculate_rank(percentage, &peers);

    ReportCard {
        student: student.clone(),
        school: school.clone(),
        rows: subject_rows(snapshot, &assessments),
        passed: is_overall_passed(&assessments, &snapshot.subjects),
        assessments,
        subjects: snapshot.subjects.clone(),
        exam_types: snapshot.exam_types.clone(),
        total_marks: total.total_marks,
        total_max_marks: total.total_max_marks,
        percentage,
        grade: Grade::from_percentage(percentage),
        rank,
        academic_year: options.academic_year.clone(),
    }
}

/// Builds the report card for one student.
///
/// # Errors
/// Returns `Error::StudentNotFound` if the id is not on the roster and
/// `Error::SchoolNotConfigured` if the snapshot has no school.
pub fn build_report_card(
    snapshot: &Snapshot,
    student_id: i64,
    options: &ReportOptions,
) -> Result<ReportCard> {
    let student = snapshot
        .student(student_id)
        .ok_or(Error::StudentNotFound { id: student_id })?;
    let school = snapshot.school.as_ref().ok_or(Error::SchoolNotConfigured)?;

    let percentages = student_percentages(&snapshot.students, &snapshot.assessments);
    Ok(assemble(snapshot, school, student, &percentages, options))
}

/// Builds report cards for the whole roster in roster order, computing every
/// student's percentage only once.
///
/// # Errors
/// Returns `Error::SchoolNotConfigured` if the snapshot has no school.
pub fn build_report_cards(snapshot: &Snapshot, options: &ReportOptions) -> Result<Vec<ReportCard>> {
    let school = snapshot.school.as_ref().ok_or(Error::SchoolNotConfigured)?;
    let percentages = student_percentages(&snapshot.students, &snapshot.assessments);

    Ok(snapshot
        .students
        .iter()
        .map(|student| assemble(snapshot, school, student, &percentages, options))
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn options(scope: PeerScope) -> ReportOptions {
        ReportOptions {
            academic_year: "2024-2025".to_string(),
            peer_scope: scope,
        }
    }

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            students: vec![
                student_row(1, "5"),
                student_row(2, "5"),
                student_row(3, "6"),
            ],
            subjects: vec![subject_row(1, 100, 35), subject_row(2, 100, 35)],
            exam_types: vec![exam_type_row(1, "Monthly")],
            assessments: vec![
                assessment_row(1, 1, 1, 85.0, 100.0),
                assessment_row(2, 1, 2, 78.0, 100.0),
                assessment_row(3, 2, 1, 92.0, 100.0),
                assessment_row(4, 2, 2, 88.0, 100.0),
                assessment_row(5, 3, 1, 70.0, 100.0),
            ],
            school: Some(school_row()),
        }
    }

    #[test]
    fn test_report_card_end_to_end() -> Result<()> {
        let snapshot = sample_snapshot();
        let card = build_report_card(&snapshot, 1, &options(PeerScope::AllStudents))?;

        assert_eq!(card.student.id, 1);
        assert_eq!(card.assessments.len(), 2);
        assert_eq!(card.total_marks, 163.0);
        assert_eq!(card.total_max_marks, 200.0);
        assert_eq!(card.percentage, 81.5);
        assert_eq!(card.grade, Grade::A);
        assert!(card.passed);
        assert_eq!(card.academic_year, "2024-2025");
        // Student 2 has 90%, student 3 has 70%
        assert_eq!(card.rank, Some(2));
        Ok(())
    }

    #[test]
    fn test_report_card_rows() -> Result<()> {
        let snapshot = sample_snapshot();
        let card = build_report_card(&snapshot, 1, &options(PeerScope::AllStudents))?;

        assert_eq!(card.rows.len(), 2);
        let first = &card.rows[0];
        assert_eq!(first.assessment_id, 1);
        assert_eq!(first.percentage, 85.0);
        assert_eq!(first.grade, Grade::A);
        assert!(first.passed);
        assert_eq!(first.exam_type_name.as_deref(), Some("Monthly"));
        Ok(())
    }

    #[test]
    fn test_rows_skip_unknown_subjects() -> Result<()> {
        let mut snapshot = sample_snapshot();
        snapshot.assessments.push(assessment_row(6, 1, 42, 10.0, 100.0));

        let card = build_report_card(&snapshot, 1, &options(PeerScope::AllStudents))?;
        assert_eq!(card.rows.len(), 2);
        // The orphaned marks still count towards the totals
        assert_eq!(card.total_max_marks, 300.0);
        Ok(())
    }

    #[test]
    fn test_same_class_scope() -> Result<()> {
        let snapshot = sample_snapshot();
        let card = build_report_card(&snapshot, 3, &options(PeerScope::SameClass))?;
        // Only student in class 6
        assert_eq!(card.rank, Some(1));

        let card = build_report_card(&snapshot, 3, &options(PeerScope::AllStudents))?;
        assert_eq!(card.rank, Some(3));
        Ok(())
    }

    #[test]
    fn test_batch_ties_share_first_rank() -> Result<()> {
        let snapshot = Snapshot {
            students: vec![
                student_row(1, "5"),
                student_row(2, "5"),
                student_row(3, "5"),
            ],
            subjects: vec![subject_row(1, 100, 35)],
            assessments: vec![
                assessment_row(1, 1, 1, 90.0, 100.0),
                assessment_row(2, 2, 1, 90.0, 100.0),
                assessment_row(3, 3, 1, 70.0, 100.0),
            ],
            school: Some(school_row()),
            ..Default::default()
        };

        let cards = build_report_cards(&snapshot, &options(PeerScope::AllStudents))?;
        let ranks: Vec<Option<usize>> = cards.iter().map(|c| c.rank).collect();
        assert_eq!(ranks, vec![Some(1), Some(1), Some(3)]);
        Ok(())
    }

    #[test]
    fn test_batch_matches_single() -> Result<()> {
        let snapshot = sample_snapshot();
        let opts = options(PeerScope::SameClass);
        let cards = build_report_cards(&snapshot, &opts)?;
        assert_eq!(cards.len(), 3);
        for card in &cards {
            assert_eq!(card, &build_report_card(&snapshot, card.student.id, &opts)?);
        }
        Ok(())
    }

    #[test]
    fn test_student_without_assessments() -> Result<()> {
        let mut snapshot = sample_snapshot();
        snapshot.students.push(student_row(4, "5"));

        let card = build_report_card(&snapshot, 4, &options(PeerScope::AllStudents))?;
        assert_eq!(card.percentage, 0.0);
        assert_eq!(card.grade, Grade::F);
        assert!(!card.passed);
        assert!(card.rows.is_empty());
        assert_eq!(card.rank, Some(4));
        Ok(())
    }

    #[test]
    fn test_unknown_student_and_missing_school() {
        let snapshot = sample_snapshot();
        let result = build_report_card(&snapshot, 99, &options(PeerScope::AllStudents));
        assert!(matches!(result, Err(Error::StudentNotFound { id: 99 })));

        let snapshot = Snapshot {
            school: None,
            ..sample_snapshot()
        };
        let result = build_report_card(&snapshot, 1, &options(PeerScope::AllStudents));
        assert!(matches!(result, Err(Error::SchoolNotConfigured)));
        let result = build_report_cards(&snapshot, &options(PeerScope::AllStudents));
        assert!(matches!(result, Err(Error::SchoolNotConfigured)));
    }

    #[test]
    fn test_student_percentages() {
        let snapshot = sample_snapshot();
        let map = student_percentages(&snapshot.students, &snapshot.assessments);
        assert_eq!(map.len(), 3);
        assert_eq!(map[&1], 81.5);
        assert_eq!(map[&2], 90.0);
        assert_eq!(map[&3], 70.0);
    }

    #[tokio::test]
    async fn test_report_card_from_store() -> Result<()> {
        let (db, roster) = setup_with_roster().await?;
        let first = &roster.students[0];
        let maths = &roster.subjects[0];
        record_test_assessment(&db, first.id, maths.id, roster.exam_type.id, 85.0).await?;
        record_test_assessment(&db, first.id, roster.subjects[1].id, roster.exam_type.id, 39.0)
            .await?;

        let snapshot = crate::core::snapshot::load_snapshot(&db).await?;
        let card = build_report_card(&snapshot, first.id, &options(PeerScope::AllStudents))?;

        // 124 / 150
        assert_eq!(card.total_marks, 124.0);
        assert_eq!(card.total_max_marks, 150.0);
        assert_eq!(card.percentage, 82.67);
        assert_eq!(card.grade, Grade::A);
        assert!(card.passed);
        assert_eq!(card.rank, Some(1));
        Ok(())
    }
}
