//! Immutable in-memory view of every record, taken once per engine call.
//!
//! Report and analytics functions work on a [`Snapshot`] instead of the
//! database so they stay pure and never hold references across calls.

use crate::{
    core::{assessment, exam_type, school, student, subject},
    entities::{AssessmentModel, ExamTypeModel, SchoolModel, StudentModel, SubjectModel},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing::{debug, instrument};

/// All records needed to grade, rank and report.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Roster in insertion order
    pub students: Vec<StudentModel>,
    /// Subjects in display order
    pub subjects: Vec<SubjectModel>,
    /// Exam types in display order
    pub exam_types: Vec<ExamTypeModel>,
    /// Every assessment in insertion order
    pub assessments: Vec<AssessmentModel>,
    /// School singleton, if saved
    pub school: Option<SchoolModel>,
}

impl Snapshot {
    /// Finds a student by id.
    #[must_use]
    pub fn student(&self, student_id: i64) -> Option<&StudentModel> {
        self.students.iter().find(|s| s.id == student_id)
    }

    /// Finds a subject by id.
    #[must_use]
    pub fn subject(&self, subject_id: i64) -> Option<&SubjectModel> {
        self.subjects.iter().find(|s| s.id == subject_id)
    }

    /// Finds an exam type by id.
    #[must_use]
    pub fn exam_type(&self, exam_type_id: i64) -> Option<&ExamTypeModel> {
        self.exam_types.iter().find(|e| e.id == exam_type_id)
    }

    /// One student's assessments, in insertion order.
    pub fn assessments_for(
        &self,
        student_id: i64,
    ) -> impl Iterator<Item = &AssessmentModel> + '_ {
        self.assessments
            .iter()
            .filter(move |a| a.student_id == student_id)
    }

    /// Distinct class labels on the roster, in order of first appearance.
    #[must_use]
    pub fn class_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for s in &self.students {
            if !labels.contains(&s.class_label) {
                labels.push(s.class_label.clone());
            }
        }
        labels
    }
}

/// Reads every collection from the store into a [`Snapshot`].
///
/// # Errors
/// Returns the first database error encountered.
#[instrument(skip(db))]
pub async fn load_snapshot(db: &DatabaseConnection) -> Result<Snapshot> {
    let (students, subjects, exam_types, assessments, school) = tokio::try_join!(
        student::list_students(db),
        subject::list_subjects(db),
        exam_type::list_exam_types(db),
        assessment::list_assessments(db),
        school::get_school(db),
    )?;

    debug!(
        "Loaded snapshot: {} students, {} subjects, {} exam types, {} assessments",
        students.len(),
        subjects.len(),
        exam_types.len(),
        assessments.len()
    );

    Ok(Snapshot {
        students,
        subjects,
        exam_types,
        assessments,
        school,
    })
}
