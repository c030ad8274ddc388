//! Assessment operations - recording marks for a student.
//!
//! This is where marks are validated before they can reach the grading engine:
//! marks must lie in `0..=max_marks` of the subject. The subject's maximum and
//! the academic year are captured on the record at entry time.

use crate::{
    core::grading::academic_year_for,
    entities::{Assessment, ExamType, Student, Subject, assessment},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument, warn};

/// One marks entry as collected from the user.
#[derive(Debug, Clone, Copy)]
pub struct NewAssessment {
    /// Student the marks belong to
    pub student_id: i64,
    /// Subject the marks are for
    pub subject_id: i64,
    /// Exam the marks are for
    pub exam_type_id: i64,
    /// Marks obtained
    pub marks: f64,
}

fn validate_marks(marks: f64, max_marks: f64) -> Result<f64> {
    if !marks.is_finite() || marks < 0.0 || marks > max_marks {
        warn!("Rejected marks {} (maximum {})", marks, max_marks);
        return Err(Error::InvalidMarks { marks, max_marks });
    }
    Ok(marks)
}

/// Records marks for a student.
///
/// The referenced student, subject and exam type must exist. The subject's
/// current `max_marks` is copied onto the assessment and the academic year is
/// derived from `recorded_on`.
///
/// # Errors
/// Returns `Error::StudentNotFound`, `Error::SubjectNotFound` or
/// `Error::ExamTypeNotFound` for unknown references, `Error::InvalidMarks`
/// when marks are negative, non-finite or above the subject maximum, or a
/// database error.
#[instrument(skip(db))]
pub async fn record_assessment<C>(
    db: &C,
    new: NewAssessment,
    recorded_on: NaiveDate,
) -> Result<assessment::Model>
where
    C: ConnectionTrait,
{
    Student::find_by_id(new.student_id)
        .one(db)
        .await?
        .ok_or(Error::StudentNotFound { id: new.student_id })?;
    let subject = Subject::find_by_id(new.subject_id)
        .one(db)
        .await?
        .ok_or(Error::SubjectNotFound { id: new.subject_id })?;
    ExamType::find_by_id(new.exam_type_id)
        .one(db)
        .await?
        .ok_or(Error::ExamTypeNotFound {
            id: new.exam_type_id,
        })?;

    let max_marks = f64::from(subject.max_marks);
    let marks = validate_marks(new.marks, max_marks)?;

    let assessment = assessment::ActiveModel {
        student_id: Set(new.student_id),
        subject_id: Set(new.subject_id),
        exam_type_id: Set(new.exam_type_id),
        marks: Set(marks),
        max_marks: Set(max_marks),
        recorded_on: Set(recorded_on),
        academic_year: Set(academic_year_for(recorded_on)),
        ..Default::default()
    };
    let created = assessment.insert(db).await?;
    info!(
        "Recorded {}/{} for student {} in subject '{}' (assessment ID: {})",
        created.marks, created.max_marks, created.student_id, subject.name, created.id
    );
    Ok(created)
}

/// Lists every assessment in insertion order.
pub async fn list_assessments<C>(db: &C) -> Result<Vec<assessment::Model>>
where
    C: ConnectionTrait,
{
    Assessment::find()
        .order_by_asc(assessment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists one student's assessments in insertion order.
pub async fn list_assessments_for_student<C>(
    db: &C,
    student_id: i64,
) -> Result<Vec<assessment::Model>>
where
    C: ConnectionTrait,
{
    Assessment::find()
        .filter(assessment::Column::StudentId.eq(student_id))
        .order_by_asc(assessment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an assessment by id.
pub async fn get_assessment_by_id<C>(
    db: &C,
    assessment_id: i64,
) -> Result<Option<assessment::Model>>
where
    C: ConnectionTrait,
{
    Assessment::find_by_id(assessment_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Corrects the marks on an existing assessment. Validation uses the
/// assessment's own stored maximum, not the subject's current one.
///
/// # Errors
/// Returns `Error::AssessmentNotFound`, `Error::InvalidMarks`, or a database error.
#[instrument(skip(db))]
pub async fn update_assessment_marks<C>(
    db: &C,
    assessment_id: i64,
    marks: f64,
) -> Result<assessment::Model>
where
    C: ConnectionTrait,
{
    let existing = Assessment::find_by_id(assessment_id)
        .one(db)
        .await?
        .ok_or(Error::AssessmentNotFound { id: assessment_id })?;

    let marks = validate_marks(marks, existing.max_marks)?;

    let mut assessment: assessment::ActiveModel = existing.into();
    assessment.marks = Set(marks);
    let updated = assessment.update(db).await?;
    info!("Updated marks on assessment ID {} to {}", updated.id, updated.marks);
    Ok(updated)
}

/// Removes an assessment so it no longer contributes to any total.
///
/// # Errors
/// Returns `Error::AssessmentNotFound` if nothing was deleted.
#[instrument(skip(db))]
pub async fn delete_assessment<C>(db: &C, assessment_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Assessment::delete_by_id(assessment_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::AssessmentNotFound { id: assessment_id });
    }
    info!("Deleted assessment ID {}", assessment_id);
    Ok(())
}
