//! Student roster operations.
//!
//! Students are created with [`add_student`], changed field-by-field with
//! [`update_student`] and removed with [`delete_student`]. Listing is in
//! insertion order, which is also the order report cards are produced in.

use crate::{
    entities::{Assessment, Student, assessment, student},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Fields for a new roster entry.
#[derive(Debug, Clone)]
pub struct NewStudent {
    /// Full name
    pub name: String,
    /// Father's or guardian's name
    pub guardian_name: String,
    /// Class label, e.g. `"5"`
    pub class_label: String,
    /// Roll number, must be positive
    pub roll_number: i32,
    /// Date of admission
    pub admission_date: NaiveDate,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct StudentUpdate {
    #[allow(missing_docs)]
    pub name: Option<String>,
    #[allow(missing_docs)]
    pub guardian_name: Option<String>,
    #[allow(missing_docs)]
    pub class_label: Option<String>,
    #[allow(missing_docs)]
    pub roll_number: Option<i32>,
    #[allow(missing_docs)]
    pub admission_date: Option<NaiveDate>,
}

impl StudentUpdate {
    /// True when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.guardian_name.is_none()
            && self.class_label.is_none()
            && self.roll_number.is_none()
            && self.admission_date.is_none()
    }
}

fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: format!("Student {field} cannot be empty"),
        });
    }
    Ok(trimmed.to_string())
}

fn require_roll_number(roll_number: i32) -> Result<i32> {
    if roll_number <= 0 {
        return Err(Error::Validation {
            message: format!("Roll number must be positive, got {roll_number}"),
        });
    }
    Ok(roll_number)
}

/// Adds a student to the roster and returns the stored record with its
/// generated id.
///
/// # Errors
/// Returns an error if the name, guardian name or class is blank, the roll
/// number is not positive, or the insert fails.
#[instrument(skip(db))]
pub async fn add_student<C>(db: &C, new: NewStudent) -> Result<student::Model>
where
    C: ConnectionTrait,
{
    let student = student::ActiveModel {
        name: Set(require_text("name", &new.name)?),
        guardian_name: Set(require_text("guardian name", &new.guardian_name)?),
        class_label: Set(require_text("class", &new.class_label)?),
        roll_number: Set(require_roll_number(new.roll_number)?),
        admission_date: Set(new.admission_date),
        ..Default::default()
    };

    let created = student.insert(db).await?;
    info!(
        "Added student '{}' (ID: {}) to class {}",
        created.name, created.id, created.class_label
    );
    Ok(created)
}

/// Lists every student in insertion order.
pub async fn list_students<C>(db: &C) -> Result<Vec<student::Model>>
where
    C: ConnectionTrait,
{
    Student::find()
        .order_by_asc(student::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the students of one class in insertion order.
pub async fn list_students_in_class<C>(db: &C, class_label: &str) -> Result<Vec<student::Model>>
where
    C: ConnectionTrait,
{
    Student::find()
        .filter(student::Column::ClassLabel.eq(class_label))
        .order_by_asc(student::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a student by id.
pub async fn get_student_by_id<C>(db: &C, student_id: i64) -> Result<Option<student::Model>>
where
    C: ConnectionTrait,
{
    Student::find_by_id(student_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update to a student.
///
/// # Errors
/// Returns `Error::StudentNotFound` if the id is unknown, a validation error
/// for blank text or a non-positive roll number, or a database error.
#[instrument(skip(db))]
pub async fn update_student<C>(
    db: &C,
    student_id: i64,
    update: StudentUpdate,
) -> Result<student::Model>
where
    C: ConnectionTrait,
{
    let existing = Student::find_by_id(student_id)
        .one(db)
        .await?
        .ok_or(Error::StudentNotFound { id: student_id })?;

    if update.is_empty() {
        return Ok(existing);
    }

    let mut student: student::ActiveModel = existing.into();
    if let Some(name) = update.name {
        student.name = Set(require_text("name", &name)?);
    }
    if let Some(guardian_name) = update.guardian_name {
        student.guardian_name = Set(require_text("guardian name", &guardian_name)?);
    }
    if let Some(class_label) = update.class_label {
        student.class_label = Set(require_text("class", &class_label)?);
    }
    if let Some(roll_number) = update.roll_number {
        student.roll_number = Set(require_roll_number(roll_number)?);
    }
    if let Some(admission_date) = update.admission_date {
        student.admission_date = Set(admission_date);
    }

    let updated = student.update(db).await?;
    info!("Updated student ID {}", updated.id);
    Ok(updated)
}

/// Removes a student. Their assessments are removed with them, so they stop
/// contributing to class and subject totals.
///
/// # Errors
/// Returns `Error::StudentNotFound` if nothing was deleted.
#[instrument(skip(db))]
pub async fn delete_student(db: &DatabaseConnection, student_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let removed = Assessment::delete_many()
        .filter(assessment::Column::StudentId.eq(student_id))
        .exec(&txn)
        .await?;
    let result = Student::delete_by_id(student_id).exec(&txn).await?;
    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Err(Error::StudentNotFound { id: student_id });
    }

    txn.commit().await?;
    info!(
        "Deleted student ID {} and {} of their assessments",
        student_id, removed.rows_affected
    );
    Ok(())
}
