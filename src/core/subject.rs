//! Subject operations.
//!
//! A subject carries the marking scale (`max_marks`, `passing_marks`). Editing
//! a subject never touches assessments already recorded against it; those keep
//! the maximum they were entered with.

use crate::{
    entities::{Subject, subject},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Fields for a new subject.
#[derive(Debug, Clone)]
pub struct NewSubject {
    /// English name
    pub name: String,
    /// Localised name
    pub name_local: String,
    /// Maximum marks, must be positive
    pub max_marks: i32,
    /// Passing marks, `0 <= passing_marks <= max_marks`
    pub passing_marks: i32,
    /// Listing position
    pub display_order: i32,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
#[allow(missing_docs)]
pub struct SubjectUpdate {
    pub name: Option<String>,
    pub name_local: Option<String>,
    pub max_marks: Option<i32>,
    pub passing_marks: Option<i32>,
    pub display_order: Option<i32>,
}

fn validate_scale(max_marks: i32, passing_marks: i32) -> Result<()> {
    if max_marks <= 0 {
        return Err(Error::Validation {
            message: format!("Maximum marks must be positive, got {max_marks}"),
        });
    }
    if passing_marks < 0 || passing_marks > max_marks {
        return Err(Error::Validation {
            message: format!("Passing marks {passing_marks} must be between 0 and {max_marks}"),
        });
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: "Subject name cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Creates a subject after checking its marking scale.
///
/// # Errors
/// Returns a validation error for an empty name, a non-positive maximum or
/// passing marks outside `0..=max_marks`, or a database error.
#[instrument(skip(db))]
pub async fn add_subject<C>(db: &C, new: NewSubject) -> Result<subject::Model>
where
    C: ConnectionTrait,
{
    validate_scale(new.max_marks, new.passing_marks)?;

    let subject = subject::ActiveModel {
        name: Set(validate_name(&new.name)?),
        name_local: Set(new.name_local.trim().to_string()),
        max_marks: Set(new.max_marks),
        passing_marks: Set(new.passing_marks),
        display_order: Set(new.display_order),
        ..Default::default()
    };
    let created = subject.insert(db).await?;
    info!(
        "Added subject '{}' (ID: {}) out of {}, passing at {}",
        created.name, created.id, created.max_marks, created.passing_marks
    );
    Ok(created)
}

/// Lists subjects by display order, then insertion order.
pub async fn list_subjects<C>(db: &C) -> Result<Vec<subject::Model>>
where
    C: ConnectionTrait,
{
    Subject::find()
        .order_by_asc(subject::Column::DisplayOrder)
        .order_by_asc(subject::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a subject by id.
pub async fn get_subject_by_id<C>(db: &C, subject_id: i64) -> Result<Option<subject::Model>>
where
    C: ConnectionTrait,
{
    Subject::find_by_id(subject_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update. The resulting scale is validated as a whole, so
/// lowering `max_marks` below the existing `passing_marks` is rejected.
///
/// # Errors
/// Returns `Error::SubjectNotFound`, a validation error, or a database error.
#[instrument(skip(db))]
pub async fn update_subject<C>(
    db: &C,
    subject_id: i64,
    update: SubjectUpdate,
) -> Result<subject::Model>
where
    C: ConnectionTrait,
{
    let existing = Subject::find_by_id(subject_id)
        .one(db)
        .await?
        .ok_or(Error::SubjectNotFound { id: subject_id })?;

    let max_marks = update.max_marks.unwrap_or(existing.max_marks);
    let passing_marks = update.passing_marks.unwrap_or(existing.passing_marks);
    validate_scale(max_marks, passing_marks)?;

    let mut subject: subject::ActiveModel = existing.clone().into();
    let mut changed = false;
    if let Some(name) = update.name {
        subject.name = Set(validate_name(&name)?);
        changed = true;
    }
    if let Some(name_local) = update.name_local {
        subject.name_local = Set(name_local.trim().to_string());
        changed = true;
    }
    if let Some(display_order) = update.display_order {
        subject.display_order = Set(display_order);
        changed = true;
    }
    if max_marks != existing.max_marks || passing_marks != existing.passing_marks {
        subject.max_marks = Set(max_marks);
        subject.passing_marks = Set(passing_marks);
        changed = true;
    }

    if !changed {
        return Ok(existing);
    }

    let updated = subject.update(db).await?;
    info!("Updated subject '{}' (ID: {})", updated.name, updated.id);
    Ok(updated)
}
