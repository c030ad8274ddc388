//! Exam type operations.

use crate::{
    entities::{ExamType, exam_type},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Fields for a new exam type.
#[derive(Debug, Clone)]
pub struct NewExamType {
    /// English name
    pub name: String,
    /// Localised name
    pub name_local: String,
    /// Percentage contribution, 0 to 100. Stored for display only.
    pub weightage: f64,
    /// Listing position
    pub display_order: i32,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
#[allow(missing_docs)]
pub struct ExamTypeUpdate {
    pub name: Option<String>,
    pub name_local: Option<String>,
    pub weightage: Option<f64>,
    pub display_order: Option<i32>,
}

fn validate_weightage(weightage: f64) -> Result<f64> {
    if !(0.0..=100.0).contains(&weightage) {
        return Err(Error::Validation {
            message: format!("Weightage must be between 0 and 100, got {weightage}"),
        });
    }
    Ok(weightage)
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: "Exam type name cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Creates an exam type.
///
/// # Errors
/// Returns a validation error for an empty name or a weightage outside
/// `0..=100` (including `NaN`), or a database error.
#[instrument(skip(db))]
pub async fn add_exam_type<C>(db: &C, new: NewExamType) -> Result<exam_type::Model>
where
    C: ConnectionTrait,
{
    let exam_type = exam_type::ActiveModel {
        name: Set(validate_name(&new.name)?),
        name_local: Set(new.name_local.trim().to_string()),
        weightage: Set(validate_weightage(new.weightage)?),
        display_order: Set(new.display_order),
        ..Default::default()
    };
    let created = exam_type.insert(db).await?;
    info!("Added exam type '{}' (ID: {})", created.name, created.id);
    Ok(created)
}

/// Lists exam types by display order, then insertion order.
pub async fn list_exam_types<C>(db: &C) -> Result<Vec<exam_type::Model>>
where
    C: ConnectionTrait,
{
    ExamType::find()
        .order_by_asc(exam_type::Column::DisplayOrder)
        .order_by_asc(exam_type::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an exam type by id.
pub async fn get_exam_type_by_id<C>(db: &C, exam_type_id: i64) -> Result<Option<exam_type::Model>>
where
    C: ConnectionTrait,
{
    ExamType::find_by_id(exam_type_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update to an exam type.
///
/// # Errors
/// Returns `Error::ExamTypeNotFound`, a validation error, or a database error.
#[instrument(skip(db))]
pub async fn update_exam_type<C>(
    db: &C,
    exam_type_id: i64,
    update: ExamTypeUpdate,
) -> Result<exam_type::Model>
where
    C: ConnectionTrait,
{
    let existing = ExamType::find_by_id(exam_type_id)
        .one(db)
        .await?
        .ok_or(Error::ExamTypeNotFound { id: exam_type_id })?;

    let mut exam_type: exam_type::ActiveModel = existing.clone().into();
    let mut changed = false;
    if let Some(name) = update.name {
        exam_type.name = Set(validate_name(&name)?);
        changed = true;
    }
    if let Some(name_local) = update.name_local {
        exam_type.name_local = Set(name_local.trim().to_string());
        changed = true;
    }
    if let Some(weightage) = update.weightage {
        exam_type.weightage = Set(validate_weightage(weightage)?);
        changed = true;
    }
    if let Some(display_order) = update.display_order {
        exam_type.display_order = Set(display_order);
        changed = true;
    }

    if !changed {
        return Ok(existing);
    }

    let updated = exam_type.update(db).await?;
    info!("Updated exam type '{}' (ID: {})", updated.name, updated.id);
    Ok(updated)
}
