//! Assessment entity - one marks entry for a student, subject and exam type.
//!
//! `max_marks` is copied from the subject when the assessment is recorded.
//! Every total and percentage reads this stored copy, never the live subject,
//! so editing a subject later does not rewrite history.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Assessment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assessments")]
pub struct Model {
    /// Store-generated identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Student the marks belong to
    pub student_id: i64,
    /// Subject the marks were given in
    pub subject_id: i64,
    /// Exam the marks were given in
    pub exam_type_id: i64,
    /// Marks obtained
    pub marks: f64,
    /// Subject maximum at the time of entry
    pub max_marks: f64,
    /// Date the marks were entered
    pub recorded_on: Date,
    /// Academic year label at the time of entry (e.g. `"2024-2025"`)
    pub academic_year: String,
}

/// Defines relationships between Assessment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each assessment belongs to one student; removing the student removes it
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    /// Each assessment is for one subject
    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id"
    )]
    Subject,
    /// Each assessment is for one exam type
    #[sea_orm(
        belongs_to = "super::exam_type::Entity",
        from = "Column::ExamTypeId",
        to = "super::exam_type::Column::Id"
    )]
    ExamType,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::exam_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExamType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
