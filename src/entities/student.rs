//! Student entity - one enrolled pupil on the roster.
//!
//! Students are long-lived records created via an explicit add and changed only
//! by an explicit update. The class label is what analytics and class-scoped
//! ranking group on.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Student database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Store-generated identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name as printed on the report card
    pub name: String,
    /// Father's or guardian's name
    pub guardian_name: String,
    /// Class the student belongs to (e.g. `"5"`)
    pub class_label: String,
    /// Roll number within the class, always positive
    pub roll_number: i32,
    /// Date of admission
    pub admission_date: Date,
}

/// Defines relationships between Student and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One student has many assessments
    #[sea_orm(has_many = "super::assessment::Entity")]
    Assessments,
}

impl Related<super::assessment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assessments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
