//! Exam type entity - Monthly, Half-Yearly, Annual and so on.
//!
//! `weightage` is recorded for display only. Totals are unweighted sums over
//! every assessment regardless of exam type.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Exam type database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "exam_types")]
pub struct Model {
    /// Store-generated identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// English name
    pub name: String,
    /// Name in the school's local language
    pub name_local: String,
    /// Percentage contribution, 0 to 100 (not applied to totals)
    pub weightage: f64,
    /// Position in listings
    pub display_order: i32,
}

/// Defines relationships between `ExamType` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One exam type has many assessments
    #[sea_orm(has_many = "super::assessment::Entity")]
    Assessments,
}

impl Related<super::assessment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assessments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
