//! Subject entity - defines the marking scale for one subject.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Subject database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    /// Store-generated identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// English name (e.g. "Mathematics")
    pub name: String,
    /// Name in the school's local language (e.g. "गणित")
    pub name_local: String,
    /// Maximum marks for a single assessment, always positive
    pub max_marks: i32,
    /// Minimum marks needed to pass, `0 <= passing_marks <= max_marks`
    pub passing_marks: i32,
    /// Position in listings and on the report card
    pub display_order: i32,
}

/// Defines relationships between Subject and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One subject has many assessments
    #[sea_orm(has_many = "super::assessment::Entity")]
    Assessments,
}

impl Related<super::assessment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assessments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
