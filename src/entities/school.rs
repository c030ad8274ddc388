//! School entity - singleton configuration record printed on every report card.
//! Stored as a single row with `id = 1`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Identifier of the one school row.
pub const SCHOOL_ROW_ID: i32 = 1;

/// School database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "school")]
pub struct Model {
    /// Always [`SCHOOL_ROW_ID`]
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// English name
    pub name: String,
    /// Name in the school's local language
    pub name_local: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// State
    pub state: String,
    /// Postal code
    pub pincode: String,
    /// Government registration code (UDISE)
    pub registration_code: String,
    /// Contact phone number
    pub phone_number: String,
    /// Contact email
    pub email: String,
    /// Name of the principal
    pub principal_name: String,
}

/// `School` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
