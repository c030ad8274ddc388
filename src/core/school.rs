//! School singleton - the header printed on every report card.

use crate::{
    entities::{School, school},
    errors::Result,
};
use sea_orm::{Set, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// School details as entered by the user or read from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[allow(missing_docs)]
pub struct SchoolInfo {
    pub name: String,
    #[serde(default)]
    pub name_local: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
    #[serde(default)]
    pub registration_code: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub principal_name: String,
}

/// Returns the school record, or `None` if it has never been saved.
pub async fn get_school<C>(db: &C) -> Result<Option<school::Model>>
where
    C: ConnectionTrait,
{
    School::find_by_id(school::SCHOOL_ROW_ID)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Saves the school details, replacing whatever was stored before.
#[instrument(skip(db))]
pub async fn save_school<C>(db: &C, info: SchoolInfo) -> Result<school::Model>
where
    C: ConnectionTrait,
{
    let existing = get_school(db).await?;

    let active = school::ActiveModel {
        id: Set(school::SCHOOL_ROW_ID),
        name: Set(info.name),
        name_local: Set(info.name_local),
        address: Set(info.address),
        city: Set(info.city),
        state: Set(info.state),
        pincode: Set(info.pincode),
        registration_code: Set(info.registration_code),
        phone_number: Set(info.phone_number),
        email: Set(info.email),
        principal_name: Set(info.principal_name),
    };

    let saved = if existing.is_some() {
        active.update(db).await?
    } else {
        active.insert(db).await?
    };
    info!("Saved school information for '{}'", saved.name);
    Ok(saved)
}
