//! Person entity
//!
//! `dept_id` must reference a live department at all times; the person
//! handlers are the sole enforcer of that invariant (there is no foreign-key
//! constraint in the store). `updated_at` is refreshed by the server on every
//! insert and update.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "person")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(rename = "ID")]
    pub id: i64,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "DeptID")]
    pub dept_id: i64,

    #[serde(rename = "Email")]
    pub email: String,

    #[serde(rename = "Phone")]
    pub phone: String,

    /// Filename of the image associated with this person, if any
    #[serde(rename = "ImagePath")]
    pub image_path: String,

    #[serde(rename = "Role")]
    pub role: String,

    #[serde(rename = "Info")]
    pub info: String,

    #[serde(rename = "UpdatedAt")]
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The text a person is indexed under: name, role and info concatenated.
    /// Unindexing must use the exact same text that was indexed, so every
    /// caller goes through this one function.
    pub fn index_text(&self) -> String {
        format!("{} {} {}", self.name, self.role, self.info)
    }
}
