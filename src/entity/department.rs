//! Department entity
//!
//! A department is either root-level (`parent_id == 0`) or a direct child of
//! exactly one root department. The two-level shape is enforced by the
//! department handlers, not by a database constraint.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "department")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(rename = "ID")]
    pub id: i64,

    #[serde(rename = "Name")]
    pub name: String,

    /// Parent department ID (0 denotes a root department)
    #[serde(rename = "ParentID")]
    pub parent_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
