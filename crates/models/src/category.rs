use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::{ad, errors::ModelError};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Ad,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Ad => Entity::has_many(ad::Entity).into() }
    }
}

impl Related<ad::Entity> for Entity {
    fn to() -> RelationDef { Relation::Ad.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() { return Err(ModelError::validation("category name required")); }
    if name.chars().count() > 100 { return Err(ModelError::validation("category name too long (<=100)")); }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, name: &str) -> Result<Model, ModelError> {
    validate_name(name)?;
    let am = ActiveModel { name: Set(name.trim().to_string()), ..Default::default() };
    Ok(am.insert(db).await?)
}
