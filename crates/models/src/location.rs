use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, Set, SqlErr};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "location")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::User => Entity::has_many(user::Entity).into() }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() { return Err(ModelError::validation("location name required")); }
    if name.chars().count() > 200 { return Err(ModelError::validation("location name too long (<=200)")); }
    Ok(())
}

pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ModelError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(ModelError::validation("lat must be within [-90, 90]"));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(ModelError::validation("lng must be within [-180, 180]"));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, name: &str, lat: f64, lng: f64) -> Result<Model, ModelError> {
    validate_name(name)?;
    validate_coordinates(lat, lng)?;
    let am = ActiveModel {
        name: Set(name.trim().to_string()),
        lat: Set(lat),
        lng: Set(lng),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Name.eq(name.trim())).one(db).await?)
}

/// Look a location up by name, inserting it at 0/0 when missing.
/// Returns the row and whether it was created. An existing location's
/// coordinates are never touched.
pub async fn get_or_create(db: &DatabaseConnection, name: &str) -> Result<(Model, bool), ModelError> {
    validate_name(name)?;
    if let Some(found) = find_by_name(db, name).await? {
        return Ok((found, false));
    }
    match create(db, name, 0.0, 0.0).await {
        Ok(created) => Ok((created, true)),
        // lost a race against a concurrent insert of the same name
        Err(ModelError::Db(e)) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            let found = find_by_name(db, name)
                .await?
                .ok_or_else(|| ModelError::validation("location vanished after conflict"))?;
            Ok((found, false))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_bounds() {
        assert!(validate_coordinates(0.0, 0.0).is_ok());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
        assert!(validate_coordinates(90.5, 0.0).is_err());
        assert!(validate_coordinates(0.0, -181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn blank_name_rejected() {
        assert!(validate_name("   ").is_err());
        assert!(validate_name("Москва").is_ok());
    }
}
