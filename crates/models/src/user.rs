use std::{fmt, str::FromStr};

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{ad, errors::ModelError, location};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub age: Option<i32>,
    pub location_id: Option<i32>,
    /// argon2 PHC string
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Location,
    Ad,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Location => Entity::belongs_to(location::Entity)
                .from(Column::LocationId)
                .to(location::Column::Id)
                .into(),
            Relation::Ad => Entity::has_many(ad::Entity).into(),
        }
    }
}

impl Related<location::Entity> for Entity {
    fn to() -> RelationDef { Relation::Location.def() }
}

impl Related<ad::Entity> for Entity {
    fn to() -> RelationDef { Relation::Ad.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "member" => Ok(Role::Member),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(ModelError::Validation(format!("unknown role `{other}` (member|moderator|admin)"))),
        }
    }
}

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    if username.trim().is_empty() { return Err(ModelError::validation("username required")); }
    if username.chars().count() > 150 { return Err(ModelError::validation("username too long (<=150)")); }
    if username.chars().any(char::is_whitespace) {
        return Err(ModelError::validation("username must not contain whitespace"));
    }
    Ok(())
}

pub fn validate_person_name(field: &str, value: &str) -> Result<(), ModelError> {
    if value.chars().count() > 150 { return Err(ModelError::Validation(format!("{field} too long (<=150)"))); }
    Ok(())
}

pub fn validate_age(age: Option<i32>) -> Result<(), ModelError> {
    match age {
        Some(a) if a < 0 => Err(ModelError::validation("age must be non-negative")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" Moderator ".parse::<Role>().unwrap(), Role::Moderator);
        assert!("owner".parse::<Role>().is_err());
        assert_eq!(Role::default().to_string(), "member");
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("ivan_petrov").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("ivan petrov").is_err());
    }

    #[test]
    fn negative_age_rejected() {
        assert!(validate_age(Some(-1)).is_err());
        assert!(validate_age(None).is_ok());
        assert!(validate_age(Some(30)).is_ok());
    }
}
