use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{category, errors::ModelError, user};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ad")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub author_id: i32,
    pub price: i32,
    #[serde(rename = "desc")]
    pub description: Option<String>,
    /// Path relative to the media root, e.g. `ad_images/bike.jpg`.
    pub image: Option<String>,
    pub category_id: Option<i32>,
    pub is_published: bool,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Author,
    Category,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Author => Entity::belongs_to(user::Entity)
                .from(Column::AuthorId)
                .to(user::Column::Id)
                .into(),
            Relation::Category => Entity::belongs_to(category::Entity)
                .from(Column::CategoryId)
                .to(category::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::Author.def() }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() { return Err(ModelError::validation("ad name required")); }
    if name.chars().count() > 200 { return Err(ModelError::validation("ad name too long (<=200)")); }
    Ok(())
}

pub fn validate_price(price: i32) -> Result<(), ModelError> {
    if price < 0 { return Err(ModelError::validation("price must be non-negative")); }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_must_not_be_negative() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(1500).is_ok());
        assert!(validate_price(-1).is_err());
    }

    #[test]
    fn desc_serializes_under_wire_name() {
        let m = Model {
            id: 1,
            name: "Bike".into(),
            author_id: 2,
            price: 100,
            description: Some("red".into()),
            image: None,
            category_id: None,
            is_published: false,
        };
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["desc"], "red");
        assert!(v.get("description").is_none());
    }
}
