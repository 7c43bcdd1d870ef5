use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::{info, instrument};

use models::location;
use crate::errors::ServiceError;

/// Partial update of a location; `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct LocationChanges {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

pub async fn list_locations(db: &DatabaseConnection) -> Result<Vec<location::Model>, ServiceError> {
    let rows = location::Entity::find()
        .order_by_asc(location::Column::Name)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn get_location(db: &DatabaseConnection, id: i32) -> Result<Option<location::Model>, ServiceError> {
    Ok(location::Entity::find_by_id(id).one(db).await?)
}

#[instrument(skip(db))]
pub async fn create_location(db: &DatabaseConnection, name: &str, lat: f64, lng: f64) -> Result<location::Model, ServiceError> {
    Ok(location::create(db, name, lat, lng).await?)
}

/// Get-or-create by name with 0/0 coordinates; used by the user operations.
pub async fn get_or_create(db: &DatabaseConnection, name: &str) -> Result<location::Model, ServiceError> {
    let (loc, created) = location::get_or_create(db, name).await?;
    if created {
        info!(id = loc.id, name = %loc.name, "location created implicitly");
    }
    Ok(loc)
}

#[instrument(skip(db, changes))]
pub async fn update_location(db: &DatabaseConnection, id: i32, changes: LocationChanges) -> Result<location::Model, ServiceError> {
    let existing = location::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("location", id))?;
    let lat = changes.lat.unwrap_or(existing.lat);
    let lng = changes.lng.unwrap_or(existing.lng);
    location::validate_coordinates(lat, lng)?;

    let mut am: location::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        location::validate_name(&name)?;
        am.name = Set(name.trim().to_string());
    }
    am.lat = Set(lat);
    am.lng = Set(lng);
    Ok(am.update(db).await?)
}

/// Users at the location keep existing with no location.
pub async fn delete_location(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let res = location::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("location", id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn location_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let spb = create_location(&db, "Saint Petersburg", 59.93, 30.36).await?;
        let found = get_location(&db, spb.id).await?.unwrap();
        assert_eq!(found.name, "Saint Petersburg");

        let moved = update_location(&db, spb.id, LocationChanges { lat: Some(60.0), ..Default::default() }).await?;
        assert_eq!(moved.lat, 60.0);
        assert_eq!(moved.lng, 30.36);

        let bad = update_location(&db, spb.id, LocationChanges { lng: Some(500.0), ..Default::default() }).await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));

        assert_eq!(list_locations(&db).await?.len(), 1);
        delete_location(&db, spb.id).await?;
        assert!(get_location(&db, spb.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = get_or_create(&db, "Sochi").await?;
        let b = get_or_create(&db, " Sochi ").await?;
        assert_eq!(a.id, b.id);
        assert_eq!(list_locations(&db).await?.len(), 1);
        Ok(())
    }
}
