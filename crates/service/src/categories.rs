use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::instrument;

use models::category;
use crate::errors::ServiceError;

/// All categories ordered by name.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>, ServiceError> {
    let rows = category::Entity::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn get_category(db: &DatabaseConnection, id: i32) -> Result<Option<category::Model>, ServiceError> {
    Ok(category::Entity::find_by_id(id).one(db).await?)
}

#[instrument(skip(db))]
pub async fn create_category(db: &DatabaseConnection, name: &str) -> Result<category::Model, ServiceError> {
    Ok(category::create(db, name).await?)
}

#[instrument(skip(db))]
pub async fn rename_category(db: &DatabaseConnection, id: i32, name: &str) -> Result<category::Model, ServiceError> {
    category::validate_name(name)?;
    let mut am: category::ActiveModel = category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("category", id))?
        .into();
    am.name = Set(name.trim().to_string());
    Ok(am.update(db).await?)
}

/// Ads in the category keep existing with no category.
pub async fn delete_category(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let res = category::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("category", id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn category_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let books = create_category(&db, "Books").await?;
        create_category(&db, "Animals").await?;
        let names: Vec<_> = list_categories(&db).await?.into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Animals", "Books"]);

        let renamed = rename_category(&db, books.id, "Textbooks").await?;
        assert_eq!(renamed.name, "Textbooks");
        assert_eq!(get_category(&db, books.id).await?.unwrap().name, "Textbooks");

        delete_category(&db, books.id).await?;
        assert!(get_category(&db, books.id).await?.is_none());
        assert!(matches!(delete_category(&db, books.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_name_is_conflict() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_category(&db, "Cars").await?;
        assert!(matches!(create_category(&db, "Cars").await, Err(ServiceError::Conflict(_))));
        assert!(matches!(rename_category(&db, 404, "X").await, Err(ServiceError::NotFound(_))));
        assert!(matches!(create_category(&db, " ").await, Err(ServiceError::Validation(_))));
        Ok(())
    }
}
