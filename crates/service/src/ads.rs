//! Ad operations
//!
//! Foreign keys in request bodies are resolved up front so that a bad
//! `author`/`category` id surfaces as `InvalidReference` instead of a raw
//! constraint failure.

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
};
use tracing::{info, instrument, warn};

use models::{ad, category, user};
use crate::{
    errors::ServiceError,
    pagination::{Page, Paginator},
    storage::{ImageStore, AD_IMAGES_DIR},
};

#[derive(Clone, Debug)]
pub struct NewAd {
    pub name: String,
    pub author_id: i32,
    pub price: i32,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub is_published: bool,
}

/// PATCH payload; `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct AdChanges {
    pub name: Option<String>,
    pub author_id: Option<i32>,
    pub price: Option<i32>,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub is_published: Option<bool>,
}

/// An ad together with its author row.
#[derive(Clone, Debug)]
pub struct AdRecord {
    pub ad: ad::Model,
    pub author: user::Model,
}

async fn resolve_author(db: &DatabaseConnection, id: i32) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::invalid_reference("author", id))
}

async fn resolve_category(db: &DatabaseConnection, id: i32) -> Result<category::Model, ServiceError> {
    category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::invalid_reference("category", id))
}

async fn find_existing(db: &DatabaseConnection, id: i32) -> Result<ad::Model, ServiceError> {
    ad::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("ad", id))
}

/// Ads ordered by price, most expensive first.
#[instrument(skip(db))]
pub async fn list_ads(db: &DatabaseConnection, page: Option<&str>, per_page: u64) -> Result<Page<ad::Model>, ServiceError> {
    let query = ad::Entity::find()
        .order_by_desc(ad::Column::Price)
        .order_by_asc(ad::Column::Id);
    let pages = query.paginate(db, per_page.max(1));
    let total = pages.num_items().await?;
    let paginator = Paginator::new(total, per_page);
    let number = paginator.get_page(page);
    let items = pages.fetch_page(number - 1).await?;
    Ok(Page { total, num_pages: paginator.num_pages(), number, items })
}

pub async fn get_ad(db: &DatabaseConnection, id: i32) -> Result<Option<ad::Model>, ServiceError> {
    Ok(ad::Entity::find_by_id(id).one(db).await?)
}

#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_ad(db: &DatabaseConnection, input: NewAd) -> Result<ad::Model, ServiceError> {
    ad::validate_name(&input.name)?;
    ad::validate_price(input.price)?;
    resolve_author(db, input.author_id).await?;
    if let Some(cid) = input.category_id {
        resolve_category(db, cid).await?;
    }

    let am = ad::ActiveModel {
        name: Set(input.name.trim().to_string()),
        author_id: Set(input.author_id),
        price: Set(input.price),
        description: Set(input.description),
        image: Set(None),
        category_id: Set(input.category_id),
        is_published: Set(input.is_published),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    info!(id = created.id, author_id = created.author_id, "ad created");
    Ok(created)
}

#[instrument(skip(db, changes))]
pub async fn update_ad(db: &DatabaseConnection, id: i32, changes: AdChanges) -> Result<AdRecord, ServiceError> {
    let existing = find_existing(db, id).await?;

    let author_id = changes.author_id.unwrap_or(existing.author_id);
    let author = resolve_author(db, author_id).await?;
    if let Some(cid) = changes.category_id {
        resolve_category(db, cid).await?;
    }

    let mut am: ad::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        ad::validate_name(&name)?;
        am.name = Set(name.trim().to_string());
    }
    if let Some(price) = changes.price {
        ad::validate_price(price)?;
        am.price = Set(price);
    }
    if let Some(desc) = changes.description {
        am.description = Set(Some(desc));
    }
    if let Some(cid) = changes.category_id {
        am.category_id = Set(Some(cid));
    }
    if let Some(flag) = changes.is_published {
        am.is_published = Set(flag);
    }
    am.author_id = Set(author_id);

    let ad = am.update(db).await?;
    info!(id = ad.id, "ad updated");
    Ok(AdRecord { ad, author })
}

/// Attach an uploaded image, replacing (and removing) any previous one.
#[instrument(skip(db, store, bytes), fields(size = bytes.len()))]
pub async fn set_ad_image(
    db: &DatabaseConnection,
    store: &dyn ImageStore,
    id: i32,
    filename: &str,
    bytes: &[u8],
) -> Result<AdRecord, ServiceError> {
    let existing = find_existing(db, id).await?;
    let author = resolve_author(db, existing.author_id).await?;
    let previous = existing.image.clone();

    let stored = store.save(AD_IMAGES_DIR, filename, bytes).await?;
    let mut am: ad::ActiveModel = existing.into();
    am.image = Set(Some(stored.clone()));
    let ad = match am.update(db).await {
        Ok(ad) => ad,
        Err(e) => {
            if let Err(cleanup) = store.remove(&stored).await {
                warn!(path = %stored, error = %cleanup, "failed to remove orphaned upload");
            }
            return Err(e.into());
        }
    };

    if let Some(old) = previous.filter(|old| *old != stored) {
        if let Err(e) = store.remove(&old).await {
            warn!(path = %old, error = %e, "failed to remove replaced image");
        }
    }
    info!(id = ad.id, image = %stored, "ad image set");
    Ok(AdRecord { ad, author })
}

#[instrument(skip(db))]
pub async fn delete_ad(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let res = ad::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("ad", id));
    }
    info!(id, "ad deleted");
    Ok(())
}
