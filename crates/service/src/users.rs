use std::collections::HashMap;

use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::{info, instrument};

use models::{ad, location, user};
use crate::{
    errors::ServiceError,
    locations,
    pagination::{Page, Paginator},
    password::hash_password,
};

#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// `member` when absent.
    pub role: Option<String>,
    pub age: Option<i32>,
    /// Location name, created on first use.
    pub location: Option<String>,
    pub password: String,
}

#[derive(Clone, Debug, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone, Debug)]
pub struct UserRecord {
    pub user: user::Model,
    pub location: Option<location::Model>,
}

impl UserRecord {
    pub fn location_name(&self) -> Option<&str> { self.location.as_ref().map(|l| l.name.as_str()) }
}

/// Listing row: user, location name and number of authored ads.
#[derive(Clone, Debug)]
pub struct UserSummary {
    pub user: user::Model,
    pub location_name: Option<String>,
    pub total_ads: u64,
}

fn parse_role(raw: &str) -> Result<String, ServiceError> {
    Ok(raw.parse::<user::Role>()?.as_str().to_string())
}

async fn find_existing(db: &DatabaseConnection, id: i32) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("user", id))
}

async fn location_of(db: &DatabaseConnection, u: &user::Model) -> Result<Option<location::Model>, ServiceError> {
    match u.location_id {
        Some(lid) => Ok(location::Entity::find_by_id(lid).one(db).await?),
        None => Ok(None),
    }
}

#[instrument(skip(db))]
pub async fn list_users(db: &DatabaseConnection, page: Option<&str>, per_page: u64) -> Result<Page<UserSummary>, ServiceError> {
    let query = user::Entity::find()
        .order_by_asc(user::Column::Username)
        .order_by_asc(user::Column::Id);
    let pages = query.paginate(db, per_page.max(1));
    let total = pages.num_items().await?;
    let paginator = Paginator::new(total, per_page);
    let number = paginator.get_page(page);
    let users = pages.fetch_page(number - 1).await?;

    let user_ids: Vec<i32> = users.iter().map(|u| u.id).collect();
    let location_ids: Vec<i32> = users.iter().filter_map(|u| u.location_id).collect();

    let names: HashMap<i32, String> = if location_ids.is_empty() {
        HashMap::new()
    } else {
        location::Entity::find()
            .filter(location::Column::Id.is_in(location_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|l| (l.id, l.name))
            .collect()
    };

    let counts: HashMap<i32, i64> = if user_ids.is_empty() {
        HashMap::new()
    } else {
        ad::Entity::find()
            .select_only()
            .column(ad::Column::AuthorId)
            .column_as(Expr::col(ad::Column::Id).count(), "total")
            .filter(ad::Column::AuthorId.is_in(user_ids))
            .group_by(ad::Column::AuthorId)
            .into_tuple::<(i32, i64)>()
            .all(db)
            .await?
            .into_iter()
            .collect()
    };

    let items = users
        .into_iter()
        .map(|u| UserSummary {
            location_name: u.location_id.and_then(|lid| names.get(&lid).cloned()),
            total_ads: counts.get(&u.id).copied().unwrap_or(0).max(0) as u64,
            user: u,
        })
        .collect();
    Ok(Page { total, num_pages: paginator.num_pages(), number, items })
}

pub async fn get_user(db: &DatabaseConnection, id: i32) -> Result<Option<UserRecord>, ServiceError> {
    let Some(u) = user::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    let location = location_of(db, &u).await?;
    Ok(Some(UserRecord { user: u, location }))
}

#[instrument(skip(db, input), fields(username = %input.username))]
pub async fn create_user(db: &DatabaseConnection, input: NewUser) -> Result<UserRecord, ServiceError> {
    user::validate_username(&input.username)?;
    user::validate_person_name("first_name", &input.first_name)?;
    user::validate_person_name("last_name", &input.last_name)?;
    user::validate_age(input.age)?;
    let role = match input.role.as_deref() {
        Some(raw) => parse_role(raw)?,
        None => user::Role::default().as_str().to_string(),
    };
    let password = hash_password(&input.password)?;

    let location = match input.location.as_deref() {
        Some(name) => Some(locations::get_or_create(db, name).await?),
        None => None,
    };

    let am = user::ActiveModel {
        username: Set(input.username.trim().to_string()),
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        role: Set(role),
        age: Set(input.age),
        location_id: Set(location.as_ref().map(|l| l.id)),
        password: Set(password),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    info!(id = created.id, "user created");
    Ok(UserRecord { user: created, location })
}

#[instrument(skip(db, changes))]
pub async fn update_user(db: &DatabaseConnection, id: i32, changes: UserChanges) -> Result<UserRecord, ServiceError> {
    let existing = find_existing(db, id).await?;
    let mut location = location_of(db, &existing).await?;
    let mut am: user::ActiveModel = existing.into();

    if let Some(username) = changes.username {
        user::validate_username(&username)?;
        am.username = Set(username.trim().to_string());
    }
    if let Some(first) = changes.first_name {
        user::validate_person_name("first_name", &first)?;
        am.first_name = Set(first);
    }
    if let Some(last) = changes.last_name {
        user::validate_person_name("last_name", &last)?;
        am.last_name = Set(last);
    }
    if let Some(raw) = changes.role {
        am.role = Set(parse_role(&raw)?);
    }
    if let Some(age) = changes.age {
        user::validate_age(Some(age))?;
        am.age = Set(Some(age));
    }
    if let Some(plain) = changes.password {
        am.password = Set(hash_password(&plain)?);
    }
    if let Some(name) = changes.location {
        let loc = locations::get_or_create(db, &name).await?;
        am.location_id = Set(Some(loc.id));
        location = Some(loc);
    }

    let updated = am.update(db).await?;
    info!(id = updated.id, "user updated");
    Ok(UserRecord { user: updated, location })
}

/// Removing a user removes their ads.
#[instrument(skip(db))]
pub async fn delete_user(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let res = user::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("user", id));
    }
    info!(id, "user deleted");
    Ok(())
}
