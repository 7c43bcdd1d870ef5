//! Service layer providing business-oriented CRUD operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Resolves foreign keys and maps storage failures into `ServiceError`.

pub mod errors;
pub mod pagination;
pub mod password;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
pub mod storage;
pub mod ads;
pub mod users;
pub mod categories;
pub mod locations;
