use std::{path::PathBuf, sync::Arc};

use sea_orm::DatabaseConnection;
use service::storage::{ImageStore, LocalImageStore};

/// Shared handler state; cloned per request.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub images: Arc<dyn ImageStore>,
    pub total_on_page: u64,
    /// Served read-only under `/media`.
    pub media_root: PathBuf,
}

impl ServerState {
    /// State backed by `LocalImageStore` rooted at `media_root`.
    pub fn new(db: DatabaseConnection, media_root: impl Into<PathBuf>, total_on_page: u64) -> Self {
        let media_root = media_root.into();
        Self {
            db,
            images: Arc::new(LocalImageStore::new(media_root.clone())),
            total_on_page: total_on_page.max(1),
            media_root,
        }
    }
}
