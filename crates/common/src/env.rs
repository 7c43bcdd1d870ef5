//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::{info, warn};

/// Ensure the media root exists so uploads and `/media` serving work.
pub async fn ensure_env(media_root: &str) -> anyhow::Result<()> {
    if media_root.trim().is_empty() {
        return Err(anyhow::anyhow!("media root must not be empty"));
    }
    if tokio::fs::metadata(media_root).await.is_err() {
        warn!(%media_root, "media directory not found; creating it");
    }
    tokio::fs::create_dir_all(media_root)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {media_root}: {e}"))?;
    info!(%media_root, "media directory ready");
    Ok(())
}
