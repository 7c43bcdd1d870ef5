use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use rand::{distributions::Alphanumeric, Rng};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use tracing::{debug, info};

use super::{sanitize_filename, ImageStore};
use crate::errors::ServiceError;

/// Filesystem-backed store rooted at the media directory.
#[derive(Clone, Debug)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    fn resolve(&self, relative: &str) -> Result<PathBuf, ServiceError> {
        let rel = Path::new(relative);
        let safe = rel.components().all(|c| matches!(c, Component::Normal(_)));
        if relative.is_empty() || !safe {
            return Err(ServiceError::Storage(format!("refusing path outside media root: {relative}")));
        }
        Ok(self.root.join(rel))
    }
}

const MAX_NAME_ATTEMPTS: usize = 16;

fn random_suffix() -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(7).map(char::from).collect()
}

fn with_suffix(filename: &str, suffix: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{suffix}.{ext}"),
        _ => format!("{filename}_{suffix}"),
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, dir: &str, filename: &str, bytes: &[u8]) -> Result<String, ServiceError> {
        let dir_path = self.resolve(dir)?;
        tokio::fs::create_dir_all(&dir_path)
            .await
            .map_err(|e| ServiceError::Storage(format!("cannot create {}: {e}", dir_path.display())))?;

        let base = sanitize_filename(filename);
        let mut name = base.clone();
        let mut attempts = 0;
        // create_new claims the name atomically; a clash retries with a suffix
        let (target, mut file) = loop {
            let target = dir_path.join(&name);
            match OpenOptions::new().write(true).create_new(true).open(&target).await {
                Ok(file) => break (target, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists && attempts < MAX_NAME_ATTEMPTS => {
                    attempts += 1;
                    name = with_suffix(&base, &random_suffix());
                }
                Err(e) => return Err(ServiceError::Storage(format!("cannot create {}: {e}", target.display()))),
            }
        };

        let written = match file.write_all(bytes).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            drop(file);
            let _ = tokio::fs::remove_file(&target).await;
            return Err(ServiceError::Storage(format!("cannot write {}: {e}", target.display())));
        }
        let relative = format!("{}/{}", dir.trim_end_matches('/'), name);
        info!(path = %relative, size = bytes.len(), "image stored");
        Ok(relative)
    }

    async fn remove(&self, path: &str) -> Result<(), ServiceError> {
        let target = self.resolve(path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => {
                debug!(path = %path, "image removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ServiceError::Storage(format!("cannot remove {}: {e}", target.display()))),
        }
    }
}
