//! Storage abstractions for uploaded files
//!
//! Handlers only see `ImageStore`; the local filesystem implementation lives
//! in `local` and writes under the configured media root.

use async_trait::async_trait;

use crate::errors::ServiceError;

pub mod local;

pub use local::LocalImageStore;

/// Upload directory for ad images, relative to the media root.
pub const AD_IMAGES_DIR: &str = "ad_images";

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `bytes` under `dir` and return the stored path relative to
    /// the store root (always `/`-separated).
    async fn save(&self, dir: &str, filename: &str, bytes: &[u8]) -> Result<String, ServiceError>;

    /// Remove a previously stored file; a missing file is not an error.
    async fn remove(&self, path: &str) -> Result<(), ServiceError>;
}

/// Reduce an uploaded name to a safe final path component.
pub fn sanitize_filename(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        return "upload".to_string();
    }
    truncate_name(cleaned)
}

/// Longest stored name; leaves room in `ad.image` (255) for the directory
/// prefix and a clash suffix.
pub const MAX_FILENAME_LEN: usize = 100;
const MAX_EXTENSION_LEN: usize = 16;

// input is ASCII after sanitizing, so byte slicing is safe
fn truncate_name(name: &str) -> String {
    if name.len() <= MAX_FILENAME_LEN {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.len() <= MAX_EXTENSION_LEN => {
            let keep = MAX_FILENAME_LEN - ext.len() - 1;
            format!("{}.{}", &stem[..keep.min(stem.len())], ext)
        }
        _ => name[..MAX_FILENAME_LEN].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{sanitize_filename, MAX_FILENAME_LEN};

    #[test]
    fn keeps_plain_names() {
        assert_eq!(sanitize_filename("bike.jpg"), "bike.jpg");
        assert_eq!(sanitize_filename("my-photo_2.png"), "my-photo_2.png");
    }

    #[test]
    fn strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\cat.gif"), "cat.gif");
    }

    #[test]
    fn replaces_odd_characters() {
        assert_eq!(sanitize_filename("фото 1.jpg"), "_____1.jpg");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename("dir/"), "upload");
    }

    #[test]
    fn long_names_are_truncated_keeping_extension() {
        let long = format!("{}.jpeg", "a".repeat(300));
        let name = sanitize_filename(&long);
        assert_eq!(name.len(), MAX_FILENAME_LEN);
        assert!(name.ends_with(".jpeg"));

        let no_ext = "b".repeat(250);
        assert_eq!(sanitize_filename(&no_ext).len(), MAX_FILENAME_LEN);
    }
}
