//! Export-time asset collection.
//!
//! An [`AssetCollector`] is owned by the caller of an export render and
//! threaded through the rendering call chain; there is no process-wide
//! state. The enable/disable/reset protocol is a cooperative single-writer
//! convention: at most one export is in flight at a time, and a render
//! abandoned mid-way must `reset()` before the next attempt.

use std::path::{Path, PathBuf};

use sha1_smol::Sha1;
use tracing::warn;

/// One image captured during an export render
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedImage {
    /// The reference as written in the note
    pub source: String,
    /// The resolved on-disk location
    pub path: PathBuf,
    /// Raw file content
    pub data: Vec<u8>,
    /// Content-addressed identifier used in the exported HTML
    pub id: String,
}

/// Accumulates images referenced by a deck during one export render
#[derive(Debug, Default)]
pub struct AssetCollector {
    enabled: bool,
    images: Vec<CollectedImage>,
}

impl AssetCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all accumulated state. Call before every export.
    pub fn reset(&mut self) {
        self.enabled = false;
        self.images.clear();
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Whether image references should currently be intercepted
    pub fn should_collect(&self) -> bool {
        self.enabled
    }

    /// Intercept one image reference.
    ///
    /// Resolves `source` against the note's directory, reads the bytes, and
    /// returns the rewritten embeddable reference. An unreadable file
    /// degrades: the original reference is returned and nothing is recorded.
    pub fn collect(&mut self, source: &str, doc_dir: &Path) -> String {
        if !self.enabled {
            return source.to_string();
        }

        let path = doc_dir.join(source);
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(err) => {
                warn!("cannot read image {} ({err}); leaving reference as-is", path.display());
                return source.to_string();
            }
        };

        let id = image_id(source, &data);
        let reference = format!("assets/{}", id);

        // The same file referenced twice collects once
        if !self.images.iter().any(|image| image.id == id) {
            self.images.push(CollectedImage {
                source: source.to_string(),
                path,
                data,
                id,
            });
        }

        reference
    }

    /// All images collected so far, in collection order
    pub fn get_all(&self) -> &[CollectedImage] {
        &self.images
    }

    /// Drain the collector, handing ownership of the payloads to the caller
    pub fn into_collected(self) -> Vec<CollectedImage> {
        self.images
    }
}

/// Stable identifier for an image: content hash plus the original extension
fn image_id(source: &str, data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    let digest = hasher.digest().to_string();

    match Path::new(source)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(ext) => format!("{}.{}", digest, ext.to_ascii_lowercase()),
        None => digest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reset_clears_everything() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.png"), b"payload").unwrap();

        let mut collector = AssetCollector::new();
        collector.enable();
        collector.collect("a.png", dir.path());
        assert_eq!(collector.get_all().len(), 1);

        collector.reset();
        assert!(collector.get_all().is_empty());
        assert!(!collector.should_collect());
    }

    #[test]
    fn test_collect_rewrites_reference() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("photo.png"), b"image-bytes").unwrap();

        let mut collector = AssetCollector::new();
        collector.enable();
        let reference = collector.collect("photo.png", dir.path());

        assert!(reference.starts_with("assets/"));
        assert!(reference.ends_with(".png"));

        let collected = collector.get_all();
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].source, "photo.png");
        assert!(!collected[0].data.is_empty());
    }

    #[test]
    fn test_disabled_collector_passes_through() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("photo.png"), b"image-bytes").unwrap();

        let mut collector = AssetCollector::new();
        collector.enable();
        collector.disable();

        let reference = collector.collect("photo.png", dir.path());
        assert_eq!(reference, "photo.png");
        assert!(collector.get_all().is_empty());
    }

    #[test]
    fn test_missing_file_degrades() {
        let dir = TempDir::new().unwrap();

        let mut collector = AssetCollector::new();
        collector.enable();
        let reference = collector.collect("gone.png", dir.path());

        assert_eq!(reference, "gone.png");
        assert!(collector.get_all().is_empty());
    }

    #[test]
    fn test_duplicate_content_collects_once() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.png"), b"same").unwrap();

        let mut collector = AssetCollector::new();
        collector.enable();
        let first = collector.collect("a.png", dir.path());
        let second = collector.collect("a.png", dir.path());

        assert_eq!(first, second);
        assert_eq!(collector.get_all().len(), 1);
    }

    #[test]
    fn test_identifier_is_content_addressed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.png"), b"content-one").unwrap();
        fs::write(dir.path().join("b.png"), b"content-two").unwrap();

        let mut collector = AssetCollector::new();
        collector.enable();
        let a = collector.collect("a.png", dir.path());
        let b = collector.collect("b.png", dir.path());

        assert_ne!(a, b);
    }
}
