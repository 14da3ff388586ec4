//! On-disk wardrobe storage.
//!
//! Catalog identifiers double as relative paths beneath the closet root.
//! Existence is checked before any read so a dangling selection fails fast,
//! before a generation call is made.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::error::StylistError;
use crate::genai::ImageBlob;
use crate::transport;

/// Errors raised by closet storage.
#[derive(Debug, Error)]
pub enum ClosetError {
    #[error("Item not stored: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ClosetError> for StylistError {
    fn from(e: ClosetError) -> Self {
        match e {
            ClosetError::NotFound(id) => StylistError::ItemNotFound(id),
            ClosetError::Io(e) => StylistError::Internal(e.to_string()),
        }
    }
}

/// Read access to stored garment images.
pub trait Closet: Send + Sync {
    /// Resolve a catalog identifier to its stored image.
    fn load_garment(&self, id: &str) -> Result<ImageBlob, ClosetError>;
}

/// Filesystem closet rooted at a directory.
pub struct FsCloset {
    root: PathBuf,
}

impl FsCloset {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Overwrite-on-write save of the person photo, creating parent
    /// directories as needed. Returns the absolute path written.
    pub fn save_person_image(
        &self,
        relative_path: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, ClosetError> {
        let path = self.root.join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Identifiers must stay inside the closet root: relative, no `..`.
fn is_clean_relative(id: &str) -> bool {
    let path = Path::new(id);
    path.is_relative()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

impl Closet for FsCloset {
    fn load_garment(&self, id: &str) -> Result<ImageBlob, ClosetError> {
        if id.is_empty() || !is_clean_relative(id) {
            return Err(ClosetError::NotFound(id.to_string()));
        }
        let path = self.root.join(id);
        if !path.exists() {
            return Err(ClosetError::NotFound(id.to_string()));
        }
        let bytes = std::fs::read(&path)?;
        let mime = transport::sniff_mime(&bytes);
        Ok(ImageBlob::new(mime, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn closet_with_garment(id: &str, bytes: &[u8]) -> (TempDir, FsCloset) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(id);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, bytes).unwrap();
        let closet = FsCloset::new(dir.path());
        (dir, closet)
    }

    #[test]
    fn test_load_garment_with_sniffed_mime() {
        let (_dir, closet) = closet_with_garment("tops/hoodie1.png", PNG_MAGIC);
        let blob = closet.load_garment("tops/hoodie1.png").unwrap();
        assert_eq!(blob.mime_type, "image/png");
        assert_eq!(blob.bytes, PNG_MAGIC);
    }

    #[test]
    fn test_missing_garment_is_not_found() {
        let (_dir, closet) = closet_with_garment("tops/hoodie1.png", PNG_MAGIC);
        let err = closet.load_garment("tops/ghost.png").unwrap_err();
        assert!(matches!(err, ClosetError::NotFound(id) if id == "tops/ghost.png"));
    }

    #[test]
    fn test_escaping_identifiers_are_rejected() {
        let (_dir, closet) = closet_with_garment("tops/hoodie1.png", PNG_MAGIC);
        assert!(matches!(
            closet.load_garment("../hoodie1.png"),
            Err(ClosetError::NotFound(_))
        ));
        assert!(matches!(
            closet.load_garment("/etc/hostname"),
            Err(ClosetError::NotFound(_))
        ));
        assert!(matches!(
            closet.load_garment(""),
            Err(ClosetError::NotFound(_))
        ));
    }

    #[test]
    fn test_save_person_image_overwrites() {
        let dir = TempDir::new().unwrap();
        let closet = FsCloset::new(dir.path());

        let first = closet
            .save_person_image("person/person_image.jpg", b"first")
            .unwrap();
        let second = closet
            .save_person_image("person/person_image.jpg", b"second")
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read(&second).unwrap(), b"second");
    }
}
