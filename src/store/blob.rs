//! Local blob storage for member images.
//!
//! Blobs live under a root directory and are addressed by `file://` URLs,
//! mirroring the hosted bucket's put-returns-url / delete-by-url interface.

use std::path::PathBuf;

use crate::error::{OrangeError, Result};

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
}

impl ImageKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Webp => "webp",
        }
    }
}

/// Validate image bytes before any write: allowed formats are JPEG, PNG and
/// WebP, at most 5 MB. Detection is by magic bytes, not file name.
pub fn validate_image(bytes: &[u8]) -> Result<ImageKind> {
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(OrangeError::InvalidImage(format!(
            "file is {} bytes, limit is 5 MB",
            bytes.len()
        )));
    }

    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Ok(ImageKind::Jpeg);
    }
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Ok(ImageKind::Png);
    }
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Ok(ImageKind::Webp);
    }

    Err(OrangeError::InvalidImage(
        "only JPEG, PNG and WebP are supported".into(),
    ))
}

/// Storage path for a member profile image, one of two slots per member.
pub fn member_image_path(member_id: &str, slot: u8, kind: ImageKind) -> String {
    format!(
        "members/{}/no{}_{}.{}",
        member_id,
        slot,
        chrono::Utc::now().timestamp_millis(),
        kind.extension()
    )
}

pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Store bytes at `path` and return the blob's URL.
    pub fn put(&self, path: &str, bytes: &[u8]) -> Result<String> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full, bytes)?;
        Ok(format!("file://{}", full.display()))
    }

    /// Delete a blob previously returned by [`put`](Self::put).
    pub fn delete(&self, url: &str) -> Result<()> {
        let path = url.strip_prefix("file://").unwrap_or(url);
        let path = PathBuf::from(path);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn detects_jpeg_png_webp() {
        assert_eq!(validate_image(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap(), ImageKind::Jpeg);
        assert_eq!(validate_image(&PNG_HEADER).unwrap(), ImageKind::Png);

        let mut webp = Vec::from(*b"RIFF");
        webp.extend_from_slice(&[0, 0, 0, 0]);
        webp.extend_from_slice(b"WEBP");
        assert_eq!(validate_image(&webp).unwrap(), ImageKind::Webp);
    }

    #[test]
    fn rejects_unknown_format() {
        let err = validate_image(b"GIF89a").unwrap_err();
        assert!(matches!(err, OrangeError::InvalidImage(_)));
    }

    #[test]
    fn rejects_oversized_image() {
        let mut bytes = vec![0u8; MAX_IMAGE_BYTES + 1];
        bytes[..3].copy_from_slice(&[0xFF, 0xD8, 0xFF]);
        let err = validate_image(&bytes).unwrap_err();
        assert!(matches!(err, OrangeError::InvalidImage(_)));
    }

    #[test]
    fn put_then_delete_roundtrips() {
        let tmp = TempDir::new().unwrap();
        let blobs = BlobStore::new(tmp.path().to_path_buf());

        let url = blobs.put("members/m1/no1_1.png", &PNG_HEADER).unwrap();
        assert!(url.starts_with("file://"));
        assert!(tmp.path().join("members/m1/no1_1.png").exists());

        blobs.delete(&url).unwrap();
        assert!(!tmp.path().join("members/m1/no1_1.png").exists());
    }

    #[test]
    fn image_path_is_slot_scoped() {
        let path = member_image_path("m1", 2, ImageKind::Jpeg);
        assert!(path.starts_with("members/m1/no2_"));
        assert!(path.ends_with(".jpg"));
    }
}
