//! Picture resources attached to grid objects and page watermarks.

use std::collections::HashMap;

use md5::{Digest, Md5};
use serde::Serialize;

/// MD5 digest of a picture buffer.
pub type PictureDigest = [u8; 16];

/// Compute the content digest used for picture deduplication.
pub fn picture_digest(data: &[u8]) -> PictureDigest {
    let mut digest = [0u8; 16];
    digest.copy_from_slice(&Md5::digest(data));
    digest
}

/// A stored picture: opaque bytes handed over by the producer.
#[derive(Debug, Clone, Serialize)]
pub struct Picture {
    /// Raw binary data
    #[serde(skip_serializing)]
    pub data: Vec<u8>,

    /// MIME type sniffed from the data (e.g., "image/png")
    pub mime_type: &'static str,

    /// Content digest
    #[serde(serialize_with = "serialize_digest")]
    pub digest: PictureDigest,
}

fn serialize_digest<S: serde::Serializer>(
    digest: &PictureDigest,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&digest_hex(digest))
}

/// Hex representation of a digest.
pub fn digest_hex(digest: &PictureDigest) -> String {
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

impl Picture {
    /// Create a picture, computing its digest.
    pub fn new(data: Vec<u8>) -> Self {
        let digest = picture_digest(&data);
        Self::with_digest(data, digest)
    }

    /// Create a picture from an already computed digest.
    pub fn with_digest(data: Vec<u8>, digest: PictureDigest) -> Self {
        let mime_type = Self::detect_mime_type(&data).unwrap_or("application/octet-stream");
        Self {
            data,
            mime_type,
            digest,
        }
    }

    /// Get the size of the picture data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Get a suggested filename for writing the picture out.
    pub fn suggested_filename(&self, id: usize) -> String {
        format!("picture{}.{}", id, self.extension())
    }

    /// Get the file extension based on MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime_type {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/tiff" => "tiff",
            "image/bmp" => "bmp",
            "image/webp" => "webp",
            "image/emf" => "emf",
            "image/wmf" => "wmf",
            _ => "bin",
        }
    }

    /// Detect MIME type from data magic bytes.
    pub fn detect_mime_type(data: &[u8]) -> Option<&'static str> {
        if data.len() < 4 {
            return None;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some("image/jpeg");
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some("image/png");
        }

        // GIF: GIF87a or GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some("image/gif");
        }

        // TIFF: little-endian or big-endian byte order mark
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some("image/tiff");
        }

        // BMP: BM
        if data.starts_with(b"BM") {
            return Some("image/bmp");
        }

        // WEBP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some("image/webp");
        }

        // EMF: record type 1 followed by " EMF" signature at offset 40
        if data.len() >= 44 && data.starts_with(&[0x01, 0x00, 0x00, 0x00]) && &data[40..44] == b" EMF"
        {
            return Some("image/emf");
        }

        // Placeable WMF: D7 CD C6 9A
        if data.starts_with(&[0xD7, 0xCD, 0xC6, 0x9A]) {
            return Some("image/wmf");
        }

        None
    }
}

/// Content-addressed picture storage: identical buffers are stored once.
#[derive(Debug, Default)]
pub struct PictureStore {
    pictures: Vec<Picture>,
    by_digest: HashMap<PictureDigest, usize>,
}

impl PictureStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a picture and return its id, reusing an identical one.
    pub fn insert(&mut self, data: Vec<u8>) -> usize {
        let digest = picture_digest(&data);
        self.insert_with_digest(data, digest)
    }

    /// Store a picture whose digest was computed ahead of time.
    pub fn insert_with_digest(&mut self, data: Vec<u8>, digest: PictureDigest) -> usize {
        if let Some(&id) = self.by_digest.get(&digest) {
            log::debug!("PictureStore: reusing picture {} ({})", id, digest_hex(&digest));
            return id;
        }
        let id = self.pictures.len();
        self.pictures.push(Picture::with_digest(data, digest));
        self.by_digest.insert(digest, id);
        id
    }

    /// Get a picture by id.
    pub fn get(&self, id: usize) -> Option<&Picture> {
        self.pictures.get(id)
    }

    /// Number of distinct pictures.
    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }

    /// Iterate over all stored pictures.
    pub fn iter(&self) -> impl Iterator<Item = &Picture> {
        self.pictures.iter()
    }

    /// Release every buffer.
    pub fn clear(&mut self) {
        self.pictures.clear();
        self.by_digest.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_detect_mime_type() {
        let jpeg_data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert_eq!(Picture::detect_mime_type(&jpeg_data), Some("image/jpeg"));
        assert_eq!(Picture::detect_mime_type(&PNG_HEADER), Some("image/png"));
        assert_eq!(Picture::detect_mime_type(&[0xD7, 0xCD, 0xC6, 0x9A, 0x00]), Some("image/wmf"));
        assert_eq!(Picture::detect_mime_type(&[0x00, 0x00, 0x00, 0x00]), None);
    }

    #[test]
    fn test_unknown_data_is_octet_stream() {
        let picture = Picture::new(vec![1, 2, 3]);
        assert_eq!(picture.mime_type, "application/octet-stream");
        assert_eq!(picture.extension(), "bin");
        assert_eq!(picture.suggested_filename(3), "picture3.bin");
    }

    #[test]
    fn test_store_deduplicates_identical_buffers() {
        let mut store = PictureStore::new();
        let first = store.insert(PNG_HEADER.to_vec());
        let second = store.insert(PNG_HEADER.to_vec());
        let third = store.insert(vec![0xFF, 0xD8, 0xFF, 0xE0]);

        assert_eq!(first, second);
        assert_ne!(first, third);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(first).map(|p| p.extension()), Some("png"));
    }

    #[test]
    fn test_store_clear() {
        let mut store = PictureStore::new();
        store.insert(vec![1, 2, 3, 4]);
        store.clear();
        assert!(store.is_empty());
        assert!(store.get(0).is_none());
    }

    #[test]
    fn test_digest_hex() {
        // MD5 of the empty input
        assert_eq!(
            digest_hex(&picture_digest(b"")),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }
}
