//! Package-wide picture store (`ppt/media/imageN.*`).

use std::collections::HashMap;

use crate::assets::ImageFormat;

/// One embedded picture.
#[derive(Debug, Clone)]
pub struct MediaPart {
    /// File name inside `ppt/media/`.
    pub name: String,
    /// Encoded bytes.
    pub bytes: Vec<u8>,
    /// Container format.
    pub format: ImageFormat,
}

/// Pictures embedded in a package, deduplicated by source key.
#[derive(Debug, Default)]
pub struct MediaStore {
    keys: HashMap<String, usize>,
    parts: Vec<MediaPart>,
}

impl MediaStore {
    /// Register a picture and return its target relative to a slide part.
    ///
    /// A key seen before returns the existing target and drops `bytes`.
    pub fn insert(&mut self, key: &str, bytes: Vec<u8>, format: ImageFormat) -> String {
        let idx = match self.keys.get(key) {
            Some(idx) => *idx,
            None => {
                let name = format!("image{}.{}", self.parts.len() + 1, format.extension());
                self.parts.push(MediaPart {
                    name,
                    bytes,
                    format,
                });
                self.keys.insert(key.to_string(), self.parts.len() - 1);
                self.parts.len() - 1
            }
        };
        format!("../media/{}", self.parts[idx].name)
    }

    /// Embedded pictures in insertion order.
    #[must_use]
    pub fn parts(&self) -> &[MediaPart] {
        &self.parts
    }

    /// Distinct formats in use, for `[Content_Types].xml`.
    #[must_use]
    pub fn formats(&self) -> Vec<ImageFormat> {
        let mut formats: Vec<ImageFormat> = Vec::new();
        for part in &self.parts {
            if !formats.contains(&part.format) {
                formats.push(part.format);
            }
        }
        formats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_dedupes_by_key() {
        let mut store = MediaStore::default();
        assert_eq!(store.insert("a", vec![1], ImageFormat::Png), "../media/image1.png");
        assert_eq!(store.insert("b", vec![2], ImageFormat::Jpeg), "../media/image2.jpeg");
        assert_eq!(store.insert("a", vec![9], ImageFormat::Png), "../media/image1.png");
        assert_eq!(store.parts().len(), 2);
        assert_eq!(store.parts()[0].bytes, vec![1]);
        assert_eq!(store.formats(), vec![ImageFormat::Png, ImageFormat::Jpeg]);
    }
}
