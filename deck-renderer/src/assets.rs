//! Image asset loading.
//!
//! Sources may be data URIs, local file paths (optionally `file://`) or,
//! with the `remote-assets` feature, `http(s)` URLs. Every image referenced
//! by a slide is resolved before the slide is composed, so backends render
//! from memory and a broken source surfaces as a per-element error.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use deck_core::{Element, ElementKind};

use crate::error::{RenderError, RenderResult};

/// Image container formats understood by the export backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG.
    Png,
    /// JPEG.
    Jpeg,
    /// GIF (first frame).
    Gif,
    /// WebP.
    WebP,
    /// SVG document.
    Svg,
}

impl ImageFormat {
    /// Detect the format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(Self::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if data.starts_with(b"GIF8") {
            return Some(Self::Gif);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }
        let head = String::from_utf8_lossy(&data[..data.len().min(256)]);
        let head = head.trim_start_matches('\u{feff}').trim_start();
        if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
            return Some(Self::Svg);
        }
        None
    }

    /// MIME type.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
            Self::Svg => "image/svg+xml",
        }
    }

    /// File extension used inside packages.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::WebP => "webp",
            Self::Svg => "svg",
        }
    }
}

/// A decoded, validated image ready for embedding.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Encoded bytes in `format`.
    pub bytes: Vec<u8>,
    /// Container format of `bytes`.
    pub format: ImageFormat,
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
}

impl LoadedImage {
    /// Validate raw bytes and read the intrinsic size.
    ///
    /// Bitmap formats other than PNG, JPEG, GIF and WebP are re-encoded
    /// as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Resource`] if the bytes are not a decodable
    /// image.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn decode(bytes: Vec<u8>) -> RenderResult<Self> {
        if bytes.is_empty() {
            return Err(RenderError::Resource("empty image data".to_string()));
        }

        if ImageFormat::from_magic_bytes(&bytes) == Some(ImageFormat::Svg) {
            let tree = usvg::Tree::from_data(&bytes, &usvg::Options::default())
                .map_err(|e| RenderError::Resource(format!("Failed to parse SVG image: {e}")))?;
            let size = tree.size();
            return Ok(Self {
                width: size.width().ceil().max(1.0) as u32,
                height: size.height().ceil().max(1.0) as u32,
                bytes,
                format: ImageFormat::Svg,
            });
        }

        let img = image::load_from_memory(&bytes)
            .map_err(|e| RenderError::Resource(format!("Failed to decode image: {e}")))?;
        let (width, height) = (img.width(), img.height());

        match ImageFormat::from_magic_bytes(&bytes) {
            Some(format) => Ok(Self {
                bytes,
                format,
                width,
                height,
            }),
            None => Ok(Self {
                bytes: encode_png(&img)?,
                format: ImageFormat::Png,
                width,
                height,
            }),
        }
    }

    /// `data:` URI of the encoded bytes.
    #[must_use]
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime(),
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// Bytes in a format every slide package viewer accepts: PNG, JPEG or
    /// GIF as-is, WebP transcoded to PNG, SVG rasterized at `oversample`×
    /// its intrinsic size.
    ///
    /// # Errors
    ///
    /// Returns an error if transcoding or rasterization fails.
    pub fn to_embeddable(&self, oversample: f32) -> RenderResult<(Vec<u8>, ImageFormat)> {
        match self.format {
            ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif => {
                Ok((self.bytes.clone(), self.format))
            }
            ImageFormat::WebP => {
                let img = image::load_from_memory(&self.bytes)
                    .map_err(|e| RenderError::Resource(format!("Failed to decode image: {e}")))?;
                Ok((encode_png(&img)?, ImageFormat::Png))
            }
            ImageFormat::Svg => {
                let svg = std::str::from_utf8(&self.bytes)
                    .map_err(|e| RenderError::Resource(format!("SVG is not UTF-8: {e}")))?;
                let png = crate::raster::rasterize_svg_scaled(svg, oversample)?
                    .encode_png()
                    .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))?;
                Ok((png, ImageFormat::Png))
            }
        }
    }
}

fn encode_png(img: &image::DynamicImage) -> RenderResult<Vec<u8>> {
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))?;
    Ok(out)
}

/// Fetches raw bytes for an image source.
#[async_trait]
pub trait AssetLoader: Send + Sync {
    /// Load the bytes behind `src`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Resource`] if the source cannot be read.
    async fn load(&self, src: &str) -> RenderResult<Vec<u8>>;
}

/// Loads data URIs and local files.
#[derive(Debug, Clone, Default)]
pub struct LocalAssetLoader {
    base_dir: Option<PathBuf>,
}

impl LocalAssetLoader {
    /// Loader resolving relative paths against the working directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader resolving relative paths against `base_dir`.
    #[must_use]
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl AssetLoader for LocalAssetLoader {
    async fn load(&self, src: &str) -> RenderResult<Vec<u8>> {
        let src = src.trim();
        if src.is_empty() {
            return Err(RenderError::Resource("empty image source".to_string()));
        }
        if src.starts_with("data:") {
            return decode_data_uri(src);
        }
        if src.starts_with("http://") || src.starts_with("https://") {
            return Err(RenderError::Resource(format!(
                "remote image not supported by this loader: {src}"
            )));
        }
        let path = self.resolve(src.strip_prefix("file://").unwrap_or(src));
        tokio::fs::read(&path)
            .await
            .map_err(|e| RenderError::Resource(format!("{}: {e}", path.display())))
    }
}

/// Loads `http(s)` URLs and defers everything else to a [`LocalAssetLoader`].
#[cfg(feature = "remote-assets")]
#[derive(Debug, Clone, Default)]
pub struct HttpAssetLoader {
    client: reqwest::Client,
    local: LocalAssetLoader,
}

#[cfg(feature = "remote-assets")]
impl HttpAssetLoader {
    /// Wrap a local loader.
    #[must_use]
    pub fn new(local: LocalAssetLoader) -> Self {
        Self {
            client: reqwest::Client::new(),
            local,
        }
    }
}

#[cfg(feature = "remote-assets")]
#[async_trait]
impl AssetLoader for HttpAssetLoader {
    async fn load(&self, src: &str) -> RenderResult<Vec<u8>> {
        if !(src.starts_with("http://") || src.starts_with("https://")) {
            return self.local.load(src).await;
        }
        let response = self
            .client
            .get(src)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| RenderError::Resource(format!("{src}: {e}")))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RenderError::Resource(format!("{src}: {e}")))?;
        Ok(bytes.to_vec())
    }
}

/// Decode the payload of a `data:` URI.
///
/// # Errors
///
/// Returns [`RenderError::Resource`] if the URI is malformed.
pub fn decode_data_uri(uri: &str) -> RenderResult<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Resource("Not a data URI".to_string()))?;
    let (metadata, payload) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::Resource("Invalid data URI: missing comma".to_string()))?;

    if metadata.contains(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| RenderError::Resource(format!("Failed to decode base64: {e}")))
    } else {
        percent_decode(payload)
    }
}

fn percent_decode(input: &str) -> RenderResult<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input
                .get(i + 1..i + 3)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| RenderError::Resource("Invalid percent escape".to_string()))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// Images resolved for one slide, keyed by source string.
#[derive(Debug, Default)]
pub struct AssetCache {
    entries: HashMap<String, Result<Arc<LoadedImage>, String>>,
}

impl AssetCache {
    /// An empty cache; every lookup fails.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and decode every image source referenced by `elements`.
    ///
    /// Failures are kept, not returned, so that the element that refers to
    /// them can be skipped on its own.
    pub async fn resolve(loader: &dyn AssetLoader, elements: &[Element]) -> Self {
        let mut entries = HashMap::new();
        for element in elements {
            let ElementKind::Image(image) = &element.kind else {
                continue;
            };
            if entries.contains_key(&image.src) {
                continue;
            }
            let loaded = match loader.load(&image.src).await {
                Ok(bytes) => LoadedImage::decode(bytes).map(Arc::new),
                Err(e) => Err(e),
            };
            if let Err(e) = &loaded {
                tracing::debug!(element_id = %element.id, error = %e, "image source unavailable");
            }
            entries.insert(image.src.clone(), loaded.map_err(|e| e.to_string()));
        }
        Self { entries }
    }

    /// Look up a resolved image.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Resource`] if the source failed to load or
    /// was never resolved.
    pub fn get(&self, src: &str) -> RenderResult<Arc<LoadedImage>> {
        match self.entries.get(src) {
            Some(Ok(image)) => Ok(Arc::clone(image)),
            Some(Err(reason)) => Err(RenderError::Resource(reason.clone())),
            None => Err(RenderError::Resource(format!("image not resolved: {src}"))),
        }
    }

    /// Number of distinct sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no sources were resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
