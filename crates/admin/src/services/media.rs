//! Image ingestion.
//!
//! Images arrive either as a pasted URL or as an uploaded file. URLs are checked
//! and kept as-is. Files are checked by declared MIME type, size and leading
//! signature bytes, then decoded and re-encoded as WebP under the media directory
//! with a generated name. Images larger than [`MAX_IMAGE_DIMENSION`] on either edge
//! are scaled down first.

use std::io::Cursor;
use std::path::PathBuf;

use image::DynamicImage;
use image::imageops::FilterType;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// Upload size ceiling when none is configured (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Longest edge of a stored image, in pixels.
pub const MAX_IMAGE_DIMENSION: u32 = 2560;

/// Path suffixes accepted for pasted image URLs.
pub const ALLOWED_URL_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Errors from image ingestion.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("not a valid http(s) URL: {0}")]
    InvalidUrl(String),

    #[error("URL must end in one of: {}", ALLOWED_URL_EXTENSIONS.join(", "))]
    UnsupportedExtension,

    #[error("unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("file is {size} bytes, the limit is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("file is empty")]
    Empty,

    #[error("image conversion failed: {0}")]
    Conversion(String),

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageFormat {
    pub const ALL: [Self; 4] = [Self::Jpeg, Self::Png, Self::Gif, Self::Webp];

    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    const fn codec(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::Gif => image::ImageFormat::Gif,
            Self::Webp => image::ImageFormat::WebP,
        }
    }

    /// Parse a MIME type from the allow-list. Parameters (`; charset=...`) are ignored.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        Self::ALL
            .into_iter()
            .find(|f| f.mime().eq_ignore_ascii_case(essence))
    }

    /// Detect the format from the file signature.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.get(..4) == Some(b"RIFF".as_slice())
            && bytes.get(8..12) == Some(b"WEBP".as_slice())
        {
            Some(Self::Webp)
        } else {
            None
        }
    }
}

/// An image to ingest.
#[derive(Debug, Clone)]
pub enum ImageInput {
    /// A pasted link.
    Url(String),
    /// An uploaded file with its declared MIME type.
    File {
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
}

/// Check a pasted image URL.
///
/// # Errors
///
/// Returns `MediaError::InvalidUrl` for anything but an absolute http(s) URL and
/// `MediaError::UnsupportedExtension` when the path does not end in an image suffix.
pub fn validate_image_url(raw: &str) -> Result<Url, MediaError> {
    let url = Url::parse(raw.trim()).map_err(|_| MediaError::InvalidUrl(raw.to_owned()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(MediaError::InvalidUrl(raw.to_owned()));
    }

    let path = url.path().to_ascii_lowercase();
    let has_image_suffix = path
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_URL_EXTENSIONS.contains(&ext));
    if !has_image_suffix {
        return Err(MediaError::UnsupportedExtension);
    }
    Ok(url)
}

/// Check an uploaded file, returning its format.
///
/// # Errors
///
/// Returns `MediaError::TooLarge` above `max_bytes`, `MediaError::Empty` for no data,
/// and `MediaError::UnsupportedType` when the declared type is not allowed or the
/// content does not match it.
pub fn validate_upload(
    content_type: Option<&str>,
    bytes: &[u8],
    max_bytes: usize,
) -> Result<ImageFormat, MediaError> {
    if bytes.len() > max_bytes {
        return Err(MediaError::TooLarge {
            size: bytes.len(),
            max: max_bytes,
        });
    }
    if bytes.is_empty() {
        return Err(MediaError::Empty);
    }

    let declared = content_type.unwrap_or("application/octet-stream");
    let format = ImageFormat::from_mime(declared)
        .ok_or_else(|| MediaError::UnsupportedType(declared.to_owned()))?;
    if ImageFormat::sniff(bytes) != Some(format) {
        return Err(MediaError::UnsupportedType(format!(
            "content does not match {declared}"
        )));
    }
    Ok(format)
}

/// Decode an accepted upload and re-encode it as WebP.
///
/// # Errors
///
/// Returns `MediaError::UnsupportedType` when the bytes do not decode as `format`
/// and `MediaError::Conversion` when encoding fails.
pub fn convert_to_webp(bytes: &[u8], format: ImageFormat) -> Result<Vec<u8>, MediaError> {
    let decoded = image::load_from_memory_with_format(bytes, format.codec()).map_err(|e| {
        MediaError::UnsupportedType(format!("{} could not be decoded: {e}", format.mime()))
    })?;
    let decoded = if decoded.width() > MAX_IMAGE_DIMENSION || decoded.height() > MAX_IMAGE_DIMENSION
    {
        decoded.resize(MAX_IMAGE_DIMENSION, MAX_IMAGE_DIMENSION, FilterType::Lanczos3)
    } else {
        decoded
    };

    let rgba = DynamicImage::ImageRgba8(decoded.to_rgba8());
    let mut out = Cursor::new(Vec::new());
    rgba.write_to(&mut out, image::ImageFormat::WebP)
        .map_err(|e| MediaError::Conversion(e.to_string()))?;
    Ok(out.into_inner())
}

/// Stores accepted images on disk and hands out their public URLs.
#[derive(Debug, Clone)]
pub struct MediaStore {
    dir: PathBuf,
    base_url: String,
    max_bytes: usize,
}

impl MediaStore {
    #[must_use]
    pub fn new(dir: PathBuf, base_url: String, max_bytes: usize) -> Self {
        Self {
            dir,
            base_url: base_url.trim_end_matches('/').to_owned(),
            max_bytes,
        }
    }

    #[must_use]
    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Validate `input` and return the URL to reference it by.
    ///
    /// Nothing is written unless validation passes.
    ///
    /// # Errors
    ///
    /// Returns the validation error, or `MediaError::Io` if the file cannot be written.
    pub async fn ingest(&self, input: ImageInput) -> Result<String, MediaError> {
        match input {
            ImageInput::Url(raw) => Ok(validate_image_url(&raw)?.to_string()),
            ImageInput::File {
                content_type,
                bytes,
            } => {
                let format = validate_upload(content_type.as_deref(), &bytes, self.max_bytes)?;
                let original_size = bytes.len();
                let webp = tokio::task::spawn_blocking(move || convert_to_webp(&bytes, format))
                    .await
                    .map_err(|e| MediaError::Conversion(e.to_string()))??;
                let name = format!("{}.webp", Uuid::new_v4().simple());

                tokio::fs::create_dir_all(&self.dir).await?;
                tokio::fs::write(self.dir.join(&name), &webp).await?;

                tracing::info!(
                    file = %name,
                    original_size,
                    size = webp.len(),
                    from = format.mime(),
                    "Image stored"
                );
                Ok(format!("{}/{name}", self.base_url))
            }
        }
    }

    /// Delete a file stored by [`MediaStore::ingest`], given its URL.
    ///
    /// URLs outside this store (pasted links) are left alone. Failures are logged.
    pub async fn discard(&self, url: &str) {
        let Some(name) = url
            .strip_prefix(self.base_url.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
        else {
            return;
        };

        if let Err(e) = tokio::fs::remove_file(self.dir.join(name)).await {
            tracing::warn!(file = %name, error = %e, "Failed to remove discarded image");
        } else {
            tracing::info!(file = %name, "Discarded image");
        }
    }
}

/// An ordered list of image URLs (an entity's gallery).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageGallery {
    images: Vec<String>,
}

impl ImageGallery {
    #[must_use]
    pub const fn new(images: Vec<String>) -> Self {
        Self { images }
    }

    /// Ingest `input` and append its URL. On error the list is left as it was.
    ///
    /// # Errors
    ///
    /// Returns the [`MediaError`] from [`MediaStore::ingest`].
    pub async fn add(&mut self, store: &MediaStore, input: ImageInput) -> Result<&str, MediaError> {
        let url = store.ingest(input).await?;
        self.images.push(url);
        Ok(self.images.last().map_or("", String::as_str))
    }

    /// Remove the image at `index`, if present.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    #[must_use]
    pub fn images(&self) -> &[String] {
        &self.images
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.images
    }
}
