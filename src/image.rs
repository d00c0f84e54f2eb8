//! Image inputs for multimodal invocations.
//!
//! An [`ImageInput`] is a base64 payload plus MIME type, ready to hand to any
//! model backend. Inputs can be built from raw bytes, a local file, or a
//! remote URL; [`ImageSource`] covers the common case where callers hold a
//! string that may name either a path or a URL.

use crate::error::AdapterError;
use base64::Engine;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Base64-encoded image ready to send to a model backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes, sniffing the format from the
    /// magic bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AdapterError> {
        let format = image::guess_format(bytes).map_err(|e| AdapterError::Image {
            path: PathBuf::new(),
            message: format!("Unrecognized image format: {e}"),
        })?;

        Ok(Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type_for(format).to_string(),
        })
    }

    /// Read and encode an image from a local file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AdapterError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| AdapterError::Image {
            path: path.to_path_buf(),
            message: format!("Failed to read image: {e}"),
        })?;
        Self::from_bytes(&bytes).map_err(|e| match e {
            AdapterError::Image { message, .. } => AdapterError::Image {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

fn media_type_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Png => "image/png",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Gif => "image/gif",
        other => {
            tracing::warn!("Unmapped image format {other:?}, defaulting to image/jpeg");
            "image/jpeg"
        }
    }
}

/// Where an image comes from: a local path or a remote URL.
///
/// Mirrors the common caller convention of passing a single string that names
/// either location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Path(PathBuf),
    Url(String),
}

impl ImageSource {
    /// Classify a string as a URL or a local path.
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.to_string())
        } else {
            Self::Path(PathBuf::from(value))
        }
    }

    /// Resolve the source into an encoded [`ImageInput`].
    pub async fn resolve(&self, fetcher: &ImageFetcher) -> Result<ImageInput, AdapterError> {
        match self {
            Self::Path(path) => ImageInput::from_path(path).await,
            Self::Url(url) => fetcher.fetch(url).await,
        }
    }
}

/// HTTP client for fetching remote images.
pub struct ImageFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl ImageFetcher {
    /// Create a fetcher with the default 30 s request timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a fetcher with an explicit request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// The per-request timeout applied to fetches.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Download an image and encode it for model input.
    pub async fn fetch(&self, url: &str) -> Result<ImageInput, AdapterError> {
        let resp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AdapterError::Fetch {
                url: url.to_string(),
                message: format!("Request failed: {e}"),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AdapterError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {status}"),
            });
        }

        let bytes = resp.bytes().await.map_err(|e| AdapterError::Fetch {
            url: url.to_string(),
            message: format!("Failed to read body: {e}"),
        })?;

        ImageInput::from_bytes(&bytes).map_err(|e| AdapterError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

impl Default for ImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}
