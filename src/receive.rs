//! Receive-address QR image: provider trait, QR service client and the
//! three-state image slot the dashboard renders.

use crate::error::ImageError;
use crate::http::ResponseExt;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;
use std::sync::Arc;
use url::Url;

#[async_trait]
pub trait ReceiveImageProvider: Send + Sync {
    /// Raw image payload encoding `address`.
    async fn fetch_image(&self, address: &str) -> Result<Vec<u8>, ImageError>;
}

/// An image payload ready to embed: sniffed MIME type plus bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    mime: &'static str,
    bytes: Arc<[u8]>,
}

impl EmbeddedImage {
    /// Convert a fetched payload. An empty, unrecognised or undecodable
    /// payload is a conversion failure.
    pub fn from_payload(bytes: Vec<u8>) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::EmptyPayload);
        }
        let format = image::guess_format(&bytes).map_err(|_| ImageError::UnknownFormat)?;
        let mime = match format {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Bmp => "image/bmp",
            _ => return Err(ImageError::UnknownFormat),
        };
        // A recognised header is not enough, the body has to decode as well.
        image::load_from_memory_with_format(&bytes, format)
            .map_err(|e| ImageError::Undecodable(e.to_string()))?;
        Ok(Self {
            mime,
            bytes: bytes.into(),
        })
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `data:` URL form of the image.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Receive image slot. `Failed` is terminal and distinct from loading.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReceiveImage {
    #[default]
    NotYetAvailable,
    Available(EmbeddedImage),
    Failed,
}

impl ReceiveImage {
    pub fn is_failed(&self) -> bool {
        matches!(self, ReceiveImage::Failed)
    }

    pub fn image(&self) -> Option<&EmbeddedImage> {
        match self {
            ReceiveImage::Available(image) => Some(image),
            _ => None,
        }
    }
}

/// Fetch and convert the QR image for `address`, collapsing every failure
/// into [`ReceiveImage::Failed`].
pub async fn load_receive_image(provider: &dyn ReceiveImageProvider, address: &str) -> ReceiveImage {
    let result = provider
        .fetch_image(address)
        .await
        .and_then(EmbeddedImage::from_payload);
    match result {
        Ok(image) => {
            tracing::debug!("QR code ready ({}, {} bytes)", image.mime(), image.bytes().len());
            ReceiveImage::Available(image)
        }
        Err(e) => {
            tracing::warn!("Could not pre-fetch QR code for {}: {}", address, e);
            ReceiveImage::Failed
        }
    }
}

/// QR images from the goqr.me `create-qr-code` service.
pub struct QrServerProvider {
    client: reqwest::Client,
    base_url: String,
    size_px: u32,
}

impl QrServerProvider {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            size_px: 256,
        }
    }

    /// Request URL for `address`, encoded as a `bitcoin:` URI.
    pub fn request_url(&self, address: &str) -> Result<Url, ImageError> {
        let size = format!("{0}x{0}", self.size_px);
        let data = format!("bitcoin:{}", address);
        Url::parse_with_params(
            &self.base_url,
            &[
                ("size", size.as_str()),
                ("data", data.as_str()),
                ("qzone", "1"),
                ("margin", "0"),
            ],
        )
        .map_err(|e| ImageError::InvalidRequest(e.to_string()))
    }
}

#[async_trait]
impl ReceiveImageProvider for QrServerProvider {
    async fn fetch_image(&self, address: &str) -> Result<Vec<u8>, ImageError> {
        let url = self.request_url(address)?;
        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImageError::RequestFailed(e.to_string()))?
            .check_success()
            .await
            .map_err(ImageError::NotSuccessResponse)?
            .bytes()
            .await
            .map_err(|e| ImageError::RequestFailed(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Smallest valid PNG: 1x1 transparent pixel.
#[cfg(test)]
pub(crate) const PNG_1X1: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];
