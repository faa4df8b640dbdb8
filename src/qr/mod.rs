//! QR code encoding
//!
//! The encoder is consumed through a single operation, [`Encoder::encode`],
//! which turns payload text into PNG bytes. [`QrEncoder`] is the real
//! implementation; tests and embedders can supply their own.

mod encoder;
mod options;
pub mod verify;

pub use encoder::QrEncoder;
pub use options::{Color, Correction, DEFAULT_MARGIN, DEFAULT_WIDTH, RenderOptions};

use crate::error::Result;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;

/// Encoder output: a square PNG
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// PNG file bytes
    pub png: Bytes,
    /// Width (and height) in pixels
    pub width: u32,
}

impl EncodedImage {
    /// The image as a `data:image/png;base64,` URI.
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// Turns payload text into an image. Fails on unencodable or oversized input.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Encode `text` with the encoder's fixed options.
    async fn encode(&self, text: &str) -> Result<EncodedImage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_wraps_base64_png() {
        let image = EncodedImage {
            png: Bytes::from_static(b"\x89PNG"),
            width: 1,
        };
        assert_eq!(image.data_uri(), "data:image/png;base64,iVBORw==");
    }
}
