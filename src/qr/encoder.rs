//! QR code encoder

use crate::error::{Error, Result};
use crate::qr::{EncodedImage, Encoder, RenderOptions, verify};
use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use qrcode::QrCode;
use std::io::Cursor;

/// QR code encoder backed by the `qrcode` crate, producing PNG output
#[derive(Debug, Clone, Default)]
pub struct QrEncoder {
    options: RenderOptions,
}

impl QrEncoder {
    /// Create a new encoder with default options (300px, 2 module margin, black on white)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new encoder with specific rendering options
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Options used for every encode
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render text into a raster image without PNG-encoding it
    pub fn render(&self, text: &str) -> Result<RgbaImage> {
        let code =
            QrCode::with_error_correction_level(text.as_bytes(), self.options.correction.into())?;

        let modules = code.width() as u32;
        let total = modules + 2 * self.options.margin;
        // Never go below one pixel per module.
        let size = self.options.width.max(total);
        let margin = self.options.margin;
        let dark = Rgba(self.options.dark.0);
        let light = Rgba(self.options.light.0);

        let image = RgbaImage::from_fn(size, size, |px, py| {
            let mx = (px as u64 * total as u64 / size as u64) as u32;
            let my = (py as u64 * total as u64 / size as u64) as u32;
            let inside = mx >= margin && my >= margin && mx < margin + modules && my < margin + modules;
            if inside && code[((mx - margin) as usize, (my - margin) as usize)] == qrcode::Color::Dark {
                dark
            } else {
                light
            }
        });

        tracing::trace!(modules, size, "rendered QR symbol");
        Ok(image)
    }

    /// Encode text into a PNG, synchronously
    pub fn encode_blocking(&self, text: &str) -> Result<EncodedImage> {
        let image = self.render(text)?;

        if self.options.verify {
            verify::check(&image, text)?;
        }

        let width = image.width();
        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image).write_to(&mut png, ImageFormat::Png)?;

        Ok(EncodedImage {
            png: Bytes::from(png.into_inner()),
            width,
        })
    }
}

#[async_trait]
impl Encoder for QrEncoder {
    async fn encode(&self, text: &str) -> Result<EncodedImage> {
        let encoder = self.clone();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || encoder.encode_blocking(&text))
            .await
            .map_err(|e| Error::Other(format!("Encoder task failed: {e}")))?
    }
}
