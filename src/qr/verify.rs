//! Scan-back verification using rqrr

use crate::error::{Error, Result};
use image::{DynamicImage, RgbaImage};

/// Decode the first symbol found in `image` and return its text.
pub fn decode(image: &RgbaImage) -> Result<String> {
    let gray = DynamicImage::ImageRgba8(image.clone()).to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare(gray);

    let grids = prepared.detect_grids();
    let grid = grids
        .first()
        .ok_or_else(|| Error::Verify("no QR symbol found in rendered image".to_string()))?;

    let (meta, content) = grid
        .decode()
        .map_err(|e| Error::Verify(format!("decode failed: {e:?}")))?;

    tracing::debug!(
        "Verified QR: version={:?}, ecc_level={:?}, length={}",
        meta.version,
        meta.ecc_level,
        content.len()
    );

    Ok(content)
}

/// Check that `image` decodes back to `expected`.
pub fn check(image: &RgbaImage, expected: &str) -> Result<()> {
    let decoded = decode(image)?;
    if decoded == expected {
        Ok(())
    } else {
        Err(Error::Verify(format!(
            "symbol decodes to {} bytes, expected {}",
            decoded.len(),
            expected.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::QrEncoder;

    #[test]
    fn round_trip_through_decoder() {
        let original = "mailto:a@b.com?subject=Hi%20there&body=";
        let image = QrEncoder::new().render(original).unwrap();
        assert_eq!(decode(&image).unwrap(), original);
    }

    #[test]
    fn blank_image_has_no_symbol() {
        let blank = RgbaImage::from_pixel(100, 100, image::Rgba([255, 255, 255, 255]));
        assert!(matches!(decode(&blank), Err(Error::Verify(_))));
    }

    #[test]
    fn mismatch_is_reported() {
        let image = QrEncoder::new().render("one").unwrap();
        assert!(check(&image, "two").is_err());
    }
}
