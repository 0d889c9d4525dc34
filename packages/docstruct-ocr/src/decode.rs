//! Image decoding shared by every engine.
//!
//! Engines never see raw upload bytes directly: input is decoded here first so an
//! unreadable file fails the same way regardless of which engine is configured.
use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use crate::engine::OcrError;

/// Decodes encoded image bytes, guessing the format from the content.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, OcrError> {
    let image = image::load_from_memory(bytes)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(OcrError::EmptyImage);
    }
    Ok(image)
}

/// Re-encodes a decoded image as PNG.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, OcrError> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn sample_image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 4, Rgb([255, 255, 255])))
    }

    #[test]
    fn png_bytes_decode_back_to_same_dimensions() {
        let bytes = encode_png(&sample_image()).unwrap();
        let decoded = decode_image(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 4));
    }

    #[test]
    fn bmp_input_is_accepted() {
        let mut buf = Cursor::new(Vec::new());
        sample_image().write_to(&mut buf, ImageFormat::Bmp).unwrap();
        assert!(decode_image(buf.get_ref()).is_ok());
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, OcrError::Decode(_)));
        assert!(err.to_string().starts_with("cannot decode image"));
    }
}
