//! Image helpers for the preprocessing pipeline.

use crate::core::errors::BeltError;
use image::{DynamicImage, RgbImage};

/// Decodes raw request bytes into an image, guessing the format from the
/// content.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, BeltError> {
    if bytes.is_empty() {
        return Err(BeltError::decode_msg("empty request body"));
    }
    image::load_from_memory(bytes)
        .map_err(|e| BeltError::decode("bytes are not a recognizable image", e))
}

/// Converts any decoded image to 8-bit RGB.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_a_decode_error() {
        assert!(matches!(
            decode_image(&[]),
            Err(BeltError::Decode { .. })
        ));
    }

    #[test]
    fn truncated_png_is_a_decode_error() {
        // A valid PNG signature followed by nothing.
        let bytes = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(matches!(
            decode_image(&bytes),
            Err(BeltError::Decode { .. })
        ));
    }
}
