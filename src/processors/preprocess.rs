//! Decoding and geometry coercion of uploaded images.
//!
//! This is where format and shape edge cases are handled: any color mode
//! the decoder understands is coerced to RGB, any source size is resampled
//! to the model's declared geometry, and the produced tensor is checked
//! against that geometry before it can reach the model layer.

use crate::core::errors::BeltError;
use crate::core::traits::InputShape;
use crate::core::Tensor4D;
use crate::processors::normalization::NormalizeImage;
use crate::utils::{decode_image, dynamic_to_rgb};
use image::imageops::{self, FilterType};

/// Turns raw upload bytes into the model's input tensor.
///
/// Resampling uses a fixed `Lanczos3` filter, so identical bytes always
/// produce identical tensors.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    filter: FilterType,
    normalize: NormalizeImage,
}

impl ImagePreprocessor {
    /// Creates a preprocessor with the pipeline's fixed resampling and
    /// scaling policy.
    pub fn new() -> Self {
        Self {
            filter: FilterType::Lanczos3,
            normalize: NormalizeImage::unit_scale_hwc(),
        }
    }

    /// Prepares one uploaded image for inference.
    ///
    /// Decodes `raw_bytes`, coerces the color mode to RGB (grayscale and
    /// alpha-bearing sources are converted, never rejected), resizes to
    /// the target geometry, scales pixels into [0,1], and prepends the
    /// batch dimension.
    ///
    /// # Errors
    ///
    /// * `Decode` when the bytes are not a recognizable image.
    /// * `ShapeMismatch` when `target` has non-positive or non-RGB
    ///   dimensions, or when the produced tensor would not match it.
    pub fn prepare(&self, raw_bytes: &[u8], target: InputShape) -> Result<Tensor4D, BeltError> {
        target.validate()?;

        let img = decode_image(raw_bytes)?;
        let rgb = dynamic_to_rgb(img);
        tracing::debug!(
            source_width = rgb.width(),
            source_height = rgb.height(),
            target = %target,
            "preprocessing image"
        );

        let resized = imageops::resize(&rgb, target.width, target.height, self.filter);
        let tensor = self.normalize.normalize_to(&resized)?;

        self.check_output_shape(&tensor, target)?;
        Ok(tensor)
    }

    // Guards the model layer from silent shape drift: a tensor whose
    // flattened element count disagrees with the declared input must fail
    // here, descriptively, not as an opaque numeric error downstream.
    fn check_output_shape(&self, tensor: &Tensor4D, target: InputShape) -> Result<(), BeltError> {
        let expected = [
            1,
            target.height as usize,
            target.width as usize,
            target.channels as usize,
        ];
        if tensor.shape() != &expected {
            return Err(BeltError::shape_mismatch(format!(
                "prepared tensor has shape {:?} ({} elements) but the model expects {:?} ({} elements)",
                tensor.shape(),
                tensor.len(),
                expected,
                target.element_count()
            )));
        }
        Ok(())
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::Stage;
    use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    const TARGET: InputShape = InputShape::new(150, 150, 3);

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .expect("in-memory png encode");
        buf
    }

    #[test]
    fn rgba_input_converges_to_target_shape() {
        let bytes = png_bytes(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            300,
            200,
            Rgba([10, 20, 30, 255]),
        )));
        let tensor = ImagePreprocessor::new().prepare(&bytes, TARGET).unwrap();
        assert_eq!(tensor.shape(), &[1, 150, 150, 3]);
    }

    #[test]
    fn grayscale_input_converges_to_target_shape() {
        let bytes = png_bytes(DynamicImage::ImageLuma8(GrayImage::from_pixel(
            64,
            64,
            Luma([77]),
        )));
        let tensor = ImagePreprocessor::new().prepare(&bytes, TARGET).unwrap();
        assert_eq!(tensor.shape(), &[1, 150, 150, 3]);
        // Gray replicates across the three channels.
        let v = 77.0 / 255.0;
        assert!((tensor[[0, 10, 10, 0]] - v).abs() < 1e-6);
        assert!((tensor[[0, 10, 10, 1]] - v).abs() < 1e-6);
        assert!((tensor[[0, 10, 10, 2]] - v).abs() < 1e-6);
    }

    #[test]
    fn rgb_input_is_scaled_into_unit_interval() {
        let bytes = png_bytes(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            150,
            150,
            Rgb([255, 0, 128]),
        )));
        let tensor = ImagePreprocessor::new().prepare(&bytes, TARGET).unwrap();
        assert_eq!(tensor.shape(), &[1, 150, 150, 3]);
        assert!((tensor[[0, 75, 75, 0]] - 1.0).abs() < 1e-6);
        assert!((tensor[[0, 75, 75, 1]] - 0.0).abs() < 1e-6);
        assert!((tensor[[0, 75, 75, 2]] - 128.0 / 255.0).abs() < 1e-6);
        assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn empty_bytes_fail_with_decode_error() {
        let err = ImagePreprocessor::new().prepare(&[], TARGET).unwrap_err();
        assert!(matches!(err, BeltError::Decode { .. }));
        assert_eq!(err.stage(), Stage::Preprocess);
    }

    #[test]
    fn garbage_bytes_fail_with_decode_error() {
        let err = ImagePreprocessor::new()
            .prepare(b"definitely not an image", TARGET)
            .unwrap_err();
        assert!(matches!(err, BeltError::Decode { .. }));
    }

    #[test]
    fn contradictory_target_shape_is_rejected_up_front() {
        let bytes = png_bytes(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            8,
            8,
            Rgb([1, 2, 3]),
        )));
        let preprocessor = ImagePreprocessor::new();

        let err = preprocessor
            .prepare(&bytes, InputShape::new(0, 150, 3))
            .unwrap_err();
        assert!(matches!(err, BeltError::ShapeMismatch { .. }));

        let err = preprocessor
            .prepare(&bytes, InputShape::new(150, 150, 4))
            .unwrap_err();
        assert!(matches!(err, BeltError::ShapeMismatch { .. }));
    }

    #[test]
    fn identical_bytes_produce_identical_tensors() {
        let mut img = RgbImage::new(97, 41);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]);
        }
        let bytes = png_bytes(DynamicImage::ImageRgb8(img));

        let preprocessor = ImagePreprocessor::new();
        let first = preprocessor.prepare(&bytes, TARGET).unwrap();
        let second = preprocessor.prepare(&bytes, TARGET).unwrap();
        assert_eq!(first, second);
    }
}
