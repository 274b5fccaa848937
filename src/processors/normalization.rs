//! Pixel scaling into model-ready float tensors.
//!
//! Normalization is the affine map `v * alpha + beta` per channel, with
//! `alpha = scale / std` and `beta = -mean / std`. The seat-belt model
//! consumes plain 0-255 -> [0,1] scaling in NHWC, but the parameters stay
//! configurable so other classifier heads can reuse this processor.

use crate::core::errors::BeltError;
use crate::core::Tensor4D;
use image::RgbImage;

/// Memory layout of the produced tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    /// (batch, channels, height, width)
    CHW,
    /// (batch, height, width, channels)
    HWC,
}

/// Normalizes RGB images into a batch-1 float tensor.
#[derive(Debug, Clone)]
pub struct NormalizeImage {
    alpha: [f32; 3],
    beta: [f32; 3],
    order: ChannelOrder,
}

impl NormalizeImage {
    /// Creates a normalizer from scale, per-channel mean and standard
    /// deviation, and the output layout.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if `scale` is not positive or any standard
    /// deviation is not positive.
    pub fn new(
        scale: f32,
        mean: [f32; 3],
        std: [f32; 3],
        order: ChannelOrder,
    ) -> Result<Self, BeltError> {
        if scale <= 0.0 {
            return Err(BeltError::config(format!(
                "normalization scale must be greater than 0, got {scale}"
            )));
        }
        for (i, &s) in std.iter().enumerate() {
            if s <= 0.0 {
                return Err(BeltError::config(format!(
                    "standard deviation at index {i} must be greater than 0, got {s}"
                )));
            }
        }

        let mut alpha = [0.0f32; 3];
        let mut beta = [0.0f32; 3];
        for c in 0..3 {
            alpha[c] = scale / std[c];
            beta[c] = -mean[c] / std[c];
        }

        Ok(Self { alpha, beta, order })
    }

    /// Plain 0-255 -> [0,1] scaling in NHWC, the layout the seat-belt
    /// model consumes.
    pub fn unit_scale_hwc() -> Self {
        Self {
            alpha: [1.0 / 255.0; 3],
            beta: [0.0; 3],
            order: ChannelOrder::HWC,
        }
    }

    /// Normalizes a single image into a batch-1 tensor in the configured
    /// layout.
    pub fn normalize_to(&self, img: &RgbImage) -> Result<Tensor4D, BeltError> {
        let (width, height) = img.dimensions();
        let (w, h) = (width as usize, height as usize);
        let mut data = vec![0.0f32; h * w * 3];

        match self.order {
            ChannelOrder::HWC => {
                for y in 0..h {
                    for x in 0..w {
                        let pixel = img.get_pixel(x as u32, y as u32);
                        for c in 0..3 {
                            data[(y * w + x) * 3 + c] =
                                pixel[c] as f32 * self.alpha[c] + self.beta[c];
                        }
                    }
                }
                Tensor4D::from_shape_vec((1, h, w, 3), data).map_err(|e| {
                    BeltError::shape_mismatch(format!(
                        "failed to assemble {h}x{w} HWC tensor: {e}"
                    ))
                })
            }
            ChannelOrder::CHW => {
                for y in 0..h {
                    for x in 0..w {
                        let pixel = img.get_pixel(x as u32, y as u32);
                        for c in 0..3 {
                            data[c * h * w + y * w + x] =
                                pixel[c] as f32 * self.alpha[c] + self.beta[c];
                        }
                    }
                }
                Tensor4D::from_shape_vec((1, 3, h, w), data).map_err(|e| {
                    BeltError::shape_mismatch(format!(
                        "failed to assemble {h}x{w} CHW tensor: {e}"
                    ))
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn unit_scale_maps_bytes_into_unit_interval() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 128]));
        img.put_pixel(1, 0, Rgb([51, 102, 204]));

        let tensor = NormalizeImage::unit_scale_hwc().normalize_to(&img).unwrap();
        assert_eq!(tensor.shape(), &[1, 1, 2, 3]);
        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < 1e-6);
        assert!((tensor[[0, 0, 0, 1]] - 0.0).abs() < 1e-6);
        assert!((tensor[[0, 0, 0, 2]] - 128.0 / 255.0).abs() < 1e-6);
        assert!((tensor[[0, 0, 1, 0]] - 51.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn chw_layout_groups_by_channel() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));

        let norm = NormalizeImage::new(1.0 / 255.0, [0.0; 3], [1.0; 3], ChannelOrder::CHW).unwrap();
        let tensor = norm.normalize_to(&img).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 1, 2]);
        // Red channel plane holds both pixels' red values.
        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < 1e-6);
        assert!((tensor[[0, 0, 0, 1]] - 0.0).abs() < 1e-6);
        assert!((tensor[[0, 1, 0, 1]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn mean_and_std_shift_the_output() {
        let mut img = RgbImage::new(1, 1);
        img.put_pixel(0, 0, Rgb([255, 255, 255]));

        let norm = NormalizeImage::new(
            1.0 / 255.0,
            [0.485, 0.456, 0.406],
            [0.229, 0.224, 0.225],
            ChannelOrder::HWC,
        )
        .unwrap();
        let tensor = norm.normalize_to(&img).unwrap();
        assert!((tensor[[0, 0, 0, 0]] - (1.0 - 0.485) / 0.229).abs() < 1e-4);
    }

    #[test]
    fn non_positive_parameters_are_rejected() {
        assert!(NormalizeImage::new(0.0, [0.0; 3], [1.0; 3], ChannelOrder::HWC).is_err());
        assert!(NormalizeImage::new(1.0, [0.0; 3], [1.0, 0.0, 1.0], ChannelOrder::HWC).is_err());
    }
}
