//! Texture generation for the averaged image.

use egui::ColorImage;

use crate::util::f64_to_u8;
use octascan_core::AverageImage;

/// Render the averaged cross-section as a min-max normalized grayscale
/// image. Row `y` of the image is depth index `z`.
#[must_use]
pub fn grayscale_image(average: &AverageImage) -> ColorImage {
    let (height, width) = average.dim();
    if width == 0 || height == 0 {
        return ColorImage::new([1, 1], egui::Color32::BLACK);
    }

    let min = average.iter().copied().fold(f64::INFINITY, f64::min);
    let max = average.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if max > min { max - min } else { 1.0 };

    let mut pixels = vec![0u8; width * height * 4];
    for ((z, x), &value) in average.indexed_iter() {
        let normalized = (value - min) / span;
        let gray = f64_to_u8(normalized * 255.0);
        let offset = (z * width + x) * 4;
        pixels[offset..offset + 4].copy_from_slice(&[gray, gray, gray, 255]);
    }

    ColorImage::from_rgba_unmultiplied([width, height], &pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_grayscale_normalization() {
        // Two rows: all-min maps to black, all-max to white.
        let average = Array2::from_shape_fn((2, 3), |(z, _)| if z == 0 { 5.0 } else { 25.0 });
        let image = grayscale_image(&average);
        assert_eq!(image.size, [3, 2]);
        assert_eq!(image.pixels[0].r(), 0);
        // First pixel of the second row.
        assert_eq!(image.pixels[3].r(), 255);
    }

    #[test]
    fn test_constant_image_does_not_divide_by_zero() {
        let average = Array2::from_elem((2, 2), 7.0);
        let image = grayscale_image(&average);
        assert_eq!(image.pixels[0].r(), 0);
    }
}
