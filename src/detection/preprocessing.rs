use image::{GrayImage, ImageBuffer, Luma, RgbImage};
use imageproc::definitions::Image;
use imageproc::filter::separable_filter_equal;

/// Convert to intensity with fixed-point BT.601 luma weights:
/// `(299 R + 587 G + 114 B + 500) / 1000`.
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b] = img.get_pixel(x, y).0;
        let luma = (299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000;
        Luma([luma as u8])
    })
}

/// Sigma used when none is configured: `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
/// A 5-tap kernel gets sigma 1.1.
pub fn sigma_for_kernel(kernel_size: usize) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian weights of odd length `size`.
pub fn gaussian_kernel(size: usize, sigma: f32) -> Vec<f32> {
    let radius = (size / 2) as f32;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - radius;
            (-(d * d) / denom).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Separable Gaussian blur with an explicit odd kernel size.
/// Borders replicate the nearest edge pixel. Both passes run on an `f32` copy so the
/// result is rounded once, to nearest.
pub fn apply_blur(img: &GrayImage, kernel_size: usize, sigma: f32) -> GrayImage {
    let kernel = gaussian_kernel(kernel_size, sigma);
    let intensity: Image<Luma<f32>> =
        ImageBuffer::from_fn(img.width(), img.height(), |x, y| Luma([img.get_pixel(x, y)[0] as f32]));

    let blurred = separable_filter_equal::<Luma<f32>, f32>(&intensity, &kernel);

    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        Luma([blurred.get_pixel(x, y)[0].round().clamp(0.0, 255.0) as u8])
    })
}
