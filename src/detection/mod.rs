pub mod annotations;
pub mod codec;
pub mod contours;
pub mod edges;
pub mod overlay;
pub mod preprocessing;

use crate::error::ProcessingError;

/// Tunable constants of the detection pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionParams {
    /// Odd size of the square Gaussian kernel.
    pub blur_kernel_size: usize,
    /// Explicit sigma; `None` derives it from the kernel size.
    pub blur_sigma: Option<f32>,
    pub low_threshold: f32,
    pub high_threshold: f32,
    /// Contours must enclose strictly more than this many square pixels.
    pub min_contour_area: f64,
    pub highlight: [u8; 3],
    pub stroke_thickness: u32,
    pub jpeg_quality: u8,
}

impl DetectionParams {
    pub fn new() -> Self {
        Self {
            blur_kernel_size: 5,
            blur_sigma: None,
            low_threshold: 50.0,
            high_threshold: 150.0,
            min_contour_area: 100.0,
            highlight: [0, 255, 0],
            stroke_thickness: 2,
            jpeg_quality: 95,
        }
    }

    pub fn sigma(&self) -> f32 {
        self.blur_sigma
            .unwrap_or_else(|| preprocessing::sigma_for_kernel(self.blur_kernel_size))
    }

    pub fn validate(&self) -> Result<(), ProcessingError> {
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(ProcessingError::invalid_input(format!(
                "blur kernel size must be odd, got {}",
                self.blur_kernel_size
            )));
        }
        if !(self.sigma() > 0.0) {
            return Err(ProcessingError::invalid_input("blur sigma must be positive"));
        }
        if self.low_threshold > self.high_threshold {
            return Err(ProcessingError::invalid_input(format!(
                "low threshold {} exceeds high threshold {}",
                self.low_threshold, self.high_threshold
            )));
        }
        if self.stroke_thickness == 0 {
            return Err(ProcessingError::invalid_input("stroke thickness must be at least 1"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ProcessingError::invalid_input(format!(
                "JPEG quality must be in 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self::new()
    }
}
