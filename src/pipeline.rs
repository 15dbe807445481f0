use std::path::{Path, PathBuf};

use anyhow::Result;
use image::{EncodableLayout, ImageBuffer, PixelWithColorType, Rgb, RgbImage};
use tracing::{debug, info, warn};

use crate::detection::{
    DetectionParams, annotations, codec, contours, edges, overlay, preprocessing,
};
use crate::error::ProcessingError;
use crate::models::{Annotation, Contour, EdgeMap, ProcessingResult};

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

/// Context shared by all pipeline stages
#[derive(Clone, Debug, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

/// Intermediate grids of a single run, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct StageOutputs {
    pub grayscale: image::GrayImage,
    pub blurred: image::GrayImage,
    pub edges: EdgeMap,
    /// Every external contour, before area filtering.
    pub contours: Vec<Contour>,
}

/// Decode → preprocess → edge-detect → contours → annotations → overlay → encode.
///
/// Stateless apart from its parameters; one instance can serve any number of images.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    params: DetectionParams,
    context: PipelineContext,
}

impl Pipeline {
    pub fn new(params: DetectionParams) -> Self {
        Self {
            params,
            context: PipelineContext::default(),
        }
    }

    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig { output_dir });

        Ok(self)
    }

    /// Turn an encoded image into an annotated JPEG plus its annotation list.
    pub fn process(&self, image_bytes: &[u8]) -> Result<ProcessingResult, ProcessingError> {
        self.params.validate()?;

        let input = codec::decode(image_bytes)?;
        info!(width = input.width(), height = input.height(), "decoded image");

        let (overlay, annotations) = self.run(&input);

        let image = codec::encode_jpeg(&overlay, self.params.jpeg_quality)?;
        info!(
            bytes = image.len(),
            annotations = annotations.len(),
            "encoded overlay"
        );

        Ok(ProcessingResult { image, annotations })
    }

    /// Run every stage between decoding and encoding on an RGB grid.
    /// The input is left untouched; the overlay is a fresh copy.
    pub fn run(&self, input: &RgbImage) -> (RgbImage, Vec<Annotation>) {
        self.save_debug_output(0, "Input", input);

        let stages = self.run_stages(input);
        let total = stages.contours.len();
        let kept = contours::filter_by_area(stages.contours, self.params.min_contour_area);
        debug!(
            total,
            kept = kept.len(),
            min_area = self.params.min_contour_area,
            "filtered contours by area"
        );

        let annotations = annotations::build_annotations(&kept);

        let overlay = overlay::draw_contours(
            input,
            &kept,
            Rgb(self.params.highlight),
            self.params.stroke_thickness,
        );
        self.save_debug_output(4, "Overlay", &overlay);

        (overlay, annotations)
    }

    /// Contours that survive the area filter, without drawing or encoding anything.
    pub fn detect_contours(&self, input: &RgbImage) -> Vec<Contour> {
        let stages = self.run_stages(input);
        contours::filter_by_area(stages.contours, self.params.min_contour_area)
    }

    /// Stop after contour extraction and hand back every intermediate grid.
    pub fn run_stages(&self, input: &RgbImage) -> StageOutputs {
        let grayscale = preprocessing::to_grayscale(input);
        self.save_debug_output(1, "Grayscale", &grayscale);

        let blurred = preprocessing::apply_blur(
            &grayscale,
            self.params.blur_kernel_size,
            self.params.sigma(),
        );
        self.save_debug_output(2, "Gaussian Blur", &blurred);

        let edges = edges::detect_edges(
            &blurred,
            self.params.low_threshold,
            self.params.high_threshold,
        );
        debug!(edge_pixels = edges.edge_count(), "detected edges");
        self.save_debug_output(3, "Edge Detection", edges.as_image());

        let contours = contours::find_external_contours(&edges);
        debug!(count = contours.len(), "traced external contours");

        StageOutputs {
            grayscale,
            blurred,
            edges,
            contours,
        }
    }

    /// Debug dumps never fail the run; problems are only logged.
    fn save_debug_output<P>(&self, step_index: usize, step_name: &str, image: &ImageBuffer<P, Vec<P::Subpixel>>)
    where
        P: PixelWithColorType,
        [P::Subpixel]: EncodableLayout,
    {
        let Some(debug_config) = &self.context.debug else {
            return;
        };

        if let Err(e) = write_debug_image(&debug_config.output_dir, step_index, step_name, image) {
            warn!("Failed to save debug output for {}: {:#}", step_name, e);
        }
    }
}

fn write_debug_image<P>(
    output_dir: &Path,
    step_index: usize,
    step_name: &str,
    image: &ImageBuffer<P, Vec<P::Subpixel>>,
) -> Result<()>
where
    P: PixelWithColorType,
    [P::Subpixel]: EncodableLayout,
{
    let step_dir_name = format!(
        "{:02}_{}",
        step_index,
        step_name.to_lowercase().replace(' ', "_")
    );
    let step_dir = output_dir.join(&step_dir_name);
    std::fs::create_dir_all(&step_dir)?;

    let output_path = step_dir.join("01.png");
    image
        .save(&output_path)
        .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;

    debug!("Debug: saved {}/01.png", step_dir_name);
    Ok(())
}
