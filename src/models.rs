use image::{GrayImage, Luma};
use imageproc::point::Point;
use serde::{Deserialize, Serialize};

/// Binary single-channel edge map. Edge pixels are 255, everything else 0.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMap {
    image: GrayImage,
}

impl EdgeMap {
    pub const EDGE: u8 = 255;

    /// Wrap an arbitrary grayscale image, treating every non-zero pixel as an edge.
    pub fn from_image(mut image: GrayImage) -> Self {
        for pixel in image.pixels_mut() {
            if pixel[0] != 0 {
                *pixel = Luma([Self::EDGE]);
            }
        }
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_edge(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel(x, y)[0] == Self::EDGE
    }

    pub fn edge_count(&self) -> usize {
        self.image.pixels().filter(|p| p[0] == Self::EDGE).count()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    pub fn into_image(self) -> GrayImage {
        self.image
    }
}

/// One traced boundary. Points are kept in trace order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace area of the closed polygon through the points.
    /// Positive when the points run clockwise in image coordinates (y down).
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }

        let mut twice_area: i64 = 0;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            twice_area += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
        }
        twice_area as f64 / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn coordinates(&self) -> Vec<[i32; 2]> {
        self.points.iter().map(|p| [p.x, p.y]).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationType {
    Edge,
}

/// Structured description of one surviving contour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AnnotationType,
    pub coordinates: Vec<[i32; 2]>,
    /// Placeholder derived from discovery order; not a detection-quality score.
    pub confidence: f64,
    pub label: String,
}

/// Output of one successful `process` call.
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// JPEG-encoded overlay image.
    pub image: Vec<u8>,
    pub annotations: Vec<Annotation>,
}
