#![allow(dead_code)]

use std::io::Cursor;

use edgemark::EdgeMap;
use edgemark::service::{MemoryObjectStore, ObjectLocation, PublicUrl};
use image::{GrayImage, ImageBuffer, ImageFormat, Luma, Rgb, RgbImage};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

pub const TEST_BUCKET: &str = "test-bucket";
pub const TEST_REGION: &str = "us-east-1";

/// Axis-aligned square: top-left corner and side length.
#[derive(Debug, Clone, Copy)]
pub struct Square {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

impl Square {
    pub const fn new(x: u32, y: u32, side: u32) -> Self {
        Self { x, y, side }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.side && y >= self.y && y < self.y + self.side
    }
}

/// White canvas with black squares painted on it.
pub fn squares_image(width: u32, height: u32, squares: &[Square]) -> RgbImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        if squares.iter().any(|s| s.contains(x, y)) {
            BLACK
        } else {
            WHITE
        }
    })
}

pub fn blank_image(width: u32, height: u32) -> RgbImage {
    squares_image(width, height, &[])
}

/// Encode in memory, the way an uploaded file would arrive.
pub fn encode(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, format)
        .expect("Failed to encode test image");
    cursor.into_inner()
}

pub fn png_bytes(img: &RgbImage) -> Vec<u8> {
    encode(img, ImageFormat::Png)
}

/// Edge map with every pixel of the given squares set.
pub fn filled_edge_map(width: u32, height: u32, squares: &[Square]) -> EdgeMap {
    let img = GrayImage::from_fn(width, height, |x, y| {
        if squares.iter().any(|s| s.contains(x, y)) {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    });
    EdgeMap::from_image(img)
}

/// Edge map with only the one-pixel outline of each square set.
pub fn outlined_edge_map(width: u32, height: u32, squares: &[Square]) -> EdgeMap {
    let img = GrayImage::from_fn(width, height, |x, y| {
        let on_outline = squares.iter().any(|s| {
            s.contains(x, y)
                && (x == s.x || y == s.y || x == s.x + s.side - 1 || y == s.y + s.side - 1)
        });
        Luma([if on_outline { 255u8 } else { 0u8 }])
    });
    EdgeMap::from_image(img)
}

pub fn test_urls() -> PublicUrl {
    PublicUrl {
        endpoint: None,
        region: TEST_REGION.to_string(),
    }
}

/// Memory store pre-loaded with one object under `key`.
pub async fn store_with_object(key: &str, bytes: Vec<u8>) -> MemoryObjectStore {
    let store = MemoryObjectStore::new(test_urls());
    store
        .insert(ObjectLocation::new(TEST_BUCKET, key), bytes, "image/png")
        .await;
    store
}

pub fn count_pixels(img: &RgbImage, color: Rgb<u8>) -> usize {
    img.pixels().filter(|p| **p == color).count()
}
