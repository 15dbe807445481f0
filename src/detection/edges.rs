use image::{GrayImage, Luma};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

use crate::models::EdgeMap;

// tan(22.5°) in Q15 fixed point.
const CANNY_SHIFT: u32 = 15;
const TG22: i64 = 13573;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    None,
    Weak,
    Strong,
}

/// Canny-style edge detection on an already smoothed grid.
///
/// Gradient magnitude is the L1 norm of the 3x3 Sobel responses. After non-maximum
/// suppression along the quantized gradient direction, pixels above `high_threshold`
/// seed edges and pixels above `low_threshold` are kept only when 8-connected to a seed.
/// No extra smoothing is applied here.
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> EdgeMap {
    let (width, height) = img.dimensions();
    let w = width as usize;
    let h = height as usize;

    let gx = horizontal_sobel(img);
    let gy = vertical_sobel(img);

    let magnitude: Vec<i32> = gx
        .pixels()
        .zip(gy.pixels())
        .map(|(dx, dy)| (dx[0] as i32).abs() + (dy[0] as i32).abs())
        .collect();

    let mag_at = |x: i64, y: i64| -> i32 {
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            0
        } else {
            magnitude[y as usize * w + x as usize]
        }
    };

    let mut candidates = vec![Candidate::None; w * h];
    let mut stack = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let m = magnitude[y * w + x];
            if m as f32 <= low_threshold {
                continue;
            }

            let dx = gx.get_pixel(x as u32, y as u32)[0] as i64;
            let dy = gy.get_pixel(x as u32, y as u32)[0] as i64;
            let (xi, yi) = (x as i64, y as i64);

            let ax = dx.abs();
            let ay = dy.abs() << CANNY_SHIFT;
            let tg22x = ax * TG22;

            let is_maximum = if ay < tg22x {
                m > mag_at(xi - 1, yi) && m >= mag_at(xi + 1, yi)
            } else {
                let tg67x = tg22x + (ax << (CANNY_SHIFT + 1));
                if ay > tg67x {
                    m > mag_at(xi, yi - 1) && m >= mag_at(xi, yi + 1)
                } else {
                    let s = if (dx < 0) != (dy < 0) { -1 } else { 1 };
                    m > mag_at(xi - s, yi - 1) && m > mag_at(xi + s, yi + 1)
                }
            };

            if !is_maximum {
                continue;
            }

            if m as f32 > high_threshold {
                candidates[y * w + x] = Candidate::Strong;
                stack.push((x, y));
            } else {
                candidates[y * w + x] = Candidate::Weak;
            }
        }
    }

    // Hysteresis: grow from strong pixels through weak ones.
    let mut edges = GrayImage::new(width, height);
    for &(x, y) in &stack {
        edges.put_pixel(x as u32, y as u32, Luma([EdgeMap::EDGE]));
    }

    while let Some((x, y)) = stack.pop() {
        for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                let idx = ny * w + nx;
                if candidates[idx] == Candidate::Weak {
                    candidates[idx] = Candidate::Strong;
                    edges.put_pixel(nx as u32, ny as u32, Luma([EdgeMap::EDGE]));
                    stack.push((nx, ny));
                }
            }
        }
    }

    EdgeMap::from_image(edges)
}
