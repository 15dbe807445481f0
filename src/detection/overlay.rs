use image::{Rgb, RgbImage};
use imageproc::drawing::{BresenhamLineIter, draw_filled_rect_mut};
use imageproc::rect::Rect;

use crate::models::Contour;

/// Copy `img` and stroke every contour as a closed polyline.
///
/// Each rasterized line pixel is widened to a `thickness` x `thickness` square;
/// pixels falling outside the image are clipped.
pub fn draw_contours(img: &RgbImage, contours: &[Contour], color: Rgb<u8>, thickness: u32) -> RgbImage {
    let mut canvas = img.clone();
    if thickness == 0 {
        return canvas;
    }

    let offset = (thickness as i32 - 1) / 2;
    let mut stamp = |x: i32, y: i32| {
        let rect = Rect::at(x - offset, y - offset).of_size(thickness, thickness);
        draw_filled_rect_mut(&mut canvas, rect, color);
    };

    for contour in contours {
        let points = &contour.points;
        if points.len() == 1 {
            stamp(points[0].x, points[0].y);
            continue;
        }

        for i in 0..points.len() {
            let p1 = points[i];
            let p2 = points[(i + 1) % points.len()];
            for (x, y) in BresenhamLineIter::new((p1.x as f32, p1.y as f32), (p2.x as f32, p2.y as f32)) {
                stamp(x, y);
            }
        }
    }

    canvas
}
