use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;

use crate::models::{Contour, EdgeMap};

/// Trace the outermost boundaries of the edge regions.
///
/// Hole borders and anything nested inside another region are dropped. Contours
/// come back in raster discovery order, each reduced to its direction-change vertices.
pub fn find_external_contours(edges: &EdgeMap) -> Vec<Contour> {
    find_contours::<i32>(edges.as_image())
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| Contour::new(simplify(&c.points)))
        .filter(|c| !c.is_empty())
        .collect()
}

/// Drop points that continue a horizontal, vertical or diagonal run.
///
/// The sequence is treated as closed, so the first point is checked against the last.
pub fn simplify(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            let incoming = (cur.x - prev.x, cur.y - prev.y);
            let outgoing = (next.x - cur.x, next.y - cur.y);
            incoming != outgoing
        })
        .map(|i| points[i])
        .collect()
}

/// Keep contours whose enclosed area is strictly greater than `min_area`, preserving order.
pub fn filter_by_area(contours: Vec<Contour>, min_area: f64) -> Vec<Contour> {
    contours.into_iter().filter(|c| c.area() > min_area).collect()
}
