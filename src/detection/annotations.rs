use crate::models::{Annotation, AnnotationType, Contour};

pub const BASE_CONFIDENCE: f64 = 0.85;
pub const CONFIDENCE_STEP: f64 = 0.01;

/// Order-derived placeholder score. It says nothing about detection quality.
pub fn placeholder_confidence(index: usize) -> f64 {
    BASE_CONFIDENCE + CONFIDENCE_STEP * index as f64
}

/// One annotation per contour, in the order given.
pub fn build_annotations(contours: &[Contour]) -> Vec<Annotation> {
    contours
        .iter()
        .enumerate()
        .map(|(i, contour)| Annotation {
            id: format!("contour_{}", i),
            kind: AnnotationType::Edge,
            coordinates: contour.coordinates(),
            confidence: placeholder_confidence(i),
            label: format!("Edge {}", i + 1),
        })
        .collect()
}
