use crate::engine::config::Normalization;
use nalgebra::Vector3;

/// Euclidean norm of the per-neighbor distance changes.
pub fn score(
    reference: &[Vector3<f64>],
    target: &[Vector3<f64>],
    normalization: Normalization,
) -> f64 {
    let squared: f64 = reference
        .iter()
        .zip(target)
        .map(|(a, b)| (b.norm() - a.norm()).powi(2))
        .sum();
    normalization.apply(squared.sqrt(), reference.len())
}
