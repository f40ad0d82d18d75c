use crate::core::utils::geometry::stacked_norm;
use crate::engine::config::Normalization;
use nalgebra::Vector3;

/// Neighborhood tensor distance: Frobenius norm of `aligned - reference`.
///
/// `aligned` is the target neighborhood already rotated onto `reference`.
pub fn score(
    reference: &[Vector3<f64>],
    aligned: &[Vector3<f64>],
    normalization: Normalization,
) -> f64 {
    let residual: Vec<Vector3<f64>> = aligned.iter().zip(reference).map(|(b, a)| b - a).collect();
    normalization.apply(stacked_norm(&residual), reference.len())
}
