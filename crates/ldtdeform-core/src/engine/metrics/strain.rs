use crate::engine::config::Normalization;
use nalgebra::Vector3;

/// Fractional local strain: `sum |aligned[k] - reference[k]| / |reference[k]|`.
///
/// `aligned` is the target neighborhood already rotated onto `reference`.
pub fn score(
    reference: &[Vector3<f64>],
    aligned: &[Vector3<f64>],
    normalization: Normalization,
) -> f64 {
    let total: f64 = reference
        .iter()
        .zip(aligned)
        .map(|(a, b)| (b - a).norm() / a.norm())
        .sum();
    normalization.apply(total, reference.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_neighborhoods_have_no_strain() {
        let v = vec![Vector3::new(2.0, 1.0, 0.0), Vector3::new(0.0, 0.0, -3.0)];
        assert_eq!(score(&v, &v, Normalization::Total), 0.0);
    }

    #[test]
    fn strain_is_relative_to_reference_length() {
        let reference = vec![Vector3::new(2.0, 0.0, 0.0), Vector3::new(0.0, 4.0, 0.0)];
        let aligned = vec![Vector3::new(3.0, 0.0, 0.0), Vector3::new(0.0, 6.0, 0.0)];
        assert!((score(&reference, &aligned, Normalization::Total) - 1.0).abs() < 1e-12);
        assert!((score(&reference, &aligned, Normalization::PerNeighbor) - 0.5).abs() < 1e-12);
    }
}
