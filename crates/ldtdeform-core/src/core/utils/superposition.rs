//! Optimal rigid rotation between two corresponding point sets (Kabsch).
//!
//! Point sets here are neighborhood displacement vectors, already expressed relative to
//! their central residue, so no centering or translation is applied: only a proper
//! rotation is fitted.

use nalgebra::{Matrix3, Vector3};
use tracing::trace;

const SVD_EPSILON: f64 = f64::EPSILON;
const SVD_MAX_ITERATIONS: usize = 1000;

/// Computes the rotation `R` minimizing `sum |R * mobile[k] - target[k]|^2`.
///
/// The cross-covariance `H = sum mobile[k] * target[k]^T` is decomposed as
/// `H = U S V^T` and `R = V diag(1, 1, d) U^T`, where `d = sign(det(V U^T))` keeps
/// `R` a rotation rather than a reflection.
///
/// A single point pair yields a valid but underdetermined rotation.
///
/// # Return
///
/// `None` if the sets are empty, differ in length, contain non-finite components,
/// or the decomposition fails to converge.
pub fn optimal_rotation(mobile: &[Vector3<f64>], target: &[Vector3<f64>]) -> Option<Matrix3<f64>> {
    if mobile.is_empty() || mobile.len() != target.len() {
        return None;
    }

    let h = mobile
        .iter()
        .zip(target)
        .fold(Matrix3::zeros(), |acc, (p, q)| acc + p * q.transpose());
    if h.iter().any(|x| !x.is_finite()) {
        trace!("Cross-covariance contains non-finite entries; no rotation fitted.");
        return None;
    }

    let svd = h.try_svd(true, true, SVD_EPSILON, SVD_MAX_ITERATIONS)?;
    let (u, v_t) = match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => (u, v_t),
        _ => return None,
    };

    let v = v_t.transpose();
    let d = if (v * u.transpose()).determinant() < 0.0 {
        -1.0
    } else {
        1.0
    };
    let correction = Matrix3::from_diagonal(&Vector3::new(1.0, 1.0, d));
    Some(v * correction * u.transpose())
}

/// Rotates `mobile` onto `target` and returns the rotated copy of `mobile`.
pub fn superpose(mobile: &[Vector3<f64>], target: &[Vector3<f64>]) -> Option<Vec<Vector3<f64>>> {
    let rotation = optimal_rotation(mobile, target)?;
    Some(mobile.iter().map(|p| rotation * p).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Rotation3, Unit};

    const TOLERANCE: f64 = 1e-9;

    fn vectors_approx_equal(a: &[Vector3<f64>], b: &[Vector3<f64>]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).norm() < TOLERANCE)
    }

    fn tetrahedron() -> Vec<Vector3<f64>> {
        vec![
            Vector3::new(1.0, 0.2, -0.3),
            Vector3::new(-0.4, 1.5, 0.1),
            Vector3::new(0.3, -0.7, 2.2),
            Vector3::new(-1.1, -0.9, -0.8),
        ]
    }

    #[test]
    fn identical_sets_give_identity_rotation() {
        let points = tetrahedron();
        let r = optimal_rotation(&points, &points).unwrap();
        assert!((r - Matrix3::identity()).norm() < TOLERANCE);
    }

    #[test]
    fn recovers_known_rotation() {
        let target = tetrahedron();
        let rotation = Rotation3::from_axis_angle(
            &Unit::new_normalize(Vector3::new(0.3, -1.0, 0.5)),
            1.1,
        );
        let mobile: Vec<_> = target.iter().map(|p| rotation.inverse() * p).collect();
        let aligned = superpose(&mobile, &target).unwrap();
        assert!(vectors_approx_equal(&aligned, &target));
    }

    #[test]
    fn never_returns_a_reflection() {
        let target = tetrahedron();
        let mirrored: Vec<_> = target
            .iter()
            .map(|p| Vector3::new(p.x, p.y, -p.z))
            .collect();
        let r = optimal_rotation(&mirrored, &target).unwrap();
        assert!((r.determinant() - 1.0).abs() < TOLERANCE);
        assert!((r * r.transpose() - Matrix3::identity()).norm() < TOLERANCE);
    }

    #[test]
    fn single_point_is_aligned_in_direction() {
        let mobile = [Vector3::new(0.0, 2.0, 0.0)];
        let target = [Vector3::new(2.0, 0.0, 0.0)];
        let aligned = superpose(&mobile, &target).unwrap();
        assert!(vectors_approx_equal(&aligned, &target));
    }

    #[test]
    fn rank_deficient_collinear_sets_still_produce_a_rotation() {
        let points = vec![Vector3::new(1.0, 0.0, 0.0), Vector3::new(-2.0, 0.0, 0.0)];
        let aligned = superpose(&points, &points).unwrap();
        assert!(vectors_approx_equal(&aligned, &points));
    }

    #[test]
    fn invalid_inputs_yield_none() {
        assert!(optimal_rotation(&[], &[]).is_none());
        let one = [Vector3::new(1.0, 0.0, 0.0)];
        let two = [Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)];
        assert!(optimal_rotation(&one, &two).is_none());
        let nan = [Vector3::new(f64::NAN, 0.0, 0.0)];
        assert!(optimal_rotation(&nan, &one).is_none());
    }
}
