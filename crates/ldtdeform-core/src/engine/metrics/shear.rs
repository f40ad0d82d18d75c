use nalgebra::{DMatrix, Matrix3, MatrixXx3, Vector3};
use tracing::trace;

/// Relative determinant below which the reference Gram matrix counts as singular.
const SINGULARITY_TOLERANCE: f64 = 1e-10;

/// Relative size of `dUU` below which the neighborhoods count as undeformed.
const UNDEFORMED_TOLERANCE: f64 = 1e-12;

/// Shear component of the local deformation, measured in the reference frame.
///
/// With `U1` and `U2` the stacked reference and target displacement vectors (one row
/// per shared neighbor), the neighbor-space change `dUU = U2 U2^T - U1 U1^T` is
/// projected onto the reference basis:
///
/// `C = 1/2 * G^-1 U1^T dUU U1 G^-1`, with `G = U1^T U1`.
///
/// The score is `1/2 * (trace(C C) - sum(diag(C)^2))`, the off-diagonal part of `C`.
/// Only the reference tensor enters `G`, so swapping reference and target generally
/// changes the value.
///
/// Returns `NaN` when `G` is singular (fewer than three non-coplanar neighbors), unless
/// the neighborhoods are congruent (`dUU` vanishes up to rounding relative to
/// `U1 U1^T`), in which case `C` vanishes and the shear is `0`.
pub fn score(reference: &[Vector3<f64>], target: &[Vector3<f64>]) -> f64 {
    let n = reference.len();
    let u1 = MatrixXx3::from_fn(n, |r, c| reference[r][c]);
    let u2 = MatrixXx3::from_fn(n, |r, c| target[r][c]);

    let reference_products: DMatrix<f64> = &u1 * u1.transpose();
    let delta: DMatrix<f64> = &u2 * u2.transpose() - &reference_products;
    if delta.norm() <= UNDEFORMED_TOLERANCE * reference_products.norm() {
        return 0.0;
    }

    let gram: Matrix3<f64> = u1.transpose() * &u1;
    let scale = gram.norm();
    if gram.determinant().abs() <= SINGULARITY_TOLERANCE * scale * scale * scale {
        trace!(neighbors = n, "Reference Gram matrix is singular; shear undefined.");
        return f64::NAN;
    }
    let Some(inverse) = gram.try_inverse() else {
        trace!(neighbors = n, "Reference Gram matrix could not be inverted.");
        return f64::NAN;
    };

    let c: Matrix3<f64> = (inverse * u1.transpose() * &delta * &u1 * inverse) * 0.5;
    let shear = 0.5 * ((c * c).trace() - c.diagonal().norm_squared());
    if shear.is_finite() { shear } else { f64::NAN }
}
