use nalgebra::{DMatrix, Point3, Vector3};

/// Full symmetric Euclidean distance matrix of a point set.
///
/// Missing (NaN) coordinates propagate as NaN distances in their row and column,
/// including the diagonal entry.
pub fn distance_matrix(points: &[Point3<f64>]) -> DMatrix<f64> {
    let n = points.len();
    let mut dist = DMatrix::zeros(n, n);
    for i in 0..n {
        dist[(i, i)] = (points[i] - points[i]).norm();
        for j in (i + 1)..n {
            let d = (points[i] - points[j]).norm();
            dist[(i, j)] = d;
            dist[(j, i)] = d;
        }
    }
    dist
}

/// Elementwise mean of equally shaped matrices.
///
/// Returns `None` for an empty slice or when the shapes differ. NaN entries propagate.
pub fn mean_matrix(matrices: &[DMatrix<f64>]) -> Option<DMatrix<f64>> {
    let first = matrices.first()?;
    let shape = first.shape();
    if matrices.iter().any(|m| m.shape() != shape) {
        return None;
    }
    let sum = matrices
        .iter()
        .skip(1)
        .fold(first.clone(), |acc, m| acc + m);
    Some(sum / matrices.len() as f64)
}

/// Elementwise mean of equally long value columns; `None` on empty input or ragged lengths.
pub fn mean_columns(columns: &[Vec<f64>]) -> Option<Vec<f64>> {
    let first = columns.first()?;
    if columns.iter().any(|c| c.len() != first.len()) {
        return None;
    }
    let m = columns.len() as f64;
    Some(
        (0..first.len())
            .map(|k| columns.iter().map(|c| c[k]).sum::<f64>() / m)
            .collect(),
    )
}

/// Displacement from `neighbor` to `origin`, i.e. `origin - neighbor`.
#[inline]
pub fn displacement(origin: &Point3<f64>, neighbor: &Point3<f64>) -> Vector3<f64> {
    origin - neighbor
}

/// Frobenius norm of a stack of row vectors.
pub fn stacked_norm(vectors: &[Vector3<f64>]) -> f64 {
    vectors.iter().map(|v| v.norm_squared()).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn distance_matrix_is_symmetric_with_zero_diagonal() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
            Point3::new(0.0, 0.0, 2.0),
        ];
        let d = distance_matrix(&points);
        assert!(f64_approx_equal(d[(0, 1)], 5.0));
        assert!(f64_approx_equal(d[(1, 0)], 5.0));
        assert!(f64_approx_equal(d[(0, 2)], 2.0));
        for i in 0..3 {
            assert_eq!(d[(i, i)], 0.0);
        }
    }

    #[test]
    fn distance_matrix_propagates_missing_coordinates() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(f64::NAN, f64::NAN, f64::NAN),
        ];
        let d = distance_matrix(&points);
        assert!(d[(0, 1)].is_nan());
        assert!(d[(1, 1)].is_nan());
        assert_eq!(d[(0, 0)], 0.0);
    }

    #[test]
    fn mean_matrix_averages_elementwise() {
        let a = DMatrix::from_row_slice(2, 2, &[0.0, 2.0, 2.0, 0.0]);
        let b = DMatrix::from_row_slice(2, 2, &[0.0, 4.0, 4.0, 0.0]);
        let mean = mean_matrix(&[a, b]).unwrap();
        assert!(f64_approx_equal(mean[(0, 1)], 3.0));
        assert!(f64_approx_equal(mean[(1, 0)], 3.0));
    }

    #[test]
    fn mean_matrix_rejects_empty_and_ragged_input() {
        assert!(mean_matrix(&[]).is_none());
        let a = DMatrix::<f64>::zeros(2, 2);
        let b = DMatrix::<f64>::zeros(3, 3);
        assert!(mean_matrix(&[a, b]).is_none());
    }

    #[test]
    fn mean_columns_averages_and_propagates_nan() {
        let mean = mean_columns(&[vec![1.0, f64::NAN], vec![3.0, 1.0]]).unwrap();
        assert!(f64_approx_equal(mean[0], 2.0));
        assert!(mean[1].is_nan());
        assert!(mean_columns(&[vec![1.0], vec![1.0, 2.0]]).is_none());
    }

    #[test]
    fn displacement_points_from_neighbor_to_origin() {
        let v = displacement(&Point3::new(1.0, 1.0, 1.0), &Point3::new(0.0, 2.0, 1.0));
        assert_eq!(v, Vector3::new(1.0, -1.0, 0.0));
    }

    #[test]
    fn stacked_norm_is_frobenius_norm() {
        let vectors = [Vector3::new(1.0, 2.0, 2.0), Vector3::new(0.0, 0.0, 4.0)];
        assert!(f64_approx_equal(stacked_norm(&vectors), 5.0));
        assert_eq!(stacked_norm(&[]), 0.0);
    }
}
