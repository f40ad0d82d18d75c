use nalgebra::Vector3;

/// Local distance difference test over a shared neighborhood.
///
/// For every neighbor the signed change in distance `|target| - |reference|` is checked
/// against each tolerance in `bins`; the score is the fraction of (neighbor, bin)
/// checks that pass. Only stretching is penalized: a neighbor that moved closer passes
/// every bin.
pub fn score(reference: &[Vector3<f64>], target: &[Vector3<f64>], bins: &[f64]) -> f64 {
    let preserved: usize = reference
        .iter()
        .zip(target)
        .map(|(a, b)| {
            let change = b.norm() - a.norm();
            bins.iter().filter(|&&tolerance| change <= tolerance).count()
        })
        .sum();
    preserved as f64 / (bins.len() * reference.len()) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::DEFAULT_LDDT_BINS;

    #[test]
    fn unchanged_distances_score_one() {
        let v = vec![Vector3::new(1.0, 2.0, 3.0), Vector3::new(-4.0, 0.5, 0.0)];
        assert_eq!(score(&v, &v, &DEFAULT_LDDT_BINS), 1.0);
    }

    #[test]
    fn each_bin_counts_separately() {
        let reference = vec![Vector3::new(3.0, 0.0, 0.0)];
        let cases = [(3.3, 1.0), (3.7, 0.75), (4.5, 0.5), (6.0, 0.25), (8.0, 0.0)];
        for (length, expected) in cases {
            let target = vec![Vector3::new(length, 0.0, 0.0)];
            let actual = score(&reference, &target, &DEFAULT_LDDT_BINS);
            assert_eq!(actual, expected, "length {}", length);
        }
    }

    #[test]
    fn only_stretching_is_penalized() {
        let reference = vec![Vector3::new(5.0, 0.0, 0.0)];
        let shorter = vec![Vector3::new(3.0, 0.0, 0.0)];
        let longer = vec![Vector3::new(7.0, 0.0, 0.0)];
        assert_eq!(score(&reference, &shorter, &DEFAULT_LDDT_BINS), 1.0);
        assert_eq!(score(&reference, &longer, &DEFAULT_LDDT_BINS), 0.5);
    }

    #[test]
    fn custom_bins_change_denominator() {
        let reference = vec![Vector3::new(3.0, 0.0, 0.0), Vector3::new(0.0, 3.0, 0.0)];
        let target = vec![Vector3::new(3.0, 0.0, 0.0), Vector3::new(0.0, 4.5, 0.0)];
        assert_eq!(score(&reference, &target, &[1.0, 2.0]), 3.0 / 4.0);
    }
}
