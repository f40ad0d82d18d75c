use super::config::NeighborConfig;
use super::error::EngineError;
use crate::core::models::structure::{Structure, StructureKind};
use crate::core::utils::geometry::distance_matrix;
use nalgebra::DMatrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Rule deciding whether residue `j` belongs to the neighborhood of residue `i`.
///
/// Chosen once from the [`StructureKind`] when neighbors are derived. Both variants
/// reject `distance == 0` (self pairs) and `NaN` distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NeighborPolicy {
    /// Model structures: within the cutoff, and both residues at or above the
    /// quality threshold.
    QualityFiltered { cutoff: f64, threshold: f64 },
    /// Experimental structures: within the cutoff and finite; quality is ignored.
    FiniteDistance { cutoff: f64 },
}

impl NeighborPolicy {
    pub fn for_kind(kind: StructureKind, config: &NeighborConfig) -> Self {
        match kind {
            StructureKind::Model => NeighborPolicy::QualityFiltered {
                cutoff: config.cutoff,
                threshold: config.quality_threshold,
            },
            StructureKind::Experimental => NeighborPolicy::FiniteDistance {
                cutoff: config.cutoff,
            },
        }
    }

    #[inline]
    pub fn admits(&self, distance: f64, quality_i: f64, quality_j: f64) -> bool {
        match *self {
            NeighborPolicy::QualityFiltered { cutoff, threshold } => {
                distance > 0.0
                    && distance <= cutoff
                    && quality_i >= threshold
                    && quality_j >= threshold
            }
            NeighborPolicy::FiniteDistance { cutoff } => {
                distance > 0.0 && distance <= cutoff && distance.is_finite()
            }
        }
    }
}

/// Per-residue neighbor lists, each in ascending residue order.
///
/// The relation is not necessarily symmetric under quality filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborSet {
    lists: Vec<Vec<usize>>,
}

impl NeighborSet {
    /// Derives neighbors from a precomputed distance matrix.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::LengthMismatch`] if the matrix is not square or
    /// `qualities` does not have one entry per matrix row.
    pub fn from_distances(
        distances: &DMatrix<f64>,
        qualities: &[f64],
        policy: NeighborPolicy,
    ) -> Result<Self, EngineError> {
        let n = distances.nrows();
        if distances.ncols() != n {
            return Err(EngineError::LengthMismatch {
                name: "distance matrix columns".to_string(),
                expected: n,
                found: distances.ncols(),
            });
        }
        if qualities.len() != n {
            return Err(EngineError::LengthMismatch {
                name: "qualities".to_string(),
                expected: n,
                found: qualities.len(),
            });
        }

        #[cfg(not(feature = "parallel"))]
        let rows = 0..n;

        #[cfg(feature = "parallel")]
        let rows = (0..n).into_par_iter();

        let lists = rows
            .map(|i| {
                (0..n)
                    .filter(|&j| policy.admits(distances[(i, j)], qualities[i], qualities[j]))
                    .collect::<Vec<usize>>()
            })
            .collect();

        Ok(Self { lists })
    }

    pub fn build(structure: &Structure, config: &NeighborConfig) -> Result<Self, EngineError> {
        let distances = distance_matrix(&structure.coordinates());
        let policy = NeighborPolicy::for_kind(structure.kind(), config);
        Self::from_distances(&distances, &structure.qualities(), policy)
    }

    pub(crate) fn from_lists(lists: Vec<Vec<usize>>) -> Self {
        Self { lists }
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Neighbors of `residue`; empty when out of range.
    pub fn neighbors_of(&self, residue: usize) -> &[usize] {
        self.lists.get(residue).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, residue: usize) -> usize {
        self.neighbors_of(residue).len()
    }

    pub fn contains(&self, residue: usize, neighbor: usize) -> bool {
        self.neighbors_of(residue).binary_search(&neighbor).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.lists.iter().map(Vec::as_slice)
    }

    /// Neighbors of `residue` present in both sets, in ascending order.
    pub fn shared_with(&self, other: &NeighborSet, residue: usize) -> Vec<usize> {
        let (a, b) = (self.neighbors_of(residue), other.neighbors_of(residue));
        let mut shared = Vec::with_capacity(a.len().min(b.len()));
        let (mut x, mut y) = (0, 0);
        while x < a.len() && y < b.len() {
            match a[x].cmp(&b[y]) {
                std::cmp::Ordering::Less => x += 1,
                std::cmp::Ordering::Greater => y += 1,
                std::cmp::Ordering::Equal => {
                    shared.push(a[x]);
                    x += 1;
                    y += 1;
                }
            }
        }
        shared
    }
}
