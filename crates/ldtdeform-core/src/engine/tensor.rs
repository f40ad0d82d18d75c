use super::error::EngineError;
use super::neighbors::NeighborSet;
use crate::core::utils::geometry::displacement;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Displacement vector from a residue to one of its neighbors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Displacement {
    pub neighbor: usize,
    /// `coordinate[residue] - coordinate[neighbor]`
    pub vector: Vector3<f64>,
}

/// Ragged per-residue table of neighbor displacement vectors (the local distance tensor).
///
/// Each row is ordered by ascending neighbor index. Rows are never zero-padded: a pair
/// that is not a neighbor simply has no entry, and a row may be empty when the residue
/// has no usable neighborhood.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalDistanceTensor {
    rows: Vec<Vec<Displacement>>,
}

impl LocalDistanceTensor {
    /// Displacements restricted to each residue's neighbor list.
    ///
    /// `neighbors` may come from a different source than `coordinates` (the ensemble
    /// consensus graph, for instance), so no finiteness check is applied here.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::LengthMismatch`] if `coordinates` and `neighbors` do not
    /// cover the same number of residues.
    pub fn from_neighbors(
        coordinates: &[Point3<f64>],
        neighbors: &NeighborSet,
    ) -> Result<Self, EngineError> {
        if coordinates.len() != neighbors.len() {
            return Err(EngineError::LengthMismatch {
                name: "coordinates".to_string(),
                expected: neighbors.len(),
                found: coordinates.len(),
            });
        }

        #[cfg(not(feature = "parallel"))]
        let residues = 0..neighbors.len();

        #[cfg(feature = "parallel")]
        let residues = (0..neighbors.len()).into_par_iter();

        let rows = residues
            .map(|i| {
                neighbors
                    .neighbors_of(i)
                    .iter()
                    .map(|&j| Displacement {
                        neighbor: j,
                        vector: displacement(&coordinates[i], &coordinates[j]),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        Ok(Self { rows })
    }

    /// Displacements between every ordered pair of distinct residues with resolved
    /// coordinates, for use when no neighbor subset is available.
    pub fn all_pairs(coordinates: &[Point3<f64>]) -> Self {
        let resolved: Vec<bool> = coordinates
            .iter()
            .map(|p| p.iter().all(|c| c.is_finite()))
            .collect();
        let n = coordinates.len();

        let rows = (0..n)
            .map(|i| {
                if !resolved[i] {
                    return Vec::new();
                }
                (0..n)
                    .filter(|&j| j != i && resolved[j])
                    .map(|j| Displacement {
                        neighbor: j,
                        vector: displacement(&coordinates[i], &coordinates[j]),
                    })
                    .collect()
            })
            .collect();

        Self { rows }
    }

    pub(crate) fn from_rows(rows: Vec<Vec<Displacement>>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Entries of `residue`; empty when out of range or undefined.
    pub fn row(&self, residue: usize) -> &[Displacement] {
        self.rows.get(residue).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_data(&self, residue: usize) -> bool {
        !self.row(residue).is_empty()
    }

    pub fn vectors(&self, residue: usize) -> Vec<Vector3<f64>> {
        self.row(residue).iter().map(|d| d.vector).collect()
    }

    /// Displacement stored for the pair (`residue`, `neighbor`), if any.
    pub fn displacement(&self, residue: usize, neighbor: usize) -> Option<Vector3<f64>> {
        let row = self.row(residue);
        row.binary_search_by_key(&neighbor, |d| d.neighbor)
            .ok()
            .map(|pos| row[pos].vector)
    }

    /// Vectors of `residue` for the given neighbors, or `None` if any is absent.
    pub fn select(&self, residue: usize, neighbors: &[usize]) -> Option<Vec<Vector3<f64>>> {
        neighbors
            .iter()
            .map(|&j| self.displacement(residue, j))
            .collect()
    }
}
