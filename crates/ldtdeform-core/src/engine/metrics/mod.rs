//! Per-residue deformation metrics.
//!
//! Every metric compares the displacement vectors of one residue's *shared*
//! neighborhood: the neighbors present in both the reference and the target neighbor
//! lists. Residues without data on either side, or without any shared neighbor,
//! score `NaN` for every metric.

pub mod ldd;
pub mod lddt;
pub mod ntd;
pub mod shear;
pub mod strain;

use super::config::{ConfigError, DeformationConfig};
use super::local::LocalGeometry;
use crate::core::utils::superposition::superpose;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Lddt,
    Ldd,
    Ntd,
    Shear,
    Strain,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Lddt,
        Metric::Ldd,
        Metric::Ntd,
        Metric::Shear,
        Metric::Strain,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Lddt => "lddt",
            Metric::Ldd => "ldd",
            Metric::Ntd => "ntd",
            Metric::Shear => "shear",
            Metric::Strain => "strain",
        }
    }

    fn needs_superposition(self) -> bool {
        matches!(self, Metric::Ntd | Metric::Strain)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownMetric(s.trim().to_string()))
    }
}

/// Displacement vectors of one residue restricted to the neighbors both sides share.
///
/// `reference[k]` and `target[k]` both describe the displacement to `neighbors[k]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedNeighborhood {
    pub residue: usize,
    pub neighbors: Vec<usize>,
    pub reference: Vec<Vector3<f64>>,
    pub target: Vec<Vector3<f64>>,
}

impl SharedNeighborhood {
    /// `None` when either side has no data for `residue` or they share no neighbor.
    pub fn between<R, T>(reference: &R, target: &T, residue: usize) -> Option<Self>
    where
        R: LocalGeometry + ?Sized,
        T: LocalGeometry + ?Sized,
    {
        if !reference.tensor().has_data(residue) || !target.tensor().has_data(residue) {
            return None;
        }
        let neighbors = reference.neighbors().shared_with(target.neighbors(), residue);
        if neighbors.is_empty() {
            return None;
        }
        Some(Self {
            residue,
            reference: reference.tensor().select(residue, &neighbors)?,
            target: target.tensor().select(residue, &neighbors)?,
            neighbors,
        })
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Target vectors rotated onto the reference vectors.
    pub fn aligned_target(&self) -> Option<Vec<Vector3<f64>>> {
        superpose(&self.target, &self.reference)
    }
}

/// Scores one residue for each of `metrics`, returned in the same order.
///
/// The optimal rotation is fitted at most once and shared by `ntd` and `strain`.
pub fn score_residue<R, T>(
    reference: &R,
    target: &T,
    residue: usize,
    metrics: &[Metric],
    config: &DeformationConfig,
) -> Vec<f64>
where
    R: LocalGeometry + ?Sized,
    T: LocalGeometry + ?Sized,
{
    let Some(shared) = SharedNeighborhood::between(reference, target, residue) else {
        return vec![f64::NAN; metrics.len()];
    };

    let aligned = if metrics.iter().any(|m| m.needs_superposition()) {
        let aligned = shared.aligned_target();
        if aligned.is_none() {
            trace!(residue, "No rotation could be fitted for the shared neighborhood.");
        }
        aligned
    } else {
        None
    };

    metrics
        .iter()
        .map(|metric| match metric {
            Metric::Lddt => lddt::score(&shared.reference, &shared.target, &config.lddt_bins),
            Metric::Ldd => ldd::score(&shared.reference, &shared.target, config.ldd_normalization),
            Metric::Ntd => aligned.as_deref().map_or(f64::NAN, |rotated| {
                ntd::score(&shared.reference, rotated, config.ntd_normalization)
            }),
            Metric::Shear => shear::score(&shared.reference, &shared.target),
            Metric::Strain => aligned.as_deref().map_or(f64::NAN, |rotated| {
                strain::score(&shared.reference, rotated, config.strain_normalization)
            }),
        })
        .collect()
}
