use super::config::NeighborConfig;
use super::error::EngineError;
use super::local::LocalGeometry;
use super::neighbors::{NeighborPolicy, NeighborSet};
use super::progress::{Phase, Progress, ProgressReporter};
use super::tensor::{Displacement, LocalDistanceTensor};
use crate::core::models::structure::{Structure, StructureKind};
use crate::core::utils::geometry::{distance_matrix, mean_columns, mean_matrix};
use crate::core::utils::superposition::superpose;
use nalgebra::{DMatrix, Vector3};
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Rotation-aligned, averaged local geometry of structurally equivalent conformations.
///
/// All members share one consensus neighbor graph derived from their mean distance
/// matrix. For every residue, each member's neighborhood is rotated onto the
/// neighborhood of the `reference` member before averaging, so the result does not
/// depend on the members' global orientations. Changing the reference can change the
/// consensus, which is why it is an explicit argument.
///
/// Residues with fewer than two consensus neighbors carry no rotational information
/// and get an empty (undefined) consensus entry.
#[derive(Debug, Clone)]
pub struct Ensemble {
    name: String,
    members: Vec<Structure>,
    reference: usize,
    kind: StructureKind,
    config: NeighborConfig,
    mean_distances: DMatrix<f64>,
    mean_quality: Vec<f64>,
    neighbors: NeighborSet,
    tensor: LocalDistanceTensor,
}

impl Ensemble {
    pub fn new(
        name: impl Into<String>,
        members: Vec<Structure>,
        config: &NeighborConfig,
        reference: usize,
    ) -> Result<Self, EngineError> {
        Self::with_reporter(name, members, config, reference, &ProgressReporter::new())
    }

    #[instrument(
        skip_all,
        name = "ensemble_consensus",
        fields(members = members.len(), reference = reference)
    )]
    pub fn with_reporter(
        name: impl Into<String>,
        members: Vec<Structure>,
        config: &NeighborConfig,
        reference: usize,
        reporter: &ProgressReporter,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let kind = validate_members(&members, reference)?;
        let name = name.into();

        info!(
            ensemble = %name,
            members = members.len(),
            residues = members[reference].len(),
            "Deriving consensus neighbor graph."
        );
        let (mean_distances, mean_quality, neighbors) = reporter
            .phase(Phase::ConsensusNeighborhoods, || {
                consensus_neighbors(&members, kind, config)
            })?;

        let rows = reporter.phase(Phase::ConsensusAlignment, || {
            let member_tensors = members
                .iter()
                .map(|m| LocalDistanceTensor::from_neighbors(&m.coordinates(), &neighbors))
                .collect::<Result<Vec<_>, _>>()?;

            reporter.report(Progress::TaskStart {
                total_residues: neighbors.len() as u64,
            });

            #[cfg(not(feature = "parallel"))]
            let residues = 0..neighbors.len();

            #[cfg(feature = "parallel")]
            let residues = (0..neighbors.len()).into_par_iter();

            let rows: Vec<Vec<Displacement>> = residues
                .map(|i| {
                    let row = average_neighborhood(
                        i,
                        neighbors.neighbors_of(i),
                        &member_tensors,
                        reference,
                    );
                    reporter.report(Progress::TaskIncrement);
                    row
                })
                .collect();
            reporter.report(Progress::TaskFinish);
            Ok::<_, EngineError>(rows)
        })?;

        let undefined = rows.iter().filter(|r| r.is_empty()).count();
        debug!(undefined, "Averaged aligned neighborhoods.");
        if undefined > 0 {
            reporter.report(Progress::Message(format!(
                "{} of {} residues have no consensus neighborhood",
                undefined,
                rows.len()
            )));
        }

        Ok(Self {
            name,
            members,
            reference,
            kind,
            config: *config,
            mean_distances,
            mean_quality,
            neighbors,
            tensor: LocalDistanceTensor::from_rows(rows),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[Structure] {
        &self.members
    }

    pub fn reference(&self) -> usize {
        self.reference
    }

    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    pub fn config(&self) -> &NeighborConfig {
        &self.config
    }

    pub fn mean_distances(&self) -> &DMatrix<f64> {
        &self.mean_distances
    }

    pub fn mean_quality(&self) -> &[f64] {
        &self.mean_quality
    }
}

impl LocalGeometry for Ensemble {
    fn label(&self) -> &str {
        &self.name
    }

    fn neighbors(&self) -> &NeighborSet {
        &self.neighbors
    }

    fn tensor(&self) -> &LocalDistanceTensor {
        &self.tensor
    }
}

fn consensus_neighbors(
    members: &[Structure],
    kind: StructureKind,
    config: &NeighborConfig,
) -> Result<(DMatrix<f64>, Vec<f64>, NeighborSet), EngineError> {
    let distance_matrices: Vec<DMatrix<f64>> = members
        .iter()
        .map(|m| distance_matrix(&m.coordinates()))
        .collect();
    let mean_distances = mean_matrix(&distance_matrices)
        .ok_or_else(|| EngineError::Internal("member distance matrices disagree in shape".into()))?;
    let qualities: Vec<Vec<f64>> = members.iter().map(Structure::qualities).collect();
    let mean_quality = mean_columns(&qualities)
        .ok_or_else(|| EngineError::Internal("member quality columns disagree in length".into()))?;

    let policy = NeighborPolicy::for_kind(kind, config);
    let neighbors = NeighborSet::from_distances(&mean_distances, &mean_quality, policy)?;
    Ok((mean_distances, mean_quality, neighbors))
}

fn validate_members(members: &[Structure], reference: usize) -> Result<StructureKind, EngineError> {
    let first = members.first().ok_or(EngineError::EmptyEnsemble)?;
    if reference >= members.len() {
        return Err(EngineError::ReferenceOutOfRange {
            reference,
            members: members.len(),
        });
    }

    let kind = first.kind();
    let expected = first.len();
    for member in members {
        if member.len() != expected {
            return Err(EngineError::LengthMismatch {
                name: member.name().to_string(),
                expected,
                found: member.len(),
            });
        }
        if member.kind() != kind {
            return Err(EngineError::KindMismatch {
                name: member.name().to_string(),
                expected: kind,
                found: member.kind(),
            });
        }
    }
    Ok(kind)
}

fn average_neighborhood(
    residue: usize,
    neighbor_ids: &[usize],
    member_tensors: &[LocalDistanceTensor],
    reference: usize,
) -> Vec<Displacement> {
    if neighbor_ids.len() <= 1 {
        return Vec::new();
    }

    let target = member_tensors[reference].vectors(residue);
    let mut sum: Vec<Vector3<f64>> = target.clone();

    for (m, tensor) in member_tensors.iter().enumerate() {
        if m == reference {
            continue;
        }
        let mobile = tensor.vectors(residue);
        let aligned = superpose(&mobile, &target).unwrap_or_else(|| {
            warn!(
                residue,
                member = m,
                "Superposition failed; averaging the unrotated neighborhood."
            );
            mobile
        });
        for (acc, v) in sum.iter_mut().zip(aligned) {
            *acc += v;
        }
    }

    let count = member_tensors.len() as f64;
    neighbor_ids
        .iter()
        .zip(sum)
        .map(|(&neighbor, total)| Displacement {
            neighbor,
            vector: total / count,
        })
        .collect()
}
