use super::config::NeighborConfig;
use super::error::EngineError;
use super::neighbors::NeighborSet;
use super::tensor::LocalDistanceTensor;
use crate::core::models::structure::Structure;
use tracing::{debug, instrument};

/// Anything that exposes per-residue neighborhoods and their displacement tensors.
///
/// Implemented by single structures ([`AnalyzedStructure`]) and by ensemble consensus
/// geometry ([`super::consensus::Ensemble`]), so either can be scored against the other.
pub trait LocalGeometry: Sync {
    fn label(&self) -> &str;
    fn neighbors(&self) -> &NeighborSet;
    fn tensor(&self) -> &LocalDistanceTensor;

    fn len(&self) -> usize {
        self.neighbors().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A structure together with its derived neighbor graph and local distance tensor.
///
/// Derivation happens once in [`AnalyzedStructure::new`]; the result is immutable.
#[derive(Debug, Clone)]
pub struct AnalyzedStructure {
    structure: Structure,
    config: NeighborConfig,
    neighbors: NeighborSet,
    tensor: LocalDistanceTensor,
}

impl AnalyzedStructure {
    #[instrument(skip_all, name = "local_environment", fields(structure = %structure.name()))]
    pub fn new(structure: Structure, config: &NeighborConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let neighbors = NeighborSet::build(&structure, config)?;
        let tensor = LocalDistanceTensor::from_neighbors(&structure.coordinates(), &neighbors)?;

        debug!(
            residues = structure.len(),
            resolved = structure.resolved_count(),
            kind = %structure.kind(),
            isolated = neighbors.iter().filter(|n| n.is_empty()).count(),
            "Derived local neighborhoods."
        );

        Ok(Self {
            structure,
            config: *config,
            neighbors,
            tensor,
        })
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn config(&self) -> &NeighborConfig {
        &self.config
    }

    pub fn into_structure(self) -> Structure {
        self.structure
    }
}

impl LocalGeometry for AnalyzedStructure {
    fn label(&self) -> &str {
        self.structure.name()
    }

    fn neighbors(&self) -> &NeighborSet {
        &self.neighbors
    }

    fn tensor(&self) -> &LocalDistanceTensor {
        &self.tensor
    }
}
