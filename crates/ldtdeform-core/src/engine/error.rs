use super::config::ConfigError;
use crate::core::models::structure::StructureKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Structure length mismatch for '{name}': expected {expected} residues, found {found}")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("An ensemble requires at least one member structure")]
    EmptyEnsemble,

    #[error("Reference member {reference} is out of range for an ensemble of {members}")]
    ReferenceOutOfRange { reference: usize, members: usize },

    #[error("Ensemble member '{name}' is {found}, but the ensemble is {expected}")]
    KindMismatch {
        name: String,
        expected: StructureKind,
        found: StructureKind,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
