use super::residue::{AminoAcid, Residue};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Provenance of a structure, which decides how unreliable residues are filtered.
///
/// `Model` structures carry a per-residue confidence in the quality column and are
/// filtered by a minimum confidence. `Experimental` structures carry B-factors, which
/// are not used for filtering; unresolved residues show up as NaN coordinates instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureKind {
    Model,
    Experimental,
}

#[derive(Debug, Error)]
#[error("Invalid structure kind string: '{0}'")]
pub struct ParseStructureKindError(String);

impl FromStr for StructureKind {
    type Err = ParseStructureKindError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "model" | "predicted" | "af" | "dmp" => Ok(StructureKind::Model),
            "experimental" | "crystal" | "pdb" => Ok(StructureKind::Experimental),
            other => Err(ParseStructureKindError(other.to_string())),
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                StructureKind::Model => "model",
                StructureKind::Experimental => "experimental",
            }
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructureError {
    #[error("Array length mismatch for '{field}': expected {expected}, found {found}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
}

/// One conformation of a protein chain, ordered by canonical sequence position.
///
/// Every structure compared against another must share its length and residue
/// indexing; reconciling sequences with coordinates is the loader's job.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    name: String,
    kind: StructureKind,
    residues: Vec<Residue>,
}

impl Structure {
    pub fn new(name: impl Into<String>, kind: StructureKind, residues: Vec<Residue>) -> Self {
        Self {
            name: name.into(),
            kind,
            residues,
        }
    }

    /// Builds a structure from parallel per-residue arrays.
    ///
    /// Residue indices are assigned from array positions. Characters of `sequence`
    /// are read as one-letter codes; unrecognized letters become [`AminoAcid::Unknown`].
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::LengthMismatch`] if `qualities` or `sequence` do not
    /// have one entry per coordinate.
    pub fn from_arrays(
        name: impl Into<String>,
        kind: StructureKind,
        coordinates: &[[f64; 3]],
        qualities: &[f64],
        sequence: &str,
    ) -> Result<Self, StructureError> {
        let expected = coordinates.len();
        if qualities.len() != expected {
            return Err(StructureError::LengthMismatch {
                field: "qualities",
                expected,
                found: qualities.len(),
            });
        }
        let codes: Vec<char> = sequence.chars().collect();
        if codes.len() != expected {
            return Err(StructureError::LengthMismatch {
                field: "sequence",
                expected,
                found: codes.len(),
            });
        }

        let residues = coordinates
            .iter()
            .zip(qualities)
            .zip(codes)
            .enumerate()
            .map(|(i, ((xyz, &quality), code))| {
                Residue::new(
                    i as isize,
                    AminoAcid::from_one_letter(code),
                    Point3::new(xyz[0], xyz[1], xyz[2]),
                    quality,
                )
            })
            .collect();

        Ok(Self::new(name, kind, residues))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residue(&self, position: usize) -> Option<&Residue> {
        self.residues.get(position)
    }

    pub fn coordinates(&self) -> Vec<Point3<f64>> {
        self.residues.iter().map(|r| r.coordinate).collect()
    }

    pub fn qualities(&self) -> Vec<f64> {
        self.residues.iter().map(|r| r.quality).collect()
    }

    /// One-letter sequence, with `X` for unknown residues.
    pub fn sequence(&self) -> String {
        self.residues.iter().map(|r| r.amino_acid.one_letter()).collect()
    }

    /// Number of residues with a fully resolved coordinate.
    pub fn resolved_count(&self) -> usize {
        self.residues.iter().filter(|r| r.has_coordinate()).count()
    }

    /// Lowest finite quality score, if any.
    pub fn min_quality(&self) -> Option<f64> {
        self.residues
            .iter()
            .map(|r| r.quality)
            .filter(|q| !q.is_nan())
            .reduce(f64::min)
    }

    /// Highest finite quality score, if any.
    pub fn max_quality(&self) -> Option<f64> {
        self.residues
            .iter()
            .map(|r| r.quality)
            .filter(|q| !q.is_nan())
            .reduce(f64::max)
    }
}
