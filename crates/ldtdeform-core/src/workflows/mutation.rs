use crate::core::models::structure::Structure;
use crate::core::utils::geometry::distance_matrix;
use crate::engine::error::EngineError;
use tracing::{debug, instrument};

/// Positions whose amino acids differ between two equally long structures.
pub fn substitution_sites(a: &Structure, b: &Structure) -> Result<Vec<usize>, EngineError> {
    if a.len() != b.len() {
        return Err(EngineError::LengthMismatch {
            name: b.name().to_string(),
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(a
        .residues()
        .iter()
        .zip(b.residues())
        .enumerate()
        .filter(|(_, (x, y))| x.amino_acid != y.amino_acid)
        .map(|(i, _)| i)
        .collect())
}

/// For every residue, the distance to the nearest substituted position.
///
/// Each residue-to-site distance is averaged over both structures. Distances that are
/// `NaN` (missing coordinates) are skipped; a residue with no finite distance to any
/// site, or any residue when the sequences are identical, gets `NaN`.
#[instrument(skip_all, name = "substitution_distances", fields(a = %a.name(), b = %b.name()))]
pub fn distance_from_substitutions(a: &Structure, b: &Structure) -> Result<Vec<f64>, EngineError> {
    let sites = substitution_sites(a, b)?;
    debug!(sites = sites.len(), "Located substituted positions.");
    if sites.is_empty() {
        return Ok(vec![f64::NAN; a.len()]);
    }

    let dist_a = distance_matrix(&a.coordinates());
    let dist_b = distance_matrix(&b.coordinates());

    Ok((0..a.len())
        .map(|i| {
            sites
                .iter()
                .map(|&s| 0.5 * (dist_a[(i, s)] + dist_b[(i, s)]))
                .filter(|d| !d.is_nan())
                .reduce(f64::min)
                .unwrap_or(f64::NAN)
        })
        .collect())
}
