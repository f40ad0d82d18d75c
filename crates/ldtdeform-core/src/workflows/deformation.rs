use crate::core::models::structure::Structure;
use crate::engine::config::{DeformationConfig, NeighborConfig};
use crate::engine::error::EngineError;
use crate::engine::local::{AnalyzedStructure, LocalGeometry};
use crate::engine::metrics::{Metric, score_residue};
use crate::engine::progress::{Phase, Progress, ProgressReporter};
use crate::engine::result::DeformationResult;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Scores every residue of `target` against `reference` for the configured metrics.
///
/// Either side may be a single analyzed structure or an ensemble consensus. Residues
/// lacking comparable data score `NaN`; only a length mismatch is an error, and it is
/// raised before any residue is scored.
#[instrument(
    skip_all,
    name = "deformation_workflow",
    fields(reference = reference.label(), target = target.label())
)]
pub fn run<R, T>(
    reference: &R,
    target: &T,
    config: &DeformationConfig,
    reporter: &ProgressReporter,
) -> Result<DeformationResult, EngineError>
where
    R: LocalGeometry + ?Sized,
    T: LocalGeometry + ?Sized,
{
    ensure_same_length(reference.label(), reference.len(), target.label(), target.len())?;

    let metrics = config.metrics.metrics();
    let n = reference.len();

    let result = reporter.phase(Phase::Scoring, || {
        info!(residues = n, metrics = ?metrics, "Scoring local deformation.");
        reporter.report(Progress::TaskStart {
            total_residues: n as u64,
        });

        #[cfg(not(feature = "parallel"))]
        let residues = 0..n;

        #[cfg(feature = "parallel")]
        let residues = (0..n).into_par_iter();

        let rows: Vec<Vec<f64>> = residues
            .map(|i| {
                let row = score_residue(reference, target, i, &metrics, config);
                reporter.report(Progress::TaskIncrement);
                row
            })
            .collect();
        reporter.report(Progress::TaskFinish);
        assemble(&metrics, rows, n)
    });

    for (metric, values) in result.iter() {
        debug!(
            metric = %metric,
            undefined = values.iter().filter(|v| v.is_nan()).count(),
            "Metric scored."
        );
    }

    Ok(result)
}

/// Derives local environments for two structures and scores `target` against `reference`.
#[instrument(
    skip_all,
    name = "structure_comparison",
    fields(reference = %reference.name(), target = %target.name())
)]
pub fn compare(
    reference: &Structure,
    target: &Structure,
    neighbors: &NeighborConfig,
    config: &DeformationConfig,
    reporter: &ProgressReporter,
) -> Result<DeformationResult, EngineError> {
    ensure_same_length(reference.name(), reference.len(), target.name(), target.len())?;

    let (reference, target) = reporter.phase(Phase::LocalEnvironments, || {
        Ok::<_, EngineError>((
            AnalyzedStructure::new(reference.clone(), neighbors)?,
            AnalyzedStructure::new(target.clone(), neighbors)?,
        ))
    })?;

    run(&reference, &target, config, reporter)
}

fn ensure_same_length(
    reference: &str,
    expected: usize,
    target: &str,
    found: usize,
) -> Result<(), EngineError> {
    if expected != found {
        debug!(reference, target, expected, found, "Rejecting comparison of unequal lengths.");
        return Err(EngineError::LengthMismatch {
            name: target.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

fn assemble(metrics: &[Metric], rows: Vec<Vec<f64>>, n: usize) -> DeformationResult {
    let mut columns = vec![Vec::with_capacity(n); metrics.len()];
    for row in rows {
        for (column, value) in columns.iter_mut().zip(row) {
            column.push(value);
        }
    }
    let scores: BTreeMap<Metric, Vec<f64>> = metrics.iter().copied().zip(columns).collect();
    DeformationResult::from_scores(scores)
}
