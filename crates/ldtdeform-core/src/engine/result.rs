use super::metrics::Metric;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-residue deformation scores keyed by metric.
///
/// Every score array has one entry per residue; `NaN` marks residues without enough
/// comparable data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeformationResult {
    scores: BTreeMap<Metric, Vec<f64>>,
}

impl DeformationResult {
    pub(crate) fn from_scores(scores: BTreeMap<Metric, Vec<f64>>) -> Self {
        Self { scores }
    }

    pub fn get(&self, metric: Metric) -> Option<&[f64]> {
        self.scores.get(&metric).map(Vec::as_slice)
    }

    /// Looks a metric up by its name (`"lddt"`, `"shear"`, ...).
    pub fn get_by_name(&self, name: &str) -> Option<&[f64]> {
        name.parse::<Metric>().ok().and_then(|m| self.get(m))
    }

    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.scores.keys().copied()
    }

    /// Number of residues covered by each score array.
    pub fn len(&self) -> usize {
        self.scores.values().next().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &[f64])> {
        self.scores.iter().map(|(m, v)| (*m, v.as_slice()))
    }
}
