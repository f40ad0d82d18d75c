use super::metrics::Metric;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Standard lDDT tolerance bins, in Angstroms.
pub const DEFAULT_LDDT_BINS: [f64; 4] = [0.5, 1.0, 2.0, 4.0];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },

    #[error("Unknown deformation metric: '{0}'")]
    UnknownMetric(String),

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// Parameters of the per-residue neighbor search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborConfig {
    /// Maximum C-alpha distance (Angstroms, inclusive) between neighbors.
    pub cutoff: f64,
    /// Minimum quality both residues need under the model filtering policy.
    pub quality_threshold: f64,
}

impl NeighborConfig {
    pub fn new(cutoff: f64, quality_threshold: f64) -> Self {
        Self {
            cutoff,
            quality_threshold,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cutoff.is_finite() || self.cutoff <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "cutoff",
                reason: format!("must be a positive finite distance, got {}", self.cutoff),
            });
        }
        if self.quality_threshold.is_nan() {
            return Err(ConfigError::InvalidParameter {
                parameter: "quality_threshold",
                reason: "must not be NaN".to_string(),
            });
        }
        Ok(())
    }
}

/// How a summed per-neighbor quantity is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    /// The raw sum (or norm) over shared neighbors.
    Total,
    /// The raw value divided by the number of shared neighbors.
    PerNeighbor,
}

impl Normalization {
    #[inline]
    pub fn apply(self, value: f64, shared_neighbors: usize) -> f64 {
        match self {
            Normalization::Total => value,
            Normalization::PerNeighbor => value / shared_neighbors as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricSelection {
    All,
    Only(Vec<Metric>),
}

impl MetricSelection {
    /// Selected metrics in canonical order, without duplicates.
    pub fn metrics(&self) -> Vec<Metric> {
        Metric::ALL
            .into_iter()
            .filter(|m| self.includes(*m))
            .collect()
    }

    pub fn includes(&self, metric: Metric) -> bool {
        match self {
            MetricSelection::All => true,
            MetricSelection::Only(list) => list.contains(&metric),
        }
    }
}

impl FromStr for MetricSelection {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(MetricSelection::All);
        }
        let metrics = s
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<Metric>, _>>()?;
        Ok(MetricSelection::Only(metrics))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeformationConfig {
    pub metrics: MetricSelection,
    pub lddt_bins: Vec<f64>,
    pub ldd_normalization: Normalization,
    pub ntd_normalization: Normalization,
    pub strain_normalization: Normalization,
}

#[derive(Default)]
pub struct DeformationConfigBuilder {
    metrics: Option<MetricSelection>,
    lddt_bins: Option<Vec<f64>>,
    ldd_normalization: Option<Normalization>,
    ntd_normalization: Option<Normalization>,
    strain_normalization: Option<Normalization>,
}

impl DeformationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(mut self, selection: MetricSelection) -> Self {
        self.metrics = Some(selection);
        self
    }
    pub fn lddt_bins(mut self, bins: Vec<f64>) -> Self {
        self.lddt_bins = Some(bins);
        self
    }
    /// Sets the same mode for `ldd`, `ntd` and `strain`.
    pub fn normalization(mut self, mode: Normalization) -> Self {
        self.ldd_normalization = Some(mode);
        self.ntd_normalization = Some(mode);
        self.strain_normalization = Some(mode);
        self
    }
    pub fn ldd_normalization(mut self, mode: Normalization) -> Self {
        self.ldd_normalization = Some(mode);
        self
    }
    pub fn ntd_normalization(mut self, mode: Normalization) -> Self {
        self.ntd_normalization = Some(mode);
        self
    }
    pub fn strain_normalization(mut self, mode: Normalization) -> Self {
        self.strain_normalization = Some(mode);
        self
    }

    pub fn build(self) -> Result<DeformationConfig, ConfigError> {
        let lddt_bins = self
            .lddt_bins
            .unwrap_or_else(|| DEFAULT_LDDT_BINS.to_vec());
        if lddt_bins.is_empty() {
            return Err(ConfigError::InvalidParameter {
                parameter: "lddt_bins",
                reason: "at least one tolerance bin is required".to_string(),
            });
        }
        if let Some(bad) = lddt_bins.iter().find(|b| !b.is_finite() || **b <= 0.0) {
            return Err(ConfigError::InvalidParameter {
                parameter: "lddt_bins",
                reason: format!("bins must be positive finite distances, got {}", bad),
            });
        }

        Ok(DeformationConfig {
            metrics: self
                .metrics
                .ok_or(ConfigError::MissingParameter("metrics"))?,
            lddt_bins,
            ldd_normalization: self
                .ldd_normalization
                .ok_or(ConfigError::MissingParameter("ldd_normalization"))?,
            ntd_normalization: self
                .ntd_normalization
                .ok_or(ConfigError::MissingParameter("ntd_normalization"))?,
            strain_normalization: self
                .strain_normalization
                .ok_or(ConfigError::MissingParameter("strain_normalization"))?,
        })
    }
}

/// Neighbor search and deformation settings loaded together from TOML.
///
/// ```toml
/// [neighbors]
/// cutoff = 10.0
/// quality-threshold = 70.0
///
/// [deformation]
/// metrics = "all"            # or a list, e.g. ["lddt", "shear"]
/// lddt-bins = [0.5, 1.0, 2.0, 4.0]
/// normalization = "per-neighbor"
/// ldd-normalization = "total"  # per-metric override
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub neighbors: NeighborConfig,
    pub deformation: DeformationConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
enum PartialMetricSelection {
    Keyword(String),
    List(Vec<Metric>),
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialNeighborConfig {
    cutoff: Option<f64>,
    #[serde(rename = "quality-threshold")]
    quality_threshold: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialDeformationConfig {
    metrics: Option<PartialMetricSelection>,
    #[serde(rename = "lddt-bins")]
    lddt_bins: Option<Vec<f64>>,
    normalization: Option<Normalization>,
    #[serde(rename = "ldd-normalization")]
    ldd_normalization: Option<Normalization>,
    #[serde(rename = "ntd-normalization")]
    ntd_normalization: Option<Normalization>,
    #[serde(rename = "strain-normalization")]
    strain_normalization: Option<Normalization>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialAnalysisConfig {
    neighbors: Option<PartialNeighborConfig>,
    deformation: Option<PartialDeformationConfig>,
}

impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading analysis configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let partial: PartialAnalysisConfig =
            toml::from_str(content).map_err(|e| ConfigError::Toml {
                path: origin.to_string(),
                source: e,
            })?;

        let neighbors_partial = partial.neighbors.unwrap_or_default();
        let neighbors = NeighborConfig {
            cutoff: neighbors_partial
                .cutoff
                .ok_or(ConfigError::MissingParameter("neighbors.cutoff"))?,
            quality_threshold: neighbors_partial.quality_threshold.unwrap_or(0.0),
        };
        neighbors.validate()?;

        let deformation_partial = partial.deformation.unwrap_or_default();
        let mut builder = DeformationConfigBuilder::new();
        if let Some(metrics) = deformation_partial.metrics {
            builder = builder.metrics(match metrics {
                PartialMetricSelection::Keyword(keyword) => keyword.parse()?,
                PartialMetricSelection::List(list) => MetricSelection::Only(list),
            });
        }
        if let Some(bins) = deformation_partial.lddt_bins {
            builder = builder.lddt_bins(bins);
        }
        if let Some(mode) = deformation_partial.normalization {
            builder = builder.normalization(mode);
        }
        if let Some(mode) = deformation_partial.ldd_normalization {
            builder = builder.ldd_normalization(mode);
        }
        if let Some(mode) = deformation_partial.ntd_normalization {
            builder = builder.ntd_normalization(mode);
        }
        if let Some(mode) = deformation_partial.strain_normalization {
            builder = builder.strain_normalization(mode);
        }

        Ok(Self {
            neighbors,
            deformation: builder.build()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builder_requires_explicit_normalization() {
        let result = DeformationConfigBuilder::new()
            .metrics(MetricSelection::All)
            .ntd_normalization(Normalization::Total)
            .strain_normalization(Normalization::Total)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingParameter("ldd_normalization"))
        ));
    }

    #[test]
    fn builder_requires_metric_selection() {
        let result = DeformationConfigBuilder::new()
            .normalization(Normalization::Total)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingParameter("metrics"))
        ));
    }

    #[test]
    fn builder_defaults_to_standard_lddt_bins() {
        let config = DeformationConfigBuilder::new()
            .metrics(MetricSelection::All)
            .normalization(Normalization::PerNeighbor)
            .build()
            .unwrap();
        assert_eq!(config.lddt_bins, DEFAULT_LDDT_BINS.to_vec());
        assert_eq!(config.ldd_normalization, Normalization::PerNeighbor);
        assert_eq!(config.strain_normalization, Normalization::PerNeighbor);
    }

    #[test]
    fn builder_rejects_empty_or_non_positive_bins() {
        let empty = DeformationConfigBuilder::new()
            .metrics(MetricSelection::All)
            .normalization(Normalization::Total)
            .lddt_bins(vec![])
            .build();
        assert!(matches!(
            empty,
            Err(ConfigError::InvalidParameter {
                parameter: "lddt_bins",
                ..
            })
        ));
        let negative = DeformationConfigBuilder::new()
            .metrics(MetricSelection::All)
            .normalization(Normalization::Total)
            .lddt_bins(vec![1.0, -2.0])
            .build();
        assert!(negative.is_err());
    }

    #[test]
    fn per_metric_override_wins_over_shared_mode() {
        let config = DeformationConfigBuilder::new()
            .metrics(MetricSelection::All)
            .normalization(Normalization::Total)
            .ldd_normalization(Normalization::PerNeighbor)
            .build()
            .unwrap();
        assert_eq!(config.ldd_normalization, Normalization::PerNeighbor);
        assert_eq!(config.ntd_normalization, Normalization::Total);
    }

    #[test]
    fn normalization_apply_divides_only_per_neighbor() {
        assert_eq!(Normalization::Total.apply(6.0, 3), 6.0);
        assert_eq!(Normalization::PerNeighbor.apply(6.0, 3), 2.0);
    }

    #[test]
    fn neighbor_config_rejects_invalid_cutoff() {
        assert!(NeighborConfig::new(0.0, 0.0).validate().is_err());
        assert!(NeighborConfig::new(f64::INFINITY, 0.0).validate().is_err());
        assert!(NeighborConfig::new(8.0, f64::NAN).validate().is_err());
        assert!(NeighborConfig::new(8.0, 70.0).validate().is_ok());
    }

    #[test]
    fn metric_selection_parses_keyword_and_lists() {
        assert_eq!(
            "all".parse::<MetricSelection>().unwrap(),
            MetricSelection::All
        );
        assert_eq!(
            "shear, lddt".parse::<MetricSelection>().unwrap(),
            MetricSelection::Only(vec![Metric::Shear, Metric::Lddt])
        );
        assert!(matches!(
            "lddt,rmsd".parse::<MetricSelection>(),
            Err(ConfigError::UnknownMetric(_))
        ));
    }

    #[test]
    fn metric_selection_lists_metrics_in_canonical_order() {
        let selection = MetricSelection::Only(vec![Metric::Strain, Metric::Lddt, Metric::Strain]);
        assert_eq!(selection.metrics(), vec![Metric::Lddt, Metric::Strain]);
        assert_eq!(MetricSelection::All.metrics(), Metric::ALL.to_vec());
    }

    #[test]
    fn from_toml_str_reads_full_configuration() {
        let toml = r#"
            [neighbors]
            cutoff = 10.0
            quality-threshold = 70.0

            [deformation]
            metrics = ["lddt", "strain"]
            lddt-bins = [1.0, 2.0]
            normalization = "per-neighbor"
            ldd-normalization = "total"
        "#;
        let config = AnalysisConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.neighbors, NeighborConfig::new(10.0, 70.0));
        assert_eq!(
            config.deformation.metrics,
            MetricSelection::Only(vec![Metric::Lddt, Metric::Strain])
        );
        assert_eq!(config.deformation.lddt_bins, vec![1.0, 2.0]);
        assert_eq!(config.deformation.ldd_normalization, Normalization::Total);
        assert_eq!(
            config.deformation.ntd_normalization,
            Normalization::PerNeighbor
        );
    }

    #[test]
    fn from_toml_str_accepts_all_keyword_and_default_threshold() {
        let toml = r#"
            [neighbors]
            cutoff = 8.0

            [deformation]
            metrics = "all"
            normalization = "total"
        "#;
        let config = AnalysisConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.neighbors.quality_threshold, 0.0);
        assert_eq!(config.deformation.metrics, MetricSelection::All);
    }

    #[test]
    fn from_toml_str_requires_cutoff_and_normalization() {
        let missing_cutoff = AnalysisConfig::from_toml_str(
            "[deformation]\nmetrics = \"all\"\nnormalization = \"total\"\n",
        );
        assert!(matches!(
            missing_cutoff,
            Err(ConfigError::MissingParameter("neighbors.cutoff"))
        ));

        let missing_mode = AnalysisConfig::from_toml_str(
            "[neighbors]\ncutoff = 8.0\n[deformation]\nmetrics = \"all\"\n",
        );
        assert!(matches!(
            missing_mode,
            Err(ConfigError::MissingParameter(_))
        ));
    }

    #[test]
    fn from_toml_str_rejects_unknown_fields() {
        let result = AnalysisConfig::from_toml_str("[neighbors]\ncutoff = 8.0\nradius = 3.0\n");
        assert!(matches!(result, Err(ConfigError::Toml { .. })));
    }

    #[test]
    fn from_file_reads_configuration_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            concat!(
                "[neighbors]\ncutoff = 12.0\n",
                "[deformation]\nmetrics = \"shear\"\nnormalization = \"total\""
            )
        )
        .unwrap();
        let config = AnalysisConfig::from_file(file.path()).unwrap();
        assert_eq!(config.neighbors.cutoff, 12.0);
        assert_eq!(
            config.deformation.metrics,
            MetricSelection::Only(vec![Metric::Shear])
        );
    }

    #[test]
    fn from_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = AnalysisConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
