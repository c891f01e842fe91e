//! Optional TOML configuration file.
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! standard gene-network constants:
//!
//! ```toml
//! [data_points]
//! time_points = 58
//! slices = 8
//! extra_points = 30
//!
//! [plots]
//! enabled = true
//! width = 1024
//! height = 768
//! objective_labels = ["f_0", "f_1", "f_2", "f_3"]
//! ```

use crate::plot::ChartStyle;
use crate::settings::{
    data_points, ConfigError, Settings, SettingsBuilder, DEFAULT_EXTRA_POINTS, DEFAULT_SLICES,
    DEFAULT_TIME_POINTS,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Normalization constants of the fitted data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPointsConfig {
    /// Time samples per embryo slice.
    #[serde(default = "DataPointsConfig::default_time_points")]
    pub time_points: u32,
    /// Embryo slices.
    #[serde(default = "DataPointsConfig::default_slices")]
    pub slices: u32,
    /// Extra scored data points.
    #[serde(default = "DataPointsConfig::default_extra_points")]
    pub extra_points: u32,
    /// Overrides `time_points * slices + extra_points`.
    #[serde(default)]
    pub gene: Option<f64>,
    /// Overrides `objectives * gene`.
    #[serde(default)]
    pub total: Option<f64>,
}

impl DataPointsConfig {
    fn default_time_points() -> u32 {
        DEFAULT_TIME_POINTS
    }
    fn default_slices() -> u32 {
        DEFAULT_SLICES
    }
    fn default_extra_points() -> u32 {
        DEFAULT_EXTRA_POINTS
    }

    /// Per-objective data points after applying the override.
    #[must_use]
    pub fn gene_data_points(&self) -> f64 {
        self.gene
            .unwrap_or_else(|| data_points(self.time_points, self.slices, self.extra_points))
    }
}

impl Default for DataPointsConfig {
    fn default() -> Self {
        Self {
            time_points: Self::default_time_points(),
            slices: Self::default_slices(),
            extra_points: Self::default_extra_points(),
            gene: None,
            total: None,
        }
    }
}

/// Chart output options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Whether charts are rendered at all.
    #[serde(default = "PlotConfig::default_enabled")]
    pub enabled: bool,
    /// Image width in pixels.
    #[serde(default = "PlotConfig::default_width")]
    pub width: u32,
    /// Image height in pixels.
    #[serde(default = "PlotConfig::default_height")]
    pub height: u32,
    /// Axis labels, one per objective.
    #[serde(default)]
    pub objective_labels: Vec<String>,
}

impl PlotConfig {
    fn default_enabled() -> bool {
        true
    }
    fn default_width() -> u32 {
        1024
    }
    fn default_height() -> u32 {
        768
    }

    /// Chart style for the bitmap renderer.
    #[must_use]
    pub fn style(&self) -> ChartStyle {
        ChartStyle {
            width: self.width,
            height: self.height,
            objective_labels: self.objective_labels.clone(),
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            width: Self::default_width(),
            height: Self::default_height(),
            objective_labels: Vec::new(),
        }
    }
}

/// Data-point values given on the command line. Set values win over the file.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DataPointOverrides {
    /// Per-objective data points (`--gndp`).
    pub gene: Option<f64>,
    /// Total data points (`--tndp`).
    pub total: Option<f64>,
}

/// Contents of the configuration file.
///
/// # Examples
/// ```
/// use grn_pareto::FileConfig;
/// let config = FileConfig::from_toml_str("[data_points]\nextra_points = 0\n", "inline").unwrap();
/// assert_eq!(config.data_points.gene_data_points(), 464.0);
/// assert!(config.plots.enabled);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    /// Normalization constants.
    #[serde(default)]
    pub data_points: DataPointsConfig,
    /// Chart options.
    #[serde(default)]
    pub plots: PlotConfig,
}

impl FileConfig {
    /// Parses configuration text. `origin` names the source in errors.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] when the text is not valid.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|err| ConfigError::Parse {
            path: origin.to_string(),
            message: err.to_string(),
        })
    }

    /// Loads the configuration file at `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is not valid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    /// Applies the data-point constants to a settings builder.
    #[must_use]
    pub fn apply(&self, builder: SettingsBuilder) -> SettingsBuilder {
        let builder = builder.gene_data_points(self.data_points.gene_data_points());
        match self.data_points.total {
            Some(total) => builder.total_data_points(total),
            None => builder,
        }
    }

    /// Builds the run settings from the run dimensions, this file and the
    /// command-line overrides.
    ///
    /// Without an explicit total from either source, the total is derived
    /// from the final per-objective value.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the resulting settings are invalid.
    ///
    /// # Examples
    /// ```
    /// use grn_pareto::config::{DataPointOverrides, FileConfig};
    /// let overrides = DataPointOverrides { gene: Some(10.0), total: None };
    /// let settings = FileConfig::default().settings(2, 50, 10, overrides).unwrap();
    /// assert_eq!(settings.total_data_points(), 20.0);
    /// ```
    pub fn settings(
        &self,
        objectives: usize,
        population_size: usize,
        generations: usize,
        overrides: DataPointOverrides,
    ) -> Result<Settings, ConfigError> {
        let mut builder = self.apply(
            Settings::builder()
                .objectives(objectives)
                .population_size(population_size)
                .generations(generations),
        );
        if let Some(gene) = overrides.gene {
            builder = builder.gene_data_points(gene);
        }
        if let Some(total) = overrides.total {
            builder = builder.total_data_points(total);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config = FileConfig::from_toml_str("", "empty").unwrap();
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.data_points.gene_data_points(), 494.0);
        assert_eq!(config.plots.style(), ChartStyle::default());
    }

    #[test]
    fn overrides_reach_settings() {
        let text = "[data_points]\ngene = 10.0\ntotal = 25.0\n\n[plots]\nobjective_labels = [\"hb\", \"kr\"]\n";
        let config = FileConfig::from_toml_str(text, "inline").unwrap();
        let settings = config
            .apply(Settings::builder().objectives(2))
            .build()
            .unwrap();
        assert_eq!(settings.gene_data_points(), 10.0);
        assert_eq!(settings.total_data_points(), 25.0);
        assert_eq!(config.plots.style().label(1), "kr");
    }

    #[test]
    fn gene_override_rederives_the_total() {
        let config = FileConfig::from_toml_str("[data_points]\ngene = 10.0\n", "inline").unwrap();
        let overrides = DataPointOverrides {
            gene: Some(5.0),
            total: None,
        };
        let settings = config.settings(3, 4, 2, overrides).unwrap();
        assert_eq!(settings.gene_data_points(), 5.0);
        assert_eq!(settings.total_data_points(), 15.0);
        assert_eq!(settings.expected_rows(), 8);
    }

    #[test]
    fn file_total_survives_a_gene_override() {
        let config = FileConfig::from_toml_str("[data_points]\ntotal = 25.0\n", "inline").unwrap();
        let overrides = DataPointOverrides {
            gene: Some(5.0),
            total: None,
        };
        let settings = config.settings(2, 1, 1, overrides).unwrap();
        assert_eq!(settings.gene_data_points(), 5.0);
        assert_eq!(settings.total_data_points(), 25.0);
    }

    #[test]
    fn command_line_values_win_over_the_file() {
        let config =
            FileConfig::from_toml_str("[data_points]\ngene = 10.0\ntotal = 25.0\n", "inline").unwrap();
        let overrides = DataPointOverrides {
            gene: Some(2.0),
            total: Some(3.0),
        };
        let settings = config.settings(2, 1, 1, overrides).unwrap();
        assert_eq!(settings.gene_data_points(), 2.0);
        assert_eq!(settings.total_data_points(), 3.0);
    }

    #[test]
    fn without_overrides_the_file_decides() {
        let config = FileConfig::from_toml_str("[data_points]\nextra_points = 0\n", "inline").unwrap();
        let settings = config
            .settings(1, 1, 1, DataPointOverrides::default())
            .unwrap();
        assert_eq!(settings.gene_data_points(), 464.0);
        assert_eq!(settings.total_data_points(), 464.0);
    }

    #[test]
    fn invalid_overrides_are_config_errors() {
        let overrides = DataPointOverrides {
            gene: Some(-1.0),
            total: None,
        };
        let err = FileConfig::default().settings(1, 1, 1, overrides).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDataPoints { name: "gene", .. }));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = FileConfig::from_toml_str("[data_points\n", "broken.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == "broken.toml"));
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[plots]\nenabled = false").unwrap();
        let config = FileConfig::load(file.path()).unwrap();
        assert!(!config.plots.enabled);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = FileConfig::load("/nonexistent/grn-pareto.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
