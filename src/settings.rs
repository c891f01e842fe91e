//! Analysis settings shared by every stage of the pipeline.
//!
//! [`Settings`] is an immutable value created through [`Settings::builder`].
//! The builder validates the run dimensions and the normalization
//! denominators once, so the engine never re-checks them.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Number of time samples per embryo slice in the fitted expression data.
pub const DEFAULT_TIME_POINTS: u32 = 58;
/// Number of embryo slices in the fitted expression data.
pub const DEFAULT_SLICES: u32 = 8;
/// Data points scored on top of the time/slice grid.
pub const DEFAULT_EXTRA_POINTS: u32 = 30;

/// Errors produced while assembling [`Settings`] or loading a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// The objective count was zero.
    InvalidObjectiveCount(usize),
    /// The population size was zero.
    InvalidPopulationSize(usize),
    /// The number of generations was zero.
    InvalidGenerationCount(usize),
    /// A normalization denominator was not finite and positive.
    InvalidDataPoints {
        /// Which denominator was rejected.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// `population_size * generations * objectives` does not fit in `usize`.
    DimensionsTooLarge {
        /// Requested population size.
        population_size: usize,
        /// Requested number of generations.
        generations: usize,
        /// Requested number of objectives.
        objectives: usize,
    },
    /// The configuration file could not be read.
    Read {
        /// Path of the configuration file.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The configuration file was not valid TOML for [`crate::FileConfig`].
    Parse {
        /// Path of the configuration file.
        path: String,
        /// Parser message.
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidObjectiveCount(count) => {
                write!(
                    f,
                    "number of objectives must be at least one (received {count})"
                )
            }
            Self::InvalidPopulationSize(size) => {
                write!(
                    f,
                    "population size must be greater than zero (received {size})"
                )
            }
            Self::InvalidGenerationCount(count) => {
                write!(
                    f,
                    "number of generations must be positive (received {count})"
                )
            }
            Self::InvalidDataPoints { name, value } => {
                write!(
                    f,
                    "{name} data points must be finite and positive (received {value})"
                )
            }
            Self::DimensionsTooLarge {
                population_size,
                generations,
                objectives,
            } => write!(
                f,
                "run of {generations} generations of {population_size} individuals with {objectives} objectives is too large"
            ),
            Self::Read { path, source } => write!(f, "failed to read config {path}: {source}"),
            Self::Parse { path, message } => write!(f, "failed to parse config {path}: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Returns the per-objective data-point count for the given grid.
///
/// # Examples
/// ```
/// assert_eq!(grn_pareto::settings::data_points(58, 8, 30), 494.0);
/// ```
#[must_use]
pub fn data_points(time_points: u32, slices: u32, extra_points: u32) -> f64 {
    f64::from(time_points) * f64::from(slices) + f64::from(extra_points)
}

/// Validated settings for one analysis run.
///
/// # Examples
/// ```
/// use grn_pareto::Settings;
/// let settings = Settings::builder()
///     .objectives(4)
///     .population_size(100)
///     .generations(50)
///     .build()
///     .unwrap();
/// assert_eq!(settings.gene_data_points(), 494.0);
/// assert_eq!(settings.total_data_points(), 4.0 * 494.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    objectives: usize,
    population_size: usize,
    generations: usize,
    expected_rows: usize,
    gene_data_points: f64,
    total_data_points: f64,
}

impl Settings {
    /// Creates a builder populated with the default data-point constants.
    #[must_use]
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Number of objective columns (`ngenes`).
    #[must_use]
    pub fn objectives(&self) -> usize {
        self.objectives
    }

    /// Number of individuals per generation.
    #[must_use]
    pub fn population_size(&self) -> usize {
        self.population_size
    }

    /// Number of generations in the run.
    #[must_use]
    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Per-objective normalization denominator (`gndp`).
    #[must_use]
    pub fn gene_data_points(&self) -> f64 {
        self.gene_data_points
    }

    /// Normalization denominator for the summed objectives (`tndp`).
    #[must_use]
    pub fn total_data_points(&self) -> f64 {
        self.total_data_points
    }

    /// Number of rows a complete run table must contain.
    #[must_use]
    pub fn expected_rows(&self) -> usize {
        self.expected_rows
    }
}

/// Builder used to configure [`Settings`].
#[derive(Debug, Clone)]
pub struct SettingsBuilder {
    objectives: usize,
    population_size: usize,
    generations: usize,
    gene_data_points: f64,
    total_data_points: Option<f64>,
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self {
            objectives: 1,
            population_size: 1,
            generations: 1,
            gene_data_points: data_points(
                DEFAULT_TIME_POINTS,
                DEFAULT_SLICES,
                DEFAULT_EXTRA_POINTS,
            ),
            total_data_points: None,
        }
    }
}

impl SettingsBuilder {
    /// Configures the number of objectives.
    #[must_use]
    pub fn objectives(mut self, objectives: usize) -> Self {
        self.objectives = objectives;
        self
    }

    /// Configures the population size.
    #[must_use]
    pub fn population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Configures the number of generations.
    #[must_use]
    pub fn generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Overrides the per-objective data-point count.
    #[must_use]
    pub fn gene_data_points(mut self, value: f64) -> Self {
        self.gene_data_points = value;
        self
    }

    /// Overrides the total data-point count. Defaults to
    /// `objectives * gene_data_points`.
    #[must_use]
    pub fn total_data_points(mut self, value: f64) -> Self {
        self.total_data_points = Some(value);
        self
    }

    /// Finalizes the builder.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a dimension is zero, the table size
    /// overflows `usize`, or a denominator is not finite and positive.
    ///
    /// # Examples
    /// ```
    /// use grn_pareto::{ConfigError, Settings};
    /// let err = Settings::builder().population_size(0).build().unwrap_err();
    /// assert!(matches!(err, ConfigError::InvalidPopulationSize(0)));
    /// ```
    pub fn build(self) -> Result<Settings, ConfigError> {
        if self.objectives == 0 {
            return Err(ConfigError::InvalidObjectiveCount(0));
        }
        if self.population_size == 0 {
            return Err(ConfigError::InvalidPopulationSize(0));
        }
        if self.generations == 0 {
            return Err(ConfigError::InvalidGenerationCount(0));
        }
        let expected_rows = self
            .population_size
            .checked_mul(self.generations)
            .filter(|rows| rows.checked_mul(self.objectives).is_some())
            .ok_or(ConfigError::DimensionsTooLarge {
                population_size: self.population_size,
                generations: self.generations,
                objectives: self.objectives,
            })?;
        validate_data_points("gene", self.gene_data_points)?;
        #[allow(clippy::cast_precision_loss)]
        let total = self
            .total_data_points
            .unwrap_or(self.objectives as f64 * self.gene_data_points);
        validate_data_points("total", total)?;
        Ok(Settings {
            objectives: self.objectives,
            population_size: self.population_size,
            generations: self.generations,
            expected_rows,
            gene_data_points: self.gene_data_points,
            total_data_points: total,
        })
    }
}

fn validate_data_points(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDataPoints { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_defaults_to_objectives_times_gene() {
        let settings = Settings::builder()
            .objectives(2)
            .gene_data_points(10.0)
            .build()
            .unwrap();
        assert_eq!(settings.total_data_points(), 20.0);
    }

    #[test]
    fn explicit_total_wins() {
        let settings = Settings::builder()
            .objectives(3)
            .gene_data_points(10.0)
            .total_data_points(7.0)
            .build()
            .unwrap();
        assert_eq!(settings.total_data_points(), 7.0);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let err = Settings::builder().objectives(0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidObjectiveCount(0)));
        let err = Settings::builder().generations(0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGenerationCount(0)));
    }

    #[test]
    fn non_positive_denominators_are_rejected() {
        let err = Settings::builder()
            .gene_data_points(0.0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidDataPoints { name: "gene", .. }
        ));
        let err = Settings::builder()
            .total_data_points(f64::NAN)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidDataPoints { name: "total", .. }
        ));
    }

    #[test]
    fn expected_rows_is_population_times_generations() {
        let settings = Settings::builder()
            .population_size(12)
            .generations(5)
            .build()
            .unwrap();
        assert_eq!(settings.expected_rows(), 60);
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        let err = Settings::builder()
            .population_size(1 << (usize::BITS - 1))
            .generations(2)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DimensionsTooLarge { generations: 2, .. }
        ));
        let err = Settings::builder()
            .objectives(4)
            .population_size(usize::MAX / 2)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DimensionsTooLarge { objectives: 4, .. }
        ));
    }
}
