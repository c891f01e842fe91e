//! The statistics engine.
//!
//! [`analyze`] is a single pure pass over a [`RunTable`]: it partitions the
//! rows into generations, normalizes them, aggregates every generation and
//! ranks the final population. Nothing is written anywhere; see
//! [`crate::report`] and [`crate::plot`] for the consumers of [`Analysis`].

use crate::core::rms::{normalize, ObjectiveRms, TotalRms};
use crate::core::stats::RunStats;
use crate::core::{RunTable, ShapeError, TableError};
use crate::input::ParseError;
use crate::plot::RenderError;
use crate::ranking::{FinalGeneration, Ranking};
use crate::settings::{ConfigError, Settings};
use log::{debug, info};
use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Errors produced by the analysis pipeline.
#[derive(Debug)]
pub enum AnalysisError {
    /// Invalid settings or configuration file.
    Config(ConfigError),
    /// The table does not match the run dimensions.
    Shape(ShapeError),
    /// The input text could not be parsed.
    Parse(ParseError),
    /// A score was negative, infinite or `NaN`.
    InvalidScore {
        /// Zero-based index of the data row.
        row: usize,
        /// Zero-based objective column.
        column: usize,
        /// Offending value.
        value: f64,
    },
    /// Reading the input or writing an output failed.
    Io(std::io::Error),
    /// A chart could not be rendered.
    Render(RenderError),
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Shape(err) => write!(f, "{err}"),
            Self::Parse(err) => write!(f, "{err}"),
            Self::InvalidScore { row, column, value } => write!(
                f,
                "score at row {row}, column {column} must be finite and non-negative (received {value})"
            ),
            Self::Io(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AnalysisError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Shape(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::InvalidScore { .. } => None,
            Self::Io(err) => Some(err),
            Self::Render(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AnalysisError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ShapeError> for AnalysisError {
    fn from(err: ShapeError) -> Self {
        Self::Shape(err)
    }
}

impl From<ParseError> for AnalysisError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<TableError> for AnalysisError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::Shape(err) => Self::Shape(err),
            TableError::InvalidScore { row, column, value } => {
                Self::InvalidScore { row, column, value }
            }
        }
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<RenderError> for AnalysisError {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}

/// Every quantity derived from one run table.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    settings: Settings,
    objective_rms: ObjectiveRms,
    total_rms: TotalRms,
    stats: RunStats,
    final_generation: FinalGeneration,
    ranking: Ranking,
}

impl Analysis {
    /// Settings the analysis was computed with.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Per-objective RMS for every generation.
    #[must_use]
    pub fn objective_rms(&self) -> &ObjectiveRms {
        &self.objective_rms
    }

    /// Total RMS for every generation.
    #[must_use]
    pub fn total_rms(&self) -> &TotalRms {
        &self.total_rms
    }

    /// Per-generation convergence statistics.
    #[must_use]
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// RMS values of the last generation.
    #[must_use]
    pub fn final_generation(&self) -> &FinalGeneration {
        &self.final_generation
    }

    /// Orderings of the last generation.
    #[must_use]
    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }
}

/// Runs the statistics engine.
///
/// # Errors
/// Returns [`AnalysisError::Shape`] when the table cannot be partitioned
/// into `generations` blocks of `population_size` rows with the configured
/// number of objectives.
///
/// # Examples
/// ```
/// use grn_pareto::{analyze, RunTable, Settings};
/// let table = RunTable::from_rows(&[[10.0, 10.0], [0.0, 0.0], [40.0, 10.0]], 2).unwrap();
/// let settings = Settings::builder()
///     .objectives(2)
///     .population_size(3)
///     .generations(1)
///     .gene_data_points(10.0)
///     .total_data_points(20.0)
///     .build()
///     .unwrap();
/// let analysis = analyze(&table, &settings).unwrap();
/// assert_eq!(analysis.ranking().by_total_rms, vec![1, 0, 2]);
/// ```
pub fn analyze(table: &RunTable, settings: &Settings) -> Result<Analysis, AnalysisError> {
    let normalized = normalize(table, settings)?;
    let stats = RunStats::compute(&normalized.objective_rms, &normalized.total_rms);
    for (generation, summary) in stats.iter().enumerate() {
        debug!(
            "generation {generation}: total rms min {:.4} mean {:.4} max {:.4}",
            summary.total.min, summary.total.mean, summary.total.max
        );
    }
    let final_generation = FinalGeneration::from_rms(&normalized.objective_rms, &normalized.total_rms);
    let ranking = Ranking::from_final(&final_generation);
    info!(
        "analyzed {} generations of {} individuals with {} objectives",
        settings.generations(),
        settings.population_size(),
        settings.objectives()
    );
    Ok(Analysis {
        settings: settings.clone(),
        objective_rms: normalized.objective_rms,
        total_rms: normalized.total_rms,
        stats,
        final_generation,
        ranking,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_errors_surface_as_shape() {
        let table = RunTable::from_rows(&[[1.0], [2.0]], 1).unwrap();
        let settings = Settings::builder().population_size(3).build().unwrap();
        let err = analyze(&table, &settings).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Shape(ShapeError::RowCount {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn table_errors_map_to_taxonomy() {
        let err: AnalysisError = TableError::InvalidScore {
            row: 2,
            column: 1,
            value: -1.0,
        }
        .into();
        assert!(matches!(err, AnalysisError::InvalidScore { row: 2, column: 1, .. }));
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn ranking_uses_last_generation_only() {
        let table = RunTable::from_rows(&[[0.0], [90.0], [40.0], [10.0]], 1).unwrap();
        let settings = Settings::builder()
            .population_size(2)
            .generations(2)
            .gene_data_points(10.0)
            .build()
            .unwrap();
        let analysis = analyze(&table, &settings).unwrap();
        assert_eq!(analysis.final_generation().total_rms(), &[2.0, 1.0]);
        assert_eq!(analysis.ranking().by_total_rms, vec![1, 0]);
        assert_eq!(analysis.stats().generations(), 2);
    }
}
