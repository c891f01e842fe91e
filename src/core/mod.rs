//! Core data primitives for run analysis.
//!
//! [`RunTable`] stores the raw objective scores written by the optimizer, one
//! row per (generation, individual) pair in generation-major order. The
//! [`rms`] and [`stats`] sub-modules derive normalized scores and
//! per-generation summaries from it.

pub mod rms;
pub mod stats;

use crate::settings::Settings;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Raw objective score: a non-negative sum of squared errors.
pub type Score = f64;

/// Error returned when a table does not have the shape the run requires.
///
/// # Examples
/// ```
/// use grn_pareto::{RunTable, Settings, ShapeError};
/// let table = RunTable::from_rows(&[vec![1.0], vec![2.0]], 1).unwrap();
/// let settings = Settings::builder().population_size(3).build().unwrap();
/// let err = table.check_shape(&settings).unwrap_err();
/// assert_eq!(err, ShapeError::RowCount { expected: 3, found: 2 });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The number of rows is not `population_size * generations`.
    RowCount {
        /// Rows required by the settings.
        expected: usize,
        /// Rows present in the table.
        found: usize,
    },
    /// The table carries a different number of objective columns than the
    /// settings advertise.
    ColumnCount {
        /// Objective count from the settings.
        expected: usize,
        /// Objective count stored in the table.
        found: usize,
    },
    /// A data row holds fewer values than the objective count.
    ShortRow {
        /// Zero-based index of the data row.
        row: usize,
        /// Required number of leading columns.
        expected: usize,
        /// Number of columns present.
        found: usize,
    },
}

impl Display for ShapeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowCount { expected, found } => write!(
                f,
                "table has {found} rows but population size times generations is {expected}"
            ),
            Self::ColumnCount { expected, found } => write!(
                f,
                "table has {found} objective columns but {expected} were expected"
            ),
            Self::ShortRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {row} has {found} columns but at least {expected} objective columns are required"
            ),
        }
    }
}

impl Error for ShapeError {}

/// Errors produced while building a [`RunTable`].
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    /// The provided rows cannot form a table.
    Shape(ShapeError),
    /// A score was negative, infinite or `NaN`.
    InvalidScore {
        /// Zero-based index of the data row.
        row: usize,
        /// Zero-based objective column.
        column: usize,
        /// Offending value.
        value: Score,
    },
}

impl Display for TableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape(err) => write!(f, "{err}"),
            Self::InvalidScore { row, column, value } => write!(
                f,
                "score at row {row}, column {column} must be finite and non-negative (received {value})"
            ),
        }
    }
}

impl Error for TableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Shape(err) => Some(err),
            Self::InvalidScore { .. } => None,
        }
    }
}

impl From<ShapeError> for TableError {
    fn from(err: ShapeError) -> Self {
        Self::Shape(err)
    }
}

/// Raw objective scores for every individual of every generation.
///
/// # Examples
/// ```
/// use grn_pareto::RunTable;
/// let table = RunTable::from_rows(&[vec![1.0, 2.0, 99.0], vec![3.0, 4.0, 99.0]], 2).unwrap();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.row(1), &[3.0, 4.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RunTable {
    objectives: usize,
    scores: Vec<Score>,
}

impl RunTable {
    /// Builds a table from rows, keeping the first `objectives` columns of
    /// each row and ignoring the rest.
    ///
    /// # Errors
    /// Returns [`TableError::Shape`] when a row is shorter than
    /// `objectives` and [`TableError::InvalidScore`] when a kept value is
    /// negative or not finite.
    pub fn from_rows<R: AsRef<[Score]>>(rows: &[R], objectives: usize) -> Result<Self, TableError> {
        let mut scores = Vec::with_capacity(rows.len() * objectives);
        for (idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() < objectives {
                return Err(ShapeError::ShortRow {
                    row: idx,
                    expected: objectives,
                    found: row.len(),
                }
                .into());
            }
            scores.extend_from_slice(&row[..objectives]);
        }
        Self::from_flat(scores, objectives)
    }

    /// Builds a table from row-major scores.
    ///
    /// # Errors
    /// Returns [`TableError::Shape`] when the length is not a multiple of
    /// `objectives` and [`TableError::InvalidScore`] on a negative or
    /// non-finite value.
    ///
    /// # Examples
    /// ```
    /// use grn_pareto::{RunTable, TableError};
    /// let err = RunTable::from_flat(vec![1.0, -2.0], 2).unwrap_err();
    /// assert!(matches!(err, TableError::InvalidScore { row: 0, column: 1, .. }));
    /// ```
    pub fn from_flat(scores: Vec<Score>, objectives: usize) -> Result<Self, TableError> {
        if objectives == 0 {
            return Err(ShapeError::ColumnCount {
                expected: 1,
                found: 0,
            }
            .into());
        }
        if scores.len() % objectives != 0 {
            return Err(ShapeError::ShortRow {
                row: scores.len() / objectives,
                expected: objectives,
                found: scores.len() % objectives,
            }
            .into());
        }
        validate_scores(&scores, objectives)?;
        Ok(Self { objectives, scores })
    }

    /// Number of objective columns kept per row.
    #[must_use]
    pub fn objectives(&self) -> usize {
        self.objectives
    }

    /// Number of rows in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len() / self.objectives
    }

    /// Indicates whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Returns the scores of one row.
    ///
    /// # Panics
    /// Panics when `idx` is out of range.
    #[must_use]
    pub fn row(&self, idx: usize) -> &[Score] {
        &self.scores[idx * self.objectives..(idx + 1) * self.objectives]
    }

    /// Iterates over the rows in file order.
    pub fn rows(&self) -> impl Iterator<Item = &[Score]> {
        self.scores.chunks_exact(self.objectives)
    }

    /// Returns all scores in row-major order.
    #[must_use]
    pub fn scores(&self) -> &[Score] {
        &self.scores
    }

    /// Ensures the table can be partitioned into the generations described
    /// by `settings`.
    ///
    /// # Errors
    /// Returns [`ShapeError::ColumnCount`] when the objective counts differ
    /// and [`ShapeError::RowCount`] when the row count is not
    /// `population_size * generations`.
    pub fn check_shape(&self, settings: &Settings) -> Result<(), ShapeError> {
        if self.objectives != settings.objectives() {
            return Err(ShapeError::ColumnCount {
                expected: settings.objectives(),
                found: self.objectives,
            });
        }
        let expected = settings.expected_rows();
        if self.len() != expected {
            return Err(ShapeError::RowCount {
                expected,
                found: self.len(),
            });
        }
        Ok(())
    }

    /// Splits the table into contiguous generation blocks of
    /// `population_size` rows each, preserving file order.
    ///
    /// # Errors
    /// Propagates [`Self::check_shape`] failures.
    ///
    /// # Examples
    /// ```
    /// use grn_pareto::{RunTable, Settings};
    /// let table = RunTable::from_rows(&[[1.0], [2.0], [3.0], [4.0]], 1).unwrap();
    /// let settings = Settings::builder().population_size(2).generations(2).build().unwrap();
    /// let blocks: Vec<&[f64]> = table.generation_blocks(&settings).unwrap().collect();
    /// assert_eq!(blocks, vec![&[1.0, 2.0][..], &[3.0, 4.0][..]]);
    /// ```
    pub fn generation_blocks(
        &self,
        settings: &Settings,
    ) -> Result<std::slice::ChunksExact<'_, Score>, ShapeError> {
        self.check_shape(settings)?;
        Ok(self
            .scores
            .chunks_exact(settings.population_size() * self.objectives))
    }
}

fn validate_scores(scores: &[Score], objectives: usize) -> Result<(), TableError> {
    for (idx, value) in scores.iter().enumerate() {
        if !value.is_finite() || *value < 0.0 {
            return Err(TableError::InvalidScore {
                row: idx / objectives,
                column: idx % objectives,
                value: *value,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_columns_are_dropped() {
        let table = RunTable::from_rows(&[vec![1.0, 2.0, 3.0]], 2).unwrap();
        assert_eq!(table.scores(), &[1.0, 2.0]);
    }

    #[test]
    fn short_rows_are_rejected() {
        let err = RunTable::from_rows(&[vec![1.0, 2.0], vec![1.0]], 2).unwrap_err();
        assert_eq!(
            err,
            TableError::Shape(ShapeError::ShortRow {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn nan_and_negative_scores_are_rejected() {
        let err = RunTable::from_flat(vec![0.0, f64::NAN], 1).unwrap_err();
        assert!(matches!(
            err,
            TableError::InvalidScore { row: 1, column: 0, .. }
        ));
        let err = RunTable::from_flat(vec![-0.5], 1).unwrap_err();
        assert!(matches!(err, TableError::InvalidScore { row: 0, .. }));
    }

    #[test]
    fn ragged_flat_input_is_a_shape_error() {
        let err = RunTable::from_flat(vec![1.0, 2.0, 3.0], 2).unwrap_err();
        assert!(matches!(err, TableError::Shape(ShapeError::ShortRow { .. })));
    }

    #[test]
    fn row_count_must_match_settings() {
        let table = RunTable::from_rows(&[[1.0], [2.0], [3.0]], 1).unwrap();
        let settings = Settings::builder()
            .population_size(2)
            .generations(2)
            .build()
            .unwrap();
        assert_eq!(
            table.check_shape(&settings),
            Err(ShapeError::RowCount {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn column_count_must_match_settings() {
        let table = RunTable::from_rows(&[[1.0, 1.0]], 2).unwrap();
        let settings = Settings::builder().objectives(3).build().unwrap();
        assert!(matches!(
            table.check_shape(&settings),
            Err(ShapeError::ColumnCount {
                expected: 3,
                found: 2
            })
        ));
    }
}
