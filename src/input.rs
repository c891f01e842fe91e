//! Reader for the optimizer's population table.
//!
//! The optimizer writes one line per individual with tab-separated columns:
//! the objective scores first, followed by constraints, decision variables,
//! constraint violation, rank and crowding distance. Generation headers and
//! the column legend are written as `#` comment lines. Only the leading
//! objective columns are kept.

use crate::analysis::AnalysisError;
use crate::core::{RunTable, ShapeError};
use crate::settings::Settings;
use log::{debug, info};
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::Path;

/// A token in the input did not parse as a floating point number.
///
/// # Examples
/// ```
/// use grn_pareto::{parse_run_table, AnalysisError, Settings};
/// let settings = Settings::builder().population_size(2).build().unwrap();
/// let err = parse_run_table("1.0\nabc\n", &settings).unwrap_err();
/// match err {
///     AnalysisError::Parse(err) => assert_eq!((err.line, err.column), (2, 0)),
///     other => panic!("unexpected error {other}"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// One-based line number in the input.
    pub line: usize,
    /// Zero-based column of the token.
    pub column: usize,
    /// The offending token.
    pub token: String,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {}: '{}' is not a number",
            self.line, self.column, self.token
        )
    }
}

impl Error for ParseError {}

/// Parses a population table held in memory.
///
/// Blank lines and lines starting with `#` are skipped. Columns past the
/// objective count are ignored and not parsed.
///
/// # Errors
/// Returns [`AnalysisError::Parse`] for a non-numeric objective token,
/// [`AnalysisError::Shape`] when a line has too few columns or the row count
/// does not match `settings`, and [`AnalysisError::InvalidScore`] for
/// negative or non-finite scores.
///
/// # Examples
/// ```
/// use grn_pareto::{parse_run_table, Settings};
/// let settings = Settings::builder().objectives(2).population_size(2).build().unwrap();
/// let text = "# gen = 1\n1.0\t2.0\t0.5\t7\n3.0 4.0\n";
/// let table = parse_run_table(text, &settings).unwrap();
/// assert_eq!(table.row(1), &[3.0, 4.0]);
/// ```
pub fn parse_run_table(text: &str, settings: &Settings) -> Result<RunTable, AnalysisError> {
    let objectives = settings.objectives();
    let mut scores = Vec::new();
    let mut rows = 0usize;
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut found = 0usize;
        for (column, token) in trimmed.split_whitespace().take(objectives).enumerate() {
            let value = token.parse::<f64>().map_err(|_| ParseError {
                line: idx + 1,
                column,
                token: token.to_string(),
            })?;
            scores.push(value);
            found += 1;
        }
        if found < objectives {
            debug!("line {} has {found} columns", idx + 1);
            return Err(ShapeError::ShortRow {
                row: rows,
                expected: objectives,
                found,
            }
            .into());
        }
        rows += 1;
    }
    let table = RunTable::from_flat(scores, objectives)?;
    table.check_shape(settings)?;
    Ok(table)
}

/// Reads and parses a population table from disk.
///
/// # Errors
/// Returns [`AnalysisError::Io`] when the file cannot be read, otherwise the
/// errors of [`parse_run_table`].
pub fn read_run_table(path: impl AsRef<Path>, settings: &Settings) -> Result<RunTable, AnalysisError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let table = parse_run_table(&text, settings)?;
    info!("read {} rows from {}", table.len(), path.display());
    Ok(table)
}
