//! Final-generation rankings.
//!
//! All three orderings are stable: individuals with equal keys keep their
//! original index order.

use crate::core::rms::{ObjectiveRms, TotalRms};
use std::cmp::Ordering;

/// RMS values of the last generation, one entry per individual.
///
/// # Examples
/// ```
/// use grn_pareto::{analyze, FinalGeneration, RunTable, Settings};
/// let table = RunTable::from_rows(&[[10.0, 40.0], [0.0, 0.0]], 2).unwrap();
/// let settings = Settings::builder()
///     .objectives(2)
///     .population_size(2)
///     .gene_data_points(10.0)
///     .build()
///     .unwrap();
/// let analysis = analyze(&table, &settings).unwrap();
/// let last: &FinalGeneration = analysis.final_generation();
/// assert_eq!(last.objective_rms(0), &[1.0, 2.0]);
/// assert_eq!(last.mean_objective_rms(), &[1.5, 0.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FinalGeneration {
    objectives: usize,
    objective_rms: Vec<f64>,
    total_rms: Vec<f64>,
    mean_objective_rms: Vec<f64>,
}

impl FinalGeneration {
    /// Extracts the last generation of a normalized run.
    ///
    /// # Panics
    /// Panics when the run has no generations.
    #[must_use]
    pub fn from_rms(objective_rms: &ObjectiveRms, total_rms: &TotalRms) -> Self {
        let (generations, _, objectives) = objective_rms.shape();
        let last = generations - 1;
        let block = objective_rms.generation(last).to_vec();
        #[allow(clippy::cast_precision_loss)]
        let mean_objective_rms = block
            .chunks_exact(objectives)
            .map(|row| row.iter().sum::<f64>() / objectives as f64)
            .collect();
        Self {
            objectives,
            objective_rms: block,
            total_rms: total_rms.generation(last).to_vec(),
            mean_objective_rms,
        }
    }

    /// Number of individuals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.total_rms.len()
    }

    /// Indicates whether the generation is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_rms.is_empty()
    }

    /// Number of objectives per individual.
    #[must_use]
    pub fn objectives(&self) -> usize {
        self.objectives
    }

    /// RMS vector of one individual.
    ///
    /// # Panics
    /// Panics when `individual` is out of range.
    #[must_use]
    pub fn objective_rms(&self, individual: usize) -> &[f64] {
        &self.objective_rms[individual * self.objectives..(individual + 1) * self.objectives]
    }

    /// Iterates over the RMS vectors in index order.
    pub fn objective_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.objective_rms.chunks_exact(self.objectives)
    }

    /// One objective across all individuals.
    #[must_use]
    pub fn objective_column(&self, objective: usize) -> Vec<f64> {
        self.objective_rows().map(|row| row[objective]).collect()
    }

    /// Total RMS per individual.
    #[must_use]
    pub fn total_rms(&self) -> &[f64] {
        &self.total_rms
    }

    /// Mean objective RMS per individual.
    #[must_use]
    pub fn mean_objective_rms(&self) -> &[f64] {
        &self.mean_objective_rms
    }
}

/// The three orderings reported for the final generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking {
    /// Ascending total RMS.
    pub by_total_rms: Vec<usize>,
    /// Ascending mean objective RMS.
    pub by_mean_objective_rms: Vec<usize>,
    /// Lexicographic over the objective RMS vector, last objective first.
    pub by_lexsort: Vec<usize>,
}

impl Ranking {
    /// Ranks the individuals of the final generation.
    #[must_use]
    pub fn from_final(last: &FinalGeneration) -> Self {
        Self {
            by_total_rms: argsort(last.total_rms()),
            by_mean_objective_rms: argsort(last.mean_objective_rms()),
            by_lexsort: lexsort_last_major(&last.objective_rms, last.objectives),
        }
    }
}

/// Indices that sort `values` ascending.
///
/// # Examples
/// ```
/// use grn_pareto::ranking::argsort;
/// assert_eq!(argsort(&[1.0, 0.0, 1.0, -1.0]), vec![3, 1, 0, 2]);
/// ```
#[must_use]
pub fn argsort(values: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    indices
}

/// Indices that sort row-major `rows` of `width` columns lexicographically,
/// comparing the last column first and the first column last.
///
/// # Examples
/// ```
/// use grn_pareto::ranking::lexsort_last_major;
/// let rows = [1.0, 5.0, 1.0, 2.0, 0.0, 9.0];
/// assert_eq!(lexsort_last_major(&rows, 2), vec![1, 0, 2]);
/// ```
///
/// # Panics
/// Panics when `width` is zero.
#[must_use]
pub fn lexsort_last_major(rows: &[f64], width: usize) -> Vec<usize> {
    let row = |idx: usize| &rows[idx * width..(idx + 1) * width];
    let mut indices: Vec<usize> = (0..rows.len() / width).collect();
    indices.sort_by(|&a, &b| {
        row(a)
            .iter()
            .rev()
            .zip(row(b).iter().rev())
            .map(|(lhs, rhs)| lhs.total_cmp(rhs))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
    indices
}
