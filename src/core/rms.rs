//! RMS normalization of raw objective scores.

use super::{RunTable, ShapeError};
use crate::settings::Settings;

/// Per-objective RMS values with shape (generation, individual, objective).
///
/// # Examples
/// ```
/// use grn_pareto::{normalize, RunTable, Settings};
/// let table = RunTable::from_rows(&[[40.0, 10.0]], 2).unwrap();
/// let settings = Settings::builder().objectives(2).gene_data_points(10.0).build().unwrap();
/// let normalized = normalize(&table, &settings).unwrap();
/// assert_eq!(normalized.objective_rms.individual(0, 0), &[2.0, 1.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveRms {
    generations: usize,
    population_size: usize,
    objectives: usize,
    values: Vec<f64>,
}

impl ObjectiveRms {
    /// Returns `(generations, population_size, objectives)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.generations, self.population_size, self.objectives)
    }

    /// Number of objectives per individual.
    #[must_use]
    pub fn objectives(&self) -> usize {
        self.objectives
    }

    /// RMS of one objective of one individual.
    ///
    /// # Panics
    /// Panics when an index is out of range.
    #[must_use]
    pub fn get(&self, generation: usize, individual: usize, objective: usize) -> f64 {
        self.individual(generation, individual)[objective]
    }

    /// RMS vector of one individual.
    ///
    /// # Panics
    /// Panics when an index is out of range.
    #[must_use]
    pub fn individual(&self, generation: usize, individual: usize) -> &[f64] {
        let start = (generation * self.population_size + individual) * self.objectives;
        &self.values[start..start + self.objectives]
    }

    /// Row-major block holding every individual of one generation.
    ///
    /// # Panics
    /// Panics when `generation` is out of range.
    #[must_use]
    pub fn generation(&self, generation: usize) -> &[f64] {
        let width = self.population_size * self.objectives;
        &self.values[generation * width..(generation + 1) * width]
    }

    /// Values of one objective across the population of one generation.
    pub fn objective_column(
        &self,
        generation: usize,
        objective: usize,
    ) -> impl Iterator<Item = f64> + '_ {
        self.generation(generation)
            .chunks_exact(self.objectives)
            .map(move |row| row[objective])
    }

    /// All values in (generation, individual, objective) order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// RMS of the summed objectives with shape (generation, individual).
#[derive(Debug, Clone, PartialEq)]
pub struct TotalRms {
    generations: usize,
    population_size: usize,
    values: Vec<f64>,
}

impl TotalRms {
    /// Returns `(generations, population_size)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.generations, self.population_size)
    }

    /// Total RMS of one individual.
    ///
    /// # Panics
    /// Panics when an index is out of range.
    #[must_use]
    pub fn get(&self, generation: usize, individual: usize) -> f64 {
        self.generation(generation)[individual]
    }

    /// Total RMS of every individual in one generation.
    ///
    /// # Panics
    /// Panics when `generation` is out of range.
    #[must_use]
    pub fn generation(&self, generation: usize) -> &[f64] {
        &self.values[generation * self.population_size..(generation + 1) * self.population_size]
    }

    /// All values in (generation, individual) order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Both RMS views of a run table.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// `sqrt(raw / gene_data_points)` per objective.
    pub objective_rms: ObjectiveRms,
    /// `sqrt(sum(raw) / total_data_points)` per individual.
    pub total_rms: TotalRms,
}

/// Partitions the table into generations and applies the RMS transforms.
///
/// # Errors
/// Returns [`ShapeError`] when the table does not match `settings`.
pub fn normalize(table: &RunTable, settings: &Settings) -> Result<Normalized, ShapeError> {
    let gene_data_points = settings.gene_data_points();
    let total_data_points = settings.total_data_points();
    let mut objective_values = Vec::with_capacity(table.scores().len());
    let mut total_values = Vec::with_capacity(table.len());
    for block in table.generation_blocks(settings)? {
        for row in block.chunks_exact(table.objectives()) {
            objective_values.extend(row.iter().map(|raw| (raw / gene_data_points).sqrt()));
            let sum: f64 = row.iter().sum();
            total_values.push((sum / total_data_points).sqrt());
        }
    }
    Ok(Normalized {
        objective_rms: ObjectiveRms {
            generations: settings.generations(),
            population_size: settings.population_size(),
            objectives: settings.objectives(),
            values: objective_values,
        },
        total_rms: TotalRms {
            generations: settings.generations(),
            population_size: settings.population_size(),
            values: total_values,
        },
    })
}
