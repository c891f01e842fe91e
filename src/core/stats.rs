//! Per-generation convergence statistics.
//!
//! [`RunStats`] holds one [`GenerationStats`] per generation, in generation
//! order. Each generation is summarized independently, so the aggregation
//! can run in parallel when the `parallel` feature is enabled.

use super::rms::{ObjectiveRms, TotalRms};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Minimum, maximum, mean and population standard deviation of a series.
///
/// # Examples
/// ```
/// use grn_pareto::Summary;
/// let summary = Summary::of([1.0, 2.0, 3.0]);
/// assert_eq!(summary.min, 1.0);
/// assert_eq!(summary.max, 3.0);
/// assert_eq!(summary.mean, 2.0);
/// assert!((summary.std - (2.0_f64 / 3.0).sqrt()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Population (not sample) standard deviation.
    pub std: f64,
}

impl Summary {
    /// Summarizes the provided values. An empty series yields all zeros.
    #[must_use]
    pub fn of<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().collect();
        if values.is_empty() {
            return Self {
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                std: 0.0,
            };
        }
        #[allow(clippy::cast_precision_loss)]
        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        let variance = values
            .iter()
            .map(|value| {
                let diff = value - mean;
                diff * diff
            })
            .sum::<f64>()
            / count;
        Self {
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean,
            std: variance.sqrt(),
        }
    }
}

/// Statistics of a single generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    /// One summary per objective, computed across the population.
    pub objectives: Vec<Summary>,
    /// Summary of the total RMS across the population.
    pub total: Summary,
    /// Mean across objectives of the per-objective means.
    pub mean_of_objective_means: f64,
}

impl GenerationStats {
    fn compute(objective_rms: &ObjectiveRms, total_rms: &TotalRms, generation: usize) -> Self {
        let objectives: Vec<Summary> = (0..objective_rms.objectives())
            .map(|objective| Summary::of(objective_rms.objective_column(generation, objective)))
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let mean_of_objective_means =
            objectives.iter().map(|summary| summary.mean).sum::<f64>() / objectives.len() as f64;
        Self {
            objectives,
            total: Summary::of(total_rms.generation(generation).iter().copied()),
            mean_of_objective_means,
        }
    }
}

/// Column-oriented view of a [`Summary`] sequence, ready for plotting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummarySeries {
    /// Minimum per generation.
    pub min: Vec<f64>,
    /// Maximum per generation.
    pub max: Vec<f64>,
    /// Mean per generation.
    pub mean: Vec<f64>,
    /// Standard deviation per generation.
    pub std: Vec<f64>,
}

impl FromIterator<Summary> for SummarySeries {
    fn from_iter<I: IntoIterator<Item = Summary>>(iter: I) -> Self {
        let mut series = Self::default();
        for summary in iter {
            series.min.push(summary.min);
            series.max.push(summary.max);
            series.mean.push(summary.mean);
            series.std.push(summary.std);
        }
        series
    }
}

/// Convergence statistics for every generation of a run.
///
/// # Examples
/// ```
/// use grn_pareto::{normalize, RunStats, RunTable, Settings};
/// let table = RunTable::from_rows(&[[10.0], [40.0], [0.0], [0.0]], 1).unwrap();
/// let settings = Settings::builder()
///     .population_size(2)
///     .generations(2)
///     .gene_data_points(10.0)
///     .build()
///     .unwrap();
/// let normalized = normalize(&table, &settings).unwrap();
/// let stats = RunStats::compute(&normalized.objective_rms, &normalized.total_rms);
/// assert_eq!(stats.generations(), 2);
/// assert_eq!(stats.objective_series(0).mean, vec![1.5, 0.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    per_generation: Vec<GenerationStats>,
}

impl RunStats {
    /// Aggregates every generation of the normalized run.
    #[must_use]
    pub fn compute(objective_rms: &ObjectiveRms, total_rms: &TotalRms) -> Self {
        let (generations, _, _) = objective_rms.shape();
        #[cfg(feature = "parallel")]
        let per_generation = (0..generations)
            .into_par_iter()
            .map(|generation| GenerationStats::compute(objective_rms, total_rms, generation))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let per_generation = (0..generations)
            .map(|generation| GenerationStats::compute(objective_rms, total_rms, generation))
            .collect();
        Self { per_generation }
    }

    /// Number of generations tracked.
    #[must_use]
    pub fn generations(&self) -> usize {
        self.per_generation.len()
    }

    /// Statistics of one generation.
    #[must_use]
    pub fn generation(&self, generation: usize) -> Option<&GenerationStats> {
        self.per_generation.get(generation)
    }

    /// Iterates over the generations in order.
    pub fn iter(&self) -> impl Iterator<Item = &GenerationStats> {
        self.per_generation.iter()
    }

    /// Per-generation series for one objective.
    ///
    /// # Panics
    /// Panics when `objective` is out of range.
    #[must_use]
    pub fn objective_series(&self, objective: usize) -> SummarySeries {
        self.per_generation
            .iter()
            .map(|stats| stats.objectives[objective])
            .collect()
    }

    /// Per-generation series of the total RMS.
    #[must_use]
    pub fn total_series(&self) -> SummarySeries {
        self.per_generation.iter().map(|stats| stats.total).collect()
    }

    /// Per-generation mean of the objective means.
    #[must_use]
    pub fn mean_of_objective_means(&self) -> Vec<f64> {
        self.per_generation
            .iter()
            .map(|stats| stats.mean_of_objective_means)
            .collect()
    }
}

/// One histogram bin covering `[start, end)`; the last bin also holds `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    /// Inclusive lower edge.
    pub start: f64,
    /// Upper edge.
    pub end: f64,
    /// Number of values in the bin.
    pub count: usize,
}

/// Equal-width histogram over the range of the values.
///
/// When every value is equal the range is widened to `value ± 0.5`.
///
/// # Examples
/// ```
/// use grn_pareto::Histogram;
/// let histogram = Histogram::new(&[0.0, 1.0, 1.0, 2.0], 2);
/// let counts: Vec<usize> = histogram.bins().iter().map(|bin| bin.count).collect();
/// assert_eq!(counts, vec![1, 3]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: Vec<Bin>,
}

impl Histogram {
    /// Bins the values into `bins` equal-width buckets.
    #[must_use]
    pub fn new(values: &[f64], bins: usize) -> Self {
        if values.is_empty() || bins == 0 {
            return Self { bins: Vec::new() };
        }
        let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if (max - min).abs() < f64::EPSILON {
            min -= 0.5;
            max += 0.5;
        }
        #[allow(clippy::cast_precision_loss)]
        let width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for value in values {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let idx = (((value - min) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }
        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(idx, count)| {
                #[allow(clippy::cast_precision_loss)]
                let start = min + width * idx as f64;
                Bin {
                    start,
                    end: start + width,
                    count,
                }
            })
            .collect();
        Self { bins }
    }

    /// Returns the bins in ascending order.
    #[must_use]
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Largest bin count.
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }
}
