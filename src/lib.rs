#![warn(missing_docs)]

/*! Post-processing for multi-objective optimization runs of gene regulatory network models.

An optimizer run writes one row of raw objective scores (sums of squared errors, one per
gene) for every individual of every generation. This crate turns such a run into
convergence statistics, a ranking of the final population and a set of charts:

```
use grn_pareto::{analyze, RunTable, Settings};

let settings = Settings::builder()
    .objectives(2)
    .population_size(3)
    .gene_data_points(10.0)
    .build()
    .unwrap();
let table = RunTable::from_rows(&[[10.0, 10.0], [0.0, 0.0], [40.0, 10.0]], 2).unwrap();
let analysis = analyze(&table, &settings).unwrap();

assert_eq!(analysis.objective_rms().individual(0, 2), &[2.0, 1.0]);
assert_eq!(analysis.ranking().by_total_rms, vec![1, 0, 2]);
assert_eq!(analysis.stats().generation(0).unwrap().objectives[0].max, 2.0);
```
!*/

pub mod analysis;
pub mod config;
pub mod core;
pub mod input;
pub mod plot;
pub mod ranking;
pub mod report;
pub mod settings;

pub use crate::analysis::{analyze, Analysis, AnalysisError};
pub use crate::config::FileConfig;
pub use crate::core::rms::{normalize, Normalized, ObjectiveRms, TotalRms};
pub use crate::core::stats::{Bin, GenerationStats, Histogram, RunStats, Summary, SummarySeries};
pub use crate::core::{RunTable, Score, ShapeError, TableError};
pub use crate::input::{parse_run_table, read_run_table, ParseError};
pub use crate::ranking::{FinalGeneration, Ranking};
pub use crate::settings::{ConfigError, Settings, SettingsBuilder};
