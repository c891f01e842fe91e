//! Chart planning and rendering.
//!
//! [`plan_charts`] decides which charts exist for a run, [`Renderer`]
//! implementations draw them. The stock renderer is [`BitmapRenderer`],
//! which writes PNG files with `plotters`.

mod bitmap;

pub use bitmap::{BitmapRenderer, ChartStyle};

use crate::analysis::Analysis;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

/// Largest objective count for which Pareto projections are drawn.
pub const MAX_PROJECTED_OBJECTIVES: usize = 4;

/// Number of bins used by both histograms.
pub const HISTOGRAM_BINS: usize = 10;

/// The kinds of chart produced for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Max/mean/min/std of one objective per generation.
    ObjectiveConvergence {
        /// Objective index.
        objective: usize,
    },
    /// Max/mean/min/std of the total RMS and the mean of objective means.
    TotalConvergence,
    /// Final generation, one objective against another.
    PairScatter {
        /// Objective on the x axis.
        x: usize,
        /// Objective on the y axis.
        y: usize,
    },
    /// Final generation, three objectives in 3-D.
    TripleScatter {
        /// Objective on the x axis.
        x: usize,
        /// Objective on the y axis.
        y: usize,
        /// Objective on the z axis.
        z: usize,
    },
    /// Final generation of a four-objective run: objectives 0 to 2 in 3-D,
    /// colored by objective 3.
    CombinedScatter,
    /// Distribution of the final total RMS.
    TotalRmsHistogram,
    /// Distribution of the final mean objective RMS.
    MeanRmsHistogram,
}

/// A chart together with the file name it is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPlan {
    /// What to draw.
    pub kind: ChartKind,
    /// File name, relative to the output directory.
    pub file_name: String,
}

/// Lists the charts for a run with `objectives` objectives.
///
/// # Examples
/// ```
/// use grn_pareto::plot::{plan_charts, ChartKind};
/// let plans = plan_charts(3, "all_pop_run.out");
/// assert_eq!(plans.len(), 3 + 1 + 3 + 1 + 2);
/// assert!(plans.iter().any(|plan| plan.kind == ChartKind::TripleScatter { x: 0, y: 1, z: 2 }));
/// assert!(plans.iter().any(|plan| plan.file_name == "all_pop_run.out012.png"));
/// ```
#[must_use]
pub fn plan_charts(objectives: usize, prefix: &str) -> Vec<ChartPlan> {
    let mut plans = Vec::new();
    for objective in 0..objectives {
        plans.push(ChartPlan {
            kind: ChartKind::ObjectiveConvergence { objective },
            file_name: format!(
                "{prefix}_f_{objective}_convergence_for_{objectives}_optimization.png"
            ),
        });
    }
    plans.push(ChartPlan {
        kind: ChartKind::TotalConvergence,
        file_name: format!("{prefix}_Single_objective_convergence_for_{objectives}_genes.png"),
    });

    if objectives > MAX_PROJECTED_OBJECTIVES {
        warn!("skipping Pareto projections for {objectives} objectives");
    } else {
        for x in 0..objectives {
            for y in (x + 1)..objectives {
                plans.push(ChartPlan {
                    kind: ChartKind::PairScatter { x, y },
                    file_name: format!("{prefix}{x}{y}.png"),
                });
            }
        }
        for x in 0..objectives {
            for y in (x + 1)..objectives {
                for z in (y + 1)..objectives {
                    plans.push(ChartPlan {
                        kind: ChartKind::TripleScatter { x, y, z },
                        file_name: format!("{prefix}{x}{y}{z}.png"),
                    });
                }
            }
        }
        if objectives == MAX_PROJECTED_OBJECTIVES {
            plans.push(ChartPlan {
                kind: ChartKind::CombinedScatter,
                file_name: format!("{prefix}4d.png"),
            });
        }
    }

    plans.push(ChartPlan {
        kind: ChartKind::TotalRmsHistogram,
        file_name: format!("{prefix}_total_rms_histogram.png"),
    });
    plans.push(ChartPlan {
        kind: ChartKind::MeanRmsHistogram,
        file_name: format!("{prefix}_objectives_mean_rms_histogram.png"),
    });
    plans
}

/// A chart could not be drawn or saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError {
    /// Target file of the failed chart.
    pub path: PathBuf,
    /// Backend message.
    pub message: String,
}

impl RenderError {
    /// Creates an error for the chart at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "failed to render {}: {}", self.path.display(), self.message)
    }
}

impl Error for RenderError {}

/// Draws one chart of an analysis into a file.
pub trait Renderer {
    /// Renders `kind` for `analysis` into `path`.
    ///
    /// # Errors
    /// Returns [`RenderError`] when drawing or saving fails.
    fn render(&mut self, analysis: &Analysis, kind: ChartKind, path: &Path)
        -> Result<(), RenderError>;
}

impl<T: Renderer + ?Sized> Renderer for &mut T {
    fn render(
        &mut self,
        analysis: &Analysis,
        kind: ChartKind,
        path: &Path,
    ) -> Result<(), RenderError> {
        (**self).render(analysis, kind, path)
    }
}

impl<T: Renderer + ?Sized> Renderer for Box<T> {
    fn render(
        &mut self,
        analysis: &Analysis,
        kind: ChartKind,
        path: &Path,
    ) -> Result<(), RenderError> {
        (**self).render(analysis, kind, path)
    }
}

/// Plans and renders every chart of `analysis` into `out_dir`.
///
/// Stops at the first failure.
///
/// # Errors
/// Returns the first [`RenderError`] reported by `renderer`.
pub fn render_charts<R: Renderer>(
    analysis: &Analysis,
    renderer: &mut R,
    prefix: &str,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, RenderError> {
    let plans = plan_charts(analysis.settings().objectives(), prefix);
    let mut written = Vec::with_capacity(plans.len());
    for plan in plans {
        let path = out_dir.join(&plan.file_name);
        debug!("rendering {:?} into {}", plan.kind, path.display());
        renderer.render(analysis, plan.kind, &path)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::core::RunTable;
    use crate::settings::Settings;

    fn count(plans: &[ChartPlan], predicate: fn(&ChartKind) -> bool) -> usize {
        plans.iter().filter(|plan| predicate(&plan.kind)).count()
    }

    #[test]
    fn single_objective_has_no_projections() {
        let plans = plan_charts(1, "p");
        assert_eq!(plans.len(), 4);
        assert_eq!(count(&plans, |kind| matches!(kind, ChartKind::PairScatter { .. })), 0);
    }

    #[test]
    fn four_objectives_get_every_projection() {
        let plans = plan_charts(4, "p");
        assert_eq!(count(&plans, |kind| matches!(kind, ChartKind::PairScatter { .. })), 6);
        assert_eq!(count(&plans, |kind| matches!(kind, ChartKind::TripleScatter { .. })), 4);
        assert_eq!(count(&plans, |kind| *kind == ChartKind::CombinedScatter), 1);
        assert_eq!(plans.len(), 4 + 1 + 6 + 4 + 1 + 2);
    }

    #[test]
    fn more_than_four_objectives_skip_projections() {
        let plans = plan_charts(5, "p");
        assert_eq!(plans.len(), 5 + 1 + 2);
        assert!(plans
            .iter()
            .all(|plan| !matches!(plan.kind, ChartKind::PairScatter { .. }
                | ChartKind::TripleScatter { .. }
                | ChartKind::CombinedScatter)));
    }

    #[test]
    fn file_names_follow_the_prefix() {
        let plans = plan_charts(2, "run");
        let names: Vec<&str> = plans.iter().map(|plan| plan.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "run_f_0_convergence_for_2_optimization.png",
                "run_f_1_convergence_for_2_optimization.png",
                "run_Single_objective_convergence_for_2_genes.png",
                "run01.png",
                "run_total_rms_histogram.png",
                "run_objectives_mean_rms_histogram.png",
            ]
        );
    }

    struct Recorder {
        seen: Vec<ChartKind>,
        fail_on: Option<ChartKind>,
    }

    impl Renderer for Recorder {
        fn render(
            &mut self,
            _analysis: &Analysis,
            kind: ChartKind,
            path: &Path,
        ) -> Result<(), RenderError> {
            if self.fail_on == Some(kind) {
                return Err(RenderError::new(path, "boom"));
            }
            self.seen.push(kind);
            Ok(())
        }
    }

    fn small_analysis() -> Analysis {
        let table = RunTable::from_rows(&[[1.0, 2.0], [3.0, 4.0]], 2).unwrap();
        let settings = Settings::builder()
            .objectives(2)
            .population_size(2)
            .build()
            .unwrap();
        analyze(&table, &settings).unwrap()
    }

    #[test]
    fn render_charts_visits_every_plan() {
        let analysis = small_analysis();
        let mut recorder = Recorder {
            seen: Vec::new(),
            fail_on: None,
        };
        let written = render_charts(&analysis, &mut recorder, "x", Path::new("out")).unwrap();
        assert_eq!(written.len(), 6);
        assert_eq!(written[3], Path::new("out").join("x01.png"));
        assert_eq!(recorder.seen.len(), 6);
    }

    #[test]
    fn render_failures_surface() {
        let analysis = small_analysis();
        let mut recorder = Recorder {
            seen: Vec::new(),
            fail_on: Some(ChartKind::PairScatter { x: 0, y: 1 }),
        };
        let err = render_charts(&analysis, &mut recorder, "x", Path::new("out")).unwrap_err();
        assert_eq!(err.path, Path::new("out").join("x01.png"));
        assert_eq!(recorder.seen.len(), 3);
    }
}
