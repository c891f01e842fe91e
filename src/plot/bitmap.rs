use super::{ChartKind, RenderError, Renderer, HISTOGRAM_BINS};
use crate::analysis::Analysis;
use crate::core::stats::{Histogram, SummarySeries};
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

type DrawResult = Result<(), Box<dyn Error>>;

/// Rendering options shared by every chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartStyle {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Axis label per objective. Missing entries fall back to `f_<index>`.
    pub objective_labels: Vec<String>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            objective_labels: Vec::new(),
        }
    }
}

impl ChartStyle {
    /// Axis label of an objective.
    ///
    /// # Examples
    /// ```
    /// use grn_pareto::plot::ChartStyle;
    /// let style = ChartStyle { objective_labels: vec!["hb".into()], ..ChartStyle::default() };
    /// assert_eq!(style.label(0), "hb");
    /// assert_eq!(style.label(2), "f_2");
    /// ```
    #[must_use]
    pub fn label(&self, objective: usize) -> String {
        self.objective_labels
            .get(objective)
            .cloned()
            .unwrap_or_else(|| format!("f_{objective}"))
    }
}

/// Writes charts as PNG files.
#[derive(Debug, Clone, Default)]
pub struct BitmapRenderer {
    style: ChartStyle,
}

impl BitmapRenderer {
    /// Creates a renderer with the given style.
    #[must_use]
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    fn size(&self) -> (u32, u32) {
        (self.style.width, self.style.height)
    }

    fn convergence(
        &self,
        path: &Path,
        caption: &str,
        series: &SummarySeries,
        overlay: Option<(&str, &[f64])>,
    ) -> DrawResult {
        #[allow(clippy::cast_precision_loss)]
        let x_max = (series.mean.len().saturating_sub(1)).max(1) as f64;
        let upper = series
            .max
            .iter()
            .copied()
            .chain(series.mean.iter().zip(&series.std).map(|(mean, std)| mean + std))
            .chain(overlay.into_iter().flat_map(|(_, values)| values.iter().copied()))
            .fold(0.0_f64, f64::max);
        let y_max = if upper > 0.0 { upper * 1.05 } else { 1.0 };

        let root = BitMapBackend::new(path, self.size()).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..x_max, 0.0..y_max)?;
        chart
            .configure_mesh()
            .x_desc("Generations")
            .y_desc("RMS")
            .draw()?;

        let lines: [(&str, &[f64], RGBColor); 3] = [
            ("max", series.max.as_slice(), BLUE),
            ("mean", series.mean.as_slice(), GREEN),
            ("min", series.min.as_slice(), RED),
        ];
        for (label, values, color) in lines {
            chart
                .draw_series(LineSeries::new(indexed(values), color.stroke_width(2)))?
                .label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }
        chart.draw_series(series.mean.iter().zip(&series.std).enumerate().map(
            |(generation, (mean, std))| {
                let x = generation as f64;
                PathElement::new(vec![(x, mean - std), (x, mean + std)], GREEN.mix(0.5))
            },
        ))?;
        if let Some((label, values)) = overlay {
            chart
                .draw_series(LineSeries::new(indexed(values), CYAN.stroke_width(2)))?
                .label(label)
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &CYAN));
        }
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        root.present()?;
        Ok(())
    }

    fn pair_scatter(&self, analysis: &Analysis, x: usize, y: usize, path: &Path) -> DrawResult {
        let last = analysis.final_generation();
        let xs = last.objective_column(x);
        let ys = last.objective_column(y);
        let colors = heat_colors(last.mean_objective_rms());

        let root = BitMapBackend::new(path, self.size()).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("{} vs {}", self.style.label(x), self.style.label(y)),
                ("sans-serif", 20),
            )
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..axis_max(&xs), 0.0..axis_max(&ys))?;
        chart
            .configure_mesh()
            .x_desc(format!("{} RMS", self.style.label(x)))
            .y_desc(format!("{} RMS", self.style.label(y)))
            .draw()?;
        chart.draw_series(
            xs.iter()
                .zip(&ys)
                .zip(colors)
                .map(|((&px, &py), color)| Circle::new((px, py), 3, color.filled())),
        )?;
        root.present()?;
        Ok(())
    }

    fn scatter_3d(
        &self,
        path: &Path,
        axes: [usize; 3],
        points: Vec<((f64, f64, f64), HSLColor, u32)>,
        caption: &str,
    ) -> DrawResult {
        let axis = |pick: usize| {
            let values: Vec<f64> = points
                .iter()
                .map(|&((x, y, z), _, _)| [x, y, z][pick])
                .collect();
            axis_max(&values)
        };
        let (x_max, y_max, z_max) = (axis(0), axis(1), axis(2));

        let root = BitMapBackend::new(path, self.size()).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 20))
            .margin(20)
            .build_cartesian_3d(0.0..x_max, 0.0..y_max, 0.0..z_max)?;
        chart.with_projection(|mut projection| {
            projection.yaw = 0.6;
            projection.pitch = 0.3;
            projection.scale = 0.8;
            projection.into_matrix()
        });
        chart.configure_axes().draw()?;
        chart.draw_series(
            points
                .into_iter()
                .map(|(coord, color, size)| Circle::new(coord, size, color.filled())),
        )?;
        let [x, y, z] = axes;
        root.draw(&Text::new(
            format!(
                "x: {} RMS, y: {} RMS, z: {} RMS",
                self.style.label(x),
                self.style.label(y),
                self.style.label(z)
            ),
            (10, 10),
            ("sans-serif", 14).into_font(),
        ))?;
        root.present()?;
        Ok(())
    }

    fn triple_scatter(&self, analysis: &Analysis, axes: [usize; 3], path: &Path) -> DrawResult {
        let last = analysis.final_generation();
        let colors = heat_colors(last.mean_objective_rms());
        let points = last
            .objective_rows()
            .zip(colors)
            .map(|(row, color)| ((row[axes[0]], row[axes[1]], row[axes[2]]), color, 3))
            .collect();
        let caption = format!(
            "{} / {} / {}",
            self.style.label(axes[0]),
            self.style.label(axes[1]),
            self.style.label(axes[2])
        );
        self.scatter_3d(path, axes, points, &caption)
    }

    fn combined_scatter(&self, analysis: &Analysis, path: &Path) -> DrawResult {
        let last = analysis.final_generation();
        let colors = heat_colors(&last.objective_column(3));
        let means = last.mean_objective_rms();
        let worst = means.iter().copied().fold(0.0_f64, f64::max);
        let best = means.iter().copied().fold(f64::INFINITY, f64::min);
        let span = worst - best;
        let points = last
            .objective_rows()
            .zip(colors)
            .zip(means)
            .map(|((row, color), mean)| {
                let weight = if span > 0.0 { (worst - mean) / span } else { 1.0 };
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let size = 2 + (weight * 8.0).round() as u32;
                ((row[0], row[1], row[2]), color, size)
            })
            .collect();
        let caption = format!("colored by {} RMS", self.style.label(3));
        self.scatter_3d(path, [0, 1, 2], points, &caption)
    }

    fn histogram(&self, values: &[f64], caption: &str, path: &Path) -> DrawResult {
        let histogram = Histogram::new(values, HISTOGRAM_BINS);
        let (low, high) = match (histogram.bins().first(), histogram.bins().last()) {
            (Some(first), Some(last)) => (first.start, last.end),
            _ => (0.0, 1.0),
        };
        #[allow(clippy::cast_precision_loss)]
        let y_max = (histogram.max_count().max(1) as f64) * 1.1;

        let root = BitMapBackend::new(path, self.size()).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(low..high, 0.0..y_max)?;
        chart
            .configure_mesh()
            .x_desc("RMS")
            .y_desc("Frequencies")
            .draw()?;
        chart.draw_series(histogram.bins().iter().map(|bin| {
            Rectangle::new(
                [(bin.start, 0.0), (bin.end, bin.count as f64)],
                BLUE.mix(0.6).filled(),
            )
        }))?;
        root.present()?;
        Ok(())
    }
}

impl Renderer for BitmapRenderer {
    fn render(
        &mut self,
        analysis: &Analysis,
        kind: ChartKind,
        path: &Path,
    ) -> Result<(), RenderError> {
        let objectives = analysis.settings().objectives();
        let result = match kind {
            ChartKind::ObjectiveConvergence { objective } => self.convergence(
                path,
                &format!("{} convergence for {objectives} objectives", self.style.label(objective)),
                &analysis.stats().objective_series(objective),
                None,
            ),
            ChartKind::TotalConvergence => {
                let means = analysis.stats().mean_of_objective_means();
                self.convergence(
                    path,
                    &format!("Single objective convergence for {objectives} genes"),
                    &analysis.stats().total_series(),
                    Some(("mean rms of objectives", means.as_slice())),
                )
            }
            ChartKind::PairScatter { x, y } => self.pair_scatter(analysis, x, y, path),
            ChartKind::TripleScatter { x, y, z } => self.triple_scatter(analysis, [x, y, z], path),
            ChartKind::CombinedScatter => self.combined_scatter(analysis, path),
            ChartKind::TotalRmsHistogram => self.histogram(
                analysis.final_generation().total_rms(),
                "Total RMS",
                path,
            ),
            ChartKind::MeanRmsHistogram => self.histogram(
                analysis.final_generation().mean_objective_rms(),
                "Mean RMS of objectives",
                path,
            ),
        };
        result.map_err(|err| RenderError::new(path, err.to_string()))
    }
}

fn indexed(values: &[f64]) -> impl Iterator<Item = (f64, f64)> + '_ {
    values
        .iter()
        .enumerate()
        .map(|(idx, value)| (idx as f64, *value))
}

fn axis_max(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * 1.05
    } else {
        1.0
    }
}

/// Blue for the lowest value through red for the highest.
fn heat_colors(values: &[f64]) -> Vec<HSLColor> {
    let low = values.iter().copied().fold(f64::INFINITY, f64::min);
    let high = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = high - low;
    values
        .iter()
        .map(|value| {
            let t = if span > 0.0 { (value - low) / span } else { 0.0 };
            HSLColor(0.66 * (1.0 - t), 1.0, 0.5)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::core::RunTable;
    use crate::plot::{plan_charts, render_charts};
    use crate::settings::Settings;

    fn four_objective_analysis() -> Analysis {
        let rows = [
            [10.0, 20.0, 30.0, 40.0],
            [5.0, 15.0, 25.0, 35.0],
            [50.0, 0.0, 10.0, 5.0],
            [8.0, 12.0, 16.0, 20.0],
            [1.0, 2.0, 3.0, 4.0],
            [40.0, 30.0, 20.0, 10.0],
        ];
        let settings = Settings::builder()
            .objectives(4)
            .population_size(3)
            .generations(2)
            .gene_data_points(10.0)
            .build()
            .unwrap();
        analyze(&RunTable::from_rows(&rows, 4).unwrap(), &settings).unwrap()
    }

    #[test]
    fn every_planned_chart_is_written() {
        let analysis = four_objective_analysis();
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = BitmapRenderer::default();
        let written = render_charts(&analysis, &mut renderer, "all_pop_run.out", dir.path()).unwrap();

        let plans = plan_charts(4, "all_pop_run.out");
        assert_eq!(written.len(), plans.len());
        assert!(plans.iter().any(|plan| plan.kind == ChartKind::CombinedScatter));
        for (path, plan) in written.iter().zip(&plans) {
            assert_eq!(path, &dir.path().join(&plan.file_name));
            let size = std::fs::metadata(path).unwrap().len();
            assert!(size > 0, "{} is empty", path.display());
        }
    }

    #[test]
    fn missing_output_directory_is_a_render_error() {
        let analysis = four_objective_analysis();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let mut renderer = BitmapRenderer::default();
        let err = render_charts(&analysis, &mut renderer, "run", &missing).unwrap_err();
        assert!(err.path.starts_with(&missing));
        assert!(!missing.exists());
    }

    #[test]
    fn heat_colors_span_blue_to_red() {
        let colors = heat_colors(&[0.0, 1.0, 0.5]);
        assert!((colors[0].0 - 0.66).abs() < 1e-12);
        assert!(colors[1].0.abs() < 1e-12);
        assert!((colors[2].0 - 0.33).abs() < 1e-12);
    }

    #[test]
    fn constant_values_share_a_color() {
        let colors = heat_colors(&[2.0, 2.0]);
        assert_eq!(colors[0].0, colors[1].0);
    }

    #[test]
    fn axis_max_pads_and_handles_zero() {
        assert_eq!(axis_max(&[0.0, 0.0]), 1.0);
        assert!((axis_max(&[2.0]) - 2.1).abs() < 1e-12);
    }
}
