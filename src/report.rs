//! Text reports derived from an [`Analysis`].
//!
//! Reports are rendered into a `String` first and only then written to disk,
//! so a failed analysis never leaves a partial file behind.

use crate::analysis::Analysis;
use log::info;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const INPUT_PREFIX: &str = "all_pop_";
const REPORT_PREFIX: &str = "sorted_pop_";
const STATS_SUFFIX: &str = "_generation_stats.tsv";

/// Name of the ranking report for an input file.
///
/// # Examples
/// ```
/// use grn_pareto::report::report_file_name;
/// assert_eq!(report_file_name("runs/all_pop_tll.out"), "sorted_pop_tll.out");
/// ```
#[must_use]
pub fn report_file_name(input: impl AsRef<Path>) -> String {
    format!("{REPORT_PREFIX}{}", base_name(input.as_ref()).replace(INPUT_PREFIX, ""))
}

/// Name of the generation statistics table for an input file.
///
/// # Examples
/// ```
/// use grn_pareto::report::generation_stats_file_name;
/// assert_eq!(generation_stats_file_name("all_pop_tll.out"), "all_pop_tll.out_generation_stats.tsv");
/// ```
#[must_use]
pub fn generation_stats_file_name(input: impl AsRef<Path>) -> String {
    format!("{}{STATS_SUFFIX}", base_name(input.as_ref()))
}

/// File name of `path`, or the whole path when it has none. Used as the
/// chart prefix and as the base of every report name.
///
/// # Examples
/// ```
/// use grn_pareto::report::base_name;
/// use std::path::Path;
/// assert_eq!(base_name(Path::new("runs/all_pop_tll.out")), "all_pop_tll.out");
/// ```
#[must_use]
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy())
        .into_owned()
}

fn format_vector(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(" "))
}

fn write_order(out: &mut String, header: &str, order: &[usize]) {
    out.push('\n');
    out.push_str(header);
    out.push('\n');
    for idx in order {
        out.push_str(&format!("{idx} "));
    }
    out.push('\n');
}

/// Renders the three ranking sections of the final generation.
///
/// # Examples
/// ```
/// use grn_pareto::{analyze, report::render_ranking_report, RunTable, Settings};
/// let table = RunTable::from_rows(&[[40.0], [10.0]], 1).unwrap();
/// let settings = Settings::builder().population_size(2).gene_data_points(10.0).build().unwrap();
/// let report = render_ranking_report(&analyze(&table, &settings).unwrap());
/// assert!(report.starts_with("\n# Sorted solutions based on single_objective_rms\n1 0 \n1\n2\n"));
/// ```
#[must_use]
pub fn render_ranking_report(analysis: &Analysis) -> String {
    let last = analysis.final_generation();
    let ranking = analysis.ranking();
    let mut out = String::new();

    write_order(
        &mut out,
        "# Sorted solutions based on single_objective_rms",
        &ranking.by_total_rms,
    );
    for &idx in &ranking.by_total_rms {
        out.push_str(&format!("{}\n", last.total_rms()[idx]));
    }

    write_order(
        &mut out,
        "# Sorted solutions based on mean rms of objectives",
        &ranking.by_mean_objective_rms,
    );
    for &idx in &ranking.by_mean_objective_rms {
        out.push_str(&format!(
            "{}\t{}\n",
            last.mean_objective_rms()[idx],
            format_vector(last.objective_rms(idx))
        ));
    }

    write_order(
        &mut out,
        "# Sorted solutions based on lexsort of objectives rms",
        &ranking.by_lexsort,
    );
    for &idx in &ranking.by_lexsort {
        out.push_str(&format!("{}\n", format_vector(last.objective_rms(idx))));
    }
    out
}

/// Renders per-generation statistics as a tab-separated table.
///
/// Columns: `generation`, then `std_f<o>`, `max_f<o>`, `mean_f<o>`,
/// `min_f<o>` for every objective, then the same four for the total RMS and
/// finally `mean_of_objective_means`.
#[must_use]
pub fn render_generation_stats(analysis: &Analysis) -> String {
    let objectives = analysis.settings().objectives();
    let mut columns = vec!["generation".to_string()];
    for kind in ["std", "max", "mean", "min"] {
        for objective in 0..objectives {
            columns.push(format!("{kind}_f{objective}"));
        }
    }
    for kind in ["std", "max", "mean", "min"] {
        columns.push(format!("{kind}_total"));
    }
    columns.push("mean_of_objective_means".to_string());

    let mut out = columns.join("\t");
    out.push('\n');
    for (generation, stats) in analysis.stats().iter().enumerate() {
        let mut fields = vec![generation.to_string()];
        fields.extend(stats.objectives.iter().map(|s| s.std.to_string()));
        fields.extend(stats.objectives.iter().map(|s| s.max.to_string()));
        fields.extend(stats.objectives.iter().map(|s| s.mean.to_string()));
        fields.extend(stats.objectives.iter().map(|s| s.min.to_string()));
        fields.push(stats.total.std.to_string());
        fields.push(stats.total.max.to_string());
        fields.push(stats.total.mean.to_string());
        fields.push(stats.total.min.to_string());
        fields.push(stats.mean_of_objective_means.to_string());
        out.push_str(&fields.join("\t"));
        out.push('\n');
    }
    out
}

/// Writes the ranking report for `input` into `out_dir`.
///
/// # Errors
/// Returns any I/O error raised while writing.
pub fn write_ranking_report(
    analysis: &Analysis,
    input: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
) -> io::Result<PathBuf> {
    let path = out_dir.as_ref().join(report_file_name(input));
    fs::write(&path, render_ranking_report(analysis))?;
    info!("wrote ranking report {}", path.display());
    Ok(path)
}

/// Writes the generation statistics table for `input` into `out_dir`.
///
/// # Errors
/// Returns any I/O error raised while writing.
pub fn write_generation_stats(
    analysis: &Analysis,
    input: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
) -> io::Result<PathBuf> {
    let path = out_dir.as_ref().join(generation_stats_file_name(input));
    fs::write(&path, render_generation_stats(analysis))?;
    info!("wrote generation statistics {}", path.display());
    Ok(path)
}
