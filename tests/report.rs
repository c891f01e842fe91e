use grn_pareto::report::{write_generation_stats, write_ranking_report};
use grn_pareto::{analyze, read_run_table, AnalysisError, Settings, ShapeError};
use std::fs;
use std::path::{Path, PathBuf};

const RUN: &str = "# This file contains the data of all generations\n\
# of objectives = 2, # of constraints = 0, # of real_var = 1, # of bits of bin_var = 0, constr_violation, rank, crowding_distance\n\
# gen = 1\n\
2.000000e+01\t1.000000e+01\t5.000000e-01\t0.000000e+00\t1\t1.000000e+14\n\
4.000000e+01\t4.000000e+01\t2.500000e-01\t0.000000e+00\t2\t1.000000e+14\n\
# gen = 2\n\
1.000000e+01\t1.000000e+01\t4.000000e-01\t0.000000e+00\t1\t1.000000e+14\n\
0.000000e+00\t4.000000e+01\t3.000000e-01\t0.000000e+00\t1\t1.000000e+14\n";

fn settings(generations: usize) -> Settings {
    Settings::builder()
        .objectives(2)
        .population_size(2)
        .generations(generations)
        .gene_data_points(10.0)
        .build()
        .unwrap()
}

fn write_input(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("all_pop_tll.out");
    fs::write(&path, text).unwrap();
    path
}

fn produce(input: &Path, out_dir: &Path, settings: &Settings) -> Result<PathBuf, AnalysisError> {
    let table = read_run_table(input, settings)?;
    let analysis = analyze(&table, settings)?;
    Ok(write_ranking_report(&analysis, input, out_dir)?)
}

#[test]
fn report_is_written_next_to_the_outputs() {
    let input_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let input = write_input(input_dir.path(), RUN);

    let path = produce(&input, out_dir.path(), &settings(2)).unwrap();
    assert_eq!(path, out_dir.path().join("sorted_pop_tll.out"));

    let report = fs::read_to_string(&path).unwrap();
    let expected = format!(
        "\n# Sorted solutions based on single_objective_rms\n0 1 \n1\n{}\n\
         \n# Sorted solutions based on mean rms of objectives\n0 1 \n1\t[1 1]\n1\t[0 2]\n\
         \n# Sorted solutions based on lexsort of objectives rms\n0 1 \n[1 1]\n[0 2]\n",
        2.0_f64.sqrt()
    );
    assert_eq!(report, expected);
}

#[test]
fn identical_input_gives_identical_reports() {
    let input_dir = tempfile::tempdir().unwrap();
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let input = write_input(input_dir.path(), RUN);

    let a = fs::read(produce(&input, first.path(), &settings(2)).unwrap()).unwrap();
    let b = fs::read(produce(&input, second.path(), &settings(2)).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn shape_errors_leave_no_output() {
    let input_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let input = write_input(input_dir.path(), RUN);

    let err = produce(&input, out_dir.path(), &settings(3)).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Shape(ShapeError::RowCount { expected: 6, found: 4 })
    ));
    assert_eq!(fs::read_dir(out_dir.path()).unwrap().count(), 0);
}

#[test]
fn parse_errors_leave_no_output() {
    let input_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let input = write_input(input_dir.path(), "1.0\t2.0\nx\t3.0\n");

    let err = produce(&input, out_dir.path(), &settings(1)).unwrap_err();
    match err {
        AnalysisError::Parse(err) => {
            assert_eq!(err.line, 2);
            assert_eq!(err.token, "x");
        }
        other => panic!("unexpected error {other}"),
    }
    assert_eq!(fs::read_dir(out_dir.path()).unwrap().count(), 0);
}

#[test]
fn generation_stats_cover_every_generation() {
    let input_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let input = write_input(input_dir.path(), RUN);
    let settings = settings(2);

    let analysis = analyze(&read_run_table(&input, &settings).unwrap(), &settings).unwrap();
    let path = write_generation_stats(&analysis, &input, out_dir.path()).unwrap();
    assert_eq!(
        path.file_name().unwrap(),
        "all_pop_tll.out_generation_stats.tsv"
    );
    let text = fs::read_to_string(path).unwrap();
    let rows: Vec<&str> = text.lines().skip(1).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("0\t"));
    assert!(rows[1].starts_with("1\t"));
}
