use clap::Parser;
use grn_pareto::config::DataPointOverrides;
use grn_pareto::plot::{render_charts, BitmapRenderer};
use grn_pareto::report::{base_name, write_generation_stats, write_ranking_report};
use grn_pareto::{analyze, read_run_table, AnalysisError, FileConfig};
use log::info;
use std::path::{Path, PathBuf};

/// Convergence statistics, final-generation rankings and Pareto charts for an optimizer run.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of genes (objectives) in the model
    #[arg(value_name = "NGENES")]
    ngenes: usize,

    /// Individuals per generation
    #[arg(value_name = "POP_SIZE")]
    pop_size: usize,

    /// Number of generations in the run
    #[arg(value_name = "N_GEN")]
    n_gen: usize,

    /// Population file written by the optimizer
    #[arg(value_name = "FILENAME")]
    filename: PathBuf,

    /// Path to config TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory receiving the report and charts
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Data points per objective (overrides config)
    #[arg(long)]
    gndp: Option<f64>,

    /// Data points for the total RMS (overrides config)
    #[arg(long)]
    tndp: Option<f64>,

    /// Skip chart rendering
    #[arg(long, default_value_t = false)]
    no_plots: bool,

    /// Also write per-generation statistics as TSV
    #[arg(long, default_value_t = false)]
    generation_stats: bool,
}

fn load_config(path: Option<&Path>) -> Result<FileConfig, AnalysisError> {
    match path {
        Some(path) => Ok(FileConfig::load(path)?),
        None => Ok(FileConfig::default()),
    }
}

fn run(args: &Args) -> Result<(), AnalysisError> {
    let config = load_config(args.config.as_deref())?;
    let overrides = DataPointOverrides {
        gene: args.gndp,
        total: args.tndp,
    };
    let settings = config.settings(args.ngenes, args.pop_size, args.n_gen, overrides)?;

    let table = read_run_table(&args.filename, &settings)?;
    let analysis = analyze(&table, &settings)?;

    write_ranking_report(&analysis, &args.filename, &args.out_dir)?;
    if args.generation_stats {
        write_generation_stats(&analysis, &args.filename, &args.out_dir)?;
    }

    if args.no_plots || !config.plots.enabled {
        info!("chart rendering disabled");
        return Ok(());
    }
    let prefix = base_name(&args.filename);
    let mut renderer = BitmapRenderer::new(config.plots.style());
    let charts = render_charts(&analysis, &mut renderer, &prefix, &args.out_dir)?;
    info!("wrote {} charts into {}", charts.len(), args.out_dir.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    run(&args)?;
    Ok(())
}
