use std::path::PathBuf;

use anyhow::{bail, Result};
use burn_ndarray::NdArray;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ibsi_bench::{default_plans, run_benchmark, BenchmarkConfig, PrecomputedExtractor};

type Backend = NdArray<f32>;

#[derive(Parser)]
#[command(name = "ibsi-bench")]
#[command(about = "IBSI conformance benchmark for radiomics feature extraction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the benchmark cases and write discrepancy reports
    Run {
        /// Directory containing phantom/patient volumes and benchmark mappings
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,

        /// Directory containing precomputed engine output CSVs
        #[arg(short, long, default_value = "data/engine")]
        engine_dir: PathBuf,

        /// Directory to write reports into
        #[arg(short, long, default_value = "results")]
        results_dir: PathBuf,

        /// Cases to run (e.g. phantom case2); all when omitted
        cases: Vec<String>,

        /// Save resampled volumes next to the reports
        #[arg(long)]
        save_resampled: bool,

        /// Round resampled gray values to this many decimals
        #[arg(long)]
        gray_value_precision: Option<u32>,
    },

    /// List the benchmark cases and their resampling settings
    ListCases,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data_dir,
            engine_dir,
            results_dir,
            cases,
            save_resampled,
            gray_value_precision,
        } => {
            let mut plans = default_plans();

            if !cases.is_empty() {
                for name in &cases {
                    if !plans.iter().any(|p| p.id.to_string() == *name) {
                        bail!("unknown case '{name}'; see `ibsi-bench list-cases`");
                    }
                }
                plans.retain(|p| cases.iter().any(|name| p.id.to_string() == *name));
            }

            if let Some(decimals) = gray_value_precision {
                for plan in &mut plans {
                    if let Some(settings) = &mut plan.resampling {
                        settings.gray_value_precision = Some(decimals);
                    }
                }
            }

            let mut config = BenchmarkConfig::new(data_dir, results_dir);
            config.save_resampled = save_resampled;

            let mut extractor = PrecomputedExtractor::new(engine_dir);
            let device = Default::default();
            let summary =
                run_benchmark::<Backend, _>(&config, &plans, &mut extractor, &device)?;

            println!(
                "completed: {} case(s){}",
                summary.completed.len(),
                if summary.completed.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", summary.completed.join(", "))
                }
            );
            if !summary.failed.is_empty() {
                bail!("failed: {}", summary.failed.join(", "));
            }
            Ok(())
        }
        Commands::ListCases => {
            for plan in default_plans() {
                match &plan.resampling {
                    Some(settings) => println!(
                        "{}: resample to {:?} mm ({}), {} profile(s)",
                        plan.id,
                        settings.target_spacing,
                        settings.interpolation,
                        plan.profiles.len()
                    ),
                    None => println!("{}: native grid, {} profile(s)", plan.id, plan.profiles.len()),
                }
            }
            Ok(())
        }
    }
}
