use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use winereg::pipeline::{self, DataSource, PipelineConfig};

/// Compare OLS, Ridge, Lasso and Elastic Net on a delimited table with
/// degree-2 polynomial features.
#[derive(Parser)]
#[command(version, name = "winereg")]
struct Cli {
    /// Input table with a header row.
    #[arg(default_value = "winequality-red.csv")]
    path: PathBuf,

    /// Generate N rows of synthetic data instead of reading PATH.
    #[arg(long, value_name = "N")]
    synthetic: Option<usize>,

    #[arg(long, default_value_t = ';')]
    delimiter: char,

    #[arg(long, default_value = "quality")]
    target: String,

    #[arg(long, default_value_t = 2)]
    degree: usize,

    /// Fraction of rows held out for testing.
    #[arg(long, default_value_t = 0.7)]
    test_size: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = 0.01)]
    ridge_alpha: f64,

    #[arg(long, default_value_t = 0.01)]
    lasso_alpha: f64,

    #[arg(long, default_value_t = 0.01)]
    enet_alpha: f64,

    #[arg(long, default_value_t = 0.5)]
    l1_ratio: f64,

    #[arg(long, default_value_t = 10_000)]
    max_iter: usize,

    #[arg(long, default_value_t = 1e-4)]
    tol: f64,
}

impl From<Cli> for PipelineConfig {
    fn from(cli: Cli) -> Self {
        let source = match cli.synthetic {
            Some(n_samples) => DataSource::Synthetic { n_samples },
            None => DataSource::File(cli.path),
        };
        PipelineConfig {
            source,
            delimiter: cli.delimiter,
            target: cli.target,
            degree: cli.degree,
            test_size: cli.test_size,
            seed: cli.seed,
            ridge_alpha: cli.ridge_alpha,
            lasso_alpha: cli.lasso_alpha,
            enet_alpha: cli.enet_alpha,
            l1_ratio: cli.l1_ratio,
            max_iter: cli.max_iter,
            tolerance: cli.tol,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let config = PipelineConfig::from(Cli::parse());
    match pipeline::run(&config) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("pipeline failed: {e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
