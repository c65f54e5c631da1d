// rlai Control CLI
// Sampling demo and grid-world episode simulation

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod demo_commands;
mod grid_commands;

#[derive(Parser)]
#[command(name = "rlaictl")]
#[command(about = "rlai experiment CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample a die and a Gaussian and estimate the chance of an even roll
    Demo {
        /// Number of die faces
        #[arg(long, default_value = "6")]
        sides: u32,

        /// Gaussian mean
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        mu: f64,

        /// Gaussian standard deviation
        #[arg(long, default_value = "1")]
        sigma: f64,

        /// Draws used by the expectation estimate
        #[arg(short = 'n', long, default_value = "100")]
        samples: usize,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Simulate grid-world episodes under a uniformly random policy
    GridWorld(GridWorldArgs),
}

/// Options for the grid-world run; flags override the config file
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GridWorldArgs {
    /// JSON file with `simulation` and `grid` sections
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of episodes
    #[arg(long)]
    pub episodes: Option<usize>,

    /// Steps after which an episode is truncated
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Discount factor for reported returns
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Directory receiving the Parquet tables
    #[arg(short, long, default_value = "data/grid_world")]
    pub out: PathBuf,

    /// File name prefix of the tables, e.g. `uniform` gives `uniform-first.parquet`
    #[arg(long)]
    pub prefix: Option<String>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            sides,
            mu,
            sigma,
            samples,
            seed,
        } => {
            demo_commands::run_demo(sides, mu, sigma, samples, seed)?;
        }

        Commands::GridWorld(args) => {
            let summary = grid_commands::run_grid_world(&args)?;
            summary.print();
        }
    }

    Ok(())
}
