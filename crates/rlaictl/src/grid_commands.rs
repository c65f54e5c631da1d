// Grid-world episode simulation and record export

use anyhow::{Context, Result};
use arrow_array::RecordBatch;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use rlai_core::{
    apply_policy, discounted_returns, MarkovRewardProcess, SimulationConfig, UniformPolicy,
};
use rlai_env::{
    episode_steps, goal_table, lengths_table, steps_table, terminal_table, write_parquet,
    EpisodeLength, GridWorld, GridWorldConfig, GOAL_REWARD,
};

use crate::GridWorldArgs;

/// Table name prefix when `--prefix` is not given
const DEFAULT_PREFIX: &str = "uniform";

/// Layout of the `--config` file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GridRunConfig {
    simulation: SimulationConfig,
    grid: GridWorldConfig,
}

/// What a grid-world run produced
#[derive(Debug)]
pub struct GridRunSummary {
    pub episodes: usize,
    pub truncated: usize,
    pub reached_goal: usize,
    pub mean_length: f64,
    pub mean_return: f64,
    pub first_file: PathBuf,
    pub length_file: PathBuf,
}

impl GridRunSummary {
    pub fn print(&self) {
        println!("Grid world run complete");
        println!("   Episodes: {}", self.episodes);
        println!("   Reached goal: {}", self.reached_goal);
        println!("   Truncated: {}", self.truncated);
        println!("   Mean length: {:.2}", self.mean_length);
        println!("   Mean discounted return: {:.4}", self.mean_return);
        println!("   First episode: {}", self.first_file.display());
        println!("   Episode lengths: {}", self.length_file.display());
    }
}

fn load_config(args: &GridWorldArgs) -> Result<GridRunConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str::<GridRunConfig>(&json)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => GridRunConfig::default(),
    };

    if let Some(episodes) = args.episodes {
        config.simulation.episodes = episodes;
    }
    if let Some(max_steps) = args.max_steps {
        config.simulation.max_steps = Some(max_steps);
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(gamma) = args.gamma {
        config.simulation.gamma = gamma;
    }

    config.simulation.validate()?;
    Ok(config)
}

pub fn run_grid_world(args: &GridWorldArgs) -> Result<GridRunSummary> {
    let GridRunConfig { simulation, grid } = load_config(args)?;

    let world = GridWorld::new(grid).context("Invalid grid world")?;
    let goal = world.config().goal;
    let policy = UniformPolicy::new(&world);
    let process = apply_policy(&world, &policy);
    let init = world.start_distribution();
    let max_steps = simulation.max_steps.unwrap_or(usize::MAX);

    info!(
        episodes = simulation.episodes,
        seed = ?simulation.seed,
        max_steps = ?simulation.max_steps,
        "simulating grid world"
    );

    let mut first_episode = Vec::new();
    let mut lengths = Vec::with_capacity(simulation.episodes);
    let mut truncated = 0;
    let mut reached_goal = 0;
    let mut total_return = 0.0;

    for episode in 0..simulation.episodes {
        let steps = process
            .simulate_reward(&init, simulation.episode_rng(episode))
            .take(max_steps)
            .collect::<rlai_core::Result<Vec<_>>>()
            .with_context(|| format!("Episode {episode} failed"))?;

        match steps.last() {
            Some(last) if last.is_final() => {
                if last.reward == GOAL_REWARD {
                    reached_goal += 1;
                }
            }
            _ => {
                warn!(
                    episode,
                    max_steps,
                    "episode truncated before reaching a terminal state"
                );
                truncated += 1;
            }
        }

        let rewards: Vec<f64> = steps.iter().map(|step| step.reward).collect();
        let episode_return = discounted_returns(&rewards, simulation.gamma)
            .first()
            .copied()
            .unwrap_or(0.0);
        debug!(
            episode,
            length = steps.len(),
            episode_return,
            "episode finished"
        );

        total_return += episode_return;
        lengths.push(EpisodeLength {
            length: steps.len() as u64,
        });
        if episode == 0 {
            first_episode = steps;
        }
    }

    fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create {}", args.out.display()))?;
    let prefix = args.prefix.as_deref().unwrap_or(DEFAULT_PREFIX);
    let table_path = |name: &str| args.out.join(format!("{prefix}-{name}.parquet"));

    let first_file = table_path("first");
    let length_file = table_path("length");
    write_table(&first_file, &steps_table(&episode_steps(&first_episode))?)?;
    write_table(&length_file, &lengths_table(&lengths)?)?;
    write_table(&table_path("goal"), &goal_table(goal, lengths.len())?)?;
    let pits = terminal_table(&world.config().pits)?;
    write_table(&table_path("terminal"), &pits)?;
    info!(out = %args.out.display(), prefix, "wrote episode tables");

    let episodes = simulation.episodes;
    let denom = episodes.max(1) as f64;
    let mean_length = lengths.iter().map(|l| l.length as f64).sum::<f64>() / denom;

    Ok(GridRunSummary {
        episodes,
        truncated,
        reached_goal,
        mean_length,
        mean_return: total_return / denom,
        first_file,
        length_file,
    })
}

fn write_table(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_parquet(BufWriter::new(file), batch)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
