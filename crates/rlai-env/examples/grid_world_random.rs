//! Example: uniformly random policy walking the default grid world

use rlai_core::{apply_policy, total_reward, MarkovRewardProcess, SimulationConfig, UniformPolicy};
use rlai_env::{GridWorld, GridWorldConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let world = GridWorld::new(GridWorldConfig::default())?;
    let policy = UniformPolicy::new(&world);
    let process = apply_policy(&world, &policy);
    let init = world.start_distribution();

    let config = SimulationConfig {
        seed: Some(42),
        episodes: 10,
        ..SimulationConfig::default()
    };

    let mut episode_rewards = Vec::new();
    for episode in 0..config.episodes {
        let steps = process
            .simulate_reward(&init, config.episode_rng(episode))
            .collect::<rlai_core::Result<Vec<_>>>()?;

        let reward = total_reward(&steps);
        episode_rewards.push(reward);

        let path: Vec<_> = steps.iter().map(|step| step.state.0).collect();
        println!(
            "Episode {}: Total Reward = {:.2}, Steps = {}, Path = {:?}",
            episode + 1,
            reward,
            steps.len(),
            path
        );
    }

    let avg_reward: f64 = episode_rewards.iter().sum::<f64>() / episode_rewards.len() as f64;
    println!(
        "\nAverage Reward over {} episodes: {:.2}",
        config.episodes, avg_reward
    );

    Ok(())
}
