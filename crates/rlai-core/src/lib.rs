//! Core abstractions for reinforcement-learning experiments
//!
//! This crate provides the substrate RL algorithms are built on:
//! sampling-only probability distributions, terminal/non-terminal state
//! classification, and Markov processes that lazily simulate trajectories.
//!
//! Randomness is always an explicit argument. Nothing in this crate keeps a
//! global generator, so seeded runs are reproducible and trajectories can be
//! simulated on different threads with their own generators.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builtin;
pub mod config;
pub mod decision;
pub mod distribution;
pub mod error;
pub mod process;
pub mod state;
pub mod trajectory;

// Re-export core traits and types
pub use builtin::{Bernoulli, Choose, Constant, Die, Gaussian};
pub use config::SimulationConfig;
pub use decision::{
    apply_policy, DeterministicPolicy, MarkovDecisionProcess, MarkovRewardProcess, Policy,
    PolicyProcess, RewardSimulation, UniformPolicy,
};
pub use distribution::{
    expected_value, BoxDistribution, Distribution, SampledDistribution, DEFAULT_EXPECTATION_SAMPLES,
};
pub use error::{Result, RlaiError};
pub use process::{MarkovProcess, Simulation};
pub use state::{NonTerminal, State};
pub use trajectory::{discounted_returns, total_reward, TransitionStep};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Distribution, MarkovDecisionProcess, MarkovProcess, MarkovRewardProcess, NonTerminal,
        Policy, Result, State,
    };
}
