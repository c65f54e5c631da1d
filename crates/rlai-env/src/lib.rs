//! Environments for rlai
//!
//! Each environment is a [`MarkovDecisionProcess`]: pair it with a policy
//! through [`rlai_core::apply_policy`] to simulate episodes.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod grid_world;
pub mod records;

// Re-export environments
pub use error::{RecordError, RecordResult};
pub use grid_world::{Cell, GridAction, GridWorld, GridWorldConfig, GOAL_REWARD, PENALTY};
pub use records::{
    episode_steps, goal_table, lengths_from_table, lengths_table, read_parquet, steps_from_table,
    steps_table, terminal_table, write_parquet, EpisodeLength, EpisodeStep,
};

// Re-export core types
pub use rlai_core::{MarkovDecisionProcess, NonTerminal, State, TransitionStep};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{GridAction, GridWorld, GridWorldConfig};
    pub use rlai_core::prelude::*;
}
