//! Transition records and return computation

use serde::{Deserialize, Serialize};

use crate::{NonTerminal, State};

/// One step of a reward process: where it was, where it went, what it earned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionStep<S> {
    /// State the transition started from
    pub state: NonTerminal<S>,
    /// State the transition reached
    pub next_state: State<S>,
    /// Reward collected on the way
    pub reward: f64,
}

impl<S> TransitionStep<S> {
    /// Whether this step ended the episode
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.next_state.is_terminal()
    }
}

/// Discounted return `G_t = r_t + gamma * G_{t+1}` for every step, with `G_T = 0`
#[must_use]
pub fn discounted_returns(rewards: &[f64], gamma: f64) -> Vec<f64> {
    let mut returns = vec![0.0; rewards.len()];
    let mut running_return = 0.0;

    for i in (0..rewards.len()).rev() {
        running_return = rewards[i] + gamma * running_return;
        returns[i] = running_return;
    }

    returns
}

/// Sum of rewards over a sequence of steps
pub fn total_reward<'a, S: 'a>(steps: impl IntoIterator<Item = &'a TransitionStep<S>>) -> f64 {
    steps.into_iter().map(|step| step.reward).sum()
}
