//! Reward processes, decision processes and policies
//!
//! A [`MarkovDecisionProcess`] combined with a [`Policy`] through
//! [`apply_policy`] is a [`MarkovRewardProcess`], and every reward process is
//! also a plain [`MarkovProcess`].

use std::iter::FusedIterator;
use std::marker::PhantomData;

use rand::RngCore;
use tracing::trace;

use crate::builtin::{Choose, Constant};
use crate::distribution::Mapped;
use crate::process::{Cursor, MarkovProcess};
use crate::trajectory::TransitionStep;
use crate::{Distribution, NonTerminal, Result, RlaiError, State};

/// A Markov process that also pays a reward on every transition
pub trait MarkovRewardProcess<S> {
    /// Joint distribution of successor state and reward
    type Next: Distribution<(State<S>, f64)>;

    /// Distribution of `(next_state, reward)` after `state`
    fn transition_reward(&self, state: &NonTerminal<S>) -> Result<Self::Next>;

    /// Lazily simulate one episode as a sequence of transitions.
    ///
    /// Same laziness and error rules as [`MarkovProcess::simulate`]; the last
    /// step yielded is the one reaching a terminal state.
    fn simulate_reward<'a, D, R>(
        &'a self,
        init: &'a D,
        rng: R,
    ) -> RewardSimulation<'a, Self, D, S, R>
    where
        Self: Sized,
        D: Distribution<NonTerminal<S>> + ?Sized,
        R: RngCore,
    {
        RewardSimulation {
            process: self,
            init,
            rng,
            cursor: Cursor::Start,
        }
    }
}

fn drop_reward<S>((state, _reward): (State<S>, f64)) -> State<S> {
    state
}

impl<S, P> MarkovProcess<S> for P
where
    P: MarkovRewardProcess<S>,
{
    type Next = Mapped<P::Next, fn((State<S>, f64)) -> State<S>, (State<S>, f64)>;

    fn transition(&self, state: &NonTerminal<S>) -> Result<Self::Next> {
        let joint = self.transition_reward(state)?;
        let strip: fn((State<S>, f64)) -> State<S> = drop_reward::<S>;
        Ok(joint.map(strip))
    }
}

/// Iterator returned by [`MarkovRewardProcess::simulate_reward`]
pub struct RewardSimulation<'a, P, D: ?Sized, S, R> {
    process: &'a P,
    init: &'a D,
    rng: R,
    cursor: Cursor<S>,
}

impl<'a, P, D, S, R> Iterator for RewardSimulation<'a, P, D, S, R>
where
    P: MarkovRewardProcess<S>,
    D: Distribution<NonTerminal<S>> + ?Sized,
    S: Clone,
    R: RngCore,
{
    type Item = Result<TransitionStep<S>>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = match std::mem::replace(&mut self.cursor, Cursor::Finished) {
            Cursor::Start => self.init.sample(&mut self.rng),
            Cursor::Running(current) => current,
            Cursor::Finished => return None,
        };

        let (next_state, reward) = match self.process.transition_reward(&current) {
            Ok(next) => next.sample(&mut self.rng),
            Err(err) => return Some(Err(err)),
        };
        trace!(
            reward,
            terminal = next_state.is_terminal(),
            "simulated transition"
        );

        if let State::NonTerminal(payload) = &next_state {
            self.cursor = Cursor::Running(NonTerminal(payload.clone()));
        }
        Some(Ok(TransitionStep {
            state: current,
            next_state,
            reward,
        }))
    }
}

impl<'a, P, D, S, R> FusedIterator for RewardSimulation<'a, P, D, S, R>
where
    P: MarkovRewardProcess<S>,
    D: Distribution<NonTerminal<S>> + ?Sized,
    S: Clone,
    R: RngCore,
{
}

/// A Markov decision process with states `S` and actions `A`
pub trait MarkovDecisionProcess<S, A> {
    /// Joint distribution of successor state and reward for one action
    type Outcome: Distribution<(State<S>, f64)>;

    /// Actions available from `state`
    fn actions_at(&self, state: &NonTerminal<S>) -> Vec<A>;

    /// Outcome of taking `action` in `state`
    fn step(&self, state: &NonTerminal<S>, action: &A) -> Self::Outcome;
}

/// Maps a non-terminal state to a distribution over actions
pub trait Policy<S, A> {
    /// Distribution over the chosen action
    type Actions: Distribution<A>;

    /// Action distribution at `state`
    fn act(&self, state: &NonTerminal<S>) -> Result<Self::Actions>;
}

/// Picks uniformly among the actions an MDP offers at each state
#[derive(Debug)]
pub struct UniformPolicy<'a, M> {
    mdp: &'a M,
}

impl<'a, M> UniformPolicy<'a, M> {
    /// Create a uniform policy over `mdp`'s actions
    pub fn new(mdp: &'a M) -> Self {
        Self { mdp }
    }
}

impl<'a, S, A, M> Policy<S, A> for UniformPolicy<'a, M>
where
    M: MarkovDecisionProcess<S, A>,
    A: Clone,
{
    type Actions = Choose<A>;

    fn act(&self, state: &NonTerminal<S>) -> Result<Self::Actions> {
        Choose::new(self.mdp.actions_at(state)).map_err(|_| {
            RlaiError::transition(anyhow::anyhow!("no action is available from this state"))
        })
    }
}

/// Always takes the action computed by a function of the state
pub struct DeterministicPolicy<F> {
    choose: F,
}

impl<F> DeterministicPolicy<F> {
    /// Wrap an action-selection function
    pub fn new(choose: F) -> Self {
        Self { choose }
    }
}

impl<S, A, F> Policy<S, A> for DeterministicPolicy<F>
where
    F: Fn(&S) -> A,
    A: Clone,
{
    type Actions = Constant<A>;

    fn act(&self, state: &NonTerminal<S>) -> Result<Self::Actions> {
        Ok(Constant::new((self.choose)(state.state())))
    }
}

/// The reward process obtained by following `policy` in `mdp`
pub struct PolicyProcess<'a, M, P, A> {
    mdp: &'a M,
    policy: &'a P,
    _action: PhantomData<fn() -> A>,
}

/// Follow `policy` in `mdp`, producing a Markov reward process
pub fn apply_policy<'a, S, A, M, P>(mdp: &'a M, policy: &'a P) -> PolicyProcess<'a, M, P, A>
where
    M: MarkovDecisionProcess<S, A>,
    P: Policy<S, A>,
{
    PolicyProcess {
        mdp,
        policy,
        _action: PhantomData,
    }
}

/// One policy-driven transition: sample an action, then the MDP's outcome
pub struct PolicyStep<'a, M, D, S, A> {
    mdp: &'a M,
    state: NonTerminal<S>,
    actions: D,
    _action: PhantomData<fn() -> A>,
}

impl<'a, M, D, S, A> Distribution<(State<S>, f64)> for PolicyStep<'a, M, D, S, A>
where
    M: MarkovDecisionProcess<S, A>,
    D: Distribution<A>,
{
    fn sample(&self, rng: &mut dyn RngCore) -> (State<S>, f64) {
        let action = self.actions.sample(rng);
        self.mdp.step(&self.state, &action).sample(rng)
    }
}

impl<'a, S, A, M, P> MarkovRewardProcess<S> for PolicyProcess<'a, M, P, A>
where
    M: MarkovDecisionProcess<S, A>,
    P: Policy<S, A>,
    S: Clone,
{
    type Next = PolicyStep<'a, M, P::Actions, S, A>;

    fn transition_reward(&self, state: &NonTerminal<S>) -> Result<Self::Next> {
        Ok(PolicyStep {
            mdp: self.mdp,
            state: state.clone(),
            actions: self.policy.act(state)?,
            _action: PhantomData,
        })
    }
}
