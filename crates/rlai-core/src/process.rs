//! Markov processes and lazy trajectory simulation

use std::iter::FusedIterator;

use rand::RngCore;
use tracing::trace;

use crate::{Distribution, NonTerminal, Result, State};

/// A Markov process over states of type `S`.
///
/// Implementors only describe how a non-terminal state moves on; trajectories
/// come from [`MarkovProcess::simulate`]. A process holds no per-trajectory
/// state, so one instance can drive any number of independent simulations.
pub trait MarkovProcess<S> {
    /// Distribution over the successor states of one transition
    type Next: Distribution<State<S>>;

    /// Distribution of the state following `state`.
    ///
    /// Returns [`crate::RlaiError::Transition`] when `state` violates the
    /// process's preconditions (for example, it is unreachable).
    fn transition(&self, state: &NonTerminal<S>) -> Result<Self::Next>;

    /// Lazily simulate one trajectory starting from a draw of `init`.
    ///
    /// The first element is the initial state. Each further element costs
    /// exactly one call to [`MarkovProcess::transition`] and one sample, and
    /// the sequence ends right after the first terminal state.
    fn simulate<'a, D, R>(&'a self, init: &'a D, rng: R) -> Simulation<'a, Self, D, S, R>
    where
        Self: Sized,
        D: Distribution<NonTerminal<S>> + ?Sized,
        R: RngCore,
    {
        Simulation {
            process: self,
            init,
            rng,
            cursor: Cursor::Start,
            steps: 0,
        }
    }
}

pub(crate) enum Cursor<S> {
    Start,
    Running(NonTerminal<S>),
    Finished,
}

/// Iterator returned by [`MarkovProcess::simulate`].
///
/// Yields `Ok(state)` for every state of the trajectory. A failing transition
/// is yielded once as `Err` and ends the iterator.
pub struct Simulation<'a, P, D: ?Sized, S, R> {
    process: &'a P,
    init: &'a D,
    rng: R,
    cursor: Cursor<S>,
    steps: usize,
}

impl<'a, P, D, S, R> Simulation<'a, P, D, S, R>
where
    D: ?Sized,
{
    /// Number of states yielded so far
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl<'a, P, D, S, R> Iterator for Simulation<'a, P, D, S, R>
where
    P: MarkovProcess<S>,
    D: Distribution<NonTerminal<S>> + ?Sized,
    S: Clone,
    R: RngCore,
{
    type Item = Result<State<S>>;

    fn next(&mut self) -> Option<Self::Item> {
        let state = match std::mem::replace(&mut self.cursor, Cursor::Finished) {
            Cursor::Start => State::from(self.init.sample(&mut self.rng)),
            Cursor::Running(current) => match self.process.transition(&current) {
                Ok(next) => next.sample(&mut self.rng),
                Err(err) => {
                    trace!(step = self.steps, "transition failed, ending trajectory");
                    return Some(Err(err));
                }
            },
            Cursor::Finished => return None,
        };

        self.steps += 1;
        trace!(
            step = self.steps,
            terminal = state.is_terminal(),
            "simulated state"
        );

        if let State::NonTerminal(payload) = &state {
            self.cursor = Cursor::Running(NonTerminal(payload.clone()));
        }
        Some(Ok(state))
    }
}

impl<'a, P, D, S, R> FusedIterator for Simulation<'a, P, D, S, R>
where
    P: MarkovProcess<S>,
    D: Distribution<NonTerminal<S>> + ?Sized,
    S: Clone,
    R: RngCore,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{Constant, Die};
    use crate::{BoxDistribution, RlaiError};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Every transition lands on a terminal state
    struct Absorbing;

    impl MarkovProcess<u32> for Absorbing {
        type Next = Constant<State<u32>>;

        fn transition(&self, state: &NonTerminal<u32>) -> Result<Self::Next> {
            Ok(Constant::new(State::Terminal(state.0 + 1)))
        }
    }

    /// Counts up deterministically and stops after `k` non-terminal steps
    struct Countdown {
        k: u32,
    }

    impl MarkovProcess<u32> for Countdown {
        type Next = Constant<State<u32>>;

        fn transition(&self, state: &NonTerminal<u32>) -> Result<Self::Next> {
            let next = state.0 + 1;
            Ok(Constant::new(if next > self.k {
                State::Terminal(next)
            } else {
                State::NonTerminal(next)
            }))
        }
    }

    /// Fails on a chosen state
    struct Faulty {
        bad: u32,
    }

    impl MarkovProcess<u32> for Faulty {
        type Next = Constant<State<u32>>;

        fn transition(&self, state: &NonTerminal<u32>) -> Result<Self::Next> {
            if state.0 == self.bad {
                return Err(RlaiError::transition(anyhow::anyhow!(
                    "state {} is unreachable",
                    state.0
                )));
            }
            Ok(Constant::new(State::NonTerminal(state.0 + 1)))
        }
    }

    /// Random walk that never terminates
    struct Drift;

    impl MarkovProcess<i64> for Drift {
        type Next = BoxDistribution<'static, State<i64>>;

        fn transition(&self, state: &NonTerminal<i64>) -> Result<Self::Next> {
            let from = state.0;
            Ok(Box::new(Die::new(2).unwrap().map(move |roll| {
                State::NonTerminal(if roll == 1 { from - 1 } else { from + 1 })
            })))
        }
    }

    fn start(value: u32) -> Constant<NonTerminal<u32>> {
        Constant::new(NonTerminal(value))
    }

    #[test]
    fn test_absorbing_process_yields_two_states() {
        let init = start(0);
        let states: Vec<_> = Absorbing
            .simulate(&init, StdRng::seed_from_u64(0))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(states, vec![State::NonTerminal(0), State::Terminal(1)]);
    }

    #[test]
    fn test_countdown_yields_k_plus_two_states_in_order() {
        let init = start(0);
        let process = Countdown { k: 4 };
        let states: Vec<_> = process
            .simulate(&init, StdRng::seed_from_u64(0))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(
            states,
            vec![
                State::NonTerminal(0),
                State::NonTerminal(1),
                State::NonTerminal(2),
                State::NonTerminal(3),
                State::NonTerminal(4),
                State::Terminal(5),
            ]
        );
    }

    #[test]
    fn test_iterator_stays_exhausted() {
        let init = start(0);
        let mut sim = Absorbing.simulate(&init, StdRng::seed_from_u64(0));

        assert!(sim.next().is_some());
        assert!(sim.next().is_some());
        assert!(sim.next().is_none());
        assert!(sim.next().is_none());
        assert_eq!(sim.steps(), 2);
    }

    #[test]
    fn test_transition_error_keeps_earlier_states() {
        let init = start(0);
        let process = Faulty { bad: 2 };
        let mut sim = process.simulate(&init, StdRng::seed_from_u64(0));

        assert_eq!(sim.next().unwrap().unwrap(), State::NonTerminal(0));
        assert_eq!(sim.next().unwrap().unwrap(), State::NonTerminal(1));
        assert_eq!(sim.next().unwrap().unwrap(), State::NonTerminal(2));

        let err = sim.next().unwrap().unwrap_err();
        assert!(matches!(err, RlaiError::Transition(_)));
        assert_eq!(err.to_string(), "state 2 is unreachable");
        assert!(sim.next().is_none());
    }

    #[test]
    fn test_infinite_process_can_be_truncated() {
        let init = Constant::new(NonTerminal(0i64));
        let states: Vec<_> = Drift
            .simulate(&init, StdRng::seed_from_u64(9))
            .take(50)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(states.len(), 50);
        assert!(states.iter().all(|s| !s.is_terminal()));
        for pair in states.windows(2) {
            assert_eq!((pair[1].state() - pair[0].state()).abs(), 1);
        }
    }

    #[test]
    fn test_seeded_simulations_are_identical() {
        let init = Constant::new(NonTerminal(0i64));
        let run = |seed| {
            Drift
                .simulate(&init, StdRng::seed_from_u64(seed))
                .take(30)
                .collect::<Result<Vec<_>>>()
                .unwrap()
        };
        let first = run(42);
        let second = run(42);

        assert_eq!(first, second);
    }
}
