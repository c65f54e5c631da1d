//! Property tests for distributions, state dispatch and simulation

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rlai_core::prelude::*;
use rlai_core::{expected_value, Constant, Die, Gaussian, RlaiError};

/// Deterministic chain of `k` non-terminal steps followed by a terminal one
struct Chain {
    k: u32,
}

impl MarkovProcess<u32> for Chain {
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

proptest! {
    #[test]
    fn die_rolls_stay_in_range(sides in 1u32..1_000, seed in any::<u64>()) {
        let die = Die::new(sides).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);

        for roll in die.sample_n(64, &mut rng) {
            prop_assert!((1..=sides).contains(&roll));
        }
    }

    #[test]
    fn gaussian_accepts_every_valid_parameter(mu in -1e6f64..1e6, sigma in 0f64..1e3) {
        prop_assert!(Gaussian::new(mu, sigma).is_ok());
    }

    #[test]
    fn gaussian_rejects_negative_sigma(mu in -1e6f64..1e6, sigma in -1e3f64..-1e-9) {
        let result = Gaussian::new(mu, sigma);
        prop_assert!(matches!(result, Err(RlaiError::InvalidParameter(_))));
    }

    #[test]
    fn terminal_never_calls_handler(x in any::<i64>(), default in any::<i64>()) {
        let state = State::Terminal(x);
        let out = state.on_non_terminal(
            |_| panic!("handler called on a terminal state"),
            default,
        );
        prop_assert_eq!(out, default);
    }

    #[test]
    fn non_terminal_always_calls_handler(x in -1_000i64..1_000) {
        let state = State::NonTerminal(x);
        prop_assert_eq!(state.on_non_terminal(|v| Some(v * 2), None), Some(x * 2));
    }

    #[test]
    fn chain_yields_k_plus_two_states(k in 0u32..200) {
        let init = Constant::new(NonTerminal(0u32));
        let states: Vec<_> = Chain { k }
            .simulate(&init, StdRng::seed_from_u64(0))
            .collect::<Result<_>>()
            .unwrap();

        prop_assert_eq!(states.len() as u32, k + 2);
        for (i, state) in states.iter().enumerate() {
            prop_assert_eq!(*state.state(), i as u32);
            prop_assert_eq!(state.is_terminal(), i as u32 == k + 1);
        }
    }
}

#[test]
fn expected_value_rejects_zero_samples() {
    let mut rng = StdRng::seed_from_u64(0);
    let die = Die::new(6).unwrap();

    let err = expected_value(&die, |x| f64::from(x), 0, &mut rng).unwrap_err();
    assert!(matches!(err, RlaiError::InvalidArgument(_)));
}

#[test]
fn invalid_distributions_fail_at_construction() {
    assert!(matches!(Die::new(0), Err(RlaiError::InvalidParameter(_))));
    let gaussian = Gaussian::new(0.0, -1.0);
    assert!(matches!(gaussian, Err(RlaiError::InvalidParameter(_))));
}

#[test]
fn expected_even_roll_converges() {
    let mut rng = StdRng::seed_from_u64(2024);
    let die = Die::new(6).unwrap();
    let is_even = |x: u32| if x % 2 == 0 { 1.0 } else { 0.0 };

    let coarse = expected_value(&die, is_even, 100, &mut rng).unwrap();
    let fine = expected_value(&die, is_even, 100_000, &mut rng).unwrap();

    assert!((0.0..=1.0).contains(&coarse));
    assert!((fine - 0.5).abs() < 0.01, "fine = {fine}");
}

#[test]
fn process_can_be_shared_across_threads() {
    let chain = Chain { k: 10 };
    let init = Constant::new(NonTerminal(0u32));

    let lengths: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4u64)
            .map(|seed| {
                let chain = &chain;
                let init = &init;
                scope.spawn(move || {
                    chain
                        .simulate(init, StdRng::seed_from_u64(seed))
                        .count()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(lengths, vec![12; 4]);
}
