// Die and Gaussian sampling demo

use anyhow::{Context, Result};
use rlai_core::{expected_value, Die, Distribution, Gaussian, SimulationConfig};

/// Number of die rolls and Gaussian draws printed by the demo
const DIE_ROLLS: usize = 100;
const GAUSSIAN_DRAWS: usize = 10;

pub fn run_demo(sides: u32, mu: f64, sigma: f64, samples: usize, seed: Option<u64>) -> Result<()> {
    let config = SimulationConfig {
        seed,
        ..SimulationConfig::default()
    };
    let mut rng = config.rng();

    let die = Die::new(sides).context("Invalid die")?;
    println!("{die}");
    println!("{:?}", die.sample_n(DIE_ROLLS, &mut rng));

    let p_even = expected_value(&die, is_even, samples, &mut rng)
        .context("Failed to estimate the even-roll probability")?;
    println!("{p_even}");

    let gaussian = Gaussian::new(mu, sigma).context("Invalid Gaussian")?;
    println!("{gaussian}");
    println!("{:?}", gaussian.sample_n(GAUSSIAN_DRAWS, &mut rng));

    Ok(())
}

fn is_even(x: u32) -> f64 {
    if x % 2 == 0 {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_rejects_bad_parameters() {
        assert!(run_demo(0, 0.0, 1.0, 100, Some(1)).is_err());
        assert!(run_demo(6, 0.0, -1.0, 100, Some(1)).is_err());
        assert!(run_demo(6, 0.0, 1.0, 0, Some(1)).is_err());
    }

    #[test]
    fn test_demo_runs_with_defaults() {
        assert!(run_demo(6, 0.0, 1.0, 100, Some(1)).is_ok());
    }

    #[test]
    fn test_is_even() {
        assert_eq!(is_even(2), 1.0);
        assert_eq!(is_even(5), 0.0);
    }
}
