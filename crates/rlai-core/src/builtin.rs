//! Built-in distributions

use std::fmt;

use rand::{Rng, RngCore};
use rand_distr::{Distribution as _, Normal};

use crate::{Distribution, Result, RlaiError};

/// Fair die with `sides` faces numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Die {
    sides: u32,
}

impl Die {
    /// Create a die, rejecting `sides < 1`
    pub fn new(sides: u32) -> Result<Self> {
        if sides < 1 {
            return Err(RlaiError::InvalidParameter(format!(
                "a die needs at least one side, got {sides}"
            )));
        }
        Ok(Self { sides })
    }

    /// Number of faces
    #[must_use]
    pub fn sides(&self) -> u32 {
        self.sides
    }
}

impl Distribution<u32> for Die {
    fn sample(&self, rng: &mut dyn RngCore) -> u32 {
        rng.gen_range(1..=self.sides)
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Die(sides={})", self.sides)
    }
}

/// Normal distribution with mean `mu` and standard deviation `sigma`
#[derive(Debug, Clone, Copy)]
pub struct Gaussian {
    mu: f64,
    sigma: f64,
    normal: Normal<f64>,
}

impl Gaussian {
    /// Create a Gaussian, rejecting negative or non-finite parameters
    pub fn new(mu: f64, sigma: f64) -> Result<Self> {
        if !mu.is_finite() {
            return Err(RlaiError::InvalidParameter(format!(
                "gaussian mean must be finite, got {mu}"
            )));
        }
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(RlaiError::InvalidParameter(format!(
                "gaussian standard deviation must be finite and non-negative, got {sigma}"
            )));
        }

        let normal = Normal::new(mu, sigma).map_err(|e| {
            RlaiError::InvalidParameter(format!("gaussian({mu}, {sigma}): {e}"))
        })?;
        Ok(Self { mu, sigma, normal })
    }

    /// Mean
    #[must_use]
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Standard deviation
    #[must_use]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Distribution<f64> for Gaussian {
    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        self.normal.sample(rng)
    }

    fn sample_n(&self, n: usize, rng: &mut dyn RngCore) -> Vec<f64> {
        self.normal.sample_iter(rng).take(n).collect()
    }
}

impl PartialEq for Gaussian {
    fn eq(&self, other: &Self) -> bool {
        self.mu == other.mu && self.sigma == other.sigma
    }
}

impl fmt::Display for Gaussian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gaussian(mu={}, sigma={})", self.mu, self.sigma)
    }
}

/// Point mass on a single value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant<A> {
    value: A,
}

impl<A> Constant<A> {
    /// Create a point mass
    pub fn new(value: A) -> Self {
        Self { value }
    }

    /// The value every draw returns
    pub fn value(&self) -> &A {
        &self.value
    }
}

impl<A: Clone> Distribution<A> for Constant<A> {
    fn sample(&self, _rng: &mut dyn RngCore) -> A {
        self.value.clone()
    }

    fn sample_n(&self, n: usize, _rng: &mut dyn RngCore) -> Vec<A> {
        vec![self.value.clone(); n]
    }
}

/// Biased coin returning `true` with probability `p`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bernoulli {
    p: f64,
}

impl Bernoulli {
    /// Create a coin, rejecting `p` outside `[0, 1]`
    pub fn new(p: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(RlaiError::InvalidParameter(format!(
                "bernoulli probability must lie in [0, 1], got {p}"
            )));
        }
        Ok(Self { p })
    }

    /// Probability of `true`
    #[must_use]
    pub fn p(&self) -> f64 {
        self.p
    }
}

impl Distribution<bool> for Bernoulli {
    fn sample(&self, rng: &mut dyn RngCore) -> bool {
        rng.gen_bool(self.p)
    }
}

/// Uniform choice among a fixed, non-empty set of options
#[derive(Debug, Clone, PartialEq)]
pub struct Choose<A> {
    options: Vec<A>,
}

impl<A> Choose<A> {
    /// Create a uniform choice, rejecting an empty option list
    pub fn new(options: Vec<A>) -> Result<Self> {
        if options.is_empty() {
            return Err(RlaiError::InvalidParameter(
                "cannot choose uniformly from an empty set".to_string(),
            ));
        }
        Ok(Self { options })
    }

    /// The options, in construction order
    pub fn options(&self) -> &[A] {
        &self.options
    }
}

impl<A: Clone> Distribution<A> for Choose<A> {
    fn sample(&self, rng: &mut dyn RngCore) -> A {
        self.options[rng.gen_range(0..self.options.len())].clone()
    }
}
