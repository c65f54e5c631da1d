//! The sampling abstraction and the Monte Carlo expectation estimator

use std::fmt;
use std::marker::PhantomData;

use rand::RngCore;
use tracing::trace;

use crate::{Result, RlaiError};

/// Number of draws used by [`expected_value`] callers that have no better choice.
pub const DEFAULT_EXPECTATION_SAMPLES: usize = 100;

/// A probability distribution that can only be sampled.
///
/// Randomness is always supplied by the caller, so a distribution never holds
/// mutable state and can be shared freely between trajectories.
pub trait Distribution<A> {
    /// Draw one value.
    fn sample(&self, rng: &mut dyn RngCore) -> A;

    /// Draw `n` independent values.
    ///
    /// Implementations may override this with a batched draw as long as every
    /// element follows the same law as [`Distribution::sample`].
    fn sample_n(&self, n: usize, rng: &mut dyn RngCore) -> Vec<A> {
        (0..n).map(|_| self.sample(rng)).collect()
    }

    /// Push every sample through `f`.
    fn map<B, F>(self, f: F) -> Mapped<Self, F, A>
    where
        Self: Sized,
        F: Fn(A) -> B,
    {
        Mapped {
            inner: self,
            f,
            _input: PhantomData,
        }
    }
}

impl<A, D> Distribution<A> for &D
where
    D: Distribution<A> + ?Sized,
{
    fn sample(&self, rng: &mut dyn RngCore) -> A {
        (**self).sample(rng)
    }

    fn sample_n(&self, n: usize, rng: &mut dyn RngCore) -> Vec<A> {
        (**self).sample_n(n, rng)
    }
}

impl<A, D> Distribution<A> for Box<D>
where
    D: Distribution<A> + ?Sized,
{
    fn sample(&self, rng: &mut dyn RngCore) -> A {
        (**self).sample(rng)
    }

    fn sample_n(&self, n: usize, rng: &mut dyn RngCore) -> Vec<A> {
        (**self).sample_n(n, rng)
    }
}

/// Boxed distribution for transition functions that pick their law at runtime.
pub type BoxDistribution<'a, A> = Box<dyn Distribution<A> + Send + Sync + 'a>;

/// Monte Carlo estimate of `E[f(X)]` from `n` independent draws of `dist`.
///
/// The standard error shrinks like `1/sqrt(n)` for finite-variance `f`.
pub fn expected_value<A, D, F>(dist: &D, f: F, n: usize, rng: &mut dyn RngCore) -> Result<f64>
where
    D: Distribution<A> + ?Sized,
    F: Fn(A) -> f64,
{
    if n < 1 {
        return Err(RlaiError::InvalidArgument(format!(
            "expected_value needs at least one sample, got n = {n}"
        )));
    }

    let total: f64 = (0..n).map(|_| f(dist.sample(rng))).sum();
    let estimate = total / n as f64;
    trace!(samples = n, estimate, "estimated expectation");
    Ok(estimate)
}

/// Distribution defined by an arbitrary sampling closure.
pub struct SampledDistribution<F> {
    sampler: F,
}

impl<F> SampledDistribution<F> {
    /// Wrap a sampling closure
    pub fn new(sampler: F) -> Self {
        Self { sampler }
    }
}

impl<A, F> Distribution<A> for SampledDistribution<F>
where
    F: Fn(&mut dyn RngCore) -> A,
{
    fn sample(&self, rng: &mut dyn RngCore) -> A {
        (self.sampler)(rng)
    }
}

impl<F> fmt::Debug for SampledDistribution<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SampledDistribution")
    }
}

/// Distribution produced by [`Distribution::map`].
pub struct Mapped<D, F, A> {
    inner: D,
    f: F,
    _input: PhantomData<fn() -> A>,
}

impl<A, B, D, F> Distribution<B> for Mapped<D, F, A>
where
    D: Distribution<A>,
    F: Fn(A) -> B,
{
    fn sample(&self, rng: &mut dyn RngCore) -> B {
        (self.f)(self.inner.sample(rng))
    }

    fn sample_n(&self, n: usize, rng: &mut dyn RngCore) -> Vec<B> {
        self.inner.sample_n(n, rng).into_iter().map(&self.f).collect()
    }
}

impl<D: fmt::Debug, F, A> fmt::Debug for Mapped<D, F, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapped").field("inner", &self.inner).finish_non_exhaustive()
    }
}
