//! Probability distribution samplers built on the bias-free primitives.
//!
//! Every sampler validates its parameters before the first draw, so invalid
//! input never consumes entropy.
//!
//! | Sampler | Method |
//! |---|---|
//! | Bernoulli | `u < p` |
//! | Categorical | scaled cumulative walk |
//! | Exponential | inversion, `-ln(1-u)/λ` |
//! | Normal | Box-Muller, second deviate cached |
//! | Uniform | `lo + u(hi-lo)` |
//! | Poisson | Knuth for `λ < 30`, PTRS (Hörmann 1993) above |
//! | Gamma | Marsaglia-Tsang for `α ≥ 1`, boosted for `α < 1` |

use std::f64::consts::PI;
use std::time::{Duration, SystemTime};

use statrs::function::gamma::ln_gamma;

use crate::error::{Error, Result};
use crate::generator::Generator;

/// Smallest positive subnormal `f64`, substituted for a zero uniform before taking a log.
pub(crate) const TINY: f64 = 5e-324;

/// Poisson means at or above this use PTRS instead of Knuth's method.
pub const POISSON_PTRS_THRESHOLD: f64 = 30.0;

/// Validate a categorical weight vector and return its sum.
///
/// Weights must be finite and non-negative with a positive total.
pub(crate) fn weight_sum(weights: &[f64]) -> Result<f64> {
    if weights.is_empty() {
        return Err(Error::invalid("weights must be non-empty"));
    }
    let mut sum = 0.0;
    for &w in weights {
        if !w.is_finite() || w < 0.0 {
            return Err(Error::invalid("weights must be finite and >= 0"));
        }
        sum += w;
    }
    if !sum.is_finite() || sum <= 0.0 {
        return Err(Error::invalid("weights must sum to a finite value > 0"));
    }
    Ok(sum)
}

/// Walk the cumulative weights until the running total exceeds `target`.
///
/// If rounding lets the walk run off the end, the last positive-weight
/// index is returned.
pub(crate) fn cumulative_index(weights: &[f64], target: f64) -> usize {
    let mut acc = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        acc += w;
        if target < acc {
            return i;
        }
    }
    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .unwrap_or(weights.len() - 1)
}

/// Convert an accepted PTRS count, failing instead of saturating at `u64::MAX`.
fn poisson_count(k: f64) -> Result<u64> {
    // `u64::MAX as f64` rounds up to 2^64, the first unrepresentable count.
    if k >= u64::MAX as f64 {
        return Err(Error::ResultOutOfRange);
    }
    Ok(k.max(0.0) as u64)
}

impl Generator {
    /// Uniform in `(0, 1)`: a zero draw is replaced by [`TINY`].
    fn positive_uniform(&self) -> Result<f64> {
        let u = self.uniform_f64()?;
        Ok(if u == 0.0 { TINY } else { u })
    }

    /// `true` with probability `p`, `p ∈ [0, 1]`.
    pub fn bernoulli(&self, p: f64) -> Result<bool> {
        if p.is_nan() || !(0.0..=1.0).contains(&p) {
            return Err(Error::invalid("p must be in [0,1]"));
        }
        Ok(self.uniform_f64()? < p)
    }

    /// Index in `[0, weights.len())` with probability proportional to its weight.
    ///
    /// Zero-weight indices are never returned.
    pub fn categorical(&self, weights: &[f64]) -> Result<usize> {
        let sum = weight_sum(weights)?;
        let target = self.uniform_f64()? * sum;
        Ok(cumulative_index(weights, target))
    }

    /// Exponential with rate `lambda > 0`.
    pub fn exponential(&self, lambda: f64) -> Result<f64> {
        if !lambda.is_finite() || lambda <= 0.0 {
            return Err(Error::invalid("lambda must be finite and > 0"));
        }
        let u = self.positive_uniform()?;
        Ok(-(1.0 - u).ln() / lambda)
    }

    /// Uniform in `[lo, hi)`.
    pub fn uniform(&self, lo: f64, hi: f64) -> Result<f64> {
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(Error::invalid("uniform bounds must be finite with lo < hi"));
        }
        let u = self.uniform_f64()?;
        Ok(lo + u * (hi - lo))
    }

    // -----------------------------------------------------------------------
    // Normal
    // -----------------------------------------------------------------------

    /// Normal with mean `mu` and standard deviation `sigma >= 0`.
    ///
    /// `sigma == 0` returns `mu` without drawing.
    pub fn normal(&self, mu: f64, sigma: f64) -> Result<f64> {
        if mu.is_nan() || sigma.is_nan() || sigma < 0.0 {
            return Err(Error::invalid("mean must not be NaN and sigma must be >= 0"));
        }
        if sigma == 0.0 {
            return Ok(mu);
        }
        Ok(mu + sigma * self.standard_normal()?)
    }

    /// Standard normal deviate.
    ///
    /// Box-Muller yields two independent deviates per pair of uniforms. The
    /// second goes into the generator's single-slot spare and is handed to
    /// exactly one later caller. The slot lock is held across the draw, so
    /// concurrent callers can neither observe the same spare nor overwrite
    /// one that has not been consumed.
    pub fn standard_normal(&self) -> Result<f64> {
        if !self.caches_spare() {
            let (z0, _) = self.box_muller()?;
            return Ok(z0);
        }
        let mut spare = self.spare.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(z) = spare.take() {
            return Ok(z);
        }
        let (z0, z1) = self.box_muller()?;
        *spare = Some(z1);
        Ok(z0)
    }

    fn box_muller(&self) -> Result<(f64, f64)> {
        let u1 = self.positive_uniform()?;
        let u2 = self.uniform_f64()?;
        let r = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * PI * u2;
        Ok((r * theta.cos(), r * theta.sin()))
    }

    /// The generator clock shifted by `Normal(0, stddev_secs)` seconds.
    pub fn clock_normal(&self, stddev_secs: f64) -> Result<SystemTime> {
        let now = self.now();
        let jitter = self.normal(0.0, stddev_secs)?;
        let offset =
            Duration::try_from_secs_f64(jitter.abs()).map_err(|_| Error::ResultOutOfRange)?;
        let shifted = if jitter >= 0.0 {
            now.checked_add(offset)
        } else {
            now.checked_sub(offset)
        };
        shifted.ok_or(Error::ResultOutOfRange)
    }

    // -----------------------------------------------------------------------
    // Poisson
    // -----------------------------------------------------------------------

    /// Poisson with mean `lambda > 0`.
    ///
    /// Below [`POISSON_PTRS_THRESHOLD`] this multiplies uniforms (Knuth),
    /// O(λ) draws. At or above it, PTRS keeps the expected draw count constant.
    pub fn poisson(&self, lambda: f64) -> Result<u64> {
        if !lambda.is_finite() || lambda <= 0.0 {
            return Err(Error::invalid("lambda must be finite and > 0"));
        }
        if lambda < POISSON_PTRS_THRESHOLD {
            self.poisson_knuth(lambda)
        } else {
            self.poisson_ptrs(lambda)
        }
    }

    fn poisson_knuth(&self, lambda: f64) -> Result<u64> {
        let limit = (-lambda).exp();
        let mut k = 0u64;
        let mut p = 1.0;
        while p > limit {
            p *= self.uniform_f64()?;
            k += 1;
        }
        Ok(k - 1)
    }

    /// Transformed rejection with squeeze.
    ///
    /// Hörmann, "The transformed rejection method for generating Poisson
    /// random variables", Insurance: Mathematics and Economics 12 (1993).
    fn poisson_ptrs(&self, lambda: f64) -> Result<u64> {
        let slam = lambda.sqrt();
        let loglam = lambda.ln();
        let b = 0.931 + 2.53 * slam;
        let a = -0.059 + 0.02483 * b;
        let inv_alpha = 1.1239 + 1.1328 / (b - 3.4);
        let v_r = 0.9277 - 3.6224 / (b - 2.0);

        loop {
            let u = self.uniform_f64()? - 0.5;
            let v = self.uniform_f64()?;
            let us = 0.5 - u.abs();
            let k = ((2.0 * a / us + b) * u + lambda + 0.43).floor();

            if us >= 0.07 && v <= v_r {
                return poisson_count(k);
            }
            if k < 0.0 || (us < 0.013 && v > us) {
                continue;
            }
            let lhs = v.ln() + inv_alpha.ln() - (a / (us * us) + b).ln();
            let rhs = -lambda + k * loglam - ln_gamma(k + 1.0);
            if lhs <= rhs {
                return poisson_count(k);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Gamma
    // -----------------------------------------------------------------------

    /// Gamma with shape `alpha > 0` and rate `beta > 0` (mean `α/β`).
    pub fn gamma(&self, alpha: f64, beta: f64) -> Result<f64> {
        if !alpha.is_finite() || alpha <= 0.0 || !beta.is_finite() || beta <= 0.0 {
            return Err(Error::invalid("alpha and beta must be finite and > 0"));
        }
        Ok(self.gamma_unit(alpha)? / beta)
    }

    /// Gamma with shape `alpha` and unit rate.
    fn gamma_unit(&self, alpha: f64) -> Result<f64> {
        if alpha < 1.0 {
            // Gamma(α) = Gamma(α + 1) · U^(1/α)
            let u = self.positive_uniform()?;
            let boosted = self.marsaglia_tsang(alpha + 1.0)?;
            return Ok(boosted * u.powf(1.0 / alpha));
        }
        self.marsaglia_tsang(alpha)
    }

    /// Marsaglia and Tsang (2000), valid for `alpha >= 1`.
    fn marsaglia_tsang(&self, alpha: f64) -> Result<f64> {
        let d = alpha - 1.0 / 3.0;
        let c = 1.0 / (9.0 * d).sqrt();
        loop {
            let x = self.standard_normal()?;
            let v = 1.0 + c * x;
            if v <= 0.0 {
                continue;
            }
            let v = v * v * v;
            let u = self.uniform_f64()?;
            let x2 = x * x;
            // Squeeze first; the log test only runs for the ~2% it cannot decide.
            if u < 1.0 - 0.0331 * x2 * x2 {
                return Ok(d * v);
            }
            if u.ln() < 0.5 * x2 + d * (1.0 - v + v.ln()) {
                return Ok(d * v);
            }
        }
    }
}
