//! Weighted selection over arbitrary item types.
//!
//! - [`Generator::weighted_choice`]: one item, probability proportional to weight.
//! - [`Generator::weighted_sample`]: `k` distinct items without replacement
//!   (Efraimidis-Spirakis exponential keys).
//!
//! Zero-weight items are never selected by either.

use std::cmp::Ordering;

use crate::distributions::{cumulative_index, weight_sum};
use crate::error::{Error, Result};
use crate::generator::Generator;

fn check_lengths<T>(items: &[T], weights: &[f64]) -> Result<()> {
    if items.is_empty() {
        return Err(Error::invalid("items must be non-empty"));
    }
    check_matching(items, weights)
}

fn check_matching<T>(items: &[T], weights: &[f64]) -> Result<()> {
    if items.len() != weights.len() {
        return Err(Error::invalid(format!(
            "items/weights length mismatch: {} vs {}",
            items.len(),
            weights.len()
        )));
    }
    Ok(())
}

impl Generator {
    /// Pick one item with probability proportional to its weight.
    ///
    /// Same walk as [`Generator::categorical`], including its fallback to the
    /// last positive-weight item when rounding exhausts the walk.
    pub fn weighted_choice<T: Clone>(&self, items: &[T], weights: &[f64]) -> Result<T> {
        check_lengths(items, weights)?;
        let sum = weight_sum(weights)?;
        let target = self.uniform_f64()? * sum;
        Ok(items[cumulative_index(weights, target)].clone())
    }

    /// Pick `k` distinct items without replacement, inclusion weighted.
    ///
    /// Each positive-weight item gets the key `-ln(u)/w` for a fresh
    /// `u ∈ (0, 1]`; the `k` smallest keys win. Weights are never mutated or
    /// renormalized between picks. `k` may not exceed the number of items
    /// with positive weight. Results are ordered by key (most "eager" first).
    ///
    /// `k == 0` returns an empty vec once the lengths match, even for empty
    /// items or all-zero weights.
    pub fn weighted_sample<T: Clone>(
        &self,
        items: &[T],
        weights: &[f64],
        k: usize,
    ) -> Result<Vec<T>> {
        check_matching(items, weights)?;
        if k == 0 {
            return Ok(Vec::new());
        }
        check_lengths(items, weights)?;
        weight_sum(weights)?;
        let positive = weights.iter().filter(|&&w| w > 0.0).count();
        if k > positive {
            return Err(Error::invalid(format!(
                "sample size {k} exceeds {positive} positive-weight items"
            )));
        }

        let mut keys: Vec<(f64, usize)> = Vec::with_capacity(positive);
        for (i, &w) in weights.iter().enumerate() {
            if w == 0.0 {
                continue;
            }
            keys.push((-self.unit_open_closed()?.ln() / w, i));
        }
        keys.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        Ok(keys[..k].iter().map(|&(_, i)| items[i].clone()).collect())
    }

    /// Uniform in `(0, 1]`, redrawing on an exact zero.
    fn unit_open_closed(&self) -> Result<f64> {
        loop {
            let u = self.uniform_f64()?;
            if u > 0.0 {
                return Ok(u);
            }
        }
    }
}
