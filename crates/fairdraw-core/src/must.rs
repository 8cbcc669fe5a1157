//! Panicking convenience layer.
//!
//! [`Must`] mirrors the fallible [`Generator`] API but aborts on any error,
//! with the error's `Display` text as the panic message. Use it in scripts and
//! tests where a bad parameter or a dead entropy source is a bug, not a
//! condition to handle.
//!
//! ```
//! use fairdraw_core::{Generator, sources::DeterministicSource};
//!
//! let rng = Generator::new(DeterministicSource::new(b"doc"));
//! let m = rng.must();
//! let d = m.int_in_range(1, 6);
//! assert!((1..=6).contains(&d));
//! ```

use std::time::SystemTime;

use crate::error::Result;
use crate::generator::Generator;

fn ok<T>(r: Result<T>) -> T {
    match r {
        Ok(v) => v,
        Err(e) => panic!("{e}"),
    }
}

/// Borrowing wrapper whose methods panic instead of returning [`Result`].
#[derive(Debug, Clone, Copy)]
pub struct Must<'g> {
    rng: &'g Generator,
}

impl Generator {
    /// Panicking view of this generator.
    pub fn must(&self) -> Must<'_> {
        Must { rng: self }
    }
}

impl<'g> Must<'g> {
    /// The wrapped generator.
    pub fn generator(&self) -> &'g Generator {
        self.rng
    }

    pub fn bytes(&self, n: usize) -> Vec<u8> {
        ok(self.rng.bytes(n))
    }

    pub fn uniform_u64(&self) -> u64 {
        ok(self.rng.uniform_u64())
    }

    pub fn uniform_u64_below(&self, n: u64) -> u64 {
        ok(self.rng.uniform_u64_below(n))
    }

    pub fn usize_below(&self, n: usize) -> usize {
        ok(self.rng.usize_below(n))
    }

    pub fn i64_below(&self, n: i64) -> i64 {
        ok(self.rng.i64_below(n))
    }

    pub fn int_in_range(&self, min: i64, max: i64) -> i64 {
        ok(self.rng.int_in_range(min, max))
    }

    pub fn i32_in_range(&self, min: i32, max: i32) -> i32 {
        ok(self.rng.i32_in_range(min, max))
    }

    pub fn any_i32(&self) -> i32 {
        ok(self.rng.any_i32())
    }

    pub fn any_i64(&self) -> i64 {
        ok(self.rng.any_i64())
    }

    pub fn positive_i32(&self) -> i32 {
        ok(self.rng.positive_i32())
    }

    pub fn positive_i64(&self) -> i64 {
        ok(self.rng.positive_i64())
    }

    pub fn negative_i32(&self) -> i32 {
        ok(self.rng.negative_i32())
    }

    pub fn negative_i64(&self) -> i64 {
        ok(self.rng.negative_i64())
    }

    pub fn uniform_f64(&self) -> f64 {
        ok(self.rng.uniform_f64())
    }

    pub fn uniform_bool(&self) -> bool {
        ok(self.rng.uniform_bool())
    }

    pub fn bernoulli(&self, p: f64) -> bool {
        ok(self.rng.bernoulli(p))
    }

    pub fn categorical(&self, weights: &[f64]) -> usize {
        ok(self.rng.categorical(weights))
    }

    pub fn exponential(&self, lambda: f64) -> f64 {
        ok(self.rng.exponential(lambda))
    }

    pub fn uniform(&self, lo: f64, hi: f64) -> f64 {
        ok(self.rng.uniform(lo, hi))
    }

    pub fn normal(&self, mu: f64, sigma: f64) -> f64 {
        ok(self.rng.normal(mu, sigma))
    }

    pub fn clock_normal(&self, stddev_secs: f64) -> SystemTime {
        ok(self.rng.clock_normal(stddev_secs))
    }

    pub fn poisson(&self, lambda: f64) -> u64 {
        ok(self.rng.poisson(lambda))
    }

    pub fn gamma(&self, alpha: f64, beta: f64) -> f64 {
        ok(self.rng.gamma(alpha, beta))
    }

    /// One Zipf draw. Builds the CDF table on every call; keep a
    /// [`crate::Zipf`] around for repeated sampling.
    pub fn zipf(&self, s: f64, v: f64, n: usize) -> usize {
        ok(self.rng.zipf(s, v, n).and_then(|z| z.sample()))
    }

    pub fn weighted_choice<T: Clone>(&self, items: &[T], weights: &[f64]) -> T {
        ok(self.rng.weighted_choice(items, weights))
    }

    pub fn weighted_sample<T: Clone>(&self, items: &[T], weights: &[f64], k: usize) -> Vec<T> {
        ok(self.rng.weighted_sample(items, weights, k))
    }

    pub fn shuffle<T>(&self, items: &mut [T]) {
        ok(self.rng.shuffle(items))
    }

    pub fn perm<T: Clone>(&self, items: &[T]) -> Vec<T> {
        ok(self.rng.perm(items))
    }

    pub fn pick_one<'a, T>(&self, items: &'a [T]) -> &'a T {
        ok(self.rng.pick_one(items))
    }

    pub fn sample<T: Clone>(&self, items: &[T], k: usize) -> Vec<T> {
        ok(self.rng.sample(items, k))
    }

    pub fn pick_by_probability<T: Clone>(&self, items: &[T], p: f64) -> Vec<T> {
        ok(self.rng.pick_by_probability(items, p))
    }
}
