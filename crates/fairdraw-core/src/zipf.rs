//! Precomputed Zipf sampler.
//!
//! `P(X = k) ∝ (v + k)^(-s)` for `k ∈ [1, n]`. Construction builds the
//! normalized CDF once in O(n); each draw is one uniform plus a binary search.

use crate::error::{Error, Result};
use crate::generator::Generator;

/// Zipf(s, v) sampler over `[1, n]` bound to the generator that built it.
#[derive(Debug, Clone)]
pub struct Zipf<'g> {
    rng: &'g Generator,
    s: f64,
    v: f64,
    cdf: Vec<f64>,
}

impl<'g> Zipf<'g> {
    /// Build the CDF table. Requires `s > 0`, `v >= 0`, `n >= 1`.
    pub fn new(rng: &'g Generator, s: f64, v: f64, n: usize) -> Result<Self> {
        if s.is_nan() || v.is_nan() || s <= 0.0 || v < 0.0 || n < 1 {
            return Err(Error::invalid("zipf needs s > 0, v >= 0 and n >= 1"));
        }
        let mut cdf = Vec::with_capacity(n);
        let mut acc = 0.0;
        for k in 1..=n {
            acc += (v + k as f64).powf(-s);
            cdf.push(acc);
        }
        if !acc.is_finite() || acc <= 0.0 {
            return Err(Error::invalid("zipf weights do not sum to a finite positive value"));
        }
        for p in &mut cdf {
            *p /= acc;
        }
        Ok(Self { rng, s, v, cdf })
    }

    /// Draw one value in `[1, n]`.
    pub fn sample(&self) -> Result<usize> {
        let u = self.rng.uniform_f64()?;
        Ok(self.index_for(u) + 1)
    }

    /// First CDF index whose value is `>= u`, clamped to the last entry.
    fn index_for(&self, u: f64) -> usize {
        self.cdf
            .partition_point(|&p| p < u)
            .min(self.cdf.len() - 1)
    }

    /// Exponent `s`.
    pub fn s(&self) -> f64 {
        self.s
    }

    /// Offset `v`.
    pub fn v(&self) -> f64 {
        self.v
    }

    /// Support size `n`.
    pub fn n(&self) -> usize {
        self.cdf.len()
    }

    /// The normalized cumulative distribution, `cdf()[k-1] = P(X <= k)`.
    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }
}

impl Generator {
    /// Build a [`Zipf`] sampler drawing from this generator.
    pub fn zipf(&self, s: f64, v: f64, n: usize) -> Result<Zipf<'_>> {
        Zipf::new(self, s, v, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{DeterministicSource, ReplaySource};

    #[test]
    fn test_rejects_bad_parameters() {
        let rng = Generator::os();
        assert!(matches!(rng.zipf(0.0, 1.0, 10), Err(Error::InvalidParameter(_))));
        assert!(matches!(rng.zipf(1.2, -0.5, 10), Err(Error::InvalidParameter(_))));
        assert!(matches!(rng.zipf(1.2, 1.0, 0), Err(Error::InvalidParameter(_))));
        assert!(matches!(rng.zipf(f64::NAN, 1.0, 3), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_cdf_is_monotone_and_normalized() {
        let rng = Generator::os();
        let z = rng.zipf(1.2, 1.0, 10).unwrap();
        assert_eq!(z.n(), 10);
        assert!(z.cdf().windows(2).all(|w| w[0] <= w[1]));
        assert!((z.cdf()[9] - 1.0).abs() < 1e-12);
        assert!(z.cdf()[0] > 0.0);
    }

    #[test]
    fn test_cdf_matches_weights() {
        let rng = Generator::os();
        let z = rng.zipf(1.0, 0.0, 3).unwrap();
        // Weights 1, 1/2, 1/3 sum to 11/6.
        let total = 11.0 / 6.0;
        assert!((z.cdf()[0] - 1.0 / total).abs() < 1e-12);
        assert!((z.cdf()[1] - 1.5 / total).abs() < 1e-12);
    }

    #[test]
    fn test_single_point_support() {
        let rng = Generator::os();
        let z = rng.zipf(2.0, 0.0, 1).unwrap();
        for _ in 0..100 {
            assert_eq!(z.sample().unwrap(), 1);
        }
    }

    #[test]
    fn test_search_boundaries() {
        let rng = Generator::os();
        let z = rng.zipf(1.0, 0.0, 3).unwrap();
        assert_eq!(z.index_for(0.0), 0);
        assert_eq!(z.index_for(z.cdf()[0]), 0);
        assert_eq!(z.index_for(z.cdf()[0] + 1e-9), 1);
        assert_eq!(z.index_for(1.0), 2);
    }

    #[test]
    fn test_zero_draw_is_rank_one() {
        let rng = Generator::new(ReplaySource::from_u64s(&[0]));
        let z = rng.zipf(1.2, 1.0, 10).unwrap();
        assert_eq!(z.sample().unwrap(), 1);
    }

    #[test]
    fn test_samples_in_support_and_skewed() {
        let rng = Generator::new(DeterministicSource::new(b"zipf-skew"));
        let z = rng.zipf(1.2, 1.0, 10).unwrap();
        let mut counts = [0usize; 10];
        for _ in 0..10_000 {
            let k = z.sample().unwrap();
            assert!((1..=10).contains(&k));
            counts[k - 1] += 1;
        }
        assert!(counts[0] > counts[4]);
        assert!(counts[4] > counts[9]);
    }

    #[test]
    fn test_reproducible_from_seed() {
        let a = Generator::new(DeterministicSource::new(b"zipf"));
        let b = Generator::new(DeterministicSource::new(b"zipf"));
        let za = a.zipf(1.2, 1.0, 10).unwrap();
        let zb = b.zipf(1.2, 1.0, 10).unwrap();
        let xs: Vec<usize> = (0..500).map(|_| za.sample().unwrap()).collect();
        let ys: Vec<usize> = (0..500).map(|_| zb.sample().unwrap()).collect();
        assert_eq!(xs, ys);
    }
}
