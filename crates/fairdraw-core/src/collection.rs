//! Uniform operations over slices: shuffle, permutation, pick, sample.
//!
//! Every index comes from [`Generator::uniform_u64_below`], so the results
//! carry no modulo bias.

use crate::error::{Error, Result};
use crate::generator::Generator;

impl Generator {
    /// Shuffle `items` in place (Durstenfeld's Fisher-Yates).
    pub fn shuffle<T>(&self, items: &mut [T]) -> Result<()> {
        for i in (1..items.len()).rev() {
            let j = self.usize_below(i + 1)?;
            items.swap(i, j);
        }
        Ok(())
    }

    /// Shuffled copy of `items`; the input is left untouched.
    pub fn perm<T: Clone>(&self, items: &[T]) -> Result<Vec<T>> {
        let mut out = items.to_vec();
        self.shuffle(&mut out)?;
        Ok(out)
    }

    /// One element chosen uniformly.
    pub fn pick_one<'a, T>(&self, items: &'a [T]) -> Result<&'a T> {
        if items.is_empty() {
            return Err(Error::invalid("cannot pick from an empty slice"));
        }
        Ok(&items[self.usize_below(items.len())?])
    }

    /// `k` distinct positions chosen uniformly without replacement.
    ///
    /// Runs the first `k` steps of a forward Fisher-Yates over a copy, so the
    /// cost is `k` draws regardless of `items.len()`.
    pub fn sample<T: Clone>(&self, items: &[T], k: usize) -> Result<Vec<T>> {
        if k > items.len() {
            return Err(Error::invalid(format!(
                "sample size {k} exceeds {} items",
                items.len()
            )));
        }
        if k == 0 {
            return Ok(Vec::new());
        }
        let mut pool = items.to_vec();
        let n = pool.len();
        for i in 0..k {
            let j = i + self.usize_below(n - i)?;
            pool.swap(i, j);
        }
        pool.truncate(k);
        Ok(pool)
    }

    /// Keep each item independently with probability `p`, preserving order.
    pub fn pick_by_probability<T: Clone>(&self, items: &[T], p: f64) -> Result<Vec<T>> {
        if !(0.0..=1.0).contains(&p) {
            return Err(Error::invalid(format!("probability {p} outside [0, 1]")));
        }
        let mut kept = Vec::new();
        for item in items {
            if self.uniform_f64()? <= p {
                kept.push(item.clone());
            }
        }
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;
    use crate::generator::testing::{CountingSource, FailingSource};
    use crate::sources::{DeterministicSource, ReplaySource};

    #[test]
    fn test_shuffle_is_permutation() {
        let rng = Generator::os();
        let mut xs: Vec<u32> = (0..100).collect();
        rng.shuffle(&mut xs).unwrap();
        let mut sorted = xs.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_short_slices_consume_nothing() {
        let src = Arc::new(CountingSource::default());
        let rng = Generator::from_shared(src.clone());
        let mut empty: [u8; 0] = [];
        rng.shuffle(&mut empty).unwrap();
        let mut one = [7u8];
        rng.shuffle(&mut one).unwrap();
        assert_eq!(one, [7]);
        assert_eq!(src.count(), 0);
    }

    #[test]
    fn test_shuffle_positions_are_uniform() {
        // Each of the 6 orderings of 3 items should appear about 1/6 of the time.
        let rng = Generator::new(DeterministicSource::new(b"shuffle-uniform"));
        let mut counts = std::collections::HashMap::new();
        for _ in 0..6000 {
            let mut xs = [0u8, 1, 2];
            rng.shuffle(&mut xs).unwrap();
            *counts.entry(xs).or_insert(0usize) += 1;
        }
        assert_eq!(counts.len(), 6);
        for (order, c) in counts {
            assert!((800..1200).contains(&c), "{order:?} seen {c} times");
        }
    }

    #[test]
    fn test_perm_leaves_input_alone() {
        let rng = Generator::os();
        let xs = vec!["a", "b", "c", "d"];
        let p = rng.perm(&xs).unwrap();
        assert_eq!(xs, vec!["a", "b", "c", "d"]);
        let set: HashSet<_> = p.iter().collect();
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_pick_one() {
        let rng = Generator::new(ReplaySource::from_u64s(&[5]));
        let xs = [10, 20, 30];
        assert_eq!(*rng.pick_one(&xs).unwrap(), 30);

        let empty: [i32; 0] = [];
        assert!(matches!(rng.pick_one(&empty), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_sample_distinct() {
        let rng = Generator::os();
        let xs: Vec<u32> = (0..50).collect();
        for k in [0, 1, 10, 50] {
            let s = rng.sample(&xs, k).unwrap();
            assert_eq!(s.len(), k);
            let set: HashSet<_> = s.iter().collect();
            assert_eq!(set.len(), k);
        }
    }

    #[test]
    fn test_sample_rejects_oversized_k() {
        let src = Arc::new(CountingSource::default());
        let rng = Generator::from_shared(src.clone());
        let err = rng.sample(&[1, 2, 3], 4).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
        assert_eq!(src.count(), 0);
    }

    #[test]
    fn test_pick_by_probability_edges() {
        let rng = Generator::os();
        let xs: Vec<u32> = (0..100).collect();
        assert!(rng.pick_by_probability(&xs, 0.0).unwrap().len() <= 1);
        assert_eq!(rng.pick_by_probability(&xs, 1.0).unwrap(), xs);
        assert!(matches!(
            rng.pick_by_probability(&xs, 1.5),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            rng.pick_by_probability(&xs, f64::NAN),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_pick_by_probability_keeps_order() {
        let rng = Generator::new(DeterministicSource::new(b"pick-by-p"));
        let xs: Vec<u32> = (0..1000).collect();
        let kept = rng.pick_by_probability(&xs, 0.3).unwrap();
        assert!(kept.windows(2).all(|w| w[0] < w[1]));
        assert!((200..400).contains(&kept.len()), "kept {}", kept.len());
    }

    #[test]
    fn test_source_failure_propagates() {
        let rng = Generator::new(FailingSource);
        let mut xs = [1, 2, 3];
        assert!(matches!(rng.shuffle(&mut xs), Err(Error::EntropySource(_))));
        assert!(matches!(rng.sample(&xs, 2), Err(Error::EntropySource(_))));
    }
}
