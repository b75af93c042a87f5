use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform integers, the only randomness the library consumes.
///
/// Every randomness-consuming operation takes its source explicitly, so a
/// seeded generator reproduces the same shuffles and samples.
pub trait RandomSource {
    /// An unbiased integer in `0..limit`. Panics if `limit` is 0.
    fn uniform(&mut self, limit: usize) -> usize;

    /// Move a uniformly chosen arrangement of `count` items to the front of
    /// `items`. Every subset, and every ordering of it, is equally likely.
    /// With `count >= items.len()` this is a full Fisher-Yates shuffle.
    fn partial_shuffle<T>(&mut self, items: &mut [T], count: usize)
    where
        Self: Sized,
    {
        let len = items.len();
        if len < 2 {
            return;
        }
        for i in 0..count.min(len - 1) {
            let j = i + self.uniform(len - i);
            items.swap(i, j);
        }
    }

    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        self.partial_shuffle(items, items.len());
    }
}

impl<R: Rng> RandomSource for R {
    fn uniform(&mut self, limit: usize) -> usize {
        assert!(limit > 0, "uniform limit must be positive");
        self.gen_range(0..limit)
    }
}

/// A small, fast generator. A seed of 0 draws the seed from OS entropy; any
/// other value gives a reproducible stream.
pub fn seeded(seed: u64) -> SmallRng {
    if seed == 0 {
        SmallRng::from_entropy()
    } else {
        SmallRng::seed_from_u64(seed)
    }
}
