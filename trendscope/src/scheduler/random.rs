//! Injectable randomness for delay sampling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the random draws behind every delay.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource {
    /// A uniform draw in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// A uniform integer in `[min, max]`.
    fn between(&mut self, min: u64, max: u64) -> u64;
}

impl RandomSource for StdRng {
    fn unit(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn between(&mut self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        self.gen_range(min..=max)
    }
}

/// An entropy-seeded source.
#[must_use]
pub fn entropy_source() -> Box<dyn RandomSource + Send> {
    Box::new(StdRng::from_entropy())
}

/// A reproducible source.
#[must_use]
pub fn seeded_source(seed: u64) -> Box<dyn RandomSource + Send> {
    Box::new(StdRng::seed_from_u64(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_rng_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let unit = rng.unit();
            assert!((0.0..1.0).contains(&unit));
            let value = rng.between(1500, 3000);
            assert!((1500..=3000).contains(&value));
        }
        assert_eq!(rng.between(10, 10), 10);
        assert_eq!(rng.between(10, 3), 10);
    }

    #[test]
    fn test_seeded_sources_agree() {
        let mut a = seeded_source(9);
        let mut b = seeded_source(9);
        assert_eq!(a.between(0, 1_000_000), b.between(0, 1_000_000));
    }
}
