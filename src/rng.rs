//! Fast PRNG for enhancement rolls. Uses SplitMix64 for throughput and good statistical quality.
//! Deterministic: same seed produces the same sequence. Not cryptographically secure.

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }

    /// Uniform float in [0, 1) from the top 53 bits.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform integer in [0, bound). `bound` must be non-zero.
    /// Rejection sampling keeps the distribution exact; for small bounds a
    /// redraw is vanishingly rare.
    #[inline]
    pub fn next_below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        let bound = bound as u64;
        // 2^64 mod bound: draws below this would overweight the low residues.
        let reject_below = bound.wrapping_neg() % bound;
        loop {
            let draw = self.next_u64();
            if draw >= reject_below {
                return (draw % bound) as usize;
            }
        }
    }

    /// Index into `weights` drawn proportionally to each entry. Entries that are
    /// not finite or not positive contribute nothing. Returns `None` when no
    /// weight is drawable.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights
            .iter()
            .filter(|w| w.is_finite() && **w > 0.0)
            .sum();
        if total <= 0.0 {
            return None;
        }
        let mut target = self.next_f64() * total;
        let mut last_drawable = None;
        for (index, weight) in weights.iter().enumerate() {
            if !weight.is_finite() || *weight <= 0.0 {
                continue;
            }
            last_drawable = Some(index);
            target -= weight;
            if target < 0.0 {
                return Some(index);
            }
        }
        // Float accumulation can leave a sliver of `target` above zero.
        last_drawable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitmix64_deterministic() {
        let mut a = Rng::new(7);
        let mut b = Rng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn splitmix64_different_seeds_differ() {
        let mut a = Rng::new(1);
        let mut b = Rng::new(2);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn next_f64_stays_in_unit_interval() {
        let mut rng = Rng::new(42);
        for _ in 0..10_000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn next_below_respects_bound() {
        let mut rng = Rng::new(3);
        for _ in 0..10_000 {
            assert!(rng.next_below(6) < 6);
        }
    }

    #[test]
    fn next_below_counts_every_residue_evenly() {
        let mut rng = Rng::new(3);
        let mut hits = [0u32; 6];
        for _ in 0..60_000 {
            hits[rng.next_below(6)] += 1;
        }
        for count in hits {
            assert!((9_000..=11_000).contains(&count), "count {count}");
        }
    }

    #[test]
    fn weighted_index_skips_zero_weights() {
        let mut rng = Rng::new(9);
        for _ in 0..1_000 {
            let picked = rng.weighted_index(&[0.0, 1.0, 0.0]).unwrap();
            assert_eq!(picked, 1);
        }
    }

    #[test]
    fn weighted_index_empty_or_zero_total_is_none() {
        let mut rng = Rng::new(9);
        assert_eq!(rng.weighted_index(&[]), None);
        assert_eq!(rng.weighted_index(&[0.0, 0.0]), None);
    }

    #[test]
    fn weighted_index_roughly_tracks_weights() {
        let mut rng = Rng::new(1234);
        let weights = [1.0, 3.0];
        let mut hits = [0u32; 2];
        for _ in 0..40_000 {
            hits[rng.weighted_index(&weights).unwrap()] += 1;
        }
        let ratio = hits[1] as f64 / hits[0] as f64;
        assert!((2.5..3.5).contains(&ratio), "ratio {ratio}");
    }
}
