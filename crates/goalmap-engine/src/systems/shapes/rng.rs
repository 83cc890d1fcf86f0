//! Seedable pseudo-random number generator (xorshift64).
//! Deterministic, fast, no hidden global state: every body owns one.

use std::f32::consts::TAU;

/// Seedable pseudo-random number generator (xorshift64).
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        // Scramble so that nearby seeds do not produce correlated first draws.
        let mixed = splitmix(seed);
        Rng {
            state: if mixed == 0 { 1 } else { mixed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Derive an independent generator (e.g. one per spawned body).
    pub fn fork(&mut self) -> Rng {
        Rng::new(self.next_u64())
    }

    /// Generate a random number in [0, upper_bound). Returns 0 for an empty range.
    pub fn next_int(&mut self, upper_bound: u32) -> u32 {
        if upper_bound == 0 {
            return 0;
        }
        (self.next_u64() % upper_bound as u64) as u32
    }

    /// Uniform integer in [lo, hi] (inclusive). Bounds may come in any order.
    pub fn range_int(&mut self, lo: u32, hi: u32) -> u32 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        lo + self.next_int(hi - lo + 1)
    }

    /// Uniform float in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform float in [lo, hi).
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// Uniform angle in [0, TAU).
    pub fn angle(&mut self) -> f32 {
        self.next_f32() * TAU
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// +1.0 or -1.0 with equal probability.
    pub fn sign(&mut self) -> f32 {
        if self.chance(0.5) {
            1.0
        } else {
            -1.0
        }
    }

    /// Triangular distribution on [lo, hi] peaking at `mode`.
    pub fn triangular(&mut self, lo: f32, hi: f32, mode: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        let mode = mode.clamp(lo, hi);
        let u = self.next_f32();
        let c = (mode - lo) / (hi - lo);
        if u < c {
            lo + (u * (hi - lo) * (mode - lo)).sqrt()
        } else {
            hi - ((1.0 - u) * (hi - lo) * (hi - mode)).sqrt()
        }
    }

    /// Pick one element of a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.get(self.next_int(items.len() as u32) as usize)
    }
}

fn splitmix(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_deterministic() {
        let mut rng1 = Rng::new(42);
        let mut rng2 = Rng::new(42);
        for _ in 0..10 {
            assert_eq!(rng1.next_int(1000), rng2.next_int(1000));
        }
    }

    #[test]
    fn rng_zero_seed_handled() {
        let mut rng = Rng::new(0);
        let _ = rng.next_int(100);
        assert_eq!(rng.next_int(0), 0);
    }

    #[test]
    fn ranges_stay_in_bounds() {
        let mut rng = Rng::new(7);
        for _ in 0..1000 {
            let f = rng.range(-2.0, 8.0);
            assert!((-2.0..8.0).contains(&f));
            let i = rng.range_int(3, 5);
            assert!((3..=5).contains(&i));
            let t = rng.triangular(1.1, 3.0, 1.4);
            assert!((1.1..=3.0).contains(&t));
        }
    }

    #[test]
    fn forks_diverge() {
        let mut parent = Rng::new(1);
        let mut a = parent.fork();
        let mut b = parent.fork();
        let same = (0..8).all(|_| a.next_int(1 << 30) == b.next_int(1 << 30));
        assert!(!same);
    }
}
