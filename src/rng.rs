//! String-seeded xorshift32 generator.
//!
//! Fields must be reproducible from the seed token alone, on every platform, so this does
//! not go through `rand`.

const FNV_OFFSET: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;
const ZERO_HASH_FALLBACK: u32 = 123_456_789;

/// FNV-1a over the UTF-16 code units of `s`.
pub fn fnv1a(s: &str) -> u32 {
    s.encode_utf16().fold(FNV_OFFSET, |h, unit| {
        (h ^ unit as u32).wrapping_mul(FNV_PRIME)
    })
}

#[derive(Clone, Debug)]
pub struct SeedRng {
    state: u32,
}

impl SeedRng {
    pub fn from_seed(seed: &str) -> Self {
        let h = fnv1a(seed);
        Self {
            state: if h == 0 { ZERO_HASH_FALLBACK } else { h },
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Next value in [0, 1]. The upper bound is only hit when the state is all ones.
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / u32::MAX as f64
    }

    /// Uniform index in `0..n`.
    pub fn below(&mut self, n: usize) -> usize {
        let i = (self.next_f64() * n as f64).floor() as usize;
        i.min(n.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_known_values() {
        assert_eq!(fnv1a(""), FNV_OFFSET);
        // Published FNV-1a 32-bit test vectors.
        assert_eq!(fnv1a("a"), 0xe40c292c);
        assert_eq!(fnv1a("foobar"), 0xbf9cf968);
    }

    #[test]
    fn xorshift_first_draw() {
        let mut rng = SeedRng::from_seed("");
        let mut x = FNV_OFFSET;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        assert_eq!(rng.next_u32(), x);
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = SeedRng::from_seed("rdx");
        let mut b = SeedRng::from_seed("rdx");
        for _ in 0..1000 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn draws_stay_in_unit_interval() {
        let mut rng = SeedRng::from_seed("unit");
        for _ in 0..10_000 {
            let r = rng.next_f64();
            assert!((0.0..=1.0).contains(&r));
        }
    }

    #[test]
    fn state_never_zero() {
        let mut rng = SeedRng::from_seed("zero?");
        assert_ne!(rng.state(), 0);
        for _ in 0..10_000 {
            assert_ne!(rng.next_u32(), 0);
        }
    }

    #[test]
    fn below_is_in_range() {
        let mut rng = SeedRng::from_seed("idx");
        for _ in 0..1000 {
            assert!(rng.below(7) < 7);
        }
        assert_eq!(rng.below(1), 0);
    }
}
