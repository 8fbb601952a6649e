//! Seeded pseudo-random generator used for every exploration draw.
//!
//! All randomness in this crate flows through a [`Prg`] constructed from a seed
//! that is a pure function of `(application id, event key)` (see
//! [`compute_seed`](crate::compute_seed)). There is no process-wide RNG.
//!
//! The generator is a 64-bit linear congruential generator with fixed, documented
//! constants, so a decision can be replayed bit-for-bit on any platform (or in any
//! other language that implements the same arithmetic):
//!
//! ```text
//! v      <- 0xeece66d5deece66d * v + 2147483647      (mod 2^64)
//! unit   =  f32::from_bits(((v >> 25) & 0x7FFFFF) | 0x3F80_0000) - 1.0
//! int    =  lo + ((v >> 25) mod (hi - lo + 1))
//! ```
//!
//! Each draw advances the state by exactly one step.

use crate::{Error, Result};

const MULTIPLIER: u64 = 0xeece_66d5_deec_e66d;
const INCREMENT: u64 = 2_147_483_647;
/// Exponent bits of `1.0f32`: a 23-bit mantissa OR'd into this lands in `[1, 2)`.
const ONE_F32_BITS: u32 = 127 << 23;

/// Deterministic pseudo-random generator keyed by a 64-bit seed.
///
/// Not cryptographic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prg {
    state: u64,
}

impl Prg {
    /// Create a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    fn step(&mut self) -> u64 {
        self.state = MULTIPLIER
            .wrapping_mul(self.state)
            .wrapping_add(INCREMENT);
        self.state
    }

    /// Uniform draw in `[0, 1)`.
    ///
    /// The result carries 23 bits of randomness (it is an exact `f32` value
    /// widened to `f64`).
    pub fn uniform_unit_interval(&mut self) -> f64 {
        let v = self.step();
        let bits = (((v >> 25) & 0x7F_FFFF) as u32) | ONE_F32_BITS;
        f64::from(f32::from_bits(bits) - 1.0)
    }

    /// Uniform integer in the closed range `[lo, hi]`.
    ///
    /// Fails with [`Error::InvalidRange`] when `lo > hi`. Ranges wider than
    /// `2^39` are reachable only partially (the draw has 39 usable bits).
    pub fn uniform_int(&mut self, lo: i64, hi: i64) -> Result<i64> {
        if lo > hi {
            return Err(Error::InvalidRange { lo, hi });
        }
        let v = self.step();
        let span = (i128::from(hi) - i128::from(lo) + 1) as u128;
        let offset = u128::from(v >> 25) % span;
        // offset < span, so lo + offset <= hi fits in i64.
        Ok((i128::from(lo) + offset as i128) as i64)
    }

    /// Uniform 1-based action id in `[1, num_actions]`.
    pub(crate) fn uniform_action(&mut self, num_actions: u32) -> Result<u32> {
        let a = self.uniform_int(1, i64::from(num_actions))?;
        Ok(a as u32)
    }

    /// Uniform 0-based index in `[lo, hi]`.
    pub(crate) fn uniform_index(&mut self, lo: usize, hi: usize) -> Result<usize> {
        let i = self.uniform_int(lo as i64, hi as i64)?;
        Ok(i as usize)
    }
}

/// Lets a seeded [`Prg`] drive `rand`'s distributions and adapters.
///
/// The exploration algorithms in this crate never go through this impl; they use
/// [`Prg::uniform_unit_interval`] / [`Prg::uniform_int`] so their draw sequence stays
/// pinned to the documented arithmetic.
impl rand::RngCore for Prg {
    fn next_u32(&mut self) -> u32 {
        (self.step() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        rand::rand_core::impls::fill_bytes_via_next(self, dst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_seed_sequence_is_pinned() {
        let mut p = Prg::new(0);
        assert_eq!(p.uniform_unit_interval(), 7.510185241699219e-06);
        assert_eq!(p.uniform_unit_interval(), 0.04835700988769531);
        assert_eq!(p.uniform_unit_interval(), 0.03645205497741699);
    }

    #[test]
    fn integer_sequence_is_pinned() {
        let mut p = Prg::new(42);
        let xs: Vec<i64> = (0..5).map(|_| p.uniform_int(1, 10).unwrap()).collect();
        assert_eq!(xs, vec![8, 9, 7, 5, 5]);

        let mut p = Prg::new(7);
        let xs: Vec<i64> = (0..6).map(|_| p.uniform_int(-5, 5).unwrap()).collect();
        assert_eq!(xs, vec![-5, -1, 2, 0, 5, -5]);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut p = Prg::new(1);
        assert_eq!(
            p.uniform_int(3, 2),
            Err(Error::InvalidRange { lo: 3, hi: 2 })
        );
    }

    #[test]
    fn rng_core_interop_is_deterministic() {
        use rand::Rng;
        let mut a = Prg::new(99);
        let mut b = Prg::new(99);
        let xa: Vec<u8> = (0..16).map(|_| a.random_range(0..10u8)).collect();
        let xb: Vec<u8> = (0..16).map(|_| b.random_range(0..10u8)).collect();
        assert_eq!(xa, xb);
        assert!(xa.iter().all(|&x| x < 10));

        let mut buf = [0u8; 13];
        rand::RngCore::fill_bytes(&mut a, &mut buf);
        assert!(buf.iter().any(|&x| x != 0));
    }

    proptest! {
        #[test]
        fn unit_draws_stay_in_half_open_interval(seed in any::<u64>(), n in 1usize..64) {
            let mut p = Prg::new(seed);
            for _ in 0..n {
                let u = p.uniform_unit_interval();
                prop_assert!((0.0..1.0).contains(&u), "u={}", u);
            }
        }

        #[test]
        fn int_draws_stay_in_closed_range(
            seed in any::<u64>(),
            lo in -1_000_000i64..1_000_000,
            width in 0i64..1_000,
        ) {
            let hi = lo + width;
            let mut p = Prg::new(seed);
            for _ in 0..16 {
                let x = p.uniform_int(lo, hi).unwrap();
                prop_assert!(x >= lo && x <= hi);
            }
        }

        #[test]
        fn extreme_ranges_do_not_overflow(seed in any::<u64>()) {
            let mut p = Prg::new(seed);
            let x = p.uniform_int(i64::MIN, i64::MAX).unwrap();
            prop_assert!(x >= i64::MIN);
            let y = p.uniform_int(i64::MAX, i64::MAX).unwrap();
            prop_assert_eq!(y, i64::MAX);
        }

        #[test]
        fn same_seed_same_sequence(seed in any::<u64>()) {
            let mut a = Prg::new(seed);
            let mut b = Prg::new(seed);
            for _ in 0..8 {
                prop_assert_eq!(a.uniform_unit_interval().to_bits(), b.uniform_unit_interval().to_bits());
                prop_assert_eq!(a.uniform_int(0, 99).unwrap(), b.uniform_int(0, 99).unwrap());
            }
        }
    }
}
