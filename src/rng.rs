//! Deterministic seeded RNG
//!
//! A 32-bit mulberry32-style generator. Every arena is produced from one
//! `ArenaRng` owned by a single generation call, so the same seed and the
//! same call sequence always yield the same arena.

use rand::{RngCore, SeedableRng};

use crate::error::ArenaError;

/// Replacement state for seeds that hash to zero
const ZERO_SEED_STATE: u32 = 0x9E37_79B9;
/// Odd increment added to the state on every draw
const STATE_INCREMENT: u32 = 0x6D2B_79F5;

/// Seeded pseudorandom generator
#[derive(Debug, Clone)]
pub struct ArenaRng {
    state: u32,
}

impl ArenaRng {
    /// Create a generator from a string seed
    pub fn new(seed: &str) -> Self {
        Self::from_state(Self::hash_seed(seed))
    }

    /// Create a generator from a numeric seed
    pub fn from_state(state: u32) -> Self {
        let state = if state == 0 { ZERO_SEED_STATE } else { state };
        Self { state }
    }

    /// Multiplicative string hash (`h = h * 31 + c`, wrapping)
    pub fn hash_seed(seed: &str) -> u32 {
        seed.chars()
            .fold(0u32, |h, c| h.wrapping_mul(31).wrapping_add(c as u32))
    }

    #[inline]
    fn advance(&mut self) -> u32 {
        self.state = self.state.wrapping_add(STATE_INCREMENT);
        let mut x = self.state;
        x ^= x >> 16;
        x = x.wrapping_mul(0x21F0_AAAD);
        x ^= x >> 15;
        x = x.wrapping_mul(0x735A_2D97);
        x ^ (x >> 15)
    }

    /// Uniform value in [0, 1) from the top 24 bits
    #[inline]
    pub fn float(&mut self) -> f32 {
        (self.advance() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform value in [lo, hi)
    #[inline]
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.float() * (hi - lo)
    }

    /// Uniform integer in [min, max], bounds swapped if reversed
    pub fn int(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let span = (hi as i64 - lo as i64 + 1) as f64;
        let unit = self.advance() as f64 / 4_294_967_296.0;
        (lo as i64 + (unit * span) as i64) as i32
    }

    /// True with probability `p`
    #[inline]
    pub fn bool(&mut self, p: f32) -> bool {
        self.float() < p
    }

    /// Pick one element uniformly
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, ArenaError> {
        if items.is_empty() {
            return Err(ArenaError::EmptyPick);
        }
        let index = self.int(0, items.len() as i32 - 1) as usize;
        Ok(&items[index])
    }

    /// Fisher-Yates shuffle in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.int(0, i as i32) as usize;
            items.swap(i, j);
        }
    }
}

impl RngCore for ArenaRng {
    fn next_u32(&mut self) -> u32 {
        self.advance()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.advance() as u64;
        let lo = self.advance() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.advance().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for ArenaRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::from_state(u32::from_le_bytes(seed))
    }
}
