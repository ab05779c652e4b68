// src/random/xorshift.rs
//! xorshift64* — linear shift register with a multiplicative output step

use crate::consts::{OID_XORSHIFT, XORSHIFT_MULTIPLIER, XORSHIFT_ZERO_GUARD};
use crate::error::Result;

use super::{fold_seed, random_value, RandomBackend};

#[derive(Debug)]
pub struct Xorshift64Star {
    state: u64,
    /// Unconsumed bytes of the last output word
    pending: [u8; 8],
    pending_len: usize,
}

impl Xorshift64Star {
    /// New generator seeded from OS entropy
    pub fn new() -> Self {
        Self::from_state(random_value())
    }

    /// A zero state is replaced, it would never leave zero
    ///
    /// The replacement is a reachable state itself, so a seed folding to 0
    /// and a seed folding to `XORSHIFT_ZERO_GUARD` produce the same stream.
    pub fn from_state(state: u64) -> Self {
        Self {
            state: if state == 0 { XORSHIFT_ZERO_GUARD } else { state },
            pending: [0; 8],
            pending_len: 0,
        }
    }

    fn output(&self) -> u64 {
        self.state.wrapping_mul(XORSHIFT_MULTIPLIER)
    }
}

impl Default for Xorshift64Star {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomBackend for Xorshift64Star {
    fn name(&self) -> &'static str {
        OID_XORSHIFT
    }

    fn advance(&mut self) -> Result<()> {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        Ok(())
    }

    fn seed(&mut self, seed: &[u8]) -> Result<()> {
        *self = Self::from_state(fold_seed(seed)?);
        Ok(())
    }

    fn fill(&mut self, out: &mut [u8]) -> Result<()> {
        let mut written = 0;
        while written < out.len() {
            if self.pending_len == 0 {
                self.advance()?;
                self.pending = self.output().to_le_bytes();
                self.pending_len = 8;
            }
            let start = 8 - self.pending_len;
            let take = self.pending_len.min(out.len() - written);
            out[written..written + take].copy_from_slice(&self.pending[start..start + take]);
            self.pending_len -= take;
            written += take;
        }
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.state = 0;
        self.pending = [0; 8];
        self.pending_len = 0;
        Ok(())
    }

    fn is_seedable(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_step(mut x: u64) -> u64 {
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        x
    }

    #[test]
    fn first_word_matches_reference() {
        let mut rng = Xorshift64Star::from_state(1);
        let mut out = [0u8; 8];
        rng.fill(&mut out).unwrap();
        let expected = reference_step(1).wrapping_mul(XORSHIFT_MULTIPLIER);
        assert_eq!(u64::from_le_bytes(out), expected);
    }

    #[test]
    fn split_reads_equal_one_read() {
        let mut whole = Xorshift64Star::from_state(42);
        let mut split = Xorshift64Star::from_state(42);

        let mut a = [0u8; 21];
        whole.fill(&mut a).unwrap();

        let mut b = [0u8; 21];
        split.fill(&mut b[..3]).unwrap();
        split.fill(&mut b[3..13]).unwrap();
        split.fill(&mut b[13..]).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn zero_state_is_guarded() {
        let rng = Xorshift64Star::from_state(0);
        assert_eq!(rng.state, XORSHIFT_ZERO_GUARD);
    }
}
