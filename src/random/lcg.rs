// src/random/lcg.rs
//! Linear congruential generator
//!
//! Fast and fully deterministic once seeded. Not suitable for keys or
//! handle salts.

use crate::consts::{LCG_INCREMENT, LCG_MULTIPLIER, LCG_OUTPUT_SHIFT, OID_LCG};
use crate::error::Result;

use super::{fold_seed, random_value, RandomBackend};

#[derive(Debug)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// New generator seeded from OS entropy
    pub fn new() -> Self {
        Self {
            state: random_value(),
        }
    }

    pub fn from_state(state: u64) -> Self {
        Self { state }
    }

    fn output(&self) -> u8 {
        (self.state >> LCG_OUTPUT_SHIFT) as u8
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomBackend for Lcg {
    fn name(&self) -> &'static str {
        OID_LCG
    }

    fn advance(&mut self) -> Result<()> {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        Ok(())
    }

    fn seed(&mut self, seed: &[u8]) -> Result<()> {
        self.state = fold_seed(seed)?;
        Ok(())
    }

    fn fill(&mut self, out: &mut [u8]) -> Result<()> {
        for byte in out.iter_mut() {
            self.advance()?;
            *byte = self.output();
        }
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.state = 0;
        Ok(())
    }

    fn is_seedable(&self) -> bool {
        true
    }
}
