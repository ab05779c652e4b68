// src/random/hashrnd.rs
//! Hash-derived deterministic random bit generator
//!
//! State is a counter as wide as the hash output. Seeding sets
//! `counter = H(seed)`; every step increments the counter as a big-endian
//! integer and emits `H(counter)`. Works over any hash exposed through
//! `DynDigest`, so the registry can hand in whatever function it knows.

use sha2::digest::DynDigest;
use sha2::{Sha256, Sha512};

use crate::aliases::{DrbgBlock, DrbgCounter};
use crate::consts::{HASH_DRBG_INITIAL_ENTROPY, OID_HASHRND_SHA256, OID_HASHRND_SHA512};
use crate::error::{CoreError, Result};

use super::{random_value, RandomBackend};

pub type BoxedHasher = Box<dyn DynDigest + Send>;

pub struct HashDrbg {
    name: &'static str,
    hasher: BoxedHasher,
    counter: DrbgCounter,
    block: DrbgBlock,
    offset: usize,
}

impl HashDrbg {
    /// Hash DRBG over `hasher`, initialised from OS entropy
    pub fn with_hasher(hasher: BoxedHasher, name: &'static str) -> Result<Self> {
        let mut drbg = Self {
            name,
            hasher,
            counter: DrbgCounter::new(Vec::new()),
            block: DrbgBlock::new(Vec::new()),
            offset: 0,
        };
        let entropy: Vec<u8> = (0..HASH_DRBG_INITIAL_ENTROPY / 8)
            .flat_map(|_| random_value().to_le_bytes())
            .collect();
        drbg.seed(&entropy)?;
        Ok(drbg)
    }

    pub fn sha256() -> Result<Self> {
        Self::with_hasher(Box::new(Sha256::default()), OID_HASHRND_SHA256)
    }

    pub fn sha512() -> Result<Self> {
        Self::with_hasher(Box::new(Sha512::default()), OID_HASHRND_SHA512)
    }

    /// Output block width in bytes
    pub fn block_len(&self) -> usize {
        self.hasher.output_size()
    }

    fn digest(&mut self, data: &[u8]) -> Vec<u8> {
        self.hasher.update(data);
        self.hasher.finalize_reset().into_vec()
    }
}

/// Big-endian increment, wrapping at the counter width
pub(crate) fn increment_be(counter: &mut [u8]) {
    for byte in counter.iter_mut().rev() {
        let (next, carry) = byte.overflowing_add(1);
        *byte = next;
        if !carry {
            return;
        }
    }
}

impl RandomBackend for HashDrbg {
    fn name(&self) -> &'static str {
        self.name
    }

    fn advance(&mut self) -> Result<()> {
        let mut next = self.counter.to_vec();
        increment_be(&mut next);
        let block = self.digest(&next);
        // Replacing the containers zeroizes the previous state
        self.counter = DrbgCounter::new(next);
        self.block = DrbgBlock::new(block);
        self.offset = 0;
        Ok(())
    }

    fn seed(&mut self, seed: &[u8]) -> Result<()> {
        if seed.is_empty() {
            return Err(CoreError::EmptySeed);
        }
        let counter = self.digest(seed);
        self.counter = DrbgCounter::new(counter);
        self.block = DrbgBlock::new(Vec::new());
        self.offset = 0;
        Ok(())
    }

    fn fill(&mut self, out: &mut [u8]) -> Result<()> {
        let mut written = 0;
        while written < out.len() {
            if self.offset >= self.block.len() {
                self.advance()?;
            }
            let block: &[u8] = &self.block;
            let take = (block.len() - self.offset).min(out.len() - written);
            out[written..written + take].copy_from_slice(&block[self.offset..self.offset + take]);
            self.offset += take;
            written += take;
        }
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.counter = DrbgCounter::new(Vec::new());
        self.block = DrbgBlock::new(Vec::new());
        self.offset = 0;
        self.hasher.reset();
        Ok(())
    }

    fn is_seedable(&self) -> bool {
        true
    }

    fn is_secure(&self) -> bool {
        true
    }
}
