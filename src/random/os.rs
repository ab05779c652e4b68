// src/random/os.rs
//! Platform-native secure source (getrandom and friends, via `OsRng`)

use std::io;

use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::consts::OID_OS_NATIVE;
use crate::error::{CoreError, Result};

use super::RandomBackend;

#[derive(Debug)]
pub struct OsNative {
    _private: (),
}

impl OsNative {
    /// Probes the platform API once so a missing source fails at construction
    pub fn new() -> Result<Self> {
        let mut probe = [0u8; 1];
        OsRng
            .try_fill_bytes(&mut probe)
            .map_err(|err| CoreError::BackendUnavailable {
                backend: OID_OS_NATIVE.to_string(),
                reason: err.to_string(),
            })?;
        Ok(Self { _private: () })
    }
}

impl RandomBackend for OsNative {
    fn name(&self) -> &'static str {
        OID_OS_NATIVE
    }

    fn advance(&mut self) -> Result<()> {
        Ok(())
    }

    fn seed(&mut self, _seed: &[u8]) -> Result<()> {
        Err(CoreError::UnsupportedOperation {
            backend: OID_OS_NATIVE,
            operation: "seed",
        })
    }

    fn fill(&mut self, out: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(out)
            .map_err(|err| CoreError::Io(io::Error::other(err)))
    }

    fn release(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_secure(&self) -> bool {
        true
    }
}
