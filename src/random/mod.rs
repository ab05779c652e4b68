// src/random/mod.rs
//! Pseudo-random generators behind one lifecycle contract
//!
//! Every backend implements [`RandomBackend`]; callers only ever hold a
//! [`RandomGenerator`], which owns exactly one backend state and releases it
//! exactly once. Backends are picked by [`GeneratorKind`] or by resolving a
//! type tag through the [`TypeRegistry`](crate::oid::TypeRegistry).
//!
//! | kind          | seedable | secure | blocks |
//! |---------------|----------|--------|--------|
//! | `Lcg`         | yes      | no     | no     |
//! | `Xorshift`    | yes      | no     | no     |
//! | `File`        | no       | no     | no     |
//! | `DevRandom`   | no       | yes    | yes    |
//! | `DevUrandom`  | no       | yes    | no     |
//! | `OsNative`    | no       | yes    | no     |
//! | hash DRBG     | yes      | yes    | no     |
//! | `UnixSocket`  | no       | depends on the peer | yes |

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::TryRngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::consts::{
    DEV_RANDOM_PATH, DEV_URANDOM_PATH, OID_DEV_RANDOM, OID_DEV_URANDOM, OID_FILE, OID_HASHRND,
    OID_HASHRND_SHA256, OID_HASHRND_SHA512, OID_LCG, OID_OS_NATIVE, OID_UNIX_SOCKET, OID_XORSHIFT,
};
use crate::error::{CoreError, Result};
use crate::oid::TypeRegistry;

pub mod hashrnd;
pub mod lcg;
pub mod os;
pub mod stream;
pub mod xorshift;

pub use hashrnd::HashDrbg;
pub use lcg::Lcg;
pub use os::OsNative;
pub use stream::StreamBackend;
pub use xorshift::Xorshift64Star;

/// Dispatch set shared by every generator backend
pub trait RandomBackend: Send {
    /// Type tag of the backend, as registered in the type registry
    fn name(&self) -> &'static str;

    /// One internal state transition
    fn advance(&mut self) -> Result<()>;

    /// Deterministically reinitialise the internal state
    fn seed(&mut self, seed: &[u8]) -> Result<()>;

    /// Fill `out` completely or fail
    fn fill(&mut self, out: &mut [u8]) -> Result<()>;

    /// Close descriptors and wipe state
    fn release(&mut self) -> Result<()>;

    fn is_seedable(&self) -> bool {
        false
    }

    fn is_secure(&self) -> bool {
        false
    }
}

/// Selects a generator backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GeneratorKind {
    Lcg,
    Xorshift,
    File { path: PathBuf },
    DevRandom,
    DevUrandom,
    OsNative,
    HashSha256,
    HashSha512,
    /// Hash DRBG over any hash function registered under `algorithm`
    Hash { algorithm: String },
    UnixSocket { path: PathBuf },
}

impl GeneratorKind {
    /// Whether this backend is fit for minting unpredictable values
    pub fn is_secure(&self) -> bool {
        matches!(
            self,
            GeneratorKind::DevRandom
                | GeneratorKind::DevUrandom
                | GeneratorKind::OsNative
                | GeneratorKind::HashSha256
                | GeneratorKind::HashSha512
                | GeneratorKind::Hash { .. }
        )
    }

    pub fn oid(&self) -> &str {
        match self {
            GeneratorKind::Lcg => OID_LCG,
            GeneratorKind::Xorshift => OID_XORSHIFT,
            GeneratorKind::File { .. } => OID_FILE,
            GeneratorKind::DevRandom => OID_DEV_RANDOM,
            GeneratorKind::DevUrandom => OID_DEV_URANDOM,
            GeneratorKind::OsNative => OID_OS_NATIVE,
            GeneratorKind::HashSha256 => OID_HASHRND_SHA256,
            GeneratorKind::HashSha512 => OID_HASHRND_SHA512,
            GeneratorKind::Hash { algorithm } => algorithm.as_str(),
            GeneratorKind::UnixSocket { .. } => OID_UNIX_SOCKET,
        }
    }
}

/// Parameterless backends usable on this platform
///
/// Device readers are only listed on unix hosts where the device node
/// actually exists; `File` and `UnixSocket` need a path and are never listed.
pub fn available_backends() -> Vec<GeneratorKind> {
    let mut kinds = vec![
        GeneratorKind::Lcg,
        GeneratorKind::Xorshift,
        GeneratorKind::OsNative,
        GeneratorKind::HashSha256,
        GeneratorKind::HashSha512,
    ];
    if stream::device_present(DEV_RANDOM_PATH) {
        kinds.push(GeneratorKind::DevRandom);
    }
    if stream::device_present(DEV_URANDOM_PATH) {
        kinds.push(GeneratorKind::DevUrandom);
    }
    kinds
}

/// A generator instance owning exactly one backend state
pub struct RandomGenerator {
    backend: Box<dyn RandomBackend>,
    released: bool,
}

impl RandomGenerator {
    pub fn from_backend(backend: Box<dyn RandomBackend>) -> Self {
        debug!(backend = backend.name(), "random generator created");
        Self {
            backend,
            released: false,
        }
    }

    /// Open the backend selected by `kind`, resolving hash tags through the
    /// builtin registry
    pub fn create(kind: &GeneratorKind) -> Result<Self> {
        Self::create_with(kind, &TypeRegistry::builtin())
    }

    /// Open the backend selected by `kind`; `Hash { algorithm }` is looked
    /// up in `registry`
    pub fn create_with(kind: &GeneratorKind, registry: &TypeRegistry) -> Result<Self> {
        let backend: Box<dyn RandomBackend> = match kind {
            GeneratorKind::Lcg => Box::new(Lcg::new()),
            GeneratorKind::Xorshift => Box::new(Xorshift64Star::new()),
            GeneratorKind::File { path } => Box::new(stream::open_file(path)?),
            GeneratorKind::DevRandom => Box::new(stream::open_dev_random()?),
            GeneratorKind::DevUrandom => Box::new(stream::open_dev_urandom()?),
            GeneratorKind::OsNative => Box::new(OsNative::new()?),
            GeneratorKind::HashSha256 => Box::new(HashDrbg::sha256()?),
            GeneratorKind::HashSha512 => Box::new(HashDrbg::sha512()?),
            GeneratorKind::Hash { algorithm } => {
                return Self::create_hash_oid(registry, algorithm);
            }
            GeneratorKind::UnixSocket { path } => Box::new(stream::connect_unix_socket(path)?),
        };
        Ok(Self::from_backend(backend))
    }

    /// Resolve a generator tag through `registry` and run its constructor
    pub fn create_oid(registry: &TypeRegistry, tag: &str) -> Result<Self> {
        registry.construct_generator(tag)
    }

    /// Hash DRBG over the hash function registered under `tag`
    pub fn create_hash_oid(registry: &TypeRegistry, tag: &str) -> Result<Self> {
        let hasher = registry.construct_hash(tag)?;
        let drbg = HashDrbg::with_hasher(hasher, OID_HASHRND)?;
        Ok(Self::from_backend(Box::new(drbg)))
    }

    pub fn name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn is_seedable(&self) -> bool {
        self.backend.is_seedable()
    }

    pub fn is_secure(&self) -> bool {
        self.backend.is_secure()
    }

    pub fn seed(&mut self, seed: &[u8]) -> Result<()> {
        self.backend.seed(seed)
    }

    pub fn advance(&mut self) -> Result<()> {
        self.backend.advance()
    }

    /// Fill `out` completely; never a short read
    pub fn fill(&mut self, out: &mut [u8]) -> Result<()> {
        self.backend.fill(out)
    }

    /// Produce exactly `len` bytes
    pub fn generate(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; len];
        self.fill(&mut out)?;
        Ok(out)
    }

    pub fn next_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Tear the backend down; the generator cannot be used afterwards
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        debug!(backend = self.backend.name(), "random generator released");
        self.backend.release()
    }
}

impl Drop for RandomGenerator {
    fn drop(&mut self) {
        if !self.released {
            if let Err(err) = self.backend.release() {
                warn!(backend = self.backend.name(), %err, "release on drop failed");
            }
        }
    }
}

impl std::fmt::Debug for RandomGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomGenerator")
            .field("backend", &self.backend.name())
            .finish_non_exhaustive()
    }
}

impl TryRngCore for RandomGenerator {
    type Error = CoreError;

    fn try_next_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn try_next_u64(&mut self) -> Result<u64> {
        self.next_u64()
    }

    fn try_fill_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        self.fill(dst)
    }
}

/// 64 unpredictable bits for seeding algorithmic backends at construction
///
/// Falls back to a SHA-256 mix of wall clock, process id and a stack address
/// when the OS source fails.
pub(crate) fn random_value() -> u64 {
    match OsRng.try_next_u64() {
        Ok(value) => value,
        Err(err) => {
            warn!(%err, "OS entropy unavailable, deriving seed from clock");
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or_default();
            let marker = 0u8;
            let mut hasher = Sha256::new();
            hasher.update(nanos.to_le_bytes());
            hasher.update(std::process::id().to_le_bytes());
            hasher.update((&marker as *const u8 as usize).to_le_bytes());
            let digest = hasher.finalize();
            let mut word = [0u8; 8];
            word.copy_from_slice(&digest[..8]);
            u64::from_le_bytes(word)
        }
    }
}

/// Fold seed bytes into one 64-bit word
///
/// Eight-byte little-endian chunks are XORed together, each rotated by
/// `7 * position mod 64` so that reordering chunks changes the result.
pub(crate) fn fold_seed(seed: &[u8]) -> Result<u64> {
    if seed.is_empty() {
        return Err(CoreError::EmptySeed);
    }
    let folded = seed
        .chunks(8)
        .enumerate()
        .fold(0u64, |acc, (i, chunk)| {
            let mut word = [0u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            acc ^ u64::from_le_bytes(word).rotate_left(((i % 64) as u32 * 7) % 64)
        });
    Ok(folded)
}
