// src/aliases.rs
//! Secret containers used by the hash DRBG
//!
//! Both wipe their bytes when dropped or replaced.

pub use zeroize::Zeroizing;

pub type DrbgCounter = Zeroizing<Vec<u8>>; // hash DRBG counter
pub type DrbgBlock = Zeroizing<Vec<u8>>; // current hash DRBG output block
