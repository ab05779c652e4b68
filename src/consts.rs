// src/consts.rs
//! Shared constants — table sizing, generator parameters and defaults

/// Initial number of slots in a freshly created table
pub const DEFAULT_INITIAL_CAPACITY: usize = 4;

/// Longest accepted slot description, in bytes
pub const DEFAULT_MAX_DESCRIPTION_LEN: usize = 256;

/// Config file looked up when `CTXV_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "context-vault.toml";

/// Environment variable overriding the config file path
pub const CONFIG_ENV_VAR: &str = "CTXV_CONFIG";

/// Blocking OS entropy device
pub const DEV_RANDOM_PATH: &str = "/dev/random";

/// Non-blocking OS entropy device
pub const DEV_URANDOM_PATH: &str = "/dev/urandom";

// x ← a·x + c (mod 2^64)
pub const LCG_MULTIPLIER: u64 = 125;
pub const LCG_INCREMENT: u64 = 3;
/// Bit offset of the output byte inside the LCG state
pub const LCG_OUTPUT_SHIFT: u32 = 24;

/// Output multiplier of xorshift64*
pub const XORSHIFT_MULTIPLIER: u64 = 0x2545_F491_4F6C_DD1D;
/// Replacement for an all-zero xorshift state (the zero state is a fixed point)
pub const XORSHIFT_ZERO_GUARD: u64 = 0x9E37_79B9_7F4A_7C15;

/// Bytes of OS entropy used to initialise a hash DRBG counter at construction
pub const HASH_DRBG_INITIAL_ENTROPY: usize = 64;

// Generator type tags
pub const OID_LCG: &str = "lcg";
pub const OID_XORSHIFT: &str = "xorshift64";
pub const OID_OS_NATIVE: &str = "os-native";
pub const OID_DEV_RANDOM: &str = "dev-random";
pub const OID_DEV_URANDOM: &str = "dev-urandom";
pub const OID_FILE: &str = "file";
pub const OID_UNIX_SOCKET: &str = "unix-socket";
pub const OID_HASHRND: &str = "hashrnd";
pub const OID_HASHRND_SHA256: &str = "hashrnd-sha256";
pub const OID_HASHRND_SHA512: &str = "hashrnd-sha512";

// Hash function type tags
pub const OID_SHA224: &str = "sha224";
pub const OID_SHA256: &str = "sha256";
pub const OID_SHA384: &str = "sha384";
pub const OID_SHA512: &str = "sha512";
