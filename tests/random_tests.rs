// tests/random_tests.rs
use std::io::Write;
use std::path::Path;

use rand::TryRngCore;
use sha2::{Digest, Sha256};
use tempfile::{tempdir, NamedTempFile};

use context_vault::{
    available_backends, CoreError, GeneratorKind, RandomGenerator, TypeRegistry,
};

mod common;
mod support;
use support::{test_registry, EXTRA_HASH_TAG};

fn seeded(kind: &GeneratorKind, seed: &[u8]) -> RandomGenerator {
    let mut generator = RandomGenerator::create(kind).unwrap();
    generator.seed(seed).unwrap();
    generator
}

#[test]
fn test_seedable_backends_are_deterministic() {
    common::setup();
    let kinds = [
        GeneratorKind::Lcg,
        GeneratorKind::Xorshift,
        GeneratorKind::HashSha256,
        GeneratorKind::HashSha512,
        GeneratorKind::Hash {
            algorithm: "sha384".to_string(),
        },
    ];
    for kind in &kinds {
        let mut a = seeded(kind, b"the same seed");
        let mut b = seeded(kind, b"the same seed");
        assert!(a.is_seedable(), "{kind:?}");

        let first = a.generate(100).unwrap();
        assert_eq!(first, b.generate(100).unwrap(), "{kind:?}");

        let mut c = seeded(kind, b"another seed");
        assert_ne!(first, c.generate(100).unwrap(), "{kind:?}");

        // reseeding restarts the sequence
        a.seed(b"the same seed").unwrap();
        assert_eq!(first, a.generate(100).unwrap(), "{kind:?}");
    }
}

#[test]
fn test_empty_seed_is_rejected() {
    for kind in [GeneratorKind::Lcg, GeneratorKind::Xorshift, GeneratorKind::HashSha256] {
        let mut generator = RandomGenerator::create(&kind).unwrap();
        assert!(matches!(generator.seed(&[]), Err(CoreError::EmptySeed)));
    }
}

#[test]
fn test_generate_returns_exact_length() {
    let mut generator = RandomGenerator::create(&GeneratorKind::HashSha256).unwrap();
    for len in [0usize, 1, 31, 32, 33, 1000] {
        assert_eq!(generator.generate(len).unwrap().len(), len);
    }
}

#[test]
fn test_xorshift_first_word_from_seed() {
    let mut generator = seeded(&GeneratorKind::Xorshift, &[1]);
    // state 1 after one xorshift step
    let state: u64 = 0x0200_0001;
    let expected = state.wrapping_mul(0x2545_F491_4F6C_DD1D);
    assert_eq!(generator.next_u64().unwrap(), expected);
}

#[test]
fn test_lcg_output_follows_recurrence() {
    let mut generator = seeded(&GeneratorKind::Lcg, &0xDEAD_BEEF_u64.to_le_bytes());
    let mut state = 0xDEAD_BEEF_u64;
    let expected: Vec<u8> = (0..16)
        .map(|_| {
            state = state.wrapping_mul(125).wrapping_add(3);
            (state >> 24) as u8
        })
        .collect();
    assert_eq!(generator.generate(16).unwrap(), expected);
}

#[test]
fn test_hash_drbg_matches_manual_construction() {
    let mut generator = seeded(&GeneratorKind::HashSha256, b"abc");

    let mut counter = Sha256::digest(b"abc").to_vec();
    let mut expected = Vec::new();
    for _ in 0..2 {
        for byte in counter.iter_mut().rev() {
            let (next, carry) = byte.overflowing_add(1);
            *byte = next;
            if !carry {
                break;
            }
        }
        expected.extend_from_slice(&Sha256::digest(&counter));
    }

    assert_eq!(generator.generate(64).unwrap(), expected);
}

#[test]
fn test_non_seedable_backends_refuse_seed() {
    let mut os = RandomGenerator::create(&GeneratorKind::OsNative).unwrap();
    assert!(!os.is_seedable());
    assert!(os.is_secure());
    assert!(matches!(
        os.seed(b"x"),
        Err(CoreError::UnsupportedOperation { operation: "seed", .. })
    ));
    assert_eq!(os.generate(16).unwrap().len(), 16);

    if Path::new("/dev/urandom").exists() {
        let mut urandom = RandomGenerator::create(&GeneratorKind::DevUrandom).unwrap();
        assert!(matches!(
            urandom.seed(b"x"),
            Err(CoreError::UnsupportedOperation { .. })
        ));
        assert_eq!(urandom.generate(64).unwrap().len(), 64);
        urandom.release().unwrap();
    }
}

#[test]
fn test_file_backend_replays_then_fails_at_eof() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]).unwrap();
    file.flush().unwrap();

    let kind = GeneratorKind::File {
        path: file.path().to_path_buf(),
    };
    let mut generator = RandomGenerator::create(&kind).unwrap();
    assert!(!generator.is_secure());
    assert!(matches!(
        generator.seed(b"x"),
        Err(CoreError::UnsupportedOperation { .. })
    ));

    assert_eq!(generator.generate(8).unwrap(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    let err = generator.generate(8).unwrap_err();
    assert!(matches!(err, CoreError::Io(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof));
    generator.release().unwrap();
}

#[test]
fn test_missing_file_is_backend_unavailable() {
    let dir = tempdir().unwrap();
    let kind = GeneratorKind::File {
        path: dir.path().join("does-not-exist"),
    };
    let err = RandomGenerator::create(&kind).unwrap_err();
    assert!(matches!(err, CoreError::BackendUnavailable { ref backend, .. } if backend == "file"));
}

#[cfg(unix)]
#[test]
fn test_unix_socket_backend_reads_from_peer() {
    use std::os::unix::net::UnixListener;
    use std::thread;

    let dir = tempdir().unwrap();
    let path = dir.path().join("rng.sock");
    let listener = UnixListener::bind(&path).unwrap();

    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let bytes: Vec<u8> = (0u8..32).collect();
        stream.write_all(&bytes).unwrap();
    });

    let kind = GeneratorKind::UnixSocket { path: path.clone() };
    let mut generator = RandomGenerator::create(&kind).unwrap();
    assert_eq!(generator.name(), "unix-socket");
    assert!(!generator.is_seedable());
    assert!(matches!(
        generator.seed(b"x"),
        Err(CoreError::UnsupportedOperation { operation: "seed", .. })
    ));
    assert_eq!(generator.generate(4).unwrap(), vec![0, 1, 2, 3]);
    assert_eq!(generator.generate(4).unwrap(), vec![4, 5, 6, 7]);
    generator.release().unwrap();

    server.join().unwrap();
}

#[cfg(unix)]
#[test]
fn test_unix_socket_without_listener_is_unavailable() {
    let dir = tempdir().unwrap();
    let kind = GeneratorKind::UnixSocket {
        path: dir.path().join("nobody-home.sock"),
    };
    assert!(matches!(
        RandomGenerator::create(&kind),
        Err(CoreError::BackendUnavailable { .. })
    ));
}

#[test]
fn test_create_oid_resolves_registered_generators() {
    let registry = TypeRegistry::with_builtins();

    let mut lcg = RandomGenerator::create_oid(&registry, "lcg").unwrap();
    assert_eq!(lcg.name(), "lcg");
    assert!(!lcg.is_secure());
    lcg.seed(b"seed").unwrap();

    let drbg = RandomGenerator::create_oid(&registry, "hashrnd-sha512").unwrap();
    assert_eq!(drbg.name(), "hashrnd-sha512");
    assert!(drbg.is_secure());
}

#[test]
fn test_create_oid_errors() {
    let registry = TypeRegistry::with_builtins();

    assert!(matches!(
        RandomGenerator::create_oid(&registry, "nope"),
        Err(CoreError::UnknownType(_))
    ));
    // a hash function is not a generator
    assert!(matches!(
        RandomGenerator::create_oid(&registry, "sha256"),
        Err(CoreError::TypeMismatch { .. })
    ));
    // needs a path, so there is no parameterless constructor
    assert!(matches!(
        RandomGenerator::create_oid(&registry, "file"),
        Err(CoreError::UnsupportedOperation { .. })
    ));
}

#[test]
fn test_create_hash_oid_by_name_and_dotted_id() {
    let registry = TypeRegistry::with_builtins();

    let mut by_name = RandomGenerator::create_hash_oid(&registry, "sha512").unwrap();
    let mut by_id = RandomGenerator::create_hash_oid(&registry, "2.16.840.1.101.3.4.2.3").unwrap();
    assert_eq!(by_name.name(), "hashrnd");

    by_name.seed(b"k").unwrap();
    by_id.seed(b"k").unwrap();
    assert_eq!(by_name.generate(80).unwrap(), by_id.generate(80).unwrap());

    assert!(matches!(
        RandomGenerator::create_hash_oid(&registry, "lcg"),
        Err(CoreError::TypeMismatch { .. })
    ));
}

#[test]
fn test_hash_kind_resolves_through_given_registry() {
    let kind = GeneratorKind::Hash {
        algorithm: EXTRA_HASH_TAG.to_string(),
    };
    // unknown to the builtin registry
    assert!(matches!(
        RandomGenerator::create(&kind),
        Err(CoreError::UnknownType(ref tag)) if tag == EXTRA_HASH_TAG
    ));

    let registry = test_registry();
    let mut from_kind = RandomGenerator::create_with(&kind, &registry).unwrap();
    let mut from_tag = RandomGenerator::create_hash_oid(&registry, EXTRA_HASH_TAG).unwrap();
    assert_eq!(from_kind.name(), "hashrnd");
    assert!(from_kind.is_secure());

    from_kind.seed(b"k").unwrap();
    from_tag.seed(b"k").unwrap();
    assert_eq!(from_kind.generate(70).unwrap(), from_tag.generate(70).unwrap());
}

#[test]
fn test_xorshift_seeds_folding_to_zero_share_the_guard_state() {
    // [0] folds to the zero state, which is replaced by the guard value
    let guard = 0x9E37_79B9_7F4A_7C15_u64.to_le_bytes();
    let mut zero = seeded(&GeneratorKind::Xorshift, &[0]);
    let mut same = seeded(&GeneratorKind::Xorshift, &guard);
    assert_eq!(zero.generate(32).unwrap(), same.generate(32).unwrap());
    assert_ne!(zero.next_u64().unwrap(), 0);
}

#[test]
fn test_generator_implements_try_rng_core() {
    let mut a = seeded(&GeneratorKind::Xorshift, b"rng");
    let mut b = seeded(&GeneratorKind::Xorshift, b"rng");

    let word = a.try_next_u64().unwrap();
    assert_eq!(word, b.next_u64().unwrap());

    let mut buf = [0u8; 12];
    a.try_fill_bytes(&mut buf).unwrap();
    assert_eq!(buf.to_vec(), b.generate(12).unwrap());
    let _ = a.try_next_u32().unwrap();
}

#[test]
fn test_available_backends_are_all_constructible() {
    let kinds = available_backends();
    assert!(kinds.contains(&GeneratorKind::OsNative));
    assert!(kinds.contains(&GeneratorKind::Lcg));

    let registry = TypeRegistry::with_builtins();
    for kind in kinds {
        // skip the blocking device, it may stall on an entropy-starved host
        if kind == GeneratorKind::DevRandom {
            continue;
        }
        let generator = RandomGenerator::create(&kind).unwrap();
        assert!(registry.contains(generator.name()), "{kind:?}");
        assert_eq!(generator.is_secure(), kind.is_secure(), "{kind:?}");
        generator.release().unwrap();
    }
}
