// tests/config_tests.rs
use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use context_vault::{Config, CoreError, GeneratorKind};

mod common;

#[test]
fn test_defaults() {
    common::setup();
    let config = Config::default();
    assert_eq!(config.manager.initial_capacity, 4);
    assert_eq!(config.manager.max_description_len, 256);
    assert_eq!(config.manager.salt_generator, GeneratorKind::OsNative);
    assert_eq!(config.random.default_generator, GeneratorKind::HashSha256);
}

#[test]
fn test_full_toml() {
    let config = Config::from_toml_str(
        r#"
        [manager]
        initial_capacity = 16
        max_description_len = 64
        salt_generator = { kind = "hash-sha512" }

        [random]
        default_generator = { kind = "file", path = "/tmp/recorded.bin" }
        "#,
    )
    .unwrap();

    assert_eq!(config.manager.initial_capacity, 16);
    assert_eq!(config.manager.max_description_len, 64);
    assert_eq!(config.manager.salt_generator, GeneratorKind::HashSha512);
    assert_eq!(
        config.random.default_generator,
        GeneratorKind::File {
            path: PathBuf::from("/tmp/recorded.bin")
        }
    );
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = Config::from_toml_str(
        r#"
        [manager]
        initial_capacity = 8
        "#,
    )
    .unwrap();

    assert_eq!(config.manager.initial_capacity, 8);
    assert_eq!(config.manager.max_description_len, 256);
    assert_eq!(config.random, Config::default().random);

    assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
}

#[test]
fn test_hash_generator_by_algorithm() {
    let config = Config::from_toml_str(
        r#"
        [random.default_generator]
        kind = "hash"
        algorithm = "sha384"
        "#,
    )
    .unwrap();
    assert_eq!(
        config.random.default_generator,
        GeneratorKind::Hash {
            algorithm: "sha384".to_string()
        }
    );
}

#[test]
fn test_invalid_toml_is_an_error() {
    assert!(matches!(
        Config::from_toml_str("[manager\ninitial_capacity = 1"),
        Err(CoreError::Config(_))
    ));
    assert!(matches!(
        Config::from_toml_str("[manager]\nsalt_generator = { kind = \"quantum\" }"),
        Err(CoreError::Config(_))
    ));
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[manager]\nmax_description_len = 10").unwrap();
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.manager.max_description_len, 10);

    assert!(matches!(
        Config::from_file(file.path().with_extension("missing")),
        Err(CoreError::Io(_))
    ));
}
