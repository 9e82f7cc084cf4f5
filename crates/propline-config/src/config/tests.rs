// crates/propline-config/src/config/tests.rs
// ============================================================================
// Module: Config Unit Tests
// Description: Helper-level validation checks.
// Purpose: Cover path and entry validation without touching the filesystem.
// Dependencies: propline-config
// ============================================================================

//! ## Overview
//! Exercises private validation helpers directly.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use super::*;

#[test]
fn explicit_paths_win() {
    let path = resolve_path(Some(Path::new("custom.toml"))).unwrap();
    assert_eq!(path, PathBuf::from("custom.toml"));
}

#[test]
fn long_path_components_are_rejected() {
    let long = "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1);
    let err = validate_path(Path::new(&long)).unwrap_err();
    assert!(err.to_string().contains("component too long"));
}

#[test]
fn path_strings_must_be_non_empty() {
    let err = validate_path_string("resolvers[0].path", "  ").unwrap_err();
    assert!(err.to_string().contains("resolvers[0].path must be non-empty"));
    assert!(validate_path_string("resolvers[0].path", "app.yaml").is_ok());
}

#[test]
fn resolver_types_must_be_snake_case() {
    let entry = ResolverEntry {
        kind: "Env".to_string(),
        settings: toml::Table::new(),
    };
    assert!(entry.validate(2).unwrap_err().to_string().contains("resolvers[2].type"));
    let entry = ResolverEntry {
        kind: "command_line".to_string(),
        settings: toml::Table::new(),
    };
    assert!(entry.validate(0).is_ok());
}

#[test]
fn disabled_expansion_skips_syntax_checks() {
    let expansion = ExpansionConfig {
        enabled: false,
        prefix: String::new(),
        suffix: String::new(),
    };
    assert!(expansion.validate().is_ok());
}
