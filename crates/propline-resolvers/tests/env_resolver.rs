// crates/propline-resolvers/tests/env_resolver.rs
// ============================================================================
// Module: Environment Resolver Tests
// Description: Policy, naming, and limit checks for the env resolver.
// Purpose: Keep environment lookups predictable and fail-closed.
// Dependencies: propline-resolvers, propline-core
// ============================================================================

//! ## Overview
//! Uses override maps so tests never mutate the process environment.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use propline_core::CompositeResolver;
use propline_core::MapResolver;
use propline_core::PropertyValue;
use propline_core::Resolver;
use propline_core::ResolverError;
use propline_core::TypeDescriptor;
use propline_resolvers::EnvResolver;
use propline_resolvers::EnvResolverConfig;
use propline_resolvers::env::to_env_style;

use crate::common::lookup;
use crate::common::resolve_typed;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a resolver over a fixed environment.
fn overridden(pairs: &[(&str, &str)], config: EnvResolverConfig) -> EnvResolver {
    let overrides: BTreeMap<String, String> =
        pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect();
    EnvResolver::new(EnvResolverConfig {
        overrides: Some(overrides),
        ..config
    })
}

/// Sets a process environment variable to raw bytes.
#[cfg(unix)]
#[allow(unsafe_code, reason = "Test mutates the process env with a key no other test reads.")]
fn set_raw_var(key: &str, value: &[u8]) {
    use std::os::unix::ffi::OsStrExt;
    // SAFETY: The key is unique to one test and only read by that test.
    unsafe {
        std::env::set_var(key, std::ffi::OsStr::from_bytes(value));
    }
}

/// Builds a string set.
fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn property_names_map_to_env_style() {
    assert_eq!(to_env_style("app.db-url"), "APP_DB_URL");
    assert_eq!(to_env_style("PATH"), "PATH");
}

#[test]
fn exact_name_wins_over_env_style() {
    let resolver =
        overridden(&[("app.port", "1"), ("APP_PORT", "2")], EnvResolverConfig::default());
    assert_eq!(lookup(&resolver, "app.port").unwrap().as_deref(), Some("1"));
}

#[test]
fn env_style_is_tried_second() {
    let resolver = overridden(&[("APP_PORT", "8080")], EnvResolverConfig::default());
    assert_eq!(lookup(&resolver, "app.port").unwrap().as_deref(), Some("8080"));
    assert_eq!(lookup(&resolver, "app.host").unwrap(), None);
}

#[test]
fn blocked_keys_read_as_absent() {
    let resolver = overridden(
        &[("APP_PORT", "8080"), ("SECRET", "hunter2")],
        EnvResolverConfig {
            allowlist: Some(set(&["APP_PORT", "SECRET"])),
            denylist: set(&["SECRET"]),
            ..EnvResolverConfig::default()
        },
    );
    assert_eq!(lookup(&resolver, "app.port").unwrap().as_deref(), Some("8080"));
    assert_eq!(lookup(&resolver, "secret").unwrap(), None);
    assert_eq!(lookup(&resolver, "SECRET").unwrap(), None);
}

#[test]
fn oversized_values_are_rejected() {
    let resolver = overridden(
        &[("BIG", "0123456789")],
        EnvResolverConfig {
            max_value_bytes: 4,
            ..EnvResolverConfig::default()
        },
    );
    let err = lookup(&resolver, "BIG").unwrap_err();
    assert!(matches!(err, ResolverError::Rejected { .. }));
}

#[test]
fn oversized_keys_are_rejected() {
    let resolver = overridden(
        &[],
        EnvResolverConfig {
            max_key_bytes: 3,
            ..EnvResolverConfig::default()
        },
    );
    assert!(matches!(lookup(&resolver, "LONGER").unwrap_err(), ResolverError::Rejected { .. }));
}

#[test]
fn process_environment_is_read_without_overrides() {
    let resolver = EnvResolver::new(EnvResolverConfig::default());
    assert_eq!(lookup(&resolver, "cargo.pkg.name").unwrap().as_deref(), Some("propline-resolvers"));
}

#[test]
fn env_values_convert_through_the_engine() {
    let resolver = overridden(&[("APP_PORT", "8080")], EnvResolverConfig::default());
    let value = resolve_typed(Arc::new(resolver), "app.port", TypeDescriptor::U16);
    assert_eq!(value, PropertyValue::U16(8080));
}

#[cfg(unix)]
#[test]
fn non_utf8_values_are_rejected_not_skipped() {
    set_raw_var("PROPLINE_TEST_NON_UTF8", b"f\xffo");
    let env = EnvResolver::new(EnvResolverConfig::default());
    let err = lookup(&env, "propline.test.non-utf8").unwrap_err();
    assert!(matches!(
        &err,
        ResolverError::Rejected { property, reason }
            if property == "propline.test.non-utf8" && reason.contains("not valid UTF-8")
    ));
    let fallback: MapResolver = [("propline.test.non-utf8", "fallback")].into_iter().collect();
    let chain = CompositeResolver::new([
        Arc::new(env) as Arc<dyn Resolver>,
        Arc::new(fallback),
    ]);
    assert!(lookup(&chain, "propline.test.non-utf8").is_err());
}
