// crates/propline-resolvers/tests/command_line_resolver.rs
// ============================================================================
// Module: Command-Line Resolver Tests
// Description: Definition parsing checks.
// Purpose: Cover every accepted definition form.
// Dependencies: propline-resolvers
// ============================================================================

//! ## Overview
//! Exercises `-D` parsing, later-wins semantics, and ignored arguments.

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

use propline_resolvers::CommandLineResolver;
use propline_resolvers::CommandLineResolverConfig;

use crate::common::lookup;

#[test]
fn every_definition_form_is_accepted() {
    let resolver = CommandLineResolver::from_args([
        "propline",
        "-Dapp.name=demo",
        "-D",
        "app.port=8080",
        "--define",
        "app.mode=fast",
        "--define=app.url=jdbc:x?a=b",
        "-Dflag",
        "resolve",
        "app.name",
    ]);
    assert_eq!(lookup(&resolver, "app.name").unwrap().as_deref(), Some("demo"));
    assert_eq!(lookup(&resolver, "app.port").unwrap().as_deref(), Some("8080"));
    assert_eq!(lookup(&resolver, "app.mode").unwrap().as_deref(), Some("fast"));
    assert_eq!(lookup(&resolver, "app.url").unwrap().as_deref(), Some("jdbc:x?a=b"));
    assert_eq!(lookup(&resolver, "flag").unwrap().as_deref(), Some(""));
    assert_eq!(lookup(&resolver, "resolve").unwrap(), None);
    assert_eq!(resolver.definitions().len(), 5);
}

#[test]
fn later_definitions_win() {
    let resolver = CommandLineResolver::from_args(["-Da=1", "-Da=2"]);
    assert_eq!(lookup(&resolver, "a").unwrap().as_deref(), Some("2"));
}

#[test]
fn empty_names_are_ignored() {
    let resolver = CommandLineResolver::from_definitions(["=x", "b=", "c"]);
    assert_eq!(resolver.definitions().len(), 2);
    assert_eq!(lookup(&resolver, "b").unwrap().as_deref(), Some(""));
}

#[test]
fn configured_definitions_apply_after_process_args() {
    let resolver = CommandLineResolver::from_config(&CommandLineResolverConfig {
        definitions: vec!["app.name=configured".to_string()],
        process_args: false,
    });
    assert_eq!(lookup(&resolver, "app.name").unwrap().as_deref(), Some("configured"));
}
