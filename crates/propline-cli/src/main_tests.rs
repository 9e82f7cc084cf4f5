// crates/propline-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for argument interpretation in the CLI entry point.
// Purpose: Ensure `resolve` options map onto method descriptors faithfully.
// Dependencies: propline-cli main helpers
// ============================================================================

//! ## Overview
//! Covers processor directive parsing, descriptor construction from
//! `resolve` flags, and error chain rendering.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use clap::Parser;
use propline_core::MethodKind;
use propline_core::TypeDescriptor;

use super::Cli;
use super::CliError;
use super::Commands;
use super::ResolveCommand;
use super::parse_directive;
use super::resolve_method;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn resolve_command(args: &[&str]) -> ResolveCommand {
    let cli = Cli::try_parse_from(args).expect("parse cli");
    match cli.command {
        Some(Commands::Resolve(command)) => command,
        other => panic!("expected resolve command, got {other:?}"),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn directive_without_argument() {
    let directive = parse_directive("base64-decode").expect("directive");
    assert_eq!(directive.processor.as_str(), "base64-decode");
    assert_eq!(directive.argument, None);
}

#[test]
fn directive_argument_keeps_later_colons() {
    let directive = parse_directive("decrypt:aes:gcm").expect("directive");
    assert_eq!(directive.processor.as_str(), "decrypt");
    assert_eq!(directive.argument.as_deref(), Some("aes:gcm"));
}

#[test]
fn directive_requires_name() {
    let err = parse_directive(":arg").expect_err("missing name");
    assert!(err.to_string().contains("invalid --process value"));
}

#[test]
fn resolve_defaults_to_string() {
    let command = resolve_command(&["propline", "resolve", "app.name"]);
    let method = resolve_method(&command).expect("method");
    assert_eq!(method.kind, MethodKind::Property);
    assert_eq!(method.return_type, TypeDescriptor::String);
    assert_eq!(method.property.as_ref().map(|name| name.as_str()), Some("app.name"));
    assert!(method.metadata.processors.is_empty());
    assert!(!method.metadata.strip_empty_values);
}

#[test]
fn resolve_flags_populate_metadata() {
    let command = resolve_command(&[
        "propline",
        "resolve",
        "ports",
        "--type",
        "list<u16>",
        "--delimiter",
        ";",
        "--strip-empty",
        "--format",
        "[year]-[month]-[day]",
        "--process",
        "base64-decode",
        "--process",
        "decrypt:key1",
    ]);
    let method = resolve_method(&command).expect("method");
    assert_eq!(method.return_type, TypeDescriptor::List(Box::new(TypeDescriptor::U16)));
    assert_eq!(method.delimiter(), Some(";"));
    assert!(method.metadata.strip_empty_values);
    assert_eq!(method.date_time_format(), Some("[year]-[month]-[day]"));
    let processors: Vec<_> =
        method.metadata.processors.iter().map(|directive| directive.processor.as_str()).collect();
    assert_eq!(processors, vec!["base64-decode", "decrypt"]);
    assert_eq!(method.metadata.processors[1].argument.as_deref(), Some("key1"));
}

#[test]
fn resolve_rejects_bad_type() {
    let command = resolve_command(&["propline", "resolve", "x", "--type", "list<"]);
    let err = resolve_method(&command).expect_err("bad descriptor");
    assert!(err.to_string().starts_with("invalid --type: "));
}

#[test]
fn resolve_rejects_empty_name() {
    let command = resolve_command(&["propline", "resolve", ""]);
    let err = resolve_method(&command).expect_err("empty name");
    assert!(err.to_string().contains("property name must not be empty"));
}

#[test]
fn defines_accumulate_across_subcommand() {
    let cli = Cli::try_parse_from(["propline", "-D", "a=1", "resolve", "a", "--define", "b=2"])
        .expect("parse cli");
    assert_eq!(cli.engine_args().defines, vec!["a=1".to_string(), "b=2".to_string()]);
}

#[test]
fn defines_before_subcommand_are_kept_alone() {
    let cli = Cli::try_parse_from(["propline", "-D", "a=1", "-Db=2", "check"]).expect("parse cli");
    assert_eq!(cli.engine_args().defines, vec!["a=1".to_string(), "b=2".to_string()]);
}

#[test]
fn later_config_replaces_earlier_config() {
    let args = ["propline", "--config", "a.toml", "expand", "x", "--config", "b.toml"];
    let cli = Cli::try_parse_from(args).expect("parse cli");
    assert_eq!(cli.engine_args().config, Some(PathBuf::from("b.toml")));
    let cli = Cli::try_parse_from(["propline", "--config", "a.toml", "check"]).expect("parse cli");
    assert_eq!(cli.engine_args().config, Some(PathBuf::from("a.toml")));
}

#[test]
fn error_chain_is_rendered() {
    let io = std::io::Error::other("disk gone");
    let err = CliError::with_chain("failed to load configuration", &io);
    assert_eq!(err.to_string(), "failed to load configuration: disk gone");
}
