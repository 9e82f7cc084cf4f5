// crates/propline-config/tests/load_validation.rs
// ============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards and engine construction.
// Purpose: Ensure config input handling is strict and fail-closed.
// Dependencies: propline-config, propline-core, tempfile
// ============================================================================

//! ## Overview
//! Loads configuration files from temporary directories and checks both the
//! rejection paths and the engines built from accepted files.

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

use std::fs;
use std::io::Write;
use std::path::Path;

use propline_config::ConfigError;
use propline_config::PropLineConfig;
use propline_config::config_toml_example;
use propline_core::Arguments;
use propline_core::MethodDescriptor;
use propline_core::PropertyName;
use propline_core::PropertyValue;
use propline_core::ProcessorDirective;
use propline_core::ResolutionError;
use propline_core::TypeDescriptor;
use tempfile::NamedTempFile;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

type TestResult = Result<(), String>;

/// Asserts that a load failed with a message containing `needle`.
fn assert_invalid(result: Result<PropLineConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

/// Builds a property method descriptor.
fn property(name: &str, return_type: TypeDescriptor) -> MethodDescriptor {
    MethodDescriptor::property(name, PropertyName::new(name).unwrap(), return_type)
}

// ============================================================================
// SECTION: Load Guards
// ============================================================================

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    assert_invalid(
        PropLineConfig::load(Some(Path::new(&long_path))),
        "config path exceeds max length",
    )
}

#[test]
fn load_rejects_missing_file() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    assert_invalid(PropLineConfig::load(Some(&dir.path().join("absent.toml"))), "config io error")
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'#'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(PropLineConfig::load(Some(file.path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(PropLineConfig::load(Some(file.path())), "config file must be utf-8")
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    assert_invalid(PropLineConfig::from_toml_str("[expansion\n"), "config parse error")
}

#[test]
fn load_rejects_unknown_sections() -> TestResult {
    assert_invalid(PropLineConfig::from_toml_str("[server]\nport = 1\n"), "config parse error")
}

#[test]
fn load_rejects_empty_delimiter() -> TestResult {
    assert_invalid(
        PropLineConfig::from_toml_str("[conversion]\ndefault_delimiter = \"\"\n"),
        "default_delimiter must be non-empty",
    )
}

#[test]
fn load_rejects_empty_expansion_syntax() -> TestResult {
    assert_invalid(
        PropLineConfig::from_toml_str("[expansion]\nprefix = \"\"\n"),
        "expansion.prefix and expansion.suffix must be non-empty",
    )
}

#[test]
fn load_rejects_entries_without_type() -> TestResult {
    assert_invalid(
        PropLineConfig::from_toml_str("[[resolvers]]\nvalues = {}\n"),
        "config parse error",
    )
}

#[test]
fn load_rejects_too_many_resolvers() -> TestResult {
    let content = "[[resolvers]]\ntype = \"map\"\n".repeat(65);
    assert_invalid(PropLineConfig::from_toml_str(&content), "too many resolvers")
}

// ============================================================================
// SECTION: Engine Construction
// ============================================================================

#[test]
fn empty_file_builds_the_default_engine() {
    let config = PropLineConfig::from_toml_str("").unwrap();
    assert!(config.resolvers.is_empty());
    let engine = config.build_engine().unwrap();
    let err = engine.invoke(&property("app.name", TypeDescriptor::String), &Arguments::none());
    assert!(matches!(err, Err(ResolutionError::UnresolvedProperty { .. })));
}

#[test]
fn canonical_example_loads_and_resolves() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("propline.toml");
    fs::write(&path, config_toml_example()).unwrap();
    let config = PropLineConfig::load(Some(&path)).unwrap();
    assert_eq!(config.resolvers.len(), 3);
    let engine = config.build_engine().unwrap();
    let url = engine.invoke(&property("app.url", TypeDescriptor::String), &Arguments::none());
    assert_eq!(url.unwrap(), PropertyValue::String("https://localhost:8080".to_string()));
}

#[test]
fn configured_chain_and_syntax_drive_the_engine() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("app.yaml");
    fs::write(&data, "app:\n  ports: \"80;443\"\n  secret: aGVsbG8=\n").unwrap();
    let content = format!(
        r#"
[expansion]
prefix = "%{{"
suffix = "}}"

[conversion]
default_delimiter = ";"

[[resolvers]]
type = "map"
values = {{ "app.greeting" = "%{{app.secret}}" }}

[[resolvers]]
type = "resource"
path = {path:?}
"#,
        path = data.display().to_string(),
    );
    let engine = PropLineConfig::from_toml_str(&content).unwrap().build_engine().unwrap();

    let ports_method = property("app.ports", TypeDescriptor::list(TypeDescriptor::U16));
    let ports = engine.invoke(&ports_method, &Arguments::none()).unwrap();
    assert_eq!(ports, PropertyValue::List(vec![PropertyValue::U16(80), PropertyValue::U16(443)]));

    let greeting = property("app.greeting", TypeDescriptor::String)
        .with_processor(ProcessorDirective::new("base64-decode"));
    let value = engine.invoke(&greeting, &Arguments::none()).unwrap();
    assert_eq!(value, PropertyValue::String("hello".to_string()));
}

#[test]
fn disabled_builtins_reject_processor_directives() {
    let config = PropLineConfig::from_toml_str(
        "[processors]\nbuiltin = false\n[[resolvers]]\ntype = \"map\"\nvalues = { a = \"aGk=\" }\n",
    )
    .unwrap();
    let engine = config.build_engine().unwrap();
    let method = property("a", TypeDescriptor::String)
        .with_processor(ProcessorDirective::new("base64-decode"));
    let err = engine.invoke(&method, &Arguments::none()).unwrap_err();
    assert!(matches!(err, ResolutionError::UnknownProcessor { .. }));
}

#[test]
fn unknown_resolver_types_fail_the_build() {
    let config = PropLineConfig::from_toml_str("[[resolvers]]\ntype = \"vault\"\n").unwrap();
    let err = config.build_engine().unwrap_err();
    assert!(matches!(err, ConfigError::Resolver { index: 0, .. }));
    assert!(err.to_string().contains("unknown resolver type: vault"));
}

#[test]
fn invalid_resolver_settings_fail_the_build() {
    let config =
        PropLineConfig::from_toml_str("[[resolvers]]\ntype = \"env\"\nallow = [\"X\"]\n").unwrap();
    assert!(matches!(config.build_engine().unwrap_err(), ConfigError::Resolver { index: 0, .. }));
}

#[test]
fn disabled_expansion_keeps_placeholders() {
    let config = PropLineConfig::from_toml_str(
        "[expansion]\nenabled = false\n[[resolvers]]\ntype = \"map\"\nvalues = { a = \"${b}\", b = \"x\" }\n",
    )
    .unwrap();
    let engine = config.build_engine().unwrap();
    let value = engine.invoke(&property("a", TypeDescriptor::String), &Arguments::none()).unwrap();
    assert_eq!(value, PropertyValue::String("${b}".to_string()));
}
