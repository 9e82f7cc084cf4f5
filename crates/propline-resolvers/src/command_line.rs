// crates/propline-resolvers/src/command_line.rs
// ============================================================================
// Module: Command-Line Resolver
// Description: Resolver for `-Dname=value` style definitions.
// Purpose: Let operators override properties at launch without files.
// Dependencies: propline-core, serde
// ============================================================================

//! ## Overview
//! Definitions are collected once, when the resolver is built. Accepted forms
//! are `-Dname=value`, `-D name=value`, `--define name=value`, and
//! `--define=name=value`; a definition without `=` defines an empty value.
//! Later definitions of the same name win. Other arguments are ignored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use propline_core::InvocationContext;
use propline_core::Resolver;
use propline_core::ResolverError;
use serde::Deserialize;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the command-line resolver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandLineResolverConfig {
    /// Extra `name=value` definitions applied after process arguments.
    pub definitions: Vec<String>,
    /// Whether to scan the process arguments.
    pub process_args: bool,
}

impl Default for CommandLineResolverConfig {
    fn default() -> Self {
        Self {
            definitions: Vec::new(),
            process_args: true,
        }
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolver over command-line definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLineResolver {
    /// Definitions keyed by property name.
    definitions: BTreeMap<String, String>,
}

impl CommandLineResolver {
    /// Collects definitions from an argument list.
    #[must_use]
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut definitions = BTreeMap::new();
        let mut pending = false;
        for arg in args {
            let arg = arg.as_ref();
            if pending {
                pending = false;
                insert_definition(&mut definitions, arg);
                continue;
            }
            if arg == "-D" || arg == "--define" {
                pending = true;
            } else if let Some(definition) = arg.strip_prefix("--define=") {
                insert_definition(&mut definitions, definition);
            } else if let Some(definition) = arg.strip_prefix("-D") {
                insert_definition(&mut definitions, definition);
            }
        }
        Self {
            definitions,
        }
    }

    /// Collects bare `name=value` definitions.
    #[must_use]
    pub fn from_definitions<I, S>(definitions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for definition in definitions {
            insert_definition(&mut map, definition.as_ref());
        }
        Self {
            definitions: map,
        }
    }

    /// Builds a resolver from configuration.
    #[must_use]
    pub fn from_config(config: &CommandLineResolverConfig) -> Self {
        let mut resolver = if config.process_args {
            Self::from_args(std::env::args().skip(1))
        } else {
            Self::default()
        };
        for definition in &config.definitions {
            insert_definition(&mut resolver.definitions, definition);
        }
        resolver
    }

    /// Returns the collected definitions.
    #[must_use]
    pub const fn definitions(&self) -> &BTreeMap<String, String> {
        &self.definitions
    }
}

impl Resolver for CommandLineResolver {
    fn resolve(
        &self,
        _ctx: &InvocationContext<'_>,
        name: &str,
    ) -> Result<Option<String>, ResolverError> {
        Ok(self.definitions.get(name).cloned())
    }
}

/// Parses `name=value` (or bare `name`) into the map; empty names are ignored.
fn insert_definition(definitions: &mut BTreeMap<String, String>, definition: &str) {
    let (name, value) = definition.split_once('=').unwrap_or((definition, ""));
    if name.is_empty() {
        return;
    }
    definitions.insert(name.to_string(), value.to_string());
}
