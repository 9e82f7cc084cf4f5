// crates/propline-resolvers/src/env.rs
// ============================================================================
// Module: Environment Resolver
// Description: Resolver for process environment variables.
// Purpose: Serve properties from environment state under explicit policy.
// Dependencies: propline-core, serde, tracing
// ============================================================================

//! ## Overview
//! The environment resolver looks a property up under its own name first and
//! then under its environment-style spelling (`app.db-url` -> `APP_DB_URL`).
//! Allowlist and denylist rules decide which keys may be read at all; a
//! blocked key is treated as absent so the rest of the chain still runs.
//! Values above the size limit are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::env::VarError;

use propline_core::InvocationContext;
use propline_core::Resolver;
use propline_core::ResolverError;
use serde::Deserialize;
use tracing::trace;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the environment resolver.
///
/// # Invariants
/// - `denylist` overrides `allowlist` when both are present.
/// - `max_value_bytes` and `max_key_bytes` are hard upper bounds.
/// - `overrides` replace process environment reads entirely when set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvResolverConfig {
    /// Optional allowlist of environment keys.
    pub allowlist: Option<BTreeSet<String>>,
    /// Explicit denylist of environment keys.
    pub denylist: BTreeSet<String>,
    /// Maximum bytes allowed for a single value.
    pub max_value_bytes: usize,
    /// Maximum bytes allowed for a single key.
    pub max_key_bytes: usize,
    /// Optional fixed environment used instead of the process environment.
    pub overrides: Option<BTreeMap<String, String>>,
}

impl Default for EnvResolverConfig {
    fn default() -> Self {
        Self {
            allowlist: None,
            denylist: BTreeSet::new(),
            max_value_bytes: 64 * 1024,
            max_key_bytes: 255,
            overrides: None,
        }
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolver for environment variables.
///
/// # Invariants
/// - Policy is applied to every candidate key before it is read.
/// - Keys above `max_key_bytes` are rejected, not skipped.
/// - A present variable with a non-UTF-8 value is rejected, not skipped.
#[derive(Debug, Clone, Default)]
pub struct EnvResolver {
    /// Policy, limits, and optional overrides.
    config: EnvResolverConfig,
}

impl EnvResolver {
    /// Creates an environment resolver.
    #[must_use]
    pub const fn new(config: EnvResolverConfig) -> Self {
        Self {
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &EnvResolverConfig {
        &self.config
    }

    /// Reads a single key from overrides or the process environment.
    ///
    /// A present variable that is not UTF-8 is rejected rather than skipped.
    fn read(&self, name: &str, key: &str) -> Result<Option<String>, ResolverError> {
        if let Some(overrides) = &self.config.overrides {
            return Ok(overrides.get(key).cloned());
        }
        match std::env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => {
                Err(ResolverError::rejected(name, format!("env value of {key} is not valid UTF-8")))
            }
        }
    }
}

impl Resolver for EnvResolver {
    fn resolve(
        &self,
        _ctx: &InvocationContext<'_>,
        name: &str,
    ) -> Result<Option<String>, ResolverError> {
        if name.len() > self.config.max_key_bytes {
            return Err(ResolverError::rejected(name, "env key exceeds limit"));
        }
        for key in candidate_keys(name) {
            if !is_key_allowed(&self.config, &key) {
                trace!(key = %key, "env key blocked by policy");
                continue;
            }
            if let Some(value) = self.read(name, &key)? {
                if value.len() > self.config.max_value_bytes {
                    return Err(ResolverError::rejected(name, "env value exceeds limit"));
                }
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the keys tried for `name`, in order and without duplicates.
fn candidate_keys(name: &str) -> Vec<String> {
    let mut keys = vec![name.to_string()];
    let env_style = to_env_style(name);
    if env_style != name {
        keys.push(env_style);
    }
    keys
}

/// Maps a property name to environment style: upper case with `.` and `-`
/// replaced by `_`.
#[must_use]
pub fn to_env_style(name: &str) -> String {
    name.chars()
        .map(|ch| match ch {
            '.' | '-' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// Validates the key against allowlist/denylist policy.
fn is_key_allowed(config: &EnvResolverConfig, key: &str) -> bool {
    if config.denylist.contains(key) {
        return false;
    }
    if let Some(allowlist) = &config.allowlist {
        return allowlist.contains(key);
    }
    true
}
