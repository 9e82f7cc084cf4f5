// crates/propline-core/src/runtime/expansion.rs
// ============================================================================
// Module: Propline Variable Expansion
// Description: Recursive `${name}` placeholder substitution.
// Purpose: Compose property values from other properties.
// Dependencies: crate::core, crate::interfaces, regex, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`SimpleVariableExpander`] scans a value for `prefix name suffix`
//! placeholders, resolves each name through the resolver chain (never through
//! itself), expands the replacement recursively, and splices it in.
//! [`PatternVariableExpander`] does the same for every match of a regular
//! expression, taking the variable name from the first capture group.
//! Invariants:
//! - Text without the prefix is returned unchanged.
//! - Unterminated (`${abc`) and empty (`${}`) placeholders pass through verbatim.
//! - A name already being expanded on the current stack is a
//!   [`ResolutionError::CyclicVariable`], never an infinite loop.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;
use thiserror::Error;
use tracing::trace;

use crate::core::error::ResolutionError;
use crate::interfaces::VariableExpander;
use crate::runtime::context::InvocationContext;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default placeholder prefix.
pub const DEFAULT_VARIABLE_PREFIX: &str = "${";

/// Default placeholder suffix.
pub const DEFAULT_VARIABLE_SUFFIX: &str = "}";

/// Default pattern of [`PatternVariableExpander`], matching `${name}`.
pub const DEFAULT_VARIABLE_PATTERN: &str = r"\$\{(.+?)\}";

// ============================================================================
// SECTION: Substitution
// ============================================================================

/// Resolves `name` and expands its raw value with `expand`.
///
/// `stack` holds the names currently being expanded; `value` is the text the
/// placeholder appeared in, reported when the name is unknown.
fn substitute_variable<F>(
    ctx: &InvocationContext<'_>,
    value: &str,
    name: &str,
    stack: &mut Vec<String>,
    expand: F,
) -> Result<String, ResolutionError>
where
    F: FnOnce(&str, &mut Vec<String>) -> Result<String, ResolutionError>,
{
    if stack.iter().any(|active| active == name) {
        let mut chain = stack.join(" -> ");
        chain.push_str(" -> ");
        chain.push_str(name);
        return Err(ResolutionError::CyclicVariable {
            variable: name.to_string(),
            chain,
        });
    }
    let Some(raw) = ctx.resolve_raw(name)? else {
        return Err(ResolutionError::UnresolvedVariable {
            variable: name.to_string(),
            value: value.to_string(),
        });
    };
    trace!(variable = name, depth = stack.len(), "expanding variable");
    stack.push(name.to_string());
    let expanded = expand(&raw, stack);
    stack.pop();
    expanded
}

// ============================================================================
// SECTION: Simple Expander
// ============================================================================

/// Placeholder expander resolving names through the engine's resolver chain.
///
/// # Invariants
/// - `prefix` and `suffix` are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleVariableExpander {
    /// Placeholder opening token.
    prefix: String,
    /// Placeholder closing token.
    suffix: String,
}

impl SimpleVariableExpander {
    /// Creates an expander with custom placeholder tokens.
    ///
    /// Returns `None` when either token is empty.
    #[must_use]
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Option<Self> {
        let prefix = prefix.into();
        let suffix = suffix.into();
        if prefix.is_empty() || suffix.is_empty() {
            return None;
        }
        Some(Self {
            prefix,
            suffix,
        })
    }

    /// Returns the placeholder prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the placeholder suffix.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Expands `value` with `stack` holding the names currently being expanded.
    fn expand_nested(
        &self,
        ctx: &InvocationContext<'_>,
        value: &str,
        stack: &mut Vec<String>,
    ) -> Result<String, ResolutionError> {
        if !value.contains(self.prefix.as_str()) {
            return Ok(value.to_string());
        }
        let mut output = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(start) = rest.find(self.prefix.as_str()) {
            output.push_str(&rest[.. start]);
            let after_prefix = &rest[start + self.prefix.len() ..];
            let Some(end) = after_prefix.find(self.suffix.as_str()) else {
                output.push_str(&rest[start ..]);
                return Ok(output);
            };
            let name = &after_prefix[.. end];
            rest = &after_prefix[end + self.suffix.len() ..];
            if name.is_empty() {
                output.push_str(&self.prefix);
                output.push_str(&self.suffix);
                continue;
            }
            output.push_str(&self.substitute(ctx, value, name, stack)?);
        }
        output.push_str(rest);
        Ok(output)
    }

    /// Resolves and expands a single placeholder name.
    fn substitute(
        &self,
        ctx: &InvocationContext<'_>,
        value: &str,
        name: &str,
        stack: &mut Vec<String>,
    ) -> Result<String, ResolutionError> {
        substitute_variable(ctx, value, name, stack, |raw, stack| {
            self.expand_nested(ctx, raw, stack)
        })
    }
}

impl Default for SimpleVariableExpander {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_VARIABLE_PREFIX.to_string(),
            suffix: DEFAULT_VARIABLE_SUFFIX.to_string(),
        }
    }
}

impl VariableExpander for SimpleVariableExpander {
    fn expand(&self, ctx: &InvocationContext<'_>, value: &str) -> Result<String, ResolutionError> {
        let mut stack = Vec::new();
        self.expand_nested(ctx, value, &mut stack)
    }
}

// ============================================================================
// SECTION: Pattern Expander
// ============================================================================

/// Errors raised while preparing a [`PatternVariableExpander`].
#[derive(Debug, Error)]
pub enum VariablePatternError {
    /// The pattern is not a valid regular expression.
    #[error("invalid variable pattern")]
    Regex(#[from] regex::Error),
    /// The pattern has no capture group to take the variable name from.
    #[error("variable pattern '{0}' has no capture group")]
    MissingCaptureGroup(String),
}

/// Placeholder expander driven by a regular expression.
///
/// # Invariants
/// - `pattern` has at least one capture group; group 1 is the variable name.
/// - Matches whose name group is absent or empty pass through verbatim.
#[derive(Debug, Clone)]
pub struct PatternVariableExpander {
    /// Placeholder pattern.
    pattern: Regex,
}

impl PatternVariableExpander {
    /// Creates an expander over `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`VariablePatternError::MissingCaptureGroup`] when `pattern`
    /// declares no capture group.
    pub fn new(pattern: Regex) -> Result<Self, VariablePatternError> {
        if pattern.captures_len() < 2 {
            return Err(VariablePatternError::MissingCaptureGroup(pattern.as_str().to_string()));
        }
        Ok(Self {
            pattern,
        })
    }

    /// Compiles `pattern` and creates an expander over it.
    ///
    /// # Errors
    ///
    /// Returns [`VariablePatternError`] when the pattern does not compile or
    /// has no capture group.
    pub fn parse(pattern: &str) -> Result<Self, VariablePatternError> {
        Self::new(Regex::new(pattern)?)
    }

    /// Creates an expander over [`DEFAULT_VARIABLE_PATTERN`].
    ///
    /// # Errors
    ///
    /// Returns [`VariablePatternError`] if the default pattern is rejected.
    pub fn with_default_pattern() -> Result<Self, VariablePatternError> {
        Self::parse(DEFAULT_VARIABLE_PATTERN)
    }

    /// Returns the placeholder pattern.
    #[must_use]
    pub const fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Expands `value` with `stack` holding the names currently being expanded.
    fn expand_nested(
        &self,
        ctx: &InvocationContext<'_>,
        value: &str,
        stack: &mut Vec<String>,
    ) -> Result<String, ResolutionError> {
        if !self.pattern.is_match(value) {
            return Ok(value.to_string());
        }
        let mut output = String::with_capacity(value.len());
        let mut last = 0;
        for captures in self.pattern.captures_iter(value) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            output.push_str(&value[last .. whole.start()]);
            last = whole.end();
            let name = captures.get(1).map(|group| group.as_str()).filter(|name| !name.is_empty());
            match name {
                Some(name) => {
                    let replacement = substitute_variable(ctx, value, name, stack, |raw, stack| {
                        self.expand_nested(ctx, raw, stack)
                    })?;
                    output.push_str(&replacement);
                }
                None => output.push_str(whole.as_str()),
            }
        }
        output.push_str(&value[last ..]);
        Ok(output)
    }
}

impl VariableExpander for PatternVariableExpander {
    fn expand(&self, ctx: &InvocationContext<'_>, value: &str) -> Result<String, ResolutionError> {
        let mut stack = Vec::new();
        self.expand_nested(ctx, value, &mut stack)
    }
}

// ============================================================================
// SECTION: No-Op Expander
// ============================================================================

/// Expander that returns every value unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpVariableExpander;

impl VariableExpander for NoOpVariableExpander {
    fn expand(&self, _ctx: &InvocationContext<'_>, value: &str) -> Result<String, ResolutionError> {
        Ok(value.to_string())
    }
}
