// crates/propline-core/src/runtime/conversion/sequence.rs
// ============================================================================
// Module: Sequence Converter
// Description: Delimited conversion to arrays, lists, and sets.
// Purpose: Split a value into tokens and convert each through the registry.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The delimiter comes from the invoked method's metadata when present, else
//! from the converter's configured default. It is always matched literally,
//! so `.` or `|` never act as pattern syntax.
//! Invariants:
//! - Empty input yields an empty sequence.
//! - Empty tokens are kept unless the method asks to strip them.
//! - The first element failure aborts the whole conversion.
//! - Sets keep first-occurrence order and drop later duplicates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::types::TypeDescriptor;
use crate::core::value::PropertyValue;
use crate::interfaces::ConversionError;
use crate::interfaces::ConversionResult;
use crate::interfaces::Converter;
use crate::runtime::context::InvocationContext;

// ============================================================================
// SECTION: Tokenization
// ============================================================================

/// Splits `value` on the literal `delimiter`.
///
/// An empty `value` yields no tokens. When `strip_empty` is set, empty tokens
/// are removed after splitting.
#[must_use]
pub fn tokenize<'v>(value: &'v str, delimiter: &str, strip_empty: bool) -> Vec<&'v str> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(delimiter).filter(|token| !(strip_empty && token.is_empty())).collect()
}

// ============================================================================
// SECTION: Converter
// ============================================================================

/// Converter for array, list, and set targets.
///
/// # Invariants
/// - `default_delimiter` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceConverter {
    /// Delimiter used when the method declares none.
    default_delimiter: String,
}

impl SequenceConverter {
    /// Creates a converter with `default_delimiter`.
    ///
    /// An empty delimiter falls back to [`super::DEFAULT_DELIMITER`].
    #[must_use]
    pub fn new(default_delimiter: &str) -> Self {
        let default_delimiter = if default_delimiter.is_empty() {
            super::DEFAULT_DELIMITER
        } else {
            default_delimiter
        };
        Self {
            default_delimiter: default_delimiter.to_string(),
        }
    }

    /// Returns the configured default delimiter.
    #[must_use]
    pub fn default_delimiter(&self) -> &str {
        &self.default_delimiter
    }
}

impl Default for SequenceConverter {
    fn default() -> Self {
        Self::new(super::DEFAULT_DELIMITER)
    }
}

impl Converter for SequenceConverter {
    fn can_convert_to(&self, target: &TypeDescriptor) -> bool {
        target.is_sequence()
    }

    fn convert(
        &self,
        ctx: &InvocationContext<'_>,
        value: &str,
        target: &TypeDescriptor,
    ) -> Result<ConversionResult, ConversionError> {
        let Some(element) = target.element_type() else {
            return Ok(ConversionResult::Skip);
        };
        let method = ctx.method();
        let delimiter = method.delimiter().filter(|delimiter| !delimiter.is_empty());
        let delimiter = delimiter.unwrap_or(self.default_delimiter.as_str());
        let tokens = tokenize(value, delimiter, method.metadata.strip_empty_values);
        let mut items = Vec::with_capacity(tokens.len());
        for token in tokens {
            let item = ctx.convert(token, element)?;
            if matches!(target, TypeDescriptor::Set(_)) && items.contains(&item) {
                continue;
            }
            items.push(item);
        }
        let converted = match target {
            TypeDescriptor::Array(_) => PropertyValue::Array(items),
            TypeDescriptor::Set(_) => PropertyValue::Set(items),
            _ => PropertyValue::List(items),
        };
        Ok(ConversionResult::Converted(converted))
    }
}
