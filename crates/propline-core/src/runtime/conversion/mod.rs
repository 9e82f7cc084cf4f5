// crates/propline-core/src/runtime/conversion/mod.rs
// ============================================================================
// Module: Propline Converter Registry
// Description: Ordered, capability-checked dispatch over converters.
// Purpose: Turn raw strings into typed values for any declared return type.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`ConverterRegistry`] holds an ordered list of converters. For a target
//! type it asks each converter in registration order whether it accepts the
//! type; the first one that accepts and does not skip wins. Sequence and
//! optional converters recurse into the registry with the element type.
//! Invariants:
//! - First registered, first matched; overrides go before the built-ins.
//! - Nested conversions only recurse into strictly smaller descriptors, so
//!   dispatch always terminates, falling through to
//!   [`ConversionError::Unsupported`].
//! - A produced value always conforms to the requested descriptor.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod enumeration;
pub mod identity;
pub mod optional;
pub mod primitive;
pub mod sequence;
pub mod temporal;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use tracing::trace;

use crate::core::types::TypeDescriptor;
use crate::core::value::PropertyValue;
use crate::interfaces::ConversionError;
use crate::interfaces::ConversionResult;
use crate::interfaces::Converter;
use crate::runtime::context::InvocationContext;

pub use enumeration::EnumConverter;
pub use identity::PathConverter;
pub use identity::RegexConverter;
pub use identity::StringConverter;
pub use identity::UuidConverter;
pub use optional::OptionalConverter;
pub use primitive::PrimitiveConverter;
pub use sequence::SequenceConverter;
pub use temporal::DateTimeConverter;
pub use temporal::DurationConverter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default delimiter used by sequence conversion.
pub const DEFAULT_DELIMITER: &str = ",";

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Ordered list of converters consulted for every conversion.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    /// Converters in dispatch order.
    converters: Vec<Arc<dyn Converter>>,
}

impl ConverterRegistry {
    /// Creates a registry that dispatches over `converters` in order.
    #[must_use]
    pub const fn new(converters: Vec<Arc<dyn Converter>>) -> Self {
        Self {
            converters,
        }
    }

    /// Creates a registry holding only the built-in converters.
    #[must_use]
    pub fn with_defaults(default_delimiter: &str) -> Self {
        Self::new(default_converters(default_delimiter))
    }

    /// Returns the number of registered converters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Returns true when no converter is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Converts `value` to `target` using the first accepting converter.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::Unsupported`] when every converter declines,
    /// [`ConversionError::Malformed`] when the winning converter rejects the
    /// text, and [`ConversionError::KindMismatch`] when a converter produces a
    /// value that does not match `target`.
    pub fn convert(
        &self,
        ctx: &InvocationContext<'_>,
        value: &str,
        target: &TypeDescriptor,
    ) -> Result<PropertyValue, ConversionError> {
        for (index, converter) in self.converters.iter().enumerate() {
            if !converter.can_convert_to(target) {
                continue;
            }
            match converter.convert(ctx, value, target)? {
                ConversionResult::Converted(converted) => {
                    if !converted.conforms_to(target) {
                        return Err(ConversionError::KindMismatch {
                            target: target.to_string(),
                            actual: converted.type_name(),
                        });
                    }
                    trace!(target = %target, converter = index, "converted value");
                    return Ok(converted);
                }
                ConversionResult::Skip => {}
            }
        }
        Err(ConversionError::unsupported(target))
    }
}

/// Returns the built-in converters in their default dispatch order.
#[must_use]
pub fn default_converters(default_delimiter: &str) -> Vec<Arc<dyn Converter>> {
    vec![
        Arc::new(PrimitiveConverter),
        Arc::new(UuidConverter),
        Arc::new(PathConverter),
        Arc::new(EnumConverter),
        Arc::new(SequenceConverter::new(default_delimiter)),
        Arc::new(OptionalConverter),
        Arc::new(DateTimeConverter),
        Arc::new(DurationConverter),
        Arc::new(RegexConverter),
        Arc::new(StringConverter),
    ]
}
