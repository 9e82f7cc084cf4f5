// crates/propline-core/src/runtime/conversion/optional.rs
// ============================================================================
// Module: Optional Converter
// Description: Conversion to possibly absent values.
// Purpose: Map empty text to `None` and recurse for present text.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! An empty source becomes `Optional(None)`; anything else is converted to
//! the wrapped type through the registry.

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
// SECTION: Converter
// ============================================================================

/// Converter for optional targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalConverter;

impl Converter for OptionalConverter {
    fn can_convert_to(&self, target: &TypeDescriptor) -> bool {
        target.is_optional()
    }

    fn convert(
        &self,
        ctx: &InvocationContext<'_>,
        value: &str,
        target: &TypeDescriptor,
    ) -> Result<ConversionResult, ConversionError> {
        let TypeDescriptor::Optional(inner) = target else {
            return Ok(ConversionResult::Skip);
        };
        if value.is_empty() {
            return Ok(ConversionResult::Converted(PropertyValue::Optional(None)));
        }
        let converted = ctx.convert(value, inner)?;
        Ok(ConversionResult::Converted(PropertyValue::Optional(Some(Box::new(converted)))))
    }
}
