// crates/propline-core/src/runtime/conversion/enumeration.rs
// ============================================================================
// Module: Enumeration Converter
// Description: Exact-name conversion to declared enumeration constants.
// Purpose: Reject unknown constants with the valid set in the message.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Matching is exact and case-sensitive; `red` does not select `Red`.

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

/// Converter for declared enumerations.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumConverter;

impl Converter for EnumConverter {
    fn can_convert_to(&self, target: &TypeDescriptor) -> bool {
        matches!(target, TypeDescriptor::Enum(_))
    }

    fn convert(
        &self,
        _ctx: &InvocationContext<'_>,
        value: &str,
        target: &TypeDescriptor,
    ) -> Result<ConversionResult, ConversionError> {
        let TypeDescriptor::Enum(enum_type) = target else {
            return Ok(ConversionResult::Skip);
        };
        if enum_type.contains(value) {
            return Ok(ConversionResult::Converted(PropertyValue::Enum(value.to_string())));
        }
        Err(ConversionError::malformed(
            target,
            value,
            format!(
                "no constant of {} matches; expected one of [{}]",
                enum_type.name(),
                enum_type.variants().join(", ")
            ),
        ))
    }
}
