// crates/propline-core/src/runtime/conversion/primitive.rs
// ============================================================================
// Module: Primitive Converter
// Description: Boolean, character, integer, and float conversion.
// Purpose: Parse scalar literals with the standard library parsers.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Scalars are parsed with [`str::parse`]; malformed text is a conversion
//! error carrying the parser's message, never a panic. Input is not trimmed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::str::FromStr;

use crate::core::types::TypeDescriptor;
use crate::core::value::PropertyValue;
use crate::interfaces::ConversionError;
use crate::interfaces::ConversionResult;
use crate::interfaces::Converter;
use crate::runtime::context::InvocationContext;

// ============================================================================
// SECTION: Converter
// ============================================================================

/// Converter for booleans, characters, integers, and floats.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveConverter;

/// Parses `value` with `T::from_str`, wrapping the result with `wrap`.
fn parse_with<T>(
    value: &str,
    target: &TypeDescriptor,
    wrap: fn(T) -> PropertyValue,
) -> Result<ConversionResult, ConversionError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse::<T>()
        .map(|parsed| ConversionResult::Converted(wrap(parsed)))
        .map_err(|err| ConversionError::malformed_with_source(target, value, err))
}

impl Converter for PrimitiveConverter {
    fn can_convert_to(&self, target: &TypeDescriptor) -> bool {
        matches!(
            target,
            TypeDescriptor::Bool
                | TypeDescriptor::Char
                | TypeDescriptor::I8
                | TypeDescriptor::I16
                | TypeDescriptor::I32
                | TypeDescriptor::I64
                | TypeDescriptor::I128
                | TypeDescriptor::Isize
                | TypeDescriptor::U8
                | TypeDescriptor::U16
                | TypeDescriptor::U32
                | TypeDescriptor::U64
                | TypeDescriptor::U128
                | TypeDescriptor::Usize
                | TypeDescriptor::F32
                | TypeDescriptor::F64
        )
    }

    fn convert(
        &self,
        _ctx: &InvocationContext<'_>,
        value: &str,
        target: &TypeDescriptor,
    ) -> Result<ConversionResult, ConversionError> {
        match target {
            TypeDescriptor::Bool => parse_with(value, target, PropertyValue::Bool),
            TypeDescriptor::Char => parse_with(value, target, PropertyValue::Char),
            TypeDescriptor::I8 => parse_with(value, target, PropertyValue::I8),
            TypeDescriptor::I16 => parse_with(value, target, PropertyValue::I16),
            TypeDescriptor::I32 => parse_with(value, target, PropertyValue::I32),
            TypeDescriptor::I64 => parse_with(value, target, PropertyValue::I64),
            TypeDescriptor::I128 => parse_with(value, target, PropertyValue::I128),
            TypeDescriptor::Isize => parse_with(value, target, PropertyValue::Isize),
            TypeDescriptor::U8 => parse_with(value, target, PropertyValue::U8),
            TypeDescriptor::U16 => parse_with(value, target, PropertyValue::U16),
            TypeDescriptor::U32 => parse_with(value, target, PropertyValue::U32),
            TypeDescriptor::U64 => parse_with(value, target, PropertyValue::U64),
            TypeDescriptor::U128 => parse_with(value, target, PropertyValue::U128),
            TypeDescriptor::Usize => parse_with(value, target, PropertyValue::Usize),
            TypeDescriptor::F32 => parse_with(value, target, PropertyValue::F32),
            TypeDescriptor::F64 => parse_with(value, target, PropertyValue::F64),
            _ => Ok(ConversionResult::Skip),
        }
    }
}
