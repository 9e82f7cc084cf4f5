// crates/propline-core/src/runtime/conversion/identity.rs
// ============================================================================
// Module: Identity Converters
// Description: UUID, path, regex, and string passthrough conversion.
// Purpose: Convert values whose textual form is the value itself.
// Dependencies: regex, uuid
// ============================================================================

//! ## Overview
//! These converters build a value directly from its text: UUIDs in canonical
//! form, filesystem paths verbatim (no existence check), compiled regular
//! expressions, and the raw string itself. [`StringConverter`] is registered
//! last so any earlier converter may claim string targets first.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use regex::Regex;
use uuid::Uuid;

use crate::core::types::TypeDescriptor;
use crate::core::value::PropertyValue;
use crate::interfaces::ConversionError;
use crate::interfaces::ConversionResult;
use crate::interfaces::Converter;
use crate::runtime::context::InvocationContext;

// ============================================================================
// SECTION: UUID
// ============================================================================

/// Converter for canonical textual UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidConverter;

impl Converter for UuidConverter {
    fn can_convert_to(&self, target: &TypeDescriptor) -> bool {
        matches!(target, TypeDescriptor::Uuid)
    }

    fn convert(
        &self,
        _ctx: &InvocationContext<'_>,
        value: &str,
        target: &TypeDescriptor,
    ) -> Result<ConversionResult, ConversionError> {
        Uuid::parse_str(value)
            .map(|uuid| ConversionResult::Converted(PropertyValue::Uuid(uuid)))
            .map_err(|err| ConversionError::malformed_with_source(target, value, err))
    }
}

// ============================================================================
// SECTION: Path
// ============================================================================

/// Converter for filesystem paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathConverter;

impl Converter for PathConverter {
    fn can_convert_to(&self, target: &TypeDescriptor) -> bool {
        matches!(target, TypeDescriptor::Path)
    }

    fn convert(
        &self,
        _ctx: &InvocationContext<'_>,
        value: &str,
        target: &TypeDescriptor,
    ) -> Result<ConversionResult, ConversionError> {
        if value.is_empty() {
            return Err(ConversionError::malformed(target, value, "path must not be empty"));
        }
        Ok(ConversionResult::Converted(PropertyValue::Path(PathBuf::from(value))))
    }
}

// ============================================================================
// SECTION: Regex
// ============================================================================

/// Converter compiling regular expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexConverter;

impl Converter for RegexConverter {
    fn can_convert_to(&self, target: &TypeDescriptor) -> bool {
        matches!(target, TypeDescriptor::Regex)
    }

    fn convert(
        &self,
        _ctx: &InvocationContext<'_>,
        value: &str,
        target: &TypeDescriptor,
    ) -> Result<ConversionResult, ConversionError> {
        Regex::new(value)
            .map(|regex| ConversionResult::Converted(PropertyValue::Regex(regex)))
            .map_err(|err| ConversionError::malformed_with_source(target, value, err))
    }
}

// ============================================================================
// SECTION: String
// ============================================================================

/// Passthrough converter for string targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl Converter for StringConverter {
    fn can_convert_to(&self, target: &TypeDescriptor) -> bool {
        matches!(target, TypeDescriptor::String)
    }

    fn convert(
        &self,
        _ctx: &InvocationContext<'_>,
        value: &str,
        _target: &TypeDescriptor,
    ) -> Result<ConversionResult, ConversionError> {
        Ok(ConversionResult::Converted(PropertyValue::String(value.to_string())))
    }
}
