// crates/propline-core/src/core/identifiers.rs
// ============================================================================
// Module: Propline Identifiers
// Description: Strongly typed names for properties and processors.
// Purpose: Enforce naming invariants at construction boundaries.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Property names are validated once when a method descriptor is declared, so
//! the pipeline never sees an empty name. Processor names are opaque keys into
//! the processor registry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

// ============================================================================
// SECTION: Property Names
// ============================================================================

/// Error returned when a property name violates its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("property name must not be empty")]
pub struct InvalidPropertyName;

/// Logical configuration key attached to a method descriptor.
///
/// # Invariants
/// - Never empty.
/// - Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyName(String);

impl PropertyName {
    /// Creates a property name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPropertyName`] when `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidPropertyName> {
        let name = name.into();
        if name.is_empty() {
            return Err(InvalidPropertyName);
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<&str> for PropertyName {
    type Error = InvalidPropertyName;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for PropertyName {
    type Error = InvalidPropertyName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Processor Names
// ============================================================================

/// Registry key selecting a processor implementation.
///
/// # Invariants
/// - Opaque UTF-8 string; matched exactly against registered names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessorName(String);

impl ProcessorName {
    /// Creates a processor name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcessorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ProcessorName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProcessorName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
