// crates/propline-core/src/core/error.rs
// ============================================================================
// Module: Propline Resolution Errors
// Description: Typed failures surfaced by the resolution pipeline.
// Purpose: Abort invocations with a precise error instead of a silent default.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`ResolutionError`] is the only error type returned to callers of the
//! engine. Lower-level failures (resolver I/O, processor errors, malformed
//! literals) are wrapped with their original cause attached.
//! Invariants:
//! - Not-found and lookup failure stay distinct: [`ResolutionError::UnresolvedProperty`]
//!   versus [`ResolutionError::ResolutionFailure`].
//! - Variants are stable for programmatic handling.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::interfaces::BoxError;
use crate::interfaces::ConversionError;
use crate::interfaces::ProcessorError;
use crate::interfaces::ResolverError;

// ============================================================================
// SECTION: Resolution Errors
// ============================================================================

/// Failure raised while serving one invocation.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// Resolver chain exhausted with no default or optional fallback.
    #[error("property '{property}' could not be resolved")]
    UnresolvedProperty {
        /// Property name that was looked up.
        property: String,
    },
    /// A resolver failed while looking up a property.
    #[error("resolver failed while looking up '{property}'")]
    ResolutionFailure {
        /// Property name that was looked up.
        property: String,
        /// Underlying resolver failure.
        #[source]
        source: ResolverError,
    },
    /// A `${name}` placeholder named an unknown property.
    #[error("variable '{variable}' in '{value}' could not be resolved")]
    UnresolvedVariable {
        /// Placeholder name.
        variable: String,
        /// Text being expanded.
        value: String,
    },
    /// A placeholder expanded back into itself.
    #[error("cyclic variable reference '{variable}': {chain}")]
    CyclicVariable {
        /// Placeholder name that closed the cycle.
        variable: String,
        /// Expansion chain, e.g. `a -> b -> a`.
        chain: String,
    },
    /// A method names a processor that is not registered.
    #[error("method '{method}' requires unknown processor '{processor}'")]
    UnknownProcessor {
        /// Requested processor name.
        processor: String,
        /// Method declaring the directive.
        method: String,
    },
    /// A processor rejected or failed on its input.
    #[error("processor '{processor}' failed")]
    ProcessingFailure {
        /// Processor name.
        processor: String,
        /// Underlying processor failure.
        #[source]
        source: ProcessorError,
    },
    /// No converter accepts the target type.
    #[error("no converter supports target type '{target}'")]
    UnsupportedConversion {
        /// Target type descriptor text.
        target: String,
    },
    /// A converter accepted the target type but the text was malformed.
    #[error("cannot convert '{value}' to {target}: {reason}")]
    ConversionFailure {
        /// Target type descriptor text.
        target: String,
        /// Offending text.
        value: String,
        /// Human-readable reason.
        reason: String,
        /// Underlying parse error, when available.
        #[source]
        source: Option<BoxError>,
    },
    /// Arguments do not match the method declaration.
    #[error("invalid invocation of '{method}': {reason}")]
    InvalidInvocation {
        /// Method name.
        method: String,
        /// Human-readable reason.
        reason: String,
    },
    /// A typed accessor asked for a type the method does not declare.
    #[error("method '{method}' returns {declared}, not {requested}")]
    ReturnTypeMismatch {
        /// Method name.
        method: String,
        /// Declared return type.
        declared: String,
        /// Requested type.
        requested: String,
    },
}

impl ResolutionError {
    /// Builds an unresolved property error.
    #[must_use]
    pub fn unresolved(property: impl Into<String>) -> Self {
        Self::UnresolvedProperty {
            property: property.into(),
        }
    }

    /// Builds an invalid invocation error.
    #[must_use]
    pub fn invalid_invocation(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInvocation {
            method: method.into(),
            reason: reason.into(),
        }
    }
}

impl From<ConversionError> for ResolutionError {
    fn from(error: ConversionError) -> Self {
        match error {
            ConversionError::Unsupported {
                target,
            } => Self::UnsupportedConversion {
                target,
            },
            ConversionError::Malformed {
                target,
                value,
                reason,
                source,
            } => Self::ConversionFailure {
                target,
                value,
                reason,
                source,
            },
            ConversionError::KindMismatch {
                target,
                actual,
            } => Self::ConversionFailure {
                target,
                value: actual.to_string(),
                reason: "converter produced a value of the wrong kind".to_string(),
                source: None,
            },
        }
    }
}
