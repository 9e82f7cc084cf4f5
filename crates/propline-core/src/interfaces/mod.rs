// crates/propline-core/src/interfaces/mod.rs
// ============================================================================
// Module: Propline Interfaces
// Description: Backend-agnostic contracts for resolvers, processors, and converters.
// Purpose: Define the seams the resolution pipeline is composed from.
// Dependencies: crate::core, crate::runtime
// ============================================================================

//! ## Overview
//! Interfaces describe how the pipeline integrates with value sources and
//! transformers without embedding backend details. Every stage receives the
//! [`InvocationContext`] of the call so it can read method metadata or
//! re-enter the engine for sub-resolutions and sub-conversions.
//! Implementations must be `Send + Sync`; engines are shared across threads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::error::Error as StdError;
use std::io;

use thiserror::Error;

use crate::core::error::ResolutionError;
use crate::core::method::ProcessorDirective;
use crate::core::types::TypeDescriptor;
use crate::core::value::PropertyValue;
use crate::runtime::CompositeResolver;
use crate::runtime::InvocationContext;

/// Boxed error used to preserve lower-level causes.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

// ============================================================================
// SECTION: Resolvers
// ============================================================================

/// Resolver failures. "Not found" is never an error; it is `Ok(None)`.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// Local I/O failed while reading a source.
    #[error("resolver io error: {context}")]
    Io {
        /// What was being read.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A backend (database, network, parser) failed.
    #[error("resolver backend error: {message}")]
    Backend {
        /// Human-readable description.
        message: String,
        /// Underlying cause, when available.
        #[source]
        source: Option<BoxError>,
    },
    /// The resolver refused to serve the property.
    #[error("resolver rejected '{property}': {reason}")]
    Rejected {
        /// Property name.
        property: String,
        /// Human-readable reason.
        reason: String,
    },
}

impl ResolverError {
    /// Builds an I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Builds a backend error without an underlying cause.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Builds a backend error carrying its cause.
    #[must_use]
    pub fn backend_with_source(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Backend {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Builds a rejection error.
    #[must_use]
    pub fn rejected(property: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            property: property.into(),
            reason: reason.into(),
        }
    }
}

/// Source capable of mapping a property name to a raw string value.
pub trait Resolver: Send + Sync {
    /// Looks up `name`.
    ///
    /// Returns `Ok(None)` when the source does not know the property. An
    /// empty string is a present value.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError`] when the lookup itself fails.
    fn resolve(
        &self,
        ctx: &InvocationContext<'_>,
        name: &str,
    ) -> Result<Option<String>, ResolverError>;

    /// Returns the composite view of this resolver, if it is one.
    ///
    /// Composites override this so nested chains can be flattened.
    fn as_composite(&self) -> Option<&CompositeResolver> {
        None
    }
}

// ============================================================================
// SECTION: Processors
// ============================================================================

/// Processor failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// The input was not acceptable, e.g. malformed ciphertext.
    #[error("invalid processor input: {message}")]
    InvalidInput {
        /// Human-readable description.
        message: String,
        /// Underlying decoding or parsing error, when available.
        #[source]
        source: Option<BoxError>,
    },
    /// The processor or its directive is misconfigured.
    #[error("processor configuration error: {0}")]
    Configuration(String),
    /// The processor failed for another reason.
    #[error("processing failed: {message}")]
    Failed {
        /// Human-readable description.
        message: String,
        /// Underlying cause, when available.
        #[source]
        source: Option<BoxError>,
    },
}

impl ProcessorError {
    /// Builds an input error without an underlying cause.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an input error carrying its cause.
    #[must_use]
    pub fn invalid_input_with_source(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::InvalidInput {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Transformer applied to an already resolved and expanded value.
pub trait Processor: Send + Sync {
    /// Transforms `value` according to `directive`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError`] when the value cannot be processed.
    fn process(
        &self,
        ctx: &InvocationContext<'_>,
        directive: &ProcessorDirective,
        value: &str,
    ) -> Result<String, ProcessorError>;
}

// ============================================================================
// SECTION: Converters
// ============================================================================

/// Converter failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// No converter accepts the target type.
    #[error("no converter supports target type '{target}'")]
    Unsupported {
        /// Target type descriptor text.
        target: String,
    },
    /// The converter accepted the type but the text was malformed.
    #[error("cannot convert '{value}' to {target}: {reason}")]
    Malformed {
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
    /// A converter returned a value that does not conform to the target.
    #[error("converter for {target} produced a {actual} value")]
    KindMismatch {
        /// Target type descriptor text.
        target: String,
        /// Kind of the produced value.
        actual: &'static str,
    },
}

impl ConversionError {
    /// Builds an unsupported-target error.
    #[must_use]
    pub fn unsupported(target: &TypeDescriptor) -> Self {
        Self::Unsupported {
            target: target.to_string(),
        }
    }

    /// Builds a malformed-input error without an underlying cause.
    #[must_use]
    pub fn malformed(target: &TypeDescriptor, value: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            target: target.to_string(),
            value: value.to_string(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Builds a malformed-input error carrying the parse error.
    #[must_use]
    pub fn malformed_with_source<E>(target: &TypeDescriptor, value: &str, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Malformed {
            target: target.to_string(),
            value: value.to_string(),
            reason: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

/// Outcome of a single converter attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    /// The converter produced a value.
    Converted(PropertyValue),
    /// The converter declines; the registry tries the next one.
    Skip,
}

/// Transformer from a raw string to a typed value.
pub trait Converter: Send + Sync {
    /// Returns true when this converter may handle `target`.
    fn can_convert_to(&self, target: &TypeDescriptor) -> bool;

    /// Converts `value` to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] when the text is malformed for the target.
    fn convert(
        &self,
        ctx: &InvocationContext<'_>,
        value: &str,
        target: &TypeDescriptor,
    ) -> Result<ConversionResult, ConversionError>;
}

// ============================================================================
// SECTION: Variable Expansion
// ============================================================================

/// Substitutes placeholders in a resolved value.
pub trait VariableExpander: Send + Sync {
    /// Expands `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] for unresolved or cyclic variables and for
    /// resolver failures hit while resolving a placeholder.
    fn expand(&self, ctx: &InvocationContext<'_>, value: &str) -> Result<String, ResolutionError>;
}
