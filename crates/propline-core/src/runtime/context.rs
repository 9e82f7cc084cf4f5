// crates/propline-core/src/runtime/context.rs
// ============================================================================
// Module: Propline Invocation Context
// Description: Per-call bundle of method metadata, arguments, and engine handle.
// Purpose: Let every stage read metadata and re-enter the engine.
// Dependencies: crate::core, crate::runtime::engine
// ============================================================================

//! ## Overview
//! An [`InvocationContext`] is created for each invocation and dropped when it
//! returns. It borrows the method descriptor and arguments and holds a
//! non-owning reference to the [`Engine`], so resolvers, processors, and
//! converters can trigger sub-resolutions or nested conversions.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::error::ResolutionError;
use crate::core::method::Arguments;
use crate::core::method::MethodDescriptor;
use crate::core::types::TypeDescriptor;
use crate::core::value::PropertyValue;
use crate::interfaces::ConversionError;
use crate::interfaces::Resolver;
use crate::runtime::engine::Engine;

// ============================================================================
// SECTION: Invocation Context
// ============================================================================

/// Per-call view of the engine.
#[derive(Clone, Copy)]
pub struct InvocationContext<'a> {
    /// Engine serving the call.
    engine: &'a Engine,
    /// Method being invoked.
    method: &'a MethodDescriptor,
    /// Call arguments.
    arguments: &'a Arguments,
}

impl<'a> InvocationContext<'a> {
    /// Creates a context for one invocation.
    #[must_use]
    pub const fn new(
        engine: &'a Engine,
        method: &'a MethodDescriptor,
        arguments: &'a Arguments,
    ) -> Self {
        Self {
            engine,
            method,
            arguments,
        }
    }

    /// Returns the engine serving the call.
    #[must_use]
    pub const fn engine(&self) -> &'a Engine {
        self.engine
    }

    /// Returns the invoked method descriptor.
    #[must_use]
    pub const fn method(&self) -> &'a MethodDescriptor {
        self.method
    }

    /// Returns the call arguments.
    #[must_use]
    pub const fn arguments(&self) -> &'a Arguments {
        self.arguments
    }

    /// Looks up `name` through the resolver chain without further stages.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::ResolutionFailure`] when a resolver fails.
    pub fn resolve_raw(&self, name: &str) -> Result<Option<String>, ResolutionError> {
        self.engine.resolver().resolve(self, name).map_err(|source| {
            ResolutionError::ResolutionFailure {
                property: name.to_string(),
                source,
            }
        })
    }

    /// Expands placeholders in `value` with the engine's expander.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when expansion fails.
    pub fn expand(&self, value: &str) -> Result<String, ResolutionError> {
        self.engine.expander().expand(self, value)
    }

    /// Converts `value` to `target` through the converter registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] when no converter accepts the target or the
    /// text is malformed.
    pub fn convert(
        &self,
        value: &str,
        target: &TypeDescriptor,
    ) -> Result<PropertyValue, ConversionError> {
        self.engine.converters().convert(self, value, target)
    }
}
