// crates/propline-core/src/runtime/processing.rs
// ============================================================================
// Module: Propline Processing Chain
// Description: Named processor registry and the root dispatch stage.
// Purpose: Apply the processors a method declares, failing fast on unknown names.
// Dependencies: crate::core, crate::interfaces, tracing
// ============================================================================

//! ## Overview
//! Processors are registered under a [`ProcessorName`]. [`RootProcessor`]
//! looks up each directive on the invoked method and applies the processors
//! in declaration order. A method without directives passes its value through
//! unchanged.
//! Invariants:
//! - Every directive is checked against the registry before any processor
//!   runs, so an unknown name fails even when the value would process fine.
//! - Processor names are unique within a registry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::core::error::ResolutionError;
use crate::core::identifiers::ProcessorName;
use crate::interfaces::Processor;
use crate::runtime::context::InvocationContext;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Registry of named processors.
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    /// Processors keyed by name.
    processors: BTreeMap<ProcessorName, Arc<dyn Processor>>,
}

impl ProcessorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a processor under `name`.
    ///
    /// # Errors
    ///
    /// Returns the rejected name when a processor is already registered under it.
    pub fn register(
        &mut self,
        name: impl Into<ProcessorName>,
        processor: Arc<dyn Processor>,
    ) -> Result<(), ProcessorName> {
        let name = name.into();
        if self.processors.contains_key(&name) {
            return Err(name);
        }
        self.processors.insert(name, processor);
        Ok(())
    }

    /// Returns the processor registered under `name`.
    #[must_use]
    pub fn get(&self, name: &ProcessorName) -> Option<&Arc<dyn Processor>> {
        self.processors.get(name)
    }

    /// Returns true when `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &ProcessorName) -> bool {
        self.processors.contains_key(name)
    }

    /// Iterates over registered names in order.
    pub fn names(&self) -> impl Iterator<Item = &ProcessorName> {
        self.processors.keys()
    }
}

// ============================================================================
// SECTION: Root Processor
// ============================================================================

/// Dispatches a method's processor directives to registered processors.
#[derive(Clone, Default)]
pub struct RootProcessor {
    /// Registered processors.
    registry: ProcessorRegistry,
}

impl RootProcessor {
    /// Creates a root processor over `registry`.
    #[must_use]
    pub const fn new(registry: ProcessorRegistry) -> Self {
        Self {
            registry,
        }
    }

    /// Returns the underlying registry.
    #[must_use]
    pub const fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    /// Applies the invoked method's directives to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::UnknownProcessor`] when a directive names an
    /// unregistered processor and [`ResolutionError::ProcessingFailure`] when
    /// a processor fails.
    pub fn process(
        &self,
        ctx: &InvocationContext<'_>,
        value: String,
    ) -> Result<String, ResolutionError> {
        let method = ctx.method();
        let directives = &method.metadata.processors;
        if directives.is_empty() {
            return Ok(value);
        }
        let mut selected = Vec::with_capacity(directives.len());
        for directive in directives {
            let Some(processor) = self.registry.get(&directive.processor) else {
                return Err(ResolutionError::UnknownProcessor {
                    processor: directive.processor.to_string(),
                    method: method.name.clone(),
                });
            };
            selected.push((directive, processor));
        }
        let mut current = value;
        for (directive, processor) in selected {
            debug!(processor = %directive.processor, method = %method.name, "applying processor");
            current = processor.process(ctx, directive, &current).map_err(|source| {
                ResolutionError::ProcessingFailure {
                    processor: directive.processor.to_string(),
                    source,
                }
            })?;
        }
        Ok(current)
    }
}
