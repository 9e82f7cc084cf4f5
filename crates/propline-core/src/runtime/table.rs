// crates/propline-core/src/runtime/table.rs
// ============================================================================
// Module: Propline Method Table
// Description: Explicit dispatch table of method descriptors.
// Purpose: Stand in for generated interface implementations.
// Dependencies: crate::core, crate::runtime::engine, thiserror, tracing
// ============================================================================

//! ## Overview
//! A [`MethodTable`] is built once from validated descriptors and keyed by
//! method name. [`BoundProperties`] pairs a table with an [`Engine`] and is
//! the handle application code calls into. An optional invocation cache
//! memoizes successful results per (method, arguments) key.
//! Invariants:
//! - Method names are unique.
//! - Descriptors are immutable once the table is built.
//! - A cached key is resolved at most once until [`BoundProperties::clear_cache`].
//! - Failed invocations leave no cache entry behind.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::TryLockError;

use thiserror::Error;
use tracing::debug;

use crate::core::error::ResolutionError;
use crate::core::method::Arguments;
use crate::core::method::MethodDescriptor;
use crate::core::method::MethodKind;
use crate::core::types::TypeDescriptor;
use crate::core::value::PropertyValue;
use crate::runtime::engine::Engine;
use crate::runtime::typed::PropertyType;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building a [`MethodTable`].
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MethodTableError {
    /// Two descriptors share a method name.
    #[error("duplicate method name: {0}")]
    DuplicateMethod(String),
    /// A descriptor violates the rules of its kind.
    #[error("invalid method '{method}': {reason}")]
    InvalidMethod {
        /// Method name.
        method: String,
        /// Human-readable reason.
        reason: String,
    },
}

impl MethodTableError {
    /// Builds an invalid-method error.
    fn invalid(method: &MethodDescriptor, reason: impl Into<String>) -> Self {
        Self::InvalidMethod {
            method: method.name.clone(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// SECTION: Method Table
// ============================================================================

/// Immutable descriptor table keyed by method name.
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    /// Descriptors keyed by method name.
    methods: BTreeMap<String, Arc<MethodDescriptor>>,
}

impl MethodTable {
    /// Starts building a table.
    #[must_use]
    pub fn builder() -> MethodTableBuilder {
        MethodTableBuilder::default()
    }

    /// Returns the descriptor for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<MethodDescriptor>> {
        self.methods.get(name)
    }

    /// Returns the number of methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns true when the table has no methods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Iterates over descriptors in method-name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<MethodDescriptor>> {
        self.methods.values()
    }
}

/// Builder validating descriptors before they enter a [`MethodTable`].
#[derive(Debug, Clone, Default)]
pub struct MethodTableBuilder {
    /// Descriptors in declaration order.
    methods: Vec<MethodDescriptor>,
}

impl MethodTableBuilder {
    /// Adds a descriptor.
    #[must_use]
    pub fn method(mut self, descriptor: MethodDescriptor) -> Self {
        self.methods.push(descriptor);
        self
    }

    /// Validates every descriptor and builds the table.
    ///
    /// # Errors
    ///
    /// Returns [`MethodTableError`] on duplicate names or descriptors that
    /// violate the rules of their kind.
    pub fn build(self) -> Result<MethodTable, MethodTableError> {
        let mut methods = BTreeMap::new();
        for descriptor in self.methods {
            validate(&descriptor)?;
            if methods.contains_key(&descriptor.name) {
                return Err(MethodTableError::DuplicateMethod(descriptor.name));
            }
            methods.insert(descriptor.name.clone(), Arc::new(descriptor));
        }
        Ok(MethodTable {
            methods,
        })
    }
}

/// Checks a descriptor against the rules of its kind.
fn validate(descriptor: &MethodDescriptor) -> Result<(), MethodTableError> {
    if descriptor.name.is_empty() {
        return Err(MethodTableError::invalid(descriptor, "method name must not be empty"));
    }
    match descriptor.kind {
        MethodKind::Property => {
            if descriptor.property.is_none() {
                return Err(MethodTableError::invalid(descriptor, "property name is required"));
            }
            if !descriptor.parameters.is_empty() {
                return Err(MethodTableError::invalid(
                    descriptor,
                    "property methods take no parameters",
                ));
            }
        }
        MethodKind::VariableExpanderFacade
        | MethodKind::ResolverFacade
        | MethodKind::ConverterFacade => {
            let single_string = descriptor.parameters.len() == 1
                && descriptor.parameters[0].type_descriptor == TypeDescriptor::String;
            if !single_string {
                return Err(MethodTableError::invalid(
                    descriptor,
                    "facade methods take exactly one string parameter",
                ));
            }
        }
    }
    if descriptor.kind == MethodKind::VariableExpanderFacade
        && descriptor.return_type != TypeDescriptor::String
    {
        return Err(MethodTableError::invalid(
            descriptor,
            "variable expander facades return string",
        ));
    }
    if descriptor.delimiter().is_some_and(str::is_empty) {
        return Err(MethodTableError::invalid(descriptor, "delimiter must not be empty"));
    }
    if let Some(default) = &descriptor.metadata.default_value
        && !default.conforms_to(&descriptor.return_type)
    {
        return Err(MethodTableError::invalid(
            descriptor,
            format!(
                "default {} does not match return type {}",
                default.type_name(),
                descriptor.return_type
            ),
        ));
    }
    Ok(())
}

// ============================================================================
// SECTION: Invocation Cache
// ============================================================================

/// Per-key slot guarding at-most-once resolution.
type CacheSlot = Arc<Mutex<Option<PropertyValue>>>;

/// Memoizes successful invocation results per (method, arguments) key.
#[derive(Debug, Default)]
pub struct InvocationCache {
    /// Slots keyed by method name and arguments.
    slots: Mutex<HashMap<(String, Arguments), CacheSlot>>,
}

impl InvocationCache {
    /// Returns the slot for a key, creating it when missing.
    fn slot(&self, method: &str, arguments: &Arguments) -> CacheSlot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            slots.entry((method.to_string(), arguments.clone())).or_insert_with(CacheSlot::default),
        )
    }

    /// Returns the cached value or computes and stores it.
    fn get_or_try_insert<F>(
        &self,
        method: &str,
        arguments: &Arguments,
        compute: F,
    ) -> Result<PropertyValue, ResolutionError>
    where
        F: FnOnce() -> Result<PropertyValue, ResolutionError>,
    {
        let slot = self.slot(method, arguments);
        let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = guard.as_ref() {
            return Ok(value.clone());
        }
        match compute() {
            Ok(value) => {
                *guard = Some(value.clone());
                Ok(value)
            }
            Err(err) => {
                drop(guard);
                self.evict_vacant(method, arguments, &slot);
                Err(err)
            }
        }
    }

    /// Removes `slot` from the map when it is still registered for the key,
    /// holds no value, and no other caller is computing into it.
    fn evict_vacant(&self, method: &str, arguments: &Arguments, slot: &CacheSlot) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let key = (method.to_string(), arguments.clone());
        if !slots.get(&key).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            return;
        }
        let vacant = match slot.try_lock() {
            Ok(guard) => guard.is_none(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_none(),
            Err(TryLockError::WouldBlock) => false,
        };
        if vacant {
            slots.remove(&key);
        }
    }

    /// Returns the number of keys holding a slot.
    fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Drops every cached value.
    fn clear(&self) {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

// ============================================================================
// SECTION: Bound Properties
// ============================================================================

/// Engine bound to a method table; the handle application code calls.
#[derive(Clone)]
pub struct BoundProperties {
    /// Engine serving invocations.
    engine: Arc<Engine>,
    /// Declared methods.
    table: Arc<MethodTable>,
    /// Optional invocation cache.
    cache: Option<Arc<InvocationCache>>,
}

impl BoundProperties {
    /// Binds `table` to `engine` without caching.
    #[must_use]
    pub const fn new(engine: Arc<Engine>, table: Arc<MethodTable>) -> Self {
        Self {
            engine,
            table,
            cache: None,
        }
    }

    /// Enables the invocation cache.
    #[must_use]
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(Arc::new(InvocationCache::default()));
        self
    }

    /// Returns the bound engine.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Returns the bound method table.
    #[must_use]
    pub fn table(&self) -> &MethodTable {
        &self.table
    }

    /// Invokes the method named `method`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::InvalidInvocation`] for unknown method names
    /// and any pipeline error.
    pub fn invoke(
        &self,
        method: &str,
        arguments: &Arguments,
    ) -> Result<PropertyValue, ResolutionError> {
        let descriptor = self.descriptor(method)?;
        match &self.cache {
            Some(cache) => cache
                .get_or_try_insert(method, arguments, || self.engine.invoke(descriptor, arguments)),
            None => self.engine.invoke(descriptor, arguments),
        }
    }

    /// Invokes the method named `method` and reads the result as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::ReturnTypeMismatch`] when `T` does not match
    /// the declared return type, plus any [`BoundProperties::invoke`] error.
    pub fn get<T: PropertyType>(
        &self,
        method: &str,
        arguments: &Arguments,
    ) -> Result<T, ResolutionError> {
        let descriptor = self.descriptor(method)?;
        let requested = T::type_descriptor();
        let mismatch = || ResolutionError::ReturnTypeMismatch {
            method: method.to_string(),
            declared: descriptor.return_type.to_string(),
            requested: requested.to_string(),
        };
        if !requested.accepts(&descriptor.return_type) {
            return Err(mismatch());
        }
        let value = self.invoke(method, arguments)?;
        T::from_property_value(value).ok_or_else(mismatch)
    }

    /// Resolves every zero-argument property method, failing on the first error.
    ///
    /// # Errors
    ///
    /// Returns the first [`ResolutionError`] encountered.
    pub fn prefetch(&self) -> Result<usize, ResolutionError> {
        let arguments = Arguments::none();
        let mut resolved = 0;
        for descriptor in self.table.iter().filter(|d| d.kind == MethodKind::Property) {
            self.invoke(&descriptor.name, &arguments)?;
            resolved += 1;
        }
        debug!(resolved, "prefetched property methods");
        Ok(resolved)
    }

    /// Returns the number of cached invocation keys; zero without a cache.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.as_deref().map_or(0, InvocationCache::len)
    }

    /// Drops every cached invocation result.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Looks up a descriptor by name.
    fn descriptor(&self, method: &str) -> Result<&MethodDescriptor, ResolutionError> {
        self.table
            .get(method)
            .map(Arc::as_ref)
            .ok_or_else(|| ResolutionError::invalid_invocation(method, "unknown method"))
    }
}
