// crates/propline-core/src/resolvers.rs
// ============================================================================
// Module: Propline Core Resolvers
// Description: In-memory map resolver and the caching decorator.
// Purpose: Provide backend-free resolvers usable by every engine.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! [`MapResolver`] serves a fixed map. [`CachingResolver`] memoizes the hits
//! of any resolver; misses and failures always reach the inner resolver.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use crate::interfaces::Resolver;
use crate::interfaces::ResolverError;
use crate::runtime::context::InvocationContext;

// ============================================================================
// SECTION: Map Resolver
// ============================================================================

/// Resolver backed by an in-memory map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapResolver {
    /// Property values keyed by name.
    values: BTreeMap<String, String>,
}

impl MapResolver {
    /// Creates a resolver over `values`.
    #[must_use]
    pub const fn new(values: BTreeMap<String, String>) -> Self {
        Self {
            values,
        }
    }

    /// Adds or replaces a value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MapResolver
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
    }
}

impl Resolver for MapResolver {
    fn resolve(
        &self,
        _ctx: &InvocationContext<'_>,
        name: &str,
    ) -> Result<Option<String>, ResolverError> {
        Ok(self.values.get(name).cloned())
    }
}

// ============================================================================
// SECTION: Caching Resolver
// ============================================================================

/// Decorator memoizing the hits of an inner resolver.
///
/// # Invariants
/// - Only present values are cached.
/// - The lock is never held while the inner resolver runs.
pub struct CachingResolver {
    /// Wrapped resolver.
    inner: Arc<dyn Resolver>,
    /// Cached hits keyed by property name.
    hits: RwLock<HashMap<String, String>>,
}

impl CachingResolver {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: Arc<dyn Resolver>) -> Self {
        Self {
            inner,
            hits: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the number of cached hits.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.hits.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Drops every cached hit.
    pub fn clear(&self) {
        self.hits.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Resolver for CachingResolver {
    fn resolve(
        &self,
        ctx: &InvocationContext<'_>,
        name: &str,
    ) -> Result<Option<String>, ResolverError> {
        let cached = self.hits.read().unwrap_or_else(PoisonError::into_inner).get(name).cloned();
        if cached.is_some() {
            return Ok(cached);
        }
        let resolved = self.inner.resolve(ctx, name)?;
        if let Some(value) = &resolved {
            self.hits
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(name.to_string(), value.clone());
        }
        Ok(resolved)
    }
}
