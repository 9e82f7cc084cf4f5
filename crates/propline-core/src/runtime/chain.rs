// crates/propline-core/src/runtime/chain.rs
// ============================================================================
// Module: Propline Resolver Chain
// Description: Ordered composite of resolvers returning the first hit.
// Purpose: Present any number of value sources as one logical resolver.
// Dependencies: crate::interfaces, tracing
// ============================================================================

//! ## Overview
//! [`CompositeResolver`] tries its children strictly in order and returns the
//! first present value. Nested composites are flattened at construction, so a
//! lookup is always one level of indirection no matter how the chain was
//! assembled.
//! Invariants:
//! - The member list never contains a composite.
//! - A failing child aborts the lookup; failures are never treated as misses.
//! - An empty chain always reports "not found".

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use tracing::trace;

use crate::interfaces::Resolver;
use crate::interfaces::ResolverError;
use crate::runtime::context::InvocationContext;

// ============================================================================
// SECTION: Composite Resolver
// ============================================================================

/// Ordered, immutable resolver chain.
///
/// # Invariants
/// - `members` is flat: no member is itself a composite.
#[derive(Clone, Default)]
pub struct CompositeResolver {
    /// Flattened members in resolution order.
    members: Vec<Arc<dyn Resolver>>,
}

impl CompositeResolver {
    /// Builds a chain from `resolvers`, flattening nested composites.
    #[must_use]
    pub fn new(resolvers: impl IntoIterator<Item = Arc<dyn Resolver>>) -> Self {
        let mut members: Vec<Arc<dyn Resolver>> = Vec::new();
        for resolver in resolvers {
            match resolver.as_composite() {
                Some(composite) => members.extend(composite.members.iter().cloned()),
                None => members.push(resolver),
            }
        }
        Self {
            members,
        }
    }

    /// Returns a chain with no members.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Returns the number of flattened members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true when the chain has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates over the flattened members in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Resolver>> {
        self.members.iter()
    }
}

impl Resolver for CompositeResolver {
    fn resolve(
        &self,
        ctx: &InvocationContext<'_>,
        name: &str,
    ) -> Result<Option<String>, ResolverError> {
        for (index, member) in self.members.iter().enumerate() {
            if let Some(value) = member.resolve(ctx, name)? {
                trace!(property = name, member = index, "resolver chain hit");
                return Ok(Some(value));
            }
        }
        trace!(property = name, members = self.members.len(), "resolver chain miss");
        Ok(None)
    }

    fn as_composite(&self) -> Option<&CompositeResolver> {
        Some(self)
    }
}

impl FromIterator<Arc<dyn Resolver>> for CompositeResolver {
    fn from_iter<T: IntoIterator<Item = Arc<dyn Resolver>>>(iter: T) -> Self {
        Self::new(iter)
    }
}
