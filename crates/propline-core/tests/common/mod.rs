// crates/propline-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared resolvers, processors, and engine helpers for core tests.
// Purpose: Keep pipeline tests focused on behavior instead of setup.
// Dependencies: propline-core
// ============================================================================

//! ## Overview
//! Provides map-building helpers, a failing resolver, a counting resolver, and
//! a scratch invocation context for calling resolvers directly.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::unwrap_in_result,
    reason = "Test fixtures favor direct unwraps for setup clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use propline_core::Arguments;
use propline_core::Engine;
use propline_core::InvocationContext;
use propline_core::MapResolver;
use propline_core::MethodDescriptor;
use propline_core::PropertyName;
use propline_core::Resolver;
use propline_core::ResolverError;
use propline_core::TypeDescriptor;

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Builds a map resolver from string pairs.
pub fn map(pairs: &[(&str, &str)]) -> MapResolver {
    pairs.iter().map(|(key, value)| (*key, *value)).collect()
}

/// Builds a property method descriptor.
pub fn property(name: &str, return_type: TypeDescriptor) -> MethodDescriptor {
    MethodDescriptor::property(name, PropertyName::new(name).unwrap(), return_type)
}

/// Builds an engine over the given resolvers with default settings.
pub fn engine_with(resolvers: Vec<Arc<dyn Resolver>>) -> Engine {
    resolvers
        .into_iter()
        .fold(Engine::builder(), propline_core::EngineBuilder::shared_resolver)
        .build()
        .unwrap()
}

/// Runs `f` with a scratch invocation context over `engine`.
pub fn with_context<T>(engine: &Engine, f: impl FnOnce(&InvocationContext<'_>) -> T) -> T {
    let method = property("lookup", TypeDescriptor::String);
    let arguments = Arguments::none();
    let ctx = InvocationContext::new(engine, &method, &arguments);
    f(&ctx)
}

// ============================================================================
// SECTION: Resolvers
// ============================================================================

/// Resolver that always fails with a backend error.
pub struct FailingResolver;

impl Resolver for FailingResolver {
    fn resolve(
        &self,
        _ctx: &InvocationContext<'_>,
        name: &str,
    ) -> Result<Option<String>, ResolverError> {
        Err(ResolverError::backend_with_source(
            format!("lookup of {name} failed"),
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "backend down"),
        ))
    }
}

/// Resolver that counts lookups and delegates to a map.
pub struct CountingResolver {
    /// Delegate map.
    pub inner: MapResolver,
    /// Number of lookups served.
    pub calls: Arc<AtomicUsize>,
}

impl CountingResolver {
    /// Creates a counting resolver and returns its shared counter.
    pub fn new(inner: MapResolver) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl Resolver for CountingResolver {
    fn resolve(
        &self,
        ctx: &InvocationContext<'_>,
        name: &str,
    ) -> Result<Option<String>, ResolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(ctx, name)
    }
}
