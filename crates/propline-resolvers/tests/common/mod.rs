// crates/propline-resolvers/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Scratch context and engine helpers for resolver tests.
// Purpose: Call resolvers directly without declaring methods per test.
// Dependencies: propline-core
// ============================================================================

//! ## Overview
//! Resolvers need an invocation context; these helpers build a throwaway
//! engine and scratch method around a single call.

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

use propline_core::Arguments;
use propline_core::Engine;
use propline_core::InvocationContext;
use propline_core::MethodDescriptor;
use propline_core::PropertyName;
use propline_core::PropertyValue;
use propline_core::Resolver;
use propline_core::ResolverError;
use propline_core::TypeDescriptor;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves `name` through `resolver` with a scratch context.
pub fn lookup(resolver: &dyn Resolver, name: &str) -> Result<Option<String>, ResolverError> {
    let engine = Engine::builder().build().unwrap();
    let method = MethodDescriptor::property(
        "lookup",
        PropertyName::new("lookup").unwrap(),
        TypeDescriptor::String,
    );
    let arguments = Arguments::none();
    let ctx = InvocationContext::new(&engine, &method, &arguments);
    resolver.resolve(&ctx, name)
}

/// Resolves `name` as `return_type` through an engine over `resolver`.
pub fn resolve_typed(
    resolver: Arc<dyn Resolver>,
    name: &str,
    return_type: TypeDescriptor,
) -> PropertyValue {
    let engine = Engine::builder().shared_resolver(resolver).build().unwrap();
    let method = MethodDescriptor::property(name, PropertyName::new(name).unwrap(), return_type);
    engine.invoke(&method, &Arguments::none()).unwrap()
}
