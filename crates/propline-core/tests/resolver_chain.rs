// crates/propline-core/tests/resolver_chain.rs
// ============================================================================
// Module: Resolver Chain Tests
// Description: Ordering, flattening, and failure propagation of composites.
// Purpose: Keep "not found" and "failed to look up" distinct.
// Dependencies: propline-core
// ============================================================================

//! ## Overview
//! Exercises [`CompositeResolver`] flattening, first-hit ordering, empty
//! chains, failure propagation, and the caching decorator.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use propline_core::CachingResolver;
use propline_core::CompositeResolver;
use propline_core::Engine;
use propline_core::ResolutionError;
use propline_core::Resolver;
use propline_core::ResolverError;

use crate::common::CountingResolver;
use crate::common::FailingResolver;
use crate::common::map;
use crate::common::with_context;

fn engine() -> Engine {
    Engine::builder().build().unwrap()
}

#[test]
fn first_hit_wins_in_registration_order() {
    let chain = CompositeResolver::new([
        Arc::new(map(&[("a", "first")])) as Arc<dyn Resolver>,
        Arc::new(map(&[("a", "second"), ("b", "only")])),
    ]);
    with_context(&engine(), |ctx| {
        assert_eq!(chain.resolve(ctx, "a").unwrap().as_deref(), Some("first"));
        assert_eq!(chain.resolve(ctx, "b").unwrap().as_deref(), Some("only"));
        assert_eq!(chain.resolve(ctx, "c").unwrap(), None);
    });
}

#[test]
fn nested_composites_are_flattened_in_order() {
    let inner = CompositeResolver::new([
        Arc::new(map(&[("k", "inner-1")])) as Arc<dyn Resolver>,
        Arc::new(map(&[("k", "inner-2")])),
    ]);
    let nested = CompositeResolver::new([
        Arc::new(inner) as Arc<dyn Resolver>,
        Arc::new(map(&[("k", "outer")])),
    ]);
    assert_eq!(nested.len(), 3);
    assert!(nested.iter().all(|member| member.as_composite().is_none()));
    with_context(&engine(), |ctx| {
        assert_eq!(nested.resolve(ctx, "k").unwrap().as_deref(), Some("inner-1"));
    });
}

#[test]
fn empty_chain_reports_not_found() {
    let chain = CompositeResolver::empty();
    assert!(chain.is_empty());
    with_context(&engine(), |ctx| {
        assert_eq!(chain.resolve(ctx, "anything").unwrap(), None);
    });
}

#[test]
fn empty_string_is_a_hit() {
    let chain = CompositeResolver::new([
        Arc::new(map(&[("blank", "")])) as Arc<dyn Resolver>,
        Arc::new(map(&[("blank", "fallback")])),
    ]);
    with_context(&engine(), |ctx| {
        assert_eq!(chain.resolve(ctx, "blank").unwrap().as_deref(), Some(""));
    });
}

#[test]
fn failing_member_is_not_masked_as_miss() {
    let chain = CompositeResolver::new([
        Arc::new(map(&[("a", "1")])) as Arc<dyn Resolver>,
        Arc::new(FailingResolver),
        Arc::new(map(&[("b", "2")])),
    ]);
    with_context(&engine(), |ctx| {
        assert_eq!(chain.resolve(ctx, "a").unwrap().as_deref(), Some("1"));
        let err = chain.resolve(ctx, "b").unwrap_err();
        assert!(matches!(err, ResolverError::Backend { .. }));
    });
}

#[test]
fn context_reads_raw_values_through_engine_chain() {
    let engine = common::engine_with(vec![
        Arc::new(map(&[("greeting", "${name}")])) as Arc<dyn Resolver>,
        Arc::new(map(&[("name", "world")])),
    ]);
    with_context(&engine, |ctx| {
        assert_eq!(ctx.resolve_raw("greeting").unwrap().as_deref(), Some("${name}"));
        assert_eq!(ctx.resolve_raw("name").unwrap().as_deref(), Some("world"));
        assert_eq!(ctx.resolve_raw("absent").unwrap(), None);
    });
}

#[test]
fn engine_wraps_resolver_failure_with_source() {
    let engine = common::engine_with(vec![Arc::new(FailingResolver)]);
    let err = with_context(&engine, |ctx| ctx.resolve_raw("db.url")).unwrap_err();
    let ResolutionError::ResolutionFailure {
        property,
        source,
    } = &err
    else {
        panic!("expected resolution failure, got {err:?}");
    };
    assert_eq!(property, "db.url");
    assert!(std::error::Error::source(source).is_some());
}

#[test]
fn caching_resolver_memoizes_hits_only() {
    let (counting, calls) = CountingResolver::new(map(&[("hit", "v")]));
    let caching = CachingResolver::new(Arc::new(counting));
    with_context(&engine(), |ctx| {
        assert_eq!(caching.resolve(ctx, "hit").unwrap().as_deref(), Some("v"));
        assert_eq!(caching.resolve(ctx, "hit").unwrap().as_deref(), Some("v"));
        assert_eq!(caching.resolve(ctx, "miss").unwrap(), None);
        assert_eq!(caching.resolve(ctx, "miss").unwrap(), None);
    });
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(caching.cached_len(), 1);
    caching.clear();
    assert_eq!(caching.cached_len(), 0);
}

#[test]
fn engine_cache_option_wraps_chain() {
    let (counting, calls) = CountingResolver::new(map(&[("x", "1")]));
    let engine = Engine::builder().resolver(counting).cache_resolved_values(true).build().unwrap();
    assert_eq!(engine.resolver().len(), 1);
    with_context(&engine, |ctx| {
        ctx.resolve_raw("x").unwrap();
        ctx.resolve_raw("x").unwrap();
    });
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
