// crates/propline-core/tests/method_table.rs
// ============================================================================
// Module: Method Table Tests
// Description: Descriptor validation, bound dispatch, and invocation caching.
// Purpose: Ensure the dispatch table rejects bad declarations and caches once.
// Dependencies: propline-core
// ============================================================================

//! ## Overview
//! Builds method tables, binds them to engines, and checks the opt-in
//! invocation cache, `prefetch`, and `clear_cache`.

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

use propline_core::Arguments;
use propline_core::BoundProperties;
use propline_core::Engine;
use propline_core::MethodDescriptor;
use propline_core::MethodTable;
use propline_core::MethodTableError;
use propline_core::ParameterDescriptor;
use propline_core::PropertyValue;
use propline_core::ResolutionError;
use propline_core::TypeDescriptor;

use crate::common::CountingResolver;
use crate::common::map;
use crate::common::property;

fn table() -> MethodTable {
    MethodTable::builder()
        .method(property("app.name", TypeDescriptor::String))
        .method(property("app.port", TypeDescriptor::U16))
        .method(MethodDescriptor::resolver_facade("lookup", TypeDescriptor::String))
        .build()
        .unwrap()
}

#[test]
fn duplicate_method_names_are_rejected() {
    let err = MethodTable::builder()
        .method(property("a", TypeDescriptor::String))
        .method(property("a", TypeDescriptor::I32))
        .build()
        .unwrap_err();
    assert_eq!(err, MethodTableError::DuplicateMethod("a".to_string()));
}

#[test]
fn invalid_descriptors_are_rejected() {
    let cases = [
        property("a", TypeDescriptor::String)
            .with_parameter(ParameterDescriptor::new("x", TypeDescriptor::String)),
        MethodDescriptor::resolver_facade("f", TypeDescriptor::String)
            .with_parameter(ParameterDescriptor::new("y", TypeDescriptor::String)),
        MethodDescriptor::converter_facade("c", TypeDescriptor::I32).with_delimiter(""),
        property("d", TypeDescriptor::I32).with_default(PropertyValue::String("1".to_string())),
        {
            let mut expander = MethodDescriptor::variable_expander("e");
            expander.return_type = TypeDescriptor::I32;
            expander
        },
    ];
    for descriptor in cases {
        let name = descriptor.name.clone();
        let err = MethodTable::builder().method(descriptor).build().unwrap_err();
        assert!(
            matches!(err, MethodTableError::InvalidMethod { ref method, .. } if *method == name),
            "unexpected error for {name}: {err}"
        );
    }
}

#[test]
fn bound_properties_dispatch_by_name() {
    let engine = Engine::builder()
        .resolver(map(&[("app.name", "demo"), ("app.port", "8080")]))
        .build()
        .unwrap();
    let bound = BoundProperties::new(Arc::new(engine), Arc::new(table()));
    assert_eq!(bound.get::<String>("app.name", &Arguments::none()).unwrap(), "demo");
    assert_eq!(bound.get::<u16>("app.port", &Arguments::none()).unwrap(), 8080);
    assert_eq!(
        bound.invoke("lookup", &Arguments::single("app.port")).unwrap(),
        PropertyValue::String("8080".to_string())
    );
    let err = bound.invoke("nope", &Arguments::none()).unwrap_err();
    assert!(matches!(err, ResolutionError::InvalidInvocation { .. }));
}

#[test]
fn cache_resolves_each_key_at_most_once() {
    let (counting, calls) = CountingResolver::new(map(&[("app.name", "demo"), ("app.port", "1")]));
    let engine = Engine::builder().resolver(counting).build().unwrap();
    let bound = BoundProperties::new(Arc::new(engine), Arc::new(table())).with_cache();
    for _ in 0 .. 3 {
        bound.invoke("app.name", &Arguments::none()).unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    bound.invoke("lookup", &Arguments::single("app.name")).unwrap();
    bound.invoke("lookup", &Arguments::single("app.port")).unwrap();
    bound.invoke("lookup", &Arguments::single("app.name")).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    bound.clear_cache();
    bound.invoke("app.name", &Arguments::none()).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn failures_are_not_cached() {
    let (counting, calls) = CountingResolver::new(map(&[]));
    let engine = Engine::builder().resolver(counting).build().unwrap();
    let bound = BoundProperties::new(Arc::new(engine), Arc::new(table())).with_cache();
    assert!(bound.invoke("app.name", &Arguments::none()).is_err());
    assert!(bound.invoke("app.name", &Arguments::none()).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(bound.cached_len(), 0);
}

#[test]
fn failing_keys_do_not_grow_the_cache() {
    let engine = Engine::builder().resolver(map(&[("known", "v")])).build().unwrap();
    let bound = BoundProperties::new(Arc::new(engine), Arc::new(table())).with_cache();
    for index in 0 .. 16 {
        let key = format!("missing.{index}");
        assert!(bound.invoke("lookup", &Arguments::single(key.as_str())).is_err());
    }
    assert_eq!(bound.cached_len(), 0);
    bound.invoke("lookup", &Arguments::single("known")).unwrap();
    assert_eq!(bound.cached_len(), 1);
    bound.clear_cache();
    assert_eq!(bound.cached_len(), 0);
}

#[test]
fn prefetch_resolves_property_methods_and_fails_fast() {
    let engine = Engine::builder()
        .resolver(map(&[("app.name", "demo"), ("app.port", "8080")]))
        .build()
        .unwrap();
    let bound = BoundProperties::new(Arc::new(engine), Arc::new(table()));
    assert_eq!(bound.prefetch().unwrap(), 2);

    let broken = Engine::builder()
        .resolver(map(&[("app.name", "demo"), ("app.port", "http")]))
        .build()
        .unwrap();
    let bound = BoundProperties::new(Arc::new(broken), Arc::new(table()));
    assert!(matches!(bound.prefetch().unwrap_err(), ResolutionError::ConversionFailure { .. }));
}
