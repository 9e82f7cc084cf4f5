// crates/propline-core/tests/proptest_pipeline.rs
// ============================================================================
// Module: Pipeline Property-Based Tests
// Description: Generated checks for expansion, tokenization, and flattening.
// Purpose: Hold pipeline invariants over arbitrary inputs.
// Dependencies: propline-core, proptest
// ============================================================================

//! ## Overview
//! - Text without a placeholder prefix expands to itself.
//! - Joining tokens and converting them back preserves order.
//! - Flattening nested composites matches manual pre-flattening.

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
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use std::sync::Arc;

use propline_core::Arguments;
use propline_core::CompositeResolver;
use propline_core::Engine;
use propline_core::MethodDescriptor;
use propline_core::PropertyValue;
use propline_core::Resolver;
use propline_core::TypeDescriptor;
use proptest::prelude::*;

use crate::common::map;
use crate::common::with_context;

proptest! {
    #[test]
    fn expansion_is_identity_without_prefix(text in "[^$]{0,64}") {
        let engine = Engine::builder().resolver(map(&[("a", "1")])).build().unwrap();
        let expanded = with_context(&engine, |ctx| ctx.expand(&text)).unwrap();
        prop_assert_eq!(expanded, text);
    }

    #[test]
    fn integer_lists_round_trip(values in proptest::collection::vec(any::<i64>(), 1..16)) {
        let engine = Engine::builder().build().unwrap();
        let joined = values.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
        let method =
            MethodDescriptor::converter_facade("list", TypeDescriptor::list(TypeDescriptor::I64));
        let converted = engine.invoke(&method, &Arguments::single(joined.clone())).unwrap();
        let PropertyValue::List(items) = converted else {
            panic!("expected list");
        };
        let rejoined = items.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
        prop_assert_eq!(rejoined, joined);
    }

    #[test]
    fn flattening_matches_manual_order(
        groups in proptest::collection::vec(proptest::collection::vec(0_u8..4, 1..4), 1..5),
    ) {
        let engine = Engine::builder().build().unwrap();
        let member = |tag: usize, key: u8| -> Arc<dyn Resolver> {
            Arc::new(map(&[(key.to_string().as_str(), tag.to_string().as_str())]))
        };
        let mut flat: Vec<Arc<dyn Resolver>> = Vec::new();
        let mut nested: Vec<Arc<dyn Resolver>> = Vec::new();
        let mut tag = 0_usize;
        for group in &groups {
            let mut children = Vec::new();
            for key in group {
                let resolver = member(tag, *key);
                flat.push(Arc::clone(&resolver));
                children.push(resolver);
                tag += 1;
            }
            nested.push(Arc::new(CompositeResolver::new(children)));
        }
        let flat = CompositeResolver::new(flat);
        let nested = CompositeResolver::new(nested);
        prop_assert_eq!(flat.len(), nested.len());
        for key in 0_u8..4 {
            let name = key.to_string();
            let (left, right) = with_context(&engine, |ctx| {
                (flat.resolve(ctx, &name).unwrap(), nested.resolve(ctx, &name).unwrap())
            });
            prop_assert_eq!(left, right);
        }
    }
}
