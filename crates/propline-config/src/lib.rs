// crates/propline-config/src/lib.rs
// ============================================================================
// Module: Propline Config Library
// Description: Canonical config model, validation, and engine construction.
// Purpose: Single source of truth for propline.toml semantics.
// Dependencies: propline-core, propline-resolvers, serde, toml
// ============================================================================

//! ## Overview
//! `propline-config` defines the `propline.toml` model. Loading is strict and
//! fail-closed: oversized, non-UTF-8, malformed, or inconsistent files are
//! rejected before any resolver is built. A validated configuration turns
//! into an [`propline_core::EngineBuilder`] through a
//! [`propline_resolvers::ResolverRegistry`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
