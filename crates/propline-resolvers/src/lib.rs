// crates/propline-resolvers/src/lib.rs
// ============================================================================
// Module: Propline Resolvers
// Description: Resolver backends and the configuration-driven registry.
// Purpose: Supply property values from the environment, files, URLs, and SQLite.
// Dependencies: propline-core, reqwest, rusqlite, serde, tracing
// ============================================================================

//! ## Overview
//! This crate ships the resolver backends that sit behind a
//! [`propline_core::CompositeResolver`]: process environment, command-line
//! definitions, resource documents (JSON, YAML, TOML, Java properties) loaded
//! from files or URLs, and `SQLite` tables. [`ResolverRegistry`] builds them
//! from declarative settings keyed by a type name.
//! Invariants:
//! - A missing property is `Ok(None)`; backend failures are errors.
//! - Backends enforce size limits and fail closed on oversized input.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod command_line;
pub mod database;
pub mod env;
pub mod http;
pub mod readers;
pub mod registry;
pub mod resource;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use command_line::CommandLineResolver;
pub use command_line::CommandLineResolverConfig;
pub use database::DatabaseResolver;
pub use database::DatabaseResolverConfig;
pub use env::EnvResolver;
pub use env::EnvResolverConfig;
pub use http::HttpFetchConfig;
pub use readers::JsonReader;
pub use readers::PropertiesReader;
pub use readers::ResourceFormat;
pub use readers::ResourceReader;
pub use readers::TomlReader;
pub use readers::YamlReader;
pub use registry::RegistryError;
pub use registry::ResolverFactory;
pub use registry::ResolverRegistry;
pub use resource::ResourceResolver;
pub use resource::ResourceResolverConfig;

#[cfg(test)]
mod tests;
