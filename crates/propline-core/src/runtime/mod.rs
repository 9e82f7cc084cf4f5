// crates/propline-core/src/runtime/mod.rs
// ============================================================================
// Module: Propline Runtime
// Description: Pipeline stages and the engine that orchestrates them.
// Purpose: Serve method invocations by resolving, expanding, processing, and converting.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The runtime wires the stage implementations together:
//! [`CompositeResolver`] for lookup, [`SimpleVariableExpander`] for
//! placeholders, [`RootProcessor`] for named processors, and
//! [`ConverterRegistry`] for typed conversion. [`Engine`] runs them in that
//! order for each [`InvocationContext`]; [`MethodTable`] and
//! [`BoundProperties`] provide the explicit dispatch table that stands in for
//! generated interface implementations.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod chain;
pub mod context;
pub mod conversion;
pub mod engine;
pub mod expansion;
pub mod processing;
pub mod table;
pub mod typed;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use chain::CompositeResolver;
pub use context::InvocationContext;
pub use conversion::ConverterRegistry;
pub use conversion::DEFAULT_DELIMITER;
pub use engine::Engine;
pub use engine::EngineBuildError;
pub use engine::EngineBuilder;
pub use engine::ResolutionStage;
pub use expansion::DEFAULT_VARIABLE_PATTERN;
pub use expansion::NoOpVariableExpander;
pub use expansion::PatternVariableExpander;
pub use expansion::SimpleVariableExpander;
pub use expansion::VariablePatternError;
pub use processing::ProcessorRegistry;
pub use processing::RootProcessor;
pub use table::BoundProperties;
pub use table::MethodTable;
pub use table::MethodTableBuilder;
pub use table::MethodTableError;
pub use typed::PropertyType;
