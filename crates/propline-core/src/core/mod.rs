// crates/propline-core/src/core/mod.rs
// ============================================================================
// Module: Propline Core Model
// Description: Data model for properties, methods, type descriptors, and values.
// Purpose: Group the immutable types shared by every pipeline stage.
// Dependencies: regex, thiserror, time, uuid
// ============================================================================

//! ## Overview
//! The core model holds the types that flow through the resolution pipeline.
//! Method descriptors are built once and shared read-only; values and errors
//! are created per invocation.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod error;
pub mod identifiers;
pub mod method;
pub mod types;
pub mod value;
