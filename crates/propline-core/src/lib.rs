// crates/propline-core/src/lib.rs
// ============================================================================
// Module: Propline Core Library
// Description: Property resolution pipeline and its backend-agnostic contracts.
// Purpose: Resolve, expand, process, and convert declared configuration properties.
// Dependencies: base64, regex, thiserror, time, tracing, uuid
// ============================================================================

//! ## Overview
//! `propline-core` turns method descriptors into typed configuration values.
//! Each invocation builds an [`InvocationContext`] and runs the
//! [`Engine`] pipeline: resolve through the [`CompositeResolver`], expand
//! `${name}` placeholders, apply the processors named by the method, and
//! convert the result through the [`ConverterRegistry`].
//! Invariants:
//! - Engines are immutable after [`EngineBuilder::build`] and safe to share across threads.
//! - "Not found" and "failed to look up" are distinct outcomes at every layer.
//! - The only silent fallback is a declared default or an optional return type.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod processors;
pub mod resolvers;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::error::ResolutionError;
pub use crate::core::identifiers::InvalidPropertyName;
pub use crate::core::identifiers::ProcessorName;
pub use crate::core::identifiers::PropertyName;
pub use crate::core::method::Arguments;
pub use crate::core::method::MethodDescriptor;
pub use crate::core::method::MethodKind;
pub use crate::core::method::MethodMetadata;
pub use crate::core::method::ParameterDescriptor;
pub use crate::core::method::ProcessorDirective;
pub use crate::core::types::EnumType;
pub use crate::core::types::TypeDescriptor;
pub use crate::core::types::TypeDescriptorParseError;
pub use crate::core::value::CustomValue;
pub use crate::core::value::PropertyValue;
pub use crate::interfaces::BoxError;
pub use crate::interfaces::ConversionError;
pub use crate::interfaces::ConversionResult;
pub use crate::interfaces::Converter;
pub use crate::interfaces::Processor;
pub use crate::interfaces::ProcessorError;
pub use crate::interfaces::Resolver;
pub use crate::interfaces::ResolverError;
pub use crate::interfaces::VariableExpander;
pub use crate::processors::BASE64_DECODE_PROCESSOR;
pub use crate::processors::Base64DecodeProcessor;
pub use crate::processors::DECRYPT_PROCESSOR;
pub use crate::processors::DecryptProcessor;
pub use crate::processors::Decryptor;
pub use crate::resolvers::CachingResolver;
pub use crate::resolvers::MapResolver;
pub use crate::runtime::BoundProperties;
pub use crate::runtime::CompositeResolver;
pub use crate::runtime::ConverterRegistry;
pub use crate::runtime::DEFAULT_DELIMITER;
pub use crate::runtime::Engine;
pub use crate::runtime::EngineBuildError;
pub use crate::runtime::EngineBuilder;
pub use crate::runtime::InvocationContext;
pub use crate::runtime::MethodTable;
pub use crate::runtime::MethodTableBuilder;
pub use crate::runtime::MethodTableError;
pub use crate::runtime::NoOpVariableExpander;
pub use crate::runtime::PatternVariableExpander;
pub use crate::runtime::ProcessorRegistry;
pub use crate::runtime::PropertyType;
pub use crate::runtime::ResolutionStage;
pub use crate::runtime::RootProcessor;
pub use crate::runtime::SimpleVariableExpander;
pub use crate::runtime::VariablePatternError;
