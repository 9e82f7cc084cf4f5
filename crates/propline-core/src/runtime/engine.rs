// crates/propline-core/src/runtime/engine.rs
// ============================================================================
// Module: Propline Root Resolution Engine
// Description: Orchestrates resolve, expand, process, and convert per invocation.
// Purpose: Produce a typed value or a typed error for each method call.
// Dependencies: crate::core, crate::interfaces, crate::runtime, tracing
// ============================================================================

//! ## Overview
//! [`Engine`] owns one instance of every stage and runs them for each
//! invocation:
//! `START -> RESOLVING -> (NOT_FOUND | RESOLVED) -> EXPANDING -> PROCESSING ->
//! CONVERTING -> DONE`, with any stage able to fail.
//! Invariants:
//! - A resolved value always runs expansion before processing before conversion.
//! - `NOT_FOUND` falls back to the declared default, then to an empty
//!   optional, and otherwise fails with [`ResolutionError::UnresolvedProperty`].
//! - Engines are immutable after [`EngineBuilder::build`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

use crate::core::error::ResolutionError;
use crate::core::identifiers::ProcessorName;
use crate::core::method::Arguments;
use crate::core::method::MethodDescriptor;
use crate::core::method::MethodKind;
use crate::core::types::TypeDescriptor;
use crate::core::value::PropertyValue;
use crate::interfaces::Converter;
use crate::interfaces::Processor;
use crate::interfaces::Resolver;
use crate::interfaces::VariableExpander;
use crate::processors::BASE64_DECODE_PROCESSOR;
use crate::processors::Base64DecodeProcessor;
use crate::resolvers::CachingResolver;
use crate::runtime::chain::CompositeResolver;
use crate::runtime::context::InvocationContext;
use crate::runtime::conversion::ConverterRegistry;
use crate::runtime::conversion::DEFAULT_DELIMITER;
use crate::runtime::conversion::default_converters;
use crate::runtime::expansion::DEFAULT_VARIABLE_PREFIX;
use crate::runtime::expansion::DEFAULT_VARIABLE_SUFFIX;
use crate::runtime::expansion::NoOpVariableExpander;
use crate::runtime::expansion::PatternVariableExpander;
use crate::runtime::expansion::SimpleVariableExpander;
use crate::runtime::expansion::VariablePatternError;
use crate::runtime::processing::ProcessorRegistry;
use crate::runtime::processing::RootProcessor;
use crate::runtime::typed::PropertyType;

// ============================================================================
// SECTION: Stages
// ============================================================================

/// Pipeline stage reported in tracing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionStage {
    /// Invocation accepted.
    Start,
    /// Looking the property up through the resolver chain.
    Resolving,
    /// No resolver knows the property.
    NotFound,
    /// A resolver returned a raw value.
    Resolved,
    /// Expanding placeholders in the raw value.
    Expanding,
    /// Applying processors.
    Processing,
    /// Converting to the declared return type.
    Converting,
    /// Value produced.
    Done,
    /// A stage failed.
    Failed,
}

impl ResolutionStage {
    /// Returns a stable label for the stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Resolving => "resolving",
            Self::NotFound => "not_found",
            Self::Resolved => "resolved",
            Self::Expanding => "expanding",
            Self::Processing => "processing",
            Self::Converting => "converting",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logs a failed stage and passes the error through.
fn failed(method: &str, stage: ResolutionStage, err: ResolutionError) -> ResolutionError {
    if matches!(err, ResolutionError::ResolutionFailure { .. }) {
        warn!(method, stage = %stage, error = %err, "resolver failure");
    } else {
        debug!(
            method,
            stage = %stage,
            next = %ResolutionStage::Failed,
            error = %err,
            "stage failed"
        );
    }
    err
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Root resolution engine.
///
/// # Invariants
/// - The resolver chain is a single flattened composite.
/// - Stages are immutable and shared across threads.
#[derive(Clone)]
pub struct Engine {
    /// Flattened resolver chain.
    resolver: CompositeResolver,
    /// Named processor dispatch.
    processor: RootProcessor,
    /// Placeholder expander.
    expander: Arc<dyn VariableExpander>,
    /// Ordered converters.
    converters: ConverterRegistry,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("resolvers", &self.resolver.len())
            .field("converters", &self.converters.len())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Starts building an engine.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Returns the resolver chain.
    #[must_use]
    pub const fn resolver(&self) -> &CompositeResolver {
        &self.resolver
    }

    /// Returns the root processor.
    #[must_use]
    pub const fn processor(&self) -> &RootProcessor {
        &self.processor
    }

    /// Returns the variable expander.
    #[must_use]
    pub fn expander(&self) -> &dyn VariableExpander {
        self.expander.as_ref()
    }

    /// Returns the converter registry.
    #[must_use]
    pub const fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Serves one invocation of `method` with `arguments`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when any stage fails or the arguments do
    /// not match the method kind.
    pub fn invoke(
        &self,
        method: &MethodDescriptor,
        arguments: &Arguments,
    ) -> Result<PropertyValue, ResolutionError> {
        debug!(
            method = %method.name,
            kind = method.kind.as_str(),
            stage = %ResolutionStage::Start,
            "invocation"
        );
        let ctx = InvocationContext::new(self, method, arguments);
        match method.kind {
            MethodKind::Property => {
                if !arguments.is_empty() {
                    return Err(ResolutionError::invalid_invocation(
                        &method.name,
                        "property methods take no arguments",
                    ));
                }
                let Some(property) = &method.property else {
                    return Err(ResolutionError::invalid_invocation(
                        &method.name,
                        "property method has no property name",
                    ));
                };
                self.resolve_property(&ctx, property.as_str())
            }
            MethodKind::ResolverFacade => {
                let name = facade_argument(method, arguments)?;
                self.resolve_property(&ctx, name)
            }
            MethodKind::VariableExpanderFacade => {
                let value = facade_argument(method, arguments)?;
                let expanded = ctx
                    .expand(value)
                    .map_err(|err| failed(&method.name, ResolutionStage::Expanding, err))?;
                Ok(PropertyValue::String(expanded))
            }
            MethodKind::ConverterFacade => {
                let value = facade_argument(method, arguments)?;
                ctx.convert(value, &method.return_type).map_err(|err| {
                    failed(&method.name, ResolutionStage::Converting, ResolutionError::from(err))
                })
            }
        }
    }

    /// Serves one invocation and extracts a Rust value of type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::ReturnTypeMismatch`] when `T` cannot be read
    /// from the method's declared return type, and any invocation error.
    pub fn get<T: PropertyType>(
        &self,
        method: &MethodDescriptor,
        arguments: &Arguments,
    ) -> Result<T, ResolutionError> {
        let requested = T::type_descriptor();
        let mismatch = || ResolutionError::ReturnTypeMismatch {
            method: method.name.clone(),
            declared: method.return_type.to_string(),
            requested: requested.to_string(),
        };
        if !requested.accepts(&method.return_type) {
            return Err(mismatch());
        }
        let value = self.invoke(method, arguments)?;
        T::from_property_value(value).ok_or_else(mismatch)
    }

    /// Runs the full pipeline for property `name`.
    fn resolve_property(
        &self,
        ctx: &InvocationContext<'_>,
        name: &str,
    ) -> Result<PropertyValue, ResolutionError> {
        let method = ctx.method();
        let label = method.name.as_str();
        let property = ctx
            .expand(name)
            .map_err(|err| failed(label, ResolutionStage::Resolving, err))?;
        debug!(
            method = label,
            property = %property,
            stage = %ResolutionStage::Resolving,
            "resolving property"
        );
        let raw = ctx
            .resolve_raw(&property)
            .map_err(|err| failed(label, ResolutionStage::Resolving, err))?;
        let Some(raw) = raw else {
            debug!(
                method = label,
                property = %property,
                stage = %ResolutionStage::NotFound,
                "property not found"
            );
            return fallback(method, &property);
        };
        debug!(method = label, stage = %ResolutionStage::Expanding, "expanding value");
        let expanded =
            ctx.expand(&raw).map_err(|err| failed(label, ResolutionStage::Expanding, err))?;
        debug!(method = label, stage = %ResolutionStage::Processing, "processing value");
        let processed = self
            .processor
            .process(ctx, expanded)
            .map_err(|err| failed(label, ResolutionStage::Processing, err))?;
        debug!(
            method = label,
            target = %method.return_type,
            stage = %ResolutionStage::Converting,
            "converting value"
        );
        let converted = ctx.convert(&processed, &method.return_type).map_err(|err| {
            failed(label, ResolutionStage::Converting, ResolutionError::from(err))
        })?;
        debug!(method = label, stage = %ResolutionStage::Done, "property resolved");
        Ok(converted)
    }
}

/// Returns the first argument of a facade invocation.
fn facade_argument<'a>(
    method: &MethodDescriptor,
    arguments: &'a Arguments,
) -> Result<&'a str, ResolutionError> {
    arguments.get(0).ok_or_else(|| {
        ResolutionError::invalid_invocation(&method.name, "facade methods require one argument")
    })
}

/// Applies the not-found fallback for `method`.
fn fallback(method: &MethodDescriptor, property: &str) -> Result<PropertyValue, ResolutionError> {
    if let Some(default) = &method.metadata.default_value {
        debug!(method = %method.name, property, "using declared default");
        return Ok(default.clone());
    }
    if matches!(method.return_type, TypeDescriptor::Optional(_)) {
        return Ok(PropertyValue::Optional(None));
    }
    Err(failed(&method.name, ResolutionStage::NotFound, ResolutionError::unresolved(property)))
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Errors raised while building an [`Engine`].
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineBuildError {
    /// Two processors were registered under one name.
    #[error("duplicate processor name: {0}")]
    DuplicateProcessor(ProcessorName),
    /// The default sequence delimiter is empty.
    #[error("default delimiter must not be empty")]
    InvalidDelimiter,
    /// The placeholder prefix or suffix is empty.
    #[error("variable syntax requires a non-empty prefix and suffix")]
    InvalidExpanderSyntax,
    /// The placeholder pattern has no capture group for the variable name.
    #[error("variable pattern '{0}' has no capture group")]
    InvalidExpanderPattern(String),
}

/// Expander selection recorded by the builder.
#[derive(Clone)]
enum ExpanderChoice {
    /// Simple expander with the given prefix and suffix.
    Syntax(String, String),
    /// Pattern expander; group 1 captures the variable name.
    Pattern(Regex),
    /// Caller-supplied expander.
    Custom(Arc<dyn VariableExpander>),
}

/// Builder for [`Engine`].
#[derive(Clone)]
pub struct EngineBuilder {
    /// Resolvers in registration order.
    resolvers: Vec<Arc<dyn Resolver>>,
    /// Processors in registration order.
    processors: Vec<(ProcessorName, Arc<dyn Processor>)>,
    /// Custom converters placed before the built-ins.
    converters: Vec<Arc<dyn Converter>>,
    /// Whether the built-in converters are appended.
    default_converters: bool,
    /// Default sequence delimiter.
    default_delimiter: String,
    /// Expander selection.
    expander: ExpanderChoice,
    /// Whether resolver hits are memoized.
    cache_resolved_values: bool,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    /// Creates a builder with built-in converters and `${name}` expansion.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
            processors: Vec::new(),
            converters: Vec::new(),
            default_converters: true,
            default_delimiter: DEFAULT_DELIMITER.to_string(),
            expander: ExpanderChoice::Syntax(
                DEFAULT_VARIABLE_PREFIX.to_string(),
                DEFAULT_VARIABLE_SUFFIX.to_string(),
            ),
            cache_resolved_values: false,
        }
    }

    /// Appends a resolver to the chain.
    #[must_use]
    pub fn resolver(self, resolver: impl Resolver + 'static) -> Self {
        self.shared_resolver(Arc::new(resolver))
    }

    /// Appends a shared resolver to the chain.
    #[must_use]
    pub fn shared_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    /// Registers a processor under `name`.
    #[must_use]
    pub fn processor(
        self,
        name: impl Into<ProcessorName>,
        processor: impl Processor + 'static,
    ) -> Self {
        self.shared_processor(name, Arc::new(processor))
    }

    /// Registers a shared processor under `name`.
    #[must_use]
    pub fn shared_processor(
        mut self,
        name: impl Into<ProcessorName>,
        processor: Arc<dyn Processor>,
    ) -> Self {
        self.processors.push((name.into(), processor));
        self
    }

    /// Registers the `base64-decode` processor.
    #[must_use]
    pub fn builtin_processors(self) -> Self {
        self.processor(BASE64_DECODE_PROCESSOR, Base64DecodeProcessor)
    }

    /// Adds a converter ahead of the built-ins.
    #[must_use]
    pub fn converter(mut self, converter: impl Converter + 'static) -> Self {
        self.converters.push(Arc::new(converter));
        self
    }

    /// Omits the built-in converters.
    #[must_use]
    pub const fn without_default_converters(mut self) -> Self {
        self.default_converters = false;
        self
    }

    /// Sets the default sequence delimiter.
    #[must_use]
    pub fn default_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.default_delimiter = delimiter.into();
        self
    }

    /// Sets the placeholder prefix and suffix.
    #[must_use]
    pub fn variable_syntax(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.expander = ExpanderChoice::Syntax(prefix.into(), suffix.into());
        self
    }

    /// Matches placeholders with `pattern`, whose first capture group holds
    /// the variable name.
    #[must_use]
    pub fn variable_pattern(mut self, pattern: Regex) -> Self {
        self.expander = ExpanderChoice::Pattern(pattern);
        self
    }

    /// Replaces the variable expander.
    #[must_use]
    pub fn variable_expander(mut self, expander: impl VariableExpander + 'static) -> Self {
        self.expander = ExpanderChoice::Custom(Arc::new(expander));
        self
    }

    /// Disables placeholder expansion.
    #[must_use]
    pub fn without_variable_expansion(self) -> Self {
        self.variable_expander(NoOpVariableExpander)
    }

    /// Memoizes resolver hits for the lifetime of the engine.
    #[must_use]
    pub const fn cache_resolved_values(mut self, enabled: bool) -> Self {
        self.cache_resolved_values = enabled;
        self
    }

    /// Builds the engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineBuildError`] for duplicate processor names, an empty
    /// default delimiter, empty placeholder syntax, or a placeholder pattern
    /// without a capture group.
    pub fn build(self) -> Result<Engine, EngineBuildError> {
        if self.default_delimiter.is_empty() {
            return Err(EngineBuildError::InvalidDelimiter);
        }
        let mut registry = ProcessorRegistry::new();
        for (name, processor) in self.processors {
            registry.register(name, processor).map_err(EngineBuildError::DuplicateProcessor)?;
        }
        let mut converters = self.converters;
        if self.default_converters {
            converters.extend(default_converters(&self.default_delimiter));
        }
        let expander: Arc<dyn VariableExpander> = match self.expander {
            ExpanderChoice::Syntax(prefix, suffix) => Arc::new(
                SimpleVariableExpander::new(prefix, suffix)
                    .ok_or(EngineBuildError::InvalidExpanderSyntax)?,
            ),
            ExpanderChoice::Pattern(pattern) => Arc::new(
                PatternVariableExpander::new(pattern).map_err(|err| match err {
                    VariablePatternError::MissingCaptureGroup(pattern) => {
                        EngineBuildError::InvalidExpanderPattern(pattern)
                    }
                    VariablePatternError::Regex(err) => {
                        EngineBuildError::InvalidExpanderPattern(err.to_string())
                    }
                })?,
            ),
            ExpanderChoice::Custom(expander) => expander,
        };
        let chain = CompositeResolver::new(self.resolvers);
        let resolver = if self.cache_resolved_values {
            let cached: Arc<dyn Resolver> = Arc::new(CachingResolver::new(Arc::new(chain)));
            CompositeResolver::new([cached])
        } else {
            chain
        };
        Ok(Engine {
            resolver,
            processor: RootProcessor::new(registry),
            expander,
            converters: ConverterRegistry::new(converters),
        })
    }
}
