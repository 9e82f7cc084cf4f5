// crates/propline-core/src/core/method.rs
// ============================================================================
// Module: Propline Method Descriptors
// Description: Declarative description of a property method and its call.
// Purpose: Replace runtime reflection with explicit descriptor tables.
// Dependencies: propline-core::core
// ============================================================================

//! ## Overview
//! A [`MethodDescriptor`] is the unit the engine dispatches on. It declares the
//! property name, return type, and metadata that drive processing and
//! conversion. Descriptors are built once, usually through a
//! [`crate::MethodTableBuilder`], and shared read-only afterwards.
//! Invariants:
//! - Property methods take no parameters.
//! - Facade methods take exactly one string parameter.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::identifiers::ProcessorName;
use crate::core::identifiers::PropertyName;
use crate::core::types::TypeDescriptor;
use crate::core::value::PropertyValue;

// ============================================================================
// SECTION: Method Kinds
// ============================================================================

/// Dispatch category of a declared method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// Resolves, expands, processes, and converts the named property.
    Property,
    /// Expands variables in its single string argument.
    VariableExpanderFacade,
    /// Resolves the property named by its single string argument.
    ResolverFacade,
    /// Converts its single string argument to the declared return type.
    ConverterFacade,
}

impl MethodKind {
    /// Returns true for the facade kinds.
    #[must_use]
    pub const fn is_facade(self) -> bool {
        !matches!(self, Self::Property)
    }

    /// Returns a stable label for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::VariableExpanderFacade => "variable_expander_facade",
            Self::ResolverFacade => "resolver_facade",
            Self::ConverterFacade => "converter_facade",
        }
    }
}

// ============================================================================
// SECTION: Metadata
// ============================================================================

/// Processor requested by a method, with its optional argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessorDirective {
    /// Registered processor name.
    pub processor: ProcessorName,
    /// Processor-specific argument, e.g. an encoding variant.
    pub argument: Option<String>,
}

impl ProcessorDirective {
    /// Creates a directive without an argument.
    #[must_use]
    pub fn new(processor: impl Into<ProcessorName>) -> Self {
        Self {
            processor: processor.into(),
            argument: None,
        }
    }

    /// Attaches an argument to the directive.
    #[must_use]
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = Some(argument.into());
        self
    }
}

/// Per-method annotations consulted by processors and converters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodMetadata {
    /// Sequence delimiter override; `None` uses the converter default.
    pub delimiter: Option<String>,
    /// Drops empty tokens when splitting sequences.
    pub strip_empty_values: bool,
    /// Custom `time` format description for temporal targets.
    pub date_time_format: Option<String>,
    /// Processors applied in declaration order.
    pub processors: Vec<ProcessorDirective>,
    /// Value used when no resolver knows the property.
    pub default_value: Option<PropertyValue>,
}

/// Declared parameter of a facade method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterDescriptor {
    /// Parameter name for diagnostics.
    pub name: String,
    /// Parameter type.
    pub type_descriptor: TypeDescriptor,
}

impl ParameterDescriptor {
    /// Creates a parameter descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, type_descriptor: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            type_descriptor,
        }
    }
}

// ============================================================================
// SECTION: Method Descriptors
// ============================================================================

/// Declarative description of one property method.
///
/// # Invariants
/// - `property` is present exactly when `kind` is [`MethodKind::Property`].
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    /// Method name used as the invocation key.
    pub name: String,
    /// Dispatch category.
    pub kind: MethodKind,
    /// Property name for property methods.
    pub property: Option<PropertyName>,
    /// Declared return type.
    pub return_type: TypeDescriptor,
    /// Declared parameters.
    pub parameters: Vec<ParameterDescriptor>,
    /// Processing and conversion metadata.
    pub metadata: MethodMetadata,
}

impl MethodDescriptor {
    /// Declares a property method.
    #[must_use]
    pub fn property(
        name: impl Into<String>,
        property: PropertyName,
        return_type: TypeDescriptor,
    ) -> Self {
        Self {
            name: name.into(),
            kind: MethodKind::Property,
            property: Some(property),
            return_type,
            parameters: Vec::new(),
            metadata: MethodMetadata::default(),
        }
    }

    /// Declares a variable expander facade.
    #[must_use]
    pub fn variable_expander(name: impl Into<String>) -> Self {
        Self::facade(name, MethodKind::VariableExpanderFacade, TypeDescriptor::String, "value")
    }

    /// Declares a resolver facade returning `return_type`.
    #[must_use]
    pub fn resolver_facade(name: impl Into<String>, return_type: TypeDescriptor) -> Self {
        Self::facade(name, MethodKind::ResolverFacade, return_type, "property")
    }

    /// Declares a converter facade returning `return_type`.
    #[must_use]
    pub fn converter_facade(name: impl Into<String>, return_type: TypeDescriptor) -> Self {
        Self::facade(name, MethodKind::ConverterFacade, return_type, "value")
    }

    /// Builds a facade descriptor with one string parameter.
    fn facade(
        name: impl Into<String>,
        kind: MethodKind,
        return_type: TypeDescriptor,
        parameter: &str,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            property: None,
            return_type,
            parameters: vec![ParameterDescriptor::new(parameter, TypeDescriptor::String)],
            metadata: MethodMetadata::default(),
        }
    }

    /// Overrides the sequence delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.metadata.delimiter = Some(delimiter.into());
        self
    }

    /// Sets whether empty sequence tokens are dropped.
    #[must_use]
    pub const fn with_strip_empty_values(mut self, strip: bool) -> Self {
        self.metadata.strip_empty_values = strip;
        self
    }

    /// Sets a custom temporal format description.
    #[must_use]
    pub fn with_date_time_format(mut self, format: impl Into<String>) -> Self {
        self.metadata.date_time_format = Some(format.into());
        self
    }

    /// Appends a processor directive.
    #[must_use]
    pub fn with_processor(mut self, directive: ProcessorDirective) -> Self {
        self.metadata.processors.push(directive);
        self
    }

    /// Sets the default value used when the property is not found.
    #[must_use]
    pub fn with_default(mut self, value: PropertyValue) -> Self {
        self.metadata.default_value = Some(value);
        self
    }

    /// Appends a declared parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Returns the sequence delimiter override, if any.
    #[must_use]
    pub fn delimiter(&self) -> Option<&str> {
        self.metadata.delimiter.as_deref()
    }

    /// Returns the custom temporal format, if any.
    #[must_use]
    pub fn date_time_format(&self) -> Option<&str> {
        self.metadata.date_time_format.as_deref()
    }
}

// ============================================================================
// SECTION: Arguments
// ============================================================================

/// Runtime arguments of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Arguments(Vec<String>);

impl Arguments {
    /// Returns an empty argument list.
    #[must_use]
    pub const fn none() -> Self {
        Self(Vec::new())
    }

    /// Wraps the given arguments.
    #[must_use]
    pub const fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    /// Returns a single-argument list.
    #[must_use]
    pub fn single(value: impl Into<String>) -> Self {
        Self(vec![value.into()])
    }

    /// Returns the argument at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Returns the number of arguments.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no arguments were passed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the arguments as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
