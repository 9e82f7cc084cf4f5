// crates/propline-core/src/core/types.rs
// ============================================================================
// Module: Propline Type Descriptors
// Description: Runtime descriptions of conversion targets.
// Purpose: Tell converters which type a method expects without reflection.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A [`TypeDescriptor`] names the type a method returns. Container descriptors
//! (`array`, `list`, `set`, `optional`) wrap an element descriptor, so nested
//! conversions always recurse into a strictly smaller descriptor.
//! Descriptors round-trip through a compact textual form used by the CLI and
//! configuration files, e.g. `list<i32>`, `optional<uuid>`,
//! `enum:Color(Red|Green)`, `custom:Money`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ============================================================================
// SECTION: Enumerations
// ============================================================================

/// Declared enumeration: a type name plus its constant names.
///
/// # Invariants
/// - Variant matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    /// Enumeration type name used in diagnostics.
    name: String,
    /// Declared constant names in declaration order.
    variants: Vec<String>,
}

impl EnumType {
    /// Creates an enumeration descriptor.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the enumeration type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared constant names.
    #[must_use]
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Returns true when `candidate` names a declared constant.
    #[must_use]
    pub fn contains(&self, candidate: &str) -> bool {
        self.variants.iter().any(|variant| variant == candidate)
    }
}

// ============================================================================
// SECTION: Type Descriptors
// ============================================================================

/// Conversion target declared by a method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// UTF-8 string.
    String,
    /// Boolean (`true` / `false`).
    Bool,
    /// Single Unicode scalar.
    Char,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 128-bit signed integer.
    I128,
    /// Pointer-sized signed integer.
    Isize,
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit unsigned integer.
    U64,
    /// 128-bit unsigned integer.
    U128,
    /// Pointer-sized unsigned integer.
    Usize,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// UUID in canonical textual form.
    Uuid,
    /// Filesystem path (no existence check).
    Path,
    /// Span of time.
    Duration,
    /// Calendar date.
    Date,
    /// Wall-clock time.
    Time,
    /// Date and time without offset.
    DateTime,
    /// Date and time with UTC offset.
    OffsetDateTime,
    /// Compiled regular expression.
    Regex,
    /// Declared enumeration.
    Enum(EnumType),
    /// Fixed-order sequence (array semantics).
    Array(Box<Self>),
    /// Ordered sequence.
    List(Box<Self>),
    /// Sequence without duplicates, first occurrence order.
    Set(Box<Self>),
    /// Possibly absent value.
    Optional(Box<Self>),
    /// Type handled only by user-registered converters.
    Custom(String),
}

impl TypeDescriptor {
    /// Returns an array descriptor over `element`.
    #[must_use]
    pub fn array(element: Self) -> Self {
        Self::Array(Box::new(element))
    }

    /// Returns a list descriptor over `element`.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::List(Box::new(element))
    }

    /// Returns a set descriptor over `element`.
    #[must_use]
    pub fn set(element: Self) -> Self {
        Self::Set(Box::new(element))
    }

    /// Returns an optional descriptor over `inner`.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Returns the element descriptor of a sequence descriptor.
    #[must_use]
    pub fn element_type(&self) -> Option<&Self> {
        match self {
            Self::Array(element) | Self::List(element) | Self::Set(element) => Some(element),
            _ => None,
        }
    }

    /// Returns true for array, list, and set descriptors.
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::Array(_) | Self::List(_) | Self::Set(_))
    }

    /// Returns true for optional descriptors.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Returns true when a value produced for `declared` can be read as `self`.
    ///
    /// Equal descriptors are compatible; a list may also be read from an array
    /// with compatible elements.
    #[must_use]
    pub fn accepts(&self, declared: &Self) -> bool {
        match (self, declared) {
            (Self::List(wanted), Self::List(have) | Self::Array(have))
            | (Self::Array(wanted), Self::Array(have))
            | (Self::Set(wanted), Self::Set(have))
            | (Self::Optional(wanted), Self::Optional(have)) => wanted.accepts(have),
            _ => self == declared,
        }
    }

    /// Returns the keyword for scalar descriptors.
    const fn scalar_keyword(&self) -> Option<&'static str> {
        let keyword = match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Uuid => "uuid",
            Self::Path => "path",
            Self::Duration => "duration",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::OffsetDateTime => "offset_datetime",
            Self::Regex => "regex",
            _ => return None,
        };
        Some(keyword)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(keyword) = self.scalar_keyword() {
            return f.write_str(keyword);
        }
        match self {
            Self::Enum(enum_type) => {
                write!(f, "enum:{}({})", enum_type.name, enum_type.variants.join("|"))
            }
            Self::Array(element) => write!(f, "array<{element}>"),
            Self::List(element) => write!(f, "list<{element}>"),
            Self::Set(element) => write!(f, "set<{element}>"),
            Self::Optional(inner) => write!(f, "optional<{inner}>"),
            Self::Custom(name) => write!(f, "custom:{name}"),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Error returned when a textual type descriptor is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid type descriptor '{input}': {reason}")]
pub struct TypeDescriptorParseError {
    /// Descriptor text that failed to parse.
    pub input: String,
    /// Human-readable failure reason.
    pub reason: String,
}

impl TypeDescriptorParseError {
    /// Builds a parse error for `input`.
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Scalar keywords accepted by the textual form.
const SCALARS: [TypeDescriptor; 25] = [
    TypeDescriptor::String,
    TypeDescriptor::Bool,
    TypeDescriptor::Char,
    TypeDescriptor::I8,
    TypeDescriptor::I16,
    TypeDescriptor::I32,
    TypeDescriptor::I64,
    TypeDescriptor::I128,
    TypeDescriptor::Isize,
    TypeDescriptor::U8,
    TypeDescriptor::U16,
    TypeDescriptor::U32,
    TypeDescriptor::U64,
    TypeDescriptor::U128,
    TypeDescriptor::Usize,
    TypeDescriptor::F32,
    TypeDescriptor::F64,
    TypeDescriptor::Uuid,
    TypeDescriptor::Path,
    TypeDescriptor::Duration,
    TypeDescriptor::Date,
    TypeDescriptor::Time,
    TypeDescriptor::DateTime,
    TypeDescriptor::OffsetDateTime,
    TypeDescriptor::Regex,
];

impl FromStr for TypeDescriptor {
    type Err = TypeDescriptorParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let text = input.trim();
        if text.is_empty() {
            return Err(TypeDescriptorParseError::new(input, "descriptor is empty"));
        }
        if let Some(scalar) = SCALARS.iter().find(|scalar| scalar.scalar_keyword() == Some(text)) {
            return Ok(scalar.clone());
        }
        if let Some(rest) = text.strip_prefix("enum:") {
            return parse_enum(input, rest);
        }
        if let Some(name) = text.strip_prefix("custom:") {
            if name.trim().is_empty() {
                return Err(TypeDescriptorParseError::new(input, "custom type name is empty"));
            }
            return Ok(Self::Custom(name.trim().to_string()));
        }
        let Some((head, tail)) = text.split_once('<') else {
            return Err(TypeDescriptorParseError::new(input, "unknown type keyword"));
        };
        let Some(inner) = tail.strip_suffix('>') else {
            return Err(TypeDescriptorParseError::new(input, "missing closing '>'"));
        };
        let inner: Self = inner.parse()?;
        match head.trim() {
            "array" => Ok(Self::array(inner)),
            "list" => Ok(Self::list(inner)),
            "set" => Ok(Self::set(inner)),
            "optional" => Ok(Self::optional(inner)),
            _ => Err(TypeDescriptorParseError::new(input, "unknown container keyword")),
        }
    }
}

/// Parses the `Name(A|B|C)` tail of an enum descriptor.
fn parse_enum(input: &str, rest: &str) -> Result<TypeDescriptor, TypeDescriptorParseError> {
    let Some((name, variants)) = rest.split_once('(') else {
        return Err(TypeDescriptorParseError::new(input, "enum requires '(' variant list"));
    };
    let Some(variants) = variants.strip_suffix(')') else {
        return Err(TypeDescriptorParseError::new(input, "enum variant list missing ')'"));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(TypeDescriptorParseError::new(input, "enum name is empty"));
    }
    let variants: Vec<&str> = variants.split('|').map(str::trim).collect();
    if variants.iter().any(|variant| variant.is_empty()) {
        return Err(TypeDescriptorParseError::new(input, "enum variant names must not be empty"));
    }
    Ok(TypeDescriptor::Enum(EnumType::new(name, variants)))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
