// crates/propline-core/src/core/value.rs
// ============================================================================
// Module: Propline Property Values
// Description: Typed results produced by the conversion stage.
// Purpose: Carry converted values back to callers without type erasure loss.
// Dependencies: regex, time, uuid
// ============================================================================

//! ## Overview
//! [`PropertyValue`] mirrors [`TypeDescriptor`]: every descriptor has exactly
//! one value variant, and [`PropertyValue::conforms_to`] checks that pairing.
//! User-defined converters return [`CustomValue`], a shared type-erased payload.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use time::Date;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::Time;
use uuid::Uuid;

use crate::core::types::TypeDescriptor;

// ============================================================================
// SECTION: Custom Values
// ============================================================================

/// Type-erased value produced by a user-registered converter.
///
/// # Invariants
/// - `type_name` matches the [`TypeDescriptor::Custom`] name it was produced for.
/// - Equality is identity of the shared payload.
#[derive(Clone)]
pub struct CustomValue {
    /// Custom type name.
    type_name: String,
    /// Shared payload.
    payload: Arc<dyn Any + Send + Sync>,
}

impl CustomValue {
    /// Wraps `payload` as a value of custom type `type_name`.
    pub fn new<T>(type_name: impl Into<String>, payload: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            type_name: type_name.into(),
            payload: Arc::new(payload),
        }
    }

    /// Returns the custom type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the payload when it has concrete type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValue").field("type_name", &self.type_name).finish_non_exhaustive()
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && Arc::ptr_eq(&self.payload, &other.payload)
    }
}

// ============================================================================
// SECTION: Property Values
// ============================================================================

/// Converted property value.
#[derive(Debug, Clone)]
pub enum PropertyValue {
    /// UTF-8 string.
    String(String),
    /// Boolean.
    Bool(bool),
    /// Single character.
    Char(char),
    /// 8-bit signed integer.
    I8(i8),
    /// 16-bit signed integer.
    I16(i16),
    /// 32-bit signed integer.
    I32(i32),
    /// 64-bit signed integer.
    I64(i64),
    /// 128-bit signed integer.
    I128(i128),
    /// Pointer-sized signed integer.
    Isize(isize),
    /// 8-bit unsigned integer.
    U8(u8),
    /// 16-bit unsigned integer.
    U16(u16),
    /// 32-bit unsigned integer.
    U32(u32),
    /// 64-bit unsigned integer.
    U64(u64),
    /// 128-bit unsigned integer.
    U128(u128),
    /// Pointer-sized unsigned integer.
    Usize(usize),
    /// 32-bit float.
    F32(f32),
    /// 64-bit float.
    F64(f64),
    /// UUID.
    Uuid(Uuid),
    /// Filesystem path.
    Path(PathBuf),
    /// Span of time.
    Duration(Duration),
    /// Calendar date.
    Date(Date),
    /// Wall-clock time.
    Time(Time),
    /// Date and time without offset.
    DateTime(PrimitiveDateTime),
    /// Date and time with offset.
    OffsetDateTime(OffsetDateTime),
    /// Compiled regular expression.
    Regex(Regex),
    /// Enumeration constant name.
    Enum(String),
    /// Array elements.
    Array(Vec<Self>),
    /// List elements.
    List(Vec<Self>),
    /// Set elements in first-occurrence order.
    Set(Vec<Self>),
    /// Optional value; `None` when the property was absent.
    Optional(Option<Box<Self>>),
    /// User-defined value.
    Custom(CustomValue),
}

impl PropertyValue {
    /// Returns a short name of the variant for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Char(_) => "char",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::I128(_) => "i128",
            Self::Isize(_) => "isize",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::U128(_) => "u128",
            Self::Usize(_) => "usize",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Uuid(_) => "uuid",
            Self::Path(_) => "path",
            Self::Duration(_) => "duration",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::DateTime(_) => "datetime",
            Self::OffsetDateTime(_) => "offset_datetime",
            Self::Regex(_) => "regex",
            Self::Enum(_) => "enum",
            Self::Array(_) => "array",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Optional(_) => "optional",
            Self::Custom(_) => "custom",
        }
    }

    /// Returns true when this value is a valid result for `descriptor`.
    #[must_use]
    pub fn conforms_to(&self, descriptor: &TypeDescriptor) -> bool {
        match (self, descriptor) {
            (Self::String(_), TypeDescriptor::String)
            | (Self::Bool(_), TypeDescriptor::Bool)
            | (Self::Char(_), TypeDescriptor::Char)
            | (Self::I8(_), TypeDescriptor::I8)
            | (Self::I16(_), TypeDescriptor::I16)
            | (Self::I32(_), TypeDescriptor::I32)
            | (Self::I64(_), TypeDescriptor::I64)
            | (Self::I128(_), TypeDescriptor::I128)
            | (Self::Isize(_), TypeDescriptor::Isize)
            | (Self::U8(_), TypeDescriptor::U8)
            | (Self::U16(_), TypeDescriptor::U16)
            | (Self::U32(_), TypeDescriptor::U32)
            | (Self::U64(_), TypeDescriptor::U64)
            | (Self::U128(_), TypeDescriptor::U128)
            | (Self::Usize(_), TypeDescriptor::Usize)
            | (Self::F32(_), TypeDescriptor::F32)
            | (Self::F64(_), TypeDescriptor::F64)
            | (Self::Uuid(_), TypeDescriptor::Uuid)
            | (Self::Path(_), TypeDescriptor::Path)
            | (Self::Duration(_), TypeDescriptor::Duration)
            | (Self::Date(_), TypeDescriptor::Date)
            | (Self::Time(_), TypeDescriptor::Time)
            | (Self::DateTime(_), TypeDescriptor::DateTime)
            | (Self::OffsetDateTime(_), TypeDescriptor::OffsetDateTime)
            | (Self::Regex(_), TypeDescriptor::Regex) => true,
            (Self::Enum(name), TypeDescriptor::Enum(enum_type)) => enum_type.contains(name),
            (Self::Array(items), TypeDescriptor::Array(element))
            | (Self::List(items), TypeDescriptor::List(element))
            | (Self::Set(items), TypeDescriptor::Set(element)) => {
                items.iter().all(|item| item.conforms_to(element))
            }
            (Self::Optional(inner), TypeDescriptor::Optional(element)) => {
                inner.as_ref().is_none_or(|value| value.conforms_to(element))
            }
            (Self::Custom(custom), TypeDescriptor::Custom(name)) => custom.type_name() == name,
            _ => false,
        }
    }

    /// Returns the string payload for string values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) | Self::Enum(value) => Some(value),
            _ => None,
        }
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) | (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::I128(a), Self::I128(b)) => a == b,
            (Self::Isize(a), Self::Isize(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::U128(a), Self::U128(b)) => a == b,
            (Self::Usize(a), Self::Usize(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a.to_bits() == b.to_bits(),
            (Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits(),
            (Self::Uuid(a), Self::Uuid(b)) => a == b,
            (Self::Path(a), Self::Path(b)) => a == b,
            (Self::Duration(a), Self::Duration(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::OffsetDateTime(a), Self::OffsetDateTime(b)) => a == b,
            (Self::Regex(a), Self::Regex(b)) => a.as_str() == b.as_str(),
            (Self::Array(a), Self::Array(b))
            | (Self::List(a), Self::List(b))
            | (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Optional(a), Self::Optional(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) | Self::Enum(value) => f.write_str(value),
            Self::Bool(value) => value.fmt(f),
            Self::Char(value) => value.fmt(f),
            Self::I8(value) => value.fmt(f),
            Self::I16(value) => value.fmt(f),
            Self::I32(value) => value.fmt(f),
            Self::I64(value) => value.fmt(f),
            Self::I128(value) => value.fmt(f),
            Self::Isize(value) => value.fmt(f),
            Self::U8(value) => value.fmt(f),
            Self::U16(value) => value.fmt(f),
            Self::U32(value) => value.fmt(f),
            Self::U64(value) => value.fmt(f),
            Self::U128(value) => value.fmt(f),
            Self::Usize(value) => value.fmt(f),
            Self::F32(value) => value.fmt(f),
            Self::F64(value) => value.fmt(f),
            Self::Uuid(value) => value.fmt(f),
            Self::Path(value) => value.display().fmt(f),
            Self::Duration(value) => fmt_duration(*value, f),
            Self::Date(value) => value.fmt(f),
            Self::Time(value) => value.fmt(f),
            Self::DateTime(value) => value.fmt(f),
            Self::OffsetDateTime(value) => value.fmt(f),
            Self::Regex(value) => f.write_str(value.as_str()),
            Self::Array(items) | Self::List(items) | Self::Set(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt(f)?;
                }
                f.write_str("]")
            }
            Self::Optional(Some(inner)) => inner.fmt(f),
            Self::Optional(None) => f.write_str("<none>"),
            Self::Custom(custom) => write!(f, "<{}>", custom.type_name()),
        }
    }
}

/// Formats a duration as seconds with nanosecond precision when needed.
fn fmt_duration(value: Duration, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let nanos = value.subsec_nanos();
    if nanos == 0 {
        write!(f, "{}s", value.as_secs())
    } else {
        write!(f, "{}.{nanos:09}s", value.as_secs())
    }
}
