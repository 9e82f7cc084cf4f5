// crates/propline-core/src/runtime/typed.rs
// ============================================================================
// Module: Propline Typed Access
// Description: Bridge between Rust types and type descriptors.
// Purpose: Let callers read converted values as concrete Rust types.
// Dependencies: regex, time, uuid
// ============================================================================

//! ## Overview
//! [`PropertyType`] names the descriptor a Rust type corresponds to and pulls
//! the matching payload back out of a [`PropertyValue`]. Typed access first
//! checks the descriptor against the method's declared return type, so a
//! mismatch is reported before any resolution happens.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::collections::HashSet;
use std::hash::BuildHasher;
use std::hash::Hash;
use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;
use time::Date;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::Time;
use uuid::Uuid;

use crate::core::types::TypeDescriptor;
use crate::core::value::PropertyValue;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Rust type readable from a converted property value.
pub trait PropertyType: Sized {
    /// Descriptor this type is converted from.
    fn type_descriptor() -> TypeDescriptor;

    /// Extracts the payload; `None` when the variant does not match.
    fn from_property_value(value: PropertyValue) -> Option<Self>;
}

/// Implements [`PropertyType`] for scalars with a one-to-one variant.
macro_rules! scalar_property_type {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl PropertyType for $ty {
                fn type_descriptor() -> TypeDescriptor {
                    TypeDescriptor::$variant
                }

                fn from_property_value(value: PropertyValue) -> Option<Self> {
                    match value {
                        PropertyValue::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )+
    };
}

scalar_property_type! {
    String => String,
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    Uuid => Uuid,
    PathBuf => Path,
    Duration => Duration,
    Date => Date,
    Time => Time,
    PrimitiveDateTime => DateTime,
    OffsetDateTime => OffsetDateTime,
    Regex => Regex,
}

// ============================================================================
// SECTION: Containers
// ============================================================================

/// Converts every element, failing when any element does not match.
fn collect_items<T: PropertyType, C: FromIterator<T>>(items: Vec<PropertyValue>) -> Option<C> {
    items.into_iter().map(T::from_property_value).collect()
}

impl<T: PropertyType> PropertyType for Vec<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::list(T::type_descriptor())
    }

    fn from_property_value(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::List(items) | PropertyValue::Array(items) => collect_items(items),
            _ => None,
        }
    }
}

impl<T: PropertyType + Ord> PropertyType for BTreeSet<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::set(T::type_descriptor())
    }

    fn from_property_value(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Set(items) => collect_items(items),
            _ => None,
        }
    }
}

impl<T, S> PropertyType for HashSet<T, S>
where
    T: PropertyType + Eq + Hash,
    S: BuildHasher + Default,
{
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::set(T::type_descriptor())
    }

    fn from_property_value(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Set(items) => collect_items(items),
            _ => None,
        }
    }
}

impl<T: PropertyType> PropertyType for Option<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::optional(T::type_descriptor())
    }

    fn from_property_value(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Optional(None) => Some(None),
            PropertyValue::Optional(Some(inner)) => T::from_property_value(*inner).map(Some),
            _ => None,
        }
    }
}
