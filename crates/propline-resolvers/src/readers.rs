// crates/propline-resolvers/src/readers.rs
// ============================================================================
// Module: Resource Readers
// Description: Parsers turning resource documents into JSON trees.
// Purpose: Give every resource format one tree shape for flattening.
// Dependencies: java-properties, serde, serde_json, serde_yaml, toml
// ============================================================================

//! ## Overview
//! A [`ResourceReader`] parses document text into a [`serde_json::Value`].
//! The resource resolver flattens that tree into dotted keys, so readers only
//! need to preserve structure. YAML mapping keys that are numbers or booleans
//! are stringified; TOML date-times become their RFC 3339 text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use propline_core::ResolverError;
use serde::Deserialize;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;

// ============================================================================
// SECTION: Reader Trait
// ============================================================================

/// Parser for one resource document format.
pub trait ResourceReader: Send + Sync {
    /// Parses `content` into a tree.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Backend`] when the document is malformed.
    fn read(&self, content: &str) -> Result<Value, ResolverError>;
}

// ============================================================================
// SECTION: Formats
// ============================================================================

/// Built-in resource document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceFormat {
    /// JSON documents.
    Json,
    /// YAML documents.
    Yaml,
    /// TOML documents.
    Toml,
    /// Java-style `.properties` documents.
    Properties,
}

impl ResourceFormat {
    /// Infers the format from a file extension.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "properties" => Some(Self::Properties),
            _ => None,
        }
    }

    /// Returns the reader for this format.
    #[must_use]
    pub fn reader(self) -> Box<dyn ResourceReader> {
        match self {
            Self::Json => Box::new(JsonReader),
            Self::Yaml => Box::new(YamlReader),
            Self::Toml => Box::new(TomlReader),
            Self::Properties => Box::new(PropertiesReader),
        }
    }

    /// Returns the lowercase format label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Properties => "properties",
        }
    }
}

// ============================================================================
// SECTION: Readers
// ============================================================================

/// Reader for JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReader;

impl ResourceReader for JsonReader {
    fn read(&self, content: &str) -> Result<Value, ResolverError> {
        serde_json::from_str(content)
            .map_err(|err| ResolverError::backend_with_source("invalid json resource", err))
    }
}

/// Reader for YAML documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlReader;

impl ResourceReader for YamlReader {
    fn read(&self, content: &str) -> Result<Value, ResolverError> {
        if content.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        let parsed: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|err| ResolverError::backend_with_source("invalid yaml resource", err))?;
        yaml_to_json(parsed)
    }
}

/// Reader for TOML documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlReader;

impl ResourceReader for TomlReader {
    fn read(&self, content: &str) -> Result<Value, ResolverError> {
        let table: toml::Table = toml::from_str(content)
            .map_err(|err| ResolverError::backend_with_source("invalid toml resource", err))?;
        Ok(toml_to_json(toml::Value::Table(table)))
    }
}

/// Reader for Java-style `.properties` documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesReader;

impl ResourceReader for PropertiesReader {
    fn read(&self, content: &str) -> Result<Value, ResolverError> {
        let properties = java_properties::read(content.as_bytes()).map_err(|err| {
            ResolverError::backend_with_source("invalid properties resource", err)
        })?;
        Ok(Value::Object(
            properties.into_iter().map(|(key, value)| (key, Value::String(value))).collect(),
        ))
    }
}

// ============================================================================
// SECTION: Tree Conversion
// ============================================================================

/// Converts a YAML tree into a JSON tree.
fn yaml_to_json(value: serde_yaml::Value) -> Result<Value, ResolverError> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(flag) => Value::Bool(flag),
        serde_yaml::Value::Number(number) => yaml_number(&number),
        serde_yaml::Value::String(text) => Value::String(text),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect::<Result<_, _>>()?)
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut object = Map::new();
            for (key, value) in mapping {
                object.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

/// Converts a YAML number, keeping integers exact.
fn yaml_number(number: &serde_yaml::Number) -> Value {
    if let Some(int) = number.as_i64() {
        return Value::from(int);
    }
    if let Some(uint) = number.as_u64() {
        return Value::from(uint);
    }
    number
        .as_f64()
        .and_then(Number::from_f64)
        .map_or_else(|| Value::String(number.to_string()), Value::Number)
}

/// Stringifies a scalar YAML mapping key.
fn yaml_key(key: serde_yaml::Value) -> Result<String, ResolverError> {
    match key {
        serde_yaml::Value::String(text) => Ok(text),
        serde_yaml::Value::Bool(flag) => Ok(flag.to_string()),
        serde_yaml::Value::Number(number) => Ok(number.to_string()),
        _ => Err(ResolverError::backend("yaml mapping keys must be scalars")),
    }
}

/// Converts a TOML tree into a JSON tree.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(text) => Value::String(text),
        toml::Value::Integer(int) => Value::from(int),
        toml::Value::Float(float) => Number::from_f64(float)
            .map_or_else(|| Value::String(float.to_string()), Value::Number),
        toml::Value::Boolean(flag) => Value::Bool(flag),
        toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table.into_iter().map(|(key, value)| (key, toml_to_json(value))).collect(),
        ),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
