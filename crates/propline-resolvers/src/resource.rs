// crates/propline-resolvers/src/resource.rs
// ============================================================================
// Module: Resource Resolver
// Description: Resolver over a flattened resource document.
// Purpose: Serve properties from files or URLs in any supported format.
// Dependencies: propline-core, serde, serde_json, tracing
// ============================================================================

//! ## Overview
//! A resource is read once, parsed by a [`ResourceReader`], and flattened into
//! dotted keys: nested objects join with `.`, array items append `[i]`.
//! Strings are kept, other scalars are stringified, and nulls or empty arrays
//! become empty strings. The raw document text is also served under the
//! resource's source (its path or URL).
//! Invariants:
//! - Resources larger than the configured limit are rejected before parsing.
//! - The document root must be a mapping.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use propline_core::InvocationContext;
use propline_core::Resolver;
use propline_core::ResolverError;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::http::HttpFetchConfig;
use crate::http::fetch_text;
use crate::readers::ResourceFormat;
use crate::readers::ResourceReader;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default upper bound on resource size, in bytes.
pub const DEFAULT_MAX_RESOURCE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Declarative settings for a resource resolver.
///
/// # Invariants
/// - Exactly one of `path` and `url` is set.
/// - `format` is required for URLs and for paths without a known extension.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceResolverConfig {
    /// Local file to read.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// URL to fetch.
    #[serde(default)]
    pub url: Option<String>,
    /// Document format; inferred from the path extension when absent.
    #[serde(default)]
    pub format: Option<ResourceFormat>,
    /// Maximum file size, in bytes.
    #[serde(default = "default_max_resource_bytes")]
    pub max_bytes: usize,
    /// Fetch policy for URLs.
    #[serde(default)]
    pub http: HttpFetchConfig,
}

/// Returns the default resource size limit.
const fn default_max_resource_bytes() -> usize {
    DEFAULT_MAX_RESOURCE_BYTES
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolver over a flattened resource document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceResolver {
    /// Where the document came from.
    source: String,
    /// Flattened values keyed by dotted path.
    values: BTreeMap<String, String>,
}

impl ResourceResolver {
    /// Parses `content` with `reader` and flattens it.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Backend`] when the document is malformed or its
    /// root is not a mapping.
    pub fn from_content(
        source: impl Into<String>,
        content: &str,
        reader: &dyn ResourceReader,
    ) -> Result<Self, ResolverError> {
        let source = source.into();
        let tree = reader.read(content)?;
        if !tree.is_object() {
            return Err(ResolverError::backend(format!(
                "resource root must be a mapping: {source}"
            )));
        }
        let mut values = flatten(tree)?;
        values.insert(source.clone(), content.to_string());
        debug!(source = %source, properties = values.len(), "loaded resource");
        Ok(Self {
            source,
            values,
        })
    }

    /// Reads a local file with `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Io`] when the file cannot be read and
    /// [`ResolverError::Backend`] when it is oversized or malformed.
    pub fn from_path(
        path: &Path,
        reader: &dyn ResourceReader,
        max_bytes: usize,
    ) -> Result<Self, ResolverError> {
        let content = read_file_limited(path, max_bytes)?;
        Self::from_content(path.display().to_string(), &content, reader)
    }

    /// Fetches a URL with `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Backend`] when the fetch violates policy, fails,
    /// or the document is malformed.
    pub fn from_url(
        url: &str,
        reader: &dyn ResourceReader,
        config: &HttpFetchConfig,
    ) -> Result<Self, ResolverError> {
        let content = fetch_text(url, config)?;
        Self::from_content(url, &content, reader)
    }

    /// Builds a resolver from declarative settings.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Backend`] when the settings are inconsistent,
    /// plus any loading error.
    pub fn from_config(config: &ResourceResolverConfig) -> Result<Self, ResolverError> {
        match (&config.path, &config.url) {
            (Some(path), None) => {
                let format = config
                    .format
                    .or_else(|| ResourceFormat::from_extension(path))
                    .ok_or_else(|| {
                        ResolverError::backend(format!(
                            "cannot infer resource format for {}",
                            path.display()
                        ))
                    })?;
                Self::from_path(path, format.reader().as_ref(), config.max_bytes)
            }
            (None, Some(url)) => {
                let format = config
                    .format
                    .ok_or_else(|| ResolverError::backend("url resources require a format"))?;
                let mut http = config.http.clone();
                http.max_response_bytes = http.max_response_bytes.min(config.max_bytes);
                Self::from_url(url, format.reader().as_ref(), &http)
            }
            _ => Err(ResolverError::backend("resource requires exactly one of path or url")),
        }
    }

    /// Returns the resource source (path or URL).
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the flattened values.
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

impl Resolver for ResourceResolver {
    fn resolve(
        &self,
        _ctx: &InvocationContext<'_>,
        name: &str,
    ) -> Result<Option<String>, ResolverError> {
        Ok(self.values.get(name).cloned())
    }
}

// ============================================================================
// SECTION: Flattening
// ============================================================================

/// Flattens `value` under `key` into `out`.
fn flatten_into(out: &mut BTreeMap<String, String>, key: String, value: Value) {
    match value {
        Value::Object(map) => {
            for (child, nested) in map {
                flatten_into(out, format!("{key}.{child}"), nested);
            }
        }
        Value::Array(items) if items.is_empty() => {
            out.insert(key, String::new());
        }
        Value::Array(items) => {
            for (index, item) in items.into_iter().enumerate() {
                flatten_into(out, format!("{key}[{index}]"), item);
            }
        }
        Value::Null => {
            out.insert(key, String::new());
        }
        Value::String(text) => {
            out.insert(key, text);
        }
        Value::Bool(flag) => {
            out.insert(key, flag.to_string());
        }
        Value::Number(number) => {
            out.insert(key, number.to_string());
        }
    }
}

/// Flattens a document tree into dotted keys.
///
/// # Errors
///
/// Returns [`ResolverError::Backend`] when the root is not a mapping.
pub fn flatten(tree: Value) -> Result<BTreeMap<String, String>, ResolverError> {
    let Value::Object(root) = tree else {
        return Err(ResolverError::backend("resource root must be a mapping"));
    };
    let mut values = BTreeMap::new();
    for (key, value) in root {
        flatten_into(&mut values, key, value);
    }
    Ok(values)
}

/// Reads a file as UTF-8 text, enforcing a size limit.
fn read_file_limited(path: &Path, max_bytes: usize) -> Result<String, ResolverError> {
    let context = || format!("reading resource {}", path.display());
    let file = File::open(path).map_err(|err| ResolverError::io(context(), err))?;
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| ResolverError::backend("resource size limit exceeds u64"))?;
    let mut buf = Vec::new();
    file.take(max_bytes_u64.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|err| ResolverError::io(context(), err))?;
    if buf.len() > max_bytes {
        return Err(ResolverError::backend(format!(
            "resource exceeds size limit: {}",
            path.display()
        )));
    }
    String::from_utf8(buf).map_err(|err| {
        let message = format!("resource is not UTF-8: {}", path.display());
        ResolverError::backend_with_source(message, err)
    })
}
