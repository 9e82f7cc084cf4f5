// crates/propline-resolvers/src/database.rs
// ============================================================================
// Module: SQLite Database Resolver
// Description: Resolver reading name/value rows from a SQLite table.
// Purpose: Serve properties kept in a database without a long-lived handle.
// Dependencies: propline-core, rusqlite, serde, tracing
// ============================================================================

//! ## Overview
//! Each lookup opens a read-only connection, runs one parameterized query
//! against the configured table, and drops the connection before returning.
//! Table and column names are validated as plain SQL identifiers when the
//! resolver is built since they cannot be bound as parameters.
//! Invariants:
//! - A missing row or a NULL value is "not found".
//! - The database is never written.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use propline_core::InvocationContext;
use propline_core::Resolver;
use propline_core::ResolverError;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use tracing::trace;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Maximum identifier length accepted for tables and columns.
const MAX_IDENTIFIER_BYTES: usize = 64;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the `SQLite` resolver.
///
/// # Invariants
/// - `table`, `name_column`, and `value_column` are plain SQL identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseResolverConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Table holding properties.
    #[serde(default = "default_table")]
    pub table: String,
    /// Column holding property names.
    #[serde(default = "default_name_column")]
    pub name_column: String,
    /// Column holding property values.
    #[serde(default = "default_value_column")]
    pub value_column: String,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl DatabaseResolverConfig {
    /// Creates a configuration with default table and column names.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: default_table(),
            name_column: default_name_column(),
            value_column: default_value_column(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Returns the default table name.
fn default_table() -> String {
    "properties".to_string()
}

/// Returns the default name column.
fn default_name_column() -> String {
    "name".to_string()
}

/// Returns the default value column.
fn default_value_column() -> String {
    "value".to_string()
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolver backed by a `SQLite` table.
#[derive(Debug, Clone)]
pub struct DatabaseResolver {
    /// Connection settings.
    config: DatabaseResolverConfig,
    /// Prepared query text.
    query: String,
}

impl DatabaseResolver {
    /// Validates `config` and creates the resolver.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Backend`] when an identifier is invalid.
    pub fn new(config: DatabaseResolverConfig) -> Result<Self, ResolverError> {
        validate_identifier("table", &config.table)?;
        validate_identifier("name_column", &config.name_column)?;
        validate_identifier("value_column", &config.value_column)?;
        let query = format!(
            "SELECT {value} FROM {table} WHERE {name} = ?1 LIMIT 1",
            value = config.value_column,
            table = config.table,
            name = config.name_column,
        );
        Ok(Self {
            config,
            query,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &DatabaseResolverConfig {
        &self.config
    }

    /// Opens a read-only connection.
    fn open(&self) -> Result<Connection, ResolverError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let connection = Connection::open_with_flags(&self.config.path, flags).map_err(|err| {
            ResolverError::backend_with_source(
                format!("failed to open database {}", self.config.path.display()),
                err,
            )
        })?;
        connection
            .busy_timeout(Duration::from_millis(self.config.busy_timeout_ms))
            .map_err(|err| ResolverError::backend_with_source("failed to set busy timeout", err))?;
        Ok(connection)
    }
}

impl Resolver for DatabaseResolver {
    fn resolve(
        &self,
        _ctx: &InvocationContext<'_>,
        name: &str,
    ) -> Result<Option<String>, ResolverError> {
        let connection = self.open()?;
        let value: Option<Option<String>> = connection
            .query_row(&self.query, params![name], |row| row.get(0))
            .optional()
            .map_err(|err| {
                ResolverError::backend_with_source(format!("database lookup of {name} failed"), err)
            })?;
        let found = value.as_ref().is_some_and(Option::is_some);
        trace!(property = name, found, "database lookup");
        Ok(value.flatten())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Accepts `[A-Za-z_][A-Za-z0-9_]*` up to [`MAX_IDENTIFIER_BYTES`].
fn validate_identifier(field: &str, value: &str) -> Result<(), ResolverError> {
    let mut chars = value.chars();
    let valid_start = chars.next().is_some_and(|ch| ch.is_ascii_alphabetic() || ch == '_');
    let valid_rest = chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if !valid_start || !valid_rest || value.len() > MAX_IDENTIFIER_BYTES {
        return Err(ResolverError::backend(format!("invalid sql identifier for {field}: {value}")));
    }
    Ok(())
}
