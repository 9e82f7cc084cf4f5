// crates/propline-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payloads.
// Purpose: Deterministic examples for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for `propline.toml`. Backends that need files are left
//! commented out so the example loads anywhere.

/// Returns a canonical example `propline.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[expansion]
enabled = true
prefix = "${"
suffix = "}"

[conversion]
default_delimiter = ","

[processors]
builtin = true

[cache]
resolver = false

[[resolvers]]
type = "command_line"

[[resolvers]]
type = "env"
denylist = ["AWS_SECRET_ACCESS_KEY"]
max_value_bytes = 65536

[[resolvers]]
type = "map"
values = { "app.name" = "demo", "app.url" = "https://${app.host}:${app.port}", "app.host" = "localhost", "app.port" = "8080" }

# [[resolvers]]
# type = "resource"
# path = "app.yaml"
# max_bytes = 1048576

# [[resolvers]]
# type = "resource"
# url = "https://config.example.com/app.json"
# format = "json"
# http = { timeout_ms = 5000, allowed_hosts = ["config.example.com"] }

# [[resolvers]]
# type = "database"
# path = "props.db"
# table = "properties"
# name_column = "name"
# value_column = "value"
"#,
    )
}
