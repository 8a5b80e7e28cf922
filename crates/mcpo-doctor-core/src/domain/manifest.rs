//! MCP server manifest (`mcp-config.json`).
//!
//! Only the structure the diagnostics need is interpreted: the optional
//! top-level `mcpServers` object and each member's optional `command` string.

use serde_json::Value;

/// Name of the top-level field that lists the gateway's MCP servers.
pub const MCP_SERVERS_FIELD: &str = "mcpServers";

/// One declared MCP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEntry {
    /// Key under `mcpServers`.
    pub name: String,
    /// Executable the gateway launches for this server, if declared.
    pub command: Option<String>,
}

/// Parsed view of the manifest document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerManifest {
    /// `None` when the document has no usable `mcpServers` object.
    servers: Option<Vec<ServerEntry>>,
}

impl ServerManifest {
    /// Extract the server list from a parsed JSON document.
    ///
    /// A `mcpServers` value that is not an object is treated like an absent one.
    /// A `command` that is missing, empty or not a string counts as undeclared.
    /// Any other string is kept exactly as written, padding included, since
    /// that is what the gateway will try to execute.
    pub fn from_document(document: &Value) -> Self {
        let servers = document
            .get(MCP_SERVERS_FIELD)
            .and_then(Value::as_object)
            .map(|members| {
                members
                    .iter()
                    .map(|(name, descriptor)| ServerEntry {
                        name: name.clone(),
                        command: descriptor
                            .get("command")
                            .and_then(Value::as_str)
                            .filter(|cmd| !cmd.is_empty())
                            .map(ToString::to_string),
                    })
                    .collect()
            });

        Self { servers }
    }

    /// Build a manifest directly from entries.
    pub const fn with_servers(servers: Vec<ServerEntry>) -> Self {
        Self {
            servers: Some(servers),
        }
    }

    /// Declared servers in document order (empty when none are declared).
    pub fn servers(&self) -> &[ServerEntry] {
        self.servers.as_deref().unwrap_or_default()
    }

    /// Whether `mcpServers` exists and has at least one member.
    pub fn declares_servers(&self) -> bool {
        !self.servers().is_empty()
    }

    /// Whether the `mcpServers` field exists at all.
    pub const fn has_servers_field(&self) -> bool {
        self.servers.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_servers_field() {
        let manifest = ServerManifest::from_document(&json!({"other": 1}));
        assert!(!manifest.has_servers_field());
        assert!(!manifest.declares_servers());
        assert!(manifest.servers().is_empty());
    }

    #[test]
    fn test_empty_servers_object() {
        let manifest = ServerManifest::from_document(&json!({"mcpServers": {}}));
        assert!(manifest.has_servers_field());
        assert!(!manifest.declares_servers());
    }

    #[test]
    fn test_entries_keep_document_order() {
        let document: Value = serde_json::from_str(
            r#"{"mcpServers": {"zeta": {"command": "npx"}, "alpha": {"command": "uvx"}}}"#,
        )
        .unwrap();
        let manifest = ServerManifest::from_document(&document);
        let names: Vec<&str> = manifest.servers().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
    }

    #[test]
    fn test_empty_or_non_string_command_is_undeclared() {
        let manifest = ServerManifest::from_document(&json!({
            "mcpServers": {
                "empty": {"command": ""},
                "number": {"command": 42},
                "none": {"url": "http://localhost"}
            }
        }));
        assert!(manifest.servers().iter().all(|s| s.command.is_none()));
    }

    #[test]
    fn test_padded_and_blank_commands_are_kept_verbatim() {
        let manifest = ServerManifest::from_document(&json!({
            "mcpServers": {
                "fs": {"command": " npx "},
                "blank": {"command": "   "}
            }
        }));
        let commands: Vec<Option<&str>> = manifest
            .servers()
            .iter()
            .map(|s| s.command.as_deref())
            .collect();
        assert_eq!(commands, [Some(" npx "), Some("   ")]);
    }

    #[test]
    fn test_servers_field_not_an_object() {
        let manifest = ServerManifest::from_document(&json!({"mcpServers": ["a", "b"]}));
        assert!(!manifest.has_servers_field());
    }
}
