//! Handler for the `config` command group.

use std::path::Path;

use serde_json::json;

use super::output;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Execute `config validate`.
///
/// The file must exist; defaults are not substituted here.
pub fn execute_validate(path: &Path) -> Result<()> {
    let config = Config::load(path)?;
    let permissions = config.permission_table()?;
    let persistence = &config.persistence;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "valid": true,
            "path": path.display().to_string(),
            "strategy": persistence.strategy,
            "fallback_role": permissions.fallback(),
            "roles": permissions.roles(),
        }));
        return Ok(());
    }

    output::success("Configuration is valid");
    output::field("Path", path.display());
    output::field("Strategy", persistence.strategy);
    if persistence.strategy.uses_local() {
        output::field("Database", &persistence.local.path);
    }
    if persistence.strategy.uses_remote() {
        output::field("Remote", &persistence.remote.base_url);
        output::field(
            "API key",
            if persistence.remote.api_key.is_some() {
                "set"
            } else {
                "not set"
            },
        );
    }
    output::field("Fallback role", permissions.fallback());
    output::field("Roles", permissions.roles().join(", "));
    Ok(())
}
