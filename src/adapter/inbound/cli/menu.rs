//! Handler for the `menu` command.

use serde_json::json;
use tabled::Tabled;

use super::command::MenuArgs;
use super::output;
use crate::domain::{Navigation, PermissionTable};
use crate::error::Result;

#[derive(Tabled)]
struct MenuRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "English")]
    label_en: String,
    #[tabled(rename = "العربية")]
    label_ar: String,
}

/// Print the entries `args.role` may see.
pub fn execute(permissions: &PermissionTable, navigation: &Navigation, args: &MenuArgs) -> Result<()> {
    let role = args.role.as_deref();
    let resolved = permissions.resolve(role);
    let entries = navigation.visible_for(permissions, role);

    if output::is_json() {
        output::json_output(json!({
            "command": "menu",
            "role": resolved,
            "entries": entries,
        }));
        return Ok(());
    }

    output::section(&format!("Menu for {resolved}"));
    output::table(
        entries
            .into_iter()
            .map(|entry| MenuRow {
                path: entry.path.clone(),
                label_en: entry.label_en.clone(),
                label_ar: entry.label_ar.clone(),
            })
            .collect(),
        "(no entries)",
    );
    Ok(())
}
