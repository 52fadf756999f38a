//! Output formatting for CLI display.

use crate::dispatch::CommandDescriptor;

/// Format descriptors as an aligned table, one command per line.
pub(super) fn format_command_table<'a>(
    descriptors: impl IntoIterator<Item = &'a CommandDescriptor>,
) -> String {
    let rows: Vec<(&str, String, &str)> = descriptors
        .into_iter()
        .map(|d| {
            let aliases = if d.aliases.is_empty() {
                "-".to_string()
            } else {
                d.aliases.join(", ")
            };
            let mode = if d.allowed_in_restricted_mode {
                "restricted"
            } else {
                "full"
            };
            (d.name, aliases, mode)
        })
        .collect();

    let name_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0);
    let alias_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(0);

    rows.iter()
        .map(|(name, aliases, mode)| {
            format!("{name:<name_width$}  {aliases:<alias_width$}  {mode}\n")
        })
        .collect()
}
