//! Plain-text usage, action help and version output.
//!
//! Rendering only reads a [`RegistryDescription`]; printing is left to the
//! host.

use crate::describe::{ActionDescription, FlagDescription, RegistryDescription};
use crate::value::FlagType;

fn arguments_hint(action: &ActionDescription) -> String {
    (1..=action.required_arguments)
        .map(|n| format!(" <arg{n}>"))
        .collect()
}

fn push_flags(out: &mut String, heading: &str, flags: &[FlagDescription]) {
    if flags.is_empty() {
        return;
    }
    out.push_str(&format!("\n{heading}:\n"));
    let width = flags.iter().map(|f| f.usage().len()).max().unwrap_or(0);
    for flag in flags {
        let default = match flag.flag_type {
            FlagType::Bool => String::new(),
            _ => format!(" (default: {})", flag.default),
        };
        out.push_str(&format!(
            "  {:<width$}  {}{default}\n",
            flag.usage(),
            flag.description
        ));
    }
}

/// Renders the application usage listing.
///
/// # Examples
///
/// ```
/// use chainargs_core::{help, Action, Registry};
///
/// let mut registry = Registry::new();
/// registry.set_app_name("tool");
/// registry
///     .define_action(Action::new("copy", 2, |_, _| 0).with_description("Copy a file"))
///     .unwrap();
///
/// let usage = help::render_usage(&registry.describe());
/// assert!(usage.starts_with("Usage: tool [global options] <action>"));
/// assert!(usage.contains("copy <arg1> <arg2>"));
/// ```
pub fn render_usage(description: &RegistryDescription) -> String {
    let settings = &description.settings;
    let mut out = format!(
        "Usage: {} [global options] <action> [options] [<args>]",
        settings.app_name
    );
    if let Some(delimiter) = settings.delimiters.first() {
        out.push_str(&format!(" [{delimiter} <action> ...]"));
    }
    out.push('\n');

    if let Some(ref banner) = settings.help_banner {
        out.push_str(&format!("\n{banner}\n"));
    }

    push_flags(&mut out, "Global options", &description.global_flags);

    if !description.actions.is_empty() {
        out.push_str("\nActions:\n");
        let signatures: Vec<String> = description
            .actions
            .iter()
            .map(|a| format!("{}{}", a.name, arguments_hint(a)))
            .collect();
        let width = signatures.iter().map(String::len).max().unwrap_or(0);
        for (action, signature) in description.actions.iter().zip(&signatures) {
            out.push_str(&format!("  {signature:<width$}  {}\n", action.description));
        }
    }

    out.push_str(&format!(
        "\nRun `{} <action> --help` for action details.\n",
        settings.app_name
    ));
    out
}

/// Renders help for one action, or `None` if it is not defined.
pub fn render_action_help(description: &RegistryDescription, action: &str) -> Option<String> {
    let action = description.find_action(action)?;
    let mut out = format!(
        "Usage: {} {}{} [options]\n",
        description.settings.app_name,
        action.name,
        arguments_hint(action)
    );

    if !action.description.is_empty() {
        out.push_str(&format!("\n{}\n", action.description));
    }
    if !action.help.is_empty() {
        out.push_str(&format!("\n{}\n", action.help));
    }
    if action.chainable {
        out.push_str("\nThis action can be chained with other actions.\n");
    }

    push_flags(&mut out, "Options", &action.flags);
    push_flags(&mut out, "Global options", &description.global_flags);
    Some(out)
}

/// Renders the `--version` line.
pub fn render_version(description: &RegistryDescription) -> String {
    let settings = &description.settings;
    match settings.version {
        Some(ref version) => format!("{} {version}\n", settings.app_name),
        None => format!("{} (unknown version)\n", settings.app_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::value::FlagValue;

    fn description() -> RegistryDescription {
        RegistryDescription {
            settings: Settings {
                app_name: "test-app".to_string(),
                version: Some("0.3.0".to_string()),
                help_banner: Some("Moves files around.".to_string()),
                delimiters: vec!["+".to_string()],
            },
            global_flags: vec![FlagDescription {
                name: "retries".to_string(),
                flag_type: FlagType::Int,
                default: FlagValue::Int(3),
                current: FlagValue::Int(3),
                description: "Retry count".to_string(),
                help: String::new(),
                validated: true,
            }],
            actions: vec![
                ActionDescription {
                    name: "copy".to_string(),
                    required_arguments: 2,
                    chainable: false,
                    description: "Copy a file".to_string(),
                    help: "2 args required!".to_string(),
                    flags: vec![FlagDescription {
                        name: "force".to_string(),
                        flag_type: FlagType::Bool,
                        default: FlagValue::Bool(false),
                        current: FlagValue::Bool(false),
                        description: "Overwrite".to_string(),
                        help: String::new(),
                        validated: false,
                    }],
                },
                ActionDescription {
                    name: "list".to_string(),
                    required_arguments: 0,
                    chainable: true,
                    description: "List files".to_string(),
                    help: String::new(),
                    flags: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn test_usage_lists_flags_and_actions() {
        let usage = render_usage(&description());
        assert!(usage.starts_with(
            "Usage: test-app [global options] <action> [options] [<args>] [+ <action> ...]\n"
        ));
        assert!(usage.contains("Moves files around."));
        assert!(usage.contains("  --retries <int>  Retry count (default: 3)\n"));
        assert!(usage.contains("  copy <arg1> <arg2>  Copy a file\n"));
        assert!(usage.contains("  list                List files\n"));
    }

    #[test]
    fn test_action_help() {
        let help = render_action_help(&description(), "copy").unwrap();
        assert!(help.starts_with("Usage: test-app copy <arg1> <arg2> [options]\n"));
        assert!(help.contains("2 args required!"));
        assert!(help.contains("Options:\n  --force  Overwrite\n"));
        assert!(!help.contains("chained"));
        assert!(render_action_help(&description(), "move").is_none());
    }

    #[test]
    fn test_version_line() {
        assert_eq!(render_version(&description()), "test-app 0.3.0\n");
        let mut unversioned = description();
        unversioned.settings.version = None;
        assert_eq!(
            render_version(&unversioned),
            "test-app (unknown version)\n"
        );
    }
}
