//! Serializable snapshots of the registry.
//!
//! A [`RegistryDescription`] captures everything a usage renderer or an
//! external tool needs to know about the command surface: settings, global
//! flags and actions with their scoped flags. It holds no callbacks or
//! validators, so it can be exported as JSON, YAML or Markdown.

use serde::{Deserialize, Serialize};

use crate::actions::ActionDefinition;
use crate::flags::FlagDefinition;
use crate::settings::Settings;
use crate::value::{FlagType, FlagValue};

/// Description of one flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagDescription {
    pub name: String,
    pub flag_type: FlagType,
    pub default: FlagValue,
    pub current: FlagValue,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    /// Whether a validator restricts the accepted values.
    #[serde(default)]
    pub validated: bool,
}

impl FlagDescription {
    /// Usage form of the flag, e.g. `--retries <int>` or `--verbose`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainargs_core::{FlagDescription, FlagType, FlagValue};
    ///
    /// let flag = FlagDescription {
    ///     name: "retries".into(),
    ///     flag_type: FlagType::Int,
    ///     default: FlagValue::Int(3),
    ///     current: FlagValue::Int(3),
    ///     description: String::new(),
    ///     help: String::new(),
    ///     validated: false,
    /// };
    /// assert_eq!(flag.usage(), "--retries <int>");
    /// ```
    pub fn usage(&self) -> String {
        match self.flag_type {
            FlagType::Bool => format!("--{}", self.name),
            other => format!("--{} <{other}>", self.name),
        }
    }
}

impl From<&FlagDefinition> for FlagDescription {
    fn from(flag: &FlagDefinition) -> Self {
        Self {
            name: flag.name().to_string(),
            flag_type: flag.flag_type(),
            default: flag.default_value().clone(),
            current: flag.current_value().clone(),
            description: flag.description().to_string(),
            help: flag.help().to_string(),
            validated: flag.is_validated(),
        }
    }
}

/// Description of one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescription {
    pub name: String,
    pub required_arguments: usize,
    pub chainable: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    #[serde(default)]
    pub flags: Vec<FlagDescription>,
}

impl From<&ActionDefinition> for ActionDescription {
    fn from(action: &ActionDefinition) -> Self {
        Self {
            name: action.name().to_string(),
            required_arguments: action.required_arguments(),
            chainable: action.is_chainable(),
            description: action.description().to_string(),
            help: action.help().to_string(),
            flags: action.flags().iter().map(FlagDescription::from).collect(),
        }
    }
}

/// Snapshot of the whole registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryDescription {
    pub settings: Settings,
    pub global_flags: Vec<FlagDescription>,
    pub actions: Vec<ActionDescription>,
}

impl RegistryDescription {
    /// Finds an action by name.
    pub fn find_action(&self, name: &str) -> Option<&ActionDescription> {
        self.actions.iter().find(|a| a.name == name)
    }

    /// Finds a global flag by name (without the `--` prefix).
    pub fn find_global_flag(&self, name: &str) -> Option<&FlagDescription> {
        self.global_flags.iter().find(|f| f.name == name)
    }
}

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
}

impl OutputFormat {
    /// Parses a format name as typed on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "markdown" | "md" => Some(Self::Markdown),
            _ => None,
        }
    }
}

/// Formats a description in the requested output format.
pub fn format_description(
    description: &RegistryDescription,
    format: OutputFormat,
) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(description)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => serde_yaml::to_string(description)
            .map_err(|e| format!("YAML serialization failed: {e}")),
        OutputFormat::Markdown => Ok(description_to_markdown(description)),
    }
}

fn description_to_markdown(description: &RegistryDescription) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", description.settings.app_name));

    if let Some(ref banner) = description.settings.help_banner {
        out.push_str(&format!("{banner}\n\n"));
    }

    if let Some(ref version) = description.settings.version {
        out.push_str(&format!("**Version:** {version}\n\n"));
    }

    if !description.global_flags.is_empty() {
        out.push_str("## Global Flags\n\n");
        push_flag_table(&mut out, &description.global_flags);
    }

    if !description.actions.is_empty() {
        out.push_str("## Actions\n\n");
        for action in &description.actions {
            out.push_str(&format!("### {}\n\n", action.name));
            if !action.description.is_empty() {
                out.push_str(&format!("{}\n\n", action.description));
            }
            out.push_str(&format!(
                "**Arguments:** {} | **Chainable:** {}\n\n",
                action.required_arguments,
                if action.chainable { "yes" } else { "no" }
            ));
            if !action.flags.is_empty() {
                push_flag_table(&mut out, &action.flags);
            }
        }
    }

    out
}

fn push_flag_table(out: &mut String, flags: &[FlagDescription]) {
    out.push_str("| Flag | Default | Description |\n");
    out.push_str("|------|---------|-------------|\n");
    for flag in flags {
        out.push_str(&format!(
            "| `{}` | `{}` | {} |\n",
            flag.usage(),
            flag.default,
            flag.description
        ));
    }
    out.push('\n');
}
