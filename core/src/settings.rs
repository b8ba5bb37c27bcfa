//! Host-level settings held by the registry.
//!
//! There are no configuration files: the host sets these values in code
//! before parsing, and they travel with the
//! [`RegistryDescription`](crate::RegistryDescription) for help rendering.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Presentation and chaining settings.
///
/// # Examples
///
/// ```
/// use chainargs_core::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.app_name.is_empty());
/// assert!(settings.delimiters.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Program name shown in usage output.
    pub app_name: String,
    /// Version string printed for `--version`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Free text shown above the usage listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_banner: Option<String>,
    /// Tokens that separate chained actions. Empty disables explicit chaining.
    #[serde(default)]
    pub delimiters: Vec<String>,
}

impl Settings {
    /// Returns `true` if `token` is one of the configured delimiters.
    pub fn is_delimiter(&self, token: &str) -> bool {
        self.delimiters.iter().any(|d| d == token)
    }

    /// Fills an empty app name from the program path in `argv[0]`.
    pub(crate) fn adopt_program_name(&mut self, program: &str) {
        if !self.app_name.is_empty() {
            return;
        }
        self.app_name = Path::new(program)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adopt_program_name_uses_file_name() {
        let mut settings = Settings::default();
        settings.adopt_program_name("/usr/local/bin/test-app");
        assert_eq!(settings.app_name, "test-app");
    }

    #[test]
    fn test_adopt_program_name_keeps_explicit_name() {
        let mut settings = Settings {
            app_name: "configured".to_string(),
            ..Settings::default()
        };
        settings.adopt_program_name("other");
        assert_eq!(settings.app_name, "configured");
    }

    #[test]
    fn test_is_delimiter() {
        let settings = Settings {
            delimiters: vec!["+".to_string(), "then".to_string()],
            ..Settings::default()
        };
        assert!(settings.is_delimiter("then"));
        assert!(!settings.is_delimiter("-"));
    }
}
