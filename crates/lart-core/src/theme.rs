//! Named themes for dialogs.
//!
//! A theme is a semantic tag substituted into the dialog panel's class list
//! (`lart-alert-theme-<name>`); the host stylesheet maps it to colors.

use serde::{Deserialize, Serialize};

/// Visual/semantic theme tag for a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Neutral default.
    #[default]
    Primary,
    /// De-emphasized variant.
    Secondary,
    /// Positive outcome (green).
    Success,
    /// Caution, used by confirm dialogs (orange/yellow).
    Warning,
    /// Failure (red).
    Error,
    /// Informational, used by prompt dialogs (blue).
    Info,
}

impl Theme {
    /// Get a theme by name. Unknown names fall back to the default.
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "secondary" => Theme::Secondary,
            "success" => Theme::Success,
            "warning" => Theme::Warning,
            "error" => Theme::Error,
            "info" => Theme::Info,
            _ => Theme::Primary,
        }
    }

    /// List available theme names.
    pub fn available() -> Vec<&'static str> {
        vec![
            "primary",
            "secondary",
            "success",
            "warning",
            "error",
            "info",
        ]
    }

    /// The class-name fragment for this theme.
    pub fn class_name(&self) -> &'static str {
        match self {
            Theme::Primary => "primary",
            Theme::Secondary => "secondary",
            Theme::Success => "success",
            Theme::Warning => "warning",
            Theme::Error => "error",
            Theme::Info => "info",
        }
    }
}
