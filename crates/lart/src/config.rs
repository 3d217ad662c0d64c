//! Dialog configuration.
//!
//! Configuration is resolved in two steps, mirroring how callers use it:
//! 1. [`DialogDefaults`] - the plain-data option table, serde-serializable
//!    so hosts can ship defaults as JSON.
//! 2. [`DialogOptions`] - per-call overrides with every field optional.
//!    [`DialogConfig::resolve`] merges them shallowly: caller values win
//!    field-by-field, and the `buttons` list replaces wholesale.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lart_core::Theme;

/// A zero-argument dialog callback (buttons, `on_open`, `on_close`).
pub type Callback = Rc<dyn Fn()>;

/// A callback receiving the prompt field's current text.
pub type ValueCallback = Rc<dyn Fn(&str)>;

/// Errors from loading dialog defaults.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The defaults every dialog starts from. Each field is overridable per
/// call through [`DialogOptions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DialogDefaults {
    /// Dialog heading text.
    pub title: String,
    /// Visual/semantic theme tag.
    pub theme: Theme,
    /// Overlay click dismisses.
    pub close_on_click: bool,
    /// Escape key dismisses.
    pub close_on_esc: bool,
    /// Enable timed auto-dismiss.
    pub auto_close: bool,
    /// Auto-dismiss delay in milliseconds.
    pub timeout_ms: u64,
    /// Pixel offset of the dialog from vertical center.
    pub vertical_offset: i32,
    /// Pixel offset of the dialog from horizontal center.
    pub horizontal_offset: i32,
    /// Reapply the configured offsets on window resize.
    pub reposition_on_resize: bool,
    /// Overlay alpha.
    pub overlay_opacity: f32,
    /// Overlay base color.
    pub overlay_color: String,
    /// Enable drag-to-move.
    pub draggable: bool,
    /// Text for the OK button.
    pub ok_button: String,
    /// Text for the Cancel button.
    pub cancel_button: String,
    /// Extra class(es) applied to the dialog panel.
    pub dialog_class: String,
    /// Panel width.
    pub dialog_width: String,
    /// Panel max height.
    pub dialog_max_height: String,
    /// Identifier assigned to the OK button.
    pub ok_button_id: String,
    /// Identifier assigned to the Cancel button.
    pub cancel_button_id: String,
}

impl Default for DialogDefaults {
    fn default() -> Self {
        Self {
            title: "Alert".to_string(),
            theme: Theme::Primary,
            close_on_click: true,
            close_on_esc: true,
            auto_close: false,
            timeout_ms: 3000,
            vertical_offset: -75,
            horizontal_offset: 0,
            reposition_on_resize: true,
            overlay_opacity: 0.6,
            overlay_color: "#000".to_string(),
            draggable: true,
            ok_button: "OK".to_string(),
            cancel_button: "Cancel".to_string(),
            dialog_class: String::new(),
            dialog_width: "400px".to_string(),
            dialog_max_height: "80vh".to_string(),
            ok_button_id: "popup_ok".to_string(),
            cancel_button_id: "popup_cancel".to_string(),
        }
    }
}

impl DialogDefaults {
    /// Load defaults from a JSON document. Missing fields keep their
    /// built-in values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The canonical role of a button, driving label and id substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonLabel {
    /// The primary button; rendered with the configured `ok_button` text
    /// and `ok_button_id`.
    Ok,
    /// The secondary button; rendered with the configured `cancel_button`
    /// text and `cancel_button_id`.
    Cancel,
    /// Any other label, rendered verbatim with no identifier.
    Custom(String),
}

/// What activating a button does (before the dialog closes).
#[derive(Clone, Default)]
pub enum ButtonAction {
    /// Nothing; the button only closes the dialog.
    #[default]
    None,
    /// Run a callback.
    Run(Callback),
    /// Run a callback with the prompt field's current text.
    WithValue(ValueCallback),
}

impl ButtonAction {
    /// Wrap an optional callback; a missing callback is a no-op.
    pub fn from_callback(callback: Option<Callback>) -> Self {
        match callback {
            Some(callback) => ButtonAction::Run(callback),
            None => ButtonAction::None,
        }
    }
}

impl fmt::Debug for ButtonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonAction::None => write!(f, "None"),
            ButtonAction::Run(_) => write!(f, "Run(..)"),
            ButtonAction::WithValue(_) => write!(f, "WithValue(..)"),
        }
    }
}

/// One entry of a dialog's ordered button row.
#[derive(Debug, Clone)]
pub struct ButtonSpec {
    pub label: ButtonLabel,
    pub action: ButtonAction,
}

impl ButtonSpec {
    /// Create a button from a label and an action.
    pub fn new(label: ButtonLabel, action: ButtonAction) -> Self {
        Self { label, action }
    }

    /// The canonical OK button.
    pub fn ok(action: ButtonAction) -> Self {
        Self::new(ButtonLabel::Ok, action)
    }

    /// The canonical Cancel button.
    pub fn cancel(action: ButtonAction) -> Self {
        Self::new(ButtonLabel::Cancel, action)
    }

    /// A button with a verbatim label.
    pub fn custom(label: impl Into<String>, action: ButtonAction) -> Self {
        Self::new(ButtonLabel::Custom(label.into()), action)
    }
}

/// A prompt's injected text field.
#[derive(Debug, Clone)]
pub(crate) struct FieldSpec {
    /// Identifier assigned to the field node.
    pub id: String,
    /// Initial text.
    pub value: String,
}

/// Per-call overrides. Any field left `None` falls back to the manager's
/// [`DialogDefaults`] (or, for content/buttons/callbacks, to nothing).
#[derive(Clone, Default)]
pub struct DialogOptions {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Ordered button row; replaces the default wholesale when set.
    pub buttons: Option<Vec<ButtonSpec>>,
    pub theme: Option<Theme>,
    pub close_on_click: Option<bool>,
    pub close_on_esc: Option<bool>,
    pub auto_close: Option<bool>,
    pub timeout_ms: Option<u64>,
    pub vertical_offset: Option<i32>,
    pub horizontal_offset: Option<i32>,
    pub reposition_on_resize: Option<bool>,
    pub overlay_opacity: Option<f32>,
    pub overlay_color: Option<String>,
    pub draggable: Option<bool>,
    pub ok_button: Option<String>,
    pub cancel_button: Option<String>,
    pub dialog_class: Option<String>,
    pub dialog_width: Option<String>,
    pub dialog_max_height: Option<String>,
    pub ok_button_id: Option<String>,
    pub cancel_button_id: Option<String>,
    /// Invoked when the dialog becomes visible.
    pub on_open: Option<Callback>,
    /// Invoked after the dialog is removed.
    pub on_close: Option<Callback>,
    pub input: Option<FieldSpec>,
}

impl DialogOptions {
    /// Empty overrides; everything falls back to defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the button row.
    pub fn with_buttons(mut self, buttons: Vec<ButtonSpec>) -> Self {
        self.buttons = Some(buttons);
        self
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Enable or disable timed auto-dismiss.
    pub fn with_auto_close(mut self, auto_close: bool) -> Self {
        self.auto_close = Some(auto_close);
        self
    }

    /// Set the auto-dismiss delay in milliseconds.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Enable or disable drag-to-move.
    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = Some(draggable);
        self
    }

    /// Set the open callback.
    pub fn with_on_open(mut self, on_open: Callback) -> Self {
        self.on_open = Some(on_open);
        self
    }

    /// Set the close callback.
    pub fn with_on_close(mut self, on_close: Callback) -> Self {
        self.on_close = Some(on_close);
        self
    }

    /// Merge `self` over `base`: values set here win, field-by-field.
    ///
    /// Used by the preset wrappers so caller options override the preset's
    /// own settings (including its `on_open`).
    pub fn merged_over(self, base: DialogOptions) -> DialogOptions {
        DialogOptions {
            title: self.title.or(base.title),
            content: self.content.or(base.content),
            buttons: self.buttons.or(base.buttons),
            theme: self.theme.or(base.theme),
            close_on_click: self.close_on_click.or(base.close_on_click),
            close_on_esc: self.close_on_esc.or(base.close_on_esc),
            auto_close: self.auto_close.or(base.auto_close),
            timeout_ms: self.timeout_ms.or(base.timeout_ms),
            vertical_offset: self.vertical_offset.or(base.vertical_offset),
            horizontal_offset: self.horizontal_offset.or(base.horizontal_offset),
            reposition_on_resize: self.reposition_on_resize.or(base.reposition_on_resize),
            overlay_opacity: self.overlay_opacity.or(base.overlay_opacity),
            overlay_color: self.overlay_color.or(base.overlay_color),
            draggable: self.draggable.or(base.draggable),
            ok_button: self.ok_button.or(base.ok_button),
            cancel_button: self.cancel_button.or(base.cancel_button),
            dialog_class: self.dialog_class.or(base.dialog_class),
            dialog_width: self.dialog_width.or(base.dialog_width),
            dialog_max_height: self.dialog_max_height.or(base.dialog_max_height),
            ok_button_id: self.ok_button_id.or(base.ok_button_id),
            cancel_button_id: self.cancel_button_id.or(base.cancel_button_id),
            on_open: self.on_open.or(base.on_open),
            on_close: self.on_close.or(base.on_close),
            input: self.input.or(base.input),
        }
    }
}

/// A dialog's fully-resolved configuration, immutable after the merge.
#[derive(Clone)]
pub struct DialogConfig {
    pub title: String,
    pub content: String,
    pub buttons: Vec<ButtonSpec>,
    pub theme: Theme,
    pub close_on_click: bool,
    pub close_on_esc: bool,
    pub auto_close: bool,
    pub timeout_ms: u64,
    pub vertical_offset: i32,
    pub horizontal_offset: i32,
    pub reposition_on_resize: bool,
    pub overlay_opacity: f32,
    pub overlay_color: String,
    pub draggable: bool,
    pub ok_button: String,
    pub cancel_button: String,
    pub dialog_class: String,
    pub dialog_width: String,
    pub dialog_max_height: String,
    pub ok_button_id: String,
    pub cancel_button_id: String,
    pub on_open: Option<Callback>,
    pub on_close: Option<Callback>,
    pub(crate) input: Option<FieldSpec>,
}

impl DialogConfig {
    /// Merge caller options over defaults. Caller values win on every
    /// overlapping field; `buttons` replaces wholesale, never merges.
    pub fn resolve(defaults: &DialogDefaults, options: DialogOptions) -> Self {
        let d = defaults.clone();
        Self {
            title: options.title.unwrap_or(d.title),
            content: options.content.unwrap_or_default(),
            buttons: options.buttons.unwrap_or_default(),
            theme: options.theme.unwrap_or(d.theme),
            close_on_click: options.close_on_click.unwrap_or(d.close_on_click),
            close_on_esc: options.close_on_esc.unwrap_or(d.close_on_esc),
            auto_close: options.auto_close.unwrap_or(d.auto_close),
            timeout_ms: options.timeout_ms.unwrap_or(d.timeout_ms),
            vertical_offset: options.vertical_offset.unwrap_or(d.vertical_offset),
            horizontal_offset: options.horizontal_offset.unwrap_or(d.horizontal_offset),
            reposition_on_resize: options
                .reposition_on_resize
                .unwrap_or(d.reposition_on_resize),
            overlay_opacity: options.overlay_opacity.unwrap_or(d.overlay_opacity),
            overlay_color: options.overlay_color.unwrap_or(d.overlay_color),
            draggable: options.draggable.unwrap_or(d.draggable),
            ok_button: options.ok_button.unwrap_or(d.ok_button),
            cancel_button: options.cancel_button.unwrap_or(d.cancel_button),
            dialog_class: options.dialog_class.unwrap_or(d.dialog_class),
            dialog_width: options.dialog_width.unwrap_or(d.dialog_width),
            dialog_max_height: options.dialog_max_height.unwrap_or(d.dialog_max_height),
            ok_button_id: options.ok_button_id.unwrap_or(d.ok_button_id),
            cancel_button_id: options.cancel_button_id.unwrap_or(d.cancel_button_id),
            on_open: options.on_open,
            on_close: options.on_close,
            input: options.input,
        }
    }

    /// The auto-dismiss delay.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Display text for a button, with the canonical labels substituted
    /// from the merged config.
    pub fn button_text(&self, label: &ButtonLabel) -> String {
        match label {
            ButtonLabel::Ok => self.ok_button.clone(),
            ButtonLabel::Cancel => self.cancel_button.clone(),
            ButtonLabel::Custom(text) => text.clone(),
        }
    }

    /// Identifier for a button; only the canonical labels get one.
    pub fn button_id(&self, label: &ButtonLabel) -> Option<String> {
        match label {
            ButtonLabel::Ok => Some(self.ok_button_id.clone()),
            ButtonLabel::Cancel => Some(self.cancel_button_id.clone()),
            ButtonLabel::Custom(_) => None,
        }
    }
}
