//! The dialog manager: `show` plus the alert/confirm/prompt presets.
//!
//! A manager is constructed explicitly over a [`Surface`]; nothing is
//! installed globally. Several managers may share one surface, and several
//! dialogs may be open at once - each owns its own subtree, listeners, and
//! timers.

use std::cell::Cell;
use std::rc::Rc;

use lart_core::event::{is_escape, Event};
use lart_core::Theme;
use lart_surface::{EventKind, NodeId, Surface, Target};
use lart_util::Identifier;

use crate::config::{
    ButtonAction, ButtonLabel, ButtonSpec, Callback, DialogConfig, DialogDefaults, DialogOptions,
    FieldSpec, ValueCallback,
};
use crate::dialog::{DialogHandle, DialogState, REVEAL_TICK};
use crate::drag;

/// Presents modal dialogs over a rendering surface.
pub struct DialogManager {
    surface: Rc<dyn Surface>,
    defaults: DialogDefaults,
}

impl DialogManager {
    /// Create a manager with the built-in defaults.
    pub fn new(surface: Rc<dyn Surface>) -> Self {
        Self::with_defaults(surface, DialogDefaults::default())
    }

    /// Create a manager with custom defaults (e.g. loaded from JSON).
    pub fn with_defaults(surface: Rc<dyn Surface>, defaults: DialogDefaults) -> Self {
        Self { surface, defaults }
    }

    /// The defaults every `show` call starts from.
    pub fn defaults(&self) -> &DialogDefaults {
        &self.defaults
    }

    /// Present a dialog. Any omitted option falls back to the manager's
    /// defaults; see [`DialogConfig::resolve`] for the merge rules.
    pub fn show(&self, options: DialogOptions) -> DialogHandle {
        let config = DialogConfig::resolve(&self.defaults, options);
        let surface = Rc::clone(&self.surface);
        let dialog_id = Identifier::dialog();

        // Visual tree: root > (overlay, panel > (title, content, buttons,
        // close affordance)). Hidden until the reveal tick.
        let root = surface.create_node("div");
        surface.add_class(root, "lart-alert");
        surface.set_attr(root, "id", &dialog_id);
        surface.set_style(root, "display", "none");

        let overlay = surface.create_node("div");
        surface.add_class(overlay, "lart-alert-overlay");

        let panel = surface.create_node("div");
        surface.add_class(panel, "lart-alert-dialog");
        surface.add_class(
            panel,
            &format!("lart-alert-theme-{}", config.theme.class_name()),
        );
        for class in config.dialog_class.split_whitespace() {
            surface.add_class(panel, class);
        }

        let title = surface.create_node("div");
        surface.add_class(title, "lart-alert-title");
        surface.set_text(title, &config.title);

        let content = surface.create_node("div");
        surface.add_class(content, "lart-alert-content");
        surface.set_text(content, &config.content);

        // Prompt dialogs carry a text field inside the content area. It is
        // created before anything binds to it, so focus wiring can never
        // reference a missing field.
        let field: Option<NodeId> = config.input.as_ref().map(|spec| {
            let input = surface.create_node("input");
            surface.set_attr(input, "type", "text");
            surface.set_attr(input, "id", &spec.id);
            surface.add_class(input, "lart-prompt-input");
            surface.set_value(input, &spec.value);
            surface.append(content, input);
            input
        });

        let buttons_row = surface.create_node("div");
        surface.add_class(buttons_row, "lart-alert-buttons");

        let close_button = surface.create_node("button");
        surface.add_class(close_button, "lart-alert-close");
        surface.set_attr(close_button, "aria-label", "Close");
        surface.set_text(close_button, "\u{d7}");

        surface.append(panel, title);
        surface.append(panel, content);
        surface.append(panel, buttons_row);
        surface.append(panel, close_button);
        surface.append(root, overlay);
        surface.append(root, panel);
        surface.append_to_body(root);

        // Computed styles from the merged config.
        surface.set_style(overlay, "background-color", &config.overlay_color);
        surface.set_style(overlay, "opacity", &config.overlay_opacity.to_string());
        surface.set_style(panel, "margin-top", &format!("{}px", config.vertical_offset));
        surface.set_style(
            panel,
            "margin-left",
            &format!("{}px", config.horizontal_offset),
        );
        surface.set_style(panel, "width", &config.dialog_width);
        surface.set_style(panel, "max-height", &config.dialog_max_height);

        let state = DialogState::new(
            Rc::clone(&surface),
            dialog_id.clone(),
            root,
            config.on_close.clone(),
        );
        let registry = state.listeners();

        // Buttons, in insertion order. Activation runs the action, then
        // closes through the shared close path.
        for spec in &config.buttons {
            let button = surface.create_node("button");
            surface.set_attr(button, "type", "button");
            surface.add_class(button, "lart-alert-button");
            let accent = if spec.label == ButtonLabel::Ok {
                "lart-alert-button-primary"
            } else {
                "lart-alert-button-secondary"
            };
            surface.add_class(button, accent);
            surface.set_text(button, &config.button_text(&spec.label));
            if let Some(id) = config.button_id(&spec.label) {
                surface.set_attr(button, "id", &id);
            }

            let action = spec.action.clone();
            let action_surface = Rc::clone(&surface);
            let action_state = Rc::clone(&state);
            let listener = surface.listen(
                Target::Node(button),
                EventKind::Click,
                Rc::new(move |_: &Event| {
                    match &action {
                        ButtonAction::None => {}
                        ButtonAction::Run(callback) => callback(),
                        ButtonAction::WithValue(callback) => {
                            let value = field
                                .map(|input| action_surface.value(input))
                                .unwrap_or_default();
                            callback(&value);
                        }
                    }
                    action_state.close();
                }),
            );
            registry.track(listener);
            surface.append(buttons_row, button);
        }

        // The close affordance always dismisses.
        {
            let close_state = Rc::clone(&state);
            let listener = surface.listen(
                Target::Node(close_button),
                EventKind::Click,
                Rc::new(move |_: &Event| close_state.close()),
            );
            registry.track(listener);
        }

        if config.close_on_click {
            let overlay_state = Rc::clone(&state);
            let listener = surface.listen(
                Target::Node(overlay),
                EventKind::Click,
                Rc::new(move |_: &Event| overlay_state.close()),
            );
            registry.track(listener);
        }

        // Escape dismissal. The listener removes itself the moment it
        // fires so later dialogs never see a stale handler; the close path
        // drains it otherwise.
        if config.close_on_esc {
            let esc_state = Rc::clone(&state);
            let esc_registry = Rc::clone(&registry);
            let esc_id = Rc::new(Cell::new(None));
            let esc_id_inner = Rc::clone(&esc_id);
            let listener = surface.listen(
                Target::Document,
                EventKind::KeyDown,
                Rc::new(move |event: &Event| {
                    let Event::KeyDown(key) = event else { return };
                    if !is_escape(key) {
                        return;
                    }
                    if let Some(id) = esc_id_inner.take() {
                        esc_registry.release(id);
                    }
                    esc_state.close();
                }),
            );
            esc_id.set(Some(listener));
            registry.track(listener);
        }

        // Auto-close runs the same close path as manual dismissal. The
        // state keeps the timer id so an earlier close cancels it.
        if config.auto_close {
            let timer_state = Rc::clone(&state);
            let timer = surface.schedule(
                config.timeout(),
                Rc::new(move || {
                    timer_state.clear_auto_close();
                    timer_state.close();
                }),
            );
            state.set_auto_close(timer);
        }

        // Window resize re-applies the configured offsets. A dragged
        // dialog snaps back to its configured position.
        if config.reposition_on_resize {
            let resize_surface = Rc::clone(&surface);
            let (vertical, horizontal) = (config.vertical_offset, config.horizontal_offset);
            let listener = surface.listen(
                Target::Window,
                EventKind::Resize,
                Rc::new(move |event: &Event| {
                    if let Event::Resize(_, _) = event {
                        resize_surface.set_style(panel, "margin-top", &format!("{}px", vertical));
                        resize_surface.set_style(
                            panel,
                            "margin-left",
                            &format!("{}px", horizontal),
                        );
                    }
                }),
            );
            registry.track(listener);
        }

        if config.draggable {
            drag::attach(&surface, &registry, panel);
        }

        // Reveal on the next tick so initial layout and transition styles
        // apply before the dialog becomes visible.
        {
            let reveal_surface = Rc::clone(&surface);
            let on_open = config.on_open.clone();
            surface.schedule(
                REVEAL_TICK,
                Rc::new(move || {
                    reveal_surface.set_style(root, "display", "block");
                    if let Some(on_open) = &on_open {
                        on_open();
                    }
                }),
            );
        }

        tracing::debug!(id = %dialog_id, title = %config.title, "dialog opened");
        DialogHandle::new(state)
    }

    /// Present an alert: a single OK button that runs `callback` (if any)
    /// and closes.
    pub fn alert(
        &self,
        content: impl Into<String>,
        title: Option<&str>,
        callback: Option<Callback>,
        options: DialogOptions,
    ) -> DialogHandle {
        let preset = DialogOptions {
            title: Some(title.unwrap_or("Alert").to_string()),
            content: Some(content.into()),
            buttons: Some(vec![ButtonSpec::ok(ButtonAction::from_callback(callback))]),
            ..Default::default()
        };
        self.show(options.merged_over(preset))
    }

    /// Present a confirmation: Cancel (no-op) then OK running `callback`.
    pub fn confirm(
        &self,
        content: impl Into<String>,
        title: Option<&str>,
        callback: Option<Callback>,
        options: DialogOptions,
    ) -> DialogHandle {
        let preset = DialogOptions {
            title: Some(title.unwrap_or("Confirm").to_string()),
            content: Some(content.into()),
            buttons: Some(vec![
                ButtonSpec::cancel(ButtonAction::None),
                ButtonSpec::ok(ButtonAction::from_callback(callback)),
            ]),
            theme: Some(Theme::Warning),
            ..Default::default()
        };
        self.show(options.merged_over(preset))
    }

    /// Present a prompt: a text field pre-filled with `default_value`;
    /// OK passes the field's current text to `callback`. At reveal the
    /// field receives focus with its text selected.
    pub fn prompt(
        &self,
        content: impl Into<String>,
        title: Option<&str>,
        callback: Option<ValueCallback>,
        default_value: &str,
        options: DialogOptions,
    ) -> DialogHandle {
        let field_id = Identifier::field();

        let focus_surface = Rc::clone(&self.surface);
        let focus_id = field_id.clone();
        let ok_action = match callback {
            Some(callback) => ButtonAction::WithValue(callback),
            None => ButtonAction::None,
        };

        let preset = DialogOptions {
            title: Some(title.unwrap_or("Prompt").to_string()),
            content: Some(content.into()),
            buttons: Some(vec![
                ButtonSpec::cancel(ButtonAction::None),
                ButtonSpec::ok(ok_action),
            ]),
            theme: Some(Theme::Info),
            on_open: Some(Rc::new(move || {
                if let Some(input) = focus_surface.node_by_id(&focus_id) {
                    focus_surface.focus(input);
                    focus_surface.select_text(input);
                }
            })),
            input: Some(FieldSpec {
                id: field_id,
                value: default_value.to_string(),
            }),
            ..Default::default()
        };
        self.show(options.merged_over(preset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lart_surface::MemorySurface;
    use lart_util::IdPrefix;

    fn setup() -> (Rc<MemorySurface>, DialogManager) {
        let surface = Rc::new(MemorySurface::new());
        let manager = DialogManager::new(surface.clone());
        (surface, manager)
    }

    fn panel_of(surface: &MemorySurface) -> NodeId {
        *surface
            .find_by_class("lart-alert-dialog")
            .last()
            .expect("dialog panel")
    }

    #[test]
    fn test_show_builds_expected_tree() {
        let (surface, manager) = setup();
        let handle = manager.show(
            DialogOptions::new()
                .with_title("Heads up")
                .with_content("something happened"),
        );

        let root = handle.element();
        assert!(surface.is_attached(root));
        assert!(surface.has_class(root, "lart-alert"));
        assert_eq!(surface.attr(root, "id").as_deref(), Some(handle.id()));
        assert!(Identifier::has_prefix(handle.id(), IdPrefix::Dialog));

        let panel = panel_of(&surface);
        assert!(surface.has_class(panel, "lart-alert-theme-primary"));
        assert_eq!(surface.find_by_class("lart-alert-overlay").len(), 1);
        assert_eq!(surface.find_by_class("lart-alert-title").len(), 1);
        assert_eq!(surface.find_by_class("lart-alert-content").len(), 1);
        assert_eq!(surface.find_by_class("lart-alert-buttons").len(), 1);
        assert_eq!(surface.find_by_class("lart-alert-close").len(), 1);

        let title = surface.find_by_class("lart-alert-title")[0];
        assert_eq!(surface.text(title), "Heads up");
    }

    #[test]
    fn test_show_is_hidden_until_reveal_tick() {
        let (surface, manager) = setup();
        let handle = manager.show(DialogOptions::new());
        assert_eq!(
            surface.style(handle.element(), "display").as_deref(),
            Some("none")
        );

        surface.advance(REVEAL_TICK);
        assert_eq!(
            surface.style(handle.element(), "display").as_deref(),
            Some("block")
        );
    }

    #[test]
    fn test_show_applies_offsets_and_overlay_styles() {
        let (surface, manager) = setup();
        manager.show(DialogOptions {
            overlay_color: Some("#123".to_string()),
            overlay_opacity: Some(0.4),
            vertical_offset: Some(-20),
            horizontal_offset: Some(8),
            dialog_width: Some("320px".to_string()),
            ..Default::default()
        });

        let overlay = surface.find_by_class("lart-alert-overlay")[0];
        assert_eq!(
            surface.style(overlay, "background-color").as_deref(),
            Some("#123")
        );
        assert_eq!(surface.style(overlay, "opacity").as_deref(), Some("0.4"));

        let panel = panel_of(&surface);
        assert_eq!(surface.style(panel, "margin-top").as_deref(), Some("-20px"));
        assert_eq!(surface.style(panel, "margin-left").as_deref(), Some("8px"));
        assert_eq!(surface.style(panel, "width").as_deref(), Some("320px"));
        assert_eq!(surface.style(panel, "max-height").as_deref(), Some("80vh"));
    }

    #[test]
    fn test_theme_and_extra_classes_on_panel() {
        let (surface, manager) = setup();
        manager.show(DialogOptions {
            theme: Some(Theme::Error),
            dialog_class: Some("compact borderless".to_string()),
            ..Default::default()
        });

        let panel = panel_of(&surface);
        assert!(surface.has_class(panel, "lart-alert-theme-error"));
        assert!(surface.has_class(panel, "compact"));
        assert!(surface.has_class(panel, "borderless"));
    }

    #[test]
    fn test_canonical_buttons_get_configured_text_and_ids() {
        let (surface, manager) = setup();
        manager.show(DialogOptions {
            buttons: Some(vec![
                ButtonSpec::cancel(ButtonAction::None),
                ButtonSpec::ok(ButtonAction::None),
                ButtonSpec::custom("Later", ButtonAction::None),
            ]),
            ok_button: Some("Apply".to_string()),
            ..Default::default()
        });

        let buttons = surface.find_by_class("lart-alert-button");
        assert_eq!(buttons.len(), 3);
        assert_eq!(surface.text(buttons[0]), "Cancel");
        assert_eq!(surface.attr(buttons[0], "id").as_deref(), Some("popup_cancel"));
        assert!(surface.has_class(buttons[0], "lart-alert-button-secondary"));

        assert_eq!(surface.text(buttons[1]), "Apply");
        assert_eq!(surface.attr(buttons[1], "id").as_deref(), Some("popup_ok"));
        assert!(surface.has_class(buttons[1], "lart-alert-button-primary"));

        assert_eq!(surface.text(buttons[2]), "Later");
        assert_eq!(surface.attr(buttons[2], "id"), None);
        assert!(surface.has_class(buttons[2], "lart-alert-button-secondary"));
    }

    #[test]
    fn test_prompt_creates_field_before_reveal_binds_focus() {
        let (surface, manager) = setup();
        manager.prompt("Your name:", None, None, "anon", DialogOptions::new());

        let inputs = surface.find_by_class("lart-prompt-input");
        assert_eq!(inputs.len(), 1);
        let input = inputs[0];
        assert_eq!(surface.value(input), "anon");
        assert_eq!(surface.tag(input), "input");
        let field_id = surface.attr(input, "id").expect("field id");
        assert!(Identifier::has_prefix(&field_id, IdPrefix::Field));

        // Focus happens at reveal time, not at build time.
        assert_eq!(surface.focused(), None);
        surface.advance(REVEAL_TICK);
        assert_eq!(surface.focused(), Some(input));
        assert!(surface.is_text_selected(input));
    }

    #[test]
    fn test_preset_titles() {
        let (surface, manager) = setup();
        manager.alert("a", None, None, DialogOptions::new());
        manager.confirm("c", None, None, DialogOptions::new());
        manager.prompt("p", None, None, "", DialogOptions::new());

        let titles: Vec<String> = surface
            .find_by_class("lart-alert-title")
            .into_iter()
            .map(|t| surface.text(t))
            .collect();
        assert_eq!(titles, vec!["Alert", "Confirm", "Prompt"]);
    }

    #[test]
    fn test_confirm_defaults_to_warning_theme_prompt_to_info() {
        let (surface, manager) = setup();
        manager.confirm("sure?", None, None, DialogOptions::new());
        assert!(surface.has_class(panel_of(&surface), "lart-alert-theme-warning"));

        manager.prompt("name?", None, None, "", DialogOptions::new());
        assert!(surface.has_class(panel_of(&surface), "lart-alert-theme-info"));

        // Caller options still win over the preset theme.
        manager.confirm(
            "sure?",
            None,
            None,
            DialogOptions::new().with_theme(Theme::Success),
        );
        assert!(surface.has_class(panel_of(&surface), "lart-alert-theme-success"));
    }
}
