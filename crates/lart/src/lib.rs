//! Modal dialog toolkit with alert, confirm, and prompt presets.
//!
//! lart renders modal dialogs over a pluggable rendering surface, with
//! configurable theming, auto-close, drag-to-move, and keyboard/overlay
//! dismissal:
//! - [`DialogManager`] - merge options over defaults, build the dialog
//!   tree, wire dismissal/resize/timeout/drag, and hand back a handle
//! - [`DialogHandle`] - idempotent `close()` plus the root node reference
//! - [`DialogOptions`]/[`DialogDefaults`] - the strongly-typed option
//!   table, each field overridable per call
//!
//! The manager is constructed explicitly over a [`Surface`] - nothing is
//! registered globally, and the in-memory surface backend drives the whole
//! lifecycle under test without a real UI tree:
//!
//! ```
//! use std::rc::Rc;
//! use lart::{DialogManager, DialogOptions, MemorySurface};
//!
//! let surface = Rc::new(MemorySurface::new());
//! let manager = DialogManager::new(surface.clone());
//! let handle = manager.alert("Saved.", None, None, DialogOptions::new());
//! handle.close();
//! ```

pub mod config;
pub mod dialog;
mod drag;
pub mod manager;

pub use config::{
    ButtonAction, ButtonLabel, ButtonSpec, Callback, ConfigError, DialogConfig, DialogDefaults,
    DialogOptions, ValueCallback,
};
pub use dialog::{DialogHandle, CLOSE_FADE, REVEAL_TICK};
pub use manager::DialogManager;

// Re-export the pieces callers need to stand a manager up.
pub use lart_core::{Event, Key, PointerButton, PointerEvent, Theme};
pub use lart_surface::{MemorySurface, NodeId, Surface, Target};
