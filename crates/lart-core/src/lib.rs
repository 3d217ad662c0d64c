//! Core types for lart.
//!
//! This crate provides foundational types shared across the lart workspace:
//! - UI event model (pointer, keyboard, resize)
//! - Named theme tags for class substitution

pub mod event;
pub mod theme;

pub use event::{is_enter, is_escape, Event, Key, PointerButton, PointerEvent};
pub use theme::Theme;
