//! Shared utilities for lart.
//!
//! This crate provides common utilities used across the lart workspace:
//! - ULID-based identifier generation for dialogs and prompt fields
//! - Logging setup with tracing

pub mod id;
pub mod log;

pub use id::{IdPrefix, Identifier};
