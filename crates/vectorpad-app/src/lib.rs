//! VectorPad Application
//!
//! The application shell: browser bindings that mirror the editor into an
//! SVG element, plus a headless session for native runs.

pub mod demo;
mod shortcuts;

pub use shortcuts::{Shortcut, ShortcutRegistry};

#[cfg(target_arch = "wasm32")]
mod menu;
#[cfg(target_arch = "wasm32")]
mod svg;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::VectorEditor;
