//! VectorPad Core Library
//!
//! Platform-agnostic shape model, handle bookkeeping, undo history and the
//! pointer-driven interaction state machine for the VectorPad editor.

pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod handles;
pub mod history;
pub mod input;
pub mod mutator;
pub mod shapes;
pub mod surface;
pub mod viewport;

pub use config::EditorConfig;
pub use document::Document;
pub use editor::{Editor, InteractionState, MenuAction, MenuEntry, Mode, ToolKind};
pub use error::{EditorError, EditorResult};
pub use handles::{Handle, HandleManager, HandleRef};
pub use history::{History, HistoryKind, HistoryNode};
pub use input::{Command, Modifiers, Target};
pub use shapes::{Shape, ShapeId, ShapeKind, ShapeStyle};
pub use surface::Surface;
pub use viewport::Viewport;
