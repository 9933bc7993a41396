//! Input vocabulary shared by hosts and the editor.

use crate::editor::ToolKind;
use crate::handles::HandleRef;
use crate::shapes::ShapeId;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    /// Space bar held (pan modifier).
    pub space: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What a pointer event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// Empty drawing surface.
    Surface,
    /// The body of a shape.
    Shape(ShapeId),
    /// A handle.
    Handle(HandleRef),
}

/// Editor command bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Undo,
    Redo,
    /// Delete the shape currently carrying handles.
    DeleteEdited,
    /// Finish a polygon in progress and drop the handles.
    Cancel,
    SetTool(Option<ToolKind>),
    /// Hold-to-pan.
    Pan,
}

/// Map a `KeyboardEvent.key` value plus modifiers to a command.
pub fn command_for_key(key: &str, modifiers: Modifiers) -> Option<Command> {
    if modifiers.command() {
        return match key {
            "z" | "Z" if modifiers.shift => Some(Command::Redo),
            "z" | "Z" => Some(Command::Undo),
            "y" | "Y" => Some(Command::Redo),
            _ => None,
        };
    }

    match key {
        " " | "Spacebar" => Some(Command::Pan),
        "Delete" | "Backspace" => Some(Command::DeleteEdited),
        "Escape" => Some(Command::Cancel),
        "l" | "L" => Some(Command::SetTool(Some(ToolKind::Line))),
        "r" | "R" => Some(Command::SetTool(Some(ToolKind::Rect))),
        "p" | "P" => Some(Command::SetTool(Some(ToolKind::Polygon))),
        "s" | "S" => Some(Command::SetTool(Some(ToolKind::Select))),
        "v" | "V" => Some(Command::SetTool(None)),
        _ => None,
    }
}
