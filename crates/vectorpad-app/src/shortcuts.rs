//! Keyboard shortcut registry and documentation.

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    /// `KeyboardEvent.key` value.
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        parts.push(match self.key {
            " " => "Space".to_string(),
            key if key.len() == 1 => key.to_uppercase(),
            key => key.to_string(),
        });
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("z", true, false, "Undo"),
            Shortcut::new("z", true, true, "Redo"),
            Shortcut::new("y", true, false, "Redo"),
            Shortcut::new("Delete", false, false, "Delete the shape being edited"),
            Shortcut::new("Backspace", false, false, "Delete the shape being edited"),
            Shortcut::new("Escape", false, false, "Finish polygon and clear handles"),
            Shortcut::new(" ", false, false, "Hold and drag to pan"),
            Shortcut::new("l", false, false, "Line tool"),
            Shortcut::new("r", false, false, "Rectangle tool"),
            Shortcut::new("p", false, false, "Polygon tool"),
            Shortcut::new("s", false, false, "Selection marquee tool"),
            Shortcut::new("v", false, false, "No tool (move shapes)"),
        ]
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}
