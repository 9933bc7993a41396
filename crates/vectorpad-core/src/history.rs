//! Undo/redo history.
//!
//! Each committed gesture is stored as a node holding deep copies of the
//! affected shapes before and after the edit. Nodes live in a vector and a
//! cursor points at the most recently applied one; committing after an undo
//! discards everything past the cursor.

use crate::shapes::Shape;
use crate::surface::Surface;
use serde::{Deserialize, Serialize};

/// What a history node did to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryKind {
    Create,
    Delete,
    Modify,
}

/// One committed edit.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryNode {
    pub kind: HistoryKind,
    /// Shapes as they were before the edit (empty for creations).
    pub before: Vec<Shape>,
    /// Shapes as they are after the edit (empty for deletions).
    pub after: Vec<Shape>,
}

impl HistoryNode {
    pub fn new(kind: HistoryKind, before: Vec<Shape>, after: Vec<Shape>) -> Self {
        Self {
            kind,
            before,
            after,
        }
    }
}

/// Linear history with a cursor.
#[derive(Debug, Clone, Default)]
pub struct History {
    nodes: Vec<HistoryNode>,
    /// Index of the most recently applied node.
    cursor: Option<usize>,
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// History that keeps at most `limit` nodes, dropping the oldest.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Commit a node, discarding any redoable nodes.
    pub fn record(&mut self, node: HistoryNode) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.nodes.truncate(keep);
        log::debug!(
            "Recording {:?} ({} before, {} after)",
            node.kind,
            node.before.len(),
            node.after.len()
        );
        self.nodes.push(node);

        if let Some(limit) = self.limit {
            if self.nodes.len() > limit {
                let excess = self.nodes.len() - limit;
                self.nodes.drain(..excess);
            }
        }
        self.cursor = self.nodes.len().checked_sub(1);
    }

    /// Revert the node at the cursor.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self, surface: &mut dyn Surface) -> bool {
        let Some(index) = self.cursor else {
            return false;
        };
        let node = &self.nodes[index];
        match node.kind {
            HistoryKind::Create => remove_all(surface, &node.after),
            HistoryKind::Delete => insert_all(surface, &node.before),
            HistoryKind::Modify => {
                remove_all(surface, &node.after);
                insert_all(surface, &node.before);
            }
        }
        self.cursor = index.checked_sub(1);
        true
    }

    /// Re-apply the node after the cursor.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self, surface: &mut dyn Surface) -> bool {
        let index = self.cursor.map_or(0, |c| c + 1);
        let Some(node) = self.nodes.get(index) else {
            return false;
        };
        match node.kind {
            HistoryKind::Create => insert_all(surface, &node.after),
            HistoryKind::Delete => remove_all(surface, &node.before),
            HistoryKind::Modify => {
                remove_all(surface, &node.before);
                insert_all(surface, &node.after);
            }
        }
        self.cursor = Some(index);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.map_or(0, |c| c + 1) < self.nodes.len()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[HistoryNode] {
        &self.nodes
    }
}

fn insert_all(surface: &mut dyn Surface, shapes: &[Shape]) {
    for shape in shapes {
        surface.insert_shape(shape.clone());
    }
}

fn remove_all(surface: &mut dyn Surface, shapes: &[Shape]) {
    for shape in shapes {
        if surface.remove_shape(shape.id()).is_none() {
            log::warn!("History replay: shape {} already gone", shape.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::shapes::{Line, Rectangle};
    use kurbo::Point;

    fn rect(x: f64) -> Shape {
        Shape::Rect(Rectangle::new(Point::new(x, 0.0), 10.0, 10.0))
    }

    fn create(doc: &mut Document, history: &mut History, shape: Shape) {
        doc.insert_shape(shape.clone());
        history.record(HistoryNode::new(HistoryKind::Create, Vec::new(), vec![shape]));
    }

    fn state(doc: &Document) -> Vec<Shape> {
        let mut shapes: Vec<Shape> = doc.shapes_ordered().cloned().collect();
        shapes.sort_by_key(|s| s.id());
        shapes
    }

    #[test]
    fn test_undo_empty_is_noop() {
        let mut doc = Document::new();
        let mut history = History::new();
        assert!(!history.undo(&mut doc));
        assert!(!history.redo(&mut doc));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_create() {
        let mut doc = Document::new();
        let mut history = History::new();
        create(&mut doc, &mut history, rect(0.0));

        assert!(history.undo(&mut doc));
        assert!(doc.is_empty());
        assert!(history.redo(&mut doc));
        assert_eq!(doc.len(), 1);
        assert!(!history.redo(&mut doc));
    }

    #[test]
    fn test_undo_redo_modify() {
        let mut doc = Document::new();
        let mut history = History::new();
        let original = rect(0.0);
        create(&mut doc, &mut history, original.clone());

        let mut moved = original.clone();
        if let Shape::Rect(r) = &mut moved {
            r.position = Point::new(50.0, 50.0);
        }
        doc.insert_shape(moved.clone());
        history.record(HistoryNode::new(
            HistoryKind::Modify,
            vec![original.clone()],
            vec![moved.clone()],
        ));

        assert!(history.undo(&mut doc));
        assert_eq!(doc.shape(original.id()), Some(&original));
        assert!(history.redo(&mut doc));
        assert_eq!(doc.shape(original.id()), Some(&moved));
    }

    #[test]
    fn test_undo_redo_delete() {
        let mut doc = Document::new();
        let mut history = History::new();
        let shape = rect(0.0);
        create(&mut doc, &mut history, shape.clone());
        doc.remove_shape(shape.id());
        history.record(HistoryNode::new(HistoryKind::Delete, vec![shape.clone()], Vec::new()));

        assert!(history.undo(&mut doc));
        assert!(doc.contains(shape.id()));
        assert!(history.redo(&mut doc));
        assert!(!doc.contains(shape.id()));
    }

    #[test]
    fn test_inverse_law_over_many_edits() {
        let mut doc = Document::new();
        let mut history = History::new();
        let mut states = vec![state(&doc)];
        for i in 0..5 {
            create(&mut doc, &mut history, rect(i as f64 * 20.0));
            states.push(state(&doc));
        }
        let line = Shape::Line(Line::new(Point::ZERO, Point::new(1.0, 1.0)));
        create(&mut doc, &mut history, line);
        states.push(state(&doc));

        for expected in states.iter().rev().skip(1) {
            assert!(history.undo(&mut doc));
            assert_eq!(&state(&doc), expected);
        }
        assert!(!history.undo(&mut doc));

        for expected in states.iter().skip(1) {
            assert!(history.redo(&mut doc));
            assert_eq!(&state(&doc), expected);
        }
        assert!(!history.redo(&mut doc));
    }

    #[test]
    fn test_record_after_undo_truncates_branch() {
        let mut doc = Document::new();
        let mut history = History::new();
        for i in 0..3 {
            create(&mut doc, &mut history, rect(i as f64 * 20.0));
        }
        history.undo(&mut doc);
        history.undo(&mut doc);
        create(&mut doc, &mut history, rect(100.0));

        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert!(!history.redo(&mut doc));
    }

    #[test]
    fn test_record_after_undoing_everything() {
        let mut doc = Document::new();
        let mut history = History::new();
        create(&mut doc, &mut history, rect(0.0));
        history.undo(&mut doc);
        assert_eq!(history.cursor(), None);
        create(&mut doc, &mut history, rect(20.0));
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), Some(0));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut doc = Document::new();
        let mut history = History::with_limit(Some(2));
        for i in 0..4 {
            create(&mut doc, &mut history, rect(i as f64 * 20.0));
        }
        assert_eq!(history.len(), 2);
        assert!(history.undo(&mut doc));
        assert!(history.undo(&mut doc));
        assert!(!history.undo(&mut doc));
        assert_eq!(doc.len(), 2);
    }
}
