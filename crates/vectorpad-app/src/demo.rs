//! Scripted session against the in-memory document.
//!
//! Drives the editor the way a pointer would, so the native binary can
//! exercise the full interaction loop without a browser.

use kurbo::Point;
use vectorpad_core::{Document, Editor, EditorConfig, Modifiers, Target, ToolKind};

fn drag(editor: &mut Editor<Document>, target: Target, path: &[Point]) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };
    editor.pointer_down(target, *first);
    for p in rest {
        editor.pointer_move(*p, Modifiers::default());
    }
    editor.pointer_up(target, rest.last().copied().unwrap_or(*first));
}

fn click(editor: &mut Editor<Document>, at: Point) {
    let target = editor.pick(at);
    editor.pointer_down(target, at);
    editor.pointer_up(target, at);
}

/// Draw a rectangle, a line and a triangle, resize and move them, then walk
/// the history back and forth once.
pub fn run(config: EditorConfig) -> Editor<Document> {
    let mut editor = Editor::new(Document::new(), config);

    editor.set_tool(Some(ToolKind::Rect));
    drag(
        &mut editor,
        Target::Surface,
        &[Point::new(40.0, 40.0), Point::new(80.0, 70.0), Point::new(140.0, 120.0)],
    );
    log::info!("Drew rectangle, state {:?}", editor.state());

    // Pull the bottom-right corner past the top-left one.
    let corner = editor.pick(Point::new(140.0, 120.0));
    drag(&mut editor, corner, &[Point::new(140.0, 120.0), Point::new(20.0, 20.0)]);

    editor.set_tool(Some(ToolKind::Line));
    drag(
        &mut editor,
        Target::Surface,
        &[Point::new(200.0, 200.0), Point::new(300.0, 260.0)],
    );

    editor.set_tool(Some(ToolKind::Polygon));
    for p in [(400.0, 100.0), (500.0, 100.0), (450.0, 180.0), (400.0, 100.0)] {
        click(&mut editor, Point::new(p.0, p.1));
    }
    log::info!("Closed polygon, tool is now {:?}", editor.tool());

    editor.set_tool(None);
    let line = editor.pick(Point::new(250.0, 230.0));
    drag(&mut editor, line, &[Point::new(250.0, 230.0), Point::new(260.0, 240.0)]);

    let edits = editor.history().len();
    for _ in 0..edits {
        editor.undo();
    }
    for _ in 0..edits {
        editor.redo();
    }
    log::info!("Replayed {edits} edits");
    editor
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectorpad_core::{HistoryKind, Shape, Surface};

    #[test]
    fn test_demo_session() {
        let editor = run(EditorConfig::default());
        let doc = editor.surface();
        assert_eq!(doc.len(), 3);
        assert_eq!(editor.history().len(), 5);
        assert!(!editor.history().can_redo());

        let kinds: Vec<_> = editor.history().nodes().iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                HistoryKind::Create,
                HistoryKind::Modify,
                HistoryKind::Create,
                HistoryKind::Create,
                HistoryKind::Modify,
            ]
        );

        for id in doc.shape_ids() {
            match doc.shape(id) {
                Some(Shape::Rect(r)) => {
                    assert_eq!(r.position, Point::new(20.0, 20.0));
                    assert!((r.width - 20.0).abs() < f64::EPSILON);
                }
                Some(Shape::Line(l)) => assert_eq!(l.start, Point::new(210.0, 210.0)),
                Some(Shape::Polygon(p)) => assert_eq!(p.points.len(), 3),
                None => panic!("dangling id {id}"),
            }
        }
    }
}
